//! Sketch styles: Pencil, Color Pencil, Cartoon.
//!
//! Each style is a fixed chain of filters from [`crate::filters`]. Inputs
//! are RGB or RGBA `(height, width, channels)` arrays; alpha is ignored.

use ndarray::{Array3, ArrayView3};

use crate::error::SketchResult;
use crate::filters::blend::{dodge_u8, mask_u8, multiply_u8};
use crate::filters::blur::gaussian_blur_u8;
use crate::filters::color_adjust::{invert_u8, scale_abs_u8};
use crate::filters::core::ensure_color;
use crate::filters::grayscale::{gray_to_rgb_u8, to_gray_u8};
use crate::filters::histogram::{clahe_u8, DEFAULT_CLIP_LIMIT, DEFAULT_TILE_GRID};
use crate::filters::noise::{bilateral_u8, median_u8};
use crate::filters::sharpen::sharpen_sketch_u8;
use crate::filters::stylize::adaptive_threshold_mean_u8;
use crate::params::{make_odd, validate_blur};

/// Median window applied before any line extraction.
pub const MEDIAN_KSIZE: usize = 5;

/// Render a grayscale pencil sketch.
///
/// Grayscale, median, invert, Gaussian blur, dodge, CLAHE, linear contrast
/// and, for a positive strength, line sharpening.
///
/// # Arguments
/// * `input` - RGB or RGBA image (height, width, 3 or 4)
/// * `blur_kernel_size` - Gaussian kernel size, at most 99; even values are bumped to the next odd one
/// * `contrast_gain` - Gain applied after equalization
/// * `sharpen_strength` - Line sharpening strength; 0 disables sharpening
///
/// # Returns
/// Single-channel sketch (height, width, 1)
pub fn pencil_sketch(
    input: ArrayView3<u8>,
    blur_kernel_size: u32,
    contrast_gain: f32,
    sharpen_strength: f32,
) -> SketchResult<Array3<u8>> {
    ensure_color(&input)?;
    validate_blur(blur_kernel_size)?;

    let gray = median_u8(to_gray_u8(input).view(), MEDIAN_KSIZE);
    let inverted = invert_u8(gray.view());
    let blurred = gaussian_blur_u8(inverted.view(), make_odd(blur_kernel_size) as usize);

    let sketch = dodge_u8(gray.view(), blurred.view())?;
    let sketch = clahe_u8(sketch.view(), DEFAULT_CLIP_LIMIT, DEFAULT_TILE_GRID);
    let sketch = scale_abs_u8(sketch.view(), contrast_gain, 0.0);

    Ok(sharpen_sketch_u8(sketch.view(), sharpen_strength))
}

/// Multiply a gray sketch into the original colors.
///
/// # Arguments
/// * `sketch` - Single-channel sketch (height, width, 1)
/// * `original` - RGB or RGBA image the sketch was made from
///
/// # Returns
/// RGB image (height, width, 3)
pub fn colorize(sketch: ArrayView3<u8>, original: ArrayView3<u8>) -> SketchResult<Array3<u8>> {
    multiply_u8(gray_to_rgb_u8(sketch).view(), original)
}

/// Render a color pencil sketch: the pencil sketch multiplied into the
/// original colors.
///
/// # Returns
/// RGB image (height, width, 3)
pub fn color_pencil_sketch(
    input: ArrayView3<u8>,
    blur_kernel_size: u32,
    contrast_gain: f32,
    sharpen_strength: f32,
) -> SketchResult<Array3<u8>> {
    let sketch = pencil_sketch(input, blur_kernel_size, contrast_gain, sharpen_strength)?;
    colorize(sketch.view(), input)
}

/// Fixed constants of the cartoon style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartoonSettings {
    pub median_ksize: usize,
    pub threshold_block_size: usize,
    pub threshold_offset: i32,
    pub bilateral_diameter: usize,
    pub sigma_color: f32,
    pub sigma_space: f32,
}

impl Default for CartoonSettings {
    fn default() -> Self {
        Self {
            median_ksize: MEDIAN_KSIZE,
            threshold_block_size: 9,
            threshold_offset: 9,
            bilateral_diameter: 9,
            sigma_color: 250.0,
            sigma_space: 250.0,
        }
    }
}

/// Outline mask of the cartoon style: 255 on flat areas, 0 on dark edges.
pub fn cartoon_edge_mask(
    input: ArrayView3<u8>,
    settings: &CartoonSettings,
) -> SketchResult<Array3<u8>> {
    ensure_color(&input)?;
    let gray = median_u8(to_gray_u8(input).view(), settings.median_ksize);
    Ok(adaptive_threshold_mean_u8(
        gray.view(),
        settings.threshold_block_size,
        settings.threshold_offset,
        255,
    ))
}

/// Render a cartoon with explicit settings.
///
/// # Returns
/// RGB image (height, width, 3)
pub fn cartoon_sketch_with(
    input: ArrayView3<u8>,
    settings: &CartoonSettings,
) -> SketchResult<Array3<u8>> {
    let edges = cartoon_edge_mask(input, settings)?;
    let smoothed = bilateral_u8(
        input,
        settings.bilateral_diameter,
        settings.sigma_color,
        settings.sigma_space,
    );
    mask_u8(smoothed.view(), edges.view())
}

/// Render a cartoon: bilateral-smoothed colors with black outlines.
pub fn cartoon_sketch(input: ArrayView3<u8>) -> SketchResult<Array3<u8>> {
    cartoon_sketch_with(input, &CartoonSettings::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SketchError;

    /// Light background with a dark square in the middle.
    fn square_image(size: usize) -> Array3<u8> {
        let lo = size / 3;
        let hi = 2 * size / 3;
        Array3::from_shape_fn((size, size, 3), |(y, x, _)| {
            if (lo..hi).contains(&y) && (lo..hi).contains(&x) {
                60
            } else {
                200
            }
        })
    }

    fn std_dev(img: &Array3<u8>) -> f32 {
        let n = img.len() as f32;
        let mean = img.iter().map(|&v| v as f32).sum::<f32>() / n;
        (img.iter().map(|&v| (v as f32 - mean).powi(2)).sum::<f32>() / n).sqrt()
    }

    fn correlation(a: &[f32], b: &[f32]) -> f32 {
        let n = a.len() as f32;
        let ma = a.iter().sum::<f32>() / n;
        let mb = b.iter().sum::<f32>() / n;
        let mut cov = 0.0;
        let mut va = 0.0;
        let mut vb = 0.0;
        for (x, y) in a.iter().zip(b) {
            cov += (x - ma) * (y - mb);
            va += (x - ma).powi(2);
            vb += (y - mb).powi(2);
        }
        cov / (va.sqrt() * vb.sqrt())
    }

    #[test]
    fn test_pencil_uniform_input_is_flat() {
        let img = Array3::<u8>::from_elem((40, 30, 3), 128);
        let result = pencil_sketch(img.view(), 21, 1.0, 0.0).unwrap();
        assert_eq!(result.dim(), (40, 30, 1));
        assert!(std_dev(&result) < 1.0);
    }

    #[test]
    fn test_pencil_draws_dark_lines_at_edges() {
        let img = square_image(48);
        let result = pencil_sketch(img.view(), 21, 1.0, 0.0).unwrap();

        let min = *result.iter().min().unwrap();
        let corner = result[[2, 2, 0]];
        assert!(min < corner, "edge {min} should be darker than background {corner}");
    }

    #[test]
    fn test_pencil_rejects_gray_input() {
        let img = Array3::<u8>::zeros((4, 4, 1));
        assert!(matches!(
            pencil_sketch(img.view(), 21, 1.0, 1.0),
            Err(SketchError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_pencil_rejects_empty_input() {
        let img = Array3::<u8>::zeros((0, 4, 3));
        assert!(pencil_sketch(img.view(), 21, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_pencil_rejects_oversized_blur() {
        let img = square_image(12);
        assert!(matches!(
            pencil_sketch(img.view(), u32::MAX, 1.0, 1.0),
            Err(SketchError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_colorize_rejects_gray_original() {
        let sketch = Array3::<u8>::from_elem((4, 4, 1), 200);
        let original = Array3::<u8>::from_elem((4, 4, 1), 90);
        assert!(matches!(
            colorize(sketch.view(), original.view()),
            Err(SketchError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_pencil_even_blur_matches_next_odd() {
        let img = square_image(24);
        let even = pencil_sketch(img.view(), 20, 1.0, 1.0).unwrap();
        let odd = pencil_sketch(img.view(), 21, 1.0, 1.0).unwrap();
        assert_eq!(even, odd);
    }

    #[test]
    fn test_color_pencil_shape() {
        let img = square_image(24);
        let result = color_pencil_sketch(img.view(), 21, 1.0, 1.0).unwrap();
        assert_eq!(result.dim(), (24, 24, 3));
    }

    #[test]
    fn test_color_pencil_correlates_with_pencil() {
        let img = square_image(48);
        let pencil = pencil_sketch(img.view(), 21, 1.0, 0.0).unwrap();
        let color = color_pencil_sketch(img.view(), 21, 1.0, 0.0).unwrap();
        let regray = to_gray_u8(color.view());

        let a: Vec<f32> = pencil.iter().map(|&v| v as f32).collect();
        let b: Vec<f32> = regray.iter().map(|&v| v as f32).collect();
        assert!(correlation(&a, &b) > 0.0);
    }

    #[test]
    fn test_color_pencil_keeps_hue() {
        // Pure red photo: green and blue stay zero
        let mut img = Array3::<u8>::zeros((16, 16, 3));
        for y in 0..16 {
            for x in 0..16 {
                img[[y, x, 0]] = 220;
            }
        }
        let result = color_pencil_sketch(img.view(), 5, 1.0, 0.0).unwrap();
        assert!(result.iter().skip(1).step_by(3).all(|&g| g == 0));
        assert!(result[[8, 8, 0]] > 0);
    }

    #[test]
    fn test_cartoon_flat_input_keeps_color() {
        let img = Array3::<u8>::from_elem((12, 12, 3), 150);
        let result = cartoon_sketch(img.view()).unwrap();
        assert_eq!(result.dim(), (12, 12, 3));
        assert!(result.iter().all(|&v| v == 150));
    }

    #[test]
    fn test_cartoon_outlines_are_black() {
        let img = square_image(30);
        let mask = cartoon_edge_mask(img.view(), &CartoonSettings::default()).unwrap();
        let result = cartoon_sketch(img.view()).unwrap();

        let mut outlined = 0;
        for y in 0..30 {
            for x in 0..30 {
                if mask[[y, x, 0]] == 0 {
                    outlined += 1;
                    assert_eq!(result[[y, x, 0]], 0);
                    assert_eq!(result[[y, x, 1]], 0);
                    assert_eq!(result[[y, x, 2]], 0);
                }
            }
        }
        assert!(outlined > 0);
    }

    #[test]
    fn test_cartoon_tighter_threshold_suppresses_more() {
        let img = Array3::from_shape_fn((24, 24, 3), |(y, x, c)| ((x * 29 + y * 53 + c * 7) % 256) as u8);

        let suppressed = |offset: i32| {
            let settings = CartoonSettings {
                threshold_offset: offset,
                ..CartoonSettings::default()
            };
            cartoon_edge_mask(img.view(), &settings)
                .unwrap()
                .iter()
                .filter(|&&v| v == 0)
                .count()
        };

        assert!(suppressed(2) >= suppressed(9));
        assert!(suppressed(9) >= suppressed(20));
    }
}
