//! Noise filters: Median, Bilateral.
//!
//! Both remove noise while keeping edges; the sketch styles use the median
//! to flatten skin and fine texture, the cartoon style uses the bilateral
//! filter to produce flat color regions.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - processes the single channel
//! - **RGB**: (height, width, 3) - processes all 3 channels
//! - **RGBA**: (height, width, 4) - processes RGB, alpha is dropped from bilateral output

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::{reflect101, replicate, saturate_u8};

// ============================================================================
// Median Filter
// ============================================================================

/// Apply median filter - u8 version.
///
/// Removes salt-and-pepper noise while preserving edges. Borders replicate
/// the edge pixel.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `ksize` - Window size (odd, e.g. 5 for a 5x5 window)
///
/// # Returns
/// Median-filtered image with same channel count
pub fn median_u8(input: ArrayView3<u8>, ksize: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let radius = (ksize / 2) as isize;
    if radius == 0 || height == 0 || width == 0 {
        return input.to_owned();
    }

    let window = (ksize | 1) * (ksize | 1);
    let color_channels = if channels == 4 { 3 } else { channels };

    let mut output = vec![0u8; height * width * channels];
    output
        .par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let mut values: Vec<u8> = Vec::with_capacity(window);
            for x in 0..width {
                for c in 0..color_channels {
                    values.clear();
                    for dy in -radius..=radius {
                        let sy = replicate(y as isize + dy, height);
                        for dx in -radius..=radius {
                            let sx = replicate(x as isize + dx, width);
                            values.push(input[[sy, sx, c]]);
                        }
                    }
                    values.sort_unstable();
                    row[x * channels + c] = values[values.len() / 2];
                }
                if channels == 4 {
                    row[x * channels + 3] = input[[y, x, 3]];
                }
            }
        });

    Array3::from_shape_vec((height, width, channels), output)
        .expect("Shape mismatch in median_u8")
}

// ============================================================================
// Bilateral Filter
// ============================================================================

/// Apply bilateral filter - u8 version.
///
/// Averages pixels inside a circular window, weighted by spatial distance
/// and by color distance (sum of absolute channel differences).
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `diameter` - Window diameter in pixels
/// * `sigma_color` - Color similarity falloff
/// * `sigma_space` - Spatial falloff
///
/// # Returns
/// Filtered image with 1 or 3 channels
pub fn bilateral_u8(
    input: ArrayView3<u8>,
    diameter: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let color_channels = if channels == 4 { 3 } else { channels };
    let radius = (diameter / 2).max(1) as isize;

    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    // Circular window offsets with their spatial weights
    let mut offsets: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r = ((dy * dy + dx * dx) as f32).sqrt();
            if r <= radius as f32 {
                offsets.push((dy, dx, (r * r * space_coeff).exp()));
            }
        }
    }

    // Color weights by L1 distance, one entry per possible distance
    let color_weights: Vec<f32> = (0..=255 * color_channels)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut output = vec![0u8; height * width * color_channels];
    output
        .par_chunks_mut(width * color_channels)
        .enumerate()
        .for_each(|(y, row)| {
            let mut sum = vec![0.0f32; color_channels];
            for x in 0..width {
                sum.iter_mut().for_each(|s| *s = 0.0);
                let mut weight_sum = 0.0f32;

                for &(dy, dx, space_weight) in &offsets {
                    let sy = reflect101(y as isize + dy, height);
                    let sx = reflect101(x as isize + dx, width);

                    let dist: usize = (0..color_channels)
                        .map(|c| (input[[sy, sx, c]] as i32 - input[[y, x, c]] as i32).unsigned_abs() as usize)
                        .sum();
                    let w = space_weight * color_weights[dist];

                    for (c, s) in sum.iter_mut().enumerate() {
                        *s += input[[sy, sx, c]] as f32 * w;
                    }
                    weight_sum += w;
                }

                for (c, s) in sum.iter().enumerate() {
                    row[x * color_channels + c] = saturate_u8(s / weight_sum);
                }
            }
        });

    Array3::from_shape_vec((height, width, color_channels), output)
        .expect("Shape mismatch in bilateral_u8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_removes_salt() {
        let mut img = Array3::<u8>::from_elem((7, 7, 1), 50);
        img[[3, 3, 0]] = 255;

        let result = median_u8(img.view(), 5);
        assert_eq!(result[[3, 3, 0]], 50);
    }

    #[test]
    fn test_median_keeps_step_edge() {
        let img = Array3::from_shape_fn((6, 10, 1), |(_, x, _)| if x < 5 { 20 } else { 220 });

        let result = median_u8(img.view(), 5);
        assert_eq!(result[[3, 0, 0]], 20);
        assert_eq!(result[[3, 4, 0]], 20);
        assert_eq!(result[[3, 5, 0]], 220);
        assert_eq!(result[[3, 9, 0]], 220);
    }

    #[test]
    fn test_median_preserves_alpha() {
        let mut img = Array3::<u8>::from_elem((3, 3, 4), 80);
        img[[1, 1, 3]] = 7;
        let result = median_u8(img.view(), 3);
        assert_eq!(result[[1, 1, 3]], 7);
        assert_eq!(result[[1, 1, 0]], 80);
    }

    #[test]
    fn test_bilateral_flat_stays_flat() {
        let img = Array3::<u8>::from_elem((8, 8, 3), 90);
        let result = bilateral_u8(img.view(), 9, 250.0, 250.0);
        assert_eq!(result.dim(), (8, 8, 3));
        assert!(result.iter().all(|&v| v == 90));
    }

    #[test]
    fn test_bilateral_low_sigma_color_keeps_edges() {
        let img = Array3::from_shape_fn((8, 8, 3), |(_, x, _)| if x < 4 { 10 } else { 240 });

        let result = bilateral_u8(img.view(), 5, 10.0, 50.0);
        assert_eq!(result[[4, 3, 0]], 10);
        assert_eq!(result[[4, 4, 0]], 240);
    }

    #[test]
    fn test_bilateral_smooths_small_noise() {
        let mut img = Array3::<u8>::from_elem((9, 9, 3), 100);
        img[[4, 4, 0]] = 120;
        img[[4, 4, 1]] = 120;
        img[[4, 4, 2]] = 120;

        let result = bilateral_u8(img.view(), 9, 250.0, 250.0);
        assert!(result[[4, 4, 0]] < 110);
    }

    #[test]
    fn test_bilateral_drops_alpha() {
        let img = Array3::<u8>::from_elem((3, 3, 4), 60);
        let result = bilateral_u8(img.view(), 3, 20.0, 20.0);
        assert_eq!(result.dim(), (3, 3, 3));
    }
}
