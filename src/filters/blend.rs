//! Blend modes used by the sketch styles: Color Dodge, Multiply, Mask.
//!
//! Each blend takes two images of the same height and width and returns a
//! new image. Mismatched shapes are reported as an invalid image.

use ndarray::{Array3, ArrayView3};

use crate::error::{SketchError, SketchResult};

use super::core::{ensure_color, ensure_gray, saturate_u8};

fn ensure_same_size(a: &ArrayView3<u8>, b: &ArrayView3<u8>) -> SketchResult<()> {
    let (ha, wa, _) = a.dim();
    let (hb, wb, _) = b.dim();
    if ha != hb || wa != wb {
        return Err(SketchError::invalid_image(format!(
            "blend operands differ in size: {wa}x{ha} vs {wb}x{hb}"
        )));
    }
    Ok(())
}

/// Color dodge of a gray base against a gray blend layer.
///
/// Computes `round(base * 256 / (255 - blend))`, saturated to 0-255.
/// Where `blend` is 255 the result is 0.
///
/// # Arguments
/// * `base` - Single-channel image (height, width, 1)
/// * `blend` - Single-channel image (height, width, 1), usually a blurred inversion of `base`
///
/// # Returns
/// Single-channel dodged image
pub fn dodge_u8(base: ArrayView3<u8>, blend: ArrayView3<u8>) -> SketchResult<Array3<u8>> {
    ensure_gray(&base)?;
    ensure_gray(&blend)?;
    ensure_same_size(&base, &blend)?;
    let (height, width, _) = base.dim();
    let mut output = Array3::<u8>::zeros((height, width, 1));

    for y in 0..height {
        for x in 0..width {
            let denom = 255 - blend[[y, x, 0]] as u32;
            output[[y, x, 0]] = if denom == 0 {
                0
            } else {
                saturate_u8(base[[y, x, 0]] as f32 * 256.0 / denom as f32)
            };
        }
    }

    Ok(output)
}

/// Multiply a texture layer into a color image.
///
/// Both operands are normalized to 0.0-1.0 in double precision, multiplied,
/// and scaled back to 8 bits by truncation. A single-channel texture is
/// applied to every color channel.
///
/// # Arguments
/// * `texture` - Image with 1 or 3 channels (height, width, channels)
/// * `color` - RGB or RGBA image (height, width, 3 or 4); alpha is dropped
///
/// # Returns
/// RGB image (height, width, 3)
pub fn multiply_u8(texture: ArrayView3<u8>, color: ArrayView3<u8>) -> SketchResult<Array3<u8>> {
    ensure_color(&color)?;
    ensure_same_size(&texture, &color)?;
    let (height, width, texture_channels) = texture.dim();
    if texture_channels != 1 && texture_channels != 3 {
        return Err(SketchError::invalid_image(format!(
            "multiply texture needs 1 or 3 channels, got {texture_channels}"
        )));
    }
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                let t = if texture_channels == 1 {
                    texture[[y, x, 0]]
                } else {
                    texture[[y, x, c]]
                };
                let product = (t as f64 / 255.0) * (color[[y, x, c]] as f64 / 255.0);
                output[[y, x, c]] = (product * 255.0) as u8;
            }
        }
    }

    Ok(output)
}

/// Keep color pixels where the mask is non-zero, black elsewhere.
///
/// # Arguments
/// * `color` - Image with any channel count (height, width, channels)
/// * `mask` - Single-channel mask (height, width, 1)
pub fn mask_u8(color: ArrayView3<u8>, mask: ArrayView3<u8>) -> SketchResult<Array3<u8>> {
    ensure_same_size(&color, &mask)?;
    let (height, width, channels) = color.dim();
    Ok(Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
        if mask[[y, x, 0]] != 0 {
            color[[y, x, c]]
        } else {
            0
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(values: &[u8]) -> Array3<u8> {
        Array3::from_shape_vec((1, values.len(), 1), values.to_vec()).unwrap()
    }

    #[test]
    fn test_dodge_flat_field_saturates() {
        // blend = inverted base, so 255 - blend == base
        let base = gray(&[10, 128, 254]);
        let blend = gray(&[245, 127, 1]);

        let result = dodge_u8(base.view(), blend.view()).unwrap();
        assert!(result.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_dodge_zero_denominator() {
        let base = gray(&[200]);
        let blend = gray(&[255]);

        let result = dodge_u8(base.view(), blend.view()).unwrap();
        assert_eq!(result[[0, 0, 0]], 0);
    }

    #[test]
    fn test_dodge_darkens_where_blend_is_dark() {
        let base = gray(&[100]);
        let blend = gray(&[0]);

        let result = dodge_u8(base.view(), blend.view()).unwrap();
        // 100 * 256 / 255 ≈ 100.4
        assert_eq!(result[[0, 0, 0]], 100);
    }

    #[test]
    fn test_dodge_size_mismatch() {
        let base = gray(&[1, 2]);
        let blend = gray(&[1]);
        assert!(matches!(
            dodge_u8(base.view(), blend.view()),
            Err(SketchError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_dodge_rejects_color_layers() {
        let base = Array3::<u8>::zeros((1, 1, 3));
        let blend = gray(&[0]);
        assert!(dodge_u8(base.view(), blend.view()).is_err());
    }

    #[test]
    fn test_multiply_white_texture_keeps_color() {
        let texture = gray(&[255]);
        let mut color = Array3::<u8>::zeros((1, 1, 3));
        color[[0, 0, 0]] = 200;
        color[[0, 0, 1]] = 100;
        color[[0, 0, 2]] = 255;

        let result = multiply_u8(texture.view(), color.view()).unwrap();
        assert_eq!(result[[0, 0, 0]], 200);
        assert_eq!(result[[0, 0, 1]], 100);
        assert_eq!(result[[0, 0, 2]], 255);
    }

    #[test]
    fn test_multiply_truncates() {
        let texture = gray(&[128]);
        let color = Array3::<u8>::from_elem((1, 1, 4), 128);

        let result = multiply_u8(texture.view(), color.view()).unwrap();
        // 128/255 * 128/255 * 255 = 64.25 -> 64
        assert_eq!(result.dim(), (1, 1, 3));
        assert_eq!(result[[0, 0, 0]], 64);
    }

    #[test]
    fn test_multiply_truncates_float_product() {
        // 17/255 * 195/255 * 255 lands just below 13
        let texture = gray(&[17, 255]);
        let mut color = Array3::<u8>::zeros((1, 2, 3));
        color[[0, 0, 0]] = 195;
        color[[0, 1, 0]] = 200;

        let result = multiply_u8(texture.view(), color.view()).unwrap();
        assert_eq!(result[[0, 0, 0]], 12);
        assert_eq!(result[[0, 1, 0]], 200);
    }

    #[test]
    fn test_multiply_rejects_gray_color_operand() {
        let texture = gray(&[10, 20]);
        let color = gray(&[30, 40]);
        assert!(matches!(
            multiply_u8(texture.view(), color.view()),
            Err(SketchError::InvalidImage(_))
        ));

        let two_channels = Array3::<u8>::zeros((1, 2, 2));
        assert!(multiply_u8(texture.view(), two_channels.view()).is_err());
    }

    #[test]
    fn test_multiply_rejects_two_channel_texture() {
        let texture = Array3::<u8>::zeros((1, 1, 2));
        let color = Array3::<u8>::zeros((1, 1, 3));
        assert!(multiply_u8(texture.view(), color.view()).is_err());
    }

    #[test]
    fn test_mask_suppresses_zero_pixels() {
        let color = Array3::<u8>::from_elem((1, 2, 3), 77);
        let mask = gray(&[0, 255]);

        let result = mask_u8(color.view(), mask.view()).unwrap();
        assert_eq!(result[[0, 0, 1]], 0);
        assert_eq!(result[[0, 1, 1]], 77);
    }
}
