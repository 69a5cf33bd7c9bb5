//! Color adjustment filters: Invert, Linear Contrast.
//!
//! These are pixel-wise operations that don't require spatial context.
//!
//! ## Supported Formats
//!
//! All filters accept images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - single luminance channel
//! - **RGB**: (height, width, 3) - red, green, blue
//! - **RGBA**: (height, width, 4) - red, green, blue, alpha
//!
//! Alpha channel (if present) is always preserved unchanged.

use ndarray::{Array3, ArrayView3};

use super::core::saturate_u8;

// ============================================================================
// Invert
// ============================================================================

/// Invert image (u8 version): `255 - v` on every color channel.
pub fn invert_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    for y in 0..height {
        for x in 0..width {
            for c in 0..color_channels {
                output[[y, x, c]] = 255 - input[[y, x, c]];
            }
            if channels == 4 {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }
    output
}

// ============================================================================
// Linear Contrast
// ============================================================================

/// Scale, offset and take the absolute value (u8 version).
///
/// Computes `saturate(round(|v * alpha + beta|))` per color channel, with
/// halves rounded to even.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `alpha` - Gain (1.0 = no change)
/// * `beta` - Offset added after the gain
///
/// # Returns
/// Adjusted image with same channel count
pub fn scale_abs_u8(input: ArrayView3<u8>, alpha: f32, beta: f32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    // Lookup table: every input level maps to one output level
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = saturate_u8((i as f32 * alpha + beta).abs());
    }

    for y in 0..height {
        for x in 0..width {
            for c in 0..color_channels {
                output[[y, x, c]] = lut[input[[y, x, c]] as usize];
            }
            if channels == 4 {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }
    output
}
