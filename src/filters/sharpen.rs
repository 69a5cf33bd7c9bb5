//! Sharpen filters: 3x3 kernel convolution and the sketch line sharpener.
//!
//! ## Supported Formats
//!
//! All filters accept images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - processes the single channel
//! - **RGB**: (height, width, 3) - processes all 3 channels
//! - **RGBA**: (height, width, 4) - processes RGB, preserves alpha
//!
//! Borders are reflected without repeating the edge pixel, so every pixel
//! (including the outermost ring) is convolved.

use ndarray::{Array3, ArrayView3};

use super::core::{reflect101, saturate_u8};

/// Correlate an image with a 3x3 kernel - u8 version.
///
/// Results are rounded and saturated to 0-255.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `kernel` - Row-major 3x3 weights, anchored at the center
///
/// # Returns
/// Filtered image with same channel count
pub fn filter_3x3_u8(input: ArrayView3<u8>, kernel: &[[f32; 3]; 3]) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    for y in 0..height {
        for x in 0..width {
            for c in 0..color_channels {
                let mut sum = 0.0f32;
                for (ky, krow) in kernel.iter().enumerate() {
                    let sy = reflect101(y as isize + ky as isize - 1, height);
                    for (kx, &kv) in krow.iter().enumerate() {
                        if kv == 0.0 {
                            continue;
                        }
                        let sx = reflect101(x as isize + kx as isize - 1, width);
                        sum += input[[sy, sx, c]] as f32 * kv;
                    }
                }
                output[[y, x, c]] = saturate_u8(sum);
            }
            if channels == 4 {
                output[[y, x, 3]] = input[[y, x, 3]];
            }
        }
    }

    output
}

/// Kernel used to sharpen pencil lines:
///
/// ```text
///  0  -1   0
/// -1  4+s -1
///  0  -1   0
/// ```
///
/// The weights sum to `s`, so flat regions are scaled by the strength.
pub fn sketch_sharpen_kernel(strength: f32) -> [[f32; 3]; 3] {
    [
        [0.0, -1.0, 0.0],
        [-1.0, 4.0 + strength, -1.0],
        [0.0, -1.0, 0.0],
    ]
}

/// Sharpen sketch lines - u8 version.
///
/// A strength of 0 (or below) returns a copy of the input.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `strength` - Sharpen strength (0.0-3.0)
///
/// # Returns
/// Sharpened image with same channel count
pub fn sharpen_sketch_u8(input: ArrayView3<u8>, strength: f32) -> Array3<u8> {
    if strength <= 0.0 {
        return input.to_owned();
    }
    filter_3x3_u8(input, &sketch_sharpen_kernel(strength))
}
