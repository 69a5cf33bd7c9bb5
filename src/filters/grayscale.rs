//! Grayscale conversion filter.
//!
//! Uses ITU-R BT.601 luma coefficients, the weighting photo pipelines
//! apply when collapsing camera frames and uploads to a single channel.
//!
//! ## Formats
//!
//! - **to gray**: RGB (H, W, 3) or RGBA (H, W, 4) in, (H, W, 1) out. Alpha is ignored.
//! - **to color**: (H, W, 1) in, (H, W, 3) out with R=G=B.

use ndarray::{Array3, ArrayView3};

/// ITU-R BT.601 luma coefficients
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Luma of a single RGB triple, rounded to the nearest level.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}

/// Convert RGB/RGBA u8 image to a single luminance channel.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 3 or 4)
///
/// # Returns
/// Array of shape (height, width, 1)
pub fn to_gray_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, 1));

    for y in 0..height {
        for x in 0..width {
            output[[y, x, 0]] = luma_u8(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
        }
    }

    output
}

/// Replicate a single-channel image into three identical channels.
pub fn gray_to_rgb_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, _) = input.dim();
    Array3::from_shape_fn((height, width, 3), |(y, x, _)| input[[y, x, 0]])
}
