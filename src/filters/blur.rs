//! Gaussian blur with an explicit kernel size.
//!
//! Uses separable 2-pass convolution, parallelized over rows with Rayon.
//! Borders are reflected without repeating the edge pixel. Works on any
//! channel count; every channel is blurred independently.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::{gaussian_kernel_1d, reflect101, saturate_u8};

/// Apply Gaussian blur - u8 version.
///
/// # Arguments
/// * `input` - Image with any channel count (height, width, channels)
/// * `ksize` - Kernel size; must be odd. A size of 1 returns a copy.
///
/// # Returns
/// Blurred image with same dimensions
pub fn gaussian_blur_u8(input: ArrayView3<u8>, ksize: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if ksize <= 1 || height == 0 || width == 0 {
        return input.to_owned();
    }

    let kernel = gaussian_kernel_1d(ksize);
    let half = (kernel.len() / 2) as isize;

    // Horizontal pass (f32 for precision)
    let mut temp = vec![0.0f32; height * width * channels];
    temp.par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        let sx = reflect101(x as isize + ki as isize - half, width);
                        sum += input[[y, sx, c]] as f32 * kv;
                    }
                    row[x * channels + c] = sum;
                }
            }
        });

    // Vertical pass
    let row_len = width * channels;
    let mut output = vec![0u8; height * width * channels];
    output
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        let sy = reflect101(y as isize + ki as isize - half, height);
                        sum += temp[sy * row_len + x * channels + c] * kv;
                    }
                    row[x * channels + c] = saturate_u8(sum);
                }
            }
        });

    Array3::from_shape_vec((height, width, channels), output)
        .expect("Shape mismatch in gaussian_blur_u8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_flat_stays_flat() {
        let img = Array3::<u8>::from_elem((12, 9, 1), 127);
        let result = gaussian_blur_u8(img.view(), 21);
        assert!(result.iter().all(|&v| v == 127));
    }

    #[test]
    fn test_blur_ksize_one_is_identity() {
        let img = Array3::from_shape_fn((4, 5, 3), |(y, x, c)| (y * 20 + x * 7 + c) as u8);
        let result = gaussian_blur_u8(img.view(), 1);
        assert_eq!(result, img);
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut img = Array3::<u8>::zeros((9, 9, 1));
        img[[4, 4, 0]] = 255;

        let result = gaussian_blur_u8(img.view(), 5);

        assert!(result[[4, 4, 0]] < 255);
        assert!(result[[4, 5, 0]] > 0);
        assert!(result[[3, 4, 0]] > 0);
        // Symmetric
        assert_eq!(result[[4, 3, 0]], result[[4, 5, 0]]);
        assert_eq!(result[[0, 0, 0]], 0);
    }

    #[test]
    fn test_blur_preserves_shape() {
        let img = Array3::<u8>::zeros((3, 7, 3));
        let result = gaussian_blur_u8(img.view(), 9);
        assert_eq!(result.dim(), (3, 7, 3));
    }
}
