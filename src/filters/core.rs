//! Core utilities for image processing filters.
//!
//! This module provides shared functionality used by multiple filters:
//! - Border index handling (reflect-101 and replicate)
//! - Gaussian kernel generation from a kernel size
//! - Input shape validation
//! - 8-bit saturation

use ndarray::ArrayView3;

use crate::error::{SketchError, SketchResult};

/// Map an out-of-range coordinate back into `0..n` by mirroring without
/// repeating the edge pixel (`dcb|abcd|cba`).
#[inline]
pub fn reflect101(i: isize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let last = n as isize - 1;
    let mut i = i;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

/// Clamp an out-of-range coordinate to the nearest edge (`aaa|abcd|ddd`).
#[inline]
pub fn replicate(i: isize, n: usize) -> usize {
    i.clamp(0, n as isize - 1) as usize
}

/// Round half to even and saturate to the u8 range.
#[inline]
pub fn saturate_u8(v: f32) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Gaussian sigma implied by a kernel size when none is given.
pub fn sigma_for_kernel_size(ksize: usize) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Binomial kernels used instead of sampling when the size is at most 7.
const SMALL_GAUSSIAN_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.015625, 0.09375, 0.234375, 0.3125, 0.234375, 0.09375, 0.015625,
    ],
];

/// Generate a normalized 1D Gaussian kernel of exactly `ksize` taps.
///
/// Sizes 1, 3, 5 and 7 use fixed binomial taps; larger sizes sample a
/// Gaussian with [`sigma_for_kernel_size`].
///
/// # Arguments
/// * `ksize` - Kernel size (odd, >= 1)
///
/// # Returns
/// Normalized kernel as Vec<f32>
pub fn gaussian_kernel_1d(ksize: usize) -> Vec<f32> {
    if ksize <= 7 && ksize % 2 == 1 {
        return SMALL_GAUSSIAN_KERNELS[ksize / 2].to_vec();
    }
    if ksize <= 1 {
        return vec![1.0];
    }

    let sigma = sigma_for_kernel_size(ksize);
    let half = (ksize / 2) as f32;

    let mut kernel: Vec<f32> = (0..ksize)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Check that an image has non-zero size.
pub fn ensure_non_empty<T>(input: &ArrayView3<T>) -> SketchResult<()> {
    let (height, width, channels) = input.dim();
    if height == 0 || width == 0 || channels == 0 {
        return Err(SketchError::invalid_image(format!(
            "image has empty shape ({height}, {width}, {channels})"
        )));
    }
    Ok(())
}

/// Check that an image is a non-empty RGB or RGBA image.
pub fn ensure_color(input: &ArrayView3<u8>) -> SketchResult<()> {
    ensure_non_empty(input)?;
    let channels = input.dim().2;
    if channels != 3 && channels != 4 {
        return Err(SketchError::invalid_image(format!(
            "expected 3 or 4 channels, got {channels}"
        )));
    }
    Ok(())
}

/// Check that an image is a non-empty single-channel image.
pub fn ensure_gray(input: &ArrayView3<u8>) -> SketchResult<()> {
    ensure_non_empty(input)?;
    let channels = input.dim().2;
    if channels != 1 {
        return Err(SketchError::invalid_image(format!(
            "expected 1 channel, got {channels}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_reflect101() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(2, 5), 2);
        // Far outside still lands inside
        assert!(reflect101(-40, 3) < 3);
        assert!(reflect101(40, 3) < 3);
        assert_eq!(reflect101(-7, 1), 0);
    }

    #[test]
    fn test_replicate() {
        assert_eq!(replicate(-3, 4), 0);
        assert_eq!(replicate(9, 4), 3);
        assert_eq!(replicate(2, 4), 2);
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        for ksize in [1usize, 3, 5, 21, 99] {
            let kernel = gaussian_kernel_1d(ksize);
            assert_eq!(kernel.len(), ksize);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_gaussian_kernel_symmetric_peak() {
        let kernel = gaussian_kernel_1d(7);
        assert!((kernel[0] - kernel[6]).abs() < 1e-6);
        assert!(kernel[3] > kernel[2]);
    }

    #[test]
    fn test_gaussian_kernel_small_sizes_are_binomial() {
        assert_eq!(gaussian_kernel_1d(1), vec![1.0]);
        assert_eq!(gaussian_kernel_1d(3), vec![0.25, 0.5, 0.25]);
        assert_eq!(
            gaussian_kernel_1d(5),
            vec![1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0]
        );
        let seven: Vec<f32> = [1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0]
            .iter()
            .map(|v| v / 64.0)
            .collect();
        assert_eq!(gaussian_kernel_1d(7), seven);
    }

    #[test]
    fn test_saturate_rounds_half_to_even() {
        assert_eq!(saturate_u8(50.5), 50);
        assert_eq!(saturate_u8(51.5), 52);
        assert_eq!(saturate_u8(-3.0), 0);
        assert_eq!(saturate_u8(300.0), 255);
    }

    #[test]
    fn test_sigma_for_kernel_size() {
        // ksize 3 -> 0.8
        assert!((sigma_for_kernel_size(3) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_ensure_color() {
        let rgb = Array3::<u8>::zeros((2, 2, 3));
        assert!(ensure_color(&rgb.view()).is_ok());
        let gray = Array3::<u8>::zeros((2, 2, 1));
        assert!(ensure_color(&gray.view()).is_err());
        let empty = Array3::<u8>::zeros((0, 2, 3));
        assert!(ensure_color(&empty.view()).is_err());
    }
}
