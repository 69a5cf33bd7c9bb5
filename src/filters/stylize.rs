//! Stylize filters: Local Mean, Adaptive Threshold.
//!
//! The adaptive threshold is what turns a grayscale photo into the bold
//! outline mask of the cartoon style.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) only

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::replicate;

/// Mean of the `block_size` x `block_size` neighborhood of every pixel,
/// rounded to 8 bits. Borders replicate the edge pixel.
pub fn box_mean_u8(input: ArrayView3<u8>, block_size: usize) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let half = (block_size / 2) as isize;
    let area = ((2 * half + 1) * (2 * half + 1)) as f32;

    // Horizontal sums
    let mut rows = vec![0u32; height * width];
    rows.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                *out = (-half..=half)
                    .map(|d| input[[y, replicate(x as isize + d, width), 0]] as u32)
                    .sum();
            }
        });

    // Vertical sums, then normalize
    let mut output = vec![0u8; height * width];
    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let sum: u32 = (-half..=half)
                    .map(|d| rows[replicate(y as isize + d, height) * width + x])
                    .sum();
                *out = (sum as f32 / area).round().min(255.0) as u8;
            }
        });

    Array3::from_shape_vec((height, width, 1), output).expect("Shape mismatch in box_mean_u8")
}

/// Apply adaptive mean threshold - u8 version.
///
/// A pixel becomes `max_value` when it is brighter than its local mean minus
/// `offset`, and 0 otherwise. Dark outlines therefore come out as 0.
///
/// # Arguments
/// * `input` - Single-channel image (height, width, 1)
/// * `block_size` - Neighborhood size (odd, >= 3)
/// * `offset` - Constant subtracted from the local mean
/// * `max_value` - Value assigned to pixels that pass
///
/// # Returns
/// Binary single-channel image
pub fn adaptive_threshold_mean_u8(
    input: ArrayView3<u8>,
    block_size: usize,
    offset: i32,
    max_value: u8,
) -> Array3<u8> {
    let mean = box_mean_u8(input, block_size.max(3) | 1);
    let (height, width, _) = input.dim();

    Array3::from_shape_fn((height, width, 1), |(y, x, _)| {
        if input[[y, x, 0]] as i32 > mean[[y, x, 0]] as i32 - offset {
            max_value
        } else {
            0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_mean_flat() {
        let img = Array3::<u8>::from_elem((6, 6, 1), 77);
        let result = box_mean_u8(img.view(), 9);
        assert!(result.iter().all(|&v| v == 77));
    }

    #[test]
    fn test_box_mean_small_block() {
        let mut img = Array3::<u8>::zeros((3, 3, 1));
        img[[1, 1, 0]] = 90;
        let result = box_mean_u8(img.view(), 3);
        assert_eq!(result[[1, 1, 0]], 10);
    }

    #[test]
    fn test_threshold_flat_passes() {
        let img = Array3::<u8>::from_elem((10, 10, 1), 128);
        let result = adaptive_threshold_mean_u8(img.view(), 9, 9, 255);
        assert!(result.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_threshold_marks_dark_line() {
        let mut img = Array3::<u8>::from_elem((15, 15, 1), 200);
        for y in 0..15 {
            img[[y, 7, 0]] = 20;
        }

        let result = adaptive_threshold_mean_u8(img.view(), 9, 9, 255);
        assert_eq!(result[[7, 7, 0]], 0);
        assert_eq!(result[[7, 0, 0]], 255);
        assert_eq!(result[[7, 6, 0]], 255);
    }

    #[test]
    fn test_threshold_offset_monotonic() {
        let img = Array3::from_shape_fn((20, 20, 1), |(y, x, _)| ((x * 37 + y * 91) % 256) as u8);

        let suppressed = |offset: i32| {
            adaptive_threshold_mean_u8(img.view(), 9, offset, 255)
                .iter()
                .filter(|&&v| v == 0)
                .count()
        };

        assert!(suppressed(0) >= suppressed(5));
        assert!(suppressed(5) >= suppressed(9));
        assert!(suppressed(9) >= suppressed(30));
    }
}
