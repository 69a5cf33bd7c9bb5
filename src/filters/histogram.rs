//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The image is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram; clipped counts
//! are redistributed over all bins so flat regions are not blown out.
//! Every output pixel is a bilinear blend of the four nearest tile tables.
//!
//! Images whose size is not a multiple of the grid are extended on the
//! bottom and right edges by reflection before tiling; the output keeps the
//! input size.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) only

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::{reflect101, saturate_u8};

const BINS: usize = 256;

/// Clip limit used by the pencil sketch styles.
pub const DEFAULT_CLIP_LIMIT: f32 = 2.0;
/// Tile grid used by the pencil sketch styles.
pub const DEFAULT_TILE_GRID: (usize, usize) = (8, 8);

/// Build the clipped, redistributed equalization table for one tile.
fn tile_lut(
    input: &ArrayView3<u8>,
    y0: usize,
    x0: usize,
    tile_h: usize,
    tile_w: usize,
    clip: u32,
) -> [u8; BINS] {
    let (height, width, _) = input.dim();
    let mut hist = [0u32; BINS];

    for ty in 0..tile_h {
        let sy = reflect101((y0 + ty) as isize, height);
        for tx in 0..tile_w {
            let sx = reflect101((x0 + tx) as isize, width);
            hist[input[[sy, sx, 0]] as usize] += 1;
        }
    }

    // Clip and count the excess
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    // Spread excess evenly, leftover one count at a time at a fixed stride
    let batch = excess / BINS as u32;
    let mut residual = (excess - batch * BINS as u32) as usize;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            i += step;
            residual -= 1;
        }
    }

    let scale = 255.0 / (tile_h * tile_w) as f32;
    let mut lut = [0u8; BINS];
    let mut cumulative = 0u32;
    for (i, v) in lut.iter_mut().enumerate() {
        cumulative += hist[i];
        *v = saturate_u8(cumulative as f32 * scale);
    }
    lut
}

/// Apply CLAHE - u8 version.
///
/// # Arguments
/// * `input` - Single-channel image (height, width, 1)
/// * `clip_limit` - Histogram clip limit relative to a uniform histogram (2.0 = twice the mean bin)
/// * `tiles` - Grid size as (tiles_y, tiles_x)
///
/// # Returns
/// Equalized single-channel image of the same size
pub fn clahe_u8(input: ArrayView3<u8>, clip_limit: f32, tiles: (usize, usize)) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let (tiles_y, tiles_x) = (tiles.0.max(1), tiles.1.max(1));
    if height == 0 || width == 0 {
        return input.to_owned();
    }

    // Extend to a multiple of the grid
    let padded_h = height.div_ceil(tiles_y) * tiles_y;
    let padded_w = width.div_ceil(tiles_x) * tiles_x;
    let tile_h = padded_h / tiles_y;
    let tile_w = padded_w / tiles_x;
    let tile_area = tile_h * tile_w;

    let clip = if clip_limit > 0.0 {
        ((clip_limit * tile_area as f32 / BINS as f32) as u32).max(1)
    } else {
        // No limit: nothing is ever clipped
        u32::MAX
    };

    let luts: Vec<[u8; BINS]> = (0..tiles_y * tiles_x)
        .into_par_iter()
        .map(|i| {
            let (ty, tx) = (i / tiles_x, i % tiles_x);
            tile_lut(&input, ty * tile_h, tx * tile_w, tile_h, tile_w, clip)
        })
        .collect();

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;

    let mut output = vec![0u8; height * width];
    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let tyf = y as f32 * inv_th - 0.5;
            let ty1 = tyf.floor() as isize;
            let ya = tyf - ty1 as f32;
            let ty2 = (ty1 + 1).min(tiles_y as isize - 1) as usize;
            let ty1 = ty1.max(0) as usize;

            for (x, out) in row.iter_mut().enumerate() {
                let txf = x as f32 * inv_tw - 0.5;
                let tx1 = txf.floor() as isize;
                let xa = txf - tx1 as f32;
                let tx2 = (tx1 + 1).min(tiles_x as isize - 1) as usize;
                let tx1 = tx1.max(0) as usize;

                let v = input[[y, x, 0]] as usize;
                let top = luts[ty1 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                    + luts[ty1 * tiles_x + tx2][v] as f32 * xa;
                let bottom = luts[ty2 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                    + luts[ty2 * tiles_x + tx2][v] as f32 * xa;

                *out = saturate_u8(top * (1.0 - ya) + bottom * ya);
            }
        });

    Array3::from_shape_vec((height, width, 1), output).expect("Shape mismatch in clahe_u8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clahe_flat_stays_flat() {
        let img = Array3::<u8>::from_elem((64, 64, 1), 120);
        let result = clahe_u8(img.view(), DEFAULT_CLIP_LIMIT, DEFAULT_TILE_GRID);
        let first = result[[0, 0, 0]];
        assert!(result.iter().all(|&v| v == first));
    }

    #[test]
    fn test_clahe_white_maps_to_white() {
        let img = Array3::<u8>::from_elem((40, 40, 1), 255);
        let result = clahe_u8(img.view(), DEFAULT_CLIP_LIMIT, DEFAULT_TILE_GRID);
        assert!(result.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_clahe_stretches_two_levels() {
        let img = Array3::from_shape_fn((16, 16, 1), |(_, x, _)| if x < 8 { 120 } else { 130 });
        let result = clahe_u8(img.view(), 40.0, (1, 1));
        let low = result[[0, 0, 0]] as i32;
        let high = result[[0, 15, 0]] as i32;
        assert!(high - low > 10, "expected stretch, got {low}..{high}");
    }

    #[test]
    fn test_clahe_non_multiple_size() {
        let img = Array3::from_shape_fn((13, 21, 1), |(y, x, _)| (x * 10 + y) as u8);
        let result = clahe_u8(img.view(), DEFAULT_CLIP_LIMIT, DEFAULT_TILE_GRID);
        assert_eq!(result.dim(), (13, 21, 1));
    }

    #[test]
    fn test_clahe_tiny_image() {
        let img = Array3::<u8>::from_elem((1, 1, 1), 42);
        let result = clahe_u8(img.view(), DEFAULT_CLIP_LIMIT, DEFAULT_TILE_GRID);
        assert_eq!(result.dim(), (1, 1, 1));
    }

    #[test]
    fn test_clahe_preserves_order() {
        // Equalization is monotonic within a tile
        let img = Array3::from_shape_fn((8, 8, 1), |(_, x, _)| (x * 30) as u8);
        let result = clahe_u8(img.view(), DEFAULT_CLIP_LIMIT, (1, 1));
        for x in 1..8 {
            assert!(result[[0, x, 0]] >= result[[0, x - 1, 0]]);
        }
    }
}
