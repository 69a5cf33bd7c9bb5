//! Filter modules for the sketch styles.
//!
//! ## Supported Formats
//!
//! Filters operate on `(height, width, channels)` `u8` arrays:
//!
//! | Format | Shape | Description |
//! |--------|-------|-------------|
//! | Grayscale8 | (H, W, 1) | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | RGB + alpha, 0-255 |
//!
//! Channel count is inferred from input array dimensions.
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Input is borrowed as a view, a new array is returned
//! - **Alpha preservation** - Per-pixel filters keep alpha; neighborhood color filters drop it
//! - **Thread-safe** - Neighborhood filters use rayon over output rows
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: grayscale, invert, linear contrast
//! - **Blend**: color dodge, multiply, mask
//! - **Neighborhood**: gaussian blur, median, bilateral, 3x3 sharpen
//! - **Tonal**: CLAHE
//! - **Stylize**: local mean, adaptive threshold

pub mod core;
pub mod grayscale;
pub mod color_adjust;
pub mod blend;
pub mod blur;
pub mod noise;
pub mod sharpen;
pub mod histogram;
pub mod stylize;
