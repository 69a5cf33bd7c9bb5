//! WebAssembly exports for the sketch pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat RGBA bytes, the layout of canvas `ImageData`.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::codec::{encode_png, to_rgba_u8};
use crate::error::{SketchError, SketchResult};
use crate::params::{make_odd, ColorMode, FilterParameters, Style};
use crate::pipeline::render;

fn to_js(e: SketchError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn rgba_array(data: &[u8], width: usize, height: usize) -> SketchResult<Array3<u8>> {
    Array3::from_shape_vec((height, width, 4), data.to_vec()).map_err(|_| {
        SketchError::invalid_image(format!(
            "expected {} RGBA bytes for {width}x{height}, got {}",
            width * height * 4,
            data.len()
        ))
    })
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a sketch of a canvas image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `style` - "pencil", "color_pencil" or "cartoon"
/// * `color_mode` - "grayscale" or "color"
/// * `blur` - Gaussian kernel size
/// * `contrast` - Gain applied after equalization
/// * `sharpen` - Line sharpening strength
///
/// # Returns
/// Flat array of opaque RGBA bytes, same size as the input
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn render_sketch_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    style: &str,
    color_mode: &str,
    blur: u32,
    contrast: f32,
    sharpen: f32,
) -> Result<Vec<u8>, JsValue> {
    let input = rgba_array(data, width, height).map_err(to_js)?;
    let params = FilterParameters::new(
        style.parse::<Style>().map_err(to_js)?,
        color_mode.parse::<ColorMode>().map_err(to_js)?,
    )
    .with_blur(blur)
    .with_contrast(contrast)
    .with_sharpen(sharpen);

    let result = render(&params, input.view()).map_err(to_js)?;
    Ok(to_rgba_u8(result.view()).into_raw_vec_and_offset().0)
}

// ============================================================================
// Download
// ============================================================================

/// Encode canvas RGBA bytes as a PNG file.
#[wasm_bindgen]
pub fn encode_png_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let input = rgba_array(data, width, height).map_err(to_js)?;
    encode_png(input.view()).map_err(to_js)
}

/// Bump a blur slider value to the odd kernel size actually used.
#[wasm_bindgen]
pub fn make_odd_wasm(value: u32) -> u32 {
    make_odd(value)
}
