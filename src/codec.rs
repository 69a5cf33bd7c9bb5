//! Upload decoding and PNG download encoding.
//!
//! Uploads are limited to JPEG and PNG and always decode to RGB.
//! Downloads are PNG, which is lossless: `decode_png(encode_png(x)) == x`
//! for 1, 3 and 4 channel images.

use std::io::Cursor;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{
    ColorType, DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageFormat,
    ImageReader,
};
use ndarray::{Array3, ArrayView3};

use crate::error::{SketchError, SketchResult};
use crate::filters::core::ensure_non_empty;

/// Download name for a sketched upload.
pub const SKETCH_FILE_NAME: &str = "sketch.png";
/// Download name for a webcam snapshot.
pub const SNAPSHOT_FILE_NAME: &str = "webcam_sketch.png";

/// File extensions the upload control accepts.
pub const UPLOAD_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Whether a file name carries one of the accepted upload extensions.
pub fn is_supported_upload(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            UPLOAD_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

fn into_array(width: u32, height: u32, channels: usize, raw: Vec<u8>) -> SketchResult<Array3<u8>> {
    Array3::from_shape_vec((height as usize, width as usize, channels), raw)
        .map_err(|e| SketchError::invalid_image(e.to_string()))
}

/// Decode an uploaded JPEG or PNG into an RGB image.
///
/// The format is detected from the data, not from a file name. An EXIF
/// orientation tag is applied, so camera portraits come out upright.
pub fn decode_upload(bytes: &[u8]) -> SketchResult<Array3<u8>> {
    let format = image::guess_format(bytes)
        .map_err(|_| SketchError::UnsupportedFormat("unrecognized image data".to_string()))?;

    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(SketchError::UnsupportedFormat(format!("{format:?}")));
    }

    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format).into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut decoded = DynamicImage::from_decoder(decoder)?;
    decoded.apply_orientation(orientation);

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(SketchError::invalid_image("decoded image is empty"));
    }

    log::debug!("decoded {format:?} upload {width}x{height}");
    into_array(width, height, 3, rgb.into_raw())
}

/// Encode a 1, 3 or 4 channel image as PNG bytes.
pub fn encode_png(image: ArrayView3<u8>) -> SketchResult<Vec<u8>> {
    ensure_non_empty(&image)?;
    let (height, width, channels) = image.dim();

    let color_type = match channels {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        other => {
            return Err(SketchError::invalid_image(format!(
                "cannot encode {other} channels as PNG"
            )))
        }
    };

    // Logical order, whatever the memory layout of the view
    let raw: Vec<u8> = image.iter().copied().collect();

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&raw, width as u32, height as u32, color_type)
        .map_err(|e| SketchError::Encode(e.to_string()))?;

    Ok(bytes)
}

/// Decode PNG bytes, keeping gray images single-channel.
pub fn decode_png(bytes: &[u8]) -> SketchResult<Array3<u8>> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    let (width, height) = (decoded.width(), decoded.height());

    match decoded.color() {
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16 => {
            into_array(width, height, 1, decoded.to_luma8().into_raw())
        }
        color if color.has_alpha() => into_array(width, height, 4, decoded.to_rgba8().into_raw()),
        _ => into_array(width, height, 3, decoded.to_rgb8().into_raw()),
    }
}

/// Expand a 1 or 3 channel image to opaque RGBA, as a canvas expects.
pub fn to_rgba_u8(image: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = image.dim();
    Array3::from_shape_fn((height, width, 4), |(y, x, c)| match (channels, c) {
        (_, 3) if channels < 4 => 255,
        (1, _) => image[[y, x, 0]],
        _ => image[[y, x, c]],
    })
}

/// Encode an image as PNG and write it to `path`.
pub fn save_png(image: ArrayView3<u8>, path: impl AsRef<Path>) -> SketchResult<()> {
    let path = path.as_ref();
    std::fs::write(path, encode_png(image)?)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
