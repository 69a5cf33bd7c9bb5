//! SketchStag
//!
//! Turns photos and webcam frames into pencil sketches, color pencil
//! sketches and cartoons. The core is a pure render function over ndarray
//! images, with Python bindings via PyO3, WASM bindings for JavaScript and
//! a command-line front end.
//!
//! ## Image Format
//! Inputs are `(height, width, channels)` `u8` arrays:
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4) - alpha is ignored by the sketch styles
//!
//! Outputs are `(height, width, 1)` for a grayscale pencil sketch and
//! `(height, width, 3)` RGB for everything else.
//!
//! ## Example
//! ```
//! use ndarray::Array3;
//! use sketchstag::{render, FilterParameters, Style, ColorMode};
//!
//! let photo = Array3::<u8>::from_elem((32, 32, 3), 128);
//! let params = FilterParameters::new(Style::ColorPencil, ColorMode::Color);
//! let sketch = render(&params, photo.view()).unwrap();
//! assert_eq!(sketch.dim(), (32, 32, 3));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod filters;
pub mod params;
pub mod pipeline;
pub mod sketch;
pub mod webcam;

#[cfg(feature = "camera")]
pub mod camera;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use codec::{decode_upload, encode_png};
pub use config::SketchConfig;
pub use error::{SketchError, SketchResult};
pub use params::{make_odd, ColorMode, FilterParameters, Style};
pub use pipeline::{render, ControllerEvent, ControllerOutput, SketchController};
pub use webcam::{FrameSink, FrameSource, StopToken, WebcamSession};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use pyo3::types::PyBytes;

    use crate::error::SketchError;
    use crate::params::{ColorMode, FilterParameters, Style};

    fn to_py_err(e: SketchError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render a sketch of an RGB or RGBA uint8 image.
    ///
    /// # Arguments
    /// * `image` - Input image (height, width, 3 or 4)
    /// * `style` - "pencil", "color_pencil" or "cartoon"
    /// * `color_mode` - "grayscale" or "color"
    /// * `blur` - Gaussian kernel size (even values are bumped to odd)
    /// * `contrast` - Gain applied after equalization
    /// * `sharpen` - Line sharpening strength, 0 disables it
    ///
    /// # Returns
    /// (height, width, 1) for a grayscale pencil sketch, (height, width, 3) otherwise
    #[pyfunction]
    #[pyo3(signature = (image, style="pencil", color_mode="grayscale", blur=21, contrast=1.0, sharpen=1.0))]
    pub fn render_sketch<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        style: &str,
        color_mode: &str,
        blur: u32,
        contrast: f32,
        sharpen: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let params = FilterParameters::new(
            style.parse::<Style>().map_err(to_py_err)?,
            color_mode.parse::<ColorMode>().map_err(to_py_err)?,
        )
        .with_blur(blur)
        .with_contrast(contrast)
        .with_sharpen(sharpen);

        let result = crate::pipeline::render(&params, image.as_array()).map_err(to_py_err)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Codec
    // ========================================================================

    /// Encode a 1, 3 or 4 channel uint8 image as PNG bytes.
    #[pyfunction]
    pub fn encode_png<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = crate::codec::encode_png(image.as_array()).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// Decode uploaded JPEG or PNG bytes into an RGB uint8 image.
    #[pyfunction]
    pub fn decode_upload<'py>(
        py: Python<'py>,
        data: &[u8],
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = crate::codec::decode_upload(data).map_err(to_py_err)?;
        Ok(image.into_pyarray(py))
    }

    /// Bump a kernel size to the next odd value.
    #[pyfunction]
    pub fn make_odd(value: u32) -> u32 {
        crate::params::make_odd(value)
    }

    // ========================================================================
    // Module Registration
    // ========================================================================

    #[pymodule]
    pub fn sketchstag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(render_sketch, m)?)?;
        m.add_function(wrap_pyfunction!(encode_png, m)?)?;
        m.add_function(wrap_pyfunction!(decode_upload, m)?)?;
        m.add_function(wrap_pyfunction!(make_odd, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::sketchstag;
