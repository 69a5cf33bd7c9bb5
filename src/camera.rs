//! Native webcam frames through nokhwa.

use ndarray::Array3;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;

use crate::config::CameraSettings;
use crate::error::{SketchError, SketchResult};
use crate::webcam::FrameSource;

/// An opened camera stream producing RGB frames.
///
/// The stream is stopped when the source is dropped.
pub struct NokhwaSource {
    camera: Camera,
}

impl NokhwaSource {
    pub fn open(settings: &CameraSettings) -> SketchResult<Self> {
        let index = CameraIndex::Index(settings.index);
        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let mut camera = Camera::new(index, format)
            .map_err(|e| SketchError::Camera(format!("cannot open camera {}: {e}", settings.index)))?;

        if let Err(e) = camera.set_resolution(Resolution::new(settings.width, settings.height)) {
            log::warn!(
                "camera set resolution ({} x {}) failed: {e}",
                settings.width,
                settings.height
            );
        }

        camera
            .open_stream()
            .map_err(|e| SketchError::Camera(format!("cannot start stream: {e}")))?;

        log::info!(
            "Camera opened: {} ({}x{})",
            camera.info().human_name(),
            camera.resolution().width(),
            camera.resolution().height()
        );

        Ok(Self { camera })
    }
}

impl FrameSource for NokhwaSource {
    fn read_frame(&mut self) -> SketchResult<Array3<u8>> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| SketchError::Camera(e.to_string()))?;
        let image = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| SketchError::Camera(e.to_string()))?;

        let (width, height) = (image.width() as usize, image.height() as usize);
        Array3::from_shape_vec((height, width, 3), image.into_raw())
            .map_err(|e| SketchError::Camera(e.to_string()))
    }
}

impl Drop for NokhwaSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("camera stop failed: {e}");
        }
    }
}
