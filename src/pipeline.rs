//! Rendering entry point and the event-driven controller.
//!
//! [`render`] maps one parameter set and one input image to one output
//! image and keeps no state between calls. [`SketchController`] owns the
//! current parameters and source image and re-renders whenever an event
//! changes either of them; [`run_event_loop`] feeds it from a channel.

use std::time::Instant;

use crossbeam_channel::Receiver;
use ndarray::{Array3, ArrayView3};

use crate::codec::{decode_upload, encode_png};
use crate::error::{SketchError, SketchResult};
use crate::params::{ColorMode, FilterParameters, Style};
use crate::sketch::{cartoon_sketch, color_pencil_sketch, colorize, pencil_sketch};

/// Render one image with one parameter set.
///
/// # Arguments
/// * `params` - Style, color mode and slider values
/// * `input` - RGB or RGBA image (height, width, 3 or 4)
///
/// # Returns
/// `(height, width, 1)` for a grayscale pencil sketch, `(height, width, 3)` otherwise
pub fn render(params: &FilterParameters, input: ArrayView3<u8>) -> SketchResult<Array3<u8>> {
    params.validate()?;
    let started = Instant::now();

    let blur = params.blur_kernel_size;
    let contrast = params.contrast_gain;
    let sharpen = params.sharpen_strength;

    let mut output = match params.style {
        Style::Pencil => pencil_sketch(input, blur, contrast, sharpen)?,
        Style::ColorPencil => color_pencil_sketch(input, blur, contrast, sharpen)?,
        Style::Cartoon => cartoon_sketch(input)?,
    };

    if params.color_mode == ColorMode::Color && params.style == Style::Pencil {
        output = colorize(output.view(), input)?;
    }

    let (height, width, _) = input.dim();
    log::debug!(
        "rendered {} ({}) {}x{} in {:?}",
        params.style,
        params.color_mode,
        width,
        height,
        started.elapsed()
    );

    Ok(output)
}

/// Something the host reports to the controller.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// Raw bytes of an uploaded JPEG or PNG file.
    ImageUploaded(Vec<u8>),
    ParametersChanged(FilterParameters),
    /// A camera frame; rendered without replacing the uploaded source.
    FrameTick(Array3<u8>),
    DownloadRequested,
}

/// What the host should present after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerOutput {
    Rendered(Array3<u8>),
    /// PNG bytes of the last rendered image.
    Download(Vec<u8>),
    /// Nothing to show yet (parameters changed before any upload).
    Idle,
}

#[derive(Debug, Default)]
pub struct SketchController {
    params: FilterParameters,
    source: Option<Array3<u8>>,
    last_output: Option<Array3<u8>>,
}

impl SketchController {
    pub fn new(params: FilterParameters) -> Self {
        Self {
            params,
            source: None,
            last_output: None,
        }
    }

    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    pub fn source(&self) -> Option<&Array3<u8>> {
        self.source.as_ref()
    }

    pub fn last_output(&self) -> Option<&Array3<u8>> {
        self.last_output.as_ref()
    }

    /// Handle one event. Errors leave the controller state unchanged.
    pub fn handle(&mut self, event: ControllerEvent) -> SketchResult<ControllerOutput> {
        match event {
            ControllerEvent::ImageUploaded(bytes) => {
                let image = decode_upload(&bytes)?;
                let output = render(&self.params, image.view())?;
                self.source = Some(image);
                Ok(self.publish(output))
            }
            ControllerEvent::ParametersChanged(params) => {
                params.validate()?;
                let output = match &self.source {
                    Some(source) => Some(render(&params, source.view())?),
                    None => None,
                };
                self.params = params;
                Ok(match output {
                    Some(output) => self.publish(output),
                    None => ControllerOutput::Idle,
                })
            }
            ControllerEvent::FrameTick(frame) => {
                let output = render(&self.params, frame.view())?;
                Ok(self.publish(output))
            }
            ControllerEvent::DownloadRequested => {
                let output = self.last_output.as_ref().ok_or(SketchError::NothingRendered)?;
                Ok(ControllerOutput::Download(encode_png(output.view())?))
            }
        }
    }

    fn publish(&mut self, output: Array3<u8>) -> ControllerOutput {
        self.last_output = Some(output.clone());
        ControllerOutput::Rendered(output)
    }
}

/// Drain events until every sender is dropped.
///
/// Each event's result goes to `on_output`; a failed event does not stop
/// the loop. Returns the number of events handled.
pub fn run_event_loop<F>(
    events: Receiver<ControllerEvent>,
    controller: &mut SketchController,
    mut on_output: F,
) -> usize
where
    F: FnMut(SketchResult<ControllerOutput>),
{
    let mut handled = 0;
    for event in events.iter() {
        let result = controller.handle(event);
        if let Err(e) = &result {
            log::warn!("event failed: {e}");
        }
        on_output(result);
        handled += 1;
    }
    handled
}
