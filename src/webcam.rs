//! Live webcam sketching.
//!
//! A [`WebcamSession`] owns a [`FrameSource`] for its whole run: it reads a
//! frame, mirrors it, renders it with the current parameters and hands the
//! result to a [`FrameSink`], until the [`StopToken`] is cancelled, a
//! [`SessionCommand::Stop`] arrives, or the device fails. The source is
//! dropped when the run ends, which releases the device on every path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError};
use ndarray::{Array3, ArrayView3};

use crate::codec::encode_png;
use crate::error::SketchResult;
use crate::params::FilterParameters;
use crate::pipeline::render;

/// A device that produces RGB or RGBA frames.
pub trait FrameSource {
    fn read_frame(&mut self) -> SketchResult<Array3<u8>>;
}

/// Receives rendered frames and snapshot PNGs.
pub trait FrameSink {
    fn show(&mut self, frame: &Array3<u8>) -> SketchResult<()>;
    fn snapshot(&mut self, png: Vec<u8>) -> SketchResult<()>;
}

/// Shared stop flag, checked before every frame read.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    UpdateParameters(FilterParameters),
    /// Encode the next rendered frame as PNG and pass it to the sink.
    Snapshot,
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    Cancelled,
    DeviceFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub snapshots: u64,
    pub reason: StopReason,
}

/// Flip a frame left to right.
pub fn mirror_horizontal(frame: ArrayView3<u8>) -> Array3<u8> {
    frame.slice(ndarray::s![.., ..;-1, ..]).to_owned()
}

pub struct WebcamSession<S: FrameSource> {
    source: S,
    params: FilterParameters,
    stop: StopToken,
    commands: Option<Receiver<SessionCommand>>,
}

impl<S: FrameSource> WebcamSession<S> {
    pub fn new(source: S, params: FilterParameters, stop: StopToken) -> Self {
        Self {
            source,
            params,
            stop,
            commands: None,
        }
    }

    pub fn with_commands(mut self, commands: Receiver<SessionCommand>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Apply pending commands. Returns the number of snapshots requested.
    fn drain_commands(&mut self) -> u64 {
        let Some(commands) = &self.commands else {
            return 0;
        };

        let mut snapshots = 0;
        loop {
            match commands.try_recv() {
                Ok(SessionCommand::UpdateParameters(params)) => {
                    log::debug!("webcam parameters updated: {params:?}");
                    self.params = params;
                }
                Ok(SessionCommand::Snapshot) => snapshots += 1,
                Ok(SessionCommand::Stop) => self.stop.cancel(),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.commands = None;
                    break;
                }
            }
        }
        snapshots
    }

    /// Run the read-render-show loop until stopped.
    ///
    /// Device read failures end the loop normally and are reported in the
    /// summary. Render and sink failures are returned as errors. The source
    /// is released in both cases.
    pub fn run<K: FrameSink>(mut self, sink: &mut K) -> SketchResult<SessionSummary> {
        log::info!("webcam session started ({} / {})", self.params.style, self.params.color_mode);

        let mut frames = 0u64;
        let mut snapshots = 0u64;
        let mut pending_snapshots = 0u64;

        let reason = loop {
            pending_snapshots += self.drain_commands();
            if self.stop.is_cancelled() {
                break StopReason::Cancelled;
            }

            let frame = match self.source.read_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Could not access webcam: {e}");
                    break StopReason::DeviceFailed(e.to_string());
                }
            };

            let mirrored = mirror_horizontal(frame.view());
            let sketch = render(&self.params, mirrored.view())?;
            sink.show(&sketch)?;
            frames += 1;

            if pending_snapshots > 0 {
                sink.snapshot(encode_png(sketch.view())?)?;
                snapshots += 1;
                pending_snapshots = 0;
            }
        };

        log::info!("webcam session ended after {frames} frames: {reason:?}");
        Ok(SessionSummary {
            frames,
            snapshots,
            reason,
        })
    }
}
