//! `sketchstag` command-line tool.
//!
//! ```text
//! sketchstag sketch photo.jpg --style color-pencil -o sketch.png
//! sketchstag webcam --style cartoon --snapshots shots/
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sketchstag::codec::{decode_upload, is_supported_upload, save_png, SKETCH_FILE_NAME};
use sketchstag::config::SketchConfig;
use sketchstag::error::SketchResult;
use sketchstag::params::{ColorMode, Style};
use sketchstag::pipeline::render;

#[derive(Debug, Parser)]
#[command(name = "sketchstag", version, about = "Pencil sketch, color pencil and cartoon filters")]
struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    style: Option<Style>,

    #[arg(long, global = true)]
    color_mode: Option<ColorMode>,

    /// Gaussian kernel size (1-99, even values are bumped to odd)
    #[arg(long, global = true)]
    blur: Option<u32>,

    /// Contrast gain (0.5-3.0)
    #[arg(long, global = true)]
    contrast: Option<f32>,

    /// Line sharpening strength (0.0-3.0)
    #[arg(long, global = true)]
    sharpen: Option<f32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sketch a JPEG or PNG file
    Sketch {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sketch the webcam live; Enter takes a snapshot, Ctrl-C stops
    Webcam {
        /// Directory for snapshots
        #[arg(long)]
        snapshots: Option<PathBuf>,
    },
}

impl Cli {
    fn resolve_config(&self) -> SketchResult<SketchConfig> {
        let mut config = match &self.config {
            Some(path) => SketchConfig::load(path)?,
            None => SketchConfig::default(),
        };

        let params = &mut config.parameters;
        if let Some(style) = self.style {
            params.style = style;
        }
        if let Some(mode) = self.color_mode {
            params.color_mode = mode;
        }
        if let Some(blur) = self.blur {
            params.blur_kernel_size = blur;
        }
        if let Some(contrast) = self.contrast {
            params.contrast_gain = contrast;
        }
        if let Some(sharpen) = self.sharpen {
            params.sharpen_strength = sharpen;
        }
        config.parameters = config.parameters.clamped();

        if let Command::Webcam {
            snapshots: Some(dir),
        } = &self.command
        {
            config.snapshot_dir = Some(dir.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

fn sketch_file(config: &SketchConfig, input: &Path, output: Option<PathBuf>) -> SketchResult<()> {
    let name = input.display().to_string();
    if !is_supported_upload(&name) {
        log::warn!("{name} does not have a jpg/jpeg/png extension, trying anyway");
    }

    let bytes = std::fs::read(input)?;
    let image = decode_upload(&bytes)?;
    let sketch = render(&config.parameters, image.view())?;

    let output = output.unwrap_or_else(|| PathBuf::from(SKETCH_FILE_NAME));
    save_png(sketch.view(), &output)?;
    println!("{}: {}", config.parameters.style.caption(), output.display());
    Ok(())
}

#[cfg(feature = "camera")]
mod live {
    use std::io::BufRead;
    use std::path::PathBuf;

    use ndarray::Array3;

    use sketchstag::camera::NokhwaSource;
    use sketchstag::codec::SNAPSHOT_FILE_NAME;
    use sketchstag::config::SketchConfig;
    use sketchstag::error::SketchResult;
    use sketchstag::webcam::{FrameSink, SessionCommand, StopReason, StopToken, WebcamSession};

    /// Writes snapshots to disk and reports progress in the log.
    struct SnapshotWriter {
        dir: PathBuf,
        frames: u64,
        written: u64,
    }

    impl FrameSink for SnapshotWriter {
        fn show(&mut self, frame: &Array3<u8>) -> SketchResult<()> {
            self.frames += 1;
            if self.frames % 100 == 0 {
                let (height, width, _) = frame.dim();
                log::info!("{} frames ({width}x{height})", self.frames);
            }
            Ok(())
        }

        fn snapshot(&mut self, png: Vec<u8>) -> SketchResult<()> {
            self.written += 1;
            let path = if self.written == 1 {
                self.dir.join(SNAPSHOT_FILE_NAME)
            } else {
                self.dir.join(format!("webcam_sketch_{}.png", self.written))
            };
            std::fs::write(&path, png)?;
            println!("snapshot: {}", path.display());
            Ok(())
        }
    }

    pub fn run(config: &SketchConfig) -> SketchResult<()> {
        let dir = config.snapshot_dir();
        std::fs::create_dir_all(&dir)?;

        let stop = StopToken::new();
        {
            let stop = stop.clone();
            if let Err(err) = ctrlc::set_handler(move || stop.cancel()) {
                log::warn!("Failed to install Ctrl+C handler: {err}");
            }
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if line.is_err() || tx.send(SessionCommand::Snapshot).is_err() {
                    break;
                }
            }
        });

        let source = NokhwaSource::open(&config.camera)?;
        let mut sink = SnapshotWriter {
            dir,
            frames: 0,
            written: 0,
        };

        println!("{} - press Enter for a snapshot, Ctrl+C to stop", config.parameters.style.caption());
        let summary = WebcamSession::new(source, config.parameters, stop)
            .with_commands(rx)
            .run(&mut sink)?;

        if let StopReason::DeviceFailed(reason) = &summary.reason {
            eprintln!("Could not access webcam: {reason}");
        }
        println!("{} frames, {} snapshots", summary.frames, summary.snapshots);
        Ok(())
    }
}

#[cfg(feature = "camera")]
fn webcam(config: &SketchConfig) -> SketchResult<()> {
    live::run(config)
}

#[cfg(not(feature = "camera"))]
fn webcam(_config: &SketchConfig) -> SketchResult<()> {
    Err(sketchstag::SketchError::Camera(
        "built without the `camera` feature".to_string(),
    ))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = cli.resolve_config().and_then(|config| match cli.command {
        Command::Sketch { ref input, ref output } => sketch_file(&config, input, output.clone()),
        Command::Webcam { .. } => webcam(&config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
