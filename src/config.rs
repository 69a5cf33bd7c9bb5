//! JSON configuration for the command-line tool.
//!
//! Every field is optional; missing fields take their defaults, so `{}` is a
//! valid configuration file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};
use crate::params::FilterParameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Device index as enumerated by the platform backend.
    pub index: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub parameters: FilterParameters,
    pub camera: CameraSettings,
    /// Where webcam snapshots are written; the working directory if unset.
    pub snapshot_dir: Option<PathBuf>,
}

impl SketchConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> SketchResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SketchError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> SketchResult<()> {
        self.parameters.validate()?;
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(SketchError::Config(format!(
                "camera resolution must be non-zero, got {}x{}",
                self.camera.width, self.camera.height
            )));
        }
        Ok(())
    }

    /// Directory for webcam snapshots.
    pub fn snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
