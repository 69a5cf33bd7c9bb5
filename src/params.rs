//! Filter parameters: style, color mode and the three slider values.
//!
//! ## Ranges
//!
//! | Parameter | Range | Step | Default |
//! |-----------|-------|------|---------|
//! | blur_kernel_size | 1-99 | 2 | 21 |
//! | contrast_gain | 0.5-3.0 | 0.1 | 1.0 |
//! | sharpen_strength | 0.0-3.0 | 0.1 | 1.0 |
//!
//! The blur kernel size handed to the Gaussian stage is always odd
//! (see [`make_odd`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};

pub const BLUR_MIN: u32 = 1;
pub const BLUR_MAX: u32 = 99;
pub const BLUR_DEFAULT: u32 = 21;

pub const CONTRAST_MIN: f32 = 0.5;
pub const CONTRAST_MAX: f32 = 3.0;
pub const CONTRAST_DEFAULT: f32 = 1.0;

pub const SHARPEN_MIN: f32 = 0.0;
pub const SHARPEN_MAX: f32 = 3.0;
pub const SHARPEN_DEFAULT: f32 = 1.0;

/// Bump a kernel size to the next odd value, with a floor of 1.
pub fn make_odd(value: u32) -> u32 {
    let value = value.max(1);
    if value % 2 == 1 {
        value
    } else {
        value + 1
    }
}

/// Reject blur kernel sizes above [`BLUR_MAX`].
pub fn validate_blur(blur_kernel_size: u32) -> SketchResult<()> {
    if blur_kernel_size > BLUR_MAX {
        return Err(SketchError::InvalidParameter(format!(
            "blur kernel size must be at most {BLUR_MAX}, got {blur_kernel_size}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Pencil,
    ColorPencil,
    Cartoon,
}

impl Style {
    pub fn label(&self) -> &'static str {
        match self {
            Style::Pencil => "Pencil",
            Style::ColorPencil => "Color Pencil",
            Style::Cartoon => "Cartoon",
        }
    }

    /// Caption shown under the rendered result.
    pub fn caption(&self) -> String {
        format!("{} Sketch", self.label())
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Style {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "pencil" => Ok(Style::Pencil),
            "color_pencil" | "colour_pencil" => Ok(Style::ColorPencil),
            "cartoon" => Ok(Style::Cartoon),
            other => Err(SketchError::InvalidParameter(format!(
                "unknown style '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Grayscale,
    Color,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Grayscale => f.write_str("Grayscale"),
            ColorMode::Color => f.write_str("Color"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(ColorMode::Grayscale),
            "color" | "colour" => Ok(ColorMode::Color),
            other => Err(SketchError::InvalidParameter(format!(
                "unknown color mode '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParameters {
    pub style: Style,
    pub color_mode: ColorMode,
    pub blur_kernel_size: u32,
    pub contrast_gain: f32,
    pub sharpen_strength: f32,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            style: Style::default(),
            color_mode: ColorMode::default(),
            blur_kernel_size: BLUR_DEFAULT,
            contrast_gain: CONTRAST_DEFAULT,
            sharpen_strength: SHARPEN_DEFAULT,
        }
    }
}

impl FilterParameters {
    pub fn new(style: Style, color_mode: ColorMode) -> Self {
        Self {
            style,
            color_mode,
            ..Self::default()
        }
    }

    pub fn with_blur(mut self, blur_kernel_size: u32) -> Self {
        self.blur_kernel_size = blur_kernel_size;
        self
    }

    pub fn with_contrast(mut self, contrast_gain: f32) -> Self {
        self.contrast_gain = contrast_gain;
        self
    }

    pub fn with_sharpen(mut self, sharpen_strength: f32) -> Self {
        self.sharpen_strength = sharpen_strength;
        self
    }

    /// Reject values no slider can produce.
    pub fn validate(&self) -> SketchResult<()> {
        validate_blur(self.blur_kernel_size)?;
        if !self.contrast_gain.is_finite() {
            return Err(SketchError::InvalidParameter(format!(
                "contrast gain must be finite, got {}",
                self.contrast_gain
            )));
        }
        if !self.sharpen_strength.is_finite() {
            return Err(SketchError::InvalidParameter(format!(
                "sharpen strength must be finite, got {}",
                self.sharpen_strength
            )));
        }
        Ok(())
    }

    /// Pull every slider value back into its control range.
    pub fn clamped(&self) -> Self {
        Self {
            style: self.style,
            color_mode: self.color_mode,
            blur_kernel_size: make_odd(self.blur_kernel_size.clamp(BLUR_MIN, BLUR_MAX)),
            contrast_gain: self.contrast_gain.clamp(CONTRAST_MIN, CONTRAST_MAX),
            sharpen_strength: self.sharpen_strength.clamp(SHARPEN_MIN, SHARPEN_MAX),
        }
    }
}
