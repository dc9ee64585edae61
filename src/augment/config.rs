//! Configuration for SVG augmentation
//!
//! A [`TransformConfig`] is usually loaded from TOML:
//!
//! ```toml
//! p = 0.5
//! color_change = true
//! colors = ["#ff0000", "#00ff00"]
//!
//! [rotate]
//! from = -10
//! to = 10
//! ```

use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a transform configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A closed interval sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Range {
    pub from: f64,
    pub to: f64,
}

impl Range {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Draw one value uniformly between the bounds. Reversed bounds are allowed.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.from + (self.to - self.from) * rng.gen::<f64>()
    }
}

fn default_p() -> f64 {
    0.5
}

fn default_colors() -> Vec<String> {
    vec![
        "#ff0000".to_string(),
        "#0000ff".to_string(),
        "#000000".to_string(),
    ]
}

/// Which transforms to apply and their parameter ranges
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    /// Coherent noise magnitude, drawn once per path
    #[serde(default)]
    pub noise_std: Option<Range>,
    /// Noise family; informational, only simplex-style coherent noise exists
    #[serde(default)]
    pub noise_type: Option<String>,
    /// Rotation angle in degrees around the viewbox center
    #[serde(default)]
    pub rotate: Option<Range>,
    /// Horizontal translation
    #[serde(default)]
    pub shift_re: Option<Range>,
    /// Vertical translation
    #[serde(default)]
    pub shift_im: Option<Range>,
    /// Uniform scale factor about the origin
    #[serde(default)]
    pub scale: Option<Range>,
    /// Sampled but not applied to any attribute
    #[serde(default)]
    pub color_noise: Option<Range>,
    #[serde(default)]
    pub color_change: bool,
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    /// Probability that each transform fires for a given path
    #[serde(default = "default_p")]
    pub p: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            noise_std: None,
            noise_type: None,
            rotate: None,
            shift_re: None,
            shift_im: None,
            scale: None,
            color_noise: None,
            color_change: false,
            colors: default_colors(),
            p: default_p(),
        }
    }
}

impl TransformConfig {
    /// Create an empty configuration: every transform disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_noise(mut self, from: f64, to: f64) -> Self {
        self.noise_std = Some(Range::new(from, to));
        self
    }

    pub fn with_rotate(mut self, from: f64, to: f64) -> Self {
        self.rotate = Some(Range::new(from, to));
        self
    }

    pub fn with_shift_re(mut self, from: f64, to: f64) -> Self {
        self.shift_re = Some(Range::new(from, to));
        self
    }

    pub fn with_shift_im(mut self, from: f64, to: f64) -> Self {
        self.shift_im = Some(Range::new(from, to));
        self
    }

    pub fn with_scale(mut self, from: f64, to: f64) -> Self {
        self.scale = Some(Range::new(from, to));
        self
    }

    pub fn with_color_noise(mut self, from: f64, to: f64) -> Self {
        self.color_noise = Some(Range::new(from, to));
        self
    }

    /// Enable color replacement from the given palette
    pub fn with_colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        self.color_change = true;
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }
}
