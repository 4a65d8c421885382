//! Vellum configuration system
//!
//! Loads animation, rendering, text and demo settings from `vellum.toml`,
//! with environment variables taking precedence over file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "vellum.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct VellumConfig {
    /// Spring and fade timing
    pub animation: AnimationConfig,
    /// Surface settings
    pub rendering: RenderingConfig,
    /// Font and wrapping settings
    pub text: TextConfig,
    /// Headless demo settings
    pub demo: DemoConfig,
}

/// Animation timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Spring settling time scale
    pub movement_ms: f32,
    /// Time for an element to fully fade in or out
    pub presence_ms: f32,
    /// Nominal tick period; also the upper bound for one step
    pub frame_interval_ms: f32,
    /// Idle after `idle_multiple * (movement_ms + presence_ms)` without activity
    pub idle_multiple: f32,
    /// Faded records below this presence are dropped
    pub removal_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderingConfig {
    /// Logical→device scale applied to the demo surface's viewport; `None`
    /// keeps 1.0. The frame driver and paint sessions never read this field:
    /// they always use the scale factor reported by the surface they draw on.
    pub scale_factor: Option<f32>,
    /// Background color as sRGB hex (`#rrggbb` or `#rrggbbaa`)
    pub background: Option<String>,
    /// Average glyph width relative to font size for heuristic measuring
    pub char_width_factor: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    /// Path to a .ttf/.otf font file used for measuring and rasterizing
    pub font: Option<PathBuf>,
    /// Default font size in logical pixels
    pub size: f32,
    /// Maximum line width before word wrapping, in logical pixels
    pub wrap_length: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of ticks to run
    pub frames: u32,
    /// PNG output path
    pub output: PathBuf,
    /// Logical viewport width
    pub width: u32,
    /// Logical viewport height
    pub height: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            movement_ms: 100.0,
            presence_ms: 500.0,
            frame_interval_ms: 1000.0 / 30.0,
            idle_multiple: 10.0,
            removal_threshold: 0.1,
        }
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            scale_factor: None,
            background: None,
            char_width_factor: 0.55,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font: None,
            size: 16.0,
            wrap_length: 1000.0,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 30,
            output: PathBuf::from("vellum-demo.png"),
            width: 640,
            height: 480,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let val = std::env::var(name).ok()?;
    match val.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %val, "ignoring unparsable environment override");
            None
        }
    }
}

impl VellumConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `vellum.toml` from the current directory, or defaults if it is
    /// missing. A file that exists but does not parse is logged and ignored.
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        // Animation settings
        if let Some(ms) = parse_env::<f32>("VELLUM_MOVEMENT_MS") {
            self.animation.movement_ms = ms;
        }
        if let Some(ms) = parse_env::<f32>("VELLUM_PRESENCE_MS") {
            self.animation.presence_ms = ms;
        }
        if let Some(ms) = parse_env::<f32>("VELLUM_FRAME_INTERVAL_MS") {
            self.animation.frame_interval_ms = ms;
        }

        // Rendering settings
        if let Some(scale) = parse_env::<f32>("VELLUM_SCALE_FACTOR") {
            self.rendering.scale_factor = Some(scale);
        }

        // Text settings
        if let Ok(font) = std::env::var("VELLUM_FONT") {
            self.text.font = Some(PathBuf::from(font));
        }

        // Demo settings
        if let Some(frames) = parse_env::<u32>("VELLUM_DEMO_FRAMES") {
            self.demo.frames = frames;
        }
        if let Ok(output) = std::env::var("VELLUM_DEMO_OUTPUT") {
            self.demo.output = PathBuf::from(output);
        }
    }

    /// Load configuration with environment variable overrides:
    /// 1. Load from vellum.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
