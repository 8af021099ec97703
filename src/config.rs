// src/config.rs

//! Configuration for the painter.
//!
//! Every section carries `#[serde(default)]`, so a configuration file only
//! needs to name the values it changes. Files are JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use once_cell::sync::Lazy;

use crate::color::Color;
use crate::ops::FigureStyle;
use crate::surface::Size;

/// Environment variable naming a configuration file for [`CONFIG`].
pub const CONFIG_ENV_VAR: &str = "PAINTER_CONFIG";

/// Process-wide configuration, resolved from [`CONFIG_ENV_VAR`] on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Drawing surface settings.
    pub canvas: CanvasConfig,
    /// Script interpretation settings.
    pub script: ScriptConfig,
    /// Colors and dimensions of drawn shapes.
    pub style: StyleConfig,
}

impl Config {
    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Config: Loaded {}", path.display());
        Ok(config)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], falling back to defaults
    /// when it is unset or unreadable.
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load(&path).unwrap_or_else(|e| {
                warn!("Config: {:#}. Using defaults.", e);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl CanvasConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 800,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptConfig {
    /// Factor turning normalised script coordinates into pixels.
    pub coordinate_scale: f64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            coordinate_scale: crate::lang::DEFAULT_COORDINATE_SCALE,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    /// Fill color of the `bgrect` rectangle.
    pub background_rect: Color,
    /// Shape of every `figure`.
    pub figure: FigureStyle,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            background_rect: Color::BLACK,
            figure: FigureStyle::default(),
        }
    }
}
