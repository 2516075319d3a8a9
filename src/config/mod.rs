//! Configuration file support for lumina-draw.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/lumina-draw/config.toml`. Settings include the starting brush,
//! text font, background palette, engine policies and export naming.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{ColorSpec, ToolSwitchPolicy};
pub use types::{BackgroundConfig, BehaviorConfig, DrawingConfig, ExportConfig, TextConfig};

use crate::draw::{FontDescriptor, Style, color::BLUE};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all user settings.
///
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "blue"
/// default_width = 4.0
/// default_tool = "pen"
///
/// [background]
/// default_mode = "grid"
///
/// [behavior]
/// tool_switch = "commit"
/// clear_drops_background_image = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Starting brush and tool
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Text tool font
    #[serde(default)]
    pub text: TextConfig,

    /// Background modes and colors
    #[serde(default)]
    pub background: BackgroundConfig,

    /// Gesture and history policies
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Saved frame location and naming
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced by
    /// the default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `drawing.default_width`: 1.0 - 50.0
    /// - `drawing.default_opacity`: 0.0 - 1.0
    /// - `background.grid_spacing`: 8.0 - 200.0
    /// - `behavior.restore_timeout_ms`: 10 - 10000
    pub fn validate_and_clamp(&mut self) {
        if !(1.0..=50.0).contains(&self.drawing.default_width) {
            warn!(
                "Invalid default_width {:.1}, clamping to 1.0-50.0 range",
                self.drawing.default_width
            );
            self.drawing.default_width = if self.drawing.default_width.is_nan() {
                crate::draw::style::DEFAULT_WIDTH
            } else {
                self.drawing.default_width.clamp(1.0, 50.0)
            };
        }

        if !(0.0..=1.0).contains(&self.drawing.default_opacity) {
            warn!(
                "Invalid default_opacity {:.2}, clamping to 0.0-1.0 range",
                self.drawing.default_opacity
            );
            self.drawing.default_opacity = if self.drawing.default_opacity.is_nan() {
                1.0
            } else {
                self.drawing.default_opacity.clamp(0.0, 1.0)
            };
        }

        if !(8.0..=200.0).contains(&self.background.grid_spacing) {
            warn!(
                "Invalid grid_spacing {:.1}, clamping to 8.0-200.0 range",
                self.background.grid_spacing
            );
            self.background.grid_spacing = if self.background.grid_spacing.is_nan() {
                40.0
            } else {
                self.background.grid_spacing.clamp(8.0, 200.0)
            };
        }

        if !(10..=10_000).contains(&self.behavior.restore_timeout_ms) {
            warn!(
                "Invalid restore_timeout_ms {}, clamping to 10-10000 range",
                self.behavior.restore_timeout_ms
            );
            self.behavior.restore_timeout_ms = self.behavior.restore_timeout_ms.clamp(10, 10_000);
        }

        let valid_weight = matches!(
            self.text.font_weight.to_lowercase().as_str(),
            "normal" | "bold" | "light" | "ultralight" | "heavy" | "ultrabold" | "medium"
        ) || self
            .text
            .font_weight
            .parse::<u32>()
            .is_ok_and(|w| (100..=900).contains(&w));

        if !valid_weight {
            warn!(
                "Invalid font_weight '{}', falling back to 'bold'",
                self.text.font_weight
            );
            self.text.font_weight = "bold".to_string();
        }

        if self.text.font_family.trim().is_empty() {
            warn!("Empty font_family, falling back to 'Sans'");
            self.text.font_family = "Sans".to_string();
        }

        let defaults = BackgroundConfig::default();
        let colors = [
            ("drawing.default_color", &mut self.drawing.default_color, ColorSpec::Name("blue".into())),
            ("background.light_color", &mut self.background.light_color, defaults.light_color),
            ("background.dark_color", &mut self.background.dark_color, defaults.dark_color),
            ("background.grid_color", &mut self.background.grid_color, defaults.grid_color),
            (
                "background.grid_fill_color",
                &mut self.background.grid_fill_color,
                defaults.grid_fill_color,
            ),
        ];
        for (key, spec, fallback) in colors {
            if !spec.is_valid() {
                warn!("Invalid color for {}: {:?}, using default", key, spec);
                *spec = fallback;
            }
        }
    }

    /// Style the engine starts with.
    pub fn initial_style(&self) -> Style {
        Style::new(
            self.drawing.default_color.to_color_or(BLUE),
            self.drawing.default_width,
            self.drawing.default_opacity,
        )
    }

    /// Font used for text commits.
    pub fn font(&self) -> FontDescriptor {
        FontDescriptor::new(self.text.font_family.clone(), self.text.font_weight.clone())
    }

    /// Maximum time to wait for an in-flight restore before drawing.
    pub fn restore_timeout(&self) -> Duration {
        Duration::from_millis(self.behavior.restore_timeout_ms)
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/lumina-draw/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("lumina-draw");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or returns defaults if the file is absent.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(source)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Saves the current configuration to the default path.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot
    /// be serialized or the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes `config.example.toml` to the user's config directory and returns its path.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path or
    /// if it cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> Schema {
        schema_for!(Config)
    }
}
