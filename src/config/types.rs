//! Configuration type definitions.

use super::enums::{ColorSpec, ToolSwitchPolicy};
use crate::draw::BackgroundMode;
use crate::input::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Drawing-related settings.
///
/// Controls the brush the engine starts with. Hosts change the style at
/// runtime through the toolbar.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default ink color - a palette name, a hex string or an RGB array like `[59, 130, 246]`
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_width")]
    pub default_width: f64,

    /// Default ink opacity (valid range: 0.0 - 1.0)
    #[serde(default = "default_opacity")]
    pub default_opacity: f64,

    /// Tool selected when the surface mounts
    #[serde(default)]
    pub default_tool: Tool,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_width: default_width(),
            default_opacity: default_opacity(),
            default_tool: Tool::default(),
        }
    }
}

/// Text tool font settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextConfig {
    /// Font family name for text rendering (e.g., "Sans", "Monospace", "JetBrains Mono")
    /// Pango falls back to a system default if the family is not installed
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", 400, 700)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_weight: default_font_weight(),
        }
    }
}

/// Background layer settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackgroundConfig {
    /// Mode used at startup (transparent, light, dark, grid)
    #[serde(default)]
    pub default_mode: BackgroundMode,

    /// Fill color for light mode
    #[serde(default = "default_light_color")]
    pub light_color: ColorSpec,

    /// Fill color for dark mode
    #[serde(default = "default_dark_color")]
    pub dark_color: ColorSpec,

    /// Grid line color
    #[serde(default = "default_grid_color")]
    pub grid_color: ColorSpec,

    /// Fill color underneath the grid lines
    #[serde(default = "default_grid_fill_color")]
    pub grid_fill_color: ColorSpec,

    /// Distance between grid lines in pixels (valid range: 8.0 - 200.0)
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            default_mode: BackgroundMode::default(),
            light_color: default_light_color(),
            dark_color: default_dark_color(),
            grid_color: default_grid_color(),
            grid_fill_color: default_grid_fill_color(),
            grid_spacing: default_grid_spacing(),
        }
    }
}

/// Engine behavior policies.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BehaviorConfig {
    /// What a tool switch does to a gesture in progress (commit, continue, abort)
    #[serde(default)]
    pub tool_switch: ToolSwitchPolicy,

    /// Whether clearing the canvas also removes the background image
    #[serde(default = "default_clear_drops_background_image")]
    pub clear_drops_background_image: bool,

    /// Upper bound in milliseconds for waiting on an in-flight history restore
    /// before drawing continues (valid range: 10 - 10000)
    #[serde(default = "default_restore_timeout_ms")]
    pub restore_timeout_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            tool_switch: ToolSwitchPolicy::default(),
            clear_drops_background_image: default_clear_drops_background_image(),
            restore_timeout_ms: default_restore_timeout_ms(),
        }
    }
}

/// Export settings for saved frames.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for saved frames (`~` is expanded)
    #[serde(default = "default_export_directory")]
    pub directory: String,

    /// Filename template (chrono format specifiers, `.png` is appended)
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Composite the background layers underneath the drawing on export
    #[serde(default)]
    pub include_background: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            filename_template: default_filename_template(),
            include_background: false,
        }
    }
}

impl ExportConfig {
    /// Export directory with a leading `~/` expanded to the home directory.
    pub fn resolved_directory(&self) -> PathBuf {
        crate::export::expand_tilde(&self.directory)
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("blue".to_string())
}

fn default_width() -> f64 {
    crate::draw::style::DEFAULT_WIDTH
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_light_color() -> ColorSpec {
    ColorSpec::Name("#ffffff".to_string())
}

fn default_dark_color() -> ColorSpec {
    ColorSpec::Name("#111827".to_string())
}

fn default_grid_color() -> ColorSpec {
    ColorSpec::Name("#334155".to_string())
}

fn default_grid_fill_color() -> ColorSpec {
    ColorSpec::Name("#0f172a".to_string())
}

fn default_grid_spacing() -> f64 {
    40.0
}

fn default_clear_drops_background_image() -> bool {
    true
}

fn default_restore_timeout_ms() -> u64 {
    500
}

fn default_export_directory() -> String {
    "~/Pictures/Lumina Draw".to_string()
}

fn default_filename_template() -> String {
    "lumina-draw-%Y%m%d-%H%M%S".to_string()
}
