//! Configuration enum types.

use crate::draw::Color;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a named/hex color or RGB values.
///
/// # Examples
/// ```toml
/// # Named palette color
/// default_color = "blue"
///
/// # Hex color
/// default_color = "#3b82f6"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Palette name (red, orange, yellow, green, blue, purple, pink, white, gray, black)
    /// or a `#rrggbb` / `#rgb` hex string
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Unparseable names fall back to `fallback` with a warning.
    pub fn to_color_or(&self, fallback: Color) -> Color {
        match self {
            ColorSpec::Name(name) => Color::parse(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using {}", name, fallback.to_hex());
                fallback
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }

    /// True when the value resolves to a color without falling back.
    pub fn is_valid(&self) -> bool {
        match self {
            ColorSpec::Name(name) => Color::parse(name).is_some(),
            ColorSpec::Rgb(_) => true,
        }
    }
}

/// What happens to an in-progress gesture when the tool changes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ToolSwitchPolicy {
    /// Finish the gesture as if the pointer had been released
    #[default]
    Commit,
    /// Keep drawing with the tool and style captured at gesture start
    Continue,
    /// Drop the gesture without recording history
    Abort,
}
