//! Brush style applied to strokes, shapes and text.

use super::color::{BLUE, Color};

/// Default ink width in pixels.
pub const DEFAULT_WIDTH: f64 = 4.0;

/// Immutable brush parameters.
///
/// A gesture copies the style when it starts, so changing the style while a
/// stroke is in progress does not affect that stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Ink color
    pub color: Color,
    /// Stroke width in pixels (also drives text size and arrowhead length)
    pub width: f64,
    /// Ink opacity in `[0, 1]`
    pub opacity: f64,
}

impl Style {
    pub fn new(color: Color, width: f64, opacity: f64) -> Self {
        Self {
            color,
            width,
            opacity,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn with_width(self, width: f64) -> Self {
        Self { width, ..self }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: BLUE,
            width: DEFAULT_WIDTH,
            opacity: 1.0,
        }
    }
}
