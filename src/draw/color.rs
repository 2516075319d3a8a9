//! RGBA color type and the toolbar palette.

use serde::{Deserialize, Serialize};

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use lumina_draw::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let parsed = Color::parse("#ff0000").unwrap();
/// assert_eq!(red, parsed);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Parses a CSS-style hex color (`#rrggbb` or `#rgb`) or a palette name.
    ///
    /// Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => from_name(value),
        }
    }

    /// Returns this color with its alpha multiplied by `factor`.
    pub fn with_alpha_scaled(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Formats the color as `#rrggbb` (alpha is dropped).
    pub fn to_hex(&self) -> String {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Applies this color as the Cairo source with an extra alpha factor.
    pub(crate) fn apply_source(&self, ctx: &cairo::Context, alpha: f64) {
        ctx.set_source_rgba(self.r, self.g, self.b, (self.a * alpha).clamp(0.0, 1.0));
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::from_rgb8(r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Color::from_rgb8(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

fn from_name(name: &str) -> Option<Color> {
    PALETTE
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(name))
        .map(|(_, color)| *color)
}

// ============================================================================
// Palette (toolbar swatches)
// ============================================================================

/// Red `#ef4444`
pub const RED: Color = Color::from_rgb8(0xef, 0x44, 0x44);
/// Orange `#f97316`
pub const ORANGE: Color = Color::from_rgb8(0xf9, 0x73, 0x16);
/// Yellow `#eab308`
pub const YELLOW: Color = Color::from_rgb8(0xea, 0xb3, 0x08);
/// Green `#22c55e`
pub const GREEN: Color = Color::from_rgb8(0x22, 0xc5, 0x5e);
/// Blue `#3b82f6` (default ink)
pub const BLUE: Color = Color::from_rgb8(0x3b, 0x82, 0xf6);
/// Purple `#a855f7`
pub const PURPLE: Color = Color::from_rgb8(0xa8, 0x55, 0xf7);
/// Pink `#ec4899`
pub const PINK: Color = Color::from_rgb8(0xec, 0x48, 0x99);
/// White `#ffffff`
pub const WHITE: Color = Color::from_rgb8(0xff, 0xff, 0xff);
/// Gray `#94a3b8`
pub const GRAY: Color = Color::from_rgb8(0x94, 0xa3, 0xb8);
/// Black `#000000`
pub const BLACK: Color = Color::from_rgb8(0x00, 0x00, 0x00);

/// Fully transparent color
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

/// Named palette entries in toolbar order.
pub const PALETTE: [(&str, Color); 10] = [
    ("red", RED),
    ("orange", ORANGE),
    ("yellow", YELLOW),
    ("green", GREEN),
    ("blue", BLUE),
    ("purple", PURPLE),
    ("pink", PINK),
    ("white", WHITE),
    ("gray", GRAY),
    ("black", BLACK),
];
