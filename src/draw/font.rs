//! Font descriptor for committed and previewed text.

use serde::{Deserialize, Serialize};

/// Font configuration for text rendering.
///
/// The pixel size is not part of the descriptor: it is derived from the
/// stroke width at commit time (see [`crate::util::text_font_size`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Monospace", "JetBrains Mono")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "bold".to_string(),
        }
    }
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: weight.into(),
        }
    }

    /// Converts this descriptor to a Pango description string without a size.
    ///
    /// Format: "Family Weight", e.g. "Sans Bold". A normal weight is omitted.
    pub fn to_pango_string(&self) -> String {
        if self.weight.eq_ignore_ascii_case("normal") {
            self.family.clone()
        } else {
            format!("{} {}", self.family, weight_keyword(&self.weight))
        }
    }

    /// Builds a Pango font description with an absolute size in device pixels.
    pub fn to_pango(&self, pixel_size: f64) -> pango::FontDescription {
        let mut description = pango::FontDescription::from_string(&self.to_pango_string());
        description.set_absolute_size(pixel_size * pango::SCALE as f64);
        description
    }
}

/// Maps config weights to Pango keywords; numeric weights map to the
/// nearest named weight since description strings only take names.
fn weight_keyword(weight: &str) -> String {
    match weight.parse::<u32>() {
        Ok(w) if w <= 150 => "Thin".to_string(),
        Ok(w) if w <= 250 => "Ultra-Light".to_string(),
        Ok(w) if w <= 350 => "Light".to_string(),
        Ok(w) if w <= 450 => "Normal".to_string(),
        Ok(w) if w <= 550 => "Medium".to_string(),
        Ok(w) if w <= 650 => "Semi-Bold".to_string(),
        Ok(w) if w <= 750 => "Bold".to_string(),
        Ok(w) if w <= 850 => "Ultra-Bold".to_string(),
        Ok(_) => "Heavy".to_string(),
        Err(_) => capitalize_first(weight),
    }
}

/// Capitalizes the first letter of a string.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
