//! Background modes and the independent background image layer.
//!
//! Backgrounds are drawn underneath the raster at composite time. They are
//! never captured in history snapshots.

use super::color::Color;
use super::error::SurfaceError;
use super::pixels::PixelFrame;
use crate::config::BackgroundConfig;
use cairo::ImageSurface;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Background fill behind the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Nothing behind the ink (default)
    #[default]
    Transparent,
    /// Flat light fill
    Light,
    /// Flat dark fill
    Dark,
    /// Dark fill with grid lines
    Grid,
}

impl BackgroundMode {
    /// Returns the fill color for this mode, if any.
    ///
    /// Transparent mode returns None (no background fill).
    pub fn background_color(&self, config: &BackgroundConfig) -> Option<Color> {
        match self {
            Self::Transparent => None,
            Self::Light => Some(config.light_color.to_color_or(Color::from_rgb8(0xff, 0xff, 0xff))),
            Self::Dark => Some(config.dark_color.to_color_or(Color::from_rgb8(0x11, 0x18, 0x27))),
            Self::Grid => Some(
                config
                    .grid_fill_color
                    .to_color_or(Color::from_rgb8(0x0f, 0x17, 0x2a)),
            ),
        }
    }

    /// Grid line color and spacing when this mode draws a grid.
    pub fn grid(&self, config: &BackgroundConfig) -> Option<(Color, f64)> {
        match self {
            Self::Grid => Some((
                config.grid_color.to_color_or(Color::from_rgb8(0x33, 0x41, 0x55)),
                config.grid_spacing,
            )),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Transparent => "transparent",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Grid => "grid",
        }
    }
}

impl std::str::FromStr for BackgroundMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transparent" | "none" => Ok(Self::Transparent),
            "light" | "white" => Ok(Self::Light),
            "dark" | "black" => Ok(Self::Dark),
            "grid" => Ok(Self::Grid),
            other => Err(format!("unknown background mode '{other}'")),
        }
    }
}

/// A decoded background image, drawn "contain"-fitted and centered.
pub struct BackgroundImage {
    surface: ImageSurface,
}

impl std::fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .finish()
    }
}

impl BackgroundImage {
    /// Decodes PNG/JPEG/GIF/WebP/BMP bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, SurfaceError> {
        Self::from_frame(PixelFrame::from_encoded_image(bytes)?)
    }

    pub fn from_frame(frame: PixelFrame) -> Result<Self, SurfaceError> {
        Ok(Self {
            surface: frame.into_surface()?,
        })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    /// Scale and offset that fit the image inside `width` x `height`
    /// preserving aspect ratio, centered on both axes.
    pub fn contain_transform(&self, width: f64, height: f64) -> (f64, f64, f64) {
        let image_w = self.width() as f64;
        let image_h = self.height() as f64;
        let scale = (width / image_w).min(height / image_h);
        let offset_x = (width - image_w * scale) / 2.0;
        let offset_y = (height - image_h * scale) / 2.0;
        (scale, offset_x, offset_y)
    }

    /// Paints the image onto `ctx` fitted into the given canvas size.
    pub fn render(&self, ctx: &cairo::Context, width: f64, height: f64) -> Result<(), cairo::Error> {
        let (scale, offset_x, offset_y) = self.contain_transform(width, height);
        ctx.save()?;
        ctx.translate(offset_x, offset_y);
        ctx.scale(scale, scale);
        ctx.set_source_surface(&self.surface, 0.0, 0.0)?;
        ctx.source().set_filter(cairo::Filter::Good);
        ctx.paint()?;
        ctx.restore()
    }
}

/// Paints the mode fill and, for grid mode, the grid lines.
pub fn render_background(
    ctx: &cairo::Context,
    mode: BackgroundMode,
    config: &BackgroundConfig,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let Some(fill) = mode.background_color(config) else {
        return Ok(());
    };
    ctx.save()?;
    fill.apply_source(ctx, 1.0);
    ctx.paint()?;

    if let Some((line, spacing)) = mode.grid(config) {
        line.apply_source(ctx, 1.0);
        ctx.set_line_width(1.0);
        // Half-pixel offsets keep 1px lines crisp.
        let mut x = 0.0;
        while x <= width {
            ctx.move_to(x + 0.5, 0.0);
            ctx.line_to(x + 0.5, height);
            x += spacing;
        }
        let mut y = 0.0;
        while y <= height {
            ctx.move_to(0.0, y + 0.5);
            ctx.line_to(width, y + 0.5);
            y += spacing;
        }
        ctx.stroke()?;
    }
    ctx.restore()
}

/// Background layers composited underneath the raster.
#[derive(Debug, Default)]
pub struct BackgroundLayers {
    pub mode: BackgroundMode,
    pub image: Option<BackgroundImage>,
}

impl BackgroundLayers {
    pub fn new(mode: BackgroundMode) -> Self {
        Self { mode, image: None }
    }

    /// Paints fill, grid and image in that order.
    pub fn render(
        &self,
        ctx: &cairo::Context,
        config: &BackgroundConfig,
        width: f64,
        height: f64,
    ) -> Result<(), cairo::Error> {
        render_background(ctx, self.mode, config, width, height)?;
        if let Some(image) = &self.image {
            image.render(ctx, width, height)?;
        }
        Ok(())
    }

    /// True when nothing would be painted.
    pub fn is_empty(&self) -> bool {
        self.mode == BackgroundMode::Transparent && self.image.is_none()
    }
}
