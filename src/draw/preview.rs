//! Ephemeral preview layer for drag-defined shapes.

use super::error::SurfaceError;
use super::pixels::PixelFrame;
use super::render;
use super::shape::ShapeOutline;
use super::style::Style;
use cairo::{Format, ImageSurface};

/// Same-sized scratch surface that shows exactly one shape outline while a
/// shape gesture is live.
///
/// Never read by history. Committing it into the raster goes through
/// [`super::RasterSurface::commit_shape`], which clears it afterwards.
pub struct PreviewSurface {
    surface: ImageSurface,
    blank: bool,
}

impl std::fmt::Debug for PreviewSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSurface")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .field("blank", &self.blank)
            .finish()
    }
}

impl PreviewSurface {
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        Ok(Self {
            surface: ImageSurface::create(Format::ARgb32, width, height)?,
            blank: true,
        })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    /// Clears the whole buffer, then draws `outline` alone.
    pub fn redraw(&mut self, outline: &ShapeOutline, style: &Style) -> Result<(), SurfaceError> {
        let ctx = cairo::Context::new(&self.surface)?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint()?;
        ctx.set_operator(cairo::Operator::Over);
        render::render_outline(&ctx, outline, style)?;
        self.blank = false;
        Ok(())
    }

    /// Wipes the preview to fully transparent.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        if self.blank {
            return Ok(());
        }
        let ctx = cairo::Context::new(&self.surface)?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint()?;
        self.blank = true;
        Ok(())
    }

    /// True when nothing has been drawn since the last clear.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Copies the current preview pixels.
    pub fn frame(&mut self) -> Result<PixelFrame, SurfaceError> {
        PixelFrame::capture(&mut self.surface)
    }
}
