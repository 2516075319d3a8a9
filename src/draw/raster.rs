//! The persistent raster: every committed stroke, shape and text lives here.

use super::error::SurfaceError;
use super::font::FontDescriptor;
use super::pixels::PixelFrame;
use super::preview::PreviewSurface;
use super::render;
use super::style::Style;
use crate::history::Snapshot;
use crate::input::Tool;
use crate::util::{Point, Rect};
use cairo::{Format, ImageSurface, Operator};

/// Alpha multiplier for highlighter ink.
pub const HIGHLIGHTER_ALPHA: f64 = 0.4;

/// Parameters fixed when a freehand stroke begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
    pub tool: Tool,
    pub style: Style,
    pub alpha: f64,
    pub operator: Operator,
}

impl StrokeParams {
    pub fn new(tool: Tool, style: Style) -> Self {
        let (alpha, operator) = match tool {
            Tool::Eraser => (1.0, Operator::DestOut),
            Tool::Highlighter => (HIGHLIGHTER_ALPHA * style.opacity, Operator::Over),
            _ => (style.opacity, Operator::Over),
        };
        Self {
            tool,
            style,
            alpha: alpha.clamp(0.0, 1.0),
            operator,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    params: StrokeParams,
    last: Point,
}

/// Cairo ARGB32 surface holding committed content.
///
/// No `cairo::Context` outlives a method call, so the pixel buffer can always
/// be borrowed for capture.
pub struct RasterSurface {
    surface: ImageSurface,
    stroke: Option<ActiveStroke>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.surface.width())
            .field("height", &self.surface.height())
            .field("stroke", &self.stroke.map(|s| s.params.tool))
            .finish()
    }
}

impl RasterSurface {
    /// Creates an empty raster.
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        Ok(Self {
            surface: ImageSurface::create(Format::ARgb32, width, height)?,
            stroke: None,
        })
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    fn context(&self) -> Result<cairo::Context, SurfaceError> {
        Ok(cairo::Context::new(&self.surface)?)
    }

    // ------------------------------------------------------------------
    // Freehand strokes
    // ------------------------------------------------------------------

    /// Opens a freehand stroke at `origin`. Nothing is painted until the
    /// first [`extend_stroke`](Self::extend_stroke).
    pub fn begin_stroke(&mut self, origin: Point, tool: Tool, style: Style) {
        let params = StrokeParams::new(tool, style);
        log::debug!(
            "Begin {} stroke at ({:.1}, {:.1}) width={:.1} alpha={:.2}",
            tool,
            origin.x,
            origin.y,
            style.width,
            params.alpha
        );
        self.stroke = Some(ActiveStroke {
            params,
            last: origin,
        });
    }

    /// Paints a segment from the last point to `point` and returns its damage.
    ///
    /// Does nothing when no stroke is open.
    pub fn extend_stroke(&mut self, point: Point) -> Result<Option<Rect>, SurfaceError> {
        let Some(stroke) = self.stroke.as_mut() else {
            return Ok(None);
        };
        let from = stroke.last;
        let params = stroke.params;
        stroke.last = point;

        let ctx = self.context()?;
        ctx.set_operator(params.operator);
        params.style.color.apply_source(&ctx, params.alpha);
        ctx.set_line_width(params.style.width);
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
        ctx.move_to(from.x, from.y);
        ctx.line_to(point.x, point.y);
        ctx.stroke()?;

        Ok(Rect::around_points(&[from, point], params.style.width))
    }

    /// Closes the open stroke, returning its parameters.
    pub fn end_stroke(&mut self) -> Option<StrokeParams> {
        self.stroke.take().map(|stroke| stroke.params)
    }

    pub fn stroke_in_progress(&self) -> Option<StrokeParams> {
        self.stroke.map(|stroke| stroke.params)
    }

    // ------------------------------------------------------------------
    // Commits
    // ------------------------------------------------------------------

    /// Composites the preview's current frame with plain over-painting, then
    /// clears the preview.
    pub fn commit_shape(&mut self, preview: &mut PreviewSurface) -> Result<(), SurfaceError> {
        if !preview.is_blank() {
            let ctx = self.context()?;
            ctx.set_operator(Operator::Over);
            ctx.set_source_surface(preview.surface(), 0.0, 0.0)?;
            ctx.paint()?;
        }
        preview.clear()
    }

    /// Renders text lines at `anchor`. Returns false (and paints nothing)
    /// for empty or whitespace-only content.
    pub fn commit_text(
        &mut self,
        anchor: Point,
        content: &str,
        style: &Style,
        font: &FontDescriptor,
    ) -> Result<bool, SurfaceError> {
        if content.trim().is_empty() {
            return Ok(false);
        }
        let ctx = self.context()?;
        ctx.set_operator(Operator::Over);
        render::render_text_lines(&ctx, anchor, content, style, font)?;
        Ok(true)
    }

    /// Wipes the entire buffer to transparent.
    pub fn clear(&mut self) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.set_operator(Operator::Clear);
        ctx.paint()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pixels, snapshots, resize
    // ------------------------------------------------------------------

    /// Copies the committed pixels.
    pub fn frame(&mut self) -> Result<PixelFrame, SurfaceError> {
        PixelFrame::capture(&mut self.surface)
    }

    /// Replaces the contents with `frame` painted at the origin. Pixels
    /// outside the frame end up transparent; pixels beyond the surface are clipped.
    pub fn replace_with(&mut self, frame: &PixelFrame) -> Result<(), SurfaceError> {
        let source = frame.clone().into_surface()?;
        let ctx = self.context()?;
        ctx.set_operator(Operator::Clear);
        ctx.paint()?;
        ctx.set_operator(Operator::Source);
        ctx.set_source_surface(&source, 0.0, 0.0)?;
        ctx.rectangle(0.0, 0.0, frame.width() as f64, frame.height() as f64);
        ctx.fill()?;
        Ok(())
    }

    /// Captures the full buffer as a history snapshot.
    pub fn export_snapshot(&mut self) -> Result<Snapshot, SurfaceError> {
        Snapshot::encode(&self.frame()?)
    }

    /// Restores the buffer from a snapshot synchronously.
    pub fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        let frame = snapshot.decode()?;
        self.replace_with(&frame)
    }

    /// Rebuilds the buffer at a new size keeping committed content anchored
    /// at the origin. An open stroke keeps its parameters and last point.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        if width == self.width() && height == self.height() {
            return Ok(());
        }
        let captured = self.frame()?;
        self.surface = ImageSurface::create(Format::ARgb32, width, height)?;
        self.replace_with(&captured)?;
        log::debug!(
            "Raster resized {}x{} -> {}x{}",
            captured.width(),
            captured.height(),
            width,
            height
        );
        Ok(())
    }

    /// Encodes the committed pixels as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut bytes = Vec::new();
        self.surface.write_to_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Premultiplied `[a, r, g, b]` at a pixel.
    pub fn pixel_at(&mut self, x: i32, y: i32) -> Result<Option<[u8; 4]>, SurfaceError> {
        Ok(self.frame()?.pixel(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ShapeOutline;
    use crate::draw::color::{BLACK, RED};

    fn pen() -> Style {
        Style::default().with_color(RED)
    }

    #[test]
    fn stroke_params_follow_tool() {
        let style = pen();
        assert_eq!(StrokeParams::new(Tool::Pen, style).alpha, 1.0);
        assert_eq!(StrokeParams::new(Tool::Highlighter, style).alpha, 0.4);
        let eraser = StrokeParams::new(Tool::Eraser, style);
        assert_eq!(eraser.operator, Operator::DestOut);
        assert_eq!(eraser.alpha, 1.0);

        let faint = Style { opacity: 0.5, ..style };
        assert_eq!(StrokeParams::new(Tool::Pen, faint).alpha, 0.5);
        assert_eq!(StrokeParams::new(Tool::Highlighter, faint).alpha, 0.2);
        assert_eq!(StrokeParams::new(Tool::Eraser, faint).alpha, 1.0);
    }

    #[test]
    fn pen_segments_paint_incrementally() {
        let mut raster = RasterSurface::new(60, 60).unwrap();
        raster.begin_stroke(Point::new(10.0, 10.0), Tool::Pen, pen());
        assert!(raster.frame().unwrap().is_blank());

        let damage = raster.extend_stroke(Point::new(10.0, 50.0)).unwrap().unwrap();
        assert!(damage.x <= 8 && damage.y <= 8);
        assert_eq!(raster.pixel_at(10, 30).unwrap(), Some([255, 0xef, 0x44, 0x44]));
        assert_eq!(raster.pixel_at(30, 30).unwrap(), Some([0, 0, 0, 0]));
        assert_eq!(raster.end_stroke().map(|p| p.tool), Some(Tool::Pen));
        assert!(raster.extend_stroke(Point::new(50.0, 50.0)).unwrap().is_none());
    }

    #[test]
    fn highlighter_is_translucent() {
        let mut raster = RasterSurface::new(40, 40).unwrap();
        raster.begin_stroke(Point::new(5.0, 20.0), Tool::Highlighter, pen());
        raster.extend_stroke(Point::new(35.0, 20.0)).unwrap();
        let [a, ..] = raster.pixel_at(20, 20).unwrap().unwrap();
        assert_eq!(a, 102);
    }

    #[test]
    fn eraser_removes_ink() {
        let mut raster = RasterSurface::new(40, 40).unwrap();
        raster.begin_stroke(Point::new(5.0, 20.0), Tool::Pen, pen().with_width(10.0));
        raster.extend_stroke(Point::new(35.0, 20.0)).unwrap();
        raster.end_stroke();

        raster.begin_stroke(Point::new(20.0, 5.0), Tool::Eraser, pen().with_width(10.0));
        raster.extend_stroke(Point::new(20.0, 35.0)).unwrap();
        raster.end_stroke();

        assert_eq!(raster.pixel_at(20, 20).unwrap(), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel_at(8, 20).unwrap().map(|p| p[0]), Some(255));
    }

    #[test]
    fn commit_shape_composites_and_clears_preview() {
        let mut raster = RasterSurface::new(40, 40).unwrap();
        let mut preview = PreviewSurface::new(40, 40).unwrap();
        preview
            .redraw(
                &ShapeOutline::Line {
                    from: Point::new(0.0, 20.0),
                    to: Point::new(40.0, 20.0),
                },
                &Style::default().with_color(BLACK),
            )
            .unwrap();
        raster.commit_shape(&mut preview).unwrap();
        assert!(preview.is_blank());
        assert_eq!(raster.pixel_at(20, 20).unwrap(), Some([255, 0, 0, 0]));
    }

    #[test]
    fn whitespace_text_commits_nothing() {
        let mut raster = RasterSurface::new(40, 40).unwrap();
        let committed = raster
            .commit_text(Point::new(5.0, 5.0), " \n\t ", &pen(), &FontDescriptor::default())
            .unwrap();
        assert!(!committed);
        assert!(raster.frame().unwrap().is_blank());
    }

    #[test]
    fn snapshot_restore_is_exact() {
        let mut raster = RasterSurface::new(50, 50).unwrap();
        raster.begin_stroke(Point::new(3.0, 3.0), Tool::Highlighter, pen());
        raster.extend_stroke(Point::new(47.0, 31.0)).unwrap();
        raster.end_stroke();
        let before = raster.frame().unwrap();
        let snapshot = raster.export_snapshot().unwrap();

        raster.clear().unwrap();
        assert!(raster.frame().unwrap().is_blank());
        raster.restore_snapshot(&snapshot).unwrap();
        assert_eq!(raster.frame().unwrap(), before);
    }

    #[test]
    fn resize_keeps_content_and_open_stroke() {
        let mut raster = RasterSurface::new(30, 30).unwrap();
        raster.begin_stroke(Point::new(5.0, 5.0), Tool::Pen, pen());
        raster.extend_stroke(Point::new(5.0, 25.0)).unwrap();

        raster.resize(80, 20).unwrap();
        assert_eq!((raster.width(), raster.height()), (80, 20));
        assert_eq!(raster.pixel_at(5, 10).unwrap().map(|p| p[0]), Some(255));
        assert!(raster.stroke_in_progress().is_some());

        raster.extend_stroke(Point::new(70.0, 10.0)).unwrap();
        assert_eq!(raster.pixel_at(60, 12).unwrap().map(|p| p[0]), Some(255));
        assert!(matches!(
            raster.resize(0, 10),
            Err(SurfaceError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn png_export_has_signature() {
        let raster = RasterSurface::new(8, 8).unwrap();
        let png = raster.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
