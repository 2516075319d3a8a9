//! Cairo-based rendering functions for outlines and text.

use super::font::FontDescriptor;
use super::shape::ShapeOutline;
use super::style::Style;
use crate::util::{self, Point};

/// Strokes a single shape outline with the given style.
///
/// Outlines are drawn at full alpha with round caps and joins; a circle with
/// zero radius draws nothing.
pub fn render_outline(ctx: &cairo::Context, outline: &ShapeOutline, style: &Style) -> Result<(), cairo::Error> {
    ctx.save()?;
    style.color.apply_source(ctx, 1.0);
    ctx.set_line_width(style.width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    match *outline {
        ShapeOutline::Rectangle { corner, opposite } => {
            let (x, y, w, h) = ShapeOutline::normalized_rect(corner, opposite);
            ctx.rectangle(x, y, w, h);
        }
        ShapeOutline::Circle { center, radius } => {
            if radius <= 0.0 {
                return ctx.restore();
            }
            ctx.new_sub_path();
            ctx.arc(center.x, center.y, radius, 0.0, 2.0 * std::f64::consts::PI);
        }
        ShapeOutline::Line { from, to } => {
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
        }
        ShapeOutline::Arrow { from, to } => {
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            // Head strokes fan back from the tip.
            for end in util::calculate_arrowhead(from, to, style.width) {
                ctx.move_to(to.x, to.y);
                ctx.line_to(end.x, end.y);
            }
        }
    }

    ctx.stroke()?;
    ctx.restore()
}

/// Creates a Pango layout for one line of text at the given stroke width.
fn line_layout(ctx: &cairo::Context, font: &FontDescriptor, width: f64, text: &str) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(ctx);
    let description = font.to_pango(util::text_font_size(width));
    layout.set_font_description(Some(&description));
    layout.set_text(text);
    layout
}

/// Renders multi-line text with each line's top edge at its line origin.
///
/// Lines are split on `\n`, left-aligned at `anchor.x`, and spaced by
/// [`util::text_line_height`] rather than font metrics so placement depends
/// only on the stroke width.
pub fn render_text_lines(
    ctx: &cairo::Context,
    anchor: Point,
    content: &str,
    style: &Style,
    font: &FontDescriptor,
) -> Result<(), cairo::Error> {
    ctx.save()?;
    // Gray antialiasing; subpixel fringes on transparent surfaces.
    ctx.set_antialias(cairo::Antialias::Gray);
    style.color.apply_source(ctx, 1.0);

    for (origin, line) in util::text_line_origins(anchor, content, style.width) {
        if line.is_empty() {
            continue;
        }
        let layout = line_layout(ctx, font, style.width, line);
        ctx.move_to(origin.x, origin.y);
        pangocairo::functions::show_layout(ctx, &layout);
    }

    ctx.restore()
}

pub(crate) const TEXT_BOX_MIN_WIDTH: f64 = 200.0;
pub(crate) const TEXT_BOX_MIN_HEIGHT: f64 = 50.0;

/// Draws the in-progress text box: the content, a dashed frame and a caret
/// after the last character.
///
/// Used only for host compositing; nothing here touches the raster.
pub fn render_text_preview(
    ctx: &cairo::Context,
    anchor: Point,
    content: &str,
    style: &Style,
    font: &FontDescriptor,
) -> Result<(), cairo::Error> {
    render_text_lines(ctx, anchor, content, style, font)?;

    let origins = util::text_line_origins(anchor, content, style.width);
    let line_height = util::text_line_height(style.width);
    let mut box_width = TEXT_BOX_MIN_WIDTH;
    let mut caret = anchor;
    for (origin, line) in &origins {
        let layout = line_layout(ctx, font, style.width, line);
        let (_, logical) = layout.pixel_extents();
        box_width = box_width.max(logical.width() as f64);
        caret = Point::new(origin.x + logical.width() as f64, origin.y);
    }

    ctx.save()?;
    style.color.apply_source(ctx, 0.6);
    ctx.set_line_width(1.0);
    ctx.set_dash(&[4.0, 3.0], 0.0);
    let padding = 4.0;
    ctx.rectangle(
        anchor.x - padding,
        anchor.y - padding,
        box_width + padding * 2.0,
        (origins.len() as f64 * line_height).max(TEXT_BOX_MIN_HEIGHT) + padding * 2.0,
    );
    ctx.stroke()?;

    ctx.set_dash(&[], 0.0);
    style.color.apply_source(ctx, 1.0);
    ctx.set_line_width(2.0_f64.max(style.width / 4.0));
    ctx.move_to(caret.x + 1.0, caret.y);
    ctx.line_to(caret.x + 1.0, caret.y + util::text_font_size(style.width));
    ctx.stroke()?;
    ctx.restore()
}
