//! Drag-defined shape outlines shown on the preview surface.

use crate::input::Tool;
use crate::util::{self, Point, Rect};

/// A shape computed from the drag start and the current pointer position.
///
/// Outlines exist only while a shape gesture is live; once committed they are
/// pixels on the raster surface and cannot be edited again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeOutline {
    /// Axis-aligned box with `corner` and `opposite` as diagonal corners
    Rectangle { corner: Point, opposite: Point },
    /// Circle centered on the drag start
    Circle { center: Point, radius: f64 },
    /// Straight segment
    Line { from: Point, to: Point },
    /// Segment with a two-stroke head at `to`
    Arrow { from: Point, to: Point },
}

impl ShapeOutline {
    /// Builds the outline for a shape tool, or `None` for non-shape tools.
    pub fn from_drag(tool: Tool, start: Point, current: Point) -> Option<Self> {
        match tool {
            Tool::Rectangle => Some(Self::Rectangle {
                corner: start,
                opposite: current,
            }),
            Tool::Circle => Some(Self::Circle {
                center: start,
                radius: start.distance_to(current),
            }),
            Tool::Line => Some(Self::Line {
                from: start,
                to: current,
            }),
            Tool::Arrow => Some(Self::Arrow {
                from: start,
                to: current,
            }),
            _ => None,
        }
    }

    /// Normalized `(x, y, width, height)` of a rectangle outline.
    ///
    /// Dragging in any of the four directions yields the same box.
    pub fn normalized_rect(corner: Point, opposite: Point) -> (f64, f64, f64, f64) {
        (
            corner.x.min(opposite.x),
            corner.y.min(opposite.y),
            (opposite.x - corner.x).abs(),
            (opposite.y - corner.y).abs(),
        )
    }

    /// Returns the damage rectangle covering this outline at the given stroke width.
    pub fn bounding_box(&self, width: f64) -> Option<Rect> {
        let padding = util::stroke_padding(width);
        match *self {
            ShapeOutline::Rectangle { corner, opposite } => {
                let (x, y, w, h) = Self::normalized_rect(corner, opposite);
                Rect::covering(x, y, x + w, y + h, padding)
            }
            ShapeOutline::Circle { center, radius } => Rect::covering(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
                padding,
            ),
            ShapeOutline::Line { from, to } => Rect::around_points(&[from, to], width),
            ShapeOutline::Arrow { from, to } => {
                let [left, right] = util::calculate_arrowhead(from, to, width);
                Rect::around_points(&[from, to, left, right], width)
            }
        }
    }
}
