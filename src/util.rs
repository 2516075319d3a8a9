//! Geometry helpers shared by the raster, preview and text pipelines.
//!
//! This module provides:
//! - [`Point`]: canvas-local pointer coordinates
//! - [`Rect`]: integer damage rectangles
//! - Arrowhead and text-line layout calculations

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ============================================================================
// Points
// ============================================================================

/// A position in canvas-local pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts a client/screen position into canvas-local space by
    /// subtracting the top-left corner of the canvas' on-screen bounds.
    pub fn relative_to(self, origin: Point) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }

    /// Euclidean distance between two points.
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Angle between each arrowhead stroke and the shaft (30 degrees).
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// Length of the arrowhead strokes for a given stroke width.
///
/// The head grows with the ink: `10 * (width / 4 + 0.5)`.
pub fn arrow_head_length(width: f64) -> f64 {
    10.0 * (width / 4.0 + 0.5)
}

/// Calculates the outer ends of the two arrowhead strokes.
///
/// The head sits at `to` and points away from `from`. Each stroke runs from
/// `to` to one of the returned points, at `±30°` from the shaft direction.
///
/// # Returns
/// `[left, right]` where left is rotated by `-30°` and right by `+30°`.
/// A zero-length shaft yields a head pointing along the positive x axis,
/// matching `atan2(0, 0) == 0`.
pub fn calculate_arrowhead(from: Point, to: Point, width: f64) -> [Point; 2] {
    let head = arrow_head_length(width);
    let angle = (to.y - from.y).atan2(to.x - from.x);

    let left = Point::new(
        to.x - head * (angle - ARROW_HEAD_ANGLE).cos(),
        to.y - head * (angle - ARROW_HEAD_ANGLE).sin(),
    );
    let right = Point::new(
        to.x - head * (angle + ARROW_HEAD_ANGLE).cos(),
        to.y - head * (angle + ARROW_HEAD_ANGLE).sin(),
    );
    [left, right]
}

// ============================================================================
// Text Layout
// ============================================================================

/// Font size in pixels used for committed text at the given stroke width.
pub fn text_font_size(width: f64) -> f64 {
    (width * 3.0).max(16.0)
}

/// Vertical distance between successive text lines at the given stroke width.
pub fn text_line_height(width: f64) -> f64 {
    (width * 4.0).max(20.0)
}

/// Splits text into lines and computes the top-left origin of each one.
///
/// Lines are left-aligned at `anchor.x`; line `i` starts at
/// `anchor.y + i * text_line_height(width)`.
pub fn text_line_origins(anchor: Point, content: &str, width: f64) -> Vec<(Point, &str)> {
    let line_height = text_line_height(width);
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            (Point::new(anchor.x, anchor.y + i as f64 * line_height), line)
        })
        .collect()
}

// ============================================================================
// Damage Rectangles
// ============================================================================

/// Axis-aligned rectangle helper used for dirty region tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Smallest integer rectangle covering the given float bounds, grown by
    /// `padding` on every side. Degenerate spans are widened to one pixel.
    pub fn covering(min_x: f64, min_y: f64, max_x: f64, max_y: f64, padding: f64) -> Option<Self> {
        let min_x = (min_x - padding).floor() as i32;
        let min_y = (min_y - padding).floor() as i32;
        let mut max_x = (max_x + padding).ceil() as i32;
        let mut max_y = (max_y + padding).ceil() as i32;
        if max_x == min_x {
            max_x += 1;
        }
        if max_y == min_y {
            max_y += 1;
        }
        Self::from_min_max(min_x, min_y, max_x, max_y)
    }

    /// Bounding box of a set of points with half the stroke width as padding.
    pub fn around_points(points: &[Point], stroke_width: f64) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in &points[1..] {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Self::covering(min_x, min_y, max_x, max_y, stroke_padding(stroke_width))
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Padding needed so a stroke of `width` (round caps) stays inside its box.
pub fn stroke_padding(width: f64) -> f64 {
    (width / 2.0).ceil().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_between(a: (f64, f64), b: (f64, f64)) -> f64 {
        let dot = a.0 * b.0 + a.1 * b.1;
        let len = (a.0.hypot(a.1)) * (b.0.hypot(b.1));
        (dot / len).acos()
    }

    #[test]
    fn arrowhead_strokes_are_fifteen_pixels_at_thirty_degrees() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(100.0, 0.0);
        let head = calculate_arrowhead(from, to, 4.0);

        for end in head {
            assert!((to.distance_to(end) - 15.0).abs() < 1e-9);
            // Angle between the head stroke (tip -> end) and the reversed shaft.
            let stroke = (end.x - to.x, end.y - to.y);
            let reversed_shaft = (from.x - to.x, from.y - to.y);
            let angle = angle_between(stroke, reversed_shaft);
            assert!((angle - PI / 6.0).abs() < 1e-9);
        }

        // The two strokes sit on opposite sides of the shaft.
        assert!(head[0].y > 0.0);
        assert!(head[1].y < 0.0);
    }

    #[test]
    fn arrowhead_length_scales_with_width() {
        assert_eq!(arrow_head_length(4.0), 15.0);
        assert_eq!(arrow_head_length(0.0), 5.0);
        assert_eq!(arrow_head_length(20.0), 55.0);
    }

    #[test]
    fn text_lines_are_offset_by_line_height() {
        let origins = text_line_origins(Point::new(50.0, 50.0), "A\nB", 4.0);
        assert_eq!(
            origins,
            vec![(Point::new(50.0, 50.0), "A"), (Point::new(50.0, 70.0), "B")]
        );
    }

    #[test]
    fn text_metrics_have_minimums() {
        assert_eq!(text_font_size(4.0), 16.0);
        assert_eq!(text_font_size(10.0), 30.0);
        assert_eq!(text_line_height(4.0), 20.0);
        assert_eq!(text_line_height(10.0), 40.0);
    }

    #[test]
    fn relative_to_subtracts_canvas_origin() {
        let client = Point::new(120.5, 80.0);
        let local = client.relative_to(Point::new(20.0, 30.0));
        assert_eq!(local, Point::new(100.5, 50.0));
    }

    #[test]
    fn rect_covering_widens_degenerate_spans() {
        let rect = Rect::covering(10.0, 10.0, 10.0, 10.0, 0.0).unwrap();
        assert_eq!(rect, Rect::new(10, 10, 1, 1).unwrap());
    }

    #[test]
    fn rect_around_points_includes_stroke_padding() {
        let rect = Rect::around_points(&[Point::new(10.0, 20.0), Point::new(30.0, 40.0)], 6.0)
            .unwrap();
        assert_eq!(rect, Rect::new(7, 17, 26, 26).unwrap());
    }
}
