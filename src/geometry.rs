//! Points, rectangles, and the document/screen viewport mapping.
//!
//! Document space is the shape model's coordinate system. Screen space is the
//! zoomed and panned host coordinate system in CSS pixels. Everything here is
//! pure and `Copy`.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either document or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. Width and height are non-negative when built
/// through [`Rect::from_points`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two corner points in any order.
    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self { x, y, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    /// Bounding rectangle of a point list. Empty input yields the zero rectangle.
    #[must_use]
    pub fn from_point_list(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self { x: min_x, y: min_y, width: max_x - min_x, height: max_y - min_y }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// Whether `p` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Whether two rectangles overlap. Touching edges count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }
}

/// Rotate `p` around `center` by `angle` radians (clockwise in screen
/// orientation, where y grows downward).
#[must_use]
pub fn rotate_point(p: Point, center: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point { x: center.x + dx * cos - dy * sin, y: center.y + dx * sin + dy * cos }
}

#[must_use]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Viewport state for pan/zoom on the board.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// Convert a document-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn to_screen_point(&self, doc: Point) -> Point {
        Point { x: doc.x * self.zoom + self.pan_x, y: doc.y * self.zoom + self.pan_y }
    }

    /// Convert a screen-space point (CSS pixels) to document coordinates.
    #[must_use]
    pub fn to_doc_point(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.pan_x) / self.zoom, y: (screen.y - self.pan_y) / self.zoom }
    }

    #[must_use]
    pub fn to_screen_rect(&self, doc: Rect) -> Rect {
        let origin = self.to_screen_point(Point::new(doc.x, doc.y));
        Rect { x: origin.x, y: origin.y, width: doc.width * self.zoom, height: doc.height * self.zoom }
    }

    #[must_use]
    pub fn to_doc_rect(&self, screen: Rect) -> Rect {
        let origin = self.to_doc_point(Point::new(screen.x, screen.y));
        Rect { x: origin.x, y: origin.y, width: screen.width / self.zoom, height: screen.height / self.zoom }
    }

    /// Convert a screen-space length (pixels) to a document-space length.
    #[must_use]
    pub fn screen_len_to_doc(&self, screen_len: f64) -> f64 {
        screen_len / self.zoom
    }
}
