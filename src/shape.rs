//! Text-bearing shapes and their text rectangle strategies.
//!
//! A shape exposes its text regions and answers "where does region `key`
//! sit" in document space. The generator never caches these answers: the
//! accessors it hands to overlay managers call back into the shape each time.
//!
//! Layout rules shared by every shape kind:
//! - horizontal text is inset by padding plus stroke width on both sides and
//!   centered vertically on the region's last measured height,
//! - vertical table-cell text is bounded by its text height horizontally and
//!   by the cell height (less padding and stroke on both sides) vertically.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_STROKE_WIDTH, DEFAULT_TEXT_HEIGHT};
use crate::content::TextElement;
use crate::geometry::{Point, Rect};

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// One editable text area owned by a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Stable within the owning shape.
    pub key: String,
    /// `None` when the region holds no text.
    pub content: Option<TextElement>,
    /// Last measured height, in document units.
    pub text_height: f64,
}

impl TextRegion {
    #[must_use]
    pub fn new(key: impl Into<String>, content: Option<TextElement>, text_height: f64) -> Self {
        Self { key: key.into(), content, text_height }
    }
}

/// Read/write access to a shape's text regions.
pub trait TextShape {
    fn id(&self) -> ShapeId;

    /// Rotation in radians. `None` for shapes that never rotate.
    fn angle(&self) -> Option<f64>;

    /// Bounding rectangle in document space.
    fn rectangle(&self) -> Rect;

    /// Multi-text shapes key regions individually; single-text shapes own
    /// exactly one region keyed by the shape id.
    fn is_multi_text(&self) -> bool;

    /// Regions in display order.
    fn text_regions(&self) -> Vec<TextRegion>;

    /// Unrotated text rectangle for region `key`.
    fn text_rectangle(&self, key: &str, padding: f64) -> Option<Rect>;

    /// Rectangle the rendered text actually covers, used for hit testing.
    fn render_rectangle(&self, key: &str, padding: f64) -> Option<Rect> {
        self.text_rectangle(key, padding)
    }

    /// Whether region `key` is drawn rotated a quarter turn.
    fn is_vertical_text(&self, _key: &str) -> bool {
        false
    }

    /// Store new content and measured size for region `key`.
    /// Returns `false` if the shape has no such region.
    fn set_region_text(&mut self, key: &str, content: Option<TextElement>, text_width: f64, text_height: f64) -> bool;

    /// Store a new measured size only.
    fn set_region_size(&mut self, key: &str, text_width: f64, text_height: f64) -> bool;
}

/// Horizontal text box inside `outer`.
#[must_use]
pub fn horizontal_text_rect(outer: Rect, padding: f64, stroke_width: f64, text_height: f64) -> Rect {
    let inset = padding + stroke_width;
    Rect {
        x: outer.x + inset,
        y: outer.y + (outer.height - text_height) / 2.0,
        width: (outer.width - inset * 2.0).max(0.0),
        height: text_height,
    }
}

/// Box covered by vertical text inside `cell`.
#[must_use]
pub fn vertical_text_rect(cell: Rect, padding: f64, stroke_width: f64, text_height: f64) -> Rect {
    let inset = padding + stroke_width;
    let height = (cell.height - inset * 2.0).max(0.0);
    Rect { x: cell.x + inset, y: cell.y + (cell.height - height) / 2.0, width: text_height, height }
}

/// Unrotated box for vertical text: the render box turned a quarter turn
/// around the cell center.
fn vertical_layout_rect(cell: Rect, padding: f64, stroke_width: f64, text_height: f64) -> Rect {
    let render = vertical_text_rect(cell, padding, stroke_width, text_height);
    let center = render.center();
    Rect {
        x: center.x - render.height / 2.0,
        y: center.y - render.width / 2.0,
        width: render.height,
        height: render.width,
    }
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_text_height() -> f64 {
    DEFAULT_TEXT_HEIGHT
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Basic shape (rectangle, ellipse, diamond, ...) with one text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryShape {
    pub id: ShapeId,
    /// Two opposite corners in document space.
    pub points: [Point; 2],
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub text: Option<TextElement>,
    /// Last measured text width, in document units.
    #[serde(default)]
    pub text_width: f64,
    #[serde(default = "default_text_height")]
    pub text_height: f64,
}

impl GeometryShape {
    #[must_use]
    pub fn new(points: [Point; 2], text: Option<TextElement>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            angle: None,
            stroke_width: DEFAULT_STROKE_WIDTH,
            text,
            text_width: 0.0,
            text_height: DEFAULT_TEXT_HEIGHT,
        }
    }

    fn own_key(&self, key: &str) -> bool {
        key == self.id.to_string()
    }
}

impl TextShape for GeometryShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn angle(&self) -> Option<f64> {
        self.angle
    }

    fn rectangle(&self) -> Rect {
        Rect::from_points(self.points[0], self.points[1])
    }

    fn is_multi_text(&self) -> bool {
        false
    }

    fn text_regions(&self) -> Vec<TextRegion> {
        vec![TextRegion::new(self.id.to_string(), self.text.clone(), self.text_height)]
    }

    fn text_rectangle(&self, key: &str, padding: f64) -> Option<Rect> {
        self.own_key(key)
            .then(|| horizontal_text_rect(self.rectangle(), padding, self.stroke_width, self.text_height))
    }

    fn set_region_text(&mut self, key: &str, content: Option<TextElement>, text_width: f64, text_height: f64) -> bool {
        if !self.own_key(key) {
            return false;
        }
        self.text = content;
        self.text_width = text_width;
        self.text_height = text_height;
        true
    }

    fn set_region_size(&mut self, key: &str, text_width: f64, text_height: f64) -> bool {
        if !self.own_key(key) {
            return false;
        }
        self.text_width = text_width;
        self.text_height = text_height;
        true
    }
}

// =============================================================================
// MULTI-TEXT GEOMETRY
// =============================================================================

/// A label slot on a multi-text geometry, positioned in document space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeLabel {
    pub key: String,
    pub points: [Point; 2],
    #[serde(default)]
    pub text: Option<TextElement>,
    #[serde(default)]
    pub text_width: f64,
    #[serde(default = "default_text_height")]
    pub text_height: f64,
}

/// Geometry carrying several independently edited labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTextGeometry {
    pub id: ShapeId,
    pub points: [Point; 2],
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    pub labels: Vec<ShapeLabel>,
}

impl MultiTextGeometry {
    fn label(&self, key: &str) -> Option<&ShapeLabel> {
        self.labels.iter().find(|l| l.key == key)
    }

    fn label_mut(&mut self, key: &str) -> Option<&mut ShapeLabel> {
        self.labels.iter_mut().find(|l| l.key == key)
    }
}

impl TextShape for MultiTextGeometry {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn angle(&self) -> Option<f64> {
        self.angle
    }

    fn rectangle(&self) -> Rect {
        Rect::from_points(self.points[0], self.points[1])
    }

    fn is_multi_text(&self) -> bool {
        true
    }

    fn text_regions(&self) -> Vec<TextRegion> {
        self.labels
            .iter()
            .map(|l| TextRegion::new(l.key.clone(), l.text.clone(), l.text_height))
            .collect()
    }

    fn text_rectangle(&self, key: &str, padding: f64) -> Option<Rect> {
        let label = self.label(key)?;
        let slot = Rect::from_points(label.points[0], label.points[1]);
        Some(horizontal_text_rect(slot, padding, self.stroke_width, label.text_height))
    }

    fn set_region_text(&mut self, key: &str, content: Option<TextElement>, text_width: f64, text_height: f64) -> bool {
        let Some(label) = self.label_mut(key) else {
            return false;
        };
        label.text = content;
        label.text_width = text_width;
        label.text_height = text_height;
        true
    }

    fn set_region_size(&mut self, key: &str, text_width: f64, text_height: f64) -> bool {
        let Some(label) = self.label_mut(key) else {
            return false;
        };
        label.text_width = text_width;
        label.text_height = text_height;
        true
    }
}

// =============================================================================
// TABLE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub id: String,
    /// Cell corners in document space.
    pub points: [Point; 2],
    #[serde(default)]
    pub text: Option<TextElement>,
    #[serde(default)]
    pub text_width: f64,
    #[serde(default = "default_text_height")]
    pub text_height: f64,
    /// Text runs bottom-to-top.
    #[serde(default)]
    pub vertical: bool,
    /// Overrides the table's stroke width for this cell.
    #[serde(default)]
    pub stroke_width: Option<f64>,
}

impl TableCell {
    #[must_use]
    pub fn new(id: impl Into<String>, points: [Point; 2], text: Option<TextElement>) -> Self {
        Self {
            id: id.into(),
            points,
            text,
            text_width: 0.0,
            text_height: DEFAULT_TEXT_HEIGHT,
            vertical: false,
            stroke_width: None,
        }
    }

    #[must_use]
    pub fn rectangle(&self) -> Rect {
        Rect::from_points(self.points[0], self.points[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableShape {
    pub id: ShapeId,
    pub points: [Point; 2],
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    pub cells: Vec<TableCell>,
}

impl TableShape {
    #[must_use]
    pub fn new(points: [Point; 2], cells: Vec<TableCell>) -> Self {
        Self { id: Uuid::new_v4(), points, angle: None, stroke_width: DEFAULT_STROKE_WIDTH, cells }
    }

    #[must_use]
    pub fn cell(&self, id: &str) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn cell_mut(&mut self, id: &str) -> Option<&mut TableCell> {
        self.cells.iter_mut().find(|c| c.id == id)
    }

    fn cell_stroke(&self, cell: &TableCell) -> f64 {
        cell.stroke_width.unwrap_or(self.stroke_width)
    }
}

impl TextShape for TableShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn angle(&self) -> Option<f64> {
        self.angle
    }

    fn rectangle(&self) -> Rect {
        Rect::from_points(self.points[0], self.points[1])
    }

    fn is_multi_text(&self) -> bool {
        true
    }

    fn text_regions(&self) -> Vec<TextRegion> {
        self.cells
            .iter()
            .map(|c| TextRegion::new(c.id.clone(), c.text.clone(), c.text_height))
            .collect()
    }

    fn text_rectangle(&self, key: &str, padding: f64) -> Option<Rect> {
        let cell = self.cell(key)?;
        let stroke = self.cell_stroke(cell);
        Some(if cell.vertical {
            vertical_layout_rect(cell.rectangle(), padding, stroke, cell.text_height)
        } else {
            horizontal_text_rect(cell.rectangle(), padding, stroke, cell.text_height)
        })
    }

    fn render_rectangle(&self, key: &str, padding: f64) -> Option<Rect> {
        let cell = self.cell(key)?;
        let stroke = self.cell_stroke(cell);
        Some(if cell.vertical {
            vertical_text_rect(cell.rectangle(), padding, stroke, cell.text_height)
        } else {
            horizontal_text_rect(cell.rectangle(), padding, stroke, cell.text_height)
        })
    }

    fn is_vertical_text(&self, key: &str) -> bool {
        self.cell(key).is_some_and(|c| c.vertical)
    }

    fn set_region_text(&mut self, key: &str, content: Option<TextElement>, text_width: f64, text_height: f64) -> bool {
        let Some(cell) = self.cell_mut(key) else {
            return false;
        };
        cell.text = content;
        cell.text_width = text_width;
        cell.text_height = text_height;
        true
    }

    fn set_region_size(&mut self, key: &str, text_width: f64, text_height: f64) -> bool {
        let Some(cell) = self.cell_mut(key) else {
            return false;
        };
        cell.text_width = text_width;
        cell.text_height = text_height;
        true
    }
}
