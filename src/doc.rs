//! Document model: text-bearing shapes and the in-memory store.
//!
//! The store is the mutation entry point for text edits. Components never
//! write to their own shape copy; they apply changes here and the host feeds
//! the resulting shape back through `on_context_changed`, exactly as it would
//! for a remote edit or an undo.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::TextElement;
use crate::geometry::Rect;
use crate::shape::{GeometryShape, MultiTextGeometry, ShapeId, TableShape, TextRegion, TextShape};

/// A shape as stored in the document and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeElement {
    Geometry(GeometryShape),
    MultiText(MultiTextGeometry),
    Table(TableShape),
}

impl ShapeElement {
    fn shape(&self) -> &dyn TextShape {
        match self {
            Self::Geometry(s) => s,
            Self::MultiText(s) => s,
            Self::Table(s) => s,
        }
    }

    fn shape_mut(&mut self) -> &mut dyn TextShape {
        match self {
            Self::Geometry(s) => s,
            Self::MultiText(s) => s,
            Self::Table(s) => s,
        }
    }
}

impl TextShape for ShapeElement {
    fn id(&self) -> ShapeId {
        self.shape().id()
    }

    fn angle(&self) -> Option<f64> {
        self.shape().angle()
    }

    fn rectangle(&self) -> Rect {
        self.shape().rectangle()
    }

    fn is_multi_text(&self) -> bool {
        self.shape().is_multi_text()
    }

    fn text_regions(&self) -> Vec<TextRegion> {
        self.shape().text_regions()
    }

    fn text_rectangle(&self, key: &str, padding: f64) -> Option<Rect> {
        self.shape().text_rectangle(key, padding)
    }

    fn render_rectangle(&self, key: &str, padding: f64) -> Option<Rect> {
        self.shape().render_rectangle(key, padding)
    }

    fn is_vertical_text(&self, key: &str) -> bool {
        self.shape().is_vertical_text(key)
    }

    fn set_region_text(&mut self, key: &str, content: Option<TextElement>, text_width: f64, text_height: f64) -> bool {
        self.shape_mut().set_region_text(key, content, text_width, text_height)
    }

    fn set_region_size(&mut self, key: &str, text_width: f64, text_height: f64) -> bool {
        self.shape_mut().set_region_size(key, text_width, text_height)
    }
}

impl From<GeometryShape> for ShapeElement {
    fn from(shape: GeometryShape) -> Self {
        Self::Geometry(shape)
    }
}

impl From<MultiTextGeometry> for ShapeElement {
    fn from(shape: MultiTextGeometry) -> Self {
        Self::MultiText(shape)
    }
}

impl From<TableShape> for ShapeElement {
    fn from(shape: TableShape) -> Self {
        Self::Table(shape)
    }
}

/// In-memory store of shapes.
#[derive(Debug, Default)]
pub struct DocStore {
    shapes: HashMap<ShapeId, ShapeElement>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a shape.
    pub fn insert(&mut self, shape: impl Into<ShapeElement>) {
        let shape = shape.into();
        self.shapes.insert(shape.id(), shape);
    }

    /// Remove a shape by id, returning it if it was present.
    pub fn remove(&mut self, id: &ShapeId) -> Option<ShapeElement> {
        self.shapes.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&ShapeElement> {
        self.shapes.get(id)
    }

    /// Replace all shapes with a full snapshot.
    pub fn load_snapshot(&mut self, shapes: Vec<ShapeElement>) {
        self.shapes.clear();
        for shape in shapes {
            self.shapes.insert(shape.id(), shape);
        }
    }

    /// Commit edited content for region `key` of shape `id`. Returns `false`
    /// if either does not exist.
    pub fn set_text(&mut self, id: &ShapeId, key: &str, text: TextElement, text_width: f64, text_height: f64) -> bool {
        let Some(shape) = self.shapes.get_mut(id) else {
            return false;
        };
        let applied = shape.set_region_text(key, Some(text), text_width, text_height);
        debug!(shape_id = %id, key, text_width, text_height, applied, "set text");
        applied
    }

    /// Record a new measured size for region `key` of shape `id`.
    pub fn set_text_size(&mut self, id: &ShapeId, key: &str, text_width: f64, text_height: f64) -> bool {
        let Some(shape) = self.shapes.get_mut(id) else {
            return false;
        };
        let applied = shape.set_region_size(key, text_width, text_height);
        debug!(shape_id = %id, key, text_width, text_height, applied, "set text size");
        applied
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
