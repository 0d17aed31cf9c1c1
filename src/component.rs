//! Text half of a shape component.
//!
//! Owns the shape's element group and text generator, turns value-change
//! reports into queued [`ShapeTextChange`]s, and commits them to the
//! [`DocStore`]. Tables additionally get their vertical cells turned a quarter
//! turn after every draw and update.

#[cfg(test)]
#[path = "component_test.rs"]
mod component_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::board::Board;
use crate::consts::{VERTICAL_CELL_TEXT_CLASS, VERTICAL_TEXT_ANGLE};
use crate::content::TextElement;
use crate::doc::DocStore;
use crate::geometry::Point;
use crate::generator::{TextGenerator, TextGeneratorOptions};
use crate::input::EditorEvent;
use crate::overlay::{ExitCallback, ExitHandle, TextChange};
use crate::scene::NodeId;
use crate::shape::{ShapeId, TextRegion, TextShape};

/// A pending text mutation, in document units.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTextChange {
    pub shape_id: ShapeId,
    /// Region key within the shape (not the registry key).
    pub key: String,
    /// Committed content. `None` for size-only reports.
    pub new_text: Option<TextElement>,
    pub width: f64,
    pub height: f64,
}

pub struct ShapeTextComponent<S: TextShape + 'static> {
    generator: TextGenerator<S>,
    outbox: Rc<RefCell<Vec<ShapeTextChange>>>,
    element_group: NodeId,
}

impl<S: TextShape + 'static> ShapeTextComponent<S> {
    /// Build the element group under the scene root, create a manager per
    /// region, and draw.
    pub fn new(board: &mut Board, shape: S) -> Self {
        let outbox: Rc<RefCell<Vec<ShapeTextChange>>> = Rc::default();
        let sink = Rc::clone(&outbox);
        let options = TextGeneratorOptions::new(move |shape: &S, change: &TextChange, region: &TextRegion| {
            sink.borrow_mut().push(ShapeTextChange {
                shape_id: shape.id(),
                key: region.key.clone(),
                new_text: change.new_text.clone(),
                width: change.width,
                height: change.height,
            });
        });

        let root = board.surface.scene.root();
        let element_group = board.surface.scene.create_group();
        board.surface.scene.append(root, element_group);

        let mut generator = TextGenerator::new(Rc::new(RefCell::new(shape)), options);
        generator.initialize(board);
        let component = Self { generator, outbox, element_group };
        component.generator.draw(board, element_group);
        component.rotate_vertical_text(board);
        component
    }

    #[must_use]
    pub fn element_group(&self) -> NodeId {
        self.element_group
    }

    #[must_use]
    pub fn generator(&self) -> &TextGenerator<S> {
        &self.generator
    }

    /// The host delivered a new value for this shape.
    pub fn on_context_changed(&mut self, board: &mut Board, shape: S) {
        let previous = self.generator.shape().borrow().text_regions();
        let current = shape.text_regions();
        self.generator.update(board, shape, &previous, &current, self.element_group);
        self.rotate_vertical_text(board);
    }

    pub fn enter_edit(&self, board: &mut Board, region: &str, on_exit: Option<ExitCallback>) -> Option<ExitHandle> {
        self.generator.enter_edit(board, region, on_exit)
    }

    pub fn handle_editor_event(&self, board: &mut Board, region: &str, event: EditorEvent) -> Option<TextChange> {
        self.generator.handle_editor_event(board, region, event)
    }

    /// Take queued changes without applying them.
    pub fn take_changes(&self) -> Vec<ShapeTextChange> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    /// Commit queued changes to `doc`. Returns how many were applied.
    pub fn apply_changes(&self, doc: &mut DocStore) -> usize {
        let mut applied = 0;
        for change in self.take_changes() {
            let ok = match change.new_text {
                Some(text) => doc.set_text(&change.shape_id, &change.key, text, change.width, change.height),
                None => doc.set_text_size(&change.shape_id, &change.key, change.width, change.height),
            };
            if ok {
                applied += 1;
            }
        }
        applied
    }

    /// Tear down every overlay and the element group.
    pub fn destroy(&mut self, board: &mut Board) {
        self.generator.destroy(board);
        board.surface.scene.remove(self.element_group);
        self.outbox.borrow_mut().clear();
    }

    fn rotate_vertical_text(&self, board: &mut Board) {
        let padding = board.surface.shape_padding;
        let vertical: Vec<(String, Point)> = {
            let shape = self.generator.shape().borrow();
            shape
                .text_regions()
                .into_iter()
                .filter(|r| shape.is_vertical_text(&r.key))
                .filter_map(|r| shape.text_rectangle(&r.key, padding).map(|rect| (r.key, rect.center())))
                .collect()
        };
        for (key, center) in vertical {
            let Some((manager, surface)) = self.generator.manager_mut(board, &key) else {
                continue;
            };
            let Some(group) = manager.group() else {
                continue;
            };
            surface.scene.add_class(group, VERTICAL_CELL_TEXT_CLASS);
            manager.rotate_to(surface, center, VERTICAL_TEXT_ANGLE);
            debug!(key = %key, "rotated vertical cell text");
        }
    }
}
