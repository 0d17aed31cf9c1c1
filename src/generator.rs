//! Per-shape text reconciler.
//!
//! A `TextGenerator` owns the list of registry keys for one shape and drives
//! manager create/update/destroy as the shape's text regions change. It is the
//! only writer of the registry for those keys.
//!
//! Managers read the shape through an `Rc<RefCell<_>>` shared with the
//! generator, so rectangle accessors always see the shape most recently
//! passed to [`TextGenerator::update`].

#[cfg(test)]
#[path = "generator_test.rs"]
mod generator_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::board::{Board, Surface};
use crate::content::TextElement;
use crate::geometry::{Point, Rect, Viewport};
use crate::input::EditorEvent;
use crate::overlay::{ExitCallback, ExitHandle, TextChange, TextManager, TextManagerOptions};
use crate::scene::NodeId;
use crate::shape::{ShapeId, TextRegion, TextShape};

/// Receives edits in document units along with the shape and region they
/// belong to.
pub type ValueChangeHandler<S> = dyn FnMut(&S, &TextChange, &TextRegion);

/// Overrides the hit-test rectangle for a region.
pub type RenderRectangleFn<S> = dyn Fn(&S, &str) -> Rect;

pub struct TextGeneratorOptions<S> {
    on_value_change: Rc<RefCell<ValueChangeHandler<S>>>,
    get_render_rectangle: Option<Rc<RenderRectangleFn<S>>>,
    get_max_width: Option<Rc<dyn Fn() -> f64>>,
}

impl<S> TextGeneratorOptions<S> {
    #[must_use]
    pub fn new(on_value_change: impl FnMut(&S, &TextChange, &TextRegion) + 'static) -> Self {
        Self { on_value_change: Rc::new(RefCell::new(on_value_change)), get_render_rectangle: None, get_max_width: None }
    }

    #[must_use]
    pub fn with_render_rectangle(mut self, f: impl Fn(&S, &str) -> Rect + 'static) -> Self {
        self.get_render_rectangle = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, f: impl Fn() -> f64 + 'static) -> Self {
        self.get_max_width = Some(Rc::new(f));
        self
    }
}

pub struct TextGenerator<S: TextShape + 'static> {
    shape: Rc<RefCell<S>>,
    shape_id: ShapeId,
    multi_text: bool,
    options: TextGeneratorOptions<S>,
    /// Registry keys owned by this shape, in region order.
    keys: Vec<String>,
}

impl<S: TextShape + 'static> TextGenerator<S> {
    #[must_use]
    pub fn new(shape: Rc<RefCell<S>>, options: TextGeneratorOptions<S>) -> Self {
        let (shape_id, multi_text) = {
            let s = shape.borrow();
            (s.id(), s.is_multi_text())
        };
        Self { shape, shape_id, multi_text, options, keys: Vec::new() }
    }

    #[must_use]
    pub fn shape(&self) -> &Rc<RefCell<S>> {
        &self.shape
    }

    /// Registry keys owned by this shape, in region order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Registry key for a region. Multi-text shapes prefix the shape id so
    /// keys never collide across shapes.
    #[must_use]
    pub fn region_key(&self, region: &str) -> String {
        if self.multi_text {
            format!("{}-{region}", self.shape_id)
        } else {
            region.to_string()
        }
    }

    /// Create a manager for every region that lacks one and record the
    /// shape's key list.
    pub fn initialize(&mut self, board: &mut Board) {
        let regions = self.shape.borrow().text_regions();
        self.keys.clear();
        for region in &regions {
            let key = self.region_key(&region.key);
            if !board.texts.contains(&key) {
                let manager = self.create_manager(board, &key, &region.key);
                board.texts.set(key.clone(), manager);
            }
            self.keys.push(key);
        }
        board.texts.associate(self.shape_id, self.keys.clone());
        debug!(shape_id = %self.shape_id, regions = regions.len(), "text generator initialized");
    }

    /// Mount every region that has content and attach it under `parent`.
    pub fn draw(&self, board: &mut Board, parent: NodeId) {
        let (regions, rotation) = self.snapshot();
        for region in regions {
            let Some(content) = region.content else {
                continue;
            };
            let key = self.region_key(&region.key);
            let Some(manager) = board.texts.get_mut(&key) else {
                continue;
            };
            manager.mount(&mut board.surface, content);
            manager.attach_to(&mut board.surface, parent);
            apply_rotation(manager, &mut board.surface, rotation);
        }
    }

    /// Reconcile managers against a new shape value. Deletions run before
    /// upserts so a key removed and re-added in one update never exists twice.
    /// Every current region gets a manager; only regions with content are
    /// mounted.
    pub fn update(&mut self, board: &mut Board, shape: S, previous: &[TextRegion], current: &[TextRegion], parent: NodeId) {
        *self.shape.borrow_mut() = shape;
        let (_, rotation) = self.snapshot();

        for gone in previous.iter().filter(|p| !current.iter().any(|c| c.key == p.key)) {
            let key = self.region_key(&gone.key);
            board.texts.delete(&mut board.surface, &key);
            self.keys.retain(|k| *k != key);
            debug!(shape_id = %self.shape_id, key = %key, "text region removed");
        }

        for region in current {
            let key = self.region_key(&region.key);
            if !board.texts.contains(&key) {
                if self.keys.contains(&key) {
                    warn!(shape_id = %self.shape_id, key = %key, "text manager missing for live region; recreating");
                }
                let mut manager = self.create_manager(board, &key, &region.key);
                if let Some(content) = &region.content {
                    manager.mount(&mut board.surface, content.clone());
                    manager.attach_to(&mut board.surface, parent);
                }
                board.texts.set(key.clone(), manager);
                if !self.keys.contains(&key) {
                    self.keys.push(key.clone());
                }
            } else if let Some(manager) = board.texts.get_mut(&key) {
                match (&region.content, manager.is_mounted()) {
                    (Some(content), true) => {
                        manager.replace_content(content.clone());
                        manager.resize_to(&mut board.surface, None);
                    }
                    (Some(content), false) => {
                        manager.mount(&mut board.surface, content.clone());
                        manager.attach_to(&mut board.surface, parent);
                    }
                    // Cleared text: keep the overlay but show nothing.
                    (None, true) => {
                        manager.replace_content(TextElement::plain(""));
                        manager.resize_to(&mut board.surface, None);
                    }
                    (None, false) => {}
                }
            }
            if let Some(manager) = board.texts.get_mut(&key) {
                apply_rotation(manager, &mut board.surface, rotation);
            }
        }

        board.texts.associate(self.shape_id, self.keys.clone());
    }

    /// Dispose every owned manager and forget the shape.
    pub fn destroy(&mut self, board: &mut Board) {
        for key in self.keys.drain(..) {
            board.texts.delete(&mut board.surface, &key);
        }
        board.texts.dissociate(&self.shape_id);
        debug!(shape_id = %self.shape_id, "text generator destroyed");
    }

    /// Live managers owned by this shape, in region order.
    #[must_use]
    pub fn managers<'a>(&self, board: &'a Board) -> Vec<&'a TextManager> {
        self.keys.iter().filter_map(|k| board.texts.get(k)).collect()
    }

    /// The manager for `region` together with the surface it draws on.
    pub fn manager_mut<'a>(&self, board: &'a mut Board, region: &str) -> Option<(&'a mut TextManager, &'a mut Surface)> {
        let key = self.region_key(region);
        let Board { surface, texts } = board;
        texts.get_mut(&key).map(|m| (m, surface))
    }

    /// Put `region` into edit mode.
    pub fn enter_edit(&self, board: &mut Board, region: &str, on_exit: Option<ExitCallback>) -> Option<ExitHandle> {
        let (manager, surface) = self.manager_mut(board, region)?;
        manager.enter_edit(surface, on_exit)
    }

    /// Route an editor notification to `region`'s manager.
    pub fn handle_editor_event(&self, board: &mut Board, region: &str, event: EditorEvent) -> Option<TextChange> {
        let (manager, surface) = self.manager_mut(board, region)?;
        manager.handle_editor_event(surface, event)
    }

    fn snapshot(&self) -> (Vec<TextRegion>, Option<(Point, f64)>) {
        let shape = self.shape.borrow();
        let rotation = shape.angle().map(|angle| (shape.rectangle().center(), angle));
        (shape.text_regions(), rotation)
    }

    fn create_manager(&self, board: &mut Board, key: &str, region: &str) -> TextManager {
        let padding = board.surface.shape_padding;

        let get_rectangle = text_rectangle_fn(&self.shape, region, padding);
        let mut options = TextManagerOptions::new(get_rectangle);

        options = match &self.options.get_render_rectangle {
            Some(render) => {
                let (render, shape, region) = (Rc::clone(render), Rc::clone(&self.shape), region.to_string());
                options.with_render_rectangle(move || render(&shape.borrow(), &region))
            }
            None => {
                let (shape, region) = (Rc::clone(&self.shape), region.to_string());
                options.with_render_rectangle(move || {
                    let shape = shape.borrow();
                    shape.render_rectangle(&region, padding).unwrap_or_else(|| shape.rectangle())
                })
            }
        };

        options = match &self.options.get_max_width {
            Some(max_width) => {
                let max_width = Rc::clone(max_width);
                options.with_max_width(move || max_width())
            }
            None => {
                let rect = text_rectangle_fn(&self.shape, region, padding);
                options.with_max_width(move || rect().width)
            }
        };

        let (handler, shape, region_key) = (Rc::clone(&self.options.on_value_change), Rc::clone(&self.shape), region.to_string());
        options = options.on_change(move |change: &TextChange, viewport: &Viewport| {
            let doc_change = to_document_units(change, viewport);
            let shape = shape.borrow();
            let region = shape
                .text_regions()
                .into_iter()
                .find(|r| r.key == region_key)
                .unwrap_or_else(|| TextRegion::new(region_key.clone(), None, doc_change.height));
            let mut handler = handler.borrow_mut();
            (&mut *handler)(&shape, &doc_change, &region);
        });

        let id = board.texts.next_manager_id();
        debug!(shape_id = %self.shape_id, key, ?id, "creating text manager");
        TextManager::new(id, key, options)
    }
}

fn text_rectangle_fn<S: TextShape + 'static>(shape: &Rc<RefCell<S>>, region: &str, padding: f64) -> impl Fn() -> Rect + 'static {
    let (shape, region) = (Rc::clone(shape), region.to_string());
    move || {
        let shape = shape.borrow();
        shape.text_rectangle(&region, padding).unwrap_or_else(|| shape.rectangle())
    }
}

fn apply_rotation(manager: &mut TextManager, surface: &mut Surface, rotation: Option<(Point, f64)>) {
    if let Some((center, angle)) = rotation {
        manager.rotate_to(surface, center, angle);
    }
}

/// Convert a screen-unit report into document units.
#[must_use]
pub fn to_document_units(change: &TextChange, viewport: &Viewport) -> TextChange {
    TextChange {
        new_text: change.new_text.clone(),
        width: viewport.screen_len_to_doc(change.width),
        height: viewport.screen_len_to_doc(change.height),
    }
}
