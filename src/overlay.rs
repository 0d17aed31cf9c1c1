//! Text overlay manager: one floating editable region bound to a text region.
//!
//! DESIGN
//! ======
//! A `TextManager` owns a `<g class="text">` group holding one
//! `<foreignObject>` sized to the region's rectangle, plus the editor bound to
//! the region's content. Its lifecycle is an explicit state machine:
//!
//! ```text
//! Unmounted ──mount──▶ Mounted ──enter_edit──▶ Editing
//!                        ▲                        │
//!                        └──────── exit ──────────┘
//! (any) ──dispose──▶ Disposed
//! ```
//!
//! Rectangles are never stored: the manager calls its accessor whenever it
//! needs one, because the owning shape may have moved or resized since the
//! last call. Size changes flow out through `on_change` in screen units; the
//! generator converts them to document units.
//!
//! Every operation on a disposed manager is a silent no-op. Delayed host
//! events routinely arrive after teardown.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::fmt;

use tracing::{debug, trace, warn};

use crate::board::Surface;
use crate::consts::{ATTACHED_CLASS, TEXT_GROUP_CLASS};
use crate::content::{Selection, TextElement, build_composition_shadow};
use crate::editor::{EditInput, TextEditor};
use crate::geometry::{Point, Rect, Viewport};
use crate::input::{Deferred, EditorEvent, ListenerId, PointerEvent};
use crate::measure::{Size, measure_element};
use crate::scene::NodeId;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    #[error("text overlay {key} measured before mount")]
    NotMounted { key: String },
    #[error("text overlay {key} is disposed")]
    Disposed { key: String },
}

/// Lifecycle state of a [`TextManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Unmounted,
    Mounted,
    Editing,
    Disposed,
}

/// Identity of a manager instance, unique per board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManagerId(pub(crate) u64);

/// Handle returned by [`TextManager::enter_edit`]. Exiting with a handle
/// whose session already ended is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitHandle(u64);

impl ExitHandle {
    pub(crate) fn new(session: u64) -> Self {
        Self(session)
    }
}

/// A content or size report, in screen units.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChange {
    /// New committed content. `None` for size-only reports (IME preview).
    pub new_text: Option<TextElement>,
    pub width: f64,
    pub height: f64,
}

pub type RectAccessor = Box<dyn Fn() -> Rect>;
pub type MaxWidthAccessor = Box<dyn Fn() -> f64>;
pub type ChangeHandler = Box<dyn FnMut(&TextChange, &Viewport)>;
pub type ExitCallback = Box<dyn FnOnce()>;

/// Caller-supplied accessors and hooks for one manager.
pub struct TextManagerOptions {
    /// Authoritative (non-edit) rectangle, in document space.
    pub get_rectangle: RectAccessor,
    /// Rectangle used for outside-click hit testing. Falls back to `get_rectangle`.
    pub get_render_rectangle: Option<RectAccessor>,
    /// Wrap limit. Falls back to the board's configured max width.
    pub get_max_width: Option<MaxWidthAccessor>,
    pub on_change: Option<ChangeHandler>,
}

impl TextManagerOptions {
    #[must_use]
    pub fn new(get_rectangle: impl Fn() -> Rect + 'static) -> Self {
        Self { get_rectangle: Box::new(get_rectangle), get_render_rectangle: None, get_max_width: None, on_change: None }
    }

    #[must_use]
    pub fn with_render_rectangle(mut self, f: impl Fn() -> Rect + 'static) -> Self {
        self.get_render_rectangle = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, f: impl Fn() -> f64 + 'static) -> Self {
        self.get_max_width = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(&TextChange, &Viewport) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct OverlayNodes {
    group: NodeId,
    foreign_object: NodeId,
}

struct EditSession {
    handle: ExitHandle,
    listener: ListenerId,
    on_exit: Option<ExitCallback>,
}

/// Runtime manager for one mounted text region.
pub struct TextManager {
    id: ManagerId,
    key: String,
    state: OverlayState,
    options: TextManagerOptions,
    nodes: Option<OverlayNodes>,
    editor: Option<Box<dyn TextEditor>>,
    session: Option<EditSession>,
    composing: bool,
    sessions_started: u64,
}

impl fmt::Debug for TextManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextManager")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("state", &self.state)
            .field("composing", &self.composing)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

impl TextManager {
    #[must_use]
    pub fn new(id: ManagerId, key: impl Into<String>, options: TextManagerOptions) -> Self {
        Self {
            id,
            key: key.into(),
            state: OverlayState::Unmounted,
            options,
            nodes: None,
            editor: None,
            session: None,
            composing: false,
            sessions_started: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> ManagerId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(self.state, OverlayState::Mounted | OverlayState::Editing)
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.state == OverlayState::Editing
    }

    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Container group, while mounted.
    #[must_use]
    pub fn group(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.group)
    }

    /// Floating editable area, while mounted.
    #[must_use]
    pub fn foreign_object(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.foreign_object)
    }

    #[must_use]
    pub fn editor(&self) -> Option<&dyn TextEditor> {
        self.editor.as_deref()
    }

    /// Current top-level content node.
    #[must_use]
    pub fn plain_content(&self) -> Option<&TextElement> {
        self.editor.as_deref().map(TextEditor::value)
    }

    /// Authoritative rectangle from the accessor.
    #[must_use]
    pub fn rectangle(&self) -> Rect {
        (self.options.get_rectangle)()
    }

    /// Rectangle used for outside-click hit testing.
    #[must_use]
    pub fn render_rectangle(&self) -> Rect {
        match &self.options.get_render_rectangle {
            Some(f) => f(),
            None => self.rectangle(),
        }
    }

    fn max_width(&self, surface: &Surface) -> f64 {
        self.options.get_max_width.as_ref().map_or(surface.max_width, |f| f())
    }

    fn is_disposed(&self) -> bool {
        if self.state == OverlayState::Disposed {
            trace!(key = %self.key, "ignoring call on disposed text overlay");
            return true;
        }
        false
    }

    /// Create the container and editable area and bind a read-only editor
    /// seeded with `content`. Mounting an already mounted manager only
    /// replaces its content.
    pub fn mount(&mut self, surface: &mut Surface, content: TextElement) {
        if self.is_disposed() {
            return;
        }
        if self.nodes.is_some() {
            self.replace_content(content);
            return;
        }
        let rect = self.rectangle();
        let group = surface.scene.create_group();
        surface.scene.add_class(group, TEXT_GROUP_CLASS);
        let foreign_object = surface.scene.create_foreign_object(rect);
        surface.scene.append(group, foreign_object);

        let mut editor = (surface.editor_factory)(content);
        editor.set_readonly(true);
        self.editor = Some(editor);
        self.nodes = Some(OverlayNodes { group, foreign_object });
        self.state = OverlayState::Mounted;
        debug!(key = %self.key, %group, "text overlay mounted");
    }

    /// Attach the container group under `parent`, moving it if it is
    /// attached elsewhere.
    pub fn attach_to(&mut self, surface: &mut Surface, parent: NodeId) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.nodes.is_some_and(|n| surface.scene.append(parent, n.group))
    }

    /// Detach nodes and drop the editor. Leaves edit mode first, firing the
    /// exit callback. Safe to call repeatedly.
    pub fn dispose(&mut self, surface: &mut Surface) {
        if self.is_disposed() {
            return;
        }
        if self.session.is_some() {
            self.finish_edit(surface);
        }
        if let Some(nodes) = self.nodes.take() {
            surface.scene.remove(nodes.group);
        }
        self.editor = None;
        self.composing = false;
        self.state = OverlayState::Disposed;
        debug!(key = %self.key, "text overlay disposed");
    }
}

// =============================================================================
// LAYOUT
// =============================================================================

impl TextManager {
    /// Move/resize the editable area. `None` re-queries the accessor. The
    /// editor (selection, history) is left alone.
    pub fn resize_to(&mut self, surface: &mut Surface, rect: Option<Rect>) {
        if self.is_disposed() {
            return;
        }
        let Some(nodes) = self.nodes else {
            return;
        };
        let rect = rect.unwrap_or_else(|| self.rectangle());
        surface.scene.set_foreign_object_rect(nodes.foreign_object, rect);
    }

    /// Change only the editable area's width.
    pub fn resize_width_to(&mut self, surface: &mut Surface, width: f64) {
        if self.is_disposed() {
            return;
        }
        if let Some(nodes) = self.nodes {
            surface.scene.set_foreign_object_width(nodes.foreign_object, width);
        }
    }

    /// Rotate the container around `center`. A zero angle clears rotation.
    pub fn rotate_to(&mut self, surface: &mut Surface, center: Point, angle: f64) {
        if self.is_disposed() {
            return;
        }
        if let Some(nodes) = self.nodes {
            surface.scene.set_rotation(nodes.group, center, angle);
        }
    }

    /// Push externally originated content (undo/redo, remote edits) into the
    /// editor. Never reported through `on_change`.
    pub fn replace_content(&mut self, content: TextElement) {
        if self.is_disposed() {
            return;
        }
        if let Some(editor) = self.editor.as_mut() {
            editor.replace_value(content);
        }
    }

    /// Measure the live content, or `override_content` when given, in screen
    /// units.
    ///
    /// # Errors
    ///
    /// `NotMounted` before [`mount`](Self::mount) (also a debug assertion:
    /// it means a lifecycle-ordering bug in the caller), `Disposed` after
    /// [`dispose`](Self::dispose).
    pub fn measure_current_size(&self, surface: &Surface, override_content: Option<&TextElement>) -> Result<Size, OverlayError> {
        if self.state == OverlayState::Disposed {
            return Err(OverlayError::Disposed { key: self.key.clone() });
        }
        debug_assert!(self.editor.is_some(), "text overlay {} measured before mount", self.key);
        let Some(editor) = self.editor.as_deref() else {
            return Err(OverlayError::NotMounted { key: self.key.clone() });
        };
        let target = override_content.unwrap_or_else(|| editor.value());
        let size = measure_element(target, &surface.style, self.max_width(surface), surface.metrics.as_ref());
        Ok(size.scaled(surface.viewport.zoom))
    }
}

// =============================================================================
// EDITING
// =============================================================================

impl TextManager {
    /// Enter edit mode. Returns the handle that ends this session, or `None`
    /// when the manager is not mounted. Entering while already editing returns
    /// the current handle and keeps the current exit callback.
    pub fn enter_edit(&mut self, surface: &mut Surface, on_exit: Option<ExitCallback>) -> Option<ExitHandle> {
        if self.is_disposed() {
            return None;
        }
        if let Some(session) = &self.session {
            debug!(key = %self.key, "text overlay already editing");
            return Some(session.handle);
        }
        let editor = self.editor.as_mut()?;
        editor.set_readonly(false);
        if editor.selection().is_none() {
            let end = editor.value().end_point();
            editor.set_selection(end.map(Selection::caret));
        }

        self.sessions_started += 1;
        let handle = ExitHandle::new(self.sessions_started);
        let listener = surface.listeners.subscribe(&self.key);
        self.session = Some(EditSession { handle, listener, on_exit });
        surface.flags.text_editable = true;
        self.state = OverlayState::Editing;
        debug!(key = %self.key, "text overlay entered edit mode");
        Some(handle)
    }

    /// End the session identified by `handle`. Returns `false` (and does
    /// nothing) if that session already ended.
    pub fn exit_edit(&mut self, surface: &mut Surface, handle: ExitHandle) -> bool {
        if self.is_disposed() {
            return false;
        }
        if self.session.as_ref().is_none_or(|s| s.handle != handle) {
            trace!(key = %self.key, "stale exit handle ignored");
            return false;
        }
        self.finish_edit(surface);
        true
    }

    /// End whatever session is active. Returns `false` when not editing.
    pub fn exit_current(&mut self, surface: &mut Surface) -> bool {
        if self.is_disposed() || self.session.is_none() {
            return false;
        }
        self.finish_edit(surface);
        true
    }

    fn finish_edit(&mut self, surface: &mut Surface) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.resize_to(surface, None);
        surface.listeners.unsubscribe(session.listener);
        surface.flags.text_editable = false;
        surface.flags.merging = false;
        if let Some(callback) = session.on_exit {
            callback();
        }
        if let Some(editor) = self.editor.as_mut() {
            editor.set_readonly(true);
        }
        self.composing = false;
        self.state = OverlayState::Mounted;
        debug!(key = %self.key, "text overlay exited edit mode");
    }

    /// Outside-click check for a pointer-down anywhere in the document.
    /// Schedules a deferred exit and returns `true` when the pointer landed
    /// outside the render rectangle and outside any attached companion.
    pub fn handle_pointer_down(&self, surface: &mut Surface, event: &PointerEvent) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let point = surface.viewport.to_doc_point(event.screen);
        let inside = self.render_rectangle().contains_point(point);
        let attached = event
            .target
            .is_some_and(|t| surface.scene.closest_with_class(t, ATTACHED_CLASS).is_some());
        if inside || attached {
            return false;
        }
        trace!(key = %self.key, x = point.x, y = point.y, "pointer down outside text overlay");
        surface.deferred.push(Deferred::ExitEdit { key: self.key.clone(), handle: session.handle });
        true
    }

    /// Route an editor notification. Returns the change that was reported,
    /// if any.
    pub fn handle_editor_event(&mut self, surface: &mut Surface, event: EditorEvent) -> Option<TextChange> {
        if self.is_disposed() || self.editor.is_none() {
            return None;
        }
        match event {
            EditorEvent::Input(input) => self.apply_input(surface, input),
            EditorEvent::Select(selection) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.set_selection(selection);
                }
                None
            }
            EditorEvent::CompositionStart => {
                self.composing = true;
                None
            }
            EditorEvent::CompositionUpdate(data) => self.preview_composition(surface, &data),
            EditorEvent::CompositionEnd(data) => {
                self.composing = false;
                if data.is_empty() {
                    return None;
                }
                self.apply_input(surface, EditInput::InsertText(data))
            }
            EditorEvent::ExitRequested => {
                self.exit_current(surface);
                None
            }
        }
    }

    fn apply_input(&mut self, surface: &mut Surface, input: EditInput) -> Option<TextChange> {
        let editor = self.editor.as_mut()?;
        if !editor.apply(input) {
            return None;
        }
        let new_text = editor.value().clone();
        let size = match self.measure_current_size(surface, None) {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "input applied but not measured");
                return None;
            }
        };
        self.report(surface, TextChange { new_text: Some(new_text), width: size.width, height: size.height })
    }

    /// Measure the shadow document for an IME candidate and report its size
    /// without touching the editor. Range selections produce nothing.
    fn preview_composition(&mut self, surface: &mut Surface, data: &str) -> Option<TextChange> {
        let editor = self.editor.as_deref()?;
        let shadow = build_composition_shadow(editor.value(), editor.selection(), data)?;
        let size = match self.measure_current_size(surface, Some(&shadow)) {
            Ok(size) => size,
            Err(e) => {
                warn!(error = %e, "composition preview not measured");
                return None;
            }
        };
        self.report(surface, TextChange { new_text: None, width: size.width, height: size.height })
    }

    fn report(&mut self, surface: &mut Surface, change: TextChange) -> Option<TextChange> {
        if let Some(on_change) = self.options.on_change.as_mut() {
            on_change(&change, &surface.viewport);
        }
        surface.flags.merging = true;
        Some(change)
    }
}
