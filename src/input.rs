//! Input model: pointer events, editor events, outside-click listeners, and
//! the deferred task queue.
//!
//! Everything here is plain data plus bookkeeping. The board dispatches
//! pointer-downs to the overlays that hold a listener, and overlays that
//! decide to leave edit mode do so through a [`Deferred`] task so the rest of
//! the current event turn (a companion control closing itself, an IME commit)
//! is processed first.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::VecDeque;

use crate::content::Selection;
use crate::editor::EditInput;
use crate::geometry::Point;
use crate::overlay::ExitHandle;
use crate::scene::NodeId;

/// A pointer-down anywhere in the host document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in screen space (CSS pixels).
    pub screen: Point,
    /// Scene node the pointer landed on, when it landed on one.
    pub target: Option<NodeId>,
}

impl PointerEvent {
    #[must_use]
    pub fn at(screen: Point) -> Self {
        Self { screen, target: None }
    }

    #[must_use]
    pub fn on(screen: Point, target: NodeId) -> Self {
        Self { screen, target: Some(target) }
    }
}

/// Notifications from a region's bound editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The user typed or deleted.
    Input(EditInput),
    /// The selection moved.
    Select(Option<Selection>),
    /// An IME session started.
    CompositionStart,
    /// The IME candidate changed; carries the raw candidate string.
    CompositionUpdate(String),
    /// The IME session committed; carries the final string.
    CompositionEnd(String),
    /// The editor asked to leave edit mode (its own exit hotkey).
    ExitRequested,
}

/// Handle to one outside-click listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registered outside-click listeners, in subscription order.
#[derive(Debug, Default)]
pub struct PointerListeners {
    next_id: u64,
    active: Vec<(ListenerId, String)>,
}

impl PointerListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening on behalf of the overlay registered under `key`.
    pub fn subscribe(&mut self, key: &str) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.active.push((id, key.to_string()));
        id
    }

    /// Stop a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|(l, _)| *l != id);
        self.active.len() != before
    }

    /// Overlay keys to notify, in subscription order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.active.iter().map(|(_, key)| key.clone()).collect()
    }

    /// Number of listeners held for `key`.
    #[must_use]
    pub fn count_for(&self, key: &str) -> usize {
        self.active.iter().filter(|(_, k)| k == key).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Work scheduled to run after the current event turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// Leave edit mode for the overlay under `key`, if `handle` is still its
    /// current session.
    ExitEdit { key: String, handle: ExitHandle },
}

/// FIFO of [`Deferred`] tasks.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<Deferred>,
}

impl DeferredQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Deferred) {
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<Deferred> {
        self.tasks.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
