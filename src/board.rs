//! Board context: the drawing surface plus the text region registry.
//!
//! Split in two so an overlay manager borrowed mutably out of the registry
//! can still mutate the scene, flags, and listener table it lives in.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::fmt;

use tracing::debug;

use crate::config::TextConfig;
use crate::editor::{EditorFactory, plain_editor};
use crate::geometry::Viewport;
use crate::input::{Deferred, DeferredQueue, PointerEvent, PointerListeners};
use crate::measure::{GlyphMetrics, HeuristicMetrics, TextStyle};
use crate::overlay::ExitHandle;
use crate::registry::TextRegistry;
use crate::scene::Scene;

/// Board-level editing flags read by the host's history and hotkeys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardFlags {
    /// Some region is in edit mode; board hotkeys must stand down.
    pub text_editable: bool,
    /// Consecutive text operations should merge into one history entry.
    pub merging: bool,
}

/// Everything an overlay manager touches besides itself.
pub struct Surface {
    pub scene: Scene,
    pub viewport: Viewport,
    pub flags: BoardFlags,
    pub listeners: PointerListeners,
    pub deferred: DeferredQueue,
    pub style: TextStyle,
    pub metrics: Box<dyn GlyphMetrics>,
    pub editor_factory: EditorFactory,
    /// Wrap limit for managers without a max-width accessor.
    pub max_width: f64,
    /// Inset between a shape's edge and its text rectangle.
    pub shape_padding: f64,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("viewport", &self.viewport)
            .field("flags", &self.flags)
            .field("listeners", &self.listeners.len())
            .field("deferred", &self.deferred.len())
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Surface {
    #[must_use]
    pub fn new(config: &TextConfig) -> Self {
        Self {
            scene: Scene::new(),
            viewport: Viewport::default(),
            flags: BoardFlags::default(),
            listeners: PointerListeners::new(),
            deferred: DeferredQueue::new(),
            style: config.style(),
            metrics: Box::new(HeuristicMetrics),
            editor_factory: plain_editor,
            max_width: config.max_width,
            shape_padding: config.shape_padding,
        }
    }
}

/// Board context passed by reference to every generator and component.
#[derive(Debug)]
pub struct Board {
    pub surface: Surface,
    pub texts: TextRegistry,
}

impl Default for Board {
    fn default() -> Self {
        Self::with_config(&TextConfig::default())
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: &TextConfig) -> Self {
        Self { surface: Surface::new(config), texts: TextRegistry::new() }
    }

    /// Swap the glyph metrics used for measurement.
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl GlyphMetrics + 'static) -> Self {
        self.surface.metrics = Box::new(metrics);
        self
    }

    /// Swap the editor built for newly mounted regions.
    #[must_use]
    pub fn with_editor_factory(mut self, factory: EditorFactory) -> Self {
        self.surface.editor_factory = factory;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.surface.viewport
    }

    /// Apply a zoom/pan change. Overlays pick it up on their next resize.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.surface.viewport = viewport;
    }

    #[must_use]
    pub fn flags(&self) -> BoardFlags {
        self.surface.flags
    }

    // --- Input ---

    /// Deliver a document-wide pointer-down to every listening overlay.
    /// Returns how many exits were scheduled.
    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> usize {
        let mut keys = self.surface.listeners.keys();
        keys.dedup();
        let mut scheduled = 0;
        for key in keys {
            if let Some(manager) = self.texts.get(&key) {
                if manager.handle_pointer_down(&mut self.surface, event) {
                    scheduled += 1;
                }
            }
        }
        scheduled
    }

    /// Drain deferred work scheduled during the previous event turn.
    /// Returns how many tasks changed something.
    pub fn run_deferred(&mut self) -> usize {
        let mut applied = 0;
        while let Some(task) = self.surface.deferred.pop() {
            match task {
                Deferred::ExitEdit { key, handle } => {
                    if self.exit_edit(&key, handle) {
                        applied += 1;
                    }
                }
            }
        }
        applied
    }

    /// End the edit session `handle` of the overlay under `key`.
    pub fn exit_edit(&mut self, key: &str, handle: ExitHandle) -> bool {
        let Some(manager) = self.texts.get_mut(key) else {
            debug!(key, "exit requested for unregistered text overlay");
            return false;
        };
        manager.exit_edit(&mut self.surface, handle)
    }
}
