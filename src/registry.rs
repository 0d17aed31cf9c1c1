//! Board-scoped text region registry.
//!
//! Maps a region key to its live [`TextManager`] and records which keys each
//! shape owns. Lookups never create entries: generators check, then create.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use tracing::trace;

use crate::board::Surface;
use crate::overlay::{ManagerId, TextManager};
use crate::shape::ShapeId;

#[derive(Debug, Default)]
pub struct TextRegistry {
    managers: HashMap<String, TextManager>,
    shapes: HashMap<ShapeId, Vec<String>>,
    next_manager: u64,
}

impl TextRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the identity for a manager about to be created.
    pub fn next_manager_id(&mut self) -> ManagerId {
        self.next_manager += 1;
        ManagerId(self.next_manager)
    }

    /// Insert or replace the manager under `key`. Returns the replaced one.
    pub fn set(&mut self, key: impl Into<String>, manager: TextManager) -> Option<TextManager> {
        let key = key.into();
        trace!(key = %key, id = ?manager.id(), "registering text manager");
        self.managers.insert(key, manager)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TextManager> {
        self.managers.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TextManager> {
        self.managers.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.managers.contains_key(key)
    }

    /// Dispose and forget the manager under `key`, releasing its nodes and
    /// any edit session. Returns `false` if there was none.
    pub fn delete(&mut self, surface: &mut Surface, key: &str) -> bool {
        let Some(mut manager) = self.remove(key) else {
            return false;
        };
        manager.dispose(surface);
        true
    }

    /// Take the manager under `key` out of the registry without disposing
    /// it. The caller must dispose it or register it again.
    pub fn remove(&mut self, key: &str) -> Option<TextManager> {
        self.managers.remove(key)
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.managers.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    // --- Shape ownership ---

    /// Record the ordered region keys owned by `shape`.
    pub fn associate(&mut self, shape: ShapeId, keys: Vec<String>) {
        self.shapes.insert(shape, keys);
    }

    /// Region keys owned by `shape`, in region order.
    #[must_use]
    pub fn keys_for(&self, shape: &ShapeId) -> &[String] {
        self.shapes.get(shape).map_or(&[], Vec::as_slice)
    }

    /// Drop the ownership record for `shape`.
    pub fn dissociate(&mut self, shape: &ShapeId) -> Option<Vec<String>> {
        self.shapes.remove(shape)
    }
}
