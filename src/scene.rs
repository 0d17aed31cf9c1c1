//! Retained drawing tree that the host mirrors into SVG/DOM.
//!
//! Overlays never touch the DOM directly. They create and position nodes here
//! (a `g` group per region holding one `foreignObject`), and the host diffs
//! this tree into the real document. Pointer events come back carrying the
//! `NodeId` they landed on, which is how "clicked a companion toolbar" is
//! detected without DOM access.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;
use std::fmt;

use crate::geometry::{Point, Rect};

/// Handle to a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `<g>` container.
    Group,
    /// `<foreignObject>` hosting an editable area, in document space.
    ForeignObject { rect: Rect },
    /// Any other host element (toolbars, popovers, shape paths).
    Element { tag: String },
}

/// Rotation transform around a center point, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub center: Point,
    pub angle: f64,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub classes: Vec<String>,
    pub rotation: Option<Rotation>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self { kind, parent: None, children: Vec::new(), classes: Vec::new(), rotation: None }
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Arena of drawing nodes rooted at the board's host group.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    root: NodeId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// A scene holding only the root group.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(NodeKind::Group));
        Self { nodes, next_id: 1, root }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(kind));
        id
    }

    /// Create a detached `<g>`.
    pub fn create_group(&mut self) -> NodeId {
        self.alloc(NodeKind::Group)
    }

    /// Create a detached `<foreignObject>` at `rect`.
    pub fn create_foreign_object(&mut self, rect: Rect) -> NodeId {
        self.alloc(NodeKind::ForeignObject { rect })
    }

    /// Create a detached host element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Element { tag: tag.into() })
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id)?.parent
    }

    /// Whether `id` is connected to the root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == self.root)
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.contains(id).then_some(id), |n| self.parent(*n))
    }

    /// Move `child` under `parent` as its last child. Fails when either node
    /// is missing or the move would create a cycle.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.ancestors(parent).any(|a| a == child) {
            return false;
        }
        self.detach(child);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Unlink `id` from its parent, keeping the subtree alive.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(c) = self.nodes.get_mut(&id) {
            c.parent = None;
        }
    }

    /// Remove `id` and its whole subtree. Returns `false` if `id` was already
    /// gone. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
        }
        true
    }

    #[must_use]
    pub fn foreign_object_rect(&self, id: NodeId) -> Option<Rect> {
        match self.nodes.get(&id)?.kind {
            NodeKind::ForeignObject { rect } => Some(rect),
            _ => None,
        }
    }

    /// Reposition a foreign object. Returns `false` for other node kinds.
    pub fn set_foreign_object_rect(&mut self, id: NodeId, rect: Rect) -> bool {
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::ForeignObject { rect: current }) => {
                *current = rect;
                true
            }
            _ => false,
        }
    }

    /// Change only a foreign object's width.
    pub fn set_foreign_object_width(&mut self, id: NodeId, width: f64) -> bool {
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::ForeignObject { rect }) => {
                rect.width = width;
                true
            }
            _ => false,
        }
    }

    /// Set or clear a node's rotation. A zero angle clears it.
    pub fn set_rotation(&mut self, id: NodeId, center: Point, angle: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.rotation = (angle.abs() > 0.0).then_some(Rotation { center, angle });
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if !node.has_class(class) {
                node.classes.push(class.to_string());
            }
        }
    }

    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.has_class(class))
    }

    /// Nearest node from `id` upward (inclusive) carrying `class`.
    #[must_use]
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.ancestors(id).find(|n| self.has_class(*n, class))
    }
}
