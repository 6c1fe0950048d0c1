#![forbid(unsafe_code)]

//! Host element hierarchy as seen by the gesture router.

use std::collections::HashMap;

use crate::event::TargetId;
use crate::geometry::Size;

/// Upper bound on bubbling depth; protects against cyclic host trees.
pub const MAX_BUBBLE_DEPTH: usize = 256;

/// Read-only view of the host's element tree.
pub trait TargetTree {
    /// Parent element, or `None` at the root.
    fn parent(&self, target: TargetId) -> Option<TargetId>;

    /// Current rendered size, or `None` if the element is gone.
    fn size(&self, target: TargetId) -> Option<Size>;
}

/// Bubble path from `target` up to the root, target first.
#[must_use]
pub fn bubble_path(tree: &dyn TargetTree, target: TargetId) -> Vec<TargetId> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(parent) = tree.parent(current) {
        if path.len() >= MAX_BUBBLE_DEPTH || path.contains(&parent) {
            break;
        }
        path.push(parent);
        current = parent;
    }
    path
}

#[derive(Debug, Clone, Copy)]
struct Node {
    parent: Option<TargetId>,
    size: Size,
}

/// A [`TargetTree`] backed by a map, for hosts that mirror only the
/// elements they attach gestures to.
#[derive(Debug, Clone, Default)]
pub struct StaticTree {
    nodes: HashMap<TargetId, Node>,
}

impl StaticTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an element.
    #[must_use]
    pub fn with_node(mut self, target: TargetId, parent: Option<TargetId>, size: Size) -> Self {
        self.insert(target, parent, size);
        self
    }

    pub fn insert(&mut self, target: TargetId, parent: Option<TargetId>, size: Size) {
        self.nodes.insert(target, Node { parent, size });
    }

    /// Update the size of a known element. Returns false if unknown.
    pub fn resize(&mut self, target: TargetId, size: Size) -> bool {
        match self.nodes.get_mut(&target) {
            Some(node) => {
                node.size = size;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, target: TargetId) -> bool {
        self.nodes.remove(&target).is_some()
    }
}

impl TargetTree for StaticTree {
    fn parent(&self, target: TargetId) -> Option<TargetId> {
        self.nodes.get(&target).and_then(|node| node.parent)
    }

    fn size(&self, target: TargetId) -> Option<Size> {
        self.nodes.get(&target).map(|node| node.size)
    }
}
