//! Arena storage for tree nodes.
//!
//! Nodes are stored in a `Vec` of slots owned by the map. Child links are
//! slot indices that only the owning map rewires; the parent link is a plain
//! back-reference used to walk upwards during traversal and never decides
//! when a node is dropped. Vacated slots are kept on a free list and reused
//! by later insertions.

use std::ops::{Index, IndexMut};

// =============================================================================
// NodeId Definition
// =============================================================================

/// Index of a node slot inside a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// Largest number of nodes a single arena can address.
    pub(crate) const MAX_NODES: usize = u32::MAX as usize;

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) => Self(raw),
            Err(_) => panic!("tree map node count exceeds {}", Self::MAX_NODES),
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A single key-value entry together with its tree links.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Creates a leaf node hanging below `parent`.
    pub(crate) const fn leaf(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
        }
    }
}

// =============================================================================
// NodeArena Definition
// =============================================================================

/// Slot storage for the nodes of one tree.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free_list: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Stores `node` in a vacant slot, growing the arena if none is free.
    pub(crate) fn allocate(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.slots[id.index()] = Some(node);
            id
        } else {
            let id = NodeId::from_index(self.slots.len());
            self.slots.push(Some(node));
            id
        }
    }

    /// Vacates the slot of `id` and hands back the node it held.
    ///
    /// The caller must already have unlinked the node from the tree.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        match self.slots[id.index()].take() {
            Some(node) => {
                self.free_list.push(id);
                node
            }
            None => unreachable!("released vacant node slot {id:?}"),
        }
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) fn occupied(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    // =========================================================================
    // Traversal Helpers
    // =========================================================================

    /// Follows left links from `id` down to the smallest node of its subtree.
    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    /// Follows right links from `id` down to the largest node of its subtree.
    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self[id].right {
            id = right;
        }
        id
    }

    /// Returns the in-order successor of `id`, or `None` for the last node.
    ///
    /// With a right subtree the successor is its leftmost node. Otherwise it
    /// is the first ancestor reached through a left edge.
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self[id].right {
            return Some(self.leftmost(right));
        }
        let mut child = id;
        let mut parent = self[id].parent;
        while let Some(ancestor) = parent {
            if self[ancestor].right != Some(child) {
                break;
            }
            child = ancestor;
            parent = self[ancestor].parent;
        }
        parent
    }

    /// Mirror image of [`successor`](Self::successor).
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self[id].left {
            return Some(self.rightmost(left));
        }
        let mut child = id;
        let mut parent = self[id].parent;
        while let Some(ancestor) = parent {
            if self[ancestor].left != Some(child) {
                break;
            }
            child = ancestor;
            parent = self[ancestor].parent;
        }
        parent
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        match &self.slots[id.index()] {
            Some(node) => node,
            None => unreachable!("node id {id:?} refers to a vacant slot"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match &mut self.slots[id.index()] {
            Some(node) => node,
            None => unreachable!("node id {id:?} refers to a vacant slot"),
        }
    }
}
