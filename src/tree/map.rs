//! Ordered map over an unbalanced binary search tree.
//!
//! This module provides [`TreeMap`], a mutable ordered map whose nodes keep a
//! back-reference to their parent. The parent links let every traversal
//! step from one entry to the next without an auxiliary stack.
//!
//! # Overview
//!
//! - O(depth) get
//! - O(depth) add
//! - O(depth) remove (Hibbard deletion)
//! - O(1) len and `is_empty`
//!
//! The tree never rebalances, so depth is O(log N) for random insertion
//! order and O(N) for sorted input.
//!
//! # Examples
//!
//! ```rust
//! use bstmap::tree::TreeMap;
//!
//! let mut map = TreeMap::new();
//! map.add(3, "three");
//! map.add(1, "one");
//! map.add(2, "two");
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! map.remove(&2);
//! assert_eq!(map.get(&2), None);
//! assert_eq!(map.len(), 2);
//! ```
//!
//! # Structural Invariants
//!
//! 1. Every key in a node's left subtree orders before the node's key, every
//!    key in its right subtree orders after it
//! 2. A node is the `left` (or `right`) child of `P` exactly when its
//!    `parent` is `P`
//! 3. `len()` equals the number of nodes reachable from the root

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use super::builder::TreeMapBuilder;
use super::cursor::Entries;
use super::iter::{IntoIter, Iter, Keys, Values};
use super::node::{Node, NodeArena, NodeId};
use super::ordering::{Comparator, NaturalOrder};
use crate::error::{CollectionError, Result};

/// Source of per-map identities, so a cursor can tell its own map apart.
static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(0);

fn next_identity() -> u64 {
    NEXT_IDENTITY.fetch_add(1, AtomicOrdering::Relaxed)
}

// =============================================================================
// TreeMap Definition
// =============================================================================

/// A mutable ordered map based on an unbalanced binary search tree.
///
/// Keys are ordered by the map's [`Comparator`]. [`TreeMap::new`] uses the
/// key type's [`Ord`] implementation; [`TreeMap::with_comparator`] accepts
/// any other ordering, including plain closures.
///
/// Every call to [`add`](Self::add), [`remove`](Self::remove) or
/// [`clear`](Self::clear) bumps a modification counter. Cursors returned by
/// [`entries`](Self::entries) snapshot that counter and refuse to advance
/// once it changes. The counter is a single-threaded debugging aid, not an
/// isolation mechanism.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(depth)          |
/// | `add`          | O(depth)          |
/// | `remove`       | O(depth)          |
/// | `first`/`last` | O(depth)          |
/// | cursor advance | O(depth) worst, O(1) amortized |
/// | `len`          | O(1)              |
/// | `is_empty`     | O(1)              |
///
/// # Examples
///
/// ```rust
/// use bstmap::tree::{NaturalOrder, ReverseOrder, TreeMap};
///
/// let mut map = TreeMap::with_comparator(ReverseOrder(NaturalOrder));
/// map.add(1, "one");
/// map.add(3, "three");
/// map.add(2, "two");
///
/// let values: Vec<&&str> = map.values().collect();
/// assert_eq!(values, vec![&"three", &"two", &"one"]);
/// ```
pub struct TreeMap<K, V, C = NaturalOrder> {
    /// Storage for every node of the tree
    arena: NodeArena<K, V>,
    /// Root node of the tree
    root: Option<NodeId>,
    /// Number of entries
    length: usize,
    /// Bumped by every `add`, `remove` and `clear` call
    modification_count: u64,
    /// Distinguishes this map from every other live map
    identity: u64,
    comparator: C,
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Creates a new empty map ordered by the keys' natural order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, String> = TreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates an empty map with room for `capacity` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidArgument`] if `capacity` exceeds the
    /// number of nodes a map can address.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = TreeMap::try_with_capacity(64).unwrap();
    /// assert!(map.capacity() >= 64);
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        TreeMapBuilder::new().capacity(capacity).build()
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Creates a new empty map ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::with_comparator(|left: &i32, right: &i32| right.cmp(left));
    /// map.add(1, 'a');
    /// map.add(2, 'b');
    /// assert_eq!(map.first(), Some((&2, &'b')));
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::from_arena(NodeArena::new(), comparator)
    }

    pub(crate) fn from_arena(arena: NodeArena<K, V>, comparator: C) -> Self {
        Self {
            arena,
            root: None,
            length: 0,
            modification_count: 0,
            identity: next_identity(),
            comparator,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of nodes the map can hold without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns the comparator that orders this map.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the current value of the modification counter.
    ///
    /// The counter only ever grows (wrapping on overflow) and is advanced by
    /// every `add`, `remove` and `clear` call, whether or not the call
    /// changed the tree's shape.
    #[inline]
    #[must_use]
    pub const fn modification_count(&self) -> u64 {
        self.modification_count
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, &str> = [(3, "three"), (1, "one")].into_iter().collect();
    /// assert_eq!(map.first(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.first_id().map(|id| self.entry_at(id))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.root
            .map(|root| self.arena.rightmost(root))
            .map(|id| self.entry_at(id))
    }

    /// Removes every entry.
    ///
    /// Live cursors are invalidated.
    pub fn clear(&mut self) {
        self.bump_modification_count();
        self.arena.clear();
        self.root = None;
        self.length = 0;
        tracing::trace!(
            modification_count = self.modification_count,
            "cleared tree map"
        );
    }

    /// Returns a fail-fast cursor over the entries in key order.
    ///
    /// The cursor does not borrow the map. It is handed the map on every
    /// advance and reports [`CollectionError::ConcurrentModification`] if
    /// the map was modified since the cursor was created. See [`Entries`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.add(2, "two".to_string());
    /// map.add(1, "one".to_string());
    ///
    /// let mut entries = map.entries();
    /// while entries.has_next() {
    ///     let mut entry = entries.next_entry_mut(&mut map).unwrap();
    ///     let shouted = entry.value().to_uppercase();
    ///     entry.set_value(shouted);
    /// }
    /// assert_eq!(map.get(&1), Some(&"ONE".to_string()));
    /// ```
    #[must_use]
    pub fn entries(&self) -> Entries {
        Entries::new(self.first_id(), self.modification_count, self.identity)
    }

    /// Returns an iterator over the entries in key order.
    ///
    /// The iterator borrows the map, so the map cannot change while it is
    /// alive.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(
            &self.arena,
            self.first_id(),
            self.root.map(|root| self.arena.rightmost(root)),
            self.length,
        )
    }

    /// Returns an iterator over the keys in order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let map: TreeMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    // =========================================================================
    // Crate-internal accessors used by cursors
    // =========================================================================

    pub(crate) const fn arena(&self) -> &NodeArena<K, V> {
        &self.arena
    }

    pub(crate) const fn arena_mut(&mut self) -> &mut NodeArena<K, V> {
        &mut self.arena
    }

    fn first_id(&self) -> Option<NodeId> {
        self.root.map(|root| self.arena.leftmost(root))
    }

    fn entry_at(&self, id: NodeId) -> (&K, &V) {
        let node = &self.arena[id];
        (&node.key, &node.value)
    }

    const fn bump_modification_count(&mut self) {
        self.modification_count = self.modification_count.wrapping_add(1);
    }

    /// Puts `replacement` where `child` hung below `parent` (or at the root)
    /// and points the replacement's parent link at `parent`.
    fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        child: NodeId,
        replacement: Option<NodeId>,
    ) {
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let parent_node = &mut self.arena[parent];
                if parent_node.left == Some(child) {
                    parent_node.left = replacement;
                } else {
                    parent_node.right = replacement;
                }
            }
        }
        if let Some(replacement) = replacement {
            self.arena[replacement].parent = parent;
        }
    }

    /// Hangs `replacement` where `id` was and frees the slot of `id`.
    fn unlink(&mut self, id: NodeId, replacement: Option<NodeId>) -> Node<K, V> {
        let parent = self.arena[id].parent;
        self.replace_child(parent, id, replacement);
        self.arena.release(id)
    }

    /// Verifies that a cursor snapshot still matches this map.
    pub(crate) fn check_cursor(&self, expected_count: u64, identity: u64) -> Result<()> {
        if identity == self.identity && expected_count == self.modification_count {
            Ok(())
        } else {
            tracing::debug!(
                expected = expected_count,
                actual = self.modification_count,
                same_map = identity == self.identity,
                "tree map cursor detected concurrent modification"
            );
            Err(CollectionError::ConcurrentModification {
                expected: expected_count,
                actual: self.modification_count,
            })
        }
    }

    /// Checks every structural invariant except key ordering.
    #[cfg(test)]
    pub(crate) fn assert_links_consistent(&self) {
        let mut reachable = 0;
        let mut pending: Vec<NodeId> = self.root.into_iter().collect();
        if let Some(root) = self.root {
            assert_eq!(self.arena[root].parent, None, "root has a parent");
        }
        while let Some(id) = pending.pop() {
            reachable += 1;
            let node = &self.arena[id];
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.arena[child].parent, Some(id), "stale parent link");
                pending.push(child);
            }
        }
        assert_eq!(reachable, self.length, "length disagrees with reachable nodes");
        assert_eq!(self.arena.occupied(), self.length, "arena leaks slots");
    }
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.add("hello".to_string(), 42);
    ///
    /// assert_eq!(map.get(&"hello".to_string()), Some(&42));
    /// assert_eq!(map.get(&"world".to_string()), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.arena[id].value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// Replacing a value is not a structural change, so live cursors stay
    /// valid.
    #[must_use]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find(key).map(|id| &mut self.arena[id].value)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// An existing key keeps its node and only has its value overwritten;
    /// the length is unchanged. The modification counter is bumped either
    /// way, so any live cursor is invalidated.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.add(1, "one"), None);
    /// assert_eq!(map.add(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn add(&mut self, key: K, value: V) -> Option<V> {
        self.bump_modification_count();

        let mut parent = None;
        let mut goes_left = false;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &mut self.arena[id];
            match self.comparator.compare(&key, &node.key) {
                Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
                Ordering::Less => {
                    goes_left = true;
                    current = node.left;
                }
                Ordering::Greater => {
                    goes_left = false;
                    current = node.right;
                }
            }
            parent = Some(id);
        }

        let id = self.arena.allocate(Node::leaf(key, value, parent));
        match parent {
            None => self.root = Some(id),
            Some(parent) if goes_left => self.arena[parent].left = Some(id),
            Some(parent) => self.arena[parent].right = Some(id),
        }
        self.length += 1;

        tracing::trace!(
            length = self.length,
            modification_count = self.modification_count,
            "inserted tree map node"
        );
        None
    }

    /// Removes a key from the map, returning its value if it was present.
    ///
    /// A node without a right child is replaced by its left subtree. A node
    /// with a right child takes over the key and value of its in-order
    /// successor, and the successor's node is unlinked instead.
    ///
    /// The modification counter is bumped even when the key is absent.
    ///
    /// # Complexity
    ///
    /// O(depth)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let mut map: TreeMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
    /// assert_eq!(map.remove(&1), Some("one"));
    /// assert_eq!(map.remove(&1), None);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.bump_modification_count();

        let target = self.find(key)?;
        let removed = match self.arena[target].right {
            None => {
                let left = self.arena[target].left;
                self.unlink(target, left).value
            }
            Some(right) => {
                let successor = self.arena.leftmost(right);
                let successor_right = self.arena[successor].right;
                let promoted = self.unlink(successor, successor_right);
                let node = &mut self.arena[target];
                node.key = promoted.key;
                mem::replace(&mut node.value, promoted.value)
            }
        };
        self.length -= 1;

        tracing::trace!(
            length = self.length,
            modification_count = self.modification_count,
            "removed tree map node"
        );
        Some(removed)
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K: Ord, V> Default for TreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Clones the entries and comparator into a map with its own identity.
///
/// Cursors created from the original are not valid for the clone.
impl<K: Clone, V: Clone, C: Clone> Clone for TreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            root: self.root,
            length: self.length,
            modification_count: self.modification_count,
            identity: next_identity(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order: Vec<NodeId> = {
            let mut order = Vec::with_capacity(self.length);
            let mut current = self.first_id();
            while let Some(id) = current {
                order.push(id);
                current = self.arena.successor(id);
            }
            order
        };
        IntoIter::new(self.arena, order)
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns a reference to the value for `key`.
///
/// # Panics
///
/// Panics if the key is not present in the map.
impl<K, V, C: Comparator<K>> Index<&K> for TreeMap<K, V, C> {
    type Output = V;

    fn index(&self, key: &K) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in tree map"),
        }
    }
}

/// Two maps are equal when they yield the same entries in the same order.
impl<K: PartialEq, V: PartialEq, C> PartialEq for TreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for TreeMap<K, V, C> {}

/// Hashes the length followed by every entry in key order.
impl<K: Hash, V: Hash, C> Hash for TreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for TreeMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(TreeMap<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for TreeMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct TreeMapVisitor<K, V> {
    key_marker: std::marker::PhantomData<K>,
    value_marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<K, V> TreeMapVisitor<K, V> {
    const fn new() -> Self {
        Self {
            key_marker: std::marker::PhantomData,
            value_marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::de::Visitor<'de> for TreeMapVisitor<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    type Value = TreeMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = TreeMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.add(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for TreeMap<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(TreeMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ReverseOrder;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn numbers() -> TreeMap<i32, &'static str> {
        let mut map = TreeMap::new();
        for (key, value) in [
            (1, "one"),
            (3, "three"),
            (7, "seven"),
            (0, "zero"),
            (5, "five"),
            (2, "two"),
        ] {
            map.add(key, value);
        }
        map
    }

    fn values<C>(map: &TreeMap<i32, &'static str, C>) -> Vec<&'static str> {
        map.values().copied().collect()
    }

    // =========================================================================
    // Shape Tests
    // =========================================================================

    #[rstest]
    fn test_first_insert_becomes_root(numbers: TreeMap<i32, &'static str>) {
        let root = numbers.root.unwrap();
        assert_eq!(numbers.arena[root].key, 1);
        assert_eq!(numbers.arena[root].parent, None);
    }

    #[rstest]
    fn test_links_consistent_after_inserts(numbers: TreeMap<i32, &'static str>) {
        numbers.assert_links_consistent();
    }

    #[rstest]
    fn test_remove_root_promotes_successor_contents() {
        let mut map = TreeMap::new();
        for (key, value) in [
            (3, "three"),
            (1, "one"),
            (7, "seven"),
            (0, "zero"),
            (5, "five"),
            (2, "two"),
        ] {
            map.add(key, value);
        }
        let root_before = map.root.unwrap();

        assert_eq!(map.remove(&3), Some("three"));

        let root_after = map.root.unwrap();
        assert_eq!(root_after, root_before);
        assert_eq!(map.arena[root_after].key, 5);
        assert_eq!(map.arena[root_after].value, "five");
        assert_eq!(values(&map), vec!["zero", "one", "two", "five", "seven"]);
        assert_eq!(map.len(), 5);
        map.assert_links_consistent();
    }

    #[rstest]
    fn test_remove_with_immediate_right_successor() {
        let mut map: TreeMap<i32, i32> = [(2, 20), (1, 10), (3, 30), (4, 40)]
            .into_iter()
            .collect();
        // 3 is the right child of 2 and has no left child.
        assert_eq!(map.remove(&2), Some(20));

        let root = map.root.unwrap();
        assert_eq!(map.arena[root].key, 3);
        let right = map.arena[root].right.unwrap();
        assert_eq!(map.arena[right].key, 4);
        assert_eq!(map.arena[right].parent, Some(root));
        map.assert_links_consistent();
    }

    #[rstest]
    fn test_remove_successor_with_right_child_relinks_parent() {
        let mut map: TreeMap<i32, i32> = [(10, 0), (5, 0), (20, 0), (15, 0), (17, 0)]
            .into_iter()
            .collect();
        // Successor of 10 is 15, whose right child 17 moves under 20.
        map.remove(&10);

        let root = map.root.unwrap();
        assert_eq!(map.arena[root].key, 15);
        let twenty = map.arena[root].right.unwrap();
        let seventeen = map.arena[twenty].left.unwrap();
        assert_eq!(map.arena[seventeen].key, 17);
        assert_eq!(map.arena[seventeen].parent, Some(twenty));
        map.assert_links_consistent();
    }

    #[rstest]
    fn test_remove_node_without_right_child_lifts_left_subtree() {
        let mut map: TreeMap<i32, i32> = [(10, 0), (5, 0), (3, 0), (4, 0)].into_iter().collect();
        map.remove(&5);

        let root = map.root.unwrap();
        let three = map.arena[root].left.unwrap();
        assert_eq!(map.arena[three].key, 3);
        assert_eq!(map.arena[three].parent, Some(root));
        map.assert_links_consistent();
    }

    #[rstest]
    fn test_remove_only_node_empties_tree() {
        let mut map = TreeMap::new();
        map.add(1, "one");
        map.remove(&1);
        assert_eq!(map.root, None);
        assert!(map.is_empty());
        map.assert_links_consistent();
    }

    #[rstest]
    fn test_removed_slot_is_reused() {
        let mut map: TreeMap<i32, i32> = (0..4).map(|key| (key, key)).collect();
        map.remove(&3);
        map.add(10, 10);
        assert_eq!(map.arena.occupied(), 4);
        map.assert_links_consistent();
    }

    // =========================================================================
    // Modification Counter Tests
    // =========================================================================

    #[rstest]
    fn test_add_overwrite_bumps_modification_count(mut numbers: TreeMap<i32, &'static str>) {
        let before = numbers.modification_count();
        numbers.add(1, "uno");
        assert_eq!(numbers.modification_count(), before + 1);
    }

    #[rstest]
    fn test_remove_missing_key_bumps_modification_count(
        mut numbers: TreeMap<i32, &'static str>,
    ) {
        let before = numbers.modification_count();
        assert_eq!(numbers.remove(&100), None);
        assert_eq!(numbers.modification_count(), before + 1);
        assert_eq!(numbers.len(), 6);
    }

    #[rstest]
    fn test_get_does_not_touch_modification_count(numbers: TreeMap<i32, &'static str>) {
        let before = numbers.modification_count();
        let _ = numbers.get(&3);
        let _ = numbers.get(&42);
        assert_eq!(numbers.modification_count(), before);
    }

    #[rstest]
    fn test_get_mut_does_not_touch_modification_count(mut numbers: TreeMap<i32, &'static str>) {
        let before = numbers.modification_count();
        if let Some(value) = numbers.get_mut(&3) {
            *value = "drei";
        }
        assert_eq!(numbers.modification_count(), before);
        assert_eq!(numbers.get(&3), Some(&"drei"));
    }

    #[rstest]
    fn test_clone_gets_fresh_identity(numbers: TreeMap<i32, &'static str>) {
        let cloned = numbers.clone();
        assert_ne!(cloned.identity, numbers.identity);
        assert_eq!(cloned, numbers);
    }

    // =========================================================================
    // Ordering Tests
    // =========================================================================

    #[rstest]
    fn test_reverse_comparator_shape() {
        let mut map = TreeMap::with_comparator(ReverseOrder(NaturalOrder));
        map.add(1, "one");
        map.add(3, "three");
        let root = map.root.unwrap();
        // 3 orders before 1 in reverse order, so it hangs on the left.
        assert!(map.arena[root].left.is_some());
        assert!(map.arena[root].right.is_none());
    }

    #[rstest]
    fn test_display_sorted(numbers: TreeMap<i32, &'static str>) {
        assert_eq!(
            format!("{numbers}"),
            "{0: zero, 1: one, 2: two, 3: three, 5: five, 7: seven}"
        );
    }

    #[rstest]
    fn test_display_empty() {
        let map: TreeMap<i32, String> = TreeMap::new();
        assert_eq!(format!("{map}"), "{}");
    }

    // =========================================================================
    // Structural Properties
    // =========================================================================

    #[derive(Debug, Clone)]
    enum Operation {
        Add(u8, u16),
        Remove(u8),
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            (any::<u8>(), any::<u16>()).prop_map(|(key, value)| Operation::Add(key, value)),
            any::<u8>().prop_map(Operation::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_links_stay_consistent(operations in prop::collection::vec(operation(), 0..200)) {
            let mut map = TreeMap::new();
            let mut model = std::collections::BTreeMap::new();
            for operation in operations {
                match operation {
                    Operation::Add(key, value) => {
                        prop_assert_eq!(map.add(key, value), model.insert(key, value));
                    }
                    Operation::Remove(key) => {
                        prop_assert_eq!(map.remove(&key), model.remove(&key));
                    }
                }
                map.assert_links_consistent();
            }
            let entries: Vec<(u8, u16)> = map.iter().map(|(key, value)| (*key, *value)).collect();
            let expected: Vec<(u8, u16)> = model.into_iter().collect();
            prop_assert_eq!(entries, expected);
        }
    }
}
