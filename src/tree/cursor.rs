//! Fail-fast cursors over a [`TreeMap`].
//!
//! An [`Entries`] cursor remembers the next node to visit and the map's
//! modification count at the time it was created. It does not borrow the
//! map: every advance is handed the map explicitly, which is what allows a
//! caller to (mistakenly) modify the map between two advances. The cursor
//! detects that and reports [`CollectionError::ConcurrentModification`]
//! instead of walking a tree whose nodes may have moved.
//!
//! # Examples
//!
//! ```rust
//! use bstmap::error::CollectionError;
//! use bstmap::tree::TreeMap;
//!
//! let map: TreeMap<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
//!
//! let mut entries = map.entries();
//! assert_eq!(*entries.next_entry(&map).unwrap().key(), 1);
//! assert_eq!(*entries.next_entry(&map).unwrap().key(), 2);
//! assert_eq!(entries.next_entry(&map), Err(CollectionError::ExhaustedIterator));
//! ```

use super::map::TreeMap;
use super::node::NodeId;
use crate::error::{CollectionError, Result};

// =============================================================================
// Entries Definition
// =============================================================================

/// A single-pass, fail-fast cursor over the entries of a [`TreeMap`] in key
/// order.
///
/// Created by [`TreeMap::entries`]. A cursor only works with the map that
/// created it; any other map, including a clone, is treated as a concurrent
/// modification.
#[derive(Debug)]
pub struct Entries {
    next: Option<NodeId>,
    expected_modification_count: u64,
    map_identity: u64,
}

impl Entries {
    pub(crate) const fn new(
        first: Option<NodeId>,
        expected_modification_count: u64,
        map_identity: u64,
    ) -> Self {
        Self {
            next: first,
            expected_modification_count,
            map_identity,
        }
    }

    /// Returns `true` if the cursor has not yet produced every entry.
    ///
    /// This does not check for concurrent modification.
    #[inline]
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the modification count this cursor expects its map to have.
    #[inline]
    #[must_use]
    pub const fn expected_modification_count(&self) -> u64 {
        self.expected_modification_count
    }

    /// Advances the cursor and returns a read-only view of the entry.
    ///
    /// # Errors
    ///
    /// - [`CollectionError::ConcurrentModification`] if `map` was modified
    ///   after this cursor was created, or is not the map that created it
    /// - [`CollectionError::ExhaustedIterator`] if every entry has already
    ///   been produced
    pub fn next_entry<'a, K, V, C>(
        &mut self,
        map: &'a TreeMap<K, V, C>,
    ) -> Result<Entry<'a, K, V>> {
        let id = self.advance(map)?;
        let node = &map.arena()[id];
        Ok(Entry {
            key: &node.key,
            value: &node.value,
        })
    }

    /// Advances the cursor and returns a view that can replace the value.
    ///
    /// Replacing a value does not invalidate the cursor.
    ///
    /// # Errors
    ///
    /// Same as [`next_entry`](Self::next_entry).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bstmap::tree::TreeMap;
    ///
    /// let mut map: TreeMap<i32, i32> = [(1, 10), (2, 20)].into_iter().collect();
    /// let mut entries = map.entries();
    /// let mut entry = entries.next_entry_mut(&mut map).unwrap();
    /// assert_eq!(entry.set_value(11), 10);
    /// assert_eq!(map.get(&1), Some(&11));
    /// ```
    pub fn next_entry_mut<'a, K, V, C>(
        &mut self,
        map: &'a mut TreeMap<K, V, C>,
    ) -> Result<EntryMut<'a, K, V>> {
        let id = self.advance(map)?;
        let node = &mut map.arena_mut()[id];
        Ok(EntryMut {
            key: &node.key,
            value: &mut node.value,
        })
    }

    fn advance<K, V, C>(&mut self, map: &TreeMap<K, V, C>) -> Result<NodeId> {
        map.check_cursor(self.expected_modification_count, self.map_identity)?;
        let current = self.next.ok_or(CollectionError::ExhaustedIterator)?;
        self.next = map.arena().successor(current);
        Ok(current)
    }
}

// =============================================================================
// Entry Views
// =============================================================================

/// A read-only view of one entry produced by [`Entries::next_entry`].
///
/// Two entries are equal when both their keys and their values are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry<'a, K, V> {
    key: &'a K,
    value: &'a V,
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Returns the entry's key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &'a K {
        self.key
    }

    /// Returns the entry's value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &'a V {
        self.value
    }

    /// Splits the view into its key and value.
    #[inline]
    #[must_use]
    pub const fn into_parts(self) -> (&'a K, &'a V) {
        (self.key, self.value)
    }
}

/// A view of one entry produced by [`Entries::next_entry_mut`].
///
/// The key is read-only; the value can be replaced in place.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EntryMut<'a, K, V> {
    key: &'a K,
    value: &'a mut V,
}

impl<'a, K, V> EntryMut<'a, K, V> {
    /// Returns the entry's key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &'a K {
        self.key
    }

    /// Returns the entry's value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &V {
        self.value
    }

    /// Returns a mutable reference to the entry's value.
    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        self.value
    }

    /// Replaces the entry's value, returning the previous one.
    #[inline]
    pub fn set_value(&mut self, value: V) -> V {
        std::mem::replace(self.value, value)
    }

    /// Converts the view into a mutable reference bound to the map borrow.
    #[inline]
    #[must_use]
    pub fn into_value_mut(self) -> &'a mut V {
        self.value
    }
}
