//! Configuration for new [`TreeMap`]s.

use super::map::TreeMap;
use super::node::{NodeArena, NodeId};
use super::ordering::NaturalOrder;
use crate::error::{CollectionError, Result};

/// Builds a [`TreeMap`] with a chosen comparator and initial capacity.
///
/// # Examples
///
/// ```rust
/// use bstmap::tree::{NaturalOrder, ReverseOrder, TreeMap, TreeMapBuilder};
///
/// let mut map: TreeMap<u32, &str, _> = TreeMapBuilder::new()
///     .comparator(ReverseOrder(NaturalOrder))
///     .capacity(16)
///     .build()
///     .unwrap();
///
/// map.add(1, "one");
/// map.add(2, "two");
/// assert_eq!(map.first(), Some((&2, &"two")));
/// assert!(map.capacity() >= 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeMapBuilder<C = NaturalOrder> {
    comparator: C,
    capacity: usize,
}

impl TreeMapBuilder {
    /// Creates a builder for a natural-order map with no preallocation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            comparator: NaturalOrder,
            capacity: 0,
        }
    }
}

impl<C> TreeMapBuilder<C> {
    /// Orders the map with `comparator` instead of the current one.
    #[must_use]
    pub fn comparator<D>(self, comparator: D) -> TreeMapBuilder<D> {
        TreeMapBuilder {
            comparator,
            capacity: self.capacity,
        }
    }

    /// Preallocates room for `capacity` nodes.
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Creates the map.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidArgument`] if the capacity exceeds
    /// the number of nodes a map can address.
    pub fn build<K, V>(self) -> Result<TreeMap<K, V, C>> {
        if self.capacity > NodeId::MAX_NODES {
            return Err(CollectionError::InvalidArgument {
                name: "capacity",
                reason: format!("exceeds {} nodes", NodeId::MAX_NODES),
            });
        }
        Ok(TreeMap::from_arena(
            NodeArena::with_capacity(self.capacity),
            self.comparator,
        ))
    }
}
