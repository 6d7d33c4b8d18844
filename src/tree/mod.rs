//! Ordered map backed by an unbalanced binary search tree.
//!
//! This module provides:
//!
//! - [`TreeMap`]: the map itself, with Hibbard deletion and parent-threaded
//!   nodes
//! - [`Entries`]: a fail-fast cursor that detects modification of the map
//!   between two advances
//! - [`Iter`], [`Keys`], [`Values`], [`IntoIter`]: ordinary iterators that
//!   rely on the borrow checker instead
//! - [`Comparator`], [`NaturalOrder`], [`ReverseOrder`]: key orderings
//! - [`TreeMapBuilder`]: comparator and capacity configuration
//!
//! # Examples
//!
//! ## Natural order
//!
//! ```rust
//! use bstmap::tree::TreeMap;
//!
//! let mut map = TreeMap::new();
//! for (key, value) in [(1, "one"), (3, "three"), (7, "seven"), (0, "zero"), (5, "five"), (2, "two")] {
//!     map.add(key, value);
//! }
//!
//! let values: Vec<&&str> = map.values().collect();
//! assert_eq!(values, vec![&"zero", &"one", &"two", &"three", &"five", &"seven"]);
//! ```
//!
//! ## Custom order
//!
//! ```rust
//! use bstmap::tree::TreeMap;
//!
//! let mut map = TreeMap::with_comparator(|left: &i32, right: &i32| right.cmp(left));
//! map.add(1, "one");
//! map.add(7, "seven");
//! map.add(3, "three");
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&7, &3, &1]);
//! ```
//!
//! ## Fail-fast cursor
//!
//! ```rust
//! use bstmap::error::CollectionError;
//! use bstmap::tree::TreeMap;
//!
//! let mut map: TreeMap<i32, &str> = [(0, "zero"), (1, "one")].into_iter().collect();
//!
//! let mut entries = map.entries();
//! assert!(entries.next_entry(&map).is_ok());
//!
//! map.remove(&1);
//! assert!(matches!(
//!     entries.next_entry(&map),
//!     Err(CollectionError::ConcurrentModification { .. })
//! ));
//! ```

mod builder;
mod cursor;
mod iter;
mod map;
mod node;
mod ordering;

pub use builder::TreeMapBuilder;
pub use cursor::Entries;
pub use cursor::Entry;
pub use cursor::EntryMut;
pub use iter::IntoIter;
pub use iter::Iter;
pub use iter::Keys;
pub use iter::Values;
pub use map::TreeMap;
pub use ordering::Comparator;
pub use ordering::DynComparator;
pub use ordering::NaturalOrder;
pub use ordering::ReverseOrder;
