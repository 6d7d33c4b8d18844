//! # bstmap
//!
//! An ordered map built on a plain, unbalanced binary search tree.
//!
//! ## Overview
//!
//! The crate is a study of the classic pointer-based BST, expressed without
//! `unsafe`:
//!
//! - **Parent-threaded nodes**: every node links back to its parent, so
//!   in-order traversal walks from node to node without a stack
//! - **Hibbard deletion**: a removed node with a right subtree takes over its
//!   in-order successor's entry
//! - **Injected ordering**: keys are ordered by their [`Ord`] impl or by any
//!   comparator supplied at construction
//! - **Fail-fast cursors**: a cursor that outlives a modification of its map
//!   reports an error instead of walking stale links
//!
//! The tree never rebalances. Sorted insertion degrades it to a linked list.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`tree::TreeMap`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use bstmap::prelude::*;
//!
//! let mut map = TreeMap::new();
//! map.add(3, "three");
//! map.add(1, "one");
//!
//! assert_eq!(map.get(&1), Some(&"one"));
//! assert_eq!(map.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use bstmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::CollectionError;
    pub use crate::tree::*;
}

pub mod error;
pub mod tree;
