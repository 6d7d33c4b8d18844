//! Error types for tree map operations.
//!
//! Every error is raised synchronously at the boundary where it is
//! detected. No operation in this crate leaves the tree half-mutated when
//! it returns an error: structural changes only happen in `add`, `remove`
//! and `clear`, none of which can fail.

/// Represents errors that can occur when working with a [`TreeMap`] or one
/// of its cursors.
///
/// [`TreeMap`]: crate::tree::TreeMap
///
/// # Examples
///
/// ```rust
/// use bstmap::error::CollectionError;
/// use bstmap::tree::TreeMap;
///
/// let mut map = TreeMap::new();
/// map.add(1, "one");
///
/// let mut entries = map.entries();
/// map.add(2, "two");
///
/// assert!(matches!(
///     entries.next_entry(&map),
///     Err(CollectionError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// The map was structurally modified after the cursor was created.
    ///
    /// The cursor cannot recover from this; request a new one with
    /// [`TreeMap::entries`](crate::tree::TreeMap::entries).
    #[error("tree map modified during iteration (expected modification count {expected}, found {actual})")]
    ConcurrentModification {
        /// The modification count captured when the cursor was created.
        expected: u64,
        /// The modification count observed when the cursor was advanced.
        actual: u64,
    },

    /// The cursor was advanced after it had produced its last entry.
    #[error("cursor advanced past the last entry")]
    ExhaustedIterator,

    /// A construction parameter was out of range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// The name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// A specialized `Result` type for tree map operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
