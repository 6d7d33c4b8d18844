//! Key ordering for [`TreeMap`](super::TreeMap).
//!
//! A tree map holds one [`Comparator`] for its whole lifetime. When none is
//! supplied, [`NaturalOrder`] delegates to the key type's [`Ord`]
//! implementation. Any closure of the shape `Fn(&K, &K) -> Ordering` is a
//! comparator as well, so ad-hoc orderings need no extra type.
//!
//! # Examples
//!
//! ```rust
//! use bstmap::tree::{Comparator, NaturalOrder, ReverseOrder};
//! use std::cmp::Ordering;
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//! assert_eq!(ReverseOrder(NaturalOrder).compare(&1, &2), Ordering::Greater);
//!
//! let by_length = |left: &&str, right: &&str| left.len().cmp(&right.len());
//! assert_eq!(by_length.compare(&"abc", &"de"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// A total order over keys of type `K`.
///
/// Implementations must be consistent: `compare(a, b)` must return the
/// reverse of `compare(b, a)`, and the relation must be transitive. A
/// comparator that violates this does not cause undefined behavior, but
/// lookups and traversals will produce unspecified results.
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

/// The intrinsic order of a key type, as defined by its [`Ord`] impl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

/// Inverts another comparator.
///
/// `ReverseOrder(NaturalOrder)` sorts keys in descending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder<C = NaturalOrder>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self.0.compare(left, right).reverse()
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self(left, right)
    }
}

/// A comparator chosen at runtime.
///
/// Useful when maps with different orderings must share one type.
pub type DynComparator<K> = Box<dyn Fn(&K, &K) -> Ordering>;
