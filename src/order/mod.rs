//! Total orders over element types.
//!
//! Every [`OrderedSet`](crate::set::OrderedSet) and view is parameterized by a
//! [`Comparator`]. Two elements are considered the same element when the
//! comparator reports [`Ordering::Equal`] for them, regardless of any
//! `PartialEq` implementation the type may have.
//!
//! - [`NaturalOrder`]: the element type's own [`Ord`] implementation
//! - [`ReverseOrder`]: another comparator, reversed
//! - [`FnOrder`]: a named wrapper around a comparison closure
//!
//! Plain closures of type `Fn(&T, &T) -> Ordering` are comparators as well.
//!
//! # Examples
//!
//! ```rust
//! use std::cmp::Ordering;
//! use treelist::order::{Comparator, NaturalOrder, ReverseOrder};
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//! assert_eq!(ReverseOrder::new(NaturalOrder).compare(&1, &2), Ordering::Greater);
//!
//! let by_length = |left: &&str, right: &&str| left.len().cmp(&right.len());
//! assert_eq!(by_length.compare(&"bar", &"hoge"), Ordering::Less);
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A total order over `T`.
///
/// Implementations must be consistent: antisymmetric, transitive, and stable
/// for the lifetime of any collection that uses them. A comparator that
/// changes its answers while elements are stored is a logic error; the
/// containers stay memory safe but their contents become unspecified.
pub trait Comparator<T: ?Sized> {
    /// Compares two elements.
    fn compare(&self, left: &T, right: &T) -> Ordering;

    /// Returns `true` when `left` and `right` are the same element under this order.
    #[inline]
    fn equivalent(&self, left: &T, right: &T) -> bool {
        self.compare(left, right) == Ordering::Equal
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self(left, right)
    }
}

/// Orders elements by their [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

/// Reverses the order of the wrapped comparator.
///
/// # Examples
///
/// ```rust
/// use treelist::order::{NaturalOrder, ReverseOrder};
/// use treelist::view::IndexedView;
///
/// let view = IndexedView::with_comparator(ReverseOrder::new(NaturalOrder));
/// view.insert_all([1, 3, 2]);
/// assert_eq!(view.to_vec(), vec![3, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder<C>(C);

impl<C> ReverseOrder<C> {
    /// Wraps `comparator`, reversing its order.
    pub const fn new(comparator: C) -> Self {
        Self(comparator)
    }

    /// Returns the wrapped comparator.
    pub fn into_inner(self) -> C {
        self.0
    }
}

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self.0.compare(right, left)
    }
}

/// A comparison closure with a printable name.
///
/// Closures are comparators on their own; `FnOrder` exists for callers that
/// want a `Debug`-friendly comparator stored inside a view.
///
/// # Examples
///
/// ```rust
/// use treelist::order::{Comparator, FnOrder};
///
/// let by_length = FnOrder::new("by_length", |left: &String, right: &String| {
///     left.len().cmp(&right.len()).then_with(|| left.cmp(right))
/// });
/// assert!(by_length.compare(&"foo".to_string(), &"hoge".to_string()).is_lt());
/// assert_eq!(format!("{by_length:?}"), "FnOrder(by_length)");
/// ```
#[derive(Clone, Copy)]
pub struct FnOrder<F> {
    name: &'static str,
    function: F,
}

impl<F> FnOrder<F> {
    /// Names a comparison closure.
    pub const fn new(name: &'static str, function: F) -> Self {
        Self { name, function }
    }

    /// The name given at construction.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized, F> Comparator<T> for FnOrder<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        (self.function)(left, right)
    }
}

impl<F> fmt::Debug for FnOrder<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "FnOrder({})", self.name)
    }
}
