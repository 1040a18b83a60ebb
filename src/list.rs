//! List contracts shared by the views.
//!
//! - [`PositionalList`]: read-only positional access, implemented by both
//!   [`IndexedView`](crate::view::IndexedView) and
//!   [`RangeView`](crate::view::RangeView)
//! - [`SortedList`]: a positional list that also accepts structural
//!   mutation, implemented by [`IndexedView`](crate::view::IndexedView) only
//!
//! Code that only inspects positions can be written once against
//! [`PositionalList`]:
//!
//! ```rust
//! use treelist::list::PositionalList;
//! use treelist::view::IndexedView;
//!
//! fn middle<T, L: PositionalList<T>>(list: &L) -> Option<T> {
//!     list.get(list.len() / 2).ok()
//! }
//!
//! let view: IndexedView<i32> = (1..=5).collect();
//! assert_eq!(middle(&view), Some(3));
//! assert_eq!(middle(&view.sub_range(0, 2).unwrap()), Some(2));
//! ```

use std::sync::Arc;

use crate::error::{EmptyCollection, IndexOutOfBounds};
use crate::order::Comparator;
use crate::view::ListIter;

/// Read-only, index-addressable access to an ascending sequence of unique elements.
pub trait PositionalList<T> {
    /// The view returned by [`sub_range`](Self::sub_range).
    type Range<'a>: PositionalList<T>
    where
        Self: 'a;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if an element equivalent to `element` under the list's
    /// order is present.
    fn contains(&self, element: &T) -> bool;

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index >= len()`.
    fn get(&self, index: usize) -> Result<T, IndexOutOfBounds>;

    /// Returns the position of the first element equal to `element`.
    fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq;

    /// Returns the position of the last element equal to `element`.
    fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq;

    /// Returns the smallest element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCollection`] if the list is empty.
    fn first(&self) -> Result<T, EmptyCollection>;

    /// Returns the largest element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCollection`] if the list is empty.
    fn last(&self) -> Result<T, EmptyCollection>;

    /// Copies the elements into a vector in ascending order.
    fn to_vec(&self) -> Vec<T>;

    /// Returns a bidirectional iterator whose cursor sits before `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index > len()`.
    fn list_iter_at(&self, index: usize) -> Result<ListIter<T>, IndexOutOfBounds>;

    /// Returns a read-only view over positions `from_index..to_index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `to_index < from_index` or
    /// `to_index > len()`.
    fn sub_range(
        &self,
        from_index: usize,
        to_index: usize,
    ) -> Result<Self::Range<'_>, IndexOutOfBounds>;
}

/// A [`PositionalList`] kept sorted by a comparator, accepting structural mutation.
///
/// Mutation takes `&self`: implementations synchronize internally.
pub trait SortedList<T>: PositionalList<T> {
    /// The order the list is sorted by.
    type Order: Comparator<T>;

    /// Returns the order the list is sorted by.
    fn comparator(&self) -> Arc<Self::Order>;

    /// Adds `element`, returning `true` if no equivalent element was present.
    fn insert(&self, element: T) -> bool;

    /// Adds every element, returning `true` if the list grew.
    fn insert_all<I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = T>;

    /// Removes the element equivalent to `element`, returning `true` if one was present.
    fn remove(&self, element: &T) -> bool;

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index >= len()`.
    fn remove_at(&self, index: usize) -> Result<T, IndexOutOfBounds>;

    /// Removes every element.
    fn clear(&self);
}
