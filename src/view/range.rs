//! Read-only views over a contiguous part of an [`IndexedView`].

use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::ops::Bound;

use super::cache::{Demand, PositionCache, Span};
use super::indexed::IndexedView;
use super::list_iter::ListIter;
use crate::error::{EmptyCollection, IndexOutOfBounds};
use crate::list::PositionalList;
use crate::order::{Comparator, NaturalOrder};
use crate::set::{OrderedSet, OrderedSetRangeIterator};

/// Turns positions `from_index..to_index` of a materialized prefix into
/// element bounds.
///
/// `positions` must hold index `to_index` when `to_index < len`, and index
/// `len - 1` otherwise. Positions past the end fall back to `outer_lower`
/// and `outer_upper`, the bounds of the enclosing list.
pub(crate) fn resolve_bounds<T: Clone>(
    positions: &[T],
    len: usize,
    from_index: usize,
    to_index: usize,
    outer_lower: Bound<&T>,
    outer_upper: Bound<&T>,
) -> (Bound<T>, Bound<T>) {
    let lower = if from_index < len {
        Bound::Included(positions[from_index].clone())
    } else if let Some(last) = len.checked_sub(1) {
        Bound::Excluded(positions[last].clone())
    } else {
        outer_lower.cloned()
    };
    let upper = if to_index < len {
        Bound::Excluded(positions[to_index].clone())
    } else {
        outer_upper.cloned()
    };
    (lower, upper)
}

/// A read-only positional view over the elements of an [`IndexedView`] that
/// fall between two boundary elements.
///
/// Created by [`IndexedView::sub_range`] or [`RangeView::sub_range`]. The view
/// is live: it holds no elements of its own, so insertions into and removals
/// from the parent are observed as long as they fall inside the boundaries.
/// Positions are counted from the lower boundary and cached separately from
/// the parent; the cache is rebuilt whenever the parent has been mutated.
///
/// A range taken with `from_index == to_index` is empty and stays empty,
/// whatever the parent later receives between its boundaries.
///
/// A range view exposes no mutating operations: `insert`, `remove`, `clear`
/// and `retain` exist only on [`IndexedView`].
///
/// # Examples
///
/// ```rust
/// use treelist::view::IndexedView;
///
/// let view: IndexedView<i32> = [10, 20, 30, 40].into_iter().collect();
/// let range = view.sub_range(1, 3).unwrap();
/// assert_eq!(range.to_vec(), vec![20, 30]);
///
/// view.insert(25);
/// assert_eq!(range.to_vec(), vec![20, 25, 30]);
/// assert_eq!(range.get(1), Ok(25));
/// ```
pub struct RangeView<'a, T, C = NaturalOrder> {
    parent: &'a IndexedView<T, C>,
    lower: Bound<T>,
    upper: Bound<T>,
    empty: bool,
    cache: PositionCache<T>,
}

impl<'a, T: Clone, C: Comparator<T>> RangeView<'a, T, C> {
    /// Covers the parent elements between `lower` and `upper`, or none at all
    /// when `empty` is set.
    pub(crate) fn new(
        parent: &'a IndexedView<T, C>,
        lower: Bound<T>,
        upper: Bound<T>,
        empty: bool,
    ) -> Self {
        Self {
            parent,
            lower,
            upper,
            empty,
            cache: PositionCache::new(parent.current_generation()),
        }
    }

    /// Returns the view this range was taken from.
    pub fn parent(&self) -> &'a IndexedView<T, C> {
        self.parent
    }

    /// Returns the lower boundary element.
    pub fn lower_bound(&self) -> Bound<&T> {
        self.lower.as_ref()
    }

    /// Returns the upper boundary element.
    pub fn upper_bound(&self) -> Bound<&T> {
        self.upper.as_ref()
    }

    fn span<'s>(&'s self, set: &'s OrderedSet<T, C>) -> Span<'s, T, C> {
        if self.empty {
            Span::vacant(set)
        } else {
            Span::bounded(set, self.lower.as_ref(), self.upper.as_ref())
        }
    }

    fn elements<'s>(&'s self, set: &'s OrderedSet<T, C>) -> OrderedSetRangeIterator<'s, T, C> {
        if self.empty {
            OrderedSetRangeIterator::empty()
        } else {
            set.range(self.lower.as_ref(), self.upper.as_ref())
        }
    }

    fn with_positions<R>(&self, demand: Demand, read: impl FnOnce(&[T]) -> R) -> R {
        self.parent.read_with_generation(|set, generation| {
            self.cache
                .with_positions(generation, demand, &self.span(set), read)
        })
    }

    fn admits(&self, order: &C, element: &T) -> bool {
        if self.empty {
            return false;
        }
        let above_lower = match &self.lower {
            Bound::Included(lower) => order.compare(element, lower) != CmpOrdering::Less,
            Bound::Excluded(lower) => order.compare(element, lower) == CmpOrdering::Greater,
            Bound::Unbounded => true,
        };
        let below_upper = match &self.upper {
            Bound::Included(upper) => order.compare(element, upper) != CmpOrdering::Greater,
            Bound::Excluded(upper) => order.compare(element, upper) == CmpOrdering::Less,
            Bound::Unbounded => true,
        };
        above_lower && below_upper
    }

    /// Returns the number of parent elements inside the boundaries.
    ///
    /// Materializes the whole range.
    pub fn len(&self) -> usize {
        self.with_positions(Demand::All, <[T]>::len)
    }

    /// Returns `true` if no parent element falls inside the boundaries.
    pub fn is_empty(&self) -> bool {
        self.first().is_err()
    }

    /// Returns `true` if the parent holds an element equivalent to `element`
    /// and it falls inside the boundaries.
    pub fn contains(&self, element: &T) -> bool {
        self.parent
            .read(|set| set.contains(element) && self.admits(set.comparator(), element))
    }

    /// Returns the element at `index`, counted from the lower boundary.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<T, IndexOutOfBounds> {
        self.parent.read_with_generation(|set, generation| {
            let span = self.span(set);
            self.cache
                .with_positions(generation, Demand::Through(index), &span, |positions| {
                    positions.get(index).cloned()
                })
                .ok_or_else(|| IndexOutOfBounds {
                    index,
                    len: self.elements(set).count(),
                })
        })
    }

    /// Returns the position of the first element equal to `element`.
    pub fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.with_positions(Demand::All, |positions| {
            positions.iter().position(|candidate| candidate == element)
        })
    }

    /// Returns the position of the last element equal to `element`.
    pub fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.with_positions(Demand::All, |positions| {
            positions.iter().rposition(|candidate| candidate == element)
        })
    }

    /// Returns the smallest element inside the boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCollection`] if the range is empty.
    pub fn first(&self) -> Result<T, EmptyCollection> {
        self.parent
            .read(|set| self.elements(set).next().cloned().ok_or(EmptyCollection))
    }

    /// Returns the largest element inside the boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCollection`] if the range is empty.
    pub fn last(&self) -> Result<T, EmptyCollection> {
        self.parent
            .read(|set| self.elements(set).next_back().cloned().ok_or(EmptyCollection))
    }

    /// Copies the elements into a vector in ascending order.
    pub fn to_vec(&self) -> Vec<T> {
        self.with_positions(Demand::All, <[T]>::to_vec)
    }

    /// Iterates over a snapshot of the elements in ascending order.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Returns a bidirectional iterator positioned before the first element.
    pub fn list_iter(&self) -> ListIter<T> {
        self.parent.read_with_generation(|set, generation| {
            ListIter::new(self.cache.complete(generation, &self.span(set)), 0)
        })
    }

    /// Returns a bidirectional iterator whose cursor sits before `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index > len()`.
    pub fn list_iter_at(&self, index: usize) -> Result<ListIter<T>, IndexOutOfBounds> {
        self.parent.read_with_generation(|set, generation| {
            let positions = self.cache.complete(generation, &self.span(set));
            IndexOutOfBounds::check_position(index, positions.len())?;
            Ok(ListIter::new(positions, index))
        })
    }

    /// Returns a read-only view over positions `from_index..to_index` of this
    /// range, bounded by the same parent.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `to_index < from_index` or
    /// `to_index > len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treelist::view::IndexedView;
    ///
    /// let view: IndexedView<i32> = (1..=9).collect();
    /// let outer = view.sub_range(2, 8).unwrap();
    /// let inner = outer.sub_range(1, 3).unwrap();
    /// assert_eq!(inner.to_vec(), vec![4, 5]);
    /// ```
    pub fn sub_range(
        &self,
        from_index: usize,
        to_index: usize,
    ) -> Result<RangeView<'a, T, C>, IndexOutOfBounds> {
        let (lower, upper) = self.with_positions(Demand::All, |positions| {
            let len = positions.len();
            IndexOutOfBounds::check_range(from_index, to_index, len)?;
            Ok(resolve_bounds(
                positions,
                len,
                from_index,
                to_index,
                self.lower.as_ref(),
                self.upper.as_ref(),
            ))
        })?;
        Ok(RangeView::new(
            self.parent,
            lower,
            upper,
            from_index == to_index,
        ))
    }
}

impl<T: Clone, C: Comparator<T>> Clone for RangeView<'_, T, C> {
    /// Copies the boundaries; the clone starts with an empty positional cache.
    fn clone(&self) -> Self {
        RangeView::new(
            self.parent,
            self.lower.clone(),
            self.upper.clone(),
            self.empty,
        )
    }
}

impl<T: Clone + fmt::Debug, C: Comparator<T>> fmt::Debug for RangeView<'_, T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.parent.read(|set| {
            formatter.debug_list().entries(self.elements(set)).finish()
        })
    }
}

impl<'a, T: Clone, C: Comparator<T>> PositionalList<T> for RangeView<'a, T, C> {
    type Range<'r>
        = RangeView<'a, T, C>
    where
        Self: 'r;

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn contains(&self, element: &T) -> bool {
        Self::contains(self, element)
    }

    fn get(&self, index: usize) -> Result<T, IndexOutOfBounds> {
        Self::get(self, index)
    }

    fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        Self::index_of(self, element)
    }

    fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        Self::last_index_of(self, element)
    }

    fn first(&self) -> Result<T, EmptyCollection> {
        Self::first(self)
    }

    fn last(&self) -> Result<T, EmptyCollection> {
        Self::last(self)
    }

    fn to_vec(&self) -> Vec<T> {
        Self::to_vec(self)
    }

    fn list_iter_at(&self, index: usize) -> Result<ListIter<T>, IndexOutOfBounds> {
        Self::list_iter_at(self, index)
    }

    fn sub_range(
        &self,
        from_index: usize,
        to_index: usize,
    ) -> Result<Self::Range<'_>, IndexOutOfBounds> {
        Self::sub_range(self, from_index, to_index)
    }
}
