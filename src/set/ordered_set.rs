//! `BTreeSet`-backed ordered set with a caller-supplied total order.
//!
//! # Time Complexity
//!
//! | Operation              | Cost          |
//! |------------------------|---------------|
//! | `insert`               | O(log n)      |
//! | `remove`               | O(log n)      |
//! | `contains`             | O(log n)      |
//! | `first` / `last`       | O(log n)      |
//! | `len` / `is_empty`     | O(1)          |
//! | `range`                | O(log n) + k  |
//! | `iter`                 | O(n)          |
//! | `retain_all`           | O(n log m)    |

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Bound;
use std::sync::Arc;

use crate::order::{Comparator, NaturalOrder};

/// An element stored together with the order it is sorted by.
///
/// `BTreeSet` only knows [`Ord`], so every entry carries a shared handle to
/// the set's comparator and its `Ord` implementation delegates to it.
struct Entry<T, C> {
    element: T,
    order: Arc<C>,
}

impl<T: Clone, C> Clone for Entry<T, C> {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            order: Arc::clone(&self.order),
        }
    }
}

impl<T, C: Comparator<T>> PartialEq for Entry<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, C: Comparator<T>> Eq for Entry<T, C> {}

impl<T, C: Comparator<T>> PartialOrd for Entry<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, C: Comparator<T>> Ord for Entry<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.compare(&self.element, &other.element)
    }
}

/// A mutable set of elements unique under a total order `C`.
///
/// Elements `a` and `b` are the same element when `C` compares them as
/// [`Ordering::Equal`]; inserting an element equivalent to a stored one is a
/// no-op that keeps the stored element.
///
/// # Type Parameters
///
/// * `T` - The element type
/// * `C` - The total order (defaults to [`NaturalOrder`])
///
/// # Examples
///
/// ```rust
/// use treelist::set::OrderedSet;
///
/// let mut set = OrderedSet::with_comparator(|left: &String, right: &String| {
///     left.len().cmp(&right.len()).then_with(|| left.cmp(right))
/// });
/// set.insert("hoge".to_string());
/// set.insert("foo".to_string());
/// set.insert("bar".to_string());
///
/// let ordered: Vec<&str> = set.iter().map(String::as_str).collect();
/// assert_eq!(ordered, vec!["bar", "foo", "hoge"]);
/// ```
pub struct OrderedSet<T, C = NaturalOrder> {
    entries: BTreeSet<Entry<T, C>>,
    order: Arc<C>,
}

impl<T: Ord> OrderedSet<T> {
    /// Creates an empty set ordered by `T`'s [`Ord`] implementation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> OrderedSet<T, C> {
    /// Creates an empty set ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_shared_comparator(Arc::new(comparator))
    }

    /// Creates an empty set ordered by an already shared comparator.
    #[must_use]
    pub fn with_shared_comparator(comparator: Arc<C>) -> Self {
        Self {
            entries: BTreeSet::new(),
            order: comparator,
        }
    }

    /// Creates a set ordered by `comparator` holding the given elements.
    ///
    /// When several elements are equivalent under `comparator`, the first one
    /// wins.
    pub fn from_iter_with<I>(comparator: C, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::with_comparator(comparator);
        set.insert_all(elements);
        set
    }

    /// Returns the order this set is sorted by.
    #[inline]
    pub const fn comparator(&self) -> &Arc<C> {
        &self.order
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds `element`, returning `true` if no equivalent element was present.
    pub fn insert(&mut self, element: T) -> bool {
        let entry = self.entry(element);
        self.entries.insert(entry)
    }

    /// Adds every element, returning `true` if the set grew.
    pub fn insert_all<I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.entries.len();
        for element in elements {
            self.insert(element);
        }
        self.entries.len() != before
    }

    /// Removes every element for which `predicate` returns `false`.
    ///
    /// Returns `true` if anything was removed.
    pub fn retain<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| predicate(&entry.element));
        self.entries.len() != before
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the smallest element.
    pub fn first(&self) -> Option<&T> {
        self.entries.first().map(|entry| &entry.element)
    }

    /// Returns the largest element.
    pub fn last(&self) -> Option<&T> {
        self.entries.last().map(|entry| &entry.element)
    }

    /// Iterates over the elements in ascending order.
    pub fn iter(&self) -> OrderedSetIterator<'_, T, C> {
        OrderedSetIterator {
            inner: self.entries.iter(),
        }
    }

    fn entry(&self, element: T) -> Entry<T, C> {
        Entry {
            element,
            order: Arc::clone(&self.order),
        }
    }

    /// Returns `true` if the bounds describe no element at all.
    ///
    /// `BTreeSet::range` panics on inverted bounds and on equal bounds that
    /// are both excluded; those ranges are simply empty here.
    fn is_empty_span(&self, lower: Bound<&T>, upper: Bound<&T>) -> bool {
        let (lower, lower_included, upper, upper_included) = match (lower, upper) {
            (Bound::Unbounded, _) | (_, Bound::Unbounded) => return false,
            (Bound::Included(lower), Bound::Included(upper)) => (lower, true, upper, true),
            (Bound::Included(lower), Bound::Excluded(upper)) => (lower, true, upper, false),
            (Bound::Excluded(lower), Bound::Included(upper)) => (lower, false, upper, true),
            (Bound::Excluded(lower), Bound::Excluded(upper)) => (lower, false, upper, false),
        };
        match self.order.compare(lower, upper) {
            Ordering::Less => false,
            Ordering::Equal => !(lower_included && upper_included),
            Ordering::Greater => true,
        }
    }
}

impl<T: Clone, C: Comparator<T>> OrderedSet<T, C> {
    /// Returns `true` if an element equivalent to `element` is present.
    pub fn contains(&self, element: &T) -> bool {
        self.entries.contains(&self.entry(element.clone()))
    }

    /// Returns `true` if every element of `elements` is present.
    pub fn contains_all<'a, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        elements.into_iter().all(|element| self.contains(element))
    }

    /// Returns the stored element equivalent to `element`.
    pub fn get(&self, element: &T) -> Option<&T> {
        self.entries
            .get(&self.entry(element.clone()))
            .map(|entry| &entry.element)
    }

    /// Removes the element equivalent to `element`, returning `true` if one was present.
    pub fn remove(&mut self, element: &T) -> bool {
        let probe = self.entry(element.clone());
        self.entries.remove(&probe)
    }

    /// Removes every element equivalent to one of `elements`.
    ///
    /// Returns `true` if the set shrank.
    pub fn remove_all<'a, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let before = self.entries.len();
        for element in elements {
            self.remove(element);
        }
        self.entries.len() != before
    }

    /// Keeps only the elements equivalent to one of `elements`.
    ///
    /// Membership is decided by this set's order. Returns `true` if the set
    /// shrank.
    pub fn retain_all<'a, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut keep = Self::with_shared_comparator(Arc::clone(&self.order));
        keep.insert_all(elements.into_iter().cloned());
        self.retain(|element| keep.contains(element))
    }

    /// Iterates in ascending order over the elements between `lower` and `upper`.
    ///
    /// Unlike [`BTreeSet::range`], inverted or degenerate bounds produce an
    /// empty iterator instead of panicking.
    pub fn range(&self, lower: Bound<&T>, upper: Bound<&T>) -> OrderedSetRangeIterator<'_, T, C> {
        if self.is_empty_span(lower, upper) {
            return OrderedSetRangeIterator::empty();
        }
        let lower = lower.map(|element| self.entry(element.clone()));
        let upper = upper.map(|element| self.entry(element.clone()));
        OrderedSetRangeIterator {
            inner: Some(self.entries.range((lower, upper))),
        }
    }

    /// Counts the elements between `lower` and `upper`.
    pub fn range_len(&self, lower: Bound<&T>, upper: Bound<&T>) -> usize {
        self.range(lower, upper).count()
    }

    /// Copies the elements into a vector in ascending order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Clone, C> Clone for OrderedSet<T, C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            order: Arc::clone(&self.order),
        }
    }
}

impl<T, C: Comparator<T> + Default> Default for OrderedSet<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(NaturalOrder, iter)
    }
}

impl<T, C: Comparator<T>> Extend<T> for OrderedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<T, C: Comparator<T>> PartialEq for OrderedSet<T, C> {
    /// Two sets are equal when they hold pairwise equivalent elements under
    /// `self`'s order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(left, right)| self.order.equivalent(left, right))
    }
}

impl<T, C: Comparator<T>> Eq for OrderedSet<T, C> {}

impl<T: fmt::Debug, C: Comparator<T>> fmt::Debug for OrderedSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C: Comparator<T>> IntoIterator for &'a OrderedSet<T, C> {
    type Item = &'a T;
    type IntoIter = OrderedSetIterator<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over an [`OrderedSet`].
pub struct OrderedSetIterator<'a, T, C> {
    inner: btree_set::Iter<'a, Entry<T, C>>,
}

impl<'a, T, C> Iterator for OrderedSetIterator<'a, T, C> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| &entry.element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, C> DoubleEndedIterator for OrderedSetIterator<'_, T, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|entry| &entry.element)
    }
}

impl<T, C> ExactSizeIterator for OrderedSetIterator<'_, T, C> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T, C> FusedIterator for OrderedSetIterator<'_, T, C> {}

/// Ascending iterator over a bounded part of an [`OrderedSet`].
pub struct OrderedSetRangeIterator<'a, T, C> {
    inner: Option<btree_set::Range<'a, Entry<T, C>>>,
}

impl<T, C> OrderedSetRangeIterator<'_, T, C> {
    pub(crate) const fn empty() -> Self {
        Self { inner: None }
    }
}

impl<'a, T, C> Iterator for OrderedSetRangeIterator<'a, T, C> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next().map(|entry| &entry.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<T, C> DoubleEndedIterator for OrderedSetRangeIterator<'_, T, C> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next_back().map(|entry| &entry.element)
    }
}

impl<T, C> FusedIterator for OrderedSetRangeIterator<'_, T, C> {}
