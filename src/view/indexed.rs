//! Concurrent positional view over an owned ordered set.

use std::fmt;
use std::ops::Bound;
use std::sync::Arc;

use super::cache::{Demand, PositionCache, Span};
use super::list_iter::ListIter;
use super::range::{RangeView, resolve_bounds};
use crate::error::{EmptyCollection, IndexOutOfBounds};
use crate::list::{PositionalList, SortedList};
use crate::order::{Comparator, NaturalOrder};
use crate::set::OrderedSet;
use crate::sync::{AtomicU64, Ordering, RwLock};

/// A thread-safe, index-addressable list over an [`OrderedSet`].
///
/// Elements are unique under the comparator `C` and always kept in ascending
/// order. Set-level queries (`len`, `contains`, `first`, ...) are answered by
/// the set directly; positional queries (`get`, `index_of`, `sub_range`, ...)
/// go through a positional cache that is materialized lazily from the set's
/// ordered traversal, extended only as far as needed, and discarded on every
/// structural mutation.
///
/// All methods take `&self`. Two reader-writer locks synchronize access: a
/// structural lock around the set and a cache lock around the positions,
/// always acquired in that order.
///
/// # Type Parameters
///
/// * `T` - The element type, cloned out of the view on reads
/// * `C` - The total order (defaults to [`NaturalOrder`])
///
/// # Examples
///
/// ```rust
/// use treelist::view::IndexedView;
///
/// let view = IndexedView::with_comparator(|left: &&str, right: &&str| {
///     left.len().cmp(&right.len()).then_with(|| left.cmp(right))
/// });
/// view.insert("hoge");
/// view.insert("foo");
/// view.insert_all(["hoge", "foo", "bar"]);
///
/// assert_eq!(view.len(), 3);
/// assert_eq!(view.get(0), Ok("bar"));
/// assert_eq!(view.remove_at(1), Ok("foo"));
/// assert_eq!(view.to_vec(), vec!["bar", "hoge"]);
/// ```
///
/// ## Sharing between threads
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use treelist::view::IndexedView;
///
/// let view = Arc::new(IndexedView::new());
/// let handles: Vec<_> = (0..4)
///     .map(|worker| {
///         let view = Arc::clone(&view);
///         thread::spawn(move || {
///             for offset in 0..25 {
///                 view.insert(worker * 25 + offset);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(view.len(), 100);
/// assert_eq!(view.get(42), Ok(42));
/// ```
pub struct IndexedView<T, C = NaturalOrder> {
    set: RwLock<OrderedSet<T, C>>,
    cache: PositionCache<T>,
    generation: AtomicU64,
}

static_assertions::assert_impl_all!(IndexedView<i32>: Send, Sync);
static_assertions::assert_impl_all!(
    IndexedView<String, fn(&String, &String) -> std::cmp::Ordering>: Send, Sync
);

impl<T: Ord + Clone> IndexedView<T> {
    /// Creates an empty view ordered by `T`'s [`Ord`] implementation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Clone, C: Comparator<T>> IndexedView<T, C> {
    /// Creates an empty view ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::from(OrderedSet::with_comparator(comparator))
    }

    /// Creates a view ordered by `comparator` holding the given elements.
    pub fn from_iter_with<I>(comparator: C, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from(OrderedSet::from_iter_with(comparator, elements))
    }

    /// Creates a view over a copy of `set`, sharing its comparator.
    pub fn from_ordered_set(set: &OrderedSet<T, C>) -> Self {
        Self::from(set.clone())
    }

    #[inline]
    pub(crate) fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Gives read access to the underlying set under the shared structural lock.
    ///
    /// Structural mutations block until `read` returns, so keep it short.
    ///
    /// `read` must not call back into this view, nor into a [`RangeView`] taken
    /// from it. The shared lock is not reentrant: a nested acquisition blocks
    /// behind any writer that queued in between, and that writer waits for
    /// `read` to return, so the thread deadlocks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treelist::view::IndexedView;
    ///
    /// let view: IndexedView<i32> = (1..=4).collect();
    /// let sum: i32 = view.read(|set| set.iter().sum());
    /// assert_eq!(sum, 10);
    /// ```
    pub fn read<R>(&self, read: impl FnOnce(&OrderedSet<T, C>) -> R) -> R {
        read(&self.set.read())
    }

    pub(crate) fn read_with_generation<R>(
        &self,
        read: impl FnOnce(&OrderedSet<T, C>, u64) -> R,
    ) -> R {
        let set = self.set.read();
        read(&set, self.current_generation())
    }

    /// Advances the generation and drops the positional cache.
    ///
    /// Callers hold the structural lock exclusively, so no reader can pair
    /// the old positions with the new set.
    fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.cache.invalidate(generation);
    }

    // =========================================================================
    // Set-level reads
    // =========================================================================

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.set.read().len()
    }

    /// Returns `true` if the view holds no elements.
    pub fn is_empty(&self) -> bool {
        self.set.read().is_empty()
    }

    /// Returns `true` if an element equivalent to `element` is present.
    pub fn contains(&self, element: &T) -> bool {
        self.set.read().contains(element)
    }

    /// Returns `true` if every element of `elements` is present.
    pub fn contains_all<'e, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        self.set.read().contains_all(elements)
    }

    /// Returns the order the view is sorted by.
    pub fn comparator(&self) -> Arc<C> {
        Arc::clone(self.set.read().comparator())
    }

    /// Returns the smallest element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCollection`] if the view is empty.
    pub fn first(&self) -> Result<T, EmptyCollection> {
        self.set.read().first().cloned().ok_or(EmptyCollection)
    }

    /// Returns the largest element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCollection`] if the view is empty.
    pub fn last(&self) -> Result<T, EmptyCollection> {
        self.set.read().last().cloned().ok_or(EmptyCollection)
    }

    /// Copies the elements into a vector in ascending order.
    pub fn to_vec(&self) -> Vec<T> {
        self.set.read().to_vec()
    }

    /// Iterates over a snapshot of the elements in ascending order.
    ///
    /// The snapshot is taken under the shared structural lock; mutations made
    /// afterwards are not observed. Use [`read`](Self::read) to traverse the
    /// live set without copying.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    /// Returns a copy of the underlying set.
    pub fn to_ordered_set(&self) -> OrderedSet<T, C> {
        self.set.read().clone()
    }

    // =========================================================================
    // Positional reads
    // =========================================================================

    /// Returns the element at `index`.
    ///
    /// Materializes the positional cache up to `index` if it is not there yet.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<T, IndexOutOfBounds> {
        let set = self.set.read();
        IndexOutOfBounds::check_element(index, set.len())?;
        Ok(self.cache.with_positions(
            self.current_generation(),
            Demand::Through(index),
            &Span::full(&set),
            |positions| positions[index].clone(),
        ))
    }

    /// Returns the position of the first element equal to `element`.
    ///
    /// Equality is `T`'s [`PartialEq`], not the view's order. Materializes the
    /// whole positional cache.
    pub fn index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let set = self.set.read();
        self.cache.with_positions(
            self.current_generation(),
            Demand::All,
            &Span::full(&set),
            |positions| positions.iter().position(|candidate| candidate == element),
        )
    }

    /// Returns the position of the last element equal to `element`.
    ///
    /// Equality is `T`'s [`PartialEq`], not the view's order. Materializes the
    /// whole positional cache.
    pub fn last_index_of(&self, element: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let set = self.set.read();
        self.cache.with_positions(
            self.current_generation(),
            Demand::All,
            &Span::full(&set),
            |positions| positions.iter().rposition(|candidate| candidate == element),
        )
    }

    /// Returns a bidirectional iterator positioned before the first element.
    pub fn list_iter(&self) -> ListIter<T> {
        let set = self.set.read();
        ListIter::new(
            self.cache
                .complete(self.current_generation(), &Span::full(&set)),
            0,
        )
    }

    /// Returns a bidirectional iterator whose cursor sits before `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index > len()`.
    pub fn list_iter_at(&self, index: usize) -> Result<ListIter<T>, IndexOutOfBounds> {
        let set = self.set.read();
        IndexOutOfBounds::check_position(index, set.len())?;
        let positions = self
            .cache
            .complete(self.current_generation(), &Span::full(&set));
        Ok(ListIter::new(positions, index))
    }

    /// Returns a read-only view over positions `from_index..to_index`.
    ///
    /// The range is delimited by the elements found at those positions when
    /// it is created, not by the positions themselves: later mutations of
    /// this view show up in the range if they fall between its boundary
    /// elements.
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
    /// let view: IndexedView<i32> = (1..=5).collect();
    /// let range = view.sub_range(1, 4).unwrap();
    /// assert_eq!(range.to_vec(), vec![2, 3, 4]);
    /// assert_eq!(range.get(1), Ok(3));
    /// assert_eq!(range.index_of(&4), Some(2));
    /// ```
    pub fn sub_range(
        &self,
        from_index: usize,
        to_index: usize,
    ) -> Result<RangeView<'_, T, C>, IndexOutOfBounds> {
        let set = self.set.read();
        let len = set.len();
        IndexOutOfBounds::check_range(from_index, to_index, len)?;
        let (lower, upper) = match len.checked_sub(1) {
            Some(last_index) => self.cache.with_positions(
                self.current_generation(),
                Demand::Through(to_index.min(last_index)),
                &Span::full(&set),
                |positions| {
                    resolve_bounds(
                        positions,
                        len,
                        from_index,
                        to_index,
                        Bound::Unbounded,
                        Bound::Unbounded,
                    )
                },
            ),
            None => (Bound::Unbounded, Bound::Unbounded),
        };
        tracing::trace!(from_index, to_index, "range view created");
        Ok(RangeView::new(self, lower, upper, from_index == to_index))
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Adds `element`, returning `true` if no equivalent element was present.
    ///
    /// The positional cache is discarded even when nothing was added.
    pub fn insert(&self, element: T) -> bool {
        let mut set = self.set.write();
        self.invalidate();
        set.insert(element)
    }

    /// Adds every element, returning `true` if the view grew.
    pub fn insert_all<I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = self.set.write();
        self.invalidate();
        set.insert_all(elements)
    }

    /// Removes the element equivalent to `element`, returning `true` if one was present.
    pub fn remove(&self, element: &T) -> bool {
        let mut set = self.set.write();
        self.invalidate();
        set.remove(element)
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfBounds`] if `index >= len()`, checked both before
    /// and after acquiring the exclusive lock.
    ///
    /// # Panics
    ///
    /// Panics if the element resolved through the positional cache is missing
    /// from the set, which would mean the cache outlived a mutation.
    pub fn remove_at(&self, index: usize) -> Result<T, IndexOutOfBounds> {
        {
            let set = self.set.read();
            IndexOutOfBounds::check_element(index, set.len())?;
        }

        let mut set = self.set.write();
        IndexOutOfBounds::check_element(index, set.len())?;
        let element = self.cache.with_positions(
            self.current_generation(),
            Demand::Through(index),
            &Span::full(&set),
            |positions| positions[index].clone(),
        );
        self.invalidate();
        assert!(
            set.remove(&element),
            "position cache out of sync with its set at index {index}"
        );
        Ok(element)
    }

    /// Removes every element equivalent to one of `elements`, returning `true`
    /// if the view shrank.
    pub fn remove_all<'e, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        let mut set = self.set.write();
        self.invalidate();
        set.remove_all(elements)
    }

    /// Keeps only the elements equivalent to one of `elements`, returning
    /// `true` if the view shrank.
    ///
    /// Membership is decided by the view's order.
    pub fn retain_all<'e, I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        let mut set = self.set.write();
        self.invalidate();
        set.retain_all(elements)
    }

    /// Keeps only the elements for which `predicate` returns `true`,
    /// returning `true` if the view shrank.
    pub fn retain<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        let mut set = self.set.write();
        self.invalidate();
        set.retain(predicate)
    }

    /// Removes every element.
    pub fn clear(&self) {
        let mut set = self.set.write();
        self.invalidate();
        set.clear();
    }
}

impl<T, C> From<OrderedSet<T, C>> for IndexedView<T, C> {
    fn from(set: OrderedSet<T, C>) -> Self {
        Self {
            set: RwLock::new(set),
            cache: PositionCache::new(0),
            generation: AtomicU64::new(0),
        }
    }
}

impl<T: Clone, C: Comparator<T>> Clone for IndexedView<T, C> {
    /// Copies the elements into a new view with the same comparator and an
    /// empty positional cache.
    fn clone(&self) -> Self {
        Self::from(self.to_ordered_set())
    }
}

impl<T: Clone, C: Comparator<T> + Default> Default for IndexedView<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Ord + Clone> FromIterator<T> for IndexedView<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(NaturalOrder, iter)
    }
}

impl<T: Clone, C: Comparator<T>> PartialEq for IndexedView<T, C> {
    /// Views are equal when they hold pairwise equivalent elements, compared
    /// with `other`'s order.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        // Never hold both structural locks at once.
        let left = self.to_vec();
        other.read(|right| {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(mine, theirs)| right.comparator().equivalent(mine, theirs))
        })
    }
}

impl<T: Clone, C: Comparator<T>> Eq for IndexedView<T, C> {}

impl<T: fmt::Debug, C: Comparator<T>> fmt::Debug for IndexedView<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.set.read().iter()).finish()
    }
}

impl<T: Clone, C: Comparator<T>> PositionalList<T> for IndexedView<T, C> {
    type Range<'a>
        = RangeView<'a, T, C>
    where
        Self: 'a;

    fn len(&self) -> usize {
        Self::len(self)
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

impl<T: Clone, C: Comparator<T>> SortedList<T> for IndexedView<T, C> {
    type Order = C;

    fn comparator(&self) -> Arc<C> {
        Self::comparator(self)
    }

    fn insert(&self, element: T) -> bool {
        Self::insert(self, element)
    }

    fn insert_all<I>(&self, elements: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        Self::insert_all(self, elements)
    }

    fn remove(&self, element: &T) -> bool {
        Self::remove(self, element)
    }

    fn remove_at(&self, index: usize) -> Result<T, IndexOutOfBounds> {
        Self::remove_at(self, index)
    }

    fn clear(&self) {
        Self::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type ByLength = fn(&String, &String) -> std::cmp::Ordering;

    fn by_length_then_lexical(left: &String, right: &String) -> std::cmp::Ordering {
        left.len().cmp(&right.len()).then_with(|| left.cmp(right))
    }

    #[rstest]
    fn test_get_materializes_only_prefix() {
        let view: IndexedView<i32> = (0..100).collect();
        assert_eq!(view.get(3), Ok(3));
        let materialized = view.read_with_generation(|set, generation| {
            view.cache
                .with_positions(generation, Demand::Through(0), &Span::full(set), <[i32]>::len)
        });
        assert_eq!(materialized, 4);
    }

    #[rstest]
    fn test_mutation_advances_generation() {
        let view: IndexedView<i32> = IndexedView::new();
        assert_eq!(view.current_generation(), 0);
        view.insert(1);
        view.insert(1);
        view.clear();
        assert_eq!(view.current_generation(), 3);
    }

    #[rstest]
    fn test_insert_after_get_is_visible() {
        let view: IndexedView<i32> = [10, 30].into_iter().collect();
        assert_eq!(view.get(1), Ok(30));
        view.insert(20);
        assert_eq!(view.get(1), Ok(20));
        assert_eq!(view.index_of(&30), Some(2));
    }

    #[rstest]
    fn test_remove_at_rechecks_bounds() {
        let view: IndexedView<i32> = IndexedView::new();
        assert_eq!(
            view.remove_at(0),
            Err(IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[rstest]
    fn test_comparator_is_shared_with_clone() {
        let view = IndexedView::with_comparator(by_length_then_lexical as ByLength);
        view.insert("hoge".to_string());
        let copy = view.clone();
        assert!(Arc::ptr_eq(&view.comparator(), &copy.comparator()));
        assert_eq!(view, copy);
    }

    #[rstest]
    fn test_clone_has_independent_contents() {
        let view: IndexedView<i32> = (1..=3).collect();
        let copy = view.clone();
        copy.insert(4);
        assert_eq!(view.len(), 3);
        assert_eq!(copy.len(), 4);
        assert_ne!(view, copy);
    }

    #[rstest]
    fn test_debug_renders_as_list() {
        let view: IndexedView<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(format!("{view:?}"), "[1, 2, 3]");
    }
}
