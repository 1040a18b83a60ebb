//! Bidirectional positional iterator over a materialized view.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// A cursor over the positions of a view, movable in both directions.
///
/// The cursor sits between two elements: [`next`](Iterator::next) returns the
/// element after it and advances, [`previous`](Self::previous) returns the
/// element before it and moves back. It reads a snapshot of the positional
/// cache taken when it was created, so later mutations of the view are not
/// observed.
///
/// # Examples
///
/// ```rust
/// use treelist::view::IndexedView;
///
/// let view: IndexedView<i32> = [30, 10, 20].into_iter().collect();
/// let mut cursor = view.list_iter_at(1).unwrap();
///
/// assert_eq!(cursor.next_index(), 1);
/// assert_eq!(cursor.next(), Some(20));
/// assert_eq!(cursor.previous(), Some(20));
/// assert_eq!(cursor.previous(), Some(10));
/// assert!(!cursor.has_previous());
/// ```
#[derive(Clone)]
pub struct ListIter<T> {
    positions: Arc<[T]>,
    cursor: usize,
}

impl<T: Clone> ListIter<T> {
    pub(crate) fn new(positions: Arc<[T]>, cursor: usize) -> Self {
        debug_assert!(cursor <= positions.len());
        Self { positions, cursor }
    }

    /// Returns `true` if [`next`](Iterator::next) would yield an element.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.cursor < self.positions.len()
    }

    /// Returns `true` if [`previous`](Self::previous) would yield an element.
    #[inline]
    pub const fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    /// The position of the element [`next`](Iterator::next) would return.
    ///
    /// Equals the snapshot length when the cursor is at the end.
    #[inline]
    pub const fn next_index(&self) -> usize {
        self.cursor
    }

    /// The position of the element [`previous`](Self::previous) would return,
    /// or `None` at the start.
    #[inline]
    pub const fn previous_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Moves the cursor back and returns the element it passed over.
    pub fn previous(&mut self) -> Option<T> {
        let index = self.previous_index()?;
        self.cursor = index;
        Some(self.positions[index].clone())
    }
}

impl<T: Clone> Iterator for ListIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.positions.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.positions.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for ListIter<T> {}

impl<T: Clone> FusedIterator for ListIter<T> {}

impl<T: fmt::Debug> fmt::Debug for ListIter<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ListIter")
            .field("positions", &&*self.positions)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cursor_at(cursor: usize) -> ListIter<char> {
        ListIter::new(Arc::from(vec!['a', 'b', 'c']), cursor)
    }

    #[rstest]
    #[case(0, false, true)]
    #[case(1, true, true)]
    #[case(3, true, false)]
    fn test_has_previous_and_next(
        #[case] cursor: usize,
        #[case] has_previous: bool,
        #[case] has_next: bool,
    ) {
        let iterator = cursor_at(cursor);
        assert_eq!(iterator.has_previous(), has_previous);
        assert_eq!(iterator.has_next(), has_next);
    }

    #[rstest]
    fn test_forward_from_middle() {
        let collected: Vec<char> = cursor_at(1).collect();
        assert_eq!(collected, vec!['b', 'c']);
    }

    #[rstest]
    fn test_backward_from_end() {
        let mut iterator = cursor_at(3);
        assert_eq!(iterator.previous_index(), Some(2));
        assert_eq!(iterator.previous(), Some('c'));
        assert_eq!(iterator.previous(), Some('b'));
        assert_eq!(iterator.previous(), Some('a'));
        assert_eq!(iterator.previous(), None);
        assert_eq!(iterator.previous_index(), None);
        assert_eq!(iterator.next_index(), 0);
    }

    #[rstest]
    fn test_size_hint_tracks_cursor() {
        let mut iterator = cursor_at(0);
        assert_eq!(iterator.len(), 3);
        iterator.next();
        assert_eq!(iterator.len(), 2);
    }
}
