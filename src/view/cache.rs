//! Lazily materialized positional cache.
//!
//! A [`PositionCache`] maps positions to elements by copying the ascending
//! traversal of an [`OrderedSet`] into a vector, only as far as callers have
//! asked for. The traversal is resumed from the last materialized element
//! rather than restarted, so repeated `get` calls with growing indices touch
//! each element once per cache generation.
//!
//! # States
//!
//! ```text
//!            first demand             traversal exhausted
//!   Unbuilt ──────────────► Partial ─────────────────────► Complete
//!      ▲                    │    ▲                            │
//!      │                    └────┘ demand past the prefix     │
//!      │                                                      │
//!      └─────────── invalidate / generation change ───────────┘
//! ```
//!
//! # Locking
//!
//! The cache owns one reader-writer lock. Callers must already hold the
//! structural lock of the set they pass in: the [`Span`] handed to the cache
//! borrows the set through that guard, which fixes the acquisition order to
//! structural first, cache second.

use std::mem;
use std::ops::Bound;
use std::sync::Arc;

use crate::order::Comparator;
use crate::set::{OrderedSet, OrderedSetRangeIterator};
use crate::sync::RwLock;

/// How much of the traversal an operation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Demand {
    /// At least `index + 1` positions.
    Through(usize),
    /// Every position.
    All,
}

impl Demand {
    #[inline]
    const fn is_satisfied_by(self, materialized: usize) -> bool {
        match self {
            Self::Through(index) => materialized > index,
            Self::All => false,
        }
    }
}

/// A contiguous, ascending part of an ordered set to materialize from.
pub(crate) struct Span<'s, T, C> {
    set: &'s OrderedSet<T, C>,
    lower: Bound<&'s T>,
    upper: Bound<&'s T>,
    vacant: bool,
}

impl<'s, T: Clone, C: Comparator<T>> Span<'s, T, C> {
    /// The whole set.
    pub(crate) fn full(set: &'s OrderedSet<T, C>) -> Self {
        Self {
            set,
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
            vacant: false,
        }
    }

    /// No element of `set`, whatever it holds.
    pub(crate) fn vacant(set: &'s OrderedSet<T, C>) -> Self {
        Self {
            set,
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
            vacant: true,
        }
    }

    /// The elements of `set` between `lower` and `upper`.
    pub(crate) fn bounded(
        set: &'s OrderedSet<T, C>,
        lower: Bound<&'s T>,
        upper: Bound<&'s T>,
    ) -> Self {
        Self {
            set,
            lower,
            upper,
            vacant: false,
        }
    }

    /// Resumes the ascending traversal strictly after `cursor`, or from the
    /// start of the span when nothing has been materialized yet.
    fn resume(&self, cursor: Option<&T>) -> OrderedSetRangeIterator<'s, T, C> {
        if self.vacant {
            return OrderedSetRangeIterator::empty();
        }
        let set: &'s OrderedSet<T, C> = self.set;
        let lower = cursor.map_or(self.lower, Bound::Excluded);
        set.range(lower, self.upper)
    }

    fn capacity_hint(&self) -> usize {
        match (self.vacant, self.lower, self.upper) {
            (false, Bound::Unbounded, Bound::Unbounded) => self.set.len(),
            _ => 0,
        }
    }
}

enum CacheState<T> {
    Unbuilt,
    Partial(Vec<T>),
    Complete(Arc<[T]>),
}

impl<T> CacheState<T> {
    fn positions(&self) -> &[T] {
        match self {
            Self::Unbuilt => &[],
            Self::Partial(positions) => &positions[..],
            Self::Complete(positions) => &positions[..],
        }
    }

    fn serves(&self, demand: Demand) -> bool {
        match self {
            Self::Unbuilt => false,
            Self::Partial(positions) => demand.is_satisfied_by(positions.len()),
            Self::Complete(_) => true,
        }
    }
}

struct Slot<T> {
    generation: u64,
    state: CacheState<T>,
}

/// Positional cache guarded by its own reader-writer lock.
pub(crate) struct PositionCache<T> {
    slot: RwLock<Slot<T>>,
}

impl<T> PositionCache<T> {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            slot: RwLock::new(Slot {
                generation,
                state: CacheState::Unbuilt,
            }),
        }
    }

    /// Drops every materialized position and stamps the cache with `generation`.
    pub(crate) fn invalidate(&self, generation: u64) {
        let mut slot = self.slot.write();
        let discarded = slot.state.positions().len();
        slot.state = CacheState::Unbuilt;
        slot.generation = generation;
        tracing::debug!(generation, discarded, "position cache invalidated");
    }
}

impl<T: Clone> PositionCache<T> {
    /// Materializes enough of `span` for `demand` and passes the positions to `read`.
    ///
    /// The positions handed to `read` are guaranteed to satisfy `demand`
    /// unless the span itself is shorter.
    pub(crate) fn with_positions<C, R>(
        &self,
        generation: u64,
        demand: Demand,
        span: &Span<'_, T, C>,
        read: impl FnOnce(&[T]) -> R,
    ) -> R
    where
        C: Comparator<T>,
    {
        {
            let slot = self.slot.read();
            if slot.generation == generation && slot.state.serves(demand) {
                return read(slot.state.positions());
            }
        }

        let mut slot = self.slot.write();
        if slot.generation != generation {
            slot.state = CacheState::Unbuilt;
            slot.generation = generation;
        }
        if !slot.state.serves(demand) {
            Self::extend(&mut slot.state, generation, demand, span);
        }
        read(slot.state.positions())
    }

    /// Fully materializes `span` and returns the shared positions.
    pub(crate) fn complete<C>(&self, generation: u64, span: &Span<'_, T, C>) -> Arc<[T]>
    where
        C: Comparator<T>,
    {
        {
            let slot = self.slot.read();
            if let (true, CacheState::Complete(positions)) =
                (slot.generation == generation, &slot.state)
            {
                return Arc::clone(positions);
            }
        }

        let mut slot = self.slot.write();
        if slot.generation != generation {
            slot.state = CacheState::Unbuilt;
            slot.generation = generation;
        }
        if !slot.state.serves(Demand::All) {
            Self::extend(&mut slot.state, generation, Demand::All, span);
        }
        match &slot.state {
            CacheState::Complete(positions) => Arc::clone(positions),
            CacheState::Unbuilt | CacheState::Partial(_) => {
                panic!("position cache incomplete after exhausting its traversal")
            }
        }
    }

    fn extend<C>(state: &mut CacheState<T>, generation: u64, demand: Demand, span: &Span<'_, T, C>)
    where
        C: Comparator<T>,
    {
        let mut positions = match mem::replace(state, CacheState::Unbuilt) {
            CacheState::Unbuilt => Vec::with_capacity(span.capacity_hint()),
            CacheState::Partial(positions) => positions,
            CacheState::Complete(positions) => {
                *state = CacheState::Complete(positions);
                return;
            }
        };

        let mut remaining = span.resume(positions.last()).peekable();
        while !demand.is_satisfied_by(positions.len()) {
            match remaining.next() {
                Some(element) => positions.push(element.clone()),
                None => break,
            }
        }
        let exhausted = remaining.peek().is_none();

        tracing::trace!(
            generation,
            materialized = positions.len(),
            complete = exhausted,
            "position cache extended"
        );

        *state = if exhausted {
            CacheState::Complete(Arc::from(positions))
        } else {
            CacheState::Partial(positions)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_set() -> OrderedSet<i32> {
        (1..=10).collect()
    }

    #[rstest]
    #[case(Demand::Through(0), 1)]
    #[case(Demand::Through(4), 5)]
    fn test_bounded_demand_materializes_prefix(#[case] demand: Demand, #[case] expected: usize) {
        let set = sample_set();
        let cache = PositionCache::new(0);
        let materialized = cache.with_positions(0, demand, &Span::full(&set), <[i32]>::len);
        assert_eq!(materialized, expected);
    }

    #[rstest]
    fn test_full_demand_materializes_everything() {
        let set = sample_set();
        let cache = PositionCache::new(0);
        let positions = cache.complete(0, &Span::full(&set));
        assert_eq!(&*positions, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[rstest]
    fn test_extension_resumes_after_cursor() {
        let set = sample_set();
        let cache = PositionCache::new(0);
        let span = Span::full(&set);
        cache.with_positions(0, Demand::Through(2), &span, |_| ());
        let positions = cache.with_positions(0, Demand::Through(6), &span, <[i32]>::to_vec);
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[rstest]
    fn test_last_position_completes_cache() {
        let set = sample_set();
        let cache = PositionCache::new(0);
        let span = Span::full(&set);
        cache.with_positions(0, Demand::Through(9), &span, |_| ());
        let slot = cache.slot.read();
        assert!(matches!(slot.state, CacheState::Complete(_)));
    }

    #[rstest]
    fn test_generation_change_rebuilds() {
        let mut set = sample_set();
        let cache = PositionCache::new(0);
        cache.with_positions(0, Demand::All, &Span::full(&set), |_| ());

        set.remove(&1);
        let first = cache.with_positions(1, Demand::Through(0), &Span::full(&set), |positions| {
            positions[0]
        });
        assert_eq!(first, 2);
    }

    #[rstest]
    fn test_invalidate_resets_state() {
        let set = sample_set();
        let cache = PositionCache::new(0);
        cache.with_positions(0, Demand::All, &Span::full(&set), |_| ());
        cache.invalidate(1);
        let slot = cache.slot.read();
        assert!(matches!(slot.state, CacheState::Unbuilt));
        assert_eq!(slot.generation, 1);
    }

    #[rstest]
    fn test_vacant_span_completes_empty() {
        let set = sample_set();
        let cache = PositionCache::new(0);
        let positions = cache.complete(0, &Span::vacant(&set));
        assert!(positions.is_empty());
    }

    #[rstest]
    fn test_bounded_span() {
        let set = sample_set();
        let cache = PositionCache::new(0);
        let (lower, upper) = (3, 7);
        let span = Span::bounded(&set, Bound::Included(&lower), Bound::Excluded(&upper));
        let positions = cache.complete(0, &span);
        assert_eq!(&*positions, &[3, 4, 5, 6]);
    }
}
