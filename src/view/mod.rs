//! Positional views over an ordered set.
//!
//! - [`IndexedView`]: an owned, thread-safe list over an
//!   [`OrderedSet`](crate::set::OrderedSet) with a lazily built positional cache
//! - [`RangeView`]: a live, read-only window onto a contiguous part of an
//!   [`IndexedView`]
//! - [`ListIter`]: a bidirectional cursor over a snapshot of either view
//!
//! # Examples
//!
//! ```rust
//! use treelist::view::IndexedView;
//!
//! let view: IndexedView<i32> = [5, 3, 1, 4, 2].into_iter().collect();
//! assert_eq!(view.get(0), Ok(1));
//! assert_eq!(view.index_of(&4), Some(3));
//!
//! let middle = view.sub_range(1, 4).unwrap();
//! assert_eq!(middle.to_vec(), vec![2, 3, 4]);
//! assert_eq!(middle.first(), Ok(2));
//! ```

mod cache;
mod indexed;
mod list_iter;
mod range;

pub use indexed::IndexedView;
pub use list_iter::ListIter;
pub use range::RangeView;
