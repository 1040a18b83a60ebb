//! The ordered-set primitive the views are built on.
//!
//! [`OrderedSet`] keeps one element per equivalence class of a caller-supplied
//! [`Comparator`](crate::order::Comparator) and supports membership tests,
//! insertion, removal, ascending traversal, first/last, and bounded range
//! traversal at `BTreeSet` cost. It has no notion of positions; positional
//! access is what [`IndexedView`](crate::view::IndexedView) adds on top.
//!
//! # Examples
//!
//! ```rust
//! use std::ops::Bound;
//! use treelist::set::OrderedSet;
//!
//! let mut set: OrderedSet<i32> = [5, 1, 3].into_iter().collect();
//! assert!(set.insert(4));
//! assert!(!set.insert(3));
//!
//! let middle: Vec<i32> = set
//!     .range(Bound::Included(&3), Bound::Excluded(&5))
//!     .copied()
//!     .collect();
//! assert_eq!(middle, vec![3, 4]);
//! ```

mod ordered_set;

pub use ordered_set::OrderedSet;
pub use ordered_set::OrderedSetIterator;
pub use ordered_set::OrderedSetRangeIterator;
