//! # treelist
//!
//! A concurrent, index-addressable list over an ordered set.
//!
//! ## Overview
//!
//! An [`IndexedView`](view::IndexedView) keeps unique elements sorted by a
//! caller-supplied [`Comparator`](order::Comparator) and answers positional
//! queries (`get(i)`, `index_of`, `sub_range`) through a positional cache that
//! is built lazily from the set's ordered traversal and discarded on every
//! structural change. It includes:
//!
//! - **Orders**: [`NaturalOrder`](order::NaturalOrder),
//!   [`ReverseOrder`](order::ReverseOrder), and plain comparison closures
//! - **Ordered set**: [`OrderedSet`](set::OrderedSet), the storage the views
//!   are built on
//! - **Views**: [`IndexedView`](view::IndexedView) and the read-only
//!   [`RangeView`](view::RangeView)
//! - **List contracts**: [`PositionalList`](list::PositionalList) and
//!   [`SortedList`](list::SortedList)
//!
//! ## Feature Flags
//!
//! - `loom`: Swap the synchronization primitives for their `loom` models
//!
//! ## Example
//!
//! ```rust
//! use treelist::prelude::*;
//!
//! let view = IndexedView::with_comparator(|left: &&str, right: &&str| {
//!     left.len().cmp(&right.len()).then_with(|| left.cmp(right))
//! });
//! view.insert_all(["hoge", "foo", "bar"]);
//!
//! assert_eq!(view.to_vec(), vec!["bar", "foo", "hoge"]);
//! assert_eq!(view.get(2), Ok("hoge"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the views, the ordered set, the orders, and the list traits.
///
/// # Usage
///
/// ```rust
/// use treelist::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{EmptyCollection, IndexOutOfBounds, ViewError};
    pub use crate::list::{PositionalList, SortedList};
    pub use crate::order::{Comparator, FnOrder, NaturalOrder, ReverseOrder};
    pub use crate::set::OrderedSet;
    pub use crate::view::{IndexedView, ListIter, RangeView};
}

pub mod error;
pub mod list;
pub mod order;
pub mod set;
pub mod view;

mod sync;
