//! Error types for indexed access.
//!
//! Index-based operations fail with [`IndexOutOfBounds`] and boundary
//! element queries on an empty collection fail with [`EmptyCollection`].
//! [`ViewError`] unifies both for callers that mix operations under `?`.
//!
//! A failure of the internal cache invariant is not represented here: it can
//! only be caused by a bug in this crate and panics instead.

/// An index was outside the valid range of a list operation.
///
/// `len` is the length of the collection at the time of the check. For
/// element access the valid range is `0..len`; for iterator positions and
/// sub-range bounds it is `0..=len`.
///
/// # Examples
///
/// ```rust
/// use treelist::error::IndexOutOfBounds;
///
/// let error = IndexOutOfBounds { index: 5, len: 3 };
/// assert_eq!(format!("{error}"), "index 5 out of bounds for length 3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexOutOfBounds {
    /// The offending index.
    pub index: usize,
    /// The collection length the index was checked against.
    pub len: usize,
}

impl std::fmt::Display for IndexOutOfBounds {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "index {} out of bounds for length {}",
            self.index, self.len
        )
    }
}

impl std::error::Error for IndexOutOfBounds {}

impl IndexOutOfBounds {
    /// Accepts element indices `0..len`.
    pub(crate) const fn check_element(index: usize, len: usize) -> Result<(), Self> {
        if index < len {
            Ok(())
        } else {
            Err(Self { index, len })
        }
    }

    /// Accepts cursor positions `0..=len`.
    pub(crate) const fn check_position(index: usize, len: usize) -> Result<(), Self> {
        if index <= len {
            Ok(())
        } else {
            Err(Self { index, len })
        }
    }

    /// Accepts `from_index..to_index` with `from_index <= to_index <= len`.
    pub(crate) const fn check_range(
        from_index: usize,
        to_index: usize,
        len: usize,
    ) -> Result<(), Self> {
        if to_index > len {
            Err(Self {
                index: to_index,
                len,
            })
        } else if from_index > to_index {
            Err(Self {
                index: from_index,
                len,
            })
        } else {
            Ok(())
        }
    }
}

/// The first or last element of an empty collection was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyCollection;

impl std::fmt::Display for EmptyCollection {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("collection is empty")
    }
}

impl std::error::Error for EmptyCollection {}

/// Any error raised by a view operation.
///
/// # Examples
///
/// ```rust
/// use treelist::error::ViewError;
/// use treelist::view::IndexedView;
///
/// fn first_and_second(view: &IndexedView<i32>) -> Result<(i32, i32), ViewError> {
///     Ok((view.first()?, view.get(1)?))
/// }
///
/// let view: IndexedView<i32> = [20, 10].into_iter().collect();
/// assert_eq!(first_and_second(&view), Ok((10, 20)));
///
/// view.clear();
/// assert_eq!(first_and_second(&view), Err(ViewError::Empty(treelist::error::EmptyCollection)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewError {
    /// An index was out of bounds.
    IndexOutOfBounds(IndexOutOfBounds),
    /// The collection was empty.
    Empty(EmptyCollection),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfBounds(error) => write!(formatter, "{error}"),
            Self::Empty(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IndexOutOfBounds(error) => Some(error),
            Self::Empty(error) => Some(error),
        }
    }
}

impl From<IndexOutOfBounds> for ViewError {
    fn from(error: IndexOutOfBounds) -> Self {
        Self::IndexOutOfBounds(error)
    }
}

impl From<EmptyCollection> for ViewError {
    fn from(error: EmptyCollection) -> Self {
        Self::Empty(error)
    }
}
