//! Error types for index operations.
//!
//! This module provides the error values returned by the fallible operations
//! on [`SortedIndex`](crate::index::SortedIndex): positional access with an
//! out-of-range position, and [`position_of`](crate::index::SortedIndex::position_of)
//! called for a key that is absent from the searched window.
//!
//! Boundary queries that can legitimately come up empty
//! (`find_lt`/`find_le`/`find_gt`/`find_ge`) return `Option` instead; an
//! absent neighbor is a defined success outcome, not an error.

/// Errors returned by [`SortedIndex`](crate::index::SortedIndex) operations.
///
/// # Examples
///
/// ```rust
/// use rankvec::{RankVecError, SortedIndex};
///
/// let index: SortedIndex = SortedIndex::new(vec![10, 20, 30]);
///
/// let error = index.get(7).unwrap_err();
/// assert_eq!(
///     error,
///     RankVecError::OutOfBounds { position: 7, length: 3 }
/// );
///
/// let error = index.position_of(25, None, None).unwrap_err();
/// assert_eq!(format!("{error}"), "25 is not in index");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankVecError {
    /// Positional access fell outside the buffer after negative-index
    /// normalization.
    OutOfBounds {
        /// The position as supplied by the caller, before normalization.
        position: isize,
        /// The length of the index at the time of the access.
        length: usize,
    },
    /// The key was not found in the caller-specified window.
    KeyNotFound {
        /// The key that was searched for.
        key: i64,
    },
}

impl std::fmt::Display for RankVecError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds { position, length } => write!(
                formatter,
                "position {position} out of bounds for index of length {length}"
            ),
            Self::KeyNotFound { key } => write!(formatter, "{key} is not in index"),
        }
    }
}

impl std::error::Error for RankVecError {}
