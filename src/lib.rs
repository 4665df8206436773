//! # rankvec
//!
//! An immutable, queryable index over a sorted multiset of signed 64-bit
//! integer keys. Exact order-statistics queries (membership, rank,
//! predecessor/successor, range extraction) are accelerated by a compact
//! approximate-position oracle, and multiset algebra (union, difference,
//! deduplication) produces new index instances without ever mutating an
//! existing one.
//!
//! ## Overview
//!
//! - [`SortedIndex`]: the unit the user interacts with — one owned
//!   ascending buffer plus one oracle built over it.
//! - [`PositionOracle`]: the capability interface for approximate-position
//!   lookups; the query engine is exact under any oracle honoring the
//!   containment contract.
//! - [`SortedStorage`]: the owned, immutable, ascending key buffer.
//! - [`RankVecError`]: out-of-bounds positional access and key-not-found
//!   lookups.
//!
//! ## Feature Flags
//!
//! - `serde`: serialization of [`SortedIndex`] (as a sequence of keys) and
//!   [`IndexStats`].
//!
//! ## Example
//!
//! ```rust
//! use rankvec::SortedIndex;
//!
//! let index: SortedIndex = SortedIndex::new(vec![5, 1, 3, 3]);
//! assert!(index.contains(3));
//! assert_eq!(index.rank(3), 3);
//! assert_eq!(index.find_lt(3), Some(1));
//!
//! let other: SortedIndex = SortedIndex::new(vec![2, 3]);
//! let union = &index + &other;
//! assert_eq!(union.iter().collect::<Vec<i64>>(), vec![1, 2, 3, 3, 3, 5]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use rankvec::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::RankVecError;
    pub use crate::index::{IndexStats, SortedIndex};
    pub use crate::oracle::{ExhaustiveOracle, PositionOracle, PositionRange, SampledOracle};
    pub use crate::storage::SortedStorage;
}

pub mod error;
pub mod index;
pub mod oracle;
pub mod storage;

mod algebra;

pub use error::RankVecError;
pub use index::{
    IndexStats, SortedIndex, SortedIndexIntoIterator, SortedIndexIterator,
    SortedIndexRangeIterator,
};
pub use oracle::{ExhaustiveOracle, PositionOracle, PositionRange, SampledOracle};
pub use storage::SortedStorage;
