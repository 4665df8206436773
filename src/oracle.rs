//! Approximate-position oracles.
//!
//! A [`PositionOracle`] maps a key to a half-open candidate range over the
//! backing buffer of a [`SortedIndex`](crate::index::SortedIndex). The oracle
//! is a capability interface: the query engine never relies on the precision
//! of the returned range, only on its *containment contract*, so any
//! implementation honoring the contract can be plugged in.
//!
//! # Containment contract
//!
//! For a buffer of keys sorted ascending and any query key `x`, the range
//! `[lo, hi)` returned by [`approximate_position`] must satisfy
//!
//! - `lo <= lower_bound(x)` (the position of the first element `>= x`), and
//! - `upper_bound(x) <= hi` (the position past the last element `<= x`).
//!
//! Every occurrence of `x`, and the position at which `x` would be inserted,
//! therefore lies inside the range. A degenerate oracle that always answers
//! the full buffer satisfies the contract; a tighter oracle only makes
//! queries faster, never more correct.
//!
//! # Provided implementations
//!
//! - [`ExhaustiveOracle`]: always answers the full range. Zero memory, and
//!   the adversarial baseline for testing the query engine.
//! - [`SampledOracle`]: records every `stride`-th key together with its
//!   implied position and narrows a query to a window of roughly one stride.
//!
//! The optimal piecewise-linear construction used by learned indexes is
//! intentionally not implemented here; an external oracle satisfying the
//! contract can supply it through the trait.
//!
//! [`approximate_position`]: PositionOracle::approximate_position

/// A half-open candidate range `[lo, hi)` over the backing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRange {
    /// Inclusive lower bound of the candidate range.
    pub lo: usize,
    /// Exclusive upper bound of the candidate range.
    pub hi: usize,
}

impl PositionRange {
    /// Returns the number of positions covered by the range.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.hi.saturating_sub(self.lo)
    }

    /// Returns `true` if the range covers no positions.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }
}

/// An approximate-position oracle over a finalized ascending buffer.
///
/// Built exactly once per buffer and immutable afterward; the index owning
/// the oracle guarantees it is never queried against a buffer other than the
/// one it was built from.
pub trait PositionOracle {
    /// Builds the oracle over a buffer of keys sorted ascending.
    ///
    /// The buffer is finalized before this is called and never changes while
    /// the oracle is alive.
    fn build(keys: &[i64]) -> Self
    where
        Self: Sized;

    /// Returns a candidate range for `key` honoring the containment contract
    /// described in the [module documentation](self).
    fn approximate_position(&self, key: i64) -> PositionRange;

    /// Number of leaf segments (internal partitions) of the oracle.
    fn segment_count(&self) -> usize;

    /// Memory occupied by the oracle itself, in bytes.
    fn size_in_bytes(&self) -> usize;

    /// Number of structural levels, counting the backing buffer as one.
    fn height(&self) -> usize;
}

// =============================================================================
// ExhaustiveOracle
// =============================================================================

/// The trivial oracle: every query is answered with the full buffer range.
///
/// Queries against it degrade to a plain binary search over the whole buffer,
/// which is exactly why it exists: it is the adversarial baseline the query
/// engine must agree with regardless of the oracle in use.
///
/// # Examples
///
/// ```rust
/// use rankvec::{ExhaustiveOracle, PositionOracle, PositionRange};
///
/// let oracle = ExhaustiveOracle::build(&[1, 2, 3]);
/// assert_eq!(
///     oracle.approximate_position(2),
///     PositionRange { lo: 0, hi: 3 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustiveOracle {
    length: usize,
}

impl PositionOracle for ExhaustiveOracle {
    #[inline]
    fn build(keys: &[i64]) -> Self {
        Self { length: keys.len() }
    }

    #[inline]
    fn approximate_position(&self, _key: i64) -> PositionRange {
        PositionRange {
            lo: 0,
            hi: self.length,
        }
    }

    #[inline]
    fn segment_count(&self) -> usize {
        1
    }

    #[inline]
    fn size_in_bytes(&self) -> usize {
        0
    }

    #[inline]
    fn height(&self) -> usize {
        1
    }
}

// =============================================================================
// SampledOracle
// =============================================================================

/// The default stride between recorded samples.
const DEFAULT_STRIDE: usize = 64;

/// A stride-sampling oracle.
///
/// Every `stride`-th key of the buffer is recorded in ascending order; the
/// sample at index `i` sits at buffer position `i * stride`, so positions
/// need not be stored. A query binary-searches the samples and returns the
/// window between the last sample strictly below the key and the first
/// sample strictly above it, which brackets every occurrence of the key and
/// its insertion point.
///
/// With distinct keys the window is at most two strides wide; a run of
/// duplicates spanning many samples widens the window accordingly, which
/// keeps the containment contract intact at the cost of a larger exact
/// search.
///
/// # Examples
///
/// ```rust
/// use rankvec::{PositionOracle, SampledOracle};
///
/// let keys: Vec<i64> = (0..1000).collect();
/// let oracle = SampledOracle::with_stride(&keys, 16);
/// let range = oracle.approximate_position(500);
/// assert!(range.lo <= 500 && 500 < range.hi);
/// assert!(range.len() <= 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledOracle {
    stride: usize,
    sample_keys: Vec<i64>,
    length: usize,
}

impl SampledOracle {
    /// Builds a sampling oracle with an explicit stride.
    ///
    /// # Panics
    ///
    /// Panics if `stride` is zero.
    #[must_use]
    pub fn with_stride(keys: &[i64], stride: usize) -> Self {
        assert!(stride > 0, "SampledOracle stride must be non-zero");
        let sample_keys = keys.iter().step_by(stride).copied().collect();
        Self {
            stride,
            sample_keys,
            length: keys.len(),
        }
    }

    /// Returns the stride between recorded samples.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }
}

impl PositionOracle for SampledOracle {
    fn build(keys: &[i64]) -> Self {
        Self::with_stride(keys, DEFAULT_STRIDE)
    }

    fn approximate_position(&self, key: i64) -> PositionRange {
        if self.length == 0 {
            return PositionRange { lo: 0, hi: 0 };
        }

        // Samples strictly below the key, and samples at or below it. The
        // sample at index i sits at buffer position i * stride.
        let below = self.sample_keys.partition_point(|&sample| sample < key);
        let at_or_below = self.sample_keys.partition_point(|&sample| sample <= key);

        let lo = if below == 0 {
            0
        } else {
            (below - 1) * self.stride
        };
        let hi = if at_or_below == self.sample_keys.len() {
            self.length
        } else {
            at_or_below * self.stride
        };

        PositionRange { lo, hi: hi.max(lo) }
    }

    #[inline]
    fn segment_count(&self) -> usize {
        self.sample_keys.len()
    }

    #[inline]
    fn size_in_bytes(&self) -> usize {
        self.sample_keys.len() * size_of::<i64>()
    }

    #[inline]
    fn height(&self) -> usize {
        if self.sample_keys.is_empty() { 1 } else { 2 }
    }
}

// =============================================================================
// Tests
// =============================================================================
