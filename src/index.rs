//! The user-facing sorted index.
//!
//! [`SortedIndex`] pairs one [`SortedStorage`] with one
//! [`PositionOracle`] built over that exact buffer. The pair is created
//! together and never observable out of step: the only construction path
//! finalizes the buffer first, then builds the oracle, then assembles the
//! index.
//!
//! # Query design
//!
//! Every query first asks the oracle for a candidate range, clamps it to the
//! buffer, and then runs an exact binary search restricted to that range.
//! By the oracle's containment contract the restricted search returns the
//! same answer as an unrestricted search over the whole buffer, so a wide or
//! even degenerate oracle answer costs time, never correctness.
//!
//! # Immutability
//!
//! No operation mutates an existing index. Slicing materializes a fresh
//! buffer, and every set-algebra result is a brand-new index with exactly
//! one oracle build over its final buffer.
//!
//! # Examples
//!
//! ```rust
//! use rankvec::SortedIndex;
//!
//! let index: SortedIndex = SortedIndex::new(vec![5, 1, 3, 3]);
//! assert_eq!(index.len(), 4);
//! assert!(index.contains(3));
//! assert_eq!(index.rank(3), 3);
//! assert_eq!(index.find_gt(3), Some(5));
//!
//! let other: SortedIndex = SortedIndex::new(vec![2, 3]);
//! let union = &index + &other;
//! assert_eq!(union.iter().collect::<Vec<i64>>(), vec![1, 2, 3, 3, 3, 5]);
//! ```

use crate::algebra;
use crate::error::RankVecError;
use crate::oracle::{PositionOracle, SampledOracle};
use crate::storage::SortedStorage;

/// An immutable, queryable index over a sorted multiset of `i64` keys.
///
/// Composed of exactly one owned ascending buffer and one
/// approximate-position oracle built over it. The oracle type is a generic
/// parameter so any implementation of [`PositionOracle`] can be substituted;
/// the default is [`SampledOracle`].
///
/// # Examples
///
/// ```rust
/// use rankvec::{ExhaustiveOracle, SortedIndex};
///
/// // Default oracle.
/// let index: SortedIndex = SortedIndex::new(vec![3, 1, 2]);
/// assert_eq!(index.get(0), Ok(1));
///
/// // Any oracle honoring the containment contract answers identically.
/// let exhaustive: SortedIndex<ExhaustiveOracle> = SortedIndex::new(vec![3, 1, 2]);
/// assert_eq!(index.rank(2), exhaustive.rank(2));
/// ```
#[derive(Debug, Clone)]
pub struct SortedIndex<O: PositionOracle = SampledOracle> {
    storage: SortedStorage,
    oracle: O,
}

impl<O: PositionOracle> SortedIndex<O> {
    /// Creates an index from arbitrary input, sorting only when needed.
    ///
    /// The buffer is normalized first and the oracle is built once over the
    /// final buffer; construction either fully succeeds or nothing is
    /// produced.
    #[must_use]
    pub fn new(keys: Vec<i64>) -> Self {
        Self::from_storage(SortedStorage::from_unsorted(keys))
    }

    /// Creates an index from input the caller guarantees is ascending.
    ///
    /// Checked in debug builds; see [`SortedStorage::from_sorted`].
    #[must_use]
    pub fn from_sorted(keys: Vec<i64>) -> Self {
        Self::from_storage(SortedStorage::from_sorted(keys))
    }

    /// Creates an index from a fallible key source.
    ///
    /// The source is drained completely before any index exists; the first
    /// error aborts construction atomically and is returned as-is.
    ///
    /// # Errors
    ///
    /// Propagates the first error produced by the source.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let parsed = ["3", "1", "2"].iter().map(|text| text.parse::<i64>());
    /// let index: SortedIndex = SortedIndex::try_from_results(parsed).unwrap();
    /// assert_eq!(index.iter().collect::<Vec<i64>>(), vec![1, 2, 3]);
    ///
    /// let broken = ["3", "x"].iter().map(|text| text.parse::<i64>());
    /// assert!(SortedIndex::<rankvec::SampledOracle>::try_from_results(broken).is_err());
    /// ```
    pub fn try_from_results<I, E>(sources: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<i64, E>>,
    {
        let keys = sources.into_iter().collect::<Result<Vec<i64>, E>>()?;
        Ok(Self::new(keys))
    }

    /// Assembles an index from finalized storage, building the oracle over
    /// the exact buffer the index will own.
    fn from_storage(storage: SortedStorage) -> Self {
        let oracle = O::build(storage.as_slice());
        Self { storage, oracle }
    }

    /// Returns the number of keys in the index.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the index holds no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns the backing buffer as a borrowed ascending slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        self.storage.as_slice()
    }

    // =========================================================================
    // Query engine
    // =========================================================================

    /// Returns the oracle window for `key`, clamped to the buffer, together
    /// with its offset. The clamp is a guard against a misbehaving oracle;
    /// a contract-honoring oracle is unaffected by it.
    fn window(&self, key: i64) -> (usize, &[i64]) {
        let range = self.oracle.approximate_position(key);
        let length = self.storage.len();
        let lo = range.lo.min(length);
        let hi = range.hi.clamp(lo, length);
        (lo, &self.storage.as_slice()[lo..hi])
    }

    /// Returns `true` if `key` occurs in the index.
    ///
    /// # Complexity
    ///
    /// O(log w) where w is the oracle window width.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![1, 3, 3, 5]);
    /// assert!(index.contains(3));
    /// assert!(!index.contains(4));
    /// ```
    #[must_use]
    pub fn contains(&self, key: i64) -> bool {
        let (_, window) = self.window(key);
        window.binary_search(&key).is_ok()
    }

    /// Returns the position of the first key `>= key`.
    ///
    /// Equal to `len()` when every key is smaller.
    #[must_use]
    pub fn lower_bound(&self, key: i64) -> usize {
        let (offset, window) = self.window(key);
        offset + window.partition_point(|&candidate| candidate < key)
    }

    /// Returns the position of the first key `> key`.
    ///
    /// Equal to `len()` when no key is greater.
    #[must_use]
    pub fn upper_bound(&self, key: i64) -> usize {
        let (offset, window) = self.window(key);
        offset + window.partition_point(|&candidate| candidate <= key)
    }

    /// Returns the rightmost key strictly less than `key`, or `None` when
    /// `key` is less than or equal to the minimum.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![10, 20, 30]);
    /// assert_eq!(index.find_lt(20), Some(10));
    /// assert_eq!(index.find_lt(10), None);
    /// ```
    #[must_use]
    pub fn find_lt(&self, key: i64) -> Option<i64> {
        let boundary = self.lower_bound(key);
        if boundary == 0 {
            None
        } else {
            self.storage.get(boundary - 1)
        }
    }

    /// Returns the rightmost key less than or equal to `key`, or `None`
    /// when `key` is less than the minimum.
    #[must_use]
    pub fn find_le(&self, key: i64) -> Option<i64> {
        let boundary = self.upper_bound(key);
        if boundary == 0 {
            None
        } else {
            self.storage.get(boundary - 1)
        }
    }

    /// Returns the leftmost key strictly greater than `key`, or `None` when
    /// `key` is greater than or equal to the maximum.
    #[must_use]
    pub fn find_gt(&self, key: i64) -> Option<i64> {
        self.storage.get(self.upper_bound(key))
    }

    /// Returns the leftmost key greater than or equal to `key`, or `None`
    /// when `key` is greater than the maximum.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![10, 20, 30]);
    /// assert_eq!(index.find_ge(15), Some(20));
    /// assert_eq!(index.find_ge(31), None);
    /// ```
    #[must_use]
    pub fn find_ge(&self, key: i64) -> Option<i64> {
        self.storage.get(self.lower_bound(key))
    }

    /// Returns the number of keys less than or equal to `key`.
    ///
    /// Well-defined for absent keys, including on an empty index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![1, 2, 2, 3]);
    /// assert_eq!(index.rank(2), 3);
    /// assert_eq!(index.rank(0), 0);
    /// assert_eq!(index.rank(100), 4);
    /// ```
    #[must_use]
    pub fn rank(&self, key: i64) -> usize {
        self.upper_bound(key)
    }

    /// Returns the number of keys exactly equal to `key` (0 when absent).
    #[must_use]
    pub fn count(&self, key: i64) -> usize {
        self.upper_bound(key) - self.lower_bound(key)
    }

    /// Returns the key at `position`, supporting negative positions counted
    /// from the end.
    ///
    /// # Errors
    ///
    /// Returns [`RankVecError::OutOfBounds`] when the position is out of
    /// range after negative-index normalization. Boundary violations are
    /// signaled, never clamped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![10, 20, 30]);
    /// assert_eq!(index.get(0), Ok(10));
    /// assert_eq!(index.get(-1), Ok(30));
    /// assert!(index.get(3).is_err());
    /// assert!(index.get(-4).is_err());
    /// ```
    pub fn get(&self, position: isize) -> Result<i64, RankVecError> {
        let length = self.storage.len();
        let normalized = if position < 0 {
            position + length as isize
        } else {
            position
        };
        usize::try_from(normalized)
            .ok()
            .and_then(|index| self.storage.get(index))
            .ok_or(RankVecError::OutOfBounds { position, length })
    }

    /// Returns the position of the first occurrence of `key`, constrained
    /// to fall within the `[start, stop)` window (defaults: the whole
    /// index). Window bounds follow sequence semantics: negative values
    /// count from the end and out-of-range values clamp.
    ///
    /// The first occurrence is located globally and only then checked
    /// against the window, so an occurrence before `start` masks one inside
    /// the window.
    ///
    /// # Errors
    ///
    /// Returns [`RankVecError::KeyNotFound`] when `key` is absent or its
    /// first occurrence falls outside the window.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![10, 20, 20, 30]);
    /// assert_eq!(index.position_of(20, None, None), Ok(1));
    /// assert!(index.position_of(25, None, None).is_err());
    /// // 20 first occurs at position 1, outside [2, len).
    /// assert!(index.position_of(20, Some(2), None).is_err());
    /// ```
    pub fn position_of(
        &self,
        key: i64,
        start: Option<isize>,
        stop: Option<isize>,
    ) -> Result<usize, RankVecError> {
        let length = self.storage.len();
        let left = normalize_window_bound(start.unwrap_or(0), length);
        let right = normalize_window_bound(stop.unwrap_or(length as isize), length);

        let position = self.lower_bound(key);
        let found = self.storage.get(position) == Some(key);
        if found && position >= left && position < right {
            Ok(position)
        } else {
            Err(RankVecError::KeyNotFound { key })
        }
    }

    /// Returns a lazy iterator over the keys inside the interval selected by
    /// `low`, `high`, and the inclusive flags; `reverse` flips the order of
    /// traversal without changing the selected multiset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![1, 2, 2, 3, 4]);
    ///
    /// let selected: Vec<i64> = index.range(2, 3, (true, true), false).collect();
    /// assert_eq!(selected, vec![2, 2, 3]);
    ///
    /// let exclusive: Vec<i64> = index.range(2, 3, (false, false), false).collect();
    /// assert_eq!(exclusive, Vec::<i64>::new());
    ///
    /// let reversed: Vec<i64> = index.range(2, 3, (true, true), true).collect();
    /// assert_eq!(reversed, vec![3, 2, 2]);
    /// ```
    #[must_use]
    pub fn range(
        &self,
        low: i64,
        high: i64,
        inclusive: (bool, bool),
        reverse: bool,
    ) -> SortedIndexRangeIterator<'_> {
        let from = if inclusive.0 {
            self.lower_bound(low)
        } else {
            self.upper_bound(low)
        };
        let to = if inclusive.1 {
            self.upper_bound(high)
        } else {
            self.lower_bound(high)
        };

        let window = if from < to {
            &self.storage.as_slice()[from..to]
        } else {
            &[]
        };
        SortedIndexRangeIterator { window, reverse }
    }

    /// Returns an iterator over all keys in ascending order.
    #[inline]
    pub fn iter(&self) -> SortedIndexIterator<'_> {
        SortedIndexIterator {
            inner: self.storage.as_slice().iter().copied(),
        }
    }

    /// Builds a new independent index from the selection described by
    /// `start..stop` with `step` (sequence-slicing semantics; see
    /// [`SortedStorage::slice`]).
    ///
    /// The selection is materialized into its own buffer and indexed from
    /// scratch; the original is left untouched. A negative step produces a
    /// descending selection, which the constructor re-sorts.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![10, 20, 30, 40]);
    /// let every_other = index.slice(None, None, 2);
    /// assert_eq!(every_other.iter().collect::<Vec<i64>>(), vec![10, 30]);
    ///
    /// // A full slice reproduces the original sequence.
    /// let full = index.slice(Some(0), Some(4), 1);
    /// assert_eq!(full, index);
    /// ```
    #[must_use]
    pub fn slice(&self, start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self::new(self.storage.slice(start, stop, step))
    }

    // =========================================================================
    // Set algebra
    // =========================================================================

    /// Returns the multiset union of two indexes as a new index.
    ///
    /// One stable merge pass; duplicates are preserved from both operands,
    /// and both operands are left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let p: SortedIndex = SortedIndex::new(vec![1, 3, 3, 5]);
    /// let q: SortedIndex = SortedIndex::new(vec![2, 3]);
    /// let union = p.union(&q);
    /// assert_eq!(union.iter().collect::<Vec<i64>>(), vec![1, 2, 3, 3, 3, 5]);
    /// assert_eq!(p.len(), 4);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_sorted(algebra::merge_sorted(
            self.storage.as_slice(),
            other.storage.as_slice(),
        ))
    }

    /// Returns the multiset union with a raw key collection as a new index.
    ///
    /// The collection is copied and sorted first when unsorted (duplicates
    /// preserved), then merged in a single pass.
    #[must_use]
    pub fn union_with<I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut operand: Vec<i64> = keys.into_iter().collect();
        if !operand.is_sorted() {
            operand.sort_unstable();
        }
        Self::from_sorted(algebra::merge_sorted(self.storage.as_slice(), &operand))
    }

    /// Returns the ordered multiset difference `self - other` as a new
    /// index.
    ///
    /// Each occurrence in `other` removes at most one matching occurrence;
    /// when `other` contributes nothing, the single-pass output is used
    /// directly as the new storage without another copy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let p: SortedIndex = SortedIndex::new(vec![1, 2, 2, 3]);
    /// let q: SortedIndex = SortedIndex::new(vec![2]);
    /// let difference = p.difference(&q);
    /// assert_eq!(difference.iter().collect::<Vec<i64>>(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self::from_sorted(algebra::multiset_difference(
            self.storage.as_slice(),
            other.storage.as_slice(),
        ))
    }

    /// Returns the ordered multiset difference with a raw key collection as
    /// a new index, sorting the collection first when unsorted.
    #[must_use]
    pub fn difference_with<I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut operand: Vec<i64> = keys.into_iter().collect();
        if !operand.is_sorted() {
            operand.sort_unstable();
        }
        Self::from_sorted(algebra::multiset_difference(
            self.storage.as_slice(),
            &operand,
        ))
    }

    /// Returns a new index with consecutive duplicate keys collapsed.
    ///
    /// One linear pass; a duplicate-free index yields an equal copy, with
    /// the pass output used directly as the new storage.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new(vec![1, 1, 2, 3, 3, 3]);
    /// let deduplicated = index.drop_duplicates();
    /// assert_eq!(deduplicated.iter().collect::<Vec<i64>>(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn drop_duplicates(&self) -> Self {
        Self::from_sorted(algebra::dedup_sorted(self.storage.as_slice()))
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Returns size and shape statistics of the index.
    ///
    /// Pass-throughs from the oracle and the storage; no independent
    /// invariants.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedIndex;
    ///
    /// let index: SortedIndex = SortedIndex::new((0..100).collect());
    /// let stats = index.stats();
    /// assert_eq!(stats.data_bytes, 800);
    /// assert!(stats.leaf_segments >= 1);
    /// ```
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            leaf_segments: self.oracle.segment_count(),
            data_bytes: self.storage.len() * size_of::<i64>(),
            index_bytes: self.oracle.size_in_bytes(),
            height: self.oracle.height(),
        }
    }
}

/// Normalizes one `position_of` window bound: negative values count from
/// the end, out-of-range values clamp to `[0, length]`.
fn normalize_window_bound(bound: isize, length: usize) -> usize {
    let normalized = if bound < 0 {
        bound + length as isize
    } else {
        bound
    };
    usize::try_from(normalized.clamp(0, length as isize)).unwrap_or(0)
}

// =============================================================================
// Diagnostics report
// =============================================================================

/// Size and shape statistics of a [`SortedIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexStats {
    /// Number of leaf segments in the oracle's internal partition.
    pub leaf_segments: usize,
    /// Raw data size in bytes: key count times key width.
    pub data_bytes: usize,
    /// Memory footprint of the oracle in bytes.
    pub index_bytes: usize,
    /// Number of structural levels of the index.
    pub height: usize,
}

// =============================================================================
// Trait implementations
// =============================================================================

impl<O: PositionOracle> Default for SortedIndex<O> {
    #[inline]
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<O: PositionOracle> FromIterator<i64> for SortedIndex<O> {
    fn from_iter<I: IntoIterator<Item = i64>>(sources: I) -> Self {
        Self::new(sources.into_iter().collect())
    }
}

/// Content equality: two indexes are equal when they hold the same key
/// sequence, regardless of their oracle types or internals.
impl<O: PositionOracle, P: PositionOracle> PartialEq<SortedIndex<P>> for SortedIndex<O> {
    fn eq(&self, other: &SortedIndex<P>) -> bool {
        self.storage.as_slice() == other.storage.as_slice()
    }
}

impl<O: PositionOracle> Eq for SortedIndex<O> {}

impl<O: PositionOracle> std::fmt::Display for SortedIndex<O> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "[")?;
        for (position, key) in self.iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}")?;
        }
        write!(formatter, "]")
    }
}

impl<O: PositionOracle> std::ops::Add<&SortedIndex<O>> for &SortedIndex<O> {
    type Output = SortedIndex<O>;

    #[inline]
    fn add(self, other: &SortedIndex<O>) -> SortedIndex<O> {
        self.union(other)
    }
}

impl<O: PositionOracle> std::ops::Add<Vec<i64>> for &SortedIndex<O> {
    type Output = SortedIndex<O>;

    #[inline]
    fn add(self, keys: Vec<i64>) -> SortedIndex<O> {
        self.union_with(keys)
    }
}

impl<O: PositionOracle> std::ops::Sub<&SortedIndex<O>> for &SortedIndex<O> {
    type Output = SortedIndex<O>;

    #[inline]
    fn sub(self, other: &SortedIndex<O>) -> SortedIndex<O> {
        self.difference(other)
    }
}

impl<O: PositionOracle> std::ops::Sub<Vec<i64>> for &SortedIndex<O> {
    type Output = SortedIndex<O>;

    #[inline]
    fn sub(self, keys: Vec<i64>) -> SortedIndex<O> {
        self.difference_with(keys)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over the keys of a [`SortedIndex`] in ascending order.
pub struct SortedIndexIterator<'a> {
    inner: std::iter::Copied<std::slice::Iter<'a, i64>>,
}

impl Iterator for SortedIndexIterator<'_> {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<i64> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for SortedIndexIterator<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<i64> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for SortedIndexIterator<'_> {}

impl std::iter::FusedIterator for SortedIndexIterator<'_> {}

/// Owning iterator over the keys of a [`SortedIndex`] in ascending order.
pub struct SortedIndexIntoIterator {
    inner: std::vec::IntoIter<i64>,
}

impl Iterator for SortedIndexIntoIterator {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<i64> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for SortedIndexIntoIterator {
    #[inline]
    fn next_back(&mut self) -> Option<i64> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for SortedIndexIntoIterator {}

impl std::iter::FusedIterator for SortedIndexIntoIterator {}

impl<'a, O: PositionOracle> IntoIterator for &'a SortedIndex<O> {
    type Item = i64;
    type IntoIter = SortedIndexIterator<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<O: PositionOracle> IntoIterator for SortedIndex<O> {
    type Item = i64;
    type IntoIter = SortedIndexIntoIterator;

    fn into_iter(self) -> Self::IntoIter {
        let keys: Vec<i64> = self.storage.as_slice().to_vec();
        SortedIndexIntoIterator {
            inner: keys.into_iter(),
        }
    }
}

/// Lazy iterator over an interval of a [`SortedIndex`].
///
/// Produced by [`SortedIndex::range`]; finite and non-restartable. Walks
/// the selected window front to back, or back to front when built with
/// `reverse`, over the same multiset either way.
pub struct SortedIndexRangeIterator<'a> {
    window: &'a [i64],
    reverse: bool,
}

impl Iterator for SortedIndexRangeIterator<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let (key, rest) = if self.reverse {
            self.window.split_last()?
        } else {
            self.window.split_first()?
        };
        self.window = rest;
        Some(*key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.window.len(), Some(self.window.len()))
    }
}

impl ExactSizeIterator for SortedIndexRangeIterator<'_> {}

impl std::iter::FusedIterator for SortedIndexRangeIterator<'_> {}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<O: PositionOracle> serde::Serialize for SortedIndex<O> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for key in self.iter() {
            seq.serialize_element(&key)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct SortedIndexVisitor<O> {
    marker: std::marker::PhantomData<O>,
}

#[cfg(feature = "serde")]
impl<'de, O: PositionOracle> serde::de::Visitor<'de> for SortedIndexVisitor<O> {
    type Value = SortedIndex<O>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of 64-bit integer keys")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut keys = Vec::with_capacity(capacity);
        while let Some(key) = seq.next_element()? {
            keys.push(key);
        }
        Ok(SortedIndex::new(keys))
    }
}

#[cfg(feature = "serde")]
impl<'de, O: PositionOracle> serde::Deserialize<'de> for SortedIndex<O> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(SortedIndexVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ExhaustiveOracle;
    use rstest::rstest;

    fn index(keys: Vec<i64>) -> SortedIndex {
        SortedIndex::new(keys)
    }

    #[rstest]
    fn test_display_formats_like_a_list() {
        assert_eq!(format!("{}", index(vec![])), "[]");
        assert_eq!(format!("{}", index(vec![3, 1, 2])), "[1, 2, 3]");
    }

    #[rstest]
    fn test_content_equality_across_oracle_types() {
        let sampled: SortedIndex = SortedIndex::new(vec![1, 2, 3]);
        let exhaustive: SortedIndex<ExhaustiveOracle> = SortedIndex::new(vec![3, 2, 1]);
        assert_eq!(sampled, exhaustive);
    }

    #[rstest]
    fn test_default_is_empty() {
        let empty: SortedIndex = SortedIndex::default();
        assert!(empty.is_empty());
        assert_eq!(empty.stats().data_bytes, 0);
    }

    #[rstest]
    fn test_empty_index_boundary_queries() {
        let empty = index(vec![]);
        assert!(!empty.contains(1));
        assert_eq!(empty.find_lt(1), None);
        assert_eq!(empty.find_le(1), None);
        assert_eq!(empty.find_gt(1), None);
        assert_eq!(empty.find_ge(1), None);
        assert_eq!(empty.rank(1), 0);
        assert_eq!(empty.count(1), 0);
        assert_eq!(empty.range(0, 10, (true, true), false).count(), 0);
        assert!(empty.get(0).is_err());
        assert!(empty.position_of(1, None, None).is_err());
    }

    #[rstest]
    fn test_window_clamps_a_misbehaving_oracle() {
        /// An oracle that violates nothing but answers ranges past the
        /// buffer end; the clamp must keep slicing in bounds.
        #[derive(Debug)]
        struct OverreachingOracle {
            length: usize,
        }

        impl PositionOracle for OverreachingOracle {
            fn build(keys: &[i64]) -> Self {
                Self { length: keys.len() }
            }

            fn approximate_position(&self, _key: i64) -> crate::oracle::PositionRange {
                crate::oracle::PositionRange {
                    lo: 0,
                    hi: self.length + 1000,
                }
            }

            fn segment_count(&self) -> usize {
                1
            }

            fn size_in_bytes(&self) -> usize {
                0
            }

            fn height(&self) -> usize {
                1
            }
        }

        let index: SortedIndex<OverreachingOracle> = SortedIndex::new(vec![1, 2, 3]);
        assert!(index.contains(2));
        assert_eq!(index.rank(3), 3);
        assert_eq!(index.find_ge(4), None);
    }

    #[rstest]
    fn test_range_with_inverted_bounds_is_empty() {
        let index = index(vec![1, 2, 3]);
        assert_eq!(index.range(3, 1, (true, true), false).count(), 0);
    }

    #[rstest]
    fn test_range_iterator_is_exact_size() {
        let index = index(vec![1, 2, 2, 3]);
        let iterator = index.range(2, 3, (true, true), false);
        assert_eq!(iterator.len(), 3);
    }

    #[rstest]
    fn test_into_iterator_for_owned_index() {
        let index = index(vec![3, 1, 2]);
        let keys: Vec<i64> = index.into_iter().collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_iterator_double_ended() {
        let index = index(vec![1, 2, 3]);
        let keys: Vec<i64> = index.iter().rev().collect();
        assert_eq!(keys, vec![3, 2, 1]);
    }

    #[rstest]
    fn test_operators_delegate_to_algebra() {
        let p = index(vec![1, 3, 3, 5]);
        let q = index(vec![2, 3]);
        assert_eq!((&p + &q).iter().collect::<Vec<i64>>(), vec![1, 2, 3, 3, 3, 5]);
        assert_eq!(
            (&p + vec![3, 2]).iter().collect::<Vec<i64>>(),
            vec![1, 2, 3, 3, 3, 5]
        );
        assert_eq!((&p - &q).iter().collect::<Vec<i64>>(), vec![1, 3, 5]);
        assert_eq!((&p - vec![3]).iter().collect::<Vec<i64>>(), vec![1, 3, 5]);
    }

    #[rstest]
    fn test_operands_are_left_unchanged() {
        let p = index(vec![1, 2]);
        let q = index(vec![2, 3]);
        let _union = &p + &q;
        let _difference = &p - &q;
        assert_eq!(p.iter().collect::<Vec<i64>>(), vec![1, 2]);
        assert_eq!(q.iter().collect::<Vec<i64>>(), vec![2, 3]);
    }

    #[rstest]
    fn test_stats_reads_through_oracle_and_storage() {
        let index: SortedIndex<ExhaustiveOracle> = SortedIndex::new((0..10).collect());
        let stats = index.stats();
        assert_eq!(
            stats,
            IndexStats {
                leaf_segments: 1,
                data_bytes: 80,
                index_bytes: 0,
                height: 1,
            }
        );
    }
}
