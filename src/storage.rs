//! Sorted storage: the owned, immutable, ascending key buffer.
//!
//! [`SortedStorage`] owns a contiguous buffer of signed 64-bit keys sorted
//! ascending, duplicates permitted. The constructor is the only code allowed
//! to see unsorted data; it sorts before anything else can observe the
//! buffer, and no operation mutates the buffer afterward. Downstream oracle
//! construction requires contiguous owned memory, so slicing materializes a
//! fresh buffer instead of aliasing the original.

/// Panic message for the ascending-order invariant on trusted construction.
const SORTED_INVARIANT_PANIC_MESSAGE: &str =
    "SortedStorage::from_sorted called with a buffer that is not ascending";

/// An owned, immutable buffer of keys sorted ascending, duplicates allowed.
///
/// Created once, at index construction or as the output of a set-algebra
/// operation, and never mutated thereafter. Exactly one owner; windows onto
/// the buffer are handed out as borrowed slices, and structural derivations
/// (slices with a stride) are materialized copies.
///
/// # Examples
///
/// ```rust
/// use rankvec::SortedStorage;
///
/// let storage = SortedStorage::from_unsorted(vec![3, 1, 2, 2]);
/// assert_eq!(storage.as_slice(), &[1, 2, 2, 3]);
/// assert_eq!(storage.len(), 4);
/// assert_eq!(storage.get(1), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedStorage {
    keys: Vec<i64>,
}

impl SortedStorage {
    /// Creates storage from arbitrary input, sorting only when needed.
    ///
    /// Already-ascending input is taken as-is in O(n); anything else is
    /// sorted first. Either way the result is complete before it becomes
    /// observable: construction never exposes a partially sorted buffer.
    #[must_use]
    pub fn from_unsorted(mut keys: Vec<i64>) -> Self {
        if !keys.is_sorted() {
            keys.sort_unstable();
        }
        Self { keys }
    }

    /// Creates storage from input the caller guarantees is ascending.
    ///
    /// Used by the set-algebra engine, whose single-pass outputs are sorted
    /// by construction. The guarantee is checked in debug builds.
    #[must_use]
    pub fn from_sorted(keys: Vec<i64>) -> Self {
        debug_assert!(keys.is_sorted(), "{}", SORTED_INVARIANT_PANIC_MESSAGE);
        Self { keys }
    }

    /// Returns the number of keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the buffer holds no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the key at `position`, or `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<i64> {
        self.keys.get(position).copied()
    }

    /// Returns the whole buffer as a borrowed slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.keys
    }

    /// Returns an iterator over the keys in ascending order.
    #[inline]
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, i64>> {
        self.keys.iter().copied()
    }

    /// Materializes the selection described by `start..stop` with `step`.
    ///
    /// Bounds follow standard sequence-slicing semantics: `None` selects the
    /// respective end, negative bounds are normalized by adding the length,
    /// and out-of-range bounds clamp rather than fail. A negative `step`
    /// walks backward, producing a descending selection.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rankvec::SortedStorage;
    ///
    /// let storage = SortedStorage::from_sorted(vec![10, 20, 30, 40, 50]);
    /// assert_eq!(storage.slice(Some(1), Some(4), 1), vec![20, 30, 40]);
    /// assert_eq!(storage.slice(None, None, 2), vec![10, 30, 50]);
    /// assert_eq!(storage.slice(Some(-2), None, 1), vec![40, 50]);
    /// assert_eq!(storage.slice(None, None, -1), vec![50, 40, 30, 20, 10]);
    /// ```
    #[must_use]
    pub fn slice(&self, start: Option<isize>, stop: Option<isize>, step: isize) -> Vec<i64> {
        assert!(step != 0, "slice step must be non-zero");

        let length = self.keys.len() as isize;
        let (start, stop) = if step > 0 {
            (
                clamp_bound(start.unwrap_or(0), length, 0, length),
                clamp_bound(stop.unwrap_or(length), length, 0, length),
            )
        } else {
            (
                clamp_bound(start.unwrap_or(length - 1), length, -1, length - 1),
                clamp_bound(stop.unwrap_or(-1 - length), length, -1, length - 1),
            )
        };

        let mut selection = Vec::new();
        let mut position = start;
        if step > 0 {
            while position < stop {
                selection.push(self.keys[position as usize]);
                position += step;
            }
        } else {
            while position > stop {
                selection.push(self.keys[position as usize]);
                position += step;
            }
        }
        selection
    }
}

impl<'a> IntoIterator for &'a SortedStorage {
    type Item = i64;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, i64>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalizes one slice bound: negative values count from the end, and the
/// result clamps to `[minimum, maximum]`.
fn clamp_bound(bound: isize, length: isize, minimum: isize, maximum: isize) -> isize {
    let normalized = if bound < 0 { bound + length } else { bound };
    normalized.clamp(minimum, maximum)
}

// =============================================================================
// Tests
// =============================================================================
