//! Single-pass multiset algebra over ascending slices.
//!
//! The helpers here power union, difference, and deduplication on
//! [`SortedIndex`](crate::index::SortedIndex). All three walk their inputs
//! exactly once with two-pointer cursors and produce a new ascending buffer;
//! the caller hands that buffer straight to
//! [`SortedStorage::from_sorted`](crate::storage::SortedStorage::from_sorted),
//! so no second copy or re-sort happens even when nothing was removed.
//!
//! Unlike a set, a multiset keeps duplicates: merge preserves every
//! occurrence from both sides, and difference removes at most one occurrence
//! of a value per occurrence in the subtrahend.

use std::cmp::Ordering;

/// Merges two ascending slices into one ascending buffer, keeping all
/// duplicates from both sides (stable: ties take the left element first).
pub(crate) fn merge_sorted(left: &[i64], right: &[i64]) -> Vec<i64> {
    if left.is_empty() {
        return right.to_vec();
    }
    if right.is_empty() {
        return left.to_vec();
    }

    // Disjoint fast path: the ranges do not interleave.
    if left[left.len() - 1] <= right[0] {
        let mut result = Vec::with_capacity(left.len() + right.len());
        result.extend_from_slice(left);
        result.extend_from_slice(right);
        return result;
    }
    if right[right.len() - 1] < left[0] {
        let mut result = Vec::with_capacity(left.len() + right.len());
        result.extend_from_slice(right);
        result.extend_from_slice(left);
        return result;
    }

    let mut result = Vec::with_capacity(left.len() + right.len());
    let mut left_index = 0;
    let mut right_index = 0;

    while left_index < left.len() && right_index < right.len() {
        match left[left_index].cmp(&right[right_index]) {
            Ordering::Less | Ordering::Equal => {
                result.push(left[left_index]);
                left_index += 1;
            }
            Ordering::Greater => {
                result.push(right[right_index]);
                right_index += 1;
            }
        }
    }

    if left_index < left.len() {
        result.extend_from_slice(&left[left_index..]);
    }
    if right_index < right.len() {
        result.extend_from_slice(&right[right_index..]);
    }

    result
}

/// Computes the ordered multiset difference `left - right`.
///
/// Each occurrence in `right` cancels at most one matching occurrence in
/// `left`; everything else of `left` survives in order.
pub(crate) fn multiset_difference(left: &[i64], right: &[i64]) -> Vec<i64> {
    if left.is_empty() {
        return Vec::new();
    }
    if right.is_empty() {
        return left.to_vec();
    }

    // Disjoint fast path: nothing in right can cancel anything in left.
    if left[left.len() - 1] < right[0] || right[right.len() - 1] < left[0] {
        return left.to_vec();
    }

    let mut result = Vec::with_capacity(left.len());
    let mut left_index = 0;
    let mut right_index = 0;

    while left_index < left.len() && right_index < right.len() {
        match left[left_index].cmp(&right[right_index]) {
            Ordering::Less => {
                result.push(left[left_index]);
                left_index += 1;
            }
            Ordering::Greater => {
                right_index += 1;
            }
            Ordering::Equal => {
                left_index += 1;
                right_index += 1;
            }
        }
    }

    if left_index < left.len() {
        result.extend_from_slice(&left[left_index..]);
    }

    result
}

/// Collapses consecutive equal keys of an ascending slice into one buffer
/// with a single occurrence each.
pub(crate) fn dedup_sorted(keys: &[i64]) -> Vec<i64> {
    let mut result = Vec::with_capacity(keys.len());
    for &key in keys {
        if result.last() != Some(&key) {
            result.push(key);
        }
    }
    result
}

// =============================================================================
// Tests
// =============================================================================
