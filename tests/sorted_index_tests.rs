//! Unit tests for SortedIndex.
//!
//! Covers every query and set-algebra operation, the documented edge cases
//! (empty index, absent keys, negative positions, inclusive flags), and the
//! worked examples from the crate documentation.

use rankvec::{ExhaustiveOracle, RankVecError, SampledOracle, SortedIndex};
use rstest::rstest;

fn index(keys: Vec<i64>) -> SortedIndex {
    SortedIndex::new(keys)
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_new_sorts_unsorted_input() {
    let index = index(vec![5, 1, 3, 3]);
    assert_eq!(index.iter().collect::<Vec<i64>>(), vec![1, 3, 3, 5]);
}

#[rstest]
fn test_new_keeps_sorted_input() {
    let index = index(vec![1, 2, 2, 9]);
    assert_eq!(index.iter().collect::<Vec<i64>>(), vec![1, 2, 2, 9]);
}

#[rstest]
fn test_from_iterator() {
    let index: SortedIndex = (0..5).rev().collect();
    assert_eq!(index.iter().collect::<Vec<i64>>(), vec![0, 1, 2, 3, 4]);
}

#[rstest]
fn test_try_from_results_success() {
    let sources = vec![Ok(3), Ok(1), Ok(2)];
    let index: SortedIndex =
        SortedIndex::try_from_results::<_, String>(sources).expect("all sources valid");
    assert_eq!(index.iter().collect::<Vec<i64>>(), vec![1, 2, 3]);
}

#[rstest]
fn test_try_from_results_fails_atomically() {
    let sources = vec![Ok(3), Err("broken source".to_string()), Ok(1)];
    let result = SortedIndex::<SampledOracle>::try_from_results(sources);
    assert_eq!(result.unwrap_err(), "broken source");
}

// =============================================================================
// Membership, bounds, neighbors
// =============================================================================

#[rstest]
#[case(vec![1, 3, 3, 5], 3, true)]
#[case(vec![1, 3, 3, 5], 4, false)]
#[case(vec![1, 3, 3, 5], 0, false)]
#[case(vec![1, 3, 3, 5], 6, false)]
#[case(vec![], 1, false)]
fn test_contains(#[case] keys: Vec<i64>, #[case] key: i64, #[case] expected: bool) {
    assert_eq!(index(keys).contains(key), expected);
}

#[rstest]
fn test_lower_and_upper_bound() {
    let index = index(vec![10, 20, 20, 30]);
    assert_eq!(index.lower_bound(20), 1);
    assert_eq!(index.upper_bound(20), 3);
    assert_eq!(index.lower_bound(5), 0);
    assert_eq!(index.upper_bound(35), 4);
    assert_eq!(index.lower_bound(25), 3);
    assert_eq!(index.upper_bound(25), 3);
}

#[rstest]
fn test_find_lt() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(index.find_lt(20), Some(10));
    assert_eq!(index.find_lt(25), Some(20));
    assert_eq!(index.find_lt(10), None);
    assert_eq!(index.find_lt(9), None);
    assert_eq!(index.find_lt(100), Some(30));
}

#[rstest]
fn test_find_le() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(index.find_le(20), Some(20));
    assert_eq!(index.find_le(25), Some(20));
    assert_eq!(index.find_le(10), Some(10));
    assert_eq!(index.find_le(9), None);
}

#[rstest]
fn test_find_gt() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(index.find_gt(20), Some(30));
    assert_eq!(index.find_gt(15), Some(20));
    assert_eq!(index.find_gt(30), None);
    assert_eq!(index.find_gt(35), None);
}

#[rstest]
fn test_find_ge() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(index.find_ge(20), Some(20));
    assert_eq!(index.find_ge(15), Some(20));
    assert_eq!(index.find_ge(30), Some(30));
    assert_eq!(index.find_ge(31), None);
}

#[rstest]
fn test_find_family_with_duplicates() {
    let index = index(vec![5, 5, 5]);
    assert_eq!(index.find_lt(5), None);
    assert_eq!(index.find_le(5), Some(5));
    assert_eq!(index.find_gt(5), None);
    assert_eq!(index.find_ge(5), Some(5));
}

// =============================================================================
// Rank and count
// =============================================================================

#[rstest]
#[case(vec![1, 2, 2, 3], 2, 3)]
#[case(vec![1, 2, 2, 3], 0, 0)]
#[case(vec![1, 2, 2, 3], 100, 4)]
#[case(vec![], 1, 0)]
fn test_rank(#[case] keys: Vec<i64>, #[case] key: i64, #[case] expected: usize) {
    assert_eq!(index(keys).rank(key), expected);
}

#[rstest]
#[case(vec![1, 2, 2, 3], 2, 2)]
#[case(vec![1, 2, 2, 3], 4, 0)]
#[case(vec![7, 7, 7, 7], 7, 4)]
#[case(vec![], 7, 0)]
fn test_count(#[case] keys: Vec<i64>, #[case] key: i64, #[case] expected: usize) {
    assert_eq!(index(keys).count(key), expected);
}

// =============================================================================
// Positional access and negative indexing
// =============================================================================

#[rstest]
fn test_get_positive_and_negative_positions() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(index.get(0), Ok(10));
    assert_eq!(index.get(2), Ok(30));
    assert_eq!(index.get(-1), Ok(30));
    assert_eq!(index.get(-3), Ok(10));
}

#[rstest]
fn test_get_out_of_bounds_both_directions() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(
        index.get(3),
        Err(RankVecError::OutOfBounds {
            position: 3,
            length: 3
        })
    );
    assert_eq!(
        index.get(-4),
        Err(RankVecError::OutOfBounds {
            position: -4,
            length: 3
        })
    );
}

// =============================================================================
// position_of
// =============================================================================

#[rstest]
fn test_position_of_first_occurrence() {
    let index = index(vec![10, 20, 20, 30]);
    assert_eq!(index.position_of(20, None, None), Ok(1));
    assert_eq!(index.position_of(10, None, None), Ok(0));
    assert_eq!(index.position_of(30, None, None), Ok(3));
}

#[rstest]
fn test_position_of_absent_key() {
    let index = index(vec![10, 20, 20, 30]);
    let error = index.position_of(25, None, None).unwrap_err();
    assert_eq!(error, RankVecError::KeyNotFound { key: 25 });
    assert_eq!(format!("{error}"), "25 is not in index");
}

#[rstest]
fn test_position_of_window_excludes_first_occurrence() {
    // 20 first occurs at position 1; an occurrence sits at position 2, but
    // the first occurrence is what gets checked against the window.
    let index = index(vec![10, 20, 20, 30]);
    assert_eq!(
        index.position_of(20, Some(2), None),
        Err(RankVecError::KeyNotFound { key: 20 })
    );
}

#[rstest]
fn test_position_of_window_accepts_occurrence_inside() {
    let index = index(vec![10, 20, 20, 30]);
    assert_eq!(index.position_of(20, Some(1), Some(3)), Ok(1));
    assert_eq!(index.position_of(30, Some(-1), None), Ok(3));
}

#[rstest]
fn test_position_of_window_is_half_open() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(
        index.position_of(30, Some(0), Some(2)),
        Err(RankVecError::KeyNotFound { key: 30 })
    );
    assert_eq!(index.position_of(30, Some(0), Some(3)), Ok(2));
}

#[rstest]
fn test_position_of_window_clamps_out_of_range_bounds() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(index.position_of(10, Some(-100), Some(100)), Ok(0));
}

// =============================================================================
// range
// =============================================================================

#[rstest]
#[case((true, true), vec![2, 2, 3])]
#[case((true, false), vec![2, 2])]
#[case((false, true), vec![3])]
#[case((false, false), vec![])]
fn test_range_inclusive_flags(#[case] inclusive: (bool, bool), #[case] expected: Vec<i64>) {
    let index = index(vec![1, 2, 2, 3, 4]);
    let selected: Vec<i64> = index.range(2, 3, inclusive, false).collect();
    assert_eq!(selected, expected);
}

#[rstest]
fn test_range_reverse_same_multiset() {
    let index = index(vec![1, 2, 2, 3, 4]);
    let forward: Vec<i64> = index.range(2, 3, (true, true), false).collect();
    let mut backward: Vec<i64> = index.range(2, 3, (true, true), true).collect();
    assert_eq!(backward, vec![3, 2, 2]);
    backward.reverse();
    assert_eq!(forward, backward);
}

#[rstest]
fn test_range_outside_key_span() {
    let index = index(vec![10, 20, 30]);
    assert_eq!(index.range(40, 50, (true, true), false).count(), 0);
    assert_eq!(index.range(0, 5, (true, true), false).count(), 0);
}

#[rstest]
fn test_range_covering_everything() {
    let index = index(vec![10, 20, 30]);
    let selected: Vec<i64> = index.range(i64::MIN, i64::MAX, (true, true), false).collect();
    assert_eq!(selected, vec![10, 20, 30]);
}

// =============================================================================
// Slicing
// =============================================================================

#[rstest]
fn test_full_slice_round_trip() {
    let index = index(vec![4, 2, 2, 9]);
    let length = index.len() as isize;
    let full = index.slice(Some(0), Some(length), 1);
    assert_eq!(full, index);
}

#[rstest]
fn test_slice_with_stride() {
    let index = index(vec![10, 20, 30, 40, 50]);
    let every_other = index.slice(None, None, 2);
    assert_eq!(every_other.iter().collect::<Vec<i64>>(), vec![10, 30, 50]);
}

#[rstest]
fn test_slice_negative_step_yields_sorted_index() {
    // The materialized selection is descending; the new index re-sorts it.
    let index = index(vec![10, 20, 30]);
    let reversed = index.slice(None, None, -1);
    assert_eq!(reversed.iter().collect::<Vec<i64>>(), vec![10, 20, 30]);
}

#[rstest]
fn test_slice_is_independent_of_the_original() {
    let original = index(vec![1, 2, 3, 4]);
    let sliced = original.slice(Some(1), Some(3), 1);
    assert_eq!(sliced.iter().collect::<Vec<i64>>(), vec![2, 3]);
    assert_eq!(original.len(), 4);
    assert!(sliced.contains(2));
    assert!(!sliced.contains(1));
}

// =============================================================================
// Set algebra
// =============================================================================

#[rstest]
fn test_union_preserves_duplicates_from_both_operands() {
    let p = index(vec![1, 3, 3, 5]);
    let q = index(vec![2, 3]);
    let union = &p + &q;
    assert_eq!(union.iter().collect::<Vec<i64>>(), vec![1, 2, 3, 3, 3, 5]);
}

#[rstest]
fn test_union_is_commutative_on_content() {
    let p = index(vec![1, 3, 3, 5]);
    let q = index(vec![2, 3]);
    assert_eq!(&p + &q, &q + &p);
}

#[rstest]
fn test_union_with_unsorted_raw_collection() {
    let p = index(vec![1, 5]);
    let union = &p + vec![4, 2, 4];
    assert_eq!(union.iter().collect::<Vec<i64>>(), vec![1, 2, 4, 4, 5]);
}

#[rstest]
fn test_union_with_empty_operand() {
    let p = index(vec![1, 2]);
    let empty = index(vec![]);
    assert_eq!(&p + &empty, p);
    assert_eq!(&empty + &p, p);
}

#[rstest]
fn test_difference_respects_multiplicity() {
    let p = index(vec![1, 2, 2, 3]);
    let q = index(vec![2]);
    let difference = &p - &q;
    assert_eq!(difference.iter().collect::<Vec<i64>>(), vec![1, 2, 3]);
}

#[rstest]
fn test_difference_with_raw_collection() {
    let p = index(vec![1, 2, 2, 3]);
    let difference = &p - vec![2, 2, 5];
    assert_eq!(difference.iter().collect::<Vec<i64>>(), vec![1, 3]);
}

#[rstest]
fn test_difference_with_disjoint_operand_equals_original() {
    let p = index(vec![1, 2, 3]);
    let q = index(vec![7, 8]);
    assert_eq!(&p - &q, p);
}

#[rstest]
fn test_drop_duplicates() {
    let index = index(vec![1, 1, 2, 3, 3, 3]);
    let deduplicated = index.drop_duplicates();
    assert_eq!(deduplicated.iter().collect::<Vec<i64>>(), vec![1, 2, 3]);
}

#[rstest]
fn test_drop_duplicates_on_duplicate_free_input() {
    let index = index(vec![1, 2, 3]);
    assert_eq!(index.drop_duplicates(), index);
}

#[rstest]
fn test_algebra_results_answer_queries() {
    // Every algebra result carries a fresh oracle over its final buffer.
    let p = index(vec![1, 3, 3, 5]);
    let q = index(vec![2, 3]);

    let union = &p + &q;
    assert_eq!(union.count(3), 3);
    assert_eq!(union.rank(3), 5);

    let difference = &p - &q;
    assert_eq!(difference.count(3), 1);
    assert!(!difference.contains(2));

    let deduplicated = union.drop_duplicates();
    assert_eq!(deduplicated.count(3), 1);
    assert_eq!(deduplicated.len(), 4);
}

// =============================================================================
// Diagnostics
// =============================================================================

#[rstest]
fn test_stats_fields() {
    let index: SortedIndex = SortedIndex::new((0..256).collect());
    let stats = index.stats();
    assert_eq!(stats.data_bytes, 256 * 8);
    assert_eq!(stats.leaf_segments, 4); // default stride of 64
    assert!(stats.index_bytes > 0);
    assert_eq!(stats.height, 2);
}

#[rstest]
fn test_stats_on_empty_index() {
    let index = index(vec![]);
    let stats = index.stats();
    assert_eq!(stats.data_bytes, 0);
    assert_eq!(stats.leaf_segments, 0);
    assert_eq!(stats.index_bytes, 0);
    assert_eq!(stats.height, 1);
}

// =============================================================================
// Oracle substitution
// =============================================================================

#[rstest]
fn test_queries_agree_between_oracles() {
    let keys = vec![-7, -7, 0, 3, 3, 3, 12, 40, 40, 41];
    let sampled: SortedIndex = SortedIndex::new(keys.clone());
    let exhaustive: SortedIndex<ExhaustiveOracle> = SortedIndex::new(keys);

    for key in -10..45 {
        assert_eq!(sampled.contains(key), exhaustive.contains(key));
        assert_eq!(sampled.rank(key), exhaustive.rank(key));
        assert_eq!(sampled.count(key), exhaustive.count(key));
        assert_eq!(sampled.find_lt(key), exhaustive.find_lt(key));
        assert_eq!(sampled.find_le(key), exhaustive.find_le(key));
        assert_eq!(sampled.find_gt(key), exhaustive.find_gt(key));
        assert_eq!(sampled.find_ge(key), exhaustive.find_ge(key));
    }
}
