//! Candidate generation by sorted-array join
//!
//! Length-(k+1) candidates are built from the previous level's qualifying
//! itemsets, joined against the previous level's combined itemsets. Both lists
//! are sorted lexicographically, and the qualifying list is a subsequence of
//! the combined one.
//!
//! For a qualifying itemset `A = a0..a(k-1)` the joiner looks, for each skip
//! position `s` from `k-1` down to `0`, at the combined itemsets that equal
//! `A` without `a_s` plus one extra element `x > a(k-1)`. A candidate `A ∪ {x}`
//! is emitted only when `x` was found for every skip position, i.e. all of its
//! k-subsets other than `A` are combined itemsets. A skip pass that confirms no
//! `x` ends the work for `A`.
//!
//! Since a candidate is only ever produced while processing its own first k
//! items as `A`, and the `x` values found in one pass are distinct, the join
//! never yields the same candidate twice.

use crate::types::{ItemId, Itemset};
use std::cmp::Ordering;

/// Compare the first `target.len()` items of `itemset` with `target`
fn compare_prefix(itemset: &[ItemId], target: &[ItemId]) -> Ordering {
    itemset[..target.len()].cmp(target)
}

/// Locate the first itemset at or after `start` whose prefix equals `target`
///
/// `sorted` must be sorted lexicographically and every element must be at
/// least as long as `target`.
///
/// # Returns
///
/// The position of the leftmost match, or `None` when no itemset in
/// `sorted[start..]` starts with `target`.
pub fn find_position(sorted: &[Itemset], target: &[ItemId], start: usize) -> Option<usize> {
    let window = sorted.get(start..)?;
    let offset =
        window.partition_point(|itemset| compare_prefix(itemset.items(), target) == Ordering::Less);

    window
        .get(offset)
        .filter(|itemset| compare_prefix(itemset.items(), target) == Ordering::Equal)
        .map(|_| start + offset)
}

/// Merge two equal-length itemsets that differ in exactly one element of `one`
///
/// Walks both sequences in step. The first element of `one` missing from `two`
/// is kept and skipped over; the last element of `two` becomes the new last
/// element.
///
/// # Returns
///
/// The skipped position of `one` and the merged itemset of length k+1, or
/// `None` when the two itemsets do not join that way.
pub fn merge_itemsets(one: &Itemset, two: &Itemset) -> Option<(usize, Itemset)> {
    let (left, right) = (one.items(), two.items());
    debug_assert_eq!(left.len(), right.len(), "joined itemsets must share a length");

    let mut merged = Vec::with_capacity(left.len() + 1);
    let mut skipped = None;
    let mut j = 0;

    for (i, &item) in left.iter().enumerate() {
        if item == right[j] {
            j += 1;
        } else if item < right[j] && skipped.is_none() {
            skipped = Some(i);
        } else {
            return None;
        }
        merged.push(item);
    }

    // Identical itemsets do not join.
    let skipped = skipped?;
    merged.push(right[j]);
    Some((skipped, Itemset::from_sorted(merged)))
}

/// Generate the next level's candidates
///
/// # Arguments
///
/// * `qualifying` - Qualifying itemsets of length k, sorted
/// * `combined` - Combined itemsets of length k, sorted, a superset of `qualifying`
/// * `max_item_id` - Largest item id of the database
///
/// # Returns
///
/// Candidates of length k+1, sorted lexicographically.
pub fn generate_candidates(
    qualifying: &[Itemset],
    combined: &[Itemset],
    max_item_id: ItemId,
) -> Vec<Itemset> {
    let mut candidates = Vec::new();

    for (rank, one) in qualifying.iter().enumerate() {
        // `one` sits at or after `rank` in the combined list
        let start = rank + 1;

        if one.len() == 1 {
            let position =
                find_position(combined, one.items(), rank).map_or(start, |found| found + 1);
            candidates.extend(
                combined[position.min(combined.len())..]
                    .iter()
                    .filter_map(|two| merge_itemsets(one, two).map(|(_, merged)| merged)),
            );
            continue;
        }

        join_with_skips(one, start, combined, max_item_id, &mut candidates);
    }

    debug_assert!(
        candidates.windows(2).all(|pair| pair[0] < pair[1]),
        "join produced unsorted or duplicate candidates"
    );
    candidates
}

/// Join one qualifying itemset of length k > 1 against the combined list
fn join_with_skips(
    one: &Itemset,
    mut start: usize,
    combined: &[Itemset],
    max_item_id: ItemId,
    candidates: &mut Vec<Itemset>,
) {
    let k = one.len();
    let shift = one.last();
    // hits[x - shift]: number of skip passes that found extension x
    let mut hits = vec![0usize; max_item_id.saturating_sub(shift) as usize + 1];

    for skip in (0..k).rev() {
        let position = if skip == k - 1 {
            find_position(combined, one.items(), start).map_or(start, |found| found + 1)
        } else {
            match find_position(combined, &one.without(skip), start) {
                Some(found) => found,
                None => break,
            }
        };

        let mut confirmed = false;
        for (j, two) in combined.iter().enumerate().skip(position) {
            let merged = match merge_itemsets(one, two) {
                Some((skipped, merged)) if skipped == skip => merged,
                _ => {
                    start = j;
                    break;
                }
            };

            let slot = (merged.last() - shift) as usize;
            if skip != 0 {
                hits[slot] += 1;
                if hits[slot] == k - skip {
                    confirmed = true;
                }
            } else if hits[slot] + 1 == k {
                candidates.push(merged);
            }
        }

        if !confirmed {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sets(raw: &[&[ItemId]]) -> Vec<Itemset> {
        raw.iter()
            .map(|items| Itemset::new(items.to_vec()).unwrap())
            .collect()
    }

    #[rstest]
    #[case::exact(&[1, 3], 0, Some(1))]
    #[case::prefix(&[2], 0, Some(3))]
    #[case::respects_start(&[1, 2], 1, None)]
    #[case::missing(&[1, 4], 0, None)]
    #[case::start_past_end(&[1, 2], 9, None)]
    fn test_find_position(
        #[case] target: &[ItemId],
        #[case] start: usize,
        #[case] expected: Option<usize>,
    ) {
        let sorted = sets(&[&[1, 2], &[1, 3], &[1, 5], &[2, 3], &[2, 4]]);
        assert_eq!(find_position(&sorted, target, start), expected);
    }

    #[test]
    fn test_find_position_leftmost_of_equal_prefixes() {
        let sorted = sets(&[&[1, 2], &[2, 3], &[2, 4], &[2, 5], &[3, 4]]);
        assert_eq!(find_position(&sorted, &[2], 0), Some(1));
        assert_eq!(find_position(&sorted, &[2], 2), Some(2));
    }

    #[rstest]
    #[case::suffix(&[1, 2], &[1, 3], Some((1, vec![1, 2, 3])))]
    #[case::interior(&[1, 2, 4], &[1, 4, 6], Some((1, vec![1, 2, 4, 6])))]
    #[case::head(&[1, 2], &[2, 3], Some((0, vec![1, 2, 3])))]
    #[case::identical(&[1, 2], &[1, 2], None)]
    #[case::two_differences(&[1, 2], &[3, 4], None)]
    #[case::other_ahead(&[1, 3], &[2, 3], None)]
    fn test_merge_itemsets(
        #[case] one: &[ItemId],
        #[case] two: &[ItemId],
        #[case] expected: Option<(usize, Vec<ItemId>)>,
    ) {
        let one = Itemset::new(one.to_vec()).unwrap();
        let two = Itemset::new(two.to_vec()).unwrap();
        let result = merge_itemsets(&one, &two).map(|(skip, merged)| (skip, merged.items().to_vec()));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_singletons_join_pairwise() {
        let level = sets(&[&[1], &[2], &[3]]);
        let candidates = generate_candidates(&level, &level, 3);
        assert_eq!(candidates, sets(&[&[1, 2], &[1, 3], &[2, 3]]));
    }

    #[test]
    fn test_singleton_qualifying_subset_of_combined() {
        let qualifying = sets(&[&[2]]);
        let combined = sets(&[&[1], &[2], &[3], &[4]]);
        let candidates = generate_candidates(&qualifying, &combined, 4);
        assert_eq!(candidates, sets(&[&[2, 3], &[2, 4]]));
    }

    #[test]
    fn test_pair_join_requires_every_subset() {
        // {1,2,3} has all subsets combined; {1,2,4} lacks {2,4}
        let combined = sets(&[&[1, 2], &[1, 3], &[1, 4], &[2, 3]]);
        let qualifying = sets(&[&[1, 2]]);
        let candidates = generate_candidates(&qualifying, &combined, 4);
        assert_eq!(candidates, sets(&[&[1, 2, 3]]));
    }

    #[test]
    fn test_triple_join_uses_interior_skips() {
        let combined = sets(&[
            &[1, 2, 3],
            &[1, 2, 4],
            &[1, 3, 4],
            &[2, 3, 4],
        ]);
        let qualifying = sets(&[&[1, 2, 3]]);
        let candidates = generate_candidates(&qualifying, &combined, 4);
        assert_eq!(candidates, sets(&[&[1, 2, 3, 4]]));
    }

    #[test]
    fn test_triple_join_missing_interior_subset() {
        // {1,3,4} missing: skip position 1 finds nothing
        let combined = sets(&[&[1, 2, 3], &[1, 2, 4], &[2, 3, 4]]);
        let qualifying = sets(&[&[1, 2, 3]]);
        assert!(generate_candidates(&qualifying, &combined, 4).is_empty());
    }

    #[test]
    fn test_no_partner_yields_nothing() {
        let combined = sets(&[&[1, 2], &[3, 4]]);
        let qualifying = combined.clone();
        assert!(generate_candidates(&qualifying, &combined, 4).is_empty());
    }

    #[test]
    fn test_empty_qualifying_yields_nothing() {
        let combined = sets(&[&[1], &[2]]);
        assert!(generate_candidates(&[], &combined, 2).is_empty());
    }

    #[test]
    fn test_candidates_are_ascending_and_unique() {
        let level = sets(&[&[1, 2], &[1, 3], &[1, 4], &[2, 3], &[2, 4], &[3, 4]]);
        let candidates = generate_candidates(&level, &level, 4);

        assert_eq!(
            candidates,
            sets(&[&[1, 2, 3], &[1, 2, 4], &[1, 3, 4], &[2, 3, 4]])
        );
        for candidate in &candidates {
            assert_eq!(candidate.len(), 3);
            assert!(candidate.items().windows(2).all(|p| p[0] < p[1]));
        }
    }
}
