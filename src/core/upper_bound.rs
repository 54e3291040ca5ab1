//! Average-utility upper bounds of a matched itemset
//!
//! After an itemset completes a match in a record, the record is profiled for
//! the items that could still extend it: reserved items that are not already
//! members. The bound assumes the best case, where every such item carries the
//! largest utility seen among them.
//!
//! Two variants are tracked per candidate:
//! - **global**: every extendable item of the record counts
//! - **lead**: only extendable items positioned after the match count

use crate::types::{ItemId, ItemUtility, Itemset, Utility};
use std::collections::HashSet;

/// Extendable items of one record relative to one matched itemset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionProfile {
    /// Largest utility among all extendable items
    pub max_any: Utility,
    pub count_any: usize,
    /// Largest utility among extendable items after the match
    pub max_follow: Utility,
    pub count_follow: usize,
}

impl ExtensionProfile {
    /// Profile `items` for extensions of `itemset`
    ///
    /// # Arguments
    ///
    /// * `itemset` - The itemset that just completed a match
    /// * `items` - The record's item occurrences, ascending by item id
    /// * `follow_from` - Position in `items` right after the completing item
    /// * `reserved` - Items that survived the previous level's pruning
    /// * `max_key` - Largest item id of the level; larger items are ignored
    pub fn collect(
        itemset: &Itemset,
        items: &[ItemUtility],
        follow_from: usize,
        reserved: &HashSet<ItemId>,
        max_key: ItemId,
    ) -> Self {
        let mut profile = ExtensionProfile::default();

        for (position, entry) in items.iter().enumerate() {
            if entry.item > max_key {
                break;
            }
            if itemset.contains(entry.item) || !reserved.contains(&entry.item) {
                continue;
            }

            profile.count_any += 1;
            profile.max_any = profile.max_any.max(entry.utility);
            if position >= follow_from {
                profile.count_follow += 1;
                profile.max_follow = profile.max_follow.max(entry.utility);
            }
        }

        profile
    }

    /// Contribution to the global bound of a match with utility `utility`
    pub fn global_contribution(&self, utility: Utility, length: usize) -> f64 {
        extension_bound(utility, length, self.max_any, self.count_any)
    }

    /// Contribution to the lead bound of a match with utility `utility`
    pub fn lead_contribution(&self, utility: Utility, length: usize) -> f64 {
        extension_bound(utility, length, self.max_follow, self.count_follow)
    }
}

/// Best average utility reachable by extending a match
///
/// If the match's own average already reaches `max`, adding more than one
/// item can only lower the average, so one extension is assumed. Otherwise
/// every extension is assumed to contribute `max`.
pub fn extension_bound(utility: Utility, length: usize, max: Utility, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }

    let utility = utility as f64;
    let length = length as f64;
    let max = max as f64;

    if utility / length >= max {
        (utility + max) / (length + 1.0)
    } else {
        let count = count as f64;
        (utility + count * max) / (length + count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entries(raw: &[(ItemId, Utility)]) -> Vec<ItemUtility> {
        raw.iter()
            .map(|&(item, utility)| ItemUtility::new(item, utility))
            .collect()
    }

    #[rstest]
    #[case::no_extension(10, 2, 7, 0, 0.0)]
    #[case::average_above_max(10, 2, 4, 3, 14.0 / 3.0)]
    #[case::average_equals_max(8, 2, 4, 2, 12.0 / 3.0)]
    #[case::average_below_max(4, 2, 6, 2, 16.0 / 4.0)]
    fn test_extension_bound(
        #[case] utility: Utility,
        #[case] length: usize,
        #[case] max: Utility,
        #[case] count: usize,
        #[case] expected: f64,
    ) {
        assert!((extension_bound(utility, length, max, count) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_profile_splits_any_and_follow() {
        // match {2,4} completes at position 2 (item 4)
        let itemset = Itemset::new(vec![2, 4]).unwrap();
        let items = entries(&[(1, 9), (2, 1), (4, 1), (5, 3), (7, 6)]);
        let reserved: HashSet<ItemId> = [1, 2, 4, 5, 7].into_iter().collect();

        let profile = ExtensionProfile::collect(&itemset, &items, 3, &reserved, 7);

        assert_eq!(
            profile,
            ExtensionProfile {
                max_any: 9,
                count_any: 3,
                max_follow: 6,
                count_follow: 2,
            }
        );
    }

    #[test]
    fn test_profile_skips_unreserved_and_large_items() {
        let itemset = Itemset::new(vec![1]).unwrap();
        let items = entries(&[(1, 2), (3, 8), (4, 2), (9, 50)]);
        let reserved: HashSet<ItemId> = [1, 4, 9].into_iter().collect();

        let profile = ExtensionProfile::collect(&itemset, &items, 1, &reserved, 5);

        assert_eq!(profile.count_any, 1);
        assert_eq!(profile.max_any, 2);
        assert_eq!(profile.count_follow, 1);
    }

    #[test]
    fn test_lead_bound_never_exceeds_global() {
        let itemset = Itemset::new(vec![3]).unwrap();
        let items = entries(&[(1, 10), (3, 2), (6, 4)]);
        let reserved: HashSet<ItemId> = [1, 3, 6].into_iter().collect();

        let profile = ExtensionProfile::collect(&itemset, &items, 2, &reserved, 6);

        // global: (2 + 2*10) / 3, lead: (2 + 4) / 2
        assert!((profile.global_contribution(2, 1) - 22.0 / 3.0).abs() < 1e-12);
        assert!((profile.lead_contribution(2, 1) - 3.0).abs() < 1e-12);
        assert!(profile.lead_contribution(2, 1) <= profile.global_contribution(2, 1));
    }
}
