//! Utility scanner
//!
//! One pass over the active records evaluates every candidate of a level at
//! once. Each record item is fanned out to the candidates containing it
//! through the [`CandidateIndex`]; completed matches add their exact utility
//! and both upper-bound contributions to the candidate.
//!
//! Records in which no candidate completed a match cannot support any
//! superset either, so they are dropped from the store's active index.

use super::candidate::{Candidate, CandidateIndex};
use super::transaction_store::TransactionStore;
use super::upper_bound::ExtensionProfile;
use crate::types::ItemId;
use std::collections::HashSet;

/// Scan the active records for one level's candidates
///
/// # Arguments
///
/// * `store` - Loaded records; its active index is pruned in place
/// * `candidates` - The level's candidates, accumulators updated in place
/// * `index` - Fan-out index built over `candidates`
/// * `reserved` - Items that survived the previous level's pruning
///
/// # Returns
///
/// The number of records that stay active.
pub fn scan(
    store: &mut TransactionStore,
    candidates: &mut [Candidate],
    index: &CandidateIndex,
    reserved: &HashSet<ItemId>,
) -> usize {
    let max_key = index.max_key();
    let mut still_active = Vec::with_capacity(store.active().len());

    for &record_id in store.active() {
        let items = store.records()[record_id].items();
        let mut used = false;

        for (position, &entry) in items.iter().enumerate() {
            if entry.item > max_key {
                break;
            }

            for &slot in index.listeners(entry.item) {
                let candidate = &mut candidates[slot];
                let Some(utility) = candidate.state.observe(&candidate.itemset, record_id, entry)
                else {
                    continue;
                };

                used = true;
                let length = candidate.itemset.len();
                candidate.total_utility += utility;

                let profile = ExtensionProfile::collect(
                    &candidate.itemset,
                    items,
                    position + 1,
                    reserved,
                    max_key,
                );
                candidate.global_bound += profile.global_contribution(utility, length);
                candidate.lead_bound += profile.lead_contribution(utility, length);
            }
        }

        if used {
            still_active.push(record_id);
        }
    }

    let kept = still_active.len();
    store.retain_active(still_active);
    kept
}
