//! Level state machine
//!
//! A run is a sequence of levels. Level 1 is seeded directly from per-item
//! aggregates; every later level is produced by [`advance`], which joins the
//! current state into candidates, scans them and classifies the outcome.
//!
//! # State
//!
//! - `qualifying`: itemsets whose upper bound (lead or global, per
//!   [`UpperBoundMode`]) reached the threshold; they drive the next join
//! - `combined`: itemsets whose global bound reached the threshold; the next
//!   join looks subsets up here
//! - `reserved`: items of the combined itemsets; only they may extend a match
//!
//! The run ends once the qualifying set is empty.

use super::candidate::{Candidate, CandidateIndex};
use super::joiner::generate_candidates;
use super::memory::{estimate_first_level_size, estimate_level_size, MemoryTracker};
use super::results::MiningResults;
use super::scanner::scan;
use super::transaction_store::TransactionStore;
use crate::types::{ItemId, Itemset, Thresholds, UpperBoundMode, Utility};
use std::collections::HashSet;
use tracing::debug;

/// Working sets carried from one level to the next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelState {
    pub qualifying: Vec<Itemset>,
    pub combined: Vec<Itemset>,
    pub reserved: HashSet<ItemId>,
}

impl LevelState {
    /// Length of the itemsets held, 0 for the terminal state
    pub fn itemset_length(&self) -> usize {
        self.qualifying.first().map_or(0, Itemset::len)
    }

    pub fn is_terminal(&self) -> bool {
        self.qualifying.is_empty()
    }
}

/// Outcome of evaluating one level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelOutcome {
    pub next: LevelState,
    /// Candidates evaluated at this level
    pub candidate_count: usize,
}

/// Evaluate length-1 itemsets
///
/// Exact utilities of single items are classified into `results`. The
/// length-1 bound of an item is the sum, over the records containing it, of
/// the record's largest item utility.
pub fn seed_first_level(
    store: &TransactionStore,
    thresholds: &Thresholds,
    results: &mut MiningResults,
    memory: &mut MemoryTracker,
) -> LevelOutcome {
    let slots = store.max_item_id() as usize + 1;
    let mut utilities: Vec<Utility> = vec![0; slots];
    let mut bounds: Vec<Utility> = vec![0; slots];
    let mut seen = vec![false; slots];

    for record in store.records() {
        for entry in record.items() {
            utilities[entry.item as usize] += entry.utility;
            bounds[entry.item as usize] += record.max_item_utility();
            seen[entry.item as usize] = true;
        }
    }

    let mut next = LevelState::default();
    for item in 1..=store.max_item_id() {
        // ids absent from the data never form an itemset
        if !seen[item as usize] {
            continue;
        }
        let itemset = Itemset::singleton(item);
        results.record(&itemset, utilities[item as usize] as f64, thresholds);

        if bounds[item as usize] as f64 >= thresholds.threshold_count {
            next.reserved.insert(item);
            next.combined.push(itemset.clone());
            next.qualifying.push(itemset);
        }
    }

    memory.observe(estimate_first_level_size(
        slots,
        &next.qualifying,
        store.active().len(),
    ));

    let candidate_count = seen.iter().filter(|&&present| present).count();
    debug!(
        level = 1,
        candidates = candidate_count,
        qualifying = next.qualifying.len(),
        "Level evaluated"
    );

    LevelOutcome {
        next,
        candidate_count,
    }
}

/// Evaluate the level following `state`
///
/// Generates candidates one item longer than those in `state`, scans the
/// store's active records, stores classified itemsets in `results` and returns
/// the next state. Once the combined set is too small to support a join the
/// returned state is terminal.
pub fn advance(
    state: &LevelState,
    store: &mut TransactionStore,
    thresholds: &Thresholds,
    bound_mode: UpperBoundMode,
    results: &mut MiningResults,
    memory: &mut MemoryTracker,
) -> LevelOutcome {
    let length = state.itemset_length() + 1;
    if state.is_terminal() || state.combined.len() < length {
        return LevelOutcome {
            next: LevelState::default(),
            candidate_count: 0,
        };
    }

    let mut candidates: Vec<Candidate> =
        generate_candidates(&state.qualifying, &state.combined, store.max_item_id())
            .into_iter()
            .map(Candidate::new)
            .collect();
    let index = CandidateIndex::build(&candidates);

    let kept = scan(store, &mut candidates, &index, &state.reserved);
    memory.observe(estimate_level_size(
        &candidates,
        &index,
        &state.combined,
        store.active().len(),
    ));

    let mut next = LevelState::default();
    for candidate in candidates.iter() {
        results.record(&candidate.itemset, candidate.average_utility(), thresholds);

        let bound = match bound_mode {
            UpperBoundMode::Lead => candidate.lead_bound,
            UpperBoundMode::Global => candidate.global_bound,
        };
        if bound >= thresholds.threshold_count {
            next.qualifying.push(candidate.itemset.clone());
        }
        if candidate.global_bound >= thresholds.threshold_count {
            next.reserved.extend(candidate.itemset.items().iter().copied());
            next.combined.push(candidate.itemset.clone());
        }
    }

    debug!(
        level = length,
        candidates = candidates.len(),
        qualifying = next.qualifying.len(),
        combined = next.combined.len(),
        active_records = kept,
        "Level evaluated"
    );

    LevelOutcome {
        candidate_count: candidates.len(),
        next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemUtility, ThresholdConfig, TransactionRecord};

    fn store(raw: &[&[(ItemId, Utility)]]) -> TransactionStore {
        TransactionStore::from_batch(
            raw.iter()
                .map(|items| {
                    TransactionRecord::new(
                        items
                            .iter()
                            .map(|&(item, utility)| ItemUtility::new(item, utility))
                            .collect(),
                        None,
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    fn itemsets(raw: &[&[ItemId]]) -> Vec<Itemset> {
        raw.iter()
            .map(|items| Itemset::new(items.to_vec()).unwrap())
            .collect()
    }

    fn uniform_store() -> TransactionStore {
        store(&[
            &[(1, 4), (2, 4), (3, 4)],
            &[(1, 4), (2, 4), (3, 4)],
            &[(1, 1), (4, 1)],
        ])
    }

    #[test]
    fn test_seed_first_level_uses_max_item_utility_bound() {
        let store = store(&[&[(1, 5), (2, 3)], &[(1, 2), (3, 6)], &[(2, 4), (3, 1)]]);
        let thresholds = ThresholdConfig::new(0.5, None).unwrap().derive(21);
        let mut results = MiningResults::new();
        let mut memory = MemoryTracker::new();

        let outcome = seed_first_level(&store, &thresholds, &mut results, &mut memory);

        // bounds: {1} 5+6, {2} 5+4, {3} 6+4 against 10.5
        assert_eq!(outcome.next.qualifying, itemsets(&[&[1]]));
        assert_eq!(outcome.next.combined, itemsets(&[&[1]]));
        assert!(outcome.next.reserved.contains(&1));
        assert_eq!(outcome.candidate_count, 3);
        assert!(results.is_empty());
        assert!(memory.peak_usage() > 0);
    }

    #[test]
    fn test_advance_stops_when_combined_too_small() {
        let mut store = uniform_store();
        let thresholds = ThresholdConfig::new(0.3, None).unwrap().derive(26);
        let state = LevelState {
            qualifying: itemsets(&[&[1]]),
            combined: itemsets(&[&[1]]),
            reserved: [1].into_iter().collect(),
        };

        let outcome = advance(
            &state,
            &mut store,
            &thresholds,
            UpperBoundMode::Lead,
            &mut MiningResults::new(),
            &mut MemoryTracker::new(),
        );

        assert!(outcome.next.is_terminal());
        assert_eq!(outcome.candidate_count, 0);
    }

    #[test]
    fn test_lead_mode_narrows_qualifying_but_not_combined() {
        let mut store = uniform_store();
        let thresholds = ThresholdConfig::new(0.3, None).unwrap().derive(26);
        let mut results = MiningResults::new();
        let mut memory = MemoryTracker::new();

        let first = seed_first_level(&store, &thresholds, &mut results, &mut MemoryTracker::new());
        assert_eq!(first.next.qualifying, itemsets(&[&[1], &[2], &[3]]));

        let second = advance(
            &first.next,
            &mut store,
            &thresholds,
            UpperBoundMode::Lead,
            &mut results,
            &mut memory,
        );

        assert_eq!(second.candidate_count, 3);
        assert_eq!(second.next.qualifying, itemsets(&[&[1, 2]]));
        assert_eq!(second.next.combined, itemsets(&[&[1, 2], &[1, 3], &[2, 3]]));
        assert_eq!(store.active(), &[0, 1]);
        assert!(memory.peak_usage() > 0);

        let third = advance(
            &second.next,
            &mut store,
            &thresholds,
            UpperBoundMode::Lead,
            &mut results,
            &mut memory,
        );
        assert_eq!(third.candidate_count, 1);
        assert!(third.next.is_terminal());
        assert_eq!(results.high.len(), 7);
    }

    #[test]
    fn test_global_mode_qualifies_every_combined_itemset() {
        let mut store = uniform_store();
        let thresholds = ThresholdConfig::new(0.3, None).unwrap().derive(26);
        let mut results = MiningResults::new();

        let first = seed_first_level(&store, &thresholds, &mut results, &mut MemoryTracker::new());
        let second = advance(
            &first.next,
            &mut store,
            &thresholds,
            UpperBoundMode::Global,
            &mut results,
            &mut MemoryTracker::new(),
        );

        assert_eq!(second.next.qualifying, second.next.combined);
    }
}
