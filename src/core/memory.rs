//! Memory high-water estimate of the level working set
//!
//! The estimate counts the heap held by one level: the candidates with their
//! itemsets, the fan-out index, the combined list and the active-record index.
//! It is reported, never enforced.

use super::candidate::{Candidate, CandidateIndex};
use crate::types::{ItemId, Itemset, Utility};
use std::mem::size_of;

/// Running peak of the estimated working-set size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryTracker {
    peak_bytes: usize,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the footprint of the current level
    pub fn observe(&mut self, bytes: usize) {
        self.peak_bytes = self.peak_bytes.max(bytes);
    }

    pub fn peak_usage(&self) -> usize {
        self.peak_bytes
    }
}

/// Footprint of the level-1 per-item tables (utility, bound, presence) and
/// the first level's working sets
pub fn estimate_first_level_size(slots: usize, qualifying: &[Itemset], active_records: usize) -> usize {
    slots * (2 * size_of::<Utility>() + size_of::<bool>())
        + 2 * estimate_itemset_storage_size(qualifying)
        + active_records * size_of::<usize>()
}

pub fn estimate_itemset_storage_size(itemsets: &[Itemset]) -> usize {
    itemsets
        .iter()
        .map(|itemset| size_of::<Itemset>() + itemset.len() * size_of::<ItemId>())
        .sum()
}

pub fn estimate_candidate_size(candidates: &[Candidate]) -> usize {
    candidates
        .iter()
        .map(|candidate| size_of::<Candidate>() + candidate.itemset.len() * size_of::<ItemId>())
        .sum()
}

pub fn estimate_index_size(index: &CandidateIndex) -> usize {
    index.slots() * size_of::<Vec<usize>>() + index.registrations() * size_of::<usize>()
}

/// Footprint of one level: candidates, fan-out index, combined list, active records
pub fn estimate_level_size(
    candidates: &[Candidate],
    index: &CandidateIndex,
    combined: &[Itemset],
    active_records: usize,
) -> usize {
    estimate_candidate_size(candidates)
        + estimate_index_size(index)
        + estimate_itemset_storage_size(combined)
        + active_records * size_of::<usize>()
}
