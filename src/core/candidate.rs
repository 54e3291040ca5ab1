//! Candidates, per-record match state and the per-item fan-out index
//!
//! A scan walks each record's items in ascending order. An itemset matches a
//! record when its items show up in order; [`MatchState`] tracks how far the
//! current record got and the utility collected so far.

use crate::types::{ItemId, ItemUtility, Itemset, Utility};

/// Progress of matching one itemset against one record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchState {
    /// Record the match is anchored to
    record: Option<usize>,
    /// Number of itemset items matched so far
    matched: usize,
    /// Utility of the matched items
    utility: Utility,
}

impl MatchState {
    /// Feed one item occurrence of `record`
    ///
    /// Seeing the itemset's first item (re)anchors the match to `record`.
    /// Seeing the next expected item of the anchored record advances it.
    ///
    /// # Returns
    ///
    /// The utility of the itemset in `record` when this item completes the match.
    pub fn observe(&mut self, itemset: &Itemset, record: usize, entry: ItemUtility) -> Option<Utility> {
        let items = itemset.items();

        if entry.item == items[0] {
            self.record = Some(record);
            self.matched = 1;
            self.utility = entry.utility;
        } else if self.record == Some(record)
            && self.matched < items.len()
            && items[self.matched] == entry.item
        {
            self.matched += 1;
            self.utility += entry.utility;
        } else {
            return None;
        }

        (self.matched == items.len()).then_some(self.utility)
    }
}

/// A length-(k+1) itemset under evaluation at one level
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub itemset: Itemset,
    /// Exact utility summed over every matching record
    pub total_utility: Utility,
    /// Average-utility upper bound using the best following item only
    pub lead_bound: f64,
    /// Average-utility upper bound using every reserved item of the record
    pub global_bound: f64,
    pub(crate) state: MatchState,
}

impl Candidate {
    pub fn new(itemset: Itemset) -> Self {
        Candidate {
            itemset,
            total_utility: 0,
            lead_bound: 0.0,
            global_bound: 0.0,
            state: MatchState::default(),
        }
    }

    pub fn average_utility(&self) -> f64 {
        self.total_utility as f64 / self.itemset.len() as f64
    }
}

/// Dense item id → candidate positions index
///
/// Sized to the largest item id among the level's candidates, so lookups are
/// a bounds check plus an index.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    listeners: Vec<Vec<usize>>,
}

impl CandidateIndex {
    /// Register every candidate under each of its items
    pub fn build(candidates: &[Candidate]) -> Self {
        let max_key = candidates
            .iter()
            .map(|candidate| candidate.itemset.last())
            .max()
            .unwrap_or(0);

        let mut listeners = vec![Vec::new(); max_key as usize + 1];
        for (position, candidate) in candidates.iter().enumerate() {
            for &item in candidate.itemset.items() {
                listeners[item as usize].push(position);
            }
        }

        CandidateIndex { listeners }
    }

    /// Positions of the candidates containing `item`
    pub fn listeners(&self, item: ItemId) -> &[usize] {
        self.listeners
            .get(item as usize)
            .map_or(&[], |positions| positions.as_slice())
    }

    /// Largest item id any candidate contains
    pub fn max_key(&self) -> ItemId {
        self.listeners.len().saturating_sub(1) as ItemId
    }

    /// Total number of (item, candidate) registrations
    pub fn registrations(&self) -> usize {
        self.listeners.iter().map(Vec::len).sum()
    }

    pub fn slots(&self) -> usize {
        self.listeners.len()
    }
}
