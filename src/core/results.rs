//! Result mappings and run statistics

use crate::types::{Itemset, ItemsetKey, Thresholds, UtilityClass};
use std::collections::BTreeMap;

/// Itemset key → average utility
pub type ResultMap = BTreeMap<ItemsetKey, f64>;

/// High and pre-large itemsets found by one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiningResults {
    pub high: ResultMap,
    pub pre_large: ResultMap,
}

impl MiningResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify an itemset's exact average utility and store it
    ///
    /// # Returns
    ///
    /// The class the itemset was stored under, `None` when it qualified for
    /// neither mapping.
    pub fn record(
        &mut self,
        itemset: &Itemset,
        average_utility: f64,
        thresholds: &Thresholds,
    ) -> Option<UtilityClass> {
        let class = thresholds.classify(average_utility)?;
        let target = match class {
            UtilityClass::High => &mut self.high,
            UtilityClass::PreLarge => &mut self.pre_large,
        };
        let previous = target.insert(itemset.key(), average_utility);
        debug_assert!(previous.is_none(), "itemset {} recorded twice", itemset);
        Some(class)
    }

    pub fn clear(&mut self) {
        self.high.clear();
        self.pre_large.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.pre_large.is_empty()
    }
}

/// Statistics of the most recent run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of candidates evaluated, length-1 candidates included
    pub total_candidate_count: usize,
    /// Number of levels evaluated, level 1 included
    pub levels: usize,
    /// Estimated peak size of the level working set in bytes
    pub peak_memory_bytes: usize,
}
