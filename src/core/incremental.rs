//! Incremental maintenance across transaction batches
//!
//! Batches arrive one at a time. Mining every batch against the merge of all
//! previous ones is expensive, so the driver keeps a utility budget derived
//! from the gap between the minimal and the pre-large thresholds. While new
//! batches fit in that budget, an itemset that was neither high nor pre-large
//! so far cannot have become high, and the known mappings can be updated from
//! the batch alone:
//!
//! - itemsets the batch run also found get the batch's value added
//! - itemsets the batch run did not find are rescanned against the batch
//! - every updated value is re-classified against the cumulative thresholds
//!
//! Once a batch exhausts the budget, everything seen so far is mined again in
//! one run and the budget is reset.

use super::engine::HauiMiner;
use super::rescan::RescanEntry;
use super::results::{MiningResults, ResultMap};
use crate::types::{
    ItemsetKey, MinerConfig, MiningError, Thresholds, TransactionRecord, UtilityClass, Utility,
};
use tracing::{debug, info};

/// How a batch was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    /// Every batch seen so far was mined again
    Full,
    /// The known mappings were updated from the batch alone
    Incremental,
}

/// Report of one absorbed batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOutcome {
    pub mode: BatchMode,
    pub transactions: usize,
    pub batch_utility: Utility,
    /// Candidates evaluated by the run over this batch (or the merge)
    pub candidates: usize,
    /// Itemsets sent to the rescan
    pub rescanned: usize,
}

/// Multi-batch driver on top of [`HauiMiner`]
pub struct IncrementalMiner {
    miner: HauiMiner,
    batches: Vec<Vec<TransactionRecord>>,
    cumulative_utility: Utility,
    remaining_budget: Utility,
    results: MiningResults,
    total_rescanned: usize,
    peak_memory_bytes: usize,
}

impl IncrementalMiner {
    pub fn new(config: MinerConfig) -> Self {
        IncrementalMiner {
            miner: HauiMiner::new(config),
            batches: Vec::new(),
            cumulative_utility: 0,
            remaining_budget: 0,
            results: MiningResults::new(),
            total_rescanned: 0,
            peak_memory_bytes: 0,
        }
    }

    /// Absorb the next batch
    ///
    /// # Errors
    ///
    /// Returns `PreLargeRequired` for a second or later batch when no
    /// pre-large threshold is configured, and `InvalidItemsetKey` if a kept
    /// key fails to decode during the rescan.
    pub fn absorb(&mut self, batch: Vec<TransactionRecord>) -> Result<BatchOutcome, MiningError> {
        if !self.batches.is_empty() && self.miner.config().thresholds.pre_large().is_none() {
            return Err(MiningError::PreLargeRequired {
                batches: self.batches.len() + 1,
            });
        }

        self.batches.push(batch.clone());
        self.miner.load(batch);
        let transactions = self.miner.num_transactions();
        let batch_utility = self.miner.total_utility();
        self.cumulative_utility += batch_utility;

        let outcome = if batch_utility >= self.remaining_budget {
            self.mine_everything(transactions, batch_utility)
        } else {
            self.fold_batch(transactions, batch_utility)?
        };

        self.peak_memory_bytes = self.peak_memory_bytes.max(self.miner.peak_memory_bytes());
        info!(
            batch = self.batches.len(),
            mode = ?outcome.mode,
            transactions = outcome.transactions,
            batch_utility = outcome.batch_utility,
            candidates = outcome.candidates,
            rescanned = outcome.rescanned,
            high = self.results.high.len(),
            pre_large = self.results.pre_large.len(),
            "Batch absorbed"
        );

        Ok(outcome)
    }

    fn mine_everything(&mut self, transactions: usize, batch_utility: Utility) -> BatchOutcome {
        if self.batches.len() > 1 {
            debug!(batches = self.batches.len(), "Budget exhausted, mining merged batches");
            self.miner.load_batches(self.batches.iter().cloned());
        }
        self.miner.run();
        self.results = self.miner.take_results();
        self.remaining_budget = self.rescan_budget();

        BatchOutcome {
            mode: BatchMode::Full,
            transactions,
            batch_utility,
            candidates: self.miner.total_candidate_count(),
            rescanned: 0,
        }
    }

    fn fold_batch(
        &mut self,
        transactions: usize,
        batch_utility: Utility,
    ) -> Result<BatchOutcome, MiningError> {
        self.miner.run();
        let found = self.miner.take_results();
        let thresholds = self.cumulative_thresholds();

        let previous = std::mem::take(&mut self.results);
        let mut stale_high = Vec::new();
        let mut stale_pre_large = Vec::new();

        for (key, value) in previous.high {
            match batch_value(&found, &key) {
                Some(added) => place(&mut self.results, &thresholds, key, value + added),
                None => stale_high.push(RescanEntry::new(key, value)),
            }
        }
        for (key, value) in previous.pre_large {
            match batch_value(&found, &key) {
                Some(added) => place(&mut self.results, &thresholds, key, value + added),
                None => stale_pre_large.push(RescanEntry::new(key, value)),
            }
        }

        let rescanned = self.miner.rescan(stale_high, stale_pre_large)?;
        let count = rescanned.len();
        for entry in rescanned.high.into_iter().chain(rescanned.pre_large) {
            place(&mut self.results, &thresholds, entry.key, entry.average_utility);
        }

        self.total_rescanned += count;
        self.remaining_budget -= batch_utility;

        Ok(BatchOutcome {
            mode: BatchMode::Incremental,
            transactions,
            batch_utility,
            candidates: self.miner.total_candidate_count(),
            rescanned: count,
        })
    }

    /// Utility new batches may add before a full re-run is due
    ///
    /// An itemset left untracked by the last full run averaged below
    /// `pre_large × T` there. Folding batches of total utility `Σt` raises
    /// it to less than `pre_large × T + Σt`, which stays under the new
    /// `min_utility × (T + Σt)` while `Σt × (1 − min_utility) ≤
    /// (min_utility − pre_large) × T`.
    fn rescan_budget(&self) -> Utility {
        let thresholds = self.miner.config().thresholds;
        let Some(pre_large) = thresholds.pre_large() else {
            return 0;
        };
        let gap = thresholds.min_utility() - pre_large;
        let headroom = 1.0 - thresholds.min_utility();

        if gap <= 0.0 {
            0
        } else if headroom <= 0.0 {
            // an untracked itemset never reaches the whole cumulative utility
            Utility::MAX
        } else {
            (gap * self.cumulative_utility as f64 / headroom).floor() as Utility
        }
    }

    fn cumulative_thresholds(&self) -> Thresholds {
        self.miner
            .config()
            .thresholds
            .derive(self.cumulative_utility)
    }

    pub fn results(&self) -> &MiningResults {
        &self.results
    }

    pub fn high_utility_itemsets(&self) -> &ResultMap {
        &self.results.high
    }

    pub fn pre_large_itemsets(&self) -> &ResultMap {
        &self.results.pre_large
    }

    pub fn cumulative_utility(&self) -> Utility {
        self.cumulative_utility
    }

    pub fn remaining_budget(&self) -> Utility {
        self.remaining_budget
    }

    pub fn batches_seen(&self) -> usize {
        self.batches.len()
    }

    pub fn total_rescanned(&self) -> usize {
        self.total_rescanned
    }

    pub fn peak_memory_bytes(&self) -> usize {
        self.peak_memory_bytes
    }

    pub fn min_sup_count(&self) -> f64 {
        self.cumulative_thresholds().min_sup_count
    }
}

/// Value the batch run found for `key`, high or pre-large
fn batch_value(found: &MiningResults, key: &ItemsetKey) -> Option<f64> {
    found
        .high
        .get(key)
        .or_else(|| found.pre_large.get(key))
        .copied()
}

/// Store an updated value under its class, dropping it when it has none
fn place(results: &mut MiningResults, thresholds: &Thresholds, key: ItemsetKey, value: f64) {
    match thresholds.classify(value) {
        Some(UtilityClass::High) => {
            results.high.insert(key, value);
        }
        Some(UtilityClass::PreLarge) => {
            results.pre_large.insert(key, value);
        }
        None => {}
    }
}
