//! HAUI mining engine
//!
//! This module provides the HauiMiner that orchestrates a mining run by
//! coordinating the TransactionStore with the level state machine.
//!
//! A run:
//! - restores every loaded record to the active index
//! - evaluates length-1 itemsets from per-item aggregates
//! - advances level by level until no itemset qualifies for a join
//!
//! Results are rebuilt from scratch on every run, so running twice over the
//! same data gives the same mappings.

use crate::core::level::{advance, seed_first_level};
use crate::core::memory::MemoryTracker;
use crate::core::rescan::{rescan, RescanEntry, RescanOutcome};
use crate::core::results::{MiningResults, ResultMap, RunStats};
use crate::core::transaction_store::TransactionStore;
use crate::types::{
    ItemId, MinerConfig, MiningError, Thresholds, TransactionRecord, UpperBoundMode, Utility,
};
use tracing::{debug, info};

/// High average-utility itemset miner
///
/// Owns the loaded records, the thresholds derived from them and the results
/// of the latest run.
pub struct HauiMiner {
    config: MinerConfig,
    store: TransactionStore,
    thresholds: Thresholds,
    results: MiningResults,
    stats: RunStats,
}

impl HauiMiner {
    /// Create a new HauiMiner with no data loaded
    ///
    /// # Arguments
    ///
    /// * `config` - Validated thresholds and upper-bound mode
    pub fn new(config: MinerConfig) -> Self {
        HauiMiner {
            thresholds: config.thresholds.derive(0),
            config,
            store: TransactionStore::new(),
            results: MiningResults::new(),
            stats: RunStats::default(),
        }
    }

    /// Replace the loaded data with a single batch
    ///
    /// Thresholds are re-derived from the batch's total utility; results of a
    /// previous run are discarded.
    pub fn load(&mut self, batch: Vec<TransactionRecord>) {
        self.install(TransactionStore::from_batch(batch));
    }

    /// Replace the loaded data with the concatenation of several batches
    pub fn load_batches<I>(&mut self, batches: I)
    where
        I: IntoIterator<Item = Vec<TransactionRecord>>,
    {
        self.install(TransactionStore::from_batches(batches));
    }

    fn install(&mut self, store: TransactionStore) {
        self.store = store;
        self.thresholds = self.config.thresholds.derive(self.store.total_utility());
        self.results.clear();
        self.stats = RunStats::default();
    }

    /// Swap the configuration, re-deriving thresholds for the loaded data
    pub fn reconfigure(&mut self, config: MinerConfig) {
        self.config = config;
        self.thresholds = config.thresholds.derive(self.store.total_utility());
    }

    /// Mine the loaded data
    ///
    /// An empty store or a zero minimal-utility fraction yields empty
    /// mappings.
    ///
    /// # Returns
    ///
    /// Statistics of the run
    pub fn run(&mut self) -> RunStats {
        self.results.clear();
        self.stats = RunStats::default();
        self.store.reset_active();

        if self.store.is_empty() || self.config.thresholds.min_utility() == 0.0 {
            debug!(
                transactions = self.store.num_transactions(),
                "Nothing to mine, skipping run"
            );
            return self.stats;
        }

        info!(
            transactions = self.store.num_transactions(),
            total_utility = self.store.total_utility(),
            max_item_id = self.store.max_item_id(),
            min_sup_count = self.thresholds.min_sup_count,
            pre_large_count = ?self.thresholds.pre_large_count,
            bound_mode = ?self.config.bound_mode,
            "Starting mining run"
        );

        let mut memory = MemoryTracker::new();
        let first = seed_first_level(
            &self.store,
            &self.thresholds,
            &mut self.results,
            &mut memory,
        );
        let mut state = first.next;
        let mut candidate_count = first.candidate_count;
        let mut levels = 1;

        while !state.is_terminal() {
            let outcome = advance(
                &state,
                &mut self.store,
                &self.thresholds,
                self.config.bound_mode,
                &mut self.results,
                &mut memory,
            );
            if outcome.candidate_count > 0 {
                levels += 1;
            }
            candidate_count += outcome.candidate_count;
            state = outcome.next;
        }

        self.stats = RunStats {
            total_candidate_count: candidate_count,
            levels,
            peak_memory_bytes: memory.peak_usage(),
        };

        info!(
            high = self.results.high.len(),
            pre_large = self.results.pre_large.len(),
            candidates = self.stats.total_candidate_count,
            levels = self.stats.levels,
            peak_memory_bytes = self.stats.peak_memory_bytes,
            "Mining run finished"
        );

        self.stats
    }

    /// Add the utility the given itemsets collect in the loaded data
    ///
    /// # Arguments
    ///
    /// * `stale_high` - Previously high itemsets with their running averages
    /// * `stale_pre_large` - Previously pre-large itemsets with their running averages
    ///
    /// # Errors
    ///
    /// Returns `InvalidItemsetKey` if a key cannot be decoded.
    pub fn rescan(
        &self,
        stale_high: Vec<RescanEntry>,
        stale_pre_large: Vec<RescanEntry>,
    ) -> Result<RescanOutcome, MiningError> {
        rescan(self.store.records(), stale_high, stale_pre_large)
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    pub fn bound_mode(&self) -> UpperBoundMode {
        self.config.bound_mode
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn total_utility(&self) -> Utility {
        self.store.total_utility()
    }

    pub fn num_transactions(&self) -> usize {
        self.store.num_transactions()
    }

    pub fn max_item_id(&self) -> ItemId {
        self.store.max_item_id()
    }

    pub fn min_sup_count(&self) -> f64 {
        self.thresholds.min_sup_count
    }

    pub fn pre_large_count(&self) -> Option<f64> {
        self.thresholds.pre_large_count
    }

    pub fn total_candidate_count(&self) -> usize {
        self.stats.total_candidate_count
    }

    pub fn peak_memory_bytes(&self) -> usize {
        self.stats.peak_memory_bytes
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn results(&self) -> &MiningResults {
        &self.results
    }

    /// Take the results of the latest run, leaving empty mappings behind
    pub fn take_results(&mut self) -> MiningResults {
        std::mem::take(&mut self.results)
    }

    pub fn high_utility_itemsets(&self) -> &ResultMap {
        &self.results.high
    }

    pub fn pre_large_itemsets(&self) -> &ResultMap {
        &self.results.pre_large
    }
}
