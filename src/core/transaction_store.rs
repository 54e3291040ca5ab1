//! Transaction storage for level-wise mining
//!
//! This module provides the TransactionStore component that holds the parsed
//! records of the loaded database together with its aggregates (total utility,
//! largest item id) and the active-record index.
//!
//! # Active Records
//!
//! Every scan reports which records completed a match for at least one live
//! candidate. Records that did not are dropped from the active index, so later
//! levels only walk data that can still matter. The index only ever shrinks
//! during a run and is restored by [`TransactionStore::reset_active`].
//!
//! # Batches
//!
//! Several batches can be merged into one store for the incremental mode;
//! records are concatenated in batch order and aggregates re-summed.

use crate::types::{ItemId, TransactionRecord, Utility};

/// Transaction store for one loaded database
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    /// Records in load order; a record's position is its id
    records: Vec<TransactionRecord>,
    /// Ids of records still relevant to the current run
    active: Vec<usize>,
    total_utility: Utility,
    max_item_id: ItemId,
}

impl TransactionStore {
    /// Create a new empty transaction store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single batch
    pub fn from_batch(batch: Vec<TransactionRecord>) -> Self {
        let mut store = Self::new();
        store.append(batch);
        store
    }

    /// Create a store holding the concatenation of several batches
    pub fn from_batches<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<TransactionRecord>>,
    {
        let mut store = Self::new();
        for batch in batches {
            store.append(batch);
        }
        store
    }

    /// Append a batch, updating aggregates and activating its records
    pub fn append(&mut self, batch: Vec<TransactionRecord>) {
        for record in batch {
            self.total_utility += record.transaction_utility();
            self.max_item_id = self.max_item_id.max(record.max_item_id());
            self.active.push(self.records.len());
            self.records.push(record);
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Ids of the records still active in the current run
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Replace the active index with the records a scan found relevant
    ///
    /// The new index must be a subset of the current one.
    pub fn retain_active(&mut self, still_active: Vec<usize>) {
        debug_assert!(still_active.len() <= self.active.len());
        self.active = still_active;
    }

    /// Mark every record active again before a fresh run
    pub fn reset_active(&mut self) {
        self.active.clear();
        self.active.extend(0..self.records.len());
    }

    pub fn total_utility(&self) -> Utility {
        self.total_utility
    }

    pub fn num_transactions(&self) -> usize {
        self.records.len()
    }

    pub fn max_item_id(&self) -> ItemId {
        self.max_item_id
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemUtility;

    fn record(raw: &[(ItemId, Utility)]) -> TransactionRecord {
        TransactionRecord::new(
            raw.iter()
                .map(|&(item, utility)| ItemUtility::new(item, utility))
                .collect(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_single_batch_aggregates() {
        let store = TransactionStore::from_batch(vec![
            record(&[(1, 5), (2, 3)]),
            record(&[(1, 2), (3, 6)]),
            record(&[(2, 4), (3, 1)]),
        ]);

        assert_eq!(store.num_transactions(), 3);
        assert_eq!(store.total_utility(), 21);
        assert_eq!(store.max_item_id(), 3);
        assert_eq!(store.active(), &[0, 1, 2]);
    }

    #[test]
    fn test_merge_batches_resums_aggregates() {
        let store = TransactionStore::from_batches(vec![
            vec![record(&[(1, 5)])],
            vec![record(&[(9, 1)]), record(&[(2, 2)])],
        ]);

        assert_eq!(store.num_transactions(), 3);
        assert_eq!(store.total_utility(), 8);
        assert_eq!(store.max_item_id(), 9);
        assert_eq!(store.records()[1].items()[0].item, 9);
    }

    #[test]
    fn test_retain_and_reset_active() {
        let mut store = TransactionStore::from_batch(vec![
            record(&[(1, 1)]),
            record(&[(2, 1)]),
            record(&[(3, 1)]),
        ]);

        store.retain_active(vec![0, 2]);
        assert_eq!(store.active(), &[0, 2]);

        store.reset_active();
        assert_eq!(store.active(), &[0, 1, 2]);
    }

    #[test]
    fn test_empty_store() {
        let store = TransactionStore::new();
        assert!(store.is_empty());
        assert_eq!(store.total_utility(), 0);
        assert_eq!(store.max_item_id(), 0);
        assert!(store.active().is_empty());
    }
}
