//! Transaction-related types for the HAUI miner
//!
//! This module defines item identifiers, utilities and the parsed transaction
//! record consumed by the mining engine.

use super::error::MiningError;

/// Item identifier
///
/// Item ids are positive; zero is rejected when a record is built.
pub type ItemId = u32;

/// Utility value (quantity × unit profit, pre-multiplied by the data source)
pub type Utility = u64;

/// One occurrence of an item inside a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemUtility {
    /// The item id
    pub item: ItemId,
    /// Utility of the item in this transaction
    pub utility: Utility,
}

impl ItemUtility {
    pub fn new(item: ItemId, utility: Utility) -> Self {
        ItemUtility { item, utility }
    }
}

/// Parsed transaction record
///
/// Items are kept sorted ascending by item id. The transaction utility is
/// either supplied by the data source or computed as the sum of the item
/// utilities; the max item utility feeds the length-1 upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    items: Vec<ItemUtility>,
    transaction_utility: Utility,
    max_item_utility: Utility,
}

impl TransactionRecord {
    /// Build a record from (item, utility) pairs
    ///
    /// # Arguments
    ///
    /// * `items` - Item occurrences in any order
    /// * `transaction_utility` - Supplied transaction utility, or `None` to sum the items
    ///
    /// # Errors
    ///
    /// Returns an error if an item id is zero or an item appears twice.
    pub fn new(
        mut items: Vec<ItemUtility>,
        transaction_utility: Option<Utility>,
    ) -> Result<Self, MiningError> {
        items.sort_by_key(|entry| entry.item);

        if let Some(first) = items.first() {
            if first.item == 0 {
                return Err(MiningError::InvalidItemId { item: 0 });
            }
        }
        if let Some(pair) = items.windows(2).find(|pair| pair[0].item == pair[1].item) {
            return Err(MiningError::DuplicateItem { item: pair[0].item });
        }

        let max_item_utility = items.iter().map(|entry| entry.utility).max().unwrap_or(0);
        let transaction_utility = transaction_utility
            .unwrap_or_else(|| items.iter().map(|entry| entry.utility).sum());

        Ok(TransactionRecord {
            items,
            transaction_utility,
            max_item_utility,
        })
    }

    /// Item occurrences, ascending by item id
    pub fn items(&self) -> &[ItemUtility] {
        &self.items
    }

    pub fn transaction_utility(&self) -> Utility {
        self.transaction_utility
    }

    pub fn max_item_utility(&self) -> Utility {
        self.max_item_utility
    }

    /// Largest item id in the record (0 for an empty record)
    pub fn max_item_id(&self) -> ItemId {
        self.items.last().map_or(0, |entry| entry.item)
    }
}
