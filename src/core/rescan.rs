//! Incremental rescan of previously found itemsets
//!
//! Itemsets kept from earlier batches are matched against one new batch
//! without regenerating candidates. Each complete match adds its average
//! utility contribution `match_utility / n` to the entry's running value.
//!
//! The entries are taken by value and handed back updated, in the order they
//! were given.

use super::candidate::MatchState;
use crate::types::{ItemId, Itemset, ItemsetKey, MiningError, TransactionRecord};
use std::collections::HashMap;

/// An itemset key with its running average utility
#[derive(Debug, Clone, PartialEq)]
pub struct RescanEntry {
    pub key: ItemsetKey,
    pub average_utility: f64,
}

impl RescanEntry {
    pub fn new(key: ItemsetKey, average_utility: f64) -> Self {
        RescanEntry {
            key,
            average_utility,
        }
    }
}

/// Both entry lists after a rescan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RescanOutcome {
    pub high: Vec<RescanEntry>,
    pub pre_large: Vec<RescanEntry>,
}

impl RescanOutcome {
    pub fn len(&self) -> usize {
        self.high.len() + self.pre_large.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decoded entry with its match progress
struct Tracked {
    itemset: Itemset,
    state: MatchState,
}

/// Add the utility the itemsets of both lists collect in `records`
///
/// # Errors
///
/// Returns `InvalidItemsetKey` if any key fails to decode; no entry is
/// updated in that case.
pub fn rescan(
    records: &[TransactionRecord],
    high: Vec<RescanEntry>,
    pre_large: Vec<RescanEntry>,
) -> Result<RescanOutcome, MiningError> {
    let split = high.len();
    let mut entries = high;
    entries.extend(pre_large);

    let mut tracked = Vec::with_capacity(entries.len());
    let mut listeners: HashMap<ItemId, Vec<usize>> = HashMap::new();
    let mut max_key: ItemId = 0;

    for (slot, entry) in entries.iter().enumerate() {
        let itemset = entry.key.decode()?;
        for &item in itemset.items() {
            listeners.entry(item).or_default().push(slot);
        }
        max_key = max_key.max(itemset.last());
        tracked.push(Tracked {
            itemset,
            state: MatchState::default(),
        });
    }

    for (record_id, record) in records.iter().enumerate() {
        for &entry in record.items() {
            if entry.item > max_key {
                break;
            }
            let Some(slots) = listeners.get(&entry.item) else {
                continue;
            };

            for &slot in slots {
                let target = &mut tracked[slot];
                if let Some(utility) = target.state.observe(&target.itemset, record_id, entry) {
                    entries[slot].average_utility += utility as f64 / target.itemset.len() as f64;
                }
            }
        }
    }

    let pre_large = entries.split_off(split);
    Ok(RescanOutcome {
        high: entries,
        pre_large,
    })
}
