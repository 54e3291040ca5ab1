//! Itemsets and the itemset key codec
//!
//! An itemset is a non-empty, strictly ascending sequence of item ids. Result
//! mappings are keyed by its string encoding: the ids joined by
//! [`KEY_SEPARATOR`]. The encoding is bijective over valid itemsets.

use super::error::MiningError;
use super::transaction::ItemId;
use std::fmt;
use std::str::FromStr;

/// Separator between item ids in an [`ItemsetKey`]
pub const KEY_SEPARATOR: char = ',';

/// Ascending, duplicate-free sequence of item ids
///
/// Ordering is lexicographic over the item ids, which is the order the
/// joiner keeps its working lists in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset(Vec<ItemId>);

impl Itemset {
    /// Build an itemset, checking the ordering invariant
    ///
    /// # Errors
    ///
    /// Returns `UnsortedItemset` for an empty or non strictly ascending
    /// sequence and `InvalidItemId` when it contains item 0.
    pub fn new(items: Vec<ItemId>) -> Result<Self, MiningError> {
        if items.is_empty() || items.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(MiningError::UnsortedItemset { items });
        }
        if items[0] == 0 {
            return Err(MiningError::InvalidItemId { item: 0 });
        }
        Ok(Itemset(items))
    }

    /// Wrap a sequence the caller already knows to be strictly ascending
    pub(crate) fn from_sorted(items: Vec<ItemId>) -> Self {
        debug_assert!(
            !items.is_empty() && items.windows(2).all(|pair| pair[0] < pair[1]),
            "itemset {:?} is not strictly ascending",
            items
        );
        Itemset(items)
    }

    pub fn singleton(item: ItemId) -> Self {
        Itemset(vec![item])
    }

    pub fn items(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed itemset; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> ItemId {
        self.0[self.0.len() - 1]
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.0.binary_search(&item).is_ok()
    }

    /// The item ids with the element at `position` removed
    pub fn without(&self, position: usize) -> Vec<ItemId> {
        let mut items = Vec::with_capacity(self.0.len().saturating_sub(1));
        items.extend_from_slice(&self.0[..position]);
        items.extend_from_slice(&self.0[position + 1..]);
        items
    }

    /// Encode into a result-mapping key
    pub fn key(&self) -> ItemsetKey {
        ItemsetKey::encode(self)
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.key())
    }
}

/// String key of an itemset in the result mappings
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemsetKey(String);

impl ItemsetKey {
    /// Join the item ids with the separator
    pub fn encode(itemset: &Itemset) -> Self {
        let mut key = String::with_capacity(itemset.len() * 4);
        for (position, item) in itemset.items().iter().enumerate() {
            if position > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(&item.to_string());
        }
        ItemsetKey(key)
    }

    /// Decode back into the itemset the key was produced from
    ///
    /// # Errors
    ///
    /// Returns `InvalidItemsetKey` for empty or non-numeric tokens and when the
    /// ids are not strictly ascending positive integers.
    pub fn decode(&self) -> Result<Itemset, MiningError> {
        let items = self
            .0
            .split(KEY_SEPARATOR)
            .map(|token| {
                token
                    .parse::<ItemId>()
                    .map_err(|_| MiningError::invalid_itemset_key(&self.0, "non-numeric item"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Itemset::new(items).map_err(|e| MiningError::invalid_itemset_key(&self.0, &e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Itemset> for ItemsetKey {
    fn from(itemset: &Itemset) -> Self {
        ItemsetKey::encode(itemset)
    }
}

impl FromStr for ItemsetKey {
    type Err = MiningError;

    /// Parse a key, accepting only canonical encodings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = ItemsetKey(s.to_string());
        let canonical = key.decode()?.key();
        if canonical != key {
            return Err(MiningError::invalid_itemset_key(s, "not in canonical form"));
        }
        Ok(key)
    }
}

impl fmt::Display for ItemsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
