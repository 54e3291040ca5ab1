//! Transaction line format and result output
//!
//! This module centralizes all format concerns, providing:
//! - RawTransaction structure for deserialization
//! - Conversion from raw lines to TransactionRecord
//! - Result serialization
//!
//! # Input Format
//!
//! One transaction per line, three `:`-separated fields:
//!
//! ```text
//! items:transaction_utility:utilities
//! 1 3 5:17:4 6 7
//! ```
//!
//! Items and utilities are space-separated and paired by position. An empty
//! transaction utility means the sum of the item utilities.
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::MiningResults;
use crate::types::{ItemId, ItemUtility, MiningError, TransactionRecord, Utility};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Field delimiter of the transaction line format
pub const FIELD_DELIMITER: u8 = b':';

/// One transaction line, split into its three fields
///
/// Fields are read by position; absent trailing fields deserialize as `None`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RawTransaction {
    pub items: String,
    #[serde(default)]
    pub transaction_utility: Option<String>,
    #[serde(default)]
    pub utilities: Option<String>,
}

fn parse_tokens<T: FromStr>(field: &str, raw: &str) -> Result<Vec<T>, MiningError> {
    raw.split_whitespace()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|_| MiningError::invalid_number(field, token))
        })
        .collect()
}

/// Convert a RawTransaction to a TransactionRecord
///
/// # Errors
///
/// Returns an error if:
/// - The utilities field is absent
/// - A token is not an unsigned integer
/// - Items and utilities differ in number
/// - An item id is zero or repeated
pub fn convert_raw_transaction(raw: RawTransaction) -> Result<TransactionRecord, MiningError> {
    let utilities_field = raw
        .utilities
        .ok_or_else(|| MiningError::missing_field("utilities"))?;

    let items: Vec<ItemId> = parse_tokens("item", &raw.items)?;
    let utilities: Vec<Utility> = parse_tokens("utility", &utilities_field)?;
    if items.len() != utilities.len() {
        return Err(MiningError::UtilityCountMismatch {
            items: items.len(),
            utilities: utilities.len(),
        });
    }

    let transaction_utility = match raw.transaction_utility.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Some(
            token
                .parse::<Utility>()
                .map_err(|_| MiningError::invalid_number("transaction utility", token))?,
        ),
        _ => None,
    };

    let pairs = items
        .into_iter()
        .zip(utilities)
        .map(|(item, utility)| ItemUtility::new(item, utility))
        .collect();

    TransactionRecord::new(pairs, transaction_utility)
}

/// One output row
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    kind: &'a str,
    itemset: &'a str,
    average_utility: String,
}

/// Write mining results in CSV format
///
/// Writes a header `kind,itemset,average_utility`, then the high itemsets and
/// the pre-large itemsets, each in key order. Averages carry 4 decimals.
///
/// # Errors
///
/// Returns an error if writing to `output` fails.
pub fn write_results_csv(results: &MiningResults, output: &mut dyn Write) -> Result<(), MiningError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer.write_record(["kind", "itemset", "average_utility"])?;

    let rows = results
        .high
        .iter()
        .map(|entry| ("high", entry))
        .chain(results.pre_large.iter().map(|entry| ("pre-large", entry)));

    for (kind, (key, average_utility)) in rows {
        writer.serialize(ResultRow {
            kind,
            itemset: key.as_str(),
            average_utility: format!("{:.4}", average_utility),
        })?;
    }

    writer.flush()?;
    Ok(())
}
