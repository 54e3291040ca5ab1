//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Item ids, utilities and parsed transaction records
//! - `itemset`: Itemsets and the itemset key codec
//! - `config`: Threshold fractions, derived counts and miner configuration
//! - `error`: Error types for the miner

pub mod config;
pub mod error;
pub mod itemset;
pub mod transaction;

pub use config::{MinerConfig, ThresholdConfig, Thresholds, UpperBoundMode, UtilityClass};
pub use error::MiningError;
pub use itemset::{Itemset, ItemsetKey, KEY_SEPARATOR};
pub use transaction::{ItemId, ItemUtility, TransactionRecord, Utility};
