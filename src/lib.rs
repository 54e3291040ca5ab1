//! HAUI Miner Library
//! # Overview
//!
//! This library mines high average-utility itemsets (HAUIs) from transaction
//! databases, with a sync and an async strategy for loading batch files and an
//! incremental driver for databases that grow batch by batch.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (TransactionRecord, Itemset, thresholds, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Mining components:
//!   - [`core::engine`] - Run orchestration
//!   - [`core::level`] - Level-wise candidate generation and evaluation
//!   - [`core::incremental`] - Maintenance of results across batches
//! - [`io`] - Batch file parsing and result output
//! - [`strategy`] - Complete load-and-mine pipelines
//! - [`logging`] - Subscriber setup
//!
//! # Average Utility
//!
//! The utility of an itemset in a transaction is the sum of its items'
//! utilities there. Its average utility is that sum, over every transaction
//! containing the whole itemset, divided by the itemset's length.
//!
//! # Result Classes
//!
//! - **High**: average utility at least `min_utility × total utility`
//! - **Pre-large**: below that, but at least `pre_large × total utility`
//!
//! Pre-large itemsets let new batches be absorbed without mining everything
//! again, as long as the added utility stays within the gap between the two
//! thresholds.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{HauiMiner, IncrementalMiner, MiningResults, TransactionStore};
pub use io::write_results_csv;
pub use types::{
    ItemId, ItemUtility, Itemset, ItemsetKey, MinerConfig, MiningError, ThresholdConfig,
    TransactionRecord, UpperBoundMode, Utility,
};
