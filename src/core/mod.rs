//! Core mining module
//!
//! This module contains the level-wise mining components:
//! - `transaction_store` - Loaded records and the active-record index
//! - `candidate` - Candidates, per-record match state and the fan-out index
//! - `joiner` - Candidate generation by sorted-array join
//! - `upper_bound` - Lead and global average-utility upper bounds
//! - `scanner` - Single pass evaluating one level's candidates
//! - `level` - Level state and the transition between levels
//! - `memory` - Working-set size estimate
//! - `results` - Result mappings and run statistics
//! - `engine` - Run orchestration
//! - `rescan` - Rescan of kept itemsets against a new batch
//! - `incremental` - Multi-batch driver

pub mod candidate;
pub mod engine;
pub mod incremental;
pub mod joiner;
pub mod level;
pub mod memory;
pub mod rescan;
pub mod results;
pub mod scanner;
pub mod transaction_store;
pub mod upper_bound;

pub use engine::HauiMiner;
pub use incremental::{BatchMode, BatchOutcome, IncrementalMiner};
pub use rescan::{RescanEntry, RescanOutcome};
pub use results::{MiningResults, ResultMap, RunStats};
pub use transaction_store::TransactionStore;
