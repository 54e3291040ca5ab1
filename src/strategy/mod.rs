//! Processing strategy module for mining jobs
//!
//! This module defines the Strategy pattern for complete mining pipelines,
//! encompassing batch file loading and the mining run itself. This allows
//! different loading implementations (synchronous, concurrent asynchronous)
//! to be selected at runtime while the mining step stays the same.

use crate::cli::StrategyType;
use crate::core::{HauiMiner, IncrementalMiner, MiningResults};
use crate::io::haui_format::write_results_csv;
use crate::io::sync_reader::read_batch_file;
use crate::types::{MinerConfig, MiningError, TransactionRecord};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, LoadConfig};
pub use sync::SyncProcessingStrategy;

/// A complete mining request: the batch files in arrival order and the
/// configuration to mine them with
#[derive(Debug, Clone, PartialEq)]
pub struct MiningJob {
    pub files: Vec<PathBuf>,
    pub config: MinerConfig,
}

impl MiningJob {
    pub fn new(files: Vec<PathBuf>, config: MinerConfig) -> Self {
        MiningJob { files, config }
    }

    /// Check that the job can be mined before any file is read
    ///
    /// # Errors
    ///
    /// Returns `NoInput` without files and `PreLargeRequired` for several
    /// files without a pre-large threshold.
    pub fn validate(&self) -> Result<(), MiningError> {
        if self.files.is_empty() {
            return Err(MiningError::NoInput);
        }
        if self.files.len() > 1 && self.config.thresholds.pre_large().is_none() {
            return Err(MiningError::PreLargeRequired {
                batches: self.files.len(),
            });
        }
        Ok(())
    }
}

/// Processing strategy trait for complete mining pipelines
///
/// Each strategy must be able to load the job's batch files, mine them and
/// write the resulting itemsets to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Mine the job's batch files and write results to output
    ///
    /// # Arguments
    ///
    /// * `job` - Batch files and miner configuration
    /// * `output` - Writer receiving the result CSV
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The job fails validation (no files, several files without pre-large)
    /// - A batch file cannot be opened or contains a malformed line
    /// - Output cannot be written
    fn process(&self, job: &MiningJob, output: &mut dyn Write) -> Result<(), MiningError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional loading configuration for async mode (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<LoadConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Mine loaded batches and write the results
///
/// A single batch is mined in one full run; several batches go through the
/// incremental driver in order.
pub(crate) fn mine_and_write(
    config: MinerConfig,
    batches: Vec<Vec<TransactionRecord>>,
    output: &mut dyn Write,
) -> Result<(), MiningError> {
    let results = mine_batches(config, batches)?;
    info!(
        high = results.high.len(),
        pre_large = results.pre_large.len(),
        "Mining finished"
    );
    write_results_csv(&results, output)
}

/// Mine loaded batches into result mappings
///
/// # Errors
///
/// Returns `NoInput` for an empty batch list and `PreLargeRequired` when
/// several batches are given without a pre-large threshold.
pub fn mine_batches(
    config: MinerConfig,
    mut batches: Vec<Vec<TransactionRecord>>,
) -> Result<MiningResults, MiningError> {
    match batches.len() {
        0 => Err(MiningError::NoInput),
        1 => {
            let mut miner = HauiMiner::new(config);
            miner.load(batches.remove(0));
            miner.run();
            Ok(miner.take_results())
        }
        count => {
            if config.thresholds.pre_large().is_none() {
                return Err(MiningError::PreLargeRequired { batches: count });
            }
            let mut miner = IncrementalMiner::new(config);
            for batch in batches {
                miner.absorb(batch)?;
            }
            info!(
                batches = miner.batches_seen(),
                cumulative_utility = miner.cumulative_utility(),
                rescanned = miner.total_rescanned(),
                peak_memory_bytes = miner.peak_memory_bytes(),
                "Incremental mining finished"
            );
            Ok(miner.results().clone())
        }
    }
}

/// Minimal support count of one batch file, rounded up
///
/// # Errors
///
/// Returns an error if the file cannot be loaded.
pub fn check_count(path: &Path, config: MinerConfig) -> Result<u64, MiningError> {
    let mut miner = HauiMiner::new(config);
    miner.load(read_batch_file(path)?);
    Ok(miner.min_sup_count().ceil() as u64)
}
