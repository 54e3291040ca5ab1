//! Synchronous processing strategy
//!
//! Loads the job's batch files one after another on the calling thread, then
//! mines them.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Line parsing to `read_batch_file` (SyncReader underneath)
//! - Mining to the shared pipeline (HauiMiner or IncrementalMiner)
//! - Output to `haui_format::write_results_csv`

use crate::io::sync_reader::read_batch_file;
use crate::strategy::{mine_and_write, MiningJob, ProcessingStrategy};
use crate::types::MiningError;
use std::io::Write;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use haui_miner::strategy::{MiningJob, ProcessingStrategy, SyncProcessingStrategy};
/// use haui_miner::types::MinerConfig;
/// use std::path::PathBuf;
///
/// let job = MiningJob::new(
///     vec![PathBuf::from("db1.txt")],
///     MinerConfig::new(0.3, None).unwrap(),
/// );
/// SyncProcessingStrategy
///     .process(&job, &mut std::io::stdout())
///     .expect("Mining failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Load every batch file in order, mine and write the results
    ///
    /// The first unreadable file or malformed line aborts the job before any
    /// mining happens.
    fn process(&self, job: &MiningJob, output: &mut dyn Write) -> Result<(), MiningError> {
        job.validate()?;

        let batches = job
            .files
            .iter()
            .map(|path| read_batch_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        mine_and_write(job.config, batches, output)
    }
}
