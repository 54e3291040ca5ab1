//! Asynchronous processing strategy
//!
//! Loads the job's batch files concurrently on a multi-threaded tokio
//! runtime, then mines them on the calling thread.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── LoadConfig (max_concurrent_loads)
//!     ├── tokio runtime
//!     │     └── buffered stream of read_batch_file_async (file order kept)
//!     └── shared mining pipeline (HauiMiner / IncrementalMiner)
//! ```
//!
//! Mining itself is single-threaded; only file loading overlaps.

use crate::io::async_reader::read_batch_file_async;
use crate::strategy::{mine_and_write, MiningJob, ProcessingStrategy};
use crate::types::{MiningError, TransactionRecord};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::io::Write;
use tracing::{debug, warn};

/// Configuration for concurrent loading
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    /// Maximum number of batch files read at the same time
    pub max_concurrent_loads: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_concurrent_loads: num_cpus::get(),
        }
    }
}

impl LoadConfig {
    /// Create a new LoadConfig, falling back to the default for zero
    pub fn new(max_concurrent_loads: usize) -> Self {
        let default = Self::default();

        let max_concurrent_loads = if max_concurrent_loads == 0 {
            warn!(
                requested = max_concurrent_loads,
                fallback = default.max_concurrent_loads,
                "Invalid max_concurrent_loads, using default"
            );
            default.max_concurrent_loads
        } else {
            max_concurrent_loads
        };

        Self {
            max_concurrent_loads,
        }
    }
}

/// Asynchronous processing strategy
///
/// Batch files are read concurrently, at most `max_concurrent_loads` at a
/// time, and handed to the miner in the order the job lists them.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: LoadConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    async fn load_all(&self, job: &MiningJob) -> Result<Vec<Vec<TransactionRecord>>, MiningError> {
        stream::iter(job.files.iter())
            .map(|path| read_batch_file_async(path))
            .buffered(self.config.max_concurrent_loads)
            .try_collect()
            .await
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Load every batch file concurrently, mine and write the results
    ///
    /// # Errors
    ///
    /// Runtime construction failures are reported as `Runtime`; loading and
    /// mining errors are returned unchanged.
    fn process(&self, job: &MiningJob, output: &mut dyn Write) -> Result<(), MiningError> {
        job.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_loads)
            .enable_all()
            .build()
            .map_err(|e| MiningError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

        let batches = runtime.block_on(self.load_all(job))?;
        debug!(batches = batches.len(), "Batch files loaded");

        mine_and_write(job.config, batches, output)
    }
}
