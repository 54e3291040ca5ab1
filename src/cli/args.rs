use crate::strategy::{LoadConfig, MiningJob};
use crate::types::{MinerConfig, MiningError, UpperBoundMode};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Mine high average-utility itemsets from transaction batch files
#[derive(Parser, Debug)]
#[command(name = "haui-miner")]
#[command(about = "Mine high average-utility itemsets from transaction batch files", long_about = None)]
pub struct CliArgs {
    /// Batch files, mined in the given order
    #[arg(
        short = 'f',
        long = "files",
        value_name = "FILES",
        value_delimiter = ',',
        required = true,
        help = "Comma-separated batch files; more than one enables incremental mining"
    )]
    pub files: Vec<PathBuf>,

    /// Minimal average-utility threshold as a fraction of total utility
    #[arg(
        short = 'm',
        long = "min-utility",
        value_name = "FRACTION",
        help = "Minimal utility threshold, a fraction in [0, 1]"
    )]
    pub min_utility: f64,

    /// Pre-large threshold as a fraction of total utility
    #[arg(
        short = 'p',
        long = "pre-large",
        value_name = "FRACTION",
        help = "Pre-large threshold, at most the minimal utility threshold"
    )]
    pub pre_large: Option<f64>,

    /// Print the minimal support count of the first file and exit
    #[arg(short = 'c', long = "check-count")]
    pub check_count: bool,

    /// Use the global upper bound to select the itemsets that are joined
    #[arg(long = "no-lead-upperbound")]
    pub no_lead_upperbound: bool,

    /// Loading strategy to use for batch files
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Loading strategy: 'sync' reads files in turn, 'async' reads them concurrently"
    )]
    pub strategy: StrategyType,

    /// Maximum number of files loaded concurrently (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of batch files loaded concurrently (default: CPU cores)"
    )]
    pub max_concurrent_loads: Option<usize>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Available loading strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Build the validated miner configuration
    ///
    /// # Errors
    ///
    /// Returns an error for fractions outside `[0, 1]` or a pre-large fraction
    /// above the minimal one.
    pub fn miner_config(&self) -> Result<MinerConfig, MiningError> {
        let bound_mode = if self.no_lead_upperbound {
            UpperBoundMode::Global
        } else {
            UpperBoundMode::Lead
        };
        Ok(MinerConfig::new(self.min_utility, self.pre_large)?.with_bound_mode(bound_mode))
    }

    /// Build the mining job described by the arguments
    pub fn to_job(&self) -> Result<MiningJob, MiningError> {
        Ok(MiningJob::new(self.files.clone(), self.miner_config()?))
    }

    /// Create a LoadConfig from CLI arguments, or the default
    pub fn to_load_config(&self) -> LoadConfig {
        self.max_concurrent_loads
            .map_or_else(LoadConfig::default, LoadConfig::new)
    }
}
