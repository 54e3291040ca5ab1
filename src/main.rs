//! HAUI Miner CLI
//!
//! Command-line interface for mining high average-utility itemsets from
//! transaction batch files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- -f db1.txt -m 0.3 > itemsets.csv
//! cargo run -- -f db1.txt,db2.txt,db3.txt -m 0.3 -p 0.15 > itemsets.csv
//! cargo run -- -f db1.txt -m 0.3 --no-lead-upperbound --strategy async
//! cargo run -- -f db1.txt -m 0.3 -c
//! ```
//!
//! With one file the program mines it in a single run. With several files
//! they are treated as successive batches and mined incrementally, which
//! requires a pre-large threshold. Results go to stdout as CSV, logs to
//! stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid thresholds, file not found, malformed line, etc.)

use haui_miner::cli::{self, CliArgs};
use haui_miner::logging;
use haui_miner::strategy;
use haui_miner::types::MiningError;
use std::process;

fn run(args: &CliArgs) -> Result<(), MiningError> {
    let job = args.to_job()?;

    if args.check_count {
        let first = job.files.first().ok_or(MiningError::NoInput)?;
        println!("{}", strategy::check_count(first, job.config)?);
        return Ok(());
    }

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_load_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout().lock();
    strategy.process(&job, &mut output)
}

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logging(&args.log_level) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
