//! Benchmark suite for mining runs and loading strategies
//!
//! Uses the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Data
//!
//! Databases are generated deterministically: transaction `t` holds the
//! items `t % n + 1 .. t % n + width` with utilities derived from both, so
//! neighbouring items co-occur often and long itemsets stay high.

use haui_miner::cli::StrategyType;
use haui_miner::core::{HauiMiner, IncrementalMiner};
use haui_miner::strategy::{create_strategy, LoadConfig, MiningJob};
use haui_miner::types::{ItemUtility, MinerConfig, TransactionRecord, UpperBoundMode};
use std::io::Write;
use tempfile::NamedTempFile;

fn main() {
    divan::main();
}

const ITEMS: u32 = 40;
const WIDTH: u32 = 6;

fn generate(transactions: u32) -> Vec<TransactionRecord> {
    (0..transactions)
        .map(|t| {
            let first = t % ITEMS + 1;
            let items = (first..first + WIDTH)
                .map(|item| ItemUtility::new(item, u64::from((item * 7 + t) % 9 + 1)))
                .collect();
            TransactionRecord::new(items, None).expect("generated items are distinct")
        })
        .collect()
}

fn write_batch(records: &[TransactionRecord]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for record in records {
        let items: Vec<String> = record.items().iter().map(|e| e.item.to_string()).collect();
        let utilities: Vec<String> = record
            .items()
            .iter()
            .map(|e| e.utility.to_string())
            .collect();
        writeln!(
            file,
            "{}:{}:{}",
            items.join(" "),
            record.transaction_utility(),
            utilities.join(" ")
        )
        .expect("Failed to write batch");
    }
    file.flush().expect("Failed to flush batch");
    file
}

/// Single full run, lead and global bound
#[divan::bench(args = [1_000, 10_000])]
fn full_run_lead(bencher: divan::Bencher, transactions: u32) {
    let records = generate(transactions);
    let config = MinerConfig::new(0.01, None).expect("valid thresholds");
    bencher.bench_local(|| {
        let mut miner = HauiMiner::new(config);
        miner.load(records.clone());
        miner.run()
    });
}

#[divan::bench(args = [1_000, 10_000])]
fn full_run_global(bencher: divan::Bencher, transactions: u32) {
    let records = generate(transactions);
    let config = MinerConfig::new(0.01, None)
        .expect("valid thresholds")
        .with_bound_mode(UpperBoundMode::Global);
    bencher.bench_local(|| {
        let mut miner = HauiMiner::new(config);
        miner.load(records.clone());
        miner.run()
    });
}

/// Ten batches through the incremental driver
#[divan::bench]
fn incremental_ten_batches(bencher: divan::Bencher) {
    let batches: Vec<Vec<TransactionRecord>> = generate(10_000)
        .chunks(1_000)
        .map(<[TransactionRecord]>::to_vec)
        .collect();
    let config = MinerConfig::new(0.01, Some(0.005)).expect("valid thresholds");
    bencher.bench_local(|| {
        let mut driver = IncrementalMiner::new(config);
        for batch in batches.clone() {
            driver.absorb(batch).expect("absorb failed");
        }
        driver.total_rescanned()
    });
}

fn strategy_over_files(bencher: divan::Bencher, strategy_type: StrategyType) {
    let records = generate(4_000);
    let files: Vec<NamedTempFile> = records.chunks(1_000).map(write_batch).collect();
    let job = MiningJob::new(
        files.iter().map(|file| file.path().to_path_buf()).collect(),
        MinerConfig::new(0.01, Some(0.005)).expect("valid thresholds"),
    );
    let strategy = create_strategy(strategy_type, Some(LoadConfig::default()));
    bencher.bench_local(|| {
        let mut output = Vec::new();
        strategy.process(&job, &mut output).expect("Processing failed");
        output
    });
}

#[divan::bench]
fn sync_strategy_four_files(bencher: divan::Bencher) {
    strategy_over_files(bencher, StrategyType::Sync);
}

#[divan::bench]
fn async_strategy_four_files(bencher: divan::Bencher) {
    strategy_over_files(bencher, StrategyType::Async);
}
