//! Sweeps a sort engine over empty, tiny, word-boundary and large inputs, aligned and
//! misaligned buffers, and comparators that break the ordering contract.
//!
//! Usage:
//!   testqsort                          Seed from the wall clock
//!   testqsort 0x123456789abcdef0       Fixed seed, must exceed 0xFFFFFFFF
//!   testqsort --engine heapsort        Pick the engine under test
//!   RUST_LOG=debug testqsort           Include failing key sequences in the log
//!
//! Exits with 1 if any check failed.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};

use qsort_test::unstable::{rust_heapsort, rust_quicksort, rust_std};
use sort_test_tools::harness::{
    Session, SweepConfig, ADVERSARIAL_MAX_LEN, MIN_ADVERSARIAL_CEILING,
};
use sort_test_tools::seed;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Engine {
    Std,
    Heapsort,
    Quicksort,
}

#[derive(Parser, Debug)]
#[command(name = "testqsort", about = "Verify an in-place sort over raw byte records")]
struct Args {
    /// Random seed, decimal or 0x-prefixed hexadecimal, equal or greater than 0x100000000.
    #[arg(value_parser = seed::parse_seed)]
    seed: Option<u64>,

    /// Sort engine under test.
    #[arg(long, value_enum, default_value_t = Engine::Quicksort)]
    engine: Engine,

    /// Largest length swept with contract-violating comparators, at least 1024.
    #[arg(long, default_value_t = ADVERSARIAL_MAX_LEN, value_parser = parse_adversarial_len)]
    adversarial_len: usize,
}

fn parse_adversarial_len(s: &str) -> Result<usize, String> {
    let len = s
        .parse::<usize>()
        .map_err(|e| format!("Invalid length '{s}': {e}"))?;

    if len < MIN_ADVERSARIAL_CEILING {
        return Err(format!(
            "length {len} drops the large adversarial case, use at least {MIN_ADVERSARIAL_CEILING}"
        ));
    }

    Ok(len)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(seed::seed_from_time);
    let config = SweepConfig::default().with_adversarial_ceiling(args.adversarial_len);

    let mut session = Session::new(seed);
    let report = match args.engine {
        Engine::Std => session.run::<rust_std::SortImpl>(&config),
        Engine::Heapsort => session.run::<rust_heapsort::SortImpl>(&config),
        Engine::Quicksort => session.run::<rust_quicksort::SortImpl>(&config),
    };

    if report.is_broken() {
        error!("{}, seed {:#018x}", report.summary(), session.seed());
        return ExitCode::FAILURE;
    }

    info!("{}", report.summary());
    ExitCode::SUCCESS
}
