//! memobench - workload driver for memocache
//!
//! Runs the range-sum workload with and without the interval LRU cache, and
//! the Fibonacci recurrence memoized by a recency cache and by a splay tree.

mod report;
mod workload;

use anyhow::Result;
use clap::{Parser, Subcommand};
use memocache::{IntervalLruCache, FIBONACCI_LRU_CAPACITY};
use tracing::info;

use crate::workload::{FibConfig, RangeConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print the report as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Range-sum queries and point updates, uncached vs. LRU-cached
    Range {
        /// Backing array length
        #[arg(short = 'n', long, default_value_t = 100_000)]
        size: usize,

        /// Number of operations (half range queries, half updates on average)
        #[arg(short, long, default_value_t = 50_000)]
        queries: usize,

        /// Cache capacity (number of ranges)
        #[arg(short, long, default_value_t = IntervalLruCache::DEFAULT_CAPACITY)]
        capacity: usize,

        /// RNG seed for a reproducible workload
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Fibonacci memoized by a recency cache vs. a splay tree
    Fib {
        /// Largest n to compute
        #[arg(short, long, default_value_t = 950)]
        max: u64,

        /// Distance between consecutive n
        #[arg(short, long, default_value_t = 50)]
        step: u64,

        /// Recency cache capacity
        #[arg(short, long, default_value_t = FIBONACCI_LRU_CAPACITY)]
        capacity: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("memobench v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Range {
            size,
            queries,
            capacity,
            seed,
        } => {
            let config = RangeConfig {
                size,
                queries,
                capacity,
                seed,
            };
            info!(?config, "Running range-sum workload");
            let report = workload::run_range(&config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print_table();
            }
        }
        Command::Fib {
            max,
            step,
            capacity,
        } => {
            let config = FibConfig {
                max,
                step,
                capacity,
            };
            info!(?config, "Running Fibonacci workload");
            let report = workload::run_fib(&config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print_table();
            }
        }
    }

    info!("Done");
    Ok(())
}
