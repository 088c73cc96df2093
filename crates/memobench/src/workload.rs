//! Workload generation and the cached vs. uncached runs

use std::time::Instant;

use anyhow::{bail, ensure, Context, Result};
use memocache::{
    fibonacci_iterative, fibonacci_lru, fibonacci_splay, range_sum_uncached, update_uncached,
    IntervalLruCache, RecencyCache, SplayTree,
};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::report::{FibReport, FibRow, RangeReport};

/// Smallest and largest generated array value (and update value)
const VALUE_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// Largest Fibonacci index the driver accepts; the memoized recurrence
/// recurses once per index
const MAX_FIBONACCI_N: u64 = 5_000;

/// One step of the range-sum workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Sum of `array[low..=high]`
    Range { low: usize, high: usize },
    /// `array[index] = value`
    Update { index: usize, value: i64 },
}

/// Settings for the range-sum workload
#[derive(Debug, Clone)]
pub struct RangeConfig {
    pub size: usize,
    pub queries: usize,
    pub capacity: usize,
    pub seed: Option<u64>,
}

/// Settings for the Fibonacci workload
#[derive(Debug, Clone)]
pub struct FibConfig {
    pub max: u64,
    pub step: u64,
    pub capacity: usize,
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn generate_array<R: Rng>(rng: &mut R, size: usize) -> Vec<i64> {
    (0..size).map(|_| rng.gen_range(VALUE_RANGE)).collect()
}

/// Fair coin between a range query over two distinct indices and a point update
pub fn generate_ops<R: Rng>(rng: &mut R, size: usize, count: usize) -> Vec<Op> {
    (0..count)
        .map(|_| {
            if rng.gen_bool(0.5) {
                let picked = index::sample(rng, size, 2);
                let (a, b) = (picked.index(0), picked.index(1));
                Op::Range {
                    low: a.min(b),
                    high: a.max(b),
                }
            } else {
                Op::Update {
                    index: rng.gen_range(0..size),
                    value: rng.gen_range(VALUE_RANGE),
                }
            }
        })
        .collect()
}

/// Pass result: elapsed seconds and the wrapping sum of all range answers
struct Pass {
    secs: f64,
    checksum: i128,
}

fn run_uncached(array: &mut [i64], ops: &[Op]) -> Result<Pass> {
    let start = Instant::now();
    let mut checksum = 0i128;
    for op in ops {
        match *op {
            Op::Range { low, high } => {
                checksum = checksum.wrapping_add(range_sum_uncached(array, low, high)?);
            }
            Op::Update { index, value } => update_uncached(array, index, value)?,
        }
    }
    Ok(Pass {
        secs: start.elapsed().as_secs_f64(),
        checksum,
    })
}

fn run_cached(array: &mut [i64], ops: &[Op], cache: &mut IntervalLruCache) -> Result<Pass> {
    let start = Instant::now();
    let mut checksum = 0i128;
    for op in ops {
        match *op {
            Op::Range { low, high } => {
                checksum = checksum.wrapping_add(cache.range_sum(array, low, high)?);
            }
            Op::Update { index, value } => cache.update(array, index, value)?,
        }
    }
    Ok(Pass {
        secs: start.elapsed().as_secs_f64(),
        checksum,
    })
}

/// Run the same operation stream without and with the interval cache
pub fn run_range(config: &RangeConfig) -> Result<RangeReport> {
    ensure!(config.size >= 2, "array size must be at least 2, got {}", config.size);
    ensure!(config.capacity > 0, "cache capacity must be positive");

    let mut rng = rng_for(config.seed);
    let array = generate_array(&mut rng, config.size);
    let ops = generate_ops(&mut rng, config.size, config.queries);
    let range_queries = ops.iter().filter(|op| matches!(op, Op::Range { .. })).count();
    debug!(
        range_queries,
        updates = ops.len() - range_queries,
        "workload generated"
    );

    let mut plain = array.clone();
    let uncached = run_uncached(&mut plain, &ops).context("uncached pass failed")?;
    info!("Uncached pass: {:.3}s", uncached.secs);

    let mut cached_array = array;
    let mut cache = IntervalLruCache::new(config.capacity);
    let cached = run_cached(&mut cached_array, &ops, &mut cache).context("cached pass failed")?;
    info!("LRU-cached pass: {:.3}s", cached.secs);

    if uncached.checksum != cached.checksum || plain != cached_array {
        warn!(
            uncached = uncached.checksum,
            cached = cached.checksum,
            "passes disagree"
        );
        bail!("cached and uncached passes produced different results");
    }

    Ok(RangeReport::new(
        config,
        range_queries,
        uncached.secs,
        cached.secs,
        cache.stats(),
    ))
}

/// Time both Fibonacci memo strategies for `0..=max` in steps of `step`
pub fn run_fib(config: &FibConfig) -> Result<FibReport> {
    ensure!(config.step > 0, "step must be positive");
    // n, n-1 and n-2 must stay cached or the recurrence goes exponential
    ensure!(config.capacity >= 3, "cache capacity must be at least 3");
    ensure!(
        config.max <= MAX_FIBONACCI_N,
        "max {} exceeds {} (recursion depth)",
        config.max,
        MAX_FIBONACCI_N
    );
    let step = usize::try_from(config.step).context("step does not fit in usize")?;

    let mut rows = Vec::new();
    for n in (0..=config.max).step_by(step) {
        let expected = fibonacci_iterative(n);

        let mut cache = RecencyCache::new(config.capacity);
        let start = Instant::now();
        let lru_value = fibonacci_lru(n, &mut cache);
        let lru_secs = start.elapsed().as_secs_f64();

        let mut tree = SplayTree::new();
        let start = Instant::now();
        let splay_value = fibonacci_splay(n, &mut tree);
        let splay_secs = start.elapsed().as_secs_f64();

        if lru_value != expected || splay_value != expected {
            bail!("Fibonacci({n}) mismatch between memo strategies");
        }
        info!("Fibonacci({n}): LRU = {lru_secs:.6}s, splay = {splay_secs:.6}s");

        rows.push(FibRow {
            n,
            value: expected.to_string(),
            lru_secs,
            splay_secs,
        });
    }

    Ok(FibReport {
        capacity: config.capacity,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ops_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let ops = generate_ops(&mut rng, 10, 500);

        assert_eq!(ops.len(), 500);
        for op in ops {
            match op {
                Op::Range { low, high } => assert!(low < high && high < 10),
                Op::Update { index, value } => {
                    assert!(index < 10);
                    assert!(VALUE_RANGE.contains(&value));
                }
            }
        }
    }

    #[test]
    fn test_generate_is_reproducible() {
        let a = generate_ops(&mut StdRng::seed_from_u64(3), 100, 50);
        let b = generate_ops(&mut StdRng::seed_from_u64(3), 100, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_range_small() {
        let config = RangeConfig {
            size: 200,
            queries: 2000,
            capacity: 50,
            seed: Some(1),
        };
        let report = run_range(&config).unwrap();

        assert_eq!(report.size, 200);
        assert_eq!(report.range_queries + report.updates, 2000);
        assert_eq!(report.misses + report.hits, report.range_queries as u64);
    }

    #[test]
    fn test_run_range_rejects_tiny_array() {
        let config = RangeConfig {
            size: 1,
            queries: 10,
            capacity: 5,
            seed: Some(1),
        };
        assert!(run_range(&config).is_err());
    }

    #[test]
    fn test_run_fib() {
        let report = run_fib(&FibConfig {
            max: 30,
            step: 10,
            capacity: 128,
        })
        .unwrap();

        let values: Vec<_> = report.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["0", "55", "6765", "832040"]);
    }

    #[test]
    fn test_run_fib_full_sweep() {
        let report = run_fib(&FibConfig {
            max: 950,
            step: 50,
            capacity: 128,
        })
        .unwrap();

        assert_eq!(report.rows.len(), 20);
        let last = report.rows.last().unwrap();
        assert_eq!(last.n, 950);
        assert_eq!(last.value, fibonacci_iterative(950).to_string());
        assert_eq!(last.value.len(), 199);
    }

    #[test]
    fn test_run_fib_rejects_bad_config() {
        let zero_step = FibConfig {
            max: 10,
            step: 0,
            capacity: 128,
        };
        assert!(run_fib(&zero_step).is_err());

        let tiny_cache = FibConfig {
            max: 10,
            step: 1,
            capacity: 2,
        };
        assert!(run_fib(&tiny_cache).is_err());

        let too_deep = FibConfig {
            max: MAX_FIBONACCI_N + 1,
            step: 1,
            capacity: 128,
        };
        assert!(run_fib(&too_deep).is_err());
    }
}
