//! Run reports: plain-text tables and JSON

use memocache::CacheStats;
use serde::Serialize;

use crate::workload::RangeConfig;

/// Outcome of the range-sum workload
#[derive(Debug, Serialize)]
pub struct RangeReport {
    pub size: usize,
    pub queries: usize,
    pub capacity: usize,
    pub range_queries: usize,
    pub updates: usize,
    pub uncached_secs: f64,
    pub cached_secs: f64,
    pub speedup: f64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub hit_ratio: f64,
}

impl RangeReport {
    pub fn new(
        config: &RangeConfig,
        range_queries: usize,
        uncached_secs: f64,
        cached_secs: f64,
        stats: CacheStats,
    ) -> Self {
        let speedup = if cached_secs > 0.0 {
            uncached_secs / cached_secs
        } else {
            0.0
        };

        Self {
            size: config.size,
            queries: config.queries,
            capacity: config.capacity,
            range_queries,
            updates: config.queries - range_queries,
            uncached_secs,
            cached_secs,
            speedup,
            hits: stats.hits(),
            misses: stats.misses(),
            evictions: stats.evictions(),
            invalidations: stats.invalidations(),
            hit_ratio: stats.hit_ratio(),
        }
    }

    pub fn print_table(&self) {
        println!("\n📊 RANGE-SUM WORKLOAD");
        println!("   Array size:      {}", self.size);
        println!(
            "   Operations:      {} ({} range, {} update)",
            self.queries, self.range_queries, self.updates
        );
        println!("   Cache capacity:  {}", self.capacity);
        println!("\n   ┌──────────────────┬──────────────┐");
        println!("   │ Path             │ Time (s)     │");
        println!("   ├──────────────────┼──────────────┤");
        println!("   │ Uncached         │ {:>12.4} │", self.uncached_secs);
        println!("   │ LRU-cached       │ {:>12.4} │", self.cached_secs);
        println!("   └──────────────────┴──────────────┘");
        println!("   Speedup:         {:.2}x", self.speedup);
        println!(
            "   Hits / misses:   {} / {} ({:.1}% hit rate)",
            self.hits,
            self.misses,
            self.hit_ratio * 100.0
        );
        println!("   Evictions:       {}", self.evictions);
        println!("   Invalidations:   {}", self.invalidations);
    }
}

/// Timing of both memo strategies for one `n`
#[derive(Debug, Serialize)]
pub struct FibRow {
    pub n: u64,
    /// Decimal string; JSON numbers lose precision past 2^53
    pub value: String,
    pub lru_secs: f64,
    pub splay_secs: f64,
}

/// Outcome of the Fibonacci workload
#[derive(Debug, Serialize)]
pub struct FibReport {
    pub capacity: usize,
    pub rows: Vec<FibRow>,
}

impl FibReport {
    pub fn print_table(&self) {
        println!("\n📊 FIBONACCI: LRU CACHE (capacity {}) vs SPLAY TREE", self.capacity);
        println!("{:>6}  {:>18}  {:>18}", "n", "LRU Cache Time (s)", "Splay Tree Time (s)");
        for row in &self.rows {
            println!("{:>6}  {:>18.6}  {:>19.6}", row.n, row.lru_secs, row.splay_secs);
        }
    }
}
