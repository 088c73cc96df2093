//! IntervalLruCache: range-sum memo over a caller-owned array
//!
//! Whole query ranges are cached. A point update drops every cached range
//! that contains the written index; that scan is O(cache size) per update,
//! traded against the O(high - low) cost of an uncached sum.
//!
//! Sums are accumulated as `i128`, which cannot overflow for any slice of
//! `i64` that fits in memory.

use tracing::trace;

use crate::error::{Error, Result};
use crate::lru::RecencyCache;
use crate::stats::CacheStats;

/// Inclusive index range `(low, high)`
pub type Interval = (usize, usize);

/// Range-sum cache with interval invalidation on point updates
pub struct IntervalLruCache {
    cache: RecencyCache<Interval, i128>,
    stats: CacheStats,
}

impl IntervalLruCache {
    /// Capacity used by the range-sum workload
    pub const DEFAULT_CAPACITY: usize = 5000;

    /// Create a cache holding at most `capacity` ranges
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: RecencyCache::new(capacity),
            stats: CacheStats::new(),
        }
    }

    /// Sum of `array[low..=high]`, served from the cache when possible
    ///
    /// # Errors
    /// `InvalidRange` if `low > high`, `IndexOutOfBounds` if `high` is past the
    /// end of `array`. Rejected calls do not touch the cache.
    pub fn range_sum(&mut self, array: &[i64], low: usize, high: usize) -> Result<i128> {
        check_range(array.len(), low, high)?;

        if let Some(&sum) = self.cache.get(&(low, high)) {
            self.stats.record_hit();
            return Ok(sum);
        }

        self.stats.record_miss();
        let sum = sum_slice(&array[low..=high]);
        if let Some((evicted, _)) = self.cache.put((low, high), sum) {
            trace!(low = evicted.0, high = evicted.1, "evicted range");
            self.stats.record_eviction();
        }
        self.stats.record_insert();

        Ok(sum)
    }

    /// Write `value` at `index` and drop every cached range covering it
    ///
    /// # Errors
    /// `IndexOutOfBounds` if `index` is past the end of `array`; neither the
    /// array nor the cache is modified in that case.
    pub fn update(&mut self, array: &mut [i64], index: usize, value: i64) -> Result<()> {
        update_uncached(array, index, value)?;

        let dropped = self
            .cache
            .invalidate(|&(low, high)| low <= index && index <= high);
        if dropped > 0 {
            trace!(index, dropped, "invalidated ranges");
        }
        self.stats.record_invalidations(dropped);

        Ok(())
    }

    /// Cached sum for `(low, high)` without promoting it
    pub fn peek(&self, low: usize, high: usize) -> Option<i128> {
        self.cache.peek(&(low, high)).copied()
    }

    /// Snapshot of the hit/miss/invalidation counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached ranges
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if no range is cached
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Maximum number of cached ranges
    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Drop all cached ranges and reset statistics
    pub fn clear(&mut self) {
        self.cache.clear();
        self.stats.reset();
    }
}

impl Default for IntervalLruCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Sum of `array[low..=high]` by direct traversal
pub fn range_sum_uncached(array: &[i64], low: usize, high: usize) -> Result<i128> {
    check_range(array.len(), low, high)?;
    Ok(sum_slice(&array[low..=high]))
}

/// Write `value` at `index`
pub fn update_uncached(array: &mut [i64], index: usize, value: i64) -> Result<()> {
    let len = array.len();
    let slot = array
        .get_mut(index)
        .ok_or(Error::IndexOutOfBounds { index, len })?;
    *slot = value;
    Ok(())
}

fn sum_slice(values: &[i64]) -> i128 {
    values.iter().map(|&v| i128::from(v)).sum()
}

fn check_range(len: usize, low: usize, high: usize) -> Result<()> {
    if low > high {
        return Err(Error::InvalidRange { low, high });
    }
    if high >= len {
        return Err(Error::IndexOutOfBounds { index: high, len });
    }
    Ok(())
}
