//! # memocache
//!
//! Memoization engines for two workloads.
//!
//! ## Architecture
//! - **RecencyCache**: fixed-capacity LRU map (slot arena + index-linked list, O(1))
//! - **IntervalLruCache**: range-sum cache keyed by `(low, high)`, invalidated
//!   by point updates that fall inside a cached range
//! - **SplayTree**: unbounded ordered memo; every access splays the key to the root
//! - **Memo**: the lookup/store seam the Fibonacci recurrence is written against
//!
//! All structures are single-threaded. Reads restructure them (recency
//! promotion, splaying), so every lookup takes `&mut self`.

#![warn(missing_docs)]

mod error;
mod interval;
mod lru;
mod memo;
mod splay;
mod stats;

pub use error::{Error, Result};
pub use interval::{range_sum_uncached, update_uncached, Interval, IntervalLruCache};
pub use lru::{Keys, RecencyCache};
pub use memo::{
    fibonacci_iterative, fibonacci_lru, fibonacci_memo, fibonacci_splay, Memo,
    FIBONACCI_LRU_CAPACITY,
};
pub use num_bigint::BigUint;
pub use splay::{Iter, SplayTree};
pub use stats::CacheStats;
