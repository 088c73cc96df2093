//! Memo stores and the memoized Fibonacci recurrence
//!
//! Both memo stores are passed in by the caller, who decides their
//! lifetime; nothing is cached process-wide.

use std::hash::Hash;

use num_bigint::BigUint;

use crate::lru::RecencyCache;
use crate::splay::SplayTree;

/// Recency cache capacity used for the Fibonacci workload
pub const FIBONACCI_LRU_CAPACITY: usize = 128;

/// A store that remembers computed values by key
pub trait Memo<K, V> {
    /// Previously remembered value for `key`
    fn recall(&mut self, key: &K) -> Option<V>;

    /// Remember `value` for `key`
    fn remember(&mut self, key: K, value: V);
}

impl<K, V> Memo<K, V> for RecencyCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn recall(&mut self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn remember(&mut self, key: K, value: V) {
        self.put(key, value);
    }
}

impl<K: Ord, V: Clone> Memo<K, V> for SplayTree<K, V> {
    fn recall(&mut self, key: &K) -> Option<V> {
        self.search(key).cloned()
    }

    fn remember(&mut self, key: K, value: V) {
        self.insert(key, value);
    }
}

/// Fibonacci number `n`, memoized in `memo`
///
/// Recursion depth grows with `n` (one frame per index).
pub fn fibonacci_memo<M>(n: u64, memo: &mut M) -> BigUint
where
    M: Memo<u64, BigUint> + ?Sized,
{
    if n < 2 {
        return BigUint::from(n);
    }
    if let Some(value) = memo.recall(&n) {
        return value;
    }

    let value = fibonacci_memo(n - 1, memo) + fibonacci_memo(n - 2, memo);
    memo.remember(n, value.clone());
    value
}

/// Fibonacci number `n` memoized in a recency cache
pub fn fibonacci_lru(n: u64, cache: &mut RecencyCache<u64, BigUint>) -> BigUint {
    fibonacci_memo(n, cache)
}

/// Fibonacci number `n` memoized in a splay tree
pub fn fibonacci_splay(n: u64, tree: &mut SplayTree<u64, BigUint>) -> BigUint {
    fibonacci_memo(n, tree)
}

/// Fibonacci number `n` by iteration, without any memo
pub fn fibonacci_iterative(n: u64) -> BigUint {
    let mut a = BigUint::from(0u32);
    let mut b = BigUint::from(1u32);
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    a
}
