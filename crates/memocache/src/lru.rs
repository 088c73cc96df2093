//! Recency cache: fixed-capacity map with least-recently-used eviction
//!
//! Entries live in a slot arena threaded by an index-based doubly-linked
//! list (head = most recently used, tail = least recently used), so get,
//! put and eviction are O(1) on average.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU cache with fixed capacity
pub struct RecencyCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    capacity: usize,
}

impl<K, V> RecencyCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty cache holding at most `capacity` entries
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Look up `key`, marking it most recently used on a hit
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Look up `key` without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Check whether `key` is cached (does not touch recency)
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or overwrite `key`, making it most recently used
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(node) = &mut self.nodes[idx] {
                node.value = value;
            }
            self.move_to_front(idx);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.map.insert(key, idx);
        evicted
    }

    /// Remove `key` from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.release(idx).map(|node| node.value)
    }

    /// Remove every entry whose key satisfies `predicate`
    ///
    /// Scans the whole cache. Returns the number of entries removed.
    pub fn invalidate<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let doomed: Vec<usize> = self
            .map
            .iter()
            .filter(|(key, _)| predicate(*key))
            .map(|(_, &idx)| idx)
            .collect();

        for &idx in &doomed {
            if let Some(node) = self.release(idx) {
                self.map.remove(&node.key);
            }
        }
        doomed.len()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    /// Unlink the slot and hand it back to the free list.
    /// The map entry must be removed by the caller.
    fn release(&mut self, idx: usize) -> Option<Node<K, V>> {
        // unlink reads the slot, so it has to run before take()
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        Some(node)
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let tail_idx = self.tail?;
        let node = self.release(tail_idx)?;
        self.map.remove(&node.key);
        Some((node.key, node.value))
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }
}

/// Iterator over cache keys in recency order, see [`RecencyCache::keys`]
pub struct Keys<'a, K, V> {
    nodes: &'a [Option<Node<K, V>>],
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some(&node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_basic() {
        let mut cache = RecencyCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = RecencyCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        let evicted = cache.put(3, "c");

        assert_eq!(evicted, Some((1, "a")));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn test_lru_get_promotes() {
        let mut cache = RecencyCache::new(2);

        cache.put("A", 1);
        cache.put("B", 2);
        cache.get(&"A");
        cache.put("C", 3); // B is least recently used

        assert!(cache.contains(&"A"));
        assert!(!cache.contains(&"B"));
        assert!(cache.contains(&"C"));
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["C", "A"]);
    }

    #[test]
    fn test_lru_peek_does_not_promote() {
        let mut cache = RecencyCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.peek(&1), Some(&"a"));
        cache.put(3, "c");

        assert_eq!(cache.peek(&1), None);
        assert_eq!(cache.peek(&2), Some(&"b"));
    }

    #[test]
    fn test_lru_capacity_invariant() {
        let mut cache = RecencyCache::new(3);

        for i in 0..50u32 {
            cache.put(i % 7, i);
            if i % 3 == 0 {
                cache.get(&(i % 5));
            }
            assert!(cache.len() <= cache.capacity());
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.keys().count(), 3);
    }

    #[test]
    fn test_lru_repeated_eviction_keeps_list_consistent() {
        let mut cache = RecencyCache::new(2);

        for i in 0..10 {
            cache.put(i, i * 10);
        }

        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![9, 8]);
        assert_eq!(cache.get(&8), Some(&80));
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![8, 9]);
    }

    #[test]
    fn test_lru_remove() {
        let mut cache = RecencyCache::new(3);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.remove(&2), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_lru_invalidate() {
        let mut cache = RecencyCache::new(5);

        for i in 0..5 {
            cache.put(i, i);
        }

        assert_eq!(cache.invalidate(|k| k % 2 == 0), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![3, 1]);

        // Nothing left to match
        assert_eq!(cache.invalidate(|k| k % 2 == 0), 0);

        // Freed slots are reused without breaking capacity
        for i in 10..14 {
            cache.put(i, i);
        }
        assert_eq!(cache.len(), 5);
        assert!(!cache.contains(&1));
    }

    #[test]
    fn test_lru_clear() {
        let mut cache = RecencyCache::new(3);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.clear();

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.keys().count(), 0);
    }

    #[test]
    fn test_lru_overwrite() {
        let mut cache = RecencyCache::new(2);

        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.put(1, "z"), None);
        cache.put(3, "c"); // 2 is least recently used

        assert_eq!(cache.get(&1), Some(&"z"));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than 0")]
    fn test_lru_zero_capacity() {
        let _ = RecencyCache::<u32, u32>::new(0);
    }
}
