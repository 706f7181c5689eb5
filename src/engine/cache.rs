//! Small bounded cache for derived, recomputable values.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A fixed-capacity map with least-recently-used eviction.
///
/// Holds derived values (fight id to experience awarded) that can always be
/// recomputed from a persisted record, so eviction never loses information.
#[derive(Debug, Clone)]
pub struct BoundedCache<K: Eq + Hash + Clone, V> {
    capacity: usize,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        BoundedCache {
            capacity: capacity.max(1),
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.order.retain(|k| *k != key);
        } else if self.map.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.map.remove(&evicted);
            }
        }
        self.order.push_back(key);
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.map.contains_key(key) {
            self.order.retain(|k| k != key);
            self.order.push_back(key.clone());
        }
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedCache;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = BoundedCache::new(2);
        cache.insert(1u64, "a");
        cache.insert(2, "b");
        // touch 1 so 2 becomes the eviction candidate
        assert_eq!(cache.get(&1), Some(&"a"));
        cache.insert(3, "c");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&3), Some(&"c"));
    }

    #[test]
    fn reinsert_refreshes_without_growing() {
        let mut cache = BoundedCache::new(2);
        cache.insert(1u64, "a");
        cache.insert(1, "b");
        cache.insert(2, "c");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(&"b"));
    }
}
