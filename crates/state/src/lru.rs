// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded least-recently-used cache with an eviction hook.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Callback run with every entry leaving the cache.
pub type EvictFn<K, V> = Box<dyn FnMut(K, V) + Send>;

/// The operations the view process cache relies on.
///
/// Any bounded cache providing these can back [`crate::ViewProcesses`].
pub trait EvictingCache<K, V>: Send {
    /// Insert as most recently used. May evict the least recently used entry.
    fn add(&mut self, key: K, value: V);

    /// Look up and promote to most recently used.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Explicitly evict `key`. Returns whether it was present.
    fn remove(&mut self, key: &K) -> bool;

    /// Install the callback run for every evicted entry.
    fn on_evict(&mut self, callback: EvictFn<K, V>);

    fn keys(&self) -> Vec<K>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct LruEntry<V> {
    value: V,
    last_access: u64,
}

/// Capacity-bounded LRU cache tracking recency with an access counter.
///
/// Every entry that leaves the cache (capacity eviction, explicit removal, or
/// replacement under the same key) is passed to the eviction callback exactly
/// once, after it has been detached from the map.
pub struct LruCache<K, V> {
    entries: HashMap<K, LruEntry<V>>,
    capacity: usize,
    access_counter: u64,
    on_evict: Option<EvictFn<K, V>>,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// A cache holding at most `capacity` entries (minimum one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity: capacity.max(1),
            access_counter: 0,
            on_evict: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Look up without promoting
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Evict every entry for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) {
        let doomed: Vec<K> = self
            .entries
            .iter()
            .filter(|(k, e)| !keep(k, &e.value))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed {
            self.evict(&key);
        }
    }

    /// Evict everything
    pub fn clear(&mut self) {
        self.retain(|_, _| false);
    }

    fn tick(&mut self) -> u64 {
        self.access_counter += 1;
        self.access_counter
    }

    fn evict(&mut self, key: &K) -> bool {
        match self.entries.remove_entry(key) {
            Some((key, entry)) => {
                if let Some(on_evict) = self.on_evict.as_mut() {
                    on_evict(key, entry.value);
                }
                true
            }
            None => false,
        }
    }

    fn evict_lru(&mut self) {
        let oldest = self.entries.iter().min_by_key(|(_, e)| e.last_access);
        if let Some(key) = oldest.map(|(k, _)| k.clone()) {
            self.evict(&key);
        }
    }
}

impl<K, V> EvictingCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send,
{
    fn add(&mut self, key: K, value: V) {
        let last_access = self.tick();
        self.evict(&key);
        while self.entries.len() >= self.capacity {
            self.evict_lru();
        }
        self.entries.insert(key, LruEntry { value, last_access });
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.tick();
        let entry = self.entries.get_mut(key)?;
        entry.last_access = now;
        Some(&entry.value)
    }

    fn remove(&mut self, key: &K) -> bool {
        self.evict(key)
    }

    fn on_evict(&mut self, callback: EvictFn<K, V>) {
        self.on_evict = Some(callback);
    }

    fn keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "lru_tests.rs"]
mod tests;
