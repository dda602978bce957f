// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency-safe key/value store.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

/// A map guarded by a single lock.
///
/// Writes are last-writer-wins. Callers that need an atomic
/// read-modify-write use a store with an `update` primitive instead
/// (see [`crate::RunStore`]).
#[derive(Debug)]
pub struct Store<K, V> {
    items: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for Store<K, V> {
    fn default() -> Self {
        Self { items: RwLock::new(HashMap::new()) }
    }
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: HashMap<K, V>) -> Self {
        Self { items: RwLock::new(items) }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.read().get(key).cloned()
    }

    /// Insert or overwrite
    pub fn add(&self, key: K, value: V) {
        self.items.write().insert(key, value);
    }

    /// Return the value under `key`, inserting `make()` first if absent.
    ///
    /// Lookup and insert happen under one write lock, so concurrent callers
    /// for the same key all observe the same value.
    pub fn get_or_insert_with(&self, key: K, make: impl FnOnce() -> V) -> V {
        self.items.write().entry(key).or_insert_with(make).clone()
    }

    /// Remove `key`; absent keys are ignored
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.write().remove(key);
    }

    /// Remove every entry for which `keep` returns false
    pub fn retain(&self, keep: impl FnMut(&K, &mut V) -> bool) {
        self.items.write().retain(keep);
    }

    /// Snapshot copy of all items; iterating it holds no lock.
    pub fn items(&self) -> HashMap<K, V> {
        self.items.read().clone()
    }

    /// Swap out the whole map
    pub fn replace_items(&self, items: HashMap<K, V>) {
        *self.items.write() = items;
    }

    /// Merge `items` in, keeping unrelated keys
    pub fn add_many(&self, items: impl IntoIterator<Item = (K, V)>) {
        self.items.write().extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
