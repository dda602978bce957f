// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded cache of running view companion processes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use studio_adapters::ViteContext;
use tracing::{debug, warn};

use crate::lru::{EvictingCache, LruCache};

/// Default number of view processes kept alive at once
pub const DEFAULT_VIEW_CAPACITY: usize = 5;

struct ViewProcessState {
    cache: Box<dyn EvictingCache<String, ViteContext>>,
    /// view slug -> root the process serves
    roots: HashMap<String, PathBuf>,
}

/// Owns the companion process of each recently started view.
///
/// An entry that leaves the cache, by eviction or invalidation, has its
/// process killed and its closer closed exactly once. Cleanup failures are
/// logged and never surface to callers.
pub struct ViewProcesses {
    state: Mutex<ViewProcessState>,
}

impl ViewProcesses {
    pub fn new(capacity: usize) -> Self {
        Self::with_cache(Box::new(LruCache::new(capacity)))
    }

    /// Back the registry with any evicting cache
    pub fn with_cache(mut cache: Box<dyn EvictingCache<String, ViteContext>>) -> Self {
        cache.on_evict(Box::new(release));
        Self { state: Mutex::new(ViewProcessState { cache, roots: HashMap::new() }) }
    }

    /// Cache `context` for `slug`, evicting the least recently used view if
    /// full. Replacing an existing entry releases the old process.
    pub fn add(&self, slug: &str, root: &Path, context: ViteContext) {
        let mut state = self.state.lock();
        state.roots.insert(slug.to_string(), root.to_path_buf());
        state.cache.add(slug.to_string(), context);
        let live = state.cache.keys();
        state.roots.retain(|slug, _| live.contains(slug));
    }

    /// Server URL of the cached process for `slug`
    pub fn get(&self, slug: &str) -> Option<String> {
        self.state.lock().cache.get(&slug.to_string()).map(|ctx| ctx.server_url.clone())
    }

    /// Invalidate `slug`, releasing its process. Returns whether it was cached.
    pub fn remove(&self, slug: &str) -> bool {
        let mut state = self.state.lock();
        state.roots.remove(slug);
        state.cache.remove(&slug.to_string())
    }

    /// Invalidate every view other than `except` whose process serves `root`.
    pub fn remove_sharing_root(&self, root: &Path, except: &str) -> usize {
        let mut state = self.state.lock();
        let sharing: Vec<String> = state
            .roots
            .iter()
            .filter(|(slug, r)| slug.as_str() != except && r.as_path() == root)
            .map(|(slug, _)| slug.clone())
            .collect();
        let mut removed = 0;
        for slug in sharing {
            state.roots.remove(&slug);
            if state.cache.remove(&slug) {
                removed += 1;
            }
        }
        removed
    }

    /// Release every cached process
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.roots.clear();
        for slug in state.cache.keys() {
            state.cache.remove(&slug);
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ViewProcesses {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_CAPACITY)
    }
}

impl std::fmt::Debug for ViewProcesses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewProcesses").field("len", &self.len()).finish()
    }
}

/// Eviction hook: kill, then close. Both are best-effort.
fn release(slug: String, mut context: ViteContext) {
    debug!(view = %slug, pid = ?context.process.id(), "releasing view process");
    if let Err(e) = context.process.kill() {
        warn!(view = %slug, error = %e, "failed to kill view process");
    }
    if let Err(e) = context.closer.close() {
        warn!(view = %slug, error = %e, "failed to close view resources");
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
