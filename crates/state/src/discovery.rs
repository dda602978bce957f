// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciling filesystem changes into the task and view stores.
//!
//! Every changed path gets its own debouncer. When a burst settles, the
//! path and every known definition that could depend on it are
//! re-discovered and merged: a directory change replaces everything, a file
//! change only adds or overwrites what was found.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use studio_adapters::Discovered;
use studio_core::{TaskState, ViewState};
use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::error::StateError;
use crate::studio::{ServerStatus, Studio};

/// One change notification for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadTrigger {
    pub is_dir: bool,
    /// Previous location when the change was a rename
    pub old_path: Option<PathBuf>,
}

/// Paths to re-discover after `path` changed: the path itself plus the
/// definition file of every task or view whose entrypoint is `path`, and of
/// every task with a resource attachment when `path` is the dev config.
///
/// Sorted and free of duplicates.
pub fn paths_to_discover(
    path: &Path,
    tasks: &HashMap<String, TaskState>,
    views: &HashMap<String, ViewState>,
    dev_config_path: &Path,
) -> Vec<PathBuf> {
    let dev_config_changed = path == dev_config_path;
    let mut paths = BTreeSet::from([path.to_path_buf()]);

    for task in tasks.values() {
        let config = &task.config;
        if (dev_config_changed && config.has_resource_attachments()) || config.entrypoint == path {
            paths.insert(config.defn_file_path.clone());
        }
    }
    for view in views.values() {
        if view.config.entrypoint == path {
            paths.insert(view.config.defn_file_path.clone());
        }
    }
    paths.into_iter().collect()
}

impl Studio {
    /// Schedule a reconciliation for `path`.
    ///
    /// Returns once the change is queued; the debounced pass runs later on
    /// a background task. Fails if `path` cannot be stat'ed.
    pub async fn reload_path(
        self: &Arc<Self>,
        path: &Path,
        old_path: Option<&Path>,
    ) -> Result<(), StateError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| StateError::PathNotFound { path: path.to_path_buf(), source })?;
        let trigger =
            ReloadTrigger { is_dir: metadata.is_dir(), old_path: old_path.map(Path::to_path_buf) };

        let debouncer = self.debouncers.get_or_insert_with(path.to_path_buf(), || {
            let studio = Arc::downgrade(self);
            let path = path.to_path_buf();
            Debouncer::spawn(self.config.debounce, move |batch| {
                let studio = studio.clone();
                let path = path.clone();
                async move {
                    if let Some(studio) = studio.upgrade() {
                        studio.reconcile(&path, batch).await;
                    }
                }
            })
        });
        debug!(path = %path.display(), "queued reload");
        debouncer.trigger(trigger);
        Ok(())
    }

    /// Run one reconciliation pass for `path` covering every trigger
    /// collected since the last pass.
    pub async fn reconcile(&self, path: &Path, batch: Vec<ReloadTrigger>) {
        let overwrite = batch.iter().any(|t| t.is_dir);
        let old_paths: BTreeSet<PathBuf> = batch.into_iter().filter_map(|t| t.old_path).collect();

        if path == self.config.dev_config_path {
            self.reload_dev_config();
        }

        let paths = paths_to_discover(
            path,
            &self.tasks.items(),
            &self.views.items(),
            &self.config.dev_config_path,
        );
        let discovered_at = self.clock.epoch_ms();
        let found = match self.discoverer.discover(&paths).await {
            Ok(found) => found,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discovering tasks and views");
                self.conditions.replace_items(HashMap::new());
                return;
            }
        };

        for old in &old_paths {
            self.tasks.retain(|_, t| &t.config.defn_file_path != old);
            self.views.retain(|_, v| &v.config.defn_file_path != old);
        }

        self.register(found, overwrite, discovered_at);
    }

    /// Initial pass over the whole root, replacing whatever is loaded.
    pub async fn discover_all(&self) -> Result<(), StateError> {
        let discovered_at = self.clock.epoch_ms();
        let found = self
            .discoverer
            .discover(&[self.config.root.clone()])
            .await
            .map_err(|e| StateError::Rejected(format!("discovering tasks and views: {e}")))?;
        self.register(found, true, discovered_at);
        Ok(())
    }

    /// Merge discovered definitions into the stores.
    ///
    /// Derived task conditions are always invalidated.
    pub fn register(&self, found: Discovered, overwrite: bool, discovered_at: u64) {
        self.conditions.replace_items(HashMap::new());

        log_loaded("task", found.tasks.iter().map(|t| t.name.as_str()));
        log_loaded("view", found.views.iter().map(|v| v.name.as_str()));

        let tasks: HashMap<String, TaskState> = found
            .tasks
            .into_iter()
            .map(|config| (config.slug.clone(), TaskState { config, updated_at_ms: discovered_at }))
            .collect();
        let views: HashMap<String, ViewState> = found
            .views
            .into_iter()
            .map(|config| (config.slug.clone(), ViewState { config, updated_at_ms: discovered_at }))
            .collect();

        if overwrite {
            self.tasks.replace_items(tasks);
            self.views.replace_items(views);
        } else {
            self.tasks.add_many(tasks);
            self.views.add_many(views);
        }
        self.set_status(ServerStatus::Ready);
    }
}

fn log_loaded<'a>(noun: &str, names: impl ExactSizeIterator<Item = &'a str>) {
    let count = names.len();
    if count == 0 {
        return;
    }
    let noun = if count == 1 { noun.to_string() } else { format!("{noun}s") };
    let names: Vec<&str> = names.collect();
    info!("loaded {noun}: {}", names.join(", "));
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
