// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge from filesystem notifications to the studio's reconciler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use studio_adapters::{is_ignored, is_watched_path};
use studio_state::Studio;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Buffered changes between the notify thread and the forwarding task
const CHANGE_BUFFER: usize = 256;

/// A path to reconcile, with its previous location for renames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: PathBuf,
    pub old_path: Option<PathBuf>,
}

impl Change {
    fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), old_path: None }
    }
}

/// Translate one notify event into reconciler changes.
///
/// Removals and moves out of the tree reload all of `root`, since whatever
/// was defined there must disappear. A rename with both ends known reloads
/// the new path and drops definitions from the old one.
pub fn changes(event: &NotifyEvent, root: &Path) -> Vec<Change> {
    match event.kind {
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            if event.paths.iter().any(|p| !is_ignored(p)) {
                vec![Change::at(root)]
            } else {
                Vec::new()
            }
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
            [from, to] if is_watched_path(to) => {
                vec![Change { path: to.clone(), old_path: Some(from.clone()) }]
            }
            [from, _] if is_watched_path(from) => vec![Change::at(root)],
            _ => Vec::new(),
        },
        EventKind::Create(_) | EventKind::Modify(_) => {
            event.paths.iter().filter(|p| is_watched_path(p)).map(Change::at).collect()
        }
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

/// Recursive watch on the studio root feeding [`Studio::reload_path`].
pub struct StudioWatcher {
    // Dropping the watcher stops notifications
    _watcher: RecommendedWatcher,
    forward: JoinHandle<()>,
}

impl StudioWatcher {
    /// Start watching. Must be called within a tokio runtime.
    pub fn start(studio: Arc<Studio>) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel(CHANGE_BUFFER);
        let root = studio.root().to_path_buf();

        let event_root = root.clone();
        let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, _>| {
            match res {
                Ok(event) => {
                    for change in changes(&event, &event_root) {
                        // The receiver only goes away at shutdown
                        let _ = tx.blocking_send(change);
                    }
                }
                Err(e) => warn!(error = %e, "file watcher error"),
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        debug!(root = %root.display(), "watching for changes");

        let forward = tokio::spawn(forward(studio, rx));
        Ok(Self { _watcher: watcher, forward })
    }

    /// Stop watching and drop any changes not yet forwarded.
    pub fn stop(self) {
        self.forward.abort();
    }
}

impl std::fmt::Debug for StudioWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioWatcher").finish_non_exhaustive()
    }
}

async fn forward(studio: Arc<Studio>, mut rx: mpsc::Receiver<Change>) {
    while let Some(change) = rx.recv().await {
        if let Err(e) = studio.reload_path(&change.path, change.old_path.as_deref()).await {
            warn!(path = %change.path.display(), error = %e, "reloading changed path");
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
