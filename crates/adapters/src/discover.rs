// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task and view discovery from definition files on disk.
//!
//! Definitions live in `*.task.toml` and `*.view.toml` files. Paths inside
//! a definition are resolved relative to the definition file's directory.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use studio_core::{TaskConfig, ViewConfig};
use thiserror::Error;
use tracing::{debug, warn};

/// Suffix of task definition files
pub const TASK_DEFINITION_SUFFIX: &str = ".task.toml";
/// Suffix of view definition files
pub const VIEW_DEFINITION_SUFFIX: &str = ".view.toml";

/// Directories never searched for definitions or watched for changes.
pub const IGNORED_DIRECTORIES: &[&str] =
    &["node_modules", ".git", "target", "__pycache__", ".venv", "dist"];

/// Source extensions whose changes can affect a task or view entrypoint.
const SOURCE_EXTENSIONS: &[&str] = &["py", "js", "jsx", "ts", "tsx", "sh", "sql"];

/// Errors from discovery
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("discovery task failed: {0}")]
    Join(String),
}

/// Task and view definitions found beneath a set of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    pub tasks: Vec<TaskConfig>,
    pub views: Vec<ViewConfig>,
}

/// Finds task and view definitions at or beneath filesystem paths.
#[async_trait]
pub trait Discoverer: Send + Sync + 'static {
    async fn discover(&self, paths: &[PathBuf]) -> Result<Discovered, DiscoverError>;
}

/// True for paths inside a directory that is never discovered or watched.
pub fn is_ignored(path: &Path) -> bool {
    path.components().any(|c| match c {
        std::path::Component::Normal(name) => {
            name.to_str().is_some_and(|n| IGNORED_DIRECTORIES.contains(&n))
        }
        _ => false,
    })
}

/// True for files whose changes the studio reacts to: definition files,
/// `.toml` config files, and task/view source files.
pub fn is_watched_path(path: &Path) -> bool {
    if is_ignored(path) {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    if name.ends_with(".toml") {
        return true;
    }
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

#[derive(Debug, Deserialize)]
struct TaskManifest {
    slug: String,
    name: Option<String>,
    #[serde(default)]
    kind: String,
    entrypoint: PathBuf,
    #[serde(default)]
    resources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ViewManifest {
    slug: String,
    name: Option<String>,
    entrypoint: PathBuf,
    root: Option<PathBuf>,
    #[serde(default)]
    command: Vec<String>,
}

/// Discoverer reading `*.task.toml` / `*.view.toml` manifests.
///
/// Malformed manifests are logged and skipped so one bad file cannot hide
/// every other definition under the same directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManifestDiscoverer;

impl ManifestDiscoverer {
    pub fn new() -> Self {
        Self
    }

    fn discover_blocking(paths: &[PathBuf]) -> Result<Discovered, DiscoverError> {
        let mut files = Vec::new();
        for path in paths {
            if is_ignored(path) {
                continue;
            }
            if path.is_dir() {
                collect_definition_files(path, &mut files)?;
            } else if path.is_file() {
                files.push(path.clone());
            } else {
                debug!(path = %path.display(), "skipping missing path");
            }
        }
        files.sort();
        files.dedup();

        let mut found = Discovered::default();
        for file in &files {
            let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if name.ends_with(TASK_DEFINITION_SUFFIX) {
                if let Some(task) = parse_task(file) {
                    found.tasks.push(task);
                }
            } else if name.ends_with(VIEW_DEFINITION_SUFFIX) {
                if let Some(view) = parse_view(file) {
                    found.views.push(view);
                }
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl Discoverer for ManifestDiscoverer {
    async fn discover(&self, paths: &[PathBuf]) -> Result<Discovered, DiscoverError> {
        let paths = paths.to_vec();
        tokio::task::spawn_blocking(move || Self::discover_blocking(&paths))
            .await
            .map_err(|e| DiscoverError::Join(e.to_string()))?
    }
}

fn collect_definition_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), DiscoverError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|source| DiscoverError::Io { path: dir.to_path_buf(), source })?;
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || IGNORED_DIRECTORIES.contains(&name.as_ref()) {
            continue;
        }
        if path.is_dir() {
            // Unreadable subdirectories are skipped, not fatal
            if let Err(e) = collect_definition_files(&path, out) {
                warn!(error = %e, "skipping directory");
            }
        } else if name.ends_with(TASK_DEFINITION_SUFFIX) || name.ends_with(VIEW_DEFINITION_SUFFIX) {
            out.push(path);
        }
    }
    Ok(())
}

fn read_manifest<T: serde::de::DeserializeOwned>(file: &Path) -> Option<T> {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %file.display(), error = %e, "failed to read definition");
            return None;
        }
    };
    match toml::from_str(&text) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!(path = %file.display(), error = %e, "skipping malformed definition");
            None
        }
    }
}

/// Join `path` onto `base` and fold `.` and `..` lexically, so resolved
/// paths compare equal to the paths the watcher reports.
fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };
    let mut clean = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !clean.pop() && !clean.has_root() {
                    clean.push(component);
                }
            }
            other => clean.push(other),
        }
    }
    clean
}

fn parse_task(file: &Path) -> Option<TaskConfig> {
    let manifest: TaskManifest = read_manifest(file)?;
    let base = file.parent().unwrap_or(Path::new("."));
    Some(TaskConfig {
        name: manifest.name.unwrap_or_else(|| manifest.slug.clone()),
        slug: manifest.slug,
        kind: manifest.kind,
        defn_file_path: file.to_path_buf(),
        entrypoint: resolve(base, &manifest.entrypoint),
        resources: manifest.resources,
    })
}

fn parse_view(file: &Path) -> Option<ViewConfig> {
    let manifest: ViewManifest = read_manifest(file)?;
    let base = file.parent().unwrap_or(Path::new("."));
    Some(ViewConfig {
        name: manifest.name.unwrap_or_else(|| manifest.slug.clone()),
        slug: manifest.slug,
        defn_file_path: file.to_path_buf(),
        entrypoint: resolve(base, &manifest.entrypoint),
        root: manifest.root.map(|r| resolve(base, &r)).unwrap_or_else(|| base.to_path_buf()),
        command: manifest.command,
    })
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{DiscoverError, Discovered, Discoverer};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use std::sync::Arc;

    struct FakeDiscoverState {
        result: Result<Discovered, String>,
        calls: Vec<Vec<PathBuf>>,
    }

    /// Fake discoverer returning a canned result and recording every call.
    #[derive(Clone)]
    pub struct FakeDiscoverer {
        inner: Arc<Mutex<FakeDiscoverState>>,
    }

    impl Default for FakeDiscoverer {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeDiscoverState {
                    result: Ok(Discovered::default()),
                    calls: Vec::new(),
                })),
            }
        }
    }

    impl FakeDiscoverer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set what the next discoveries return
        pub fn set_result(&self, found: Discovered) {
            self.inner.lock().result = Ok(found);
        }

        /// Make the next discoveries fail
        pub fn set_error(&self, message: impl Into<String>) {
            self.inner.lock().result = Err(message.into());
        }

        /// Path sets passed to each discovery, in call order
        pub fn calls(&self) -> Vec<Vec<PathBuf>> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl Discoverer for FakeDiscoverer {
        async fn discover(&self, paths: &[PathBuf]) -> Result<Discovered, DiscoverError> {
            let mut inner = self.inner.lock();
            inner.calls.push(paths.to_vec());
            inner.result.clone().map_err(|message| DiscoverError::Io {
                path: paths.first().cloned().unwrap_or_default(),
                source: std::io::Error::other(message),
            })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDiscoverer;

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;
