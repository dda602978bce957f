// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::{startup, Adapters};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use studio_state::{DebounceOpts, StateError, StudioConfig};
use thiserror::Error;
use tracing::info;

use crate::context::HandlerCtx;
use crate::env;
use crate::watcher::StudioWatcher;

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory tasks and views are discovered under
    pub root: PathBuf,
    /// Dev config file (resources and env)
    pub dev_config_path: PathBuf,
    /// Root state directory (e.g. ~/.local/state/studio)
    pub state_dir: PathBuf,
    /// Directory the daily-rolled daemon log lives in
    pub log_dir: PathBuf,
    pub debounce: DebounceOpts,
    pub view_capacity: usize,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let root = env::studio_dir()?;
        let state_dir = env::state_dir()?;
        Ok(Self {
            dev_config_path: env::dev_config_path(&root),
            root,
            log_dir: state_dir.join("logs"),
            state_dir,
            debounce: DebounceOpts::with_default_max_wait(env::debounce_delay()),
            view_capacity: env::view_capacity(),
        })
    }

    /// Settings for the studio context built from this config.
    pub fn studio_config(&self) -> StudioConfig {
        StudioConfig {
            root: self.root.clone(),
            dev_config_path: self.dev_config_path.clone(),
            debounce: self.debounce,
            view_capacity: self.view_capacity,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    /// Shared with every request handler
    pub ctx: Arc<HandlerCtx>,
    /// Taken at shutdown
    watcher: Option<StudioWatcher>,
    pub start_time: Instant,
}

impl DaemonState {
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Stop watching, cancel in-flight runs, and release every view
    /// companion process.
    pub fn shutdown(mut self) {
        info!(uptime_secs = self.start_time.elapsed().as_secs(), "shutting down");
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
        for (run_id, cancel) in self.ctx.active_runs.items() {
            info!(%run_id, "cancelling run at shutdown");
            cancel.cancel();
        }
        self.ctx.studio.view_processes.clear();
    }
}

impl std::fmt::Debug for DaemonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonState")
            .field("config", &self.config)
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory (HOME and XDG_STATE_HOME unset)")]
    NoStateDir,

    #[error("Studio directory {0} does not exist")]
    NoStudioDir(PathBuf),

    #[error("Failed to watch studio directory: {0}")]
    Watch(#[from] notify::Error),

    #[error("Initial discovery failed: {0}")]
    Discover(#[from] StateError),

    #[error("Failed to install log subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
