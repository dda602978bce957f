// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The studio context: every store, cache, and collaborator the request
//! handlers and the filesystem watcher share.
//!
//! Built once at startup and handed around as `Arc<Studio>`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use studio_adapters::Discoverer;
use studio_core::{Clock, RunId, TaskState, ViewState};
use tracing::{error, info};

use crate::conditions::{self, TaskCondition};
use crate::debounce::{DebounceOpts, Debouncer};
use crate::dev_config::{DevConfig, DEV_CONFIG_FILE_NAME};
use crate::discovery::ReloadTrigger;
use crate::error::StateError;
use crate::logs::LogBroker;
use crate::runs::RunStore;
use crate::store::Store;
use crate::views::{ViewProcesses, DEFAULT_VIEW_CAPACITY};

/// Whether the initial discovery has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    #[default]
    Discovering,
    Ready,
}

studio_core::simple_display! {
    ServerStatus {
        Discovering => "discovering",
        Ready => "ready",
    }
}

/// Settings fixed for the lifetime of a [`Studio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// Directory tasks and views are discovered under
    pub root: PathBuf,
    pub dev_config_path: PathBuf,
    /// Debounce applied per changed path before reconciling
    pub debounce: DebounceOpts,
    pub view_capacity: usize,
}

impl StudioConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            dev_config_path: root.join(DEV_CONFIG_FILE_NAME),
            root,
            debounce: DebounceOpts::default(),
            view_capacity: DEFAULT_VIEW_CAPACITY,
        }
    }
}

pub struct Studio {
    pub tasks: Store<String, TaskState>,
    pub views: Store<String, ViewState>,
    /// Cached per-task conditions, cleared on every reconciliation
    pub conditions: Store<String, Vec<TaskCondition>>,
    pub runs: RunStore,
    /// One broker per run
    pub logs: Store<RunId, Arc<LogBroker>>,
    pub view_processes: ViewProcesses,
    pub(crate) debouncers: Store<PathBuf, Debouncer<ReloadTrigger>>,
    pub(crate) dev_config: RwLock<DevConfig>,
    pub(crate) discoverer: Arc<dyn Discoverer>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: StudioConfig,
    status: RwLock<ServerStatus>,
}

impl Studio {
    /// Build the context, loading the dev config if one exists.
    pub fn new(
        config: StudioConfig,
        discoverer: Arc<dyn Discoverer>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let dev_config = DevConfig::load(&config.dev_config_path).unwrap_or_else(|e| {
            error!(error = %e, "loading dev config file");
            DevConfig::default()
        });
        Arc::new(Self {
            tasks: Store::new(),
            views: Store::new(),
            conditions: Store::new(),
            runs: RunStore::new(),
            logs: Store::new(),
            view_processes: ViewProcesses::new(config.view_capacity),
            debouncers: Store::new(),
            dev_config: RwLock::new(dev_config),
            discoverer,
            clock,
            config,
            status: RwLock::new(ServerStatus::Discovering),
        })
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn status(&self) -> ServerStatus {
        *self.status.read()
    }

    pub fn set_status(&self, status: ServerStatus) {
        let mut current = self.status.write();
        let from = *current;
        if from != status {
            info!(%from, to = %status, "server status changed");
            *current = status;
        }
    }

    /// Snapshot of the current dev config
    pub fn dev_config(&self) -> DevConfig {
        self.dev_config.read().clone()
    }

    /// Re-read the dev config file; on failure the previous config stays.
    pub fn reload_dev_config(&self) {
        match DevConfig::load(&self.config.dev_config_path) {
            Ok(config) => *self.dev_config.write() = config,
            Err(e) => error!(error = %e, "loading dev config file"),
        }
    }

    /// Create and register the log broker for a new run.
    pub fn new_broker(&self, run_id: &RunId) -> Arc<LogBroker> {
        self.logs.get_or_insert_with(run_id.clone(), || Arc::new(LogBroker::new()))
    }

    pub fn broker(&self, run_id: &str) -> Option<Arc<LogBroker>> {
        self.logs.get(run_id)
    }

    /// Conditions for a discovered task, computed once per reconciliation.
    pub fn task_conditions(&self, slug: &str) -> Result<Vec<TaskCondition>, StateError> {
        if let Some(cached) = self.conditions.get(slug) {
            return Ok(cached);
        }
        let task =
            self.tasks.get(slug).ok_or_else(|| StateError::TaskNotFound(slug.to_string()))?;
        let found = conditions::evaluate(&task.config, &self.dev_config.read());
        self.conditions.add(slug.to_string(), found.clone());
        Ok(found)
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("root", &self.config.root)
            .field("status", &self.status())
            .field("tasks", &self.tasks.len())
            .field("views", &self.views.len())
            .field("runs", &self.runs.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "studio_tests.rs"]
mod tests;
