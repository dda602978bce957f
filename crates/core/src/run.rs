// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run records: one execution instance of a task.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

crate::define_id! {
    /// Unique identifier for a run.
    pub struct RunId("run-");

    /// Unique identifier for a sleep within a run.
    pub struct SleepId("slp-");
}

/// Execution status of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl RunStatus {
    /// Terminal runs never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed | RunStatus::Cancelled)
    }
}

crate::simple_display! {
    RunStatus {
        Pending => "pending",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// A pause requested by a running task. Skipping ends it early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sleep {
    pub id: SleepId,
    pub run_id: RunId,
    /// Length of the sleep, for display only
    pub duration_ms: u64,
    pub created_at_ms: u64,
    pub until_ms: u64,
    #[serde(default)]
    pub skipped_at_ms: Option<u64>,
    #[serde(default)]
    pub skipped_by: Option<String>,
}

impl Sleep {
    pub fn is_skipped(&self) -> bool {
        self.skipped_at_ms.is_some()
    }
}

/// A single run of a task, local or remote.
///
/// Owned by the run store; callers only ever see copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    #[serde(default)]
    pub parent_id: Option<RunId>,
    pub task_slug: String,
    #[serde(default)]
    pub task_name: String,
    pub status: RunStatus,
    #[serde(default)]
    pub outputs: Value,
    #[serde(default)]
    pub param_values: Map<String, Value>,
    #[serde(default)]
    pub sleeps: Vec<Sleep>,
    #[serde(default)]
    pub creator_id: String,
    /// Executed by the remote API rather than this process
    #[serde(default)]
    pub remote: bool,
    pub created_at_ms: u64,
    #[serde(default)]
    pub succeeded_at_ms: Option<u64>,
    #[serde(default)]
    pub failed_at_ms: Option<u64>,
    #[serde(default)]
    pub cancelled_at_ms: Option<u64>,
    #[serde(default)]
    pub cancelled_by: Option<String>,
}

impl Run {
    /// A fresh pending run for `task_slug`.
    pub fn new(task_slug: impl Into<String>, created_at_ms: u64) -> Self {
        Self {
            id: RunId::new(),
            parent_id: None,
            task_slug: task_slug.into(),
            task_name: String::new(),
            status: RunStatus::Pending,
            outputs: Value::Null,
            param_values: Map::new(),
            sleeps: Vec::new(),
            creator_id: String::new(),
            remote: false,
            created_at_ms,
            succeeded_at_ms: None,
            failed_at_ms: None,
            cancelled_at_ms: None,
            cancelled_by: None,
        }
    }

    /// Move to `status`, stamping the matching terminal timestamp.
    pub fn transition(&mut self, status: RunStatus, at_ms: u64) {
        self.status = status;
        match status {
            RunStatus::Succeeded => self.succeeded_at_ms = Some(at_ms),
            RunStatus::Failed => self.failed_at_ms = Some(at_ms),
            RunStatus::Cancelled => self.cancelled_at_ms = Some(at_ms),
            RunStatus::Pending | RunStatus::Running => {}
        }
    }

    pub fn sleep_mut(&mut self, sleep_id: &str) -> Option<&mut Sleep> {
        self.sleeps.iter_mut().find(|s| s.id == sleep_id)
    }
}

crate::builder! {
    /// Test builder for [`Run`].
    pub struct RunBuilder => Run {
        into id: RunId = RunId::new(),
        option parent_id: RunId = None,
        into task_slug: String = "my_task",
        into task_name: String = "My task",
        set status: RunStatus = RunStatus::Pending,
        set outputs: Value = Value::Null,
        set param_values: Map<String, Value> = Map::new(),
        set sleeps: Vec<Sleep> = Vec::new(),
        into creator_id: String = "usr-test",
        set remote: bool = false,
        set created_at_ms: u64 = 1_000_000,
        option succeeded_at_ms: u64 = None,
        option failed_at_ms: u64 = None,
        option cancelled_at_ms: u64 = None,
        option cancelled_by: String = None,
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
