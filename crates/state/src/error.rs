// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use studio_core::{RunId, SleepId};
use thiserror::Error;

/// Errors surfaced by the studio state to request handlers.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("run with id {0:?} not found")]
    RunNotFound(RunId),

    #[error("task {0:?} not found")]
    TaskNotFound(String),

    #[error("view {0:?} not found")]
    ViewNotFound(String),

    #[error("sleep {sleep_id:?} not found in run {run_id:?}")]
    SleepNotFound { run_id: RunId, sleep_id: SleepId },

    #[error("describing {path}: {source}")]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Rejected(String),
}
