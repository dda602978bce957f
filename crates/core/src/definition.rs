// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovered task and view definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A task definition found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub kind: String,
    /// File the definition was read from
    pub defn_file_path: PathBuf,
    /// Source file the task executes
    pub entrypoint: PathBuf,
    /// Resource slugs the task is attached to
    #[serde(default)]
    pub resources: Vec<String>,
}

impl TaskConfig {
    pub fn has_resource_attachments(&self) -> bool {
        !self.resources.is_empty()
    }
}

/// A view definition found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub slug: String,
    pub name: String,
    pub defn_file_path: PathBuf,
    pub entrypoint: PathBuf,
    /// Directory the view's companion dev server runs in
    pub root: PathBuf,
    /// Command that starts the companion dev server
    #[serde(default)]
    pub command: Vec<String>,
}

/// A task definition plus when the studio last (re)loaded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub config: TaskConfig,
    pub updated_at_ms: u64,
}

/// A view definition plus when the studio last (re)loaded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub config: ViewConfig,
    pub updated_at_ms: u64,
}
