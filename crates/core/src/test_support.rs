// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Run, RunId, Sleep, SleepId, TaskConfig, ViewConfig};
use std::path::PathBuf;

// ── Proptest strategies ─────────────────────────────────────────────────

pub mod strategies {
    use crate::run::RunStatus;
    use proptest::prelude::*;

    pub fn arb_run_status() -> impl Strategy<Value = RunStatus> {
        prop_oneof![
            Just(RunStatus::Pending),
            Just(RunStatus::Running),
            Just(RunStatus::Succeeded),
            Just(RunStatus::Failed),
            Just(RunStatus::Cancelled),
        ]
    }

    /// Short keys so generated operation sequences collide often.
    pub fn arb_key() -> impl Strategy<Value = String> {
        "[a-e]{1,2}"
    }
}

// ── Definition factories ────────────────────────────────────────────────

/// A task defined in `<dir>/<slug>.task.toml` running `<dir>/<slug>.py`.
pub fn task_config(slug: &str, dir: &str) -> TaskConfig {
    TaskConfig {
        slug: slug.to_string(),
        name: slug.replace('_', " "),
        kind: "python".to_string(),
        defn_file_path: PathBuf::from(dir).join(format!("{slug}.task.toml")),
        entrypoint: PathBuf::from(dir).join(format!("{slug}.py")),
        resources: Vec::new(),
    }
}

/// A view defined in `<dir>/<slug>.view.toml` rooted at `dir`.
pub fn view_config(slug: &str, dir: &str) -> ViewConfig {
    ViewConfig {
        slug: slug.to_string(),
        name: slug.replace('_', " "),
        defn_file_path: PathBuf::from(dir).join(format!("{slug}.view.toml")),
        entrypoint: PathBuf::from(dir).join(format!("{slug}.tsx")),
        root: PathBuf::from(dir),
        command: vec!["npx".to_string(), "vite".to_string()],
    }
}

// ── Run factories ───────────────────────────────────────────────────────

pub fn child_run(task_slug: &str, parent: &RunId) -> Run {
    Run::builder().task_slug(task_slug).parent_id(parent.clone()).build()
}

pub fn sleep_for(run_id: &RunId, id: &str, duration_ms: u64) -> Sleep {
    Sleep {
        id: SleepId::from_string(id),
        run_id: run_id.clone(),
        duration_ms,
        created_at_ms: 1_000_000,
        until_ms: 1_000_000 + duration_ms,
        skipped_at_ms: None,
        skipped_by: None,
    }
}
