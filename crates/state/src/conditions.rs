// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Problems with a task shown next to it in the studio.

use serde::{Deserialize, Serialize};
use studio_core::TaskConfig;

use crate::dev_config::DevConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionLevel {
    Warning,
    Error,
}

/// One problem found with a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCondition {
    pub level: ConditionLevel,
    /// Display name of the task
    pub name: String,
    pub reason: String,
}

/// Conditions derived from `task` against the current dev config.
///
/// Missing resource attachments are reported in slug order.
pub fn evaluate(task: &TaskConfig, dev_config: &DevConfig) -> Vec<TaskCondition> {
    let mut missing: Vec<&str> = task
        .resources
        .iter()
        .map(String::as_str)
        .filter(|slug| !dev_config.has_resource(slug))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    missing
        .into_iter()
        .map(|slug| TaskCondition {
            level: ConditionLevel::Warning,
            name: task.name.clone(),
            reason: format!("Attached resource {slug:?} not found in dev config file."),
        })
        .collect()
}

#[cfg(test)]
#[path = "conditions_tests.rs"]
mod tests;
