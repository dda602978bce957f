// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run log lines and the sink executors write them to.

use serde::{Deserialize, Serialize};

/// Severity of a log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
    Warning,
    Error,
}

crate::simple_display! {
    LogLevel {
        Info => "info",
        Debug => "debug",
        Warning => "warning",
        Error => "error",
    }
}

/// One line of run output. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogItem {
    pub timestamp_ms: u64,
    /// Monotonic per-run sequence, used by clients to de-duplicate
    pub insert_id: String,
    pub text: String,
    pub level: LogLevel,
    pub task_slug: String,
}

impl LogItem {
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, text)
    }

    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms: 0,
            insert_id: String::new(),
            text: text.into(),
            level,
            task_slug: String::new(),
        }
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn for_task(mut self, task_slug: impl Into<String>) -> Self {
        self.task_slug = task_slug.into();
        self
    }
}

/// Destination for a run's log lines.
///
/// Implemented by the per-run log broker; executors only see this trait.
pub trait LogSink: Send + Sync {
    fn record(&self, item: LogItem);
}
