// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task execution adapters.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use studio_core::{Clock, LogItem, LogLevel, LogSink, RunId, SystemClock, TaskConfig};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Errors from task execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("task failed: {0}")]
    Failed(String),

    /// The run failed because cached build state is out of date; the
    /// executor should be refreshed before the next run.
    #[error("stale build: {0}")]
    StaleBuild(String),

    #[error("unsupported task kind: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything an executor needs to run a task once.
#[derive(Clone)]
pub struct RunConfig {
    pub run_id: RunId,
    pub task: TaskConfig,
    pub param_values: Map<String, Value>,
    pub env: HashMap<String, String>,
    /// Where the run's output lines go
    pub logs: Arc<dyn LogSink>,
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("run_id", &self.run_id)
            .field("task", &self.task.slug)
            .finish_non_exhaustive()
    }
}

/// Runs tasks. Supplied by the host; the studio only schedules.
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Execute a task to completion, returning its outputs.
    async fn execute(&self, config: RunConfig) -> Result<Value, ExecuteError>;

    /// Drop any cached build state.
    async fn refresh(&self) -> Result<(), ExecuteError>;
}

/// Executes a task's entrypoint with the interpreter matching its kind,
/// `sh` when the kind is unset.
///
/// stdout and stderr lines stream into the run's log sink; the last stdout
/// line, parsed as JSON, becomes the run's outputs (null if it isn't JSON).
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }

    fn interpreter(kind: &str) -> Option<&'static str> {
        match kind {
            "" | "shell" | "sh" => Some("sh"),
            "python" => Some("python3"),
            "node" => Some("node"),
            _ => None,
        }
    }
}

#[async_trait]
impl Executor for ShellExecutor {
    async fn execute(&self, config: RunConfig) -> Result<Value, ExecuteError> {
        let interpreter = Self::interpreter(&config.task.kind)
            .ok_or_else(|| ExecuteError::Unsupported(config.task.kind.clone()))?;

        let mut cmd = Command::new(interpreter);
        cmd.arg(&config.task.entrypoint)
            .envs(&config.env)
            .env("STUDIO_RUN_ID", config.run_id.as_str())
            .env("STUDIO_PARAMS", Value::Object(config.param_values.clone()).to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = config.task.entrypoint.parent() {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn()?;
        let stdout = child.stdout.take().ok_or_else(|| ExecuteError::Failed("no stdout".into()))?;
        let stderr = child.stderr.take().ok_or_else(|| ExecuteError::Failed("no stderr".into()))?;
        let mut stdout = BufReader::new(stdout).lines();
        let mut stderr = BufReader::new(stderr).lines();

        let clock = SystemClock;
        let slug = config.task.slug.clone();
        let emit = |level: LogLevel, text: String| {
            config.logs.record(LogItem::new(level, text).at(clock.epoch_ms()).for_task(&slug));
        };

        let mut last_line: Option<String> = None;
        let (mut out_open, mut err_open) = (true, true);
        while out_open || err_open {
            tokio::select! {
                line = stdout.next_line(), if out_open => match line? {
                    Some(line) => {
                        emit(LogLevel::Info, line.clone());
                        last_line = Some(line);
                    }
                    None => out_open = false,
                },
                line = stderr.next_line(), if err_open => match line? {
                    Some(line) => emit(LogLevel::Error, line),
                    None => err_open = false,
                },
            }
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(last_line
                .and_then(|line| serde_json::from_str(line.trim()).ok())
                .unwrap_or(Value::Null))
        } else {
            Err(ExecuteError::Failed(format!("{} exited with {}", config.task.slug, status)))
        }
    }

    async fn refresh(&self) -> Result<(), ExecuteError> {
        // Nothing is cached between runs
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ExecuteError, Executor, RunConfig};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use studio_core::LogItem;

    /// Scripted outcome of a fake execution
    #[derive(Debug, Clone)]
    pub enum FakeOutcome {
        Succeed(Value),
        Fail(String),
        Stale(String),
        /// Never finish; the run must be cancelled
        Hang,
    }

    struct FakeExecutorState {
        outcome: FakeOutcome,
        log_lines: Vec<String>,
        delay: Option<Duration>,
        executed: Vec<String>,
        refreshes: usize,
    }

    /// Fake executor with a scripted outcome.
    #[derive(Clone)]
    pub struct FakeExecutor {
        inner: Arc<Mutex<FakeExecutorState>>,
    }

    impl Default for FakeExecutor {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeExecutorState {
                    outcome: FakeOutcome::Succeed(Value::Null),
                    log_lines: Vec::new(),
                    delay: None,
                    executed: Vec::new(),
                    refreshes: 0,
                })),
            }
        }
    }

    impl FakeExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_outcome(&self, outcome: FakeOutcome) {
            self.inner.lock().outcome = outcome;
        }

        /// Lines recorded into the run's log sink before finishing
        pub fn set_log_lines(&self, lines: &[&str]) {
            self.inner.lock().log_lines = lines.iter().map(|l| l.to_string()).collect();
        }

        /// Sleep before finishing
        pub fn set_delay(&self, delay: Duration) {
            self.inner.lock().delay = Some(delay);
        }

        /// Slugs of executed tasks, in call order
        pub fn executed(&self) -> Vec<String> {
            self.inner.lock().executed.clone()
        }

        pub fn refreshes(&self) -> usize {
            self.inner.lock().refreshes
        }
    }

    #[async_trait]
    impl Executor for FakeExecutor {
        async fn execute(&self, config: RunConfig) -> Result<Value, ExecuteError> {
            let (outcome, lines, delay) = {
                let mut inner = self.inner.lock();
                inner.executed.push(config.task.slug.clone());
                (inner.outcome.clone(), inner.log_lines.clone(), inner.delay)
            };
            for line in lines {
                config.logs.record(LogItem::info(line).for_task(&config.task.slug));
            }
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match outcome {
                FakeOutcome::Succeed(outputs) => Ok(outputs),
                FakeOutcome::Fail(message) => Err(ExecuteError::Failed(message)),
                FakeOutcome::Stale(message) => Err(ExecuteError::StaleBuild(message)),
                FakeOutcome::Hang => std::future::pending().await,
            }
        }

        async fn refresh(&self) -> Result<(), ExecuteError> {
            self.inner.lock().refreshes += 1;
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeExecutor, FakeOutcome};

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
