// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launching and cancelling local runs.

use std::sync::Arc;

use serde_json::{Map, Value};
use studio_adapters::{ExecuteError, RunConfig};
use studio_core::{LogItem, Run, RunId, RunStatus};
use studio_state::{LogBroker, StateError};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::context::HandlerCtx;

/// Parameters for a new run.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub task_slug: String,
    pub param_values: Map<String, Value>,
    pub parent_id: Option<RunId>,
    pub creator_id: String,
}

impl LaunchRequest {
    pub fn new(task_slug: impl Into<String>) -> Self {
        Self { task_slug: task_slug.into(), ..Self::default() }
    }
}

/// Create a pending run for a discovered task and start executing it in the
/// background. Returns the run as first recorded.
///
/// The run's log broker is registered before execution starts and is
/// closed once the run reaches a terminal status.
pub fn launch_run(ctx: &Arc<HandlerCtx>, request: LaunchRequest) -> Result<Run, StateError> {
    let task = ctx
        .studio
        .tasks
        .get(&request.task_slug)
        .ok_or_else(|| StateError::TaskNotFound(request.task_slug.clone()))?;

    let mut run = Run::new(&task.config.slug, ctx.studio.clock().epoch_ms());
    run.task_name = task.config.name.clone();
    run.param_values = request.param_values;
    run.parent_id = request.parent_id;
    run.creator_id = request.creator_id;
    let run_id = run.id.clone();

    ctx.studio.runs.add(&task.config.slug, run_id.clone(), run.clone());
    let broker = ctx.studio.new_broker(&run_id);
    let cancel = CancellationToken::new();
    ctx.active_runs.add(run_id.clone(), cancel.clone());

    let config = RunConfig {
        run_id: run_id.clone(),
        task: task.config,
        param_values: run.param_values.clone(),
        env: ctx.studio.dev_config().env,
        logs: broker.clone(),
    };
    info!(%run_id, task = %run.task_slug, "launching run");
    tokio::spawn(execute(Arc::clone(ctx), config, broker, cancel));
    Ok(run)
}

async fn execute(
    ctx: Arc<HandlerCtx>,
    config: RunConfig,
    broker: Arc<LogBroker>,
    cancel: CancellationToken,
) {
    let run_id = config.run_id.clone();
    set_status(&ctx, &run_id, RunStatus::Running, Value::Null);

    let outcome = tokio::select! {
        result = ctx.executor.execute(config) => Some(result),
        _ = cancel.cancelled() => None,
    };

    match outcome {
        Some(Ok(outputs)) => {
            set_status(&ctx, &run_id, RunStatus::Succeeded, outputs);
        }
        Some(Err(e)) => {
            broker.record(LogItem::error(e.to_string()).at(ctx.studio.clock().epoch_ms()));
            if matches!(e, ExecuteError::StaleBuild(_)) {
                if let Err(e) = ctx.executor.refresh().await {
                    warn!(%run_id, error = %e, "failed to refresh executor");
                }
            }
            warn!(%run_id, error = %e, "run failed");
            set_status(&ctx, &run_id, RunStatus::Failed, Value::Null);
        }
        // cancel_run already recorded the status
        None => info!(%run_id, "run cancelled"),
    }

    ctx.active_runs.delete(&run_id);
    broker.close();
}

/// Move a run to `status` unless it already finished.
fn set_status(ctx: &HandlerCtx, run_id: &RunId, status: RunStatus, outputs: Value) {
    let now = ctx.studio.clock().epoch_ms();
    let result = ctx.studio.runs.update::<StateError, _>(run_id, |run| {
        if !run.status.is_terminal() {
            run.transition(status, now);
            if status == RunStatus::Succeeded {
                run.outputs = outputs;
            }
        }
        Ok(())
    });
    if let Err(e) = result {
        warn!(%run_id, error = %e, "failed to update run status");
    }
}

/// Cancel a run that has not finished yet.
///
/// The run is marked cancelled before its execution is interrupted, so the
/// status never flips to succeeded or failed afterwards.
pub fn cancel_run(ctx: &HandlerCtx, run_id: &str, cancelled_by: &str) -> Result<Run, StateError> {
    let now = ctx.studio.clock().epoch_ms();
    let run = ctx.studio.runs.update(run_id, |run| {
        if run.status.is_terminal() {
            return Err(StateError::Rejected(format!("run {} already {}", run.id, run.status)));
        }
        run.transition(RunStatus::Cancelled, now);
        run.cancelled_by = Some(cancelled_by.to_string());
        Ok(())
    })?;
    if let Some(cancel) = ctx.active_runs.get(run_id) {
        cancel.cancel();
    }
    info!(%run_id, cancelled_by, "cancelled run");
    Ok(run)
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
