// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sleeps requested by running tasks.

use studio_core::{RunId, Sleep, SleepId};
use studio_state::{StateError, Studio};
use tracing::info;

/// Record a new sleep of `duration_ms` on an unfinished run.
pub fn create_sleep(studio: &Studio, run_id: &str, duration_ms: u64) -> Result<Sleep, StateError> {
    let now = studio.clock().epoch_ms();
    let sleep = Sleep {
        id: SleepId::new(),
        run_id: RunId::from_string(run_id),
        duration_ms,
        created_at_ms: now,
        until_ms: now.saturating_add(duration_ms),
        skipped_at_ms: None,
        skipped_by: None,
    };
    studio.runs.update(run_id, |run| {
        if run.status.is_terminal() {
            return Err(StateError::Rejected(format!("run {} already {}", run.id, run.status)));
        }
        run.sleeps.push(sleep.clone());
        Ok(())
    })?;
    Ok(sleep)
}

/// Sleeps of a run in creation order.
pub fn list_sleeps(studio: &Studio, run_id: &str) -> Result<Vec<Sleep>, StateError> {
    studio
        .runs
        .get(run_id)
        .map(|run| run.sleeps)
        .ok_or_else(|| StateError::RunNotFound(RunId::from_string(run_id)))
}

/// End a sleep early.
///
/// `skipped_by` defaults to the run's creator. An unknown sleep id leaves
/// the run untouched.
pub fn skip_sleep(
    studio: &Studio,
    run_id: &str,
    sleep_id: &str,
    skipped_by: Option<&str>,
) -> Result<Sleep, StateError> {
    let now = studio.clock().epoch_ms();
    let run = studio.runs.update::<StateError, _>(run_id, |run| {
        let creator = run.creator_id.clone();
        let run_id = run.id.clone();
        let sleep = run.sleep_mut(sleep_id).ok_or_else(|| StateError::SleepNotFound {
            run_id,
            sleep_id: SleepId::from_string(sleep_id),
        })?;
        sleep.skipped_at_ms = Some(now);
        sleep.skipped_by = Some(skipped_by.map(str::to_string).unwrap_or(creator));
        Ok(())
    })?;
    info!(run_id, sleep_id, "skipped sleep");
    run.sleeps.into_iter().find(|s| s.id == sleep_id).ok_or_else(|| StateError::SleepNotFound {
        run_id: run.id,
        sleep_id: SleepId::from_string(sleep_id),
    })
}

#[cfg(test)]
#[path = "sleeps_tests.rs"]
mod tests;
