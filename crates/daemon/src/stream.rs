// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-sent-events relay of a run's log stream.

use studio_core::{LogItem, RunId};
use studio_state::Studio;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no logs for run {0:?}")]
    RunNotFound(RunId),

    #[error("encoding log item: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Render one log line as an SSE `data:` frame.
pub fn sse_frame(item: &LogItem) -> Result<String, serde_json::Error> {
    Ok(format!("data: {}\n\n", serde_json::to_string(item)?))
}

/// Forward a run's log lines to `sink` as SSE frames.
///
/// Returns once the run's broker closes, the client goes away (the sink's
/// receiver is dropped), or `cancel` fires. The watcher is unregistered on
/// every path. Yields the number of frames delivered.
pub async fn relay_logs(
    studio: &Studio,
    run_id: &str,
    sink: mpsc::Sender<String>,
    cancel: CancellationToken,
) -> Result<usize, RelayError> {
    let broker =
        studio.broker(run_id).ok_or_else(|| RelayError::RunNotFound(RunId::from_string(run_id)))?;
    let mut watcher = broker.new_watcher();
    let mut sent = 0;

    loop {
        let item = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(run_id, "log relay cancelled");
                break;
            }
            item = watcher.next() => item,
        };
        let Some(item) = item else { break };
        let frame = sse_frame(&item)?;
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(run_id, "log relay cancelled");
                break;
            }
            delivered = sink.send(frame) => {
                if delivered.is_err() {
                    debug!(run_id, "log relay client went away");
                    break;
                }
            }
        }
        sent += 1;
    }

    watcher.close();
    Ok(sent)
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
