// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run specs
//!
//! Launch a task, stream its logs to early and late subscribers, and drive
//! its sleeps and cancellation through the handler operations.

use std::time::Duration;

use crate::prelude::*;
use serde_json::json;
use studio_daemon::{
    cancel_run, create_sleep, launch_run, list_sleeps, relay_logs, skip_sleep, LaunchRequest,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

async fn collect(mut rx: mpsc::Receiver<String>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Some(frame) = rx.recv().await {
        frames.push(frame);
    }
    frames
}

#[tokio::test]
async fn early_and_late_subscribers_see_the_same_stream() {
    let h = Harness::new();
    h.seed_task(task_config("count", &h.root().to_string_lossy()));
    let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    h.executor.set_log_lines(&lines.iter().map(String::as_str).collect::<Vec<_>>());
    h.executor.set_delay(Duration::from_millis(20));
    h.executor.set_outcome(FakeOutcome::Succeed(json!({"total": 10})));

    let run = launch_run(&h.ctx, LaunchRequest::new("count")).unwrap();

    let (early_tx, early_rx) = mpsc::channel(64);
    let studio = h.ctx.studio.clone();
    let run_id = run.id.clone();
    let early = tokio::spawn(async move {
        relay_logs(&studio, &run_id, early_tx, CancellationToken::new()).await
    });

    eventually(|| h.studio().runs.get(&run.id).is_some_and(|r| r.status.is_terminal())).await;
    let broker = h.studio().broker(&run.id).unwrap();
    eventually(|| broker.is_closed()).await;

    let (late_tx, late_rx) = mpsc::channel(64);
    let late_sent =
        relay_logs(h.studio(), &run.id, late_tx, CancellationToken::new()).await.unwrap();

    assert_eq!(early.await.unwrap().unwrap(), 10);
    assert_eq!(late_sent, 10);
    let early_frames = collect(early_rx).await;
    let late_frames = collect(late_rx).await;
    assert_eq!(early_frames, late_frames);
    for (i, frame) in early_frames.iter().enumerate() {
        assert!(frame.contains(&format!("\"text\":\"{i}\"")), "frame {i}: {frame}");
    }

    let finished = h.studio().runs.get(&run.id).unwrap();
    assert_eq!(finished.status, RunStatus::Succeeded);
    assert_eq!(finished.outputs, json!({"total": 10}));
}

#[tokio::test]
async fn sleeps_are_skipped_by_the_run_creator() {
    let h = Harness::new();
    h.seed_task(task_config("nap", &h.root().to_string_lossy()));
    h.executor.set_outcome(FakeOutcome::Hang);
    let mut request = LaunchRequest::new("nap");
    request.creator_id = "usr-ada".to_string();
    let run = launch_run(&h.ctx, request).unwrap();

    let sleep = create_sleep(h.studio(), &run.id, 60_000).unwrap();
    h.clock.advance(Duration::from_secs(5));
    let skipped = skip_sleep(h.studio(), &run.id, &sleep.id, None).unwrap();

    assert_eq!(skipped.skipped_by.as_deref(), Some("usr-ada"));
    assert_eq!(skipped.skipped_at_ms, Some(sleep.created_at_ms + 5_000));
    assert!(list_sleeps(h.studio(), &run.id).unwrap()[0].is_skipped());

    cancel_run(&h.ctx, &run.id, "usr-ada").unwrap();
    eventually(|| h.studio().broker(&run.id).is_some_and(|b| b.is_closed())).await;
    assert_eq!(h.studio().runs.get(&run.id).unwrap().status, RunStatus::Cancelled);
}

#[tokio::test]
async fn child_runs_are_listed_under_their_parent() {
    let h = Harness::new();
    let root = h.root().to_string_lossy().into_owned();
    h.seed_task(task_config("parent", &root));
    h.seed_task(task_config("child", &root));
    h.executor.set_outcome(FakeOutcome::Hang);

    let parent = launch_run(&h.ctx, LaunchRequest::new("parent")).unwrap();
    let mut children = Vec::new();
    for _ in 0..3 {
        let mut request = LaunchRequest::new("child");
        request.parent_id = Some(parent.id.clone());
        children.push(launch_run(&h.ctx, request).unwrap().id);
    }

    let listed: Vec<_> =
        h.studio().runs.get_descendants(&parent.id).into_iter().map(|r| r.id).collect();
    assert_eq!(listed, children);
    let history: Vec<_> =
        h.studio().runs.get_run_history("child").into_iter().map(|r| r.id).collect();
    assert_eq!(history, children.into_iter().rev().collect::<Vec<_>>());
}
