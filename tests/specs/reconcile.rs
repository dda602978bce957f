// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation specs
//!
//! A changed entrypoint shared by two tasks and a view re-discovers all
//! three definitions; how the result merges depends on whether the change
//! was a file or a directory.

use crate::prelude::*;
use studio_state::{paths_to_discover, ReloadTrigger, ServerStatus};

const NOW: u64 = 2_000_000;

/// Two tasks and a view sharing `shared.py`, plus an unrelated task.
fn shared_entrypoint_harness() -> Harness {
    let h = Harness::new();
    let root = h.root().to_string_lossy().into_owned();
    let shared = h.root().join("shared.py");

    for slug in ["alpha", "beta"] {
        let mut config = task_config(slug, &root);
        config.entrypoint = shared.clone();
        h.seed_task(config);
    }
    h.seed_task(task_config("unrelated", &root));
    let mut view = view_config("board", &root);
    view.entrypoint = shared;
    h.seed_view(view);

    let mut rediscovered = task_config("alpha", &root);
    rediscovered.name = "Alpha v2".to_string();
    h.discoverer.set_result(Discovered { tasks: vec![rediscovered], views: Vec::new() });
    h.clock.set_epoch_ms(NOW);
    h
}

fn file_change() -> Vec<ReloadTrigger> {
    vec![ReloadTrigger { is_dir: false, old_path: None }]
}

#[tokio::test]
async fn closure_set_covers_every_dependent_definition() {
    let h = shared_entrypoint_harness();
    let shared = h.root().join("shared.py");

    let paths = paths_to_discover(
        &shared,
        &h.studio().tasks.items(),
        &h.studio().views.items(),
        &h.studio().config().dev_config_path,
    );

    let mut expected = vec![
        shared.clone(),
        h.root().join("alpha.task.toml"),
        h.root().join("beta.task.toml"),
        h.root().join("board.view.toml"),
    ];
    expected.sort();
    assert_eq!(paths, expected);
}

#[tokio::test]
async fn file_change_updates_only_the_rediscovered_task() {
    let h = shared_entrypoint_harness();
    let shared = h.root().join("shared.py");

    h.studio().reconcile(&shared, file_change()).await;

    assert_eq!(h.discoverer.calls().len(), 1);
    assert_eq!(h.discoverer.calls()[0].len(), 4);
    let alpha = h.studio().tasks.get("alpha").unwrap();
    assert_eq!(alpha.config.name, "Alpha v2");
    assert_eq!(alpha.updated_at_ms, NOW);
    // untouched entries keep their previous load time
    assert_eq!(h.studio().tasks.get("beta").unwrap().updated_at_ms, 0);
    assert_eq!(h.studio().tasks.get("unrelated").unwrap().updated_at_ms, 0);
    assert_eq!(h.studio().views.len(), 1);
    assert_eq!(h.studio().status(), ServerStatus::Ready);
}

#[tokio::test]
async fn directory_change_replaces_everything() {
    let h = shared_entrypoint_harness();

    h.studio().reconcile(h.root(), vec![ReloadTrigger { is_dir: true, old_path: None }]).await;

    let tasks = h.studio().tasks.items();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks["alpha"].config.name, "Alpha v2");
    assert!(h.studio().views.is_empty());
}

#[tokio::test]
async fn discovery_failure_serves_stale_state() {
    let h = shared_entrypoint_harness();
    h.discoverer.set_error("permission denied");
    let before = h.studio().tasks.items();

    h.studio().reconcile(&h.root().join("shared.py"), file_change()).await;

    assert_eq!(h.studio().tasks.items(), before);
    assert_eq!(h.studio().views.len(), 1);
}

#[tokio::test]
async fn dev_config_change_refreshes_tasks_with_resources() {
    let h = Harness::new();
    let root = h.root().to_string_lossy().into_owned();
    let mut with_db = task_config("report", &root);
    with_db.resources = vec!["db".to_string()];
    h.seed_task(with_db);
    h.seed_task(task_config("plain", &root));

    let dev_config = h.studio().config().dev_config_path.clone();
    std::fs::write(&dev_config, "[resources.db]\nkind = \"postgres\"\n").unwrap();
    assert!(!h.studio().task_conditions("report").unwrap().is_empty());

    h.studio().reconcile(&dev_config, file_change()).await;

    let mut expected = vec![dev_config.clone(), h.root().join("report.task.toml")];
    expected.sort();
    assert_eq!(h.discoverer.calls(), vec![expected]);
    assert!(h.studio().dev_config().has_resource("db"));
    assert!(h.studio().task_conditions("report").unwrap().is_empty());
}
