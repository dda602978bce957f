// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use studio_adapters::{fake_context, Discovered, FakeDiscoverer, FakeExecutor, FakeViewLauncher};
use studio_core::test_support::task_config;
use studio_core::{FakeClock, RunId};
use studio_state::ServerStatus;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn test_config(dir: &TempDir) -> Config {
    let root = dir.path().join("project");
    Config {
        dev_config_path: root.join("studio.dev.toml"),
        root,
        state_dir: dir.path().join("state"),
        log_dir: dir.path().join("state/logs"),
        debounce: DebounceOpts::trailing(Duration::from_millis(10)),
        view_capacity: 3,
    }
}

fn fake_adapters(discoverer: &FakeDiscoverer) -> Adapters {
    Adapters {
        discoverer: Arc::new(discoverer.clone()),
        executor: Arc::new(FakeExecutor::new()),
        launcher: Arc::new(FakeViewLauncher::new()),
        clock: Arc::new(FakeClock::new()),
    }
}

#[test]
fn studio_config_mirrors_daemon_config() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let studio = config.studio_config();
    assert_eq!(studio.root, config.root);
    assert_eq!(studio.dev_config_path, config.dev_config_path);
    assert_eq!(studio.view_capacity, 3);
    assert_eq!(studio.debounce.delay, Duration::from_millis(10));
}

#[tokio::test]
async fn startup_requires_studio_dir() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let err = startup(&config, fake_adapters(&FakeDiscoverer::new())).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NoStudioDir(path) if path == config.root));
}

#[tokio::test]
async fn startup_discovers_root_and_watches() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    std::fs::create_dir_all(&config.root).unwrap();
    let discoverer = FakeDiscoverer::new();
    discoverer.set_result(Discovered {
        tasks: vec![task_config("greet", "/project")],
        views: Vec::new(),
    });

    let daemon = startup(&config, fake_adapters(&discoverer)).await.unwrap();

    assert!(config.state_dir.is_dir());
    assert!(daemon.is_watching());
    assert_eq!(discoverer.calls(), vec![vec![config.root.clone()]]);
    assert_eq!(daemon.ctx.studio.status(), ServerStatus::Ready);
    assert!(daemon.ctx.studio.tasks.get("greet").is_some());
    daemon.shutdown();
}

#[tokio::test]
async fn failed_initial_discovery_still_starts() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    std::fs::create_dir_all(&config.root).unwrap();
    let discoverer = FakeDiscoverer::new();
    discoverer.set_error("unreadable");

    let daemon = startup(&config, fake_adapters(&discoverer)).await.unwrap();

    assert_eq!(daemon.ctx.studio.status(), ServerStatus::Discovering);
    assert!(daemon.ctx.studio.tasks.is_empty());
    daemon.shutdown();
}

#[tokio::test]
async fn shutdown_releases_views_and_cancels_runs() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    std::fs::create_dir_all(&config.root).unwrap();
    let daemon = startup(&config, fake_adapters(&FakeDiscoverer::new())).await.unwrap();

    let launcher = FakeViewLauncher::new();
    daemon.ctx.studio.view_processes.add(
        "dash",
        &config.root,
        fake_context("http://localhost:5001", &launcher.kills, &launcher.closes),
    );
    let cancel = CancellationToken::new();
    daemon.ctx.active_runs.add(RunId::from_string("run-live"), cancel.clone());

    let ctx = Arc::clone(&daemon.ctx);
    daemon.shutdown();

    assert!(ctx.studio.view_processes.is_empty());
    assert_eq!(launcher.kills.get(), 1);
    assert_eq!(launcher.closes.get(), 1);
    assert!(cancel.is_cancelled());
}
