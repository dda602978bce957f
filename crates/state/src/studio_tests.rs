// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use studio_adapters::{Discovered, FakeDiscoverer};
use studio_core::test_support::task_config;
use studio_core::FakeClock;
use tempfile::TempDir;

fn studio_in(dir: &TempDir) -> Arc<Studio> {
    Studio::new(
        StudioConfig::new(dir.path()),
        Arc::new(FakeDiscoverer::new()),
        Arc::new(FakeClock::new()),
    )
}

fn seed_task_with_resources(studio: &Studio, slug: &str, resources: &[&str]) {
    let mut config = task_config(slug, "/app");
    config.resources = resources.iter().map(|r| r.to_string()).collect();
    studio.tasks.add(slug.to_string(), TaskState { config, updated_at_ms: 0 });
}

#[test]
fn config_defaults_dev_config_into_root() {
    let config = StudioConfig::new("/app");
    assert_eq!(config.dev_config_path, PathBuf::from("/app/studio.dev.toml"));
    assert_eq!(config.view_capacity, 5);
    assert_eq!(config.debounce, DebounceOpts::default());
}

#[test]
fn starts_discovering_then_ready() {
    let dir = TempDir::new().unwrap();
    let studio = studio_in(&dir);
    assert_eq!(studio.status(), ServerStatus::Discovering);

    studio.set_status(ServerStatus::Ready);
    studio.set_status(ServerStatus::Ready);

    assert_eq!(studio.status(), ServerStatus::Ready);
    assert_eq!(studio.status().to_string(), "ready");
}

#[test]
fn loads_dev_config_at_construction() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("studio.dev.toml"), "[resources.db]\n").unwrap();

    let studio = studio_in(&dir);

    assert!(studio.dev_config().has_resource("db"));
}

#[test]
fn broken_dev_config_keeps_previous() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("studio.dev.toml");
    std::fs::write(&path, "[resources.db]\n").unwrap();
    let studio = studio_in(&dir);

    std::fs::write(&path, "[resources.db\n").unwrap();
    studio.reload_dev_config();

    assert!(studio.dev_config().has_resource("db"));
}

#[test]
fn task_conditions_are_cached_until_reconciled() {
    let dir = TempDir::new().unwrap();
    let studio = studio_in(&dir);
    seed_task_with_resources(&studio, "hello", &["db"]);

    let first = studio.task_conditions("hello").unwrap();
    assert_eq!(first.len(), 1);

    // Configuring the resource does not change the cached answer...
    std::fs::write(dir.path().join("studio.dev.toml"), "[resources.db]\n").unwrap();
    studio.reload_dev_config();
    assert_eq!(studio.task_conditions("hello").unwrap(), first);

    // ...until the next registration invalidates it
    studio.register(Discovered::default(), false, 0);
    assert!(studio.task_conditions("hello").unwrap().is_empty());
}

#[test]
fn task_conditions_for_unknown_task() {
    let dir = TempDir::new().unwrap();
    let studio = studio_in(&dir);
    assert!(matches!(
        studio.task_conditions("nope"),
        Err(StateError::TaskNotFound(slug)) if slug == "nope"
    ));
}

#[test]
fn one_broker_per_run() {
    let dir = TempDir::new().unwrap();
    let studio = studio_in(&dir);
    let run_id = RunId::new();

    let broker = studio.new_broker(&run_id);
    let again = studio.new_broker(&run_id);

    assert!(Arc::ptr_eq(&broker, &again));
    assert!(studio.broker(&run_id).is_some());
    assert!(studio.broker("run-unknown").is_none());
}
