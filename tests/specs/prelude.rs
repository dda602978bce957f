// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the end-to-end scenarios.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub use studio_adapters::{Discovered, FakeDiscoverer, FakeExecutor, FakeOutcome, FakeViewLauncher};
pub use studio_core::test_support::{task_config, view_config};
pub use studio_core::{FakeClock, RunStatus, TaskConfig, TaskState, ViewConfig, ViewState};
pub use studio_daemon::HandlerCtx;
pub use studio_state::{Studio, StudioConfig};
pub use tempfile::TempDir;

/// A studio rooted in a temp directory, wired entirely to fakes.
pub struct Harness {
    pub ctx: Arc<HandlerCtx>,
    pub discoverer: FakeDiscoverer,
    pub executor: FakeExecutor,
    pub launcher: FakeViewLauncher,
    pub clock: FakeClock,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_capacity(5)
    }

    pub fn with_capacity(view_capacity: usize) -> Self {
        let dir = TempDir::new().unwrap();
        let discoverer = FakeDiscoverer::new();
        let executor = FakeExecutor::new();
        let launcher = FakeViewLauncher::new();
        let clock = FakeClock::new();
        let mut config = StudioConfig::new(dir.path());
        config.view_capacity = view_capacity;
        let studio = Studio::new(config, Arc::new(discoverer.clone()), Arc::new(clock.clone()));
        let ctx =
            HandlerCtx::new(studio, Arc::new(executor.clone()), Arc::new(launcher.clone()));
        Self { ctx, discoverer, executor, launcher, clock, dir }
    }

    pub fn studio(&self) -> &Studio {
        &self.ctx.studio
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn seed_task(&self, config: TaskConfig) {
        self.studio().tasks.add(config.slug.clone(), TaskState { config, updated_at_ms: 0 });
    }

    pub fn seed_view(&self, config: ViewConfig) {
        self.studio().views.add(config.slug.clone(), ViewState { config, updated_at_ms: 0 });
    }
}

/// Poll `check` until it holds, failing after a few seconds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition never held");
}
