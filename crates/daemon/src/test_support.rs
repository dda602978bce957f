// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler context wired to fakes, shared by the daemon's unit tests.

use std::sync::Arc;

use studio_adapters::{FakeDiscoverer, FakeExecutor, FakeViewLauncher};
use studio_core::test_support::{task_config, view_config};
use studio_core::{FakeClock, TaskState, ViewState};
use studio_state::{Studio, StudioConfig};
use tempfile::TempDir;

use crate::context::HandlerCtx;

pub(crate) struct TestCtx {
    pub ctx: Arc<HandlerCtx>,
    pub executor: FakeExecutor,
    pub launcher: FakeViewLauncher,
    pub clock: FakeClock,
    pub dir: TempDir,
}

impl TestCtx {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let clock = FakeClock::new();
        let executor = FakeExecutor::new();
        let launcher = FakeViewLauncher::new();
        let studio = Studio::new(
            StudioConfig::new(dir.path()),
            Arc::new(FakeDiscoverer::new()),
            Arc::new(clock.clone()),
        );
        let ctx = HandlerCtx::new(studio, Arc::new(executor.clone()), Arc::new(launcher.clone()));
        Self { ctx, executor, launcher, clock, dir }
    }

    pub fn with_task(self, slug: &str) -> Self {
        let config = task_config(slug, &self.dir.path().to_string_lossy());
        self.ctx.studio.tasks.add(slug.to_string(), TaskState { config, updated_at_ms: 0 });
        self
    }

    pub fn with_view(self, slug: &str, root: &str) -> Self {
        let config = view_config(slug, root);
        self.ctx.studio.views.add(slug.to_string(), ViewState { config, updated_at_ms: 0 });
        self
    }
}
