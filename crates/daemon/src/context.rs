// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared context handed to every request handler.

use std::sync::Arc;

use studio_adapters::{Executor, ViewLauncher};
use studio_core::RunId;
use studio_state::{Store, Studio};
use tokio_util::sync::CancellationToken;

/// Everything a handler may touch: the studio state plus the collaborators
/// that act outside the process.
pub struct HandlerCtx {
    pub studio: Arc<Studio>,
    pub executor: Arc<dyn Executor>,
    pub launcher: Arc<dyn ViewLauncher>,
    /// Cancellation handles of runs still executing
    pub active_runs: Store<RunId, CancellationToken>,
}

impl HandlerCtx {
    pub fn new(
        studio: Arc<Studio>,
        executor: Arc<dyn Executor>,
        launcher: Arc<dyn ViewLauncher>,
    ) -> Arc<Self> {
        Arc::new(Self { studio, executor, launcher, active_runs: Store::new() })
    }
}

impl std::fmt::Debug for HandlerCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerCtx")
            .field("studio", &self.studio)
            .field("active_runs", &self.active_runs.len())
            .finish_non_exhaustive()
    }
}
