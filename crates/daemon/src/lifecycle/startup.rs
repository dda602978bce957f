// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::sync::Arc;
use std::time::Instant;

use studio_adapters::{
    CommandViewLauncher, Discoverer, Executor, ManifestDiscoverer, ShellExecutor, ViewLauncher,
};
use studio_core::{Clock, SystemClock};
use studio_state::Studio;
use tracing::{info, warn};

use crate::context::HandlerCtx;
use crate::watcher::StudioWatcher;

use super::{Config, DaemonState, LifecycleError};

/// The collaborators the daemon talks to outside its own state.
#[derive(Clone)]
pub struct Adapters {
    pub discoverer: Arc<dyn Discoverer>,
    pub executor: Arc<dyn Executor>,
    pub launcher: Arc<dyn ViewLauncher>,
    pub clock: Arc<dyn Clock>,
}

impl Adapters {
    /// Manifest discovery, shell execution, and command-launched views
    pub fn real() -> Self {
        Self {
            discoverer: Arc::new(ManifestDiscoverer::new()),
            executor: Arc::new(ShellExecutor::new()),
            launcher: Arc::new(CommandViewLauncher::new()),
            clock: Arc::new(SystemClock),
        }
    }
}

/// Start the daemon: build the studio, discover everything under the root,
/// and start watching it.
///
/// A failed initial discovery is logged and the daemon starts empty; the
/// next change under the root retries.
pub async fn startup(config: &Config, adapters: Adapters) -> Result<DaemonState, LifecycleError> {
    if !config.root.is_dir() {
        return Err(LifecycleError::NoStudioDir(config.root.clone()));
    }
    std::fs::create_dir_all(&config.state_dir)?;

    let studio = Studio::new(config.studio_config(), adapters.discoverer, adapters.clock);
    if let Err(e) = studio.discover_all().await {
        warn!(error = %e, "initial discovery failed");
    }
    info!(
        root = %config.root.display(),
        tasks = studio.tasks.len(),
        views = studio.views.len(),
        "studio ready"
    );

    let watcher = StudioWatcher::start(Arc::clone(&studio))?;
    let ctx = HandlerCtx::new(studio, adapters.executor, adapters.launcher);

    Ok(DaemonState {
        config: config.clone(),
        ctx,
        watcher: Some(watcher),
        start_time: Instant::now(),
    })
}
