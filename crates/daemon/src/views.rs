// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starting view companion dev servers.

use studio_adapters::LaunchError;
use studio_state::StateError;
use thiserror::Error;
use tracing::{debug, info};

use crate::context::HandlerCtx;

#[derive(Debug, Error)]
pub enum StartViewError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("starting view dev server: {0}")]
    Launch(#[from] LaunchError),
}

/// Server URL of a running dev server for `slug`, launching one if needed.
///
/// With `rebundle` set, any cached server is bypassed and every other view
/// served from the same root is invalidated, since their bundles are stale
/// too.
pub async fn start_view(
    ctx: &HandlerCtx,
    slug: &str,
    rebundle: bool,
) -> Result<String, StartViewError> {
    let view =
        ctx.studio.views.get(slug).ok_or_else(|| StateError::ViewNotFound(slug.to_string()))?;
    let processes = &ctx.studio.view_processes;

    if rebundle {
        let invalidated = processes.remove_sharing_root(&view.config.root, slug);
        if invalidated > 0 {
            info!(slug, invalidated, "invalidated views sharing root");
        }
    } else if let Some(url) = processes.get(slug) {
        debug!(slug, "view dev server already running");
        return Ok(url);
    }

    let context = ctx.launcher.launch(&view.config).await?;
    let url = context.server_url.clone();
    info!(slug, %url, "started view dev server");
    processes.add(slug, &view.config.root, context);
    Ok(url)
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
