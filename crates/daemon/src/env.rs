// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use studio_state::{DEFAULT_VIEW_CAPACITY, DEV_CONFIG_FILE_NAME};

use crate::lifecycle::LifecycleError;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Directory discovered and watched: STUDIO_DIR, else the working directory
pub fn studio_dir() -> Result<PathBuf, LifecycleError> {
    match var("STUDIO_DIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(std::env::current_dir()?),
    }
}

/// Dev config file: STUDIO_DEV_CONFIG, else `<studio_dir>/studio.dev.toml`
pub fn dev_config_path(studio_dir: &std::path::Path) -> PathBuf {
    var("STUDIO_DEV_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| studio_dir.join(DEV_CONFIG_FILE_NAME))
}

/// Resolve state directory: STUDIO_STATE_DIR > XDG_STATE_HOME/studio > ~/.local/state/studio
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    resolve_state_dir(var("STUDIO_STATE_DIR"), var("XDG_STATE_HOME"), var("HOME"))
}

fn resolve_state_dir(
    explicit: Option<String>,
    xdg: Option<String>,
    home: Option<String>,
) -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = explicit {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = xdg {
        return Ok(PathBuf::from(xdg).join("studio"));
    }
    let home = home.ok_or(LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/studio"))
}

/// Reconciler debounce delay (default 1s, configurable via `STUDIO_DEBOUNCE_MS`)
pub fn debounce_delay() -> Duration {
    parse_ms(var("STUDIO_DEBOUNCE_MS")).unwrap_or(Duration::from_secs(1))
}

fn parse_ms(value: Option<String>) -> Option<Duration> {
    value.and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// View process cache capacity (default 5, `STUDIO_VIEW_CAPACITY`)
pub fn view_capacity() -> usize {
    var("STUDIO_VIEW_CAPACITY")
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_VIEW_CAPACITY)
}

/// Also log to stderr when `STUDIO_LOG_STDERR` is set
pub fn log_to_stderr() -> bool {
    var("STUDIO_LOG_STDERR").is_some()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
