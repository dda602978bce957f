// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for the daemon binary.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::lifecycle::LifecycleError;

/// File name prefix of the daily-rolled daemon log
pub const LOG_FILE_PREFIX: &str = "studiod.log";

/// `RUST_LOG`, defaulting to `info`.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber: a daily log file under `log_dir`, plus
/// stderr when asked.
///
/// Keep the returned guard alive; dropping it flushes and stops the
/// background writer.
pub fn init_tracing(log_dir: &Path, to_stderr: bool) -> Result<WorkerGuard, LifecycleError> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(log_filter())
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(to_stderr.then(|| fmt::layer().with_writer(std::io::stderr)))
        .try_init()?;
    Ok(guard)
}
