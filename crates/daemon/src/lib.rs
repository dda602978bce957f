// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local studio daemon library
//!
//! The operations request handlers call into, plus startup, shutdown, and
//! the filesystem watcher that keeps the studio's definitions current.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod context;
pub mod env;
pub mod lifecycle;
pub mod logging;
pub mod runs;
pub mod sleeps;
pub mod stream;
pub mod views;
pub mod watcher;

#[cfg(test)]
mod test_support;

pub use context::HandlerCtx;
pub use lifecycle::{startup, Adapters, Config, DaemonState, LifecycleError};
pub use runs::{cancel_run, launch_run, LaunchRequest};
pub use sleeps::{create_sleep, list_sleeps, skip_sleep};
pub use stream::{relay_logs, sse_frame, RelayError};
pub use views::{start_view, StartViewError};
pub use watcher::{Change, StudioWatcher};
