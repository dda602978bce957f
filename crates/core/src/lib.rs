// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! studio-core: data model shared by the local studio server crates

pub mod macros;

pub mod clock;
pub mod definition;
pub mod id;
pub mod log;
pub mod run;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use definition::{TaskConfig, TaskState, ViewConfig, ViewState};
pub use log::{LogItem, LogLevel, LogSink};
#[cfg(any(test, feature = "test-support"))]
pub use run::RunBuilder;
pub use run::{Run, RunId, RunStatus, Sleep, SleepId};
