// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the studio's external collaborators: discovery, task
//! execution, and view companion processes.

pub mod discover;
pub mod executor;
pub mod process;

pub use discover::{
    is_ignored, is_watched_path, DiscoverError, Discovered, Discoverer, ManifestDiscoverer,
};
pub use executor::{ExecuteError, Executor, RunConfig, ShellExecutor};
pub use process::{
    ChildProcess, Closer, CommandViewLauncher, LaunchError, ProcessHandle, ScratchDir,
    ViewLauncher, ViteContext,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use discover::FakeDiscoverer;
#[cfg(any(test, feature = "test-support"))]
pub use executor::{FakeExecutor, FakeOutcome};
#[cfg(any(test, feature = "test-support"))]
pub use process::{fake_context, FakeCloser, FakeProcess, FakeViewLauncher, Tally};
