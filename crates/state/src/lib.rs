// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! studio-state: the in-memory coordination core of the local studio.
//!
//! Stores for discovered definitions and runs, per-run log brokers, the
//! debounced reconciler, and the bounded view process cache, all reachable
//! from one [`Studio`] context.

pub mod conditions;
pub mod debounce;
pub mod dev_config;
pub mod discovery;
mod error;
pub mod logs;
pub mod lru;
pub mod runs;
pub mod store;
pub mod studio;
pub mod views;

pub use conditions::{ConditionLevel, TaskCondition};
pub use debounce::{DebounceOpts, Debouncer};
pub use dev_config::{DevConfig, DevConfigError, ResourceConfig, DEV_CONFIG_FILE_NAME};
pub use discovery::{paths_to_discover, ReloadTrigger};
pub use error::StateError;
pub use logs::{LogBroker, LogWatcher};
pub use lru::{EvictingCache, LruCache};
pub use runs::RunStore;
pub use store::Store;
pub use studio::{ServerStatus, Studio, StudioConfig};
pub use views::{ViewProcesses, DEFAULT_VIEW_CAPACITY};
