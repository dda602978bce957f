// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local development configuration (`studio.dev.toml`).
//!
//! ```toml
//! [resources.db]
//! kind = "postgres"
//! url = "postgres://localhost/dev"
//!
//! [env]
//! API_KEY = "dev"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the studio root
pub const DEV_CONFIG_FILE_NAME: &str = "studio.dev.toml";

#[derive(Debug, Error)]
pub enum DevConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A locally configured resource tasks can attach to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub kind: String,
    /// Remaining settings, passed through untouched
    #[serde(flatten)]
    pub settings: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
    /// Extra environment for local runs
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl DevConfig {
    pub fn parse(path: &Path, text: &str) -> Result<Self, DevConfigError> {
        toml::from_str(text)
            .map_err(|source| DevConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load from `path`. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, DevConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(DevConfigError::Io { path: path.to_path_buf(), source }),
        }
    }

    pub fn has_resource(&self, slug: &str) -> bool {
        self.resources.contains_key(slug)
    }
}

#[cfg(test)]
#[path = "dev_config_tests.rs"]
mod tests;
