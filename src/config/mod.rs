// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for forgesync.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. forgesync.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. FORGESYNC_* env vars
//! 5. CLI overrides (--log-level, --interval, ...)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! FORGESYNC_SYNC__POLL_INTERVAL_SECS=5 → sync.poll_interval_secs = 5
//! FORGESYNC_GLOBAL__LOG_FILE=sync.log  → global.log_file = "sync.log"
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use types::{GlobalConfig, SyncConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Sync loop options.
    pub sync: SyncConfig,
}

impl Config {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate cross-field constraints after deserialization.
    ///
    /// # Errors
    ///
    /// Returns an error if any section holds an out-of-range value.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.sync.validate()?;
        Ok(())
    }
}
