// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for forgesync.
//!
//! ```text
//! Config: GlobalConfig, SyncConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file. File logging is disabled when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Sync loop configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Seconds to sleep between poll iterations.
    pub poll_interval_secs: u64,
    /// Wall-clock budget for one repository's sync, in seconds.
    /// Exceeding it abandons that repository until the next cycle.
    pub repo_timeout_secs: u64,
    /// Page size for the repository-listing API (1-100).
    pub api_page_size: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            repo_timeout_secs: 900,
            api_page_size: 100,
        }
    }
}

impl SyncConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for out-of-range values.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.repo_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                section: "sync".to_string(),
                key: "repo_timeout_secs".to_string(),
                message: "timeout budget must be at least 1 second".to_string(),
            });
        }
        if self.api_page_size == 0 || self.api_page_size > 100 {
            return Err(ConfigError::InvalidValue {
                section: "sync".to_string(),
                key: "api_page_size".to_string(),
                message: format!("page size must be 1-100, got {}", self.api_page_size),
            });
        }
        Ok(())
    }
}
