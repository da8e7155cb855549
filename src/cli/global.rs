// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options.
//!
//! # Option Precedence
//!
//! ```text
//! --ini FILE        ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-5)
//! --file-log-level  ← File verbosity (overrides --log-level)
//! --log-file FILE   ← Log file path
//! --interval SECS   ← sync.poll_interval_secs override
//! --timeout SECS    ← sync.repo_timeout_secs override
//!
//! Precedence: CLI flags > env > --ini > forgesync.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'i', long = "ini", value_name = "FILE", action = clap::ArgAction::Append)]
    pub inis: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Seconds to sleep between poll iterations.
    #[arg(long = "interval", value_name = "SECS")]
    pub interval: Option<u64>,

    /// Wall-clock budget for one repository's sync, in seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    ///
    /// Keys use the `config` crate's dotted-path form.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, config::Value)> {
        let mut overrides: Vec<(&'static str, config::Value)> = Vec::new();

        if let Some(level) = self.log_level {
            overrides.push(("global.output_log_level", i64::from(level).into()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level", i64::from(level).into()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("global.log_file", path.display().to_string().into()));
        }

        if let Some(interval) = self.interval {
            let secs = i64::try_from(interval).unwrap_or(i64::MAX);
            overrides.push(("sync.poll_interval_secs", secs.into()));
        }

        if let Some(timeout) = self.timeout {
            let secs = i64::try_from(timeout).unwrap_or(i64::MAX);
            overrides.push(("sync.repo_timeout_secs", secs.into()));
        }

        overrides
    }
}
