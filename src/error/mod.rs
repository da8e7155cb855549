// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!             SyncError (~24 bytes)
//!                    |
//!   +--------+------+------+--------+--------+
//!   |        |      |      |        |        |
//!   v        v      v      v        v        v
//!  Api      Git    Cfg     Fs    Timeout  Io/Other
//!  Box      Box    Box    Box    (inline) Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Api     HttpStatus, InvalidUrl
//!   Git     ExecutableNotFound, SpawnFailed, CommandFailed,
//!           CloneFailed, Open
//!   Config  InvalidValue
//!   Fs      IoError
//!
//! All variants boxed => SyncError stays small on the stack.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Hosting-service API call failed.
    #[error("api error: {0}")]
    Api(#[from] Box<ApiError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// A repository sync exceeded its wall-clock budget.
    #[error("sync of '{repo}' timed out after {budget_secs}s")]
    Timeout { repo: Box<str>, budget_secs: u64 },

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ApiError => Api,
    GitError => Git,
    ConfigError => Config,
    FsError => Fs,
    std::io::Error => Io,
}

// --- API Errors ---

/// Hosting-service API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

// --- Git Errors ---

/// Git adapter errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn the git subprocess.
    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Git command exited with non-zero status.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Mirror clone failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// Failed to open an existing local mirror.
    #[error("failed to open mirror: {0}")]
    Open(#[from] Box<gix::open::Error>),
}

// --- Config Errors ---

/// Configuration-related errors.
///
/// File-level read and parse failures surface through the `config` crate's
/// own error type; this covers value validation on the deserialized result.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
