// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Thin adapter over the git CLI.
//!
//! Exactly the operations the sync pipeline needs, each one subprocess
//! invocation. Subprocesses run through tokio so the per-repository deadline
//! can stop waiting on them; a child that outlives its deadline is abandoned,
//! not killed.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::debug;

use crate::error::{GitError, SyncResult};

/// Credential pattern in URL authorities, e.g. `https://token:x@host/...`.
fn credential_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(https?://)[^/@\s]+@").expect("hard-coded pattern compiles")
    })
}

/// Replace embedded URL credentials with `***` so tokens never reach logs
/// or error messages.
#[must_use]
pub fn redact_credentials(text: &str) -> String {
    credential_pattern().replace_all(text, "$1***@").into_owned()
}

/// Locate the git executable once at startup.
///
/// # Errors
///
/// Returns a `GitError::ExecutableNotFound` if no `git` is on the PATH.
pub fn ensure_git_available() -> SyncResult<PathBuf> {
    which::which("git").map_err(|_| {
        GitError::ExecutableNotFound {
            name: "git".to_string(),
        }
        .into()
    })
}

/// Validate that `path` opens as a local repository.
///
/// Read-only check through gix; no subprocess is spawned.
///
/// # Errors
///
/// Returns a `GitError::Open` if the directory is not a repository.
pub fn open_mirror(path: &Path) -> SyncResult<()> {
    gix::open(path).map_err(|e| GitError::Open(Box::new(e)))?;
    Ok(())
}

/// Execute a git command. Sets `GCM_INTERACTIVE=never` and
/// `GIT_TERMINAL_PROMPT=0` so a missing credential can never hang the sync.
pub(crate) async fn git_command(args: &[&str], cwd: &Path) -> SyncResult<String> {
    let command_line = format!("git {}", args.join(" "));
    debug!(cwd = %cwd.display(), cmd = %redact_credentials(&command_line), "exec");

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .await
        .map_err(|e| GitError::SpawnFailed {
            command: redact_credentials(&command_line),
            source: e,
        })?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: redact_credentials(&command_line),
            message: redact_credentials(String::from_utf8_lossy(&output.stderr).trim()),
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Mirror-clone `url` into `dest`.
///
/// A mirror clone tracks every ref of the source, not only the default
/// branch, so it can be pushed onward ref-for-ref.
///
/// # Errors
///
/// Returns a `GitError::CloneFailed` if the clone fails or the destination
/// path is invalid.
pub async fn mirror_clone(url: &str, dest: &Path) -> SyncResult<()> {
    let dest_str = dest.to_str().ok_or_else(|| GitError::CloneFailed {
        url: redact_credentials(url),
        message: "invalid destination path".to_string(),
    })?;
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));

    git_command(&["clone", "--mirror", "--quiet", url, dest_str], parent).await?;
    Ok(())
}

/// Set the push URL of a named remote, leaving its fetch URL untouched.
///
/// # Errors
///
/// Returns a `GitError` if the remote does not exist or git fails.
pub async fn set_push_url(repo_path: &Path, remote: &str, url: &str) -> SyncResult<()> {
    git_command(&["remote", "set-url", "--push", remote, url], repo_path).await?;
    Ok(())
}

/// Fetch all refs from a named remote, pruning refs deleted on the source.
///
/// # Errors
///
/// Returns a `GitError` if the fetch fails.
pub async fn fetch_prune(repo_path: &Path, remote: &str) -> SyncResult<()> {
    git_command(&["fetch", "--prune", "--quiet", remote], repo_path).await?;
    Ok(())
}

/// Force-mirror-push the repository to `url`.
///
/// The destination's ref set is made exactly equal to the local one,
/// deletions included. No fast-forward check.
///
/// # Errors
///
/// Returns a `GitError` if the push fails. The error message has any
/// embedded credentials redacted.
pub async fn push_mirror(repo_path: &Path, url: &str) -> SyncResult<()> {
    git_command(&["push", "--mirror", "--quiet", url], repo_path).await?;
    Ok(())
}
