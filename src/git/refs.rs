// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Strips host-injected pull-request refs from a local mirror.
//!
//! The source hosting service injects read-only `refs/pull/*` references
//! into every mirror clone and re-injects them on every fetch. They cannot
//! be pushed; a mirror-push that still carries them is rejected outright,
//! so this runs on every cycle, not just after the first clone.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{FsError, SyncResult};

/// A packed line for an injected pull-request ref:
/// `<40-hex object id> refs/pull/<number>/{head,pull,merge}`.
fn pull_ref_line() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{40} refs/pull/[0-9]+/(head|pull|merge)$")
            .expect("hard-coded pattern compiles")
    })
}

/// Filter pull-request ref lines out of packed-refs contents.
///
/// Surviving lines (headers, peel lines, every other ref) keep their bytes
/// and relative order. Returns the filtered contents and the number of
/// removed lines.
#[must_use]
pub fn filter_packed_refs(contents: &str) -> (String, usize) {
    let mut filtered = String::with_capacity(contents.len());
    let mut removed = 0;

    for line in contents.split_inclusive('\n') {
        let bare = line.trim_end_matches('\n').trim_end_matches('\r');
        if pull_ref_line().is_match(bare) {
            removed += 1;
        } else {
            filtered.push_str(line);
        }
    }

    (filtered, removed)
}

/// Remove the injected pull-request refs from a mirror directory.
///
/// Deletes the loose `refs/pull` subtree and rewrites `packed-refs` without
/// the pull-request lines. Either may be absent. Returns the number of
/// packed lines removed.
///
/// # Errors
///
/// Returns an `FsError` if the loose subtree cannot be removed or the
/// packed-refs file cannot be read or rewritten.
pub fn sanitize_injected_refs(repo_dir: &Path) -> SyncResult<usize> {
    let loose = repo_dir.join("refs").join("pull");
    if loose.is_dir() {
        debug!(path = %loose.display(), "removing loose pull-request refs");
        std::fs::remove_dir_all(&loose).map_err(|e| FsError::IoError {
            path: loose.display().to_string(),
            source: e,
        })?;
    }

    let packed = repo_dir.join("packed-refs");
    if !packed.is_file() {
        return Ok(0);
    }

    let contents = std::fs::read_to_string(&packed).map_err(|e| FsError::IoError {
        path: packed.display().to_string(),
        source: e,
    })?;

    let (filtered, removed) = filter_packed_refs(&contents);
    if removed > 0 {
        debug!(path = %packed.display(), removed, "rewriting packed-refs");
        std::fs::write(&packed, filtered).map_err(|e| FsError::IoError {
            path: packed.display().to_string(),
            source: e,
        })?;
    }

    Ok(removed)
}
