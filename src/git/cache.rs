// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local mirror cache.
//!
//! One bare mirror directory per repository name under the cache root.
//! Directories are created on first sight, reused forever and never deleted
//! by this tool.

use std::path::{Path, PathBuf};
use tracing::info;

use super::backend;
use crate::error::{FsError, Result, SyncError};
use crate::forge::{MirrorRepo, RemoteRepo};

/// The on-disk mirror cache.
#[derive(Debug, Clone)]
pub struct MirrorCache {
    root: PathBuf,
}

impl MirrorCache {
    /// Create a cache handle rooted at `root`. Nothing is touched on disk
    /// until [`Self::ensure_mirror`] runs.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the cache root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The mirror directory for a repository name.
    #[must_use]
    pub fn mirror_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Ensure a local mirror of `source` exists and return its directory.
    ///
    /// Creates the cache root idempotently. If the mirror directory already
    /// exists it is validated and reused; otherwise the source is
    /// mirror-cloned into it and the push remote is redirected to the
    /// destination clone URL. The fetch remote stays the source, so the
    /// cache is always a superset mirror of the source history.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable repository name, a cache root that
    /// cannot be created, an existing directory that is not a repository, or
    /// a failed clone.
    pub async fn ensure_mirror(&self, source: &RemoteRepo, dest: &MirrorRepo) -> Result<PathBuf> {
        validate_name(&source.name)?;

        std::fs::create_dir_all(&self.root).map_err(|e| FsError::IoError {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let dir = self.mirror_path(&source.name);
        if dir.is_dir() {
            backend::open_mirror(&dir)?;
            return Ok(dir);
        }

        info!(repo = %source.name, "cloning");
        backend::mirror_clone(&source.clone_url, &dir).await?;
        backend::set_push_url(&dir, "origin", &dest.clone_url).await?;
        Ok(dir)
    }
}

/// The cache is keyed by repository name; a name that is not a plain
/// directory name would escape the cache root.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if plain {
        Ok(())
    } else {
        Err(SyncError::Other(
            format!("repository name '{name}' is not a valid cache directory name").into_boxed_str(),
        )
        .into())
    }
}
