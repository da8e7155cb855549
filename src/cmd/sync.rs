// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync command implementation: wires CLI arguments and configuration into
//! a [`SyncContext`] and hands off to the poll loop.

use std::time::Duration;
use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::forge::dest::DestClient;
use crate::forge::source::SourceClient;
use crate::git::backend;
use crate::git::cache::MirrorCache;
use crate::sync::{self, SyncContext};

/// Main handler for the sync daemon.
///
/// # Errors
///
/// Returns an error if no git executable is available, the destination URL
/// is invalid, or the interrupt listener fails. Everything else is absorbed
/// by the loop's recovery scopes.
pub async fn run_sync_command(cli: &Cli, config: &Config) -> Result<()> {
    let git = backend::ensure_git_available()?;
    debug!(git = %git.display(), "using git executable");

    let source =
        SourceClient::new(cli.source_token.as_str()).with_page_size(config.sync.api_page_size);
    let dest = DestClient::new(&cli.dest_url, cli.dest_token.as_str())?;

    let ctx = SyncContext::builder()
        .source(source)
        .dest(dest)
        .source_account(cli.source_account.clone())
        .dest_account(cli.dest_account.clone())
        .cache(MirrorCache::new(&cli.cache_dir))
        .repo_timeout(Duration::from_secs(config.sync.repo_timeout_secs))
        .poll_interval(Duration::from_secs(config.sync.poll_interval_secs))
        .build();

    sync::run_loop(&ctx).await
}
