// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync engine.
//!
//! ```text
//! run_loop(ctx)                         forever, Ctrl-C exits
//!   sync_account(ctx)                   batch scope: log + resleep
//!     list_repositories()
//!     per repo, in listing order:       repo scope: log + continue
//!       timeout(budget)
//!         ensure_repository()           provision destination
//!         ensure_mirror()               clone once, reuse
//!         fetch --prune origin
//!         sanitize_injected_refs()
//!         push --mirror <token url>
//!   sleep(poll_interval)
//! ```
//!
//! Both scopes are explicit `Result` handlers: a repository that fails or
//! exceeds its budget is logged and skipped until the next cycle, a batch
//! that fails is logged and retried after the poll interval. Nothing stops
//! the loop except an interrupt signal.


use bon::Builder;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{Result, SyncError};
use crate::forge::RemoteRepo;
use crate::forge::dest::DestClient;
use crate::forge::source::SourceClient;
use crate::git::cache::MirrorCache;
use crate::git::{backend, refs};

/// Everything one sync cycle needs, constructed once at startup and passed
/// explicitly; no ambient globals.
#[derive(Builder)]
pub struct SyncContext {
    source: SourceClient,
    dest: DestClient,
    source_account: String,
    dest_account: String,
    cache: MirrorCache,
    #[builder(default = Duration::from_secs(900))]
    repo_timeout: Duration,
    #[builder(default = Duration::from_secs(1))]
    poll_interval: Duration,
}

impl SyncContext {
    /// Wall-clock budget for one repository's sync.
    #[must_use]
    pub const fn repo_timeout(&self) -> Duration {
        self.repo_timeout
    }

    /// Sleep between poll iterations.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Sync a single repository: provision, ensure mirror, fetch, sanitize,
/// mirror-push.
///
/// # Errors
///
/// Returns an error if any pipeline step fails; no cleanup is attempted and
/// the next cycle's fetch/push self-corrects.
pub async fn sync_repository(ctx: &SyncContext, repo: &RemoteRepo) -> Result<()> {
    let mirror = ctx.dest.ensure_repository(&ctx.dest_account, repo).await?;

    info!(
        repo = %repo.name,
        source = %repo.clone_url,
        target = %mirror.clone_url,
        "syncing"
    );

    let dir = ctx.cache.ensure_mirror(repo, &mirror).await?;
    backend::fetch_prune(&dir, "origin").await?;

    let removed = refs::sanitize_injected_refs(&dir)?;
    if removed > 0 {
        debug!(repo = %repo.name, removed, "stripped injected pull-request refs");
    }

    backend::push_mirror(&dir, &ctx.dest.push_url(&mirror)).await?;
    Ok(())
}

/// [`sync_repository`] bounded by the per-repository wall-clock budget.
///
/// On deadline the pipeline future is dropped and any running subprocess is
/// abandoned, not killed; the budget means "stop waiting", not "guarantee
/// cancellation".
async fn sync_repository_with_budget(ctx: &SyncContext, repo: &RemoteRepo) -> Result<()> {
    match tokio::time::timeout(ctx.repo_timeout, sync_repository(ctx, repo)).await {
        Ok(result) => result,
        Err(_) => Err(SyncError::Timeout {
            repo: repo.name.clone().into_boxed_str(),
            budget_secs: ctx.repo_timeout.as_secs(),
        }
        .into()),
    }
}

/// Run one batch: list the source account and sync every repository in
/// listing order, one at a time.
///
/// A repository that errors or times out is logged with its full error
/// chain and does not stop the batch.
///
/// # Errors
///
/// Returns an error only if the listing itself fails; per-repository
/// failures are absorbed here.
pub async fn sync_account(ctx: &SyncContext) -> Result<()> {
    let repos = ctx.source.list_repositories(&ctx.source_account).await?;
    info!(
        account = %ctx.source_account,
        count = repos.len(),
        "starting sync cycle"
    );

    for repo in &repos {
        if let Err(e) = sync_repository_with_budget(ctx, repo).await {
            error!(repo = %repo.name, "repository sync failed: {e:#}");
        }
    }

    Ok(())
}

/// Poll forever: sync the whole account, sleep, repeat.
///
/// Only an interrupt signal breaks the loop; batch failures are logged and
/// the fixed poll interval is used unconditionally, with no backoff.
///
/// # Errors
///
/// Returns an error only if listening for the interrupt signal fails.
pub async fn run_loop(ctx: &SyncContext) -> Result<()> {
    info!(
        source = %ctx.source_account,
        dest = %ctx.dest_account,
        interval_secs = ctx.poll_interval.as_secs(),
        budget_secs = ctx.repo_timeout.as_secs(),
        "starting mirror daemon"
    );

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("interrupt received, stopping");
                return Ok(());
            }
            result = sync_account(ctx) => {
                if let Err(e) = result {
                    error!("account sync failed: {e:#}");
                }
            }
        }

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("interrupt received, stopping");
                return Ok(());
            }
            () = tokio::time::sleep(ctx.poll_interval) => {}
        }
    }
}
