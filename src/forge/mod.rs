// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hosting-service API clients.
//!
//! ```text
//!        Public API
//!   source.rs    dest.rs
//!       |           |
//!       v           v
//!  SourceClient  DestClient
//!  .list_repos   .ensure_repository
//!  (paginated)   .get / .create
//!       \           /
//!        v         v
//!   shared reqwest client
//!   OnceLock, keep-alive
//! ```
//!
//! Both clients are constructed once at startup and passed into the sync
//! pipeline explicitly; the shared connection pool is the only process-wide
//! handle.

pub mod dest;
pub mod source;

#[cfg(test)]
mod tests;

use reqwest::Client;
use serde::Deserialize;
use std::sync::OnceLock;

/// Accept header for the hosting service's v3 REST API.
pub(crate) const ACCEPT: &str = "application/vnd.github.v3+json";

/// A repository as listed by the source hosting service.
///
/// Read-only to this tool; re-fetched every cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRepo {
    pub name: String,
    pub clone_url: String,
    /// Absent for empty repositories.
    pub default_branch: Option<String>,
}

/// The destination-side counterpart of a [`RemoteRepo`].
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorRepo {
    pub name: String,
    pub clone_url: String,
}

/// Global HTTP client - initialized once, reused by both API clients.
/// Falls back to a basic client if custom configuration fails.
pub(crate) fn http_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("forgesync/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Splice an access token into the authority of an `https://` clone URL.
///
/// Built fresh per push attempt and handed straight to the push subprocess;
/// never stored in the mirror's configuration. URLs with other schemes are
/// returned unchanged.
#[must_use]
pub fn with_access_token(clone_url: &str, token: &str) -> String {
    clone_url.replacen("https://", &format!("https://{token}:x-oauth-basic@"), 1)
}
