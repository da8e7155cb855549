// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source-side API client: repository listing.

use anyhow::Context;
use reqwest::Client;
use tracing::debug;

use super::{ACCEPT, RemoteRepo, http_client};
use crate::error::{ApiError, Result};

/// Default API root of the public hosting service.
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Client for the source hosting service.
pub struct SourceClient {
    client: Client,
    base_url: String,
    token: String,
    page_size: u32,
}

impl SourceClient {
    /// Create a client against the public API root.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: http_client().clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            page_size: 100,
        }
    }

    /// Override the API root (tests, non-default deployments).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Override the listing page size (1-100).
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Get the configured API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List every repository owned by `account`, exhausting pagination.
    ///
    /// The result is never cached; each poll cycle re-queries so repositories
    /// created or deleted since the last cycle are picked up.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails, the service responds with a
    /// non-success status, or a page cannot be parsed.
    pub async fn list_repositories(&self, account: &str) -> Result<Vec<RemoteRepo>> {
        let url = format!("{}/users/{}/repos", self.base_url, account);
        let mut repos = Vec::new();
        let mut page: u32 = 1;

        loop {
            debug!(account, page, "listing repositories");

            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.token))
                .header("Accept", ACCEPT)
                .query(&[
                    ("type", "owner".to_string()),
                    ("per_page", self.page_size.to_string()),
                    ("page", page.to_string()),
                ])
                .send()
                .await
                .with_context(|| format!("failed to list repositories of {account}"))?;

            if !response.status().is_success() {
                return Err(ApiError::HttpStatus {
                    status: response.status().as_u16(),
                    url: url.clone(),
                }
                .into());
            }

            let batch: Vec<RemoteRepo> = response
                .json()
                .await
                .with_context(|| format!("failed to parse repository listing page {page}"))?;

            let last_page = batch.len() < self.page_size as usize;
            repos.extend(batch);
            if last_page {
                break;
            }
            page += 1;
        }

        debug!(account, count = repos.len(), "repository listing complete");
        Ok(repos)
    }
}
