// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Destination-side API client: mirror provisioning.
//!
//! Repositories are created with issues, wiki and downloads disabled and a
//! description pointing back at the source clone URL. Settings are final;
//! existing destination repositories are never updated.

use anyhow::Context;
use reqwest::{Client, StatusCode};
use tracing::info;

use super::{ACCEPT, MirrorRepo, RemoteRepo, http_client, with_access_token};
use crate::error::{ApiError, Result, SyncResult};

/// Client for the private destination instance.
pub struct DestClient {
    client: Client,
    api_root: String,
    token: String,
}

impl DestClient {
    /// Create a client for the instance at `base_url`.
    ///
    /// The API root is `<base_url>/api/v3` (self-hosted instance layout).
    ///
    /// # Errors
    ///
    /// Returns an `ApiError::InvalidUrl` if `base_url` is not an HTTP(S) URL.
    pub fn new(base_url: &str, token: impl Into<String>) -> SyncResult<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(base_url.to_string()).into());
        }
        Ok(Self {
            client: http_client().clone(),
            api_root: format!("{}/api/v3", base_url.trim_end_matches('/')),
            token: token.into(),
        })
    }

    /// Get the resolved API root.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// The token-embedded push URL for a destination repository.
    #[must_use]
    pub fn push_url(&self, repo: &MirrorRepo) -> String {
        with_access_token(&repo.clone_url, &self.token)
    }

    /// Return the descriptor of `<account>/<name>`, or `None` if it does not
    /// exist on the destination.
    ///
    /// # Errors
    ///
    /// Returns an error on request failure or any status other than success
    /// and 404.
    pub async fn get_repository(&self, account: &str, name: &str) -> Result<Option<MirrorRepo>> {
        let url = format!("{}/repos/{account}/{name}", self.api_root);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .send()
            .await
            .with_context(|| format!("failed to look up {account}/{name} on destination"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let repo = response
            .json::<MirrorRepo>()
            .await
            .with_context(|| format!("failed to parse destination repository {account}/{name}"))?;
        Ok(Some(repo))
    }

    /// Create `<account>/<name>` on the destination with mirror-safe defaults.
    ///
    /// # Errors
    ///
    /// Returns an error on request failure, a non-success status, or an
    /// unparsable response body.
    pub async fn create_repository(&self, account: &str, source: &RemoteRepo) -> Result<MirrorRepo> {
        info!(
            repo = %source.name,
            "repository not found on destination, creating"
        );

        let url = format!("{}/orgs/{account}/repos", self.api_root);
        let mut body = serde_json::json!({
            "name": source.name,
            "description": format!(
                "This repository is automatically synced. Please push changes to {}",
                source.clone_url
            ),
            "homepage": source.clone_url,
            "has_issues": false,
            "has_wiki": false,
            "has_downloads": false,
        });
        if let Some(branch) = &source.default_branch {
            body["default_branch"] = serde_json::json!(branch);
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to create {account}/{} on destination", source.name))?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let repo = response
            .json::<MirrorRepo>()
            .await
            .with_context(|| "failed to parse created destination repository")?;
        Ok(repo)
    }

    /// Return the destination descriptor for `source`, creating the
    /// repository if it is missing. At most one creation call per missing
    /// repository per cycle; existing repositories are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or the creation fails.
    pub async fn ensure_repository(&self, account: &str, source: &RemoteRepo) -> Result<MirrorRepo> {
        match self.get_repository(account, &source.name).await? {
            Some(existing) => Ok(existing),
            None => self.create_repository(account, source).await,
        }
    }
}
