use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;

use crate::config::Config;
use crate::constants::http;
use crate::error::{Error, Result};

const SERVICE: &str = "GitHub";

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release was cut from, e.g. `v1.0.4.6`.
    pub tag_name: String,
    /// Release title.
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes in markdown.
    #[serde(default)]
    pub body: Option<String>,
    /// Downloadable files attached to the release.
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// File name.
    pub name: String,
    /// Public download link.
    pub browser_download_url: String,
}

/// Anything that can report the latest release of a repository.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch the latest published release of `owner/repo`.
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release>;
}

/// Client for the `GitHub` releases API
#[derive(Clone)]
pub struct GitHubClient {
    base_url: String,
    client: Client,
}

impl GitHubClient {
    /// Create a new `GitHub` client from config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.github_api_base_url)
    }

    /// Create a client against a specific API base URL
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(StdDuration::from_secs(http::TIMEOUT_SECS))
                .user_agent(http::USER_AGENT)
                .build()
                .unwrap_or_default(),
        }
    }

    fn latest_release_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{}/{}/releases/latest", self.base_url, owner, repo)
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release> {
        let path = format!("{owner}/{repo}");
        let resp = self.client
            .get(self.latest_release_url(owner, repo))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::Network(format!("Release request for {} failed: {}", path, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::api_status(
                SERVICE,
                format!("Failed to fetch release for {path}: {status}"),
                status.as_u16(),
            ));
        }

        let release: Release = resp.json().await
            .map_err(|e| Error::parse(format!("Invalid JSON from {}: {}", SERVICE, e), None))?;
        tracing::debug!("Latest release of {path} is {}", release.tag_name);
        Ok(release)
    }
}
