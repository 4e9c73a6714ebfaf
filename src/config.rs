//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::{endpoints, settings};
use crate::error::{Error, Result};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// Version string of the installed app, compared against published releases
    pub installed_version: String,
    /// Owner of the repository publishing releases
    pub update_owner: String,
    /// Repository publishing releases
    pub update_repo: String,
    /// Base URL of the music server, used for artwork links (ends with `/`)
    pub server_url: Option<String>,
    /// Where persisted settings live
    pub settings_path: PathBuf,
    /// LRCLIB base URL
    pub lrclib_base_url: String,
    /// `GitHub` API base URL
    pub github_api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            installed_version: env!("CARGO_PKG_VERSION").to_string(),
            update_owner: endpoints::UPDATE_OWNER.to_string(),
            update_repo: endpoints::UPDATE_REPO.to_string(),
            server_url: None,
            settings_path: default_settings_path(),
            lrclib_base_url: endpoints::LRCLIB_BASE_URL.to_string(),
            github_api_base_url: endpoints::GITHUB_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(version) = env::var("SWING_INSTALLED_VERSION") {
            let version = version.trim().trim_start_matches(['v', 'V']).to_string();
            if version.is_empty() {
                return Err(Error::config(
                    "SWING_INSTALLED_VERSION is empty",
                    "Set it to a dotted version such as 1.0.4.5 or unset it",
                ));
            }
            config.installed_version = version;
        }

        if let Ok(owner) = env::var("SWING_UPDATE_OWNER") {
            config.update_owner = owner;
        }

        if let Ok(repo) = env::var("SWING_UPDATE_REPO") {
            config.update_repo = repo;
        }

        config.server_url = env::var("SWING_SERVER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| normalize_base_url(&url));

        if let Ok(path) = env::var("SWING_SETTINGS_PATH") {
            config.settings_path = PathBuf::from(shellexpand::tilde(&path).to_string());
        }

        if let Ok(url) = env::var("LRCLIB_BASE_URL") {
            config.lrclib_base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(url) = env::var("GITHUB_API_BASE_URL") {
            config.github_api_base_url = url.trim_end_matches('/').to_string();
        }

        tracing::debug!(
            "Loaded config: installed {} checking {}/{}",
            config.installed_version, config.update_owner, config.update_repo
        );

        Ok(config)
    }
}

/// Platform default for the settings file
fn default_settings_path() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(settings::APP_DIR)
        .join(settings::FILE_NAME)
}

/// Artwork paths are appended directly, so the base must end with a slash
fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}
