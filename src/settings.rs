//! Persisted application preferences.
//!
//! Stored as a JSON document; unknown or missing keys fall back to defaults so
//! older files keep loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::settings::DEFAULT_GRID_COUNT;
use crate::error::{Error, Result};
use crate::types::{SortBy, SortOrder, StartPage};

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Columns in the album grid.
    pub album_grid_count: u32,
    /// Album sort key.
    pub album_sort_by: SortBy,
    /// Album sort direction.
    pub album_sort_order: SortOrder,
    /// Columns in the artist grid.
    pub artist_grid_count: u32,
    /// Artist sort key.
    pub artist_sort_by: SortBy,
    /// Artist sort direction.
    pub artist_sort_order: SortOrder,
    /// Check for updates on launch.
    pub auto_update_enabled: bool,
    /// Screen shown on launch.
    pub start_page: StartPage,
    /// Show the lyrics panel in the player.
    pub show_lyrics: bool,
    /// Release the user chose to skip.
    pub ignored_update_version: Option<String>,
    /// Post now-playing embeds to Discord.
    pub discord_webhook_enabled: bool,
    /// Discord webhook URL.
    pub discord_webhook_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            album_grid_count: DEFAULT_GRID_COUNT,
            album_sort_by: SortBy::default(),
            album_sort_order: SortOrder::default(),
            artist_grid_count: DEFAULT_GRID_COUNT,
            artist_sort_by: SortBy::default(),
            artist_sort_order: SortOrder::default(),
            auto_update_enabled: false,
            start_page: StartPage::default(),
            show_lyrics: false,
            ignored_update_version: None,
            discord_webhook_enabled: false,
            discord_webhook_url: String::new(),
        }
    }
}

impl AppSettings {
    /// Webhook URL to post to, or `None` when notifications are off or unset.
    pub fn webhook_target(&self) -> Option<&str> {
        let url = self.discord_webhook_url.trim();
        (self.discord_webhook_enabled && !url.is_empty()).then_some(url)
    }
}

/// Loads and saves [`AppSettings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by `path`; nothing is read until [`Self::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings, returning defaults when the file does not exist yet.
    pub fn load(&self) -> Result<AppSettings> {
        if !self.path.exists() {
            tracing::debug!("No settings at {}, using defaults", self.path.display());
            return Ok(AppSettings::default());
        }

        let text = fs_err::read_to_string(&self.path)
            .map_err(|e| Error::io(e, self.path.clone()))?;
        serde_json::from_str(&text)
            .map_err(|e| Error::parse(e.to_string(), self.path.clone()))
    }

    /// Write settings, creating parent directories as needed.
    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(|e| Error::io(e, parent.to_path_buf()))?;
        }

        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::parse(e.to_string(), self.path.clone()))?;
        fs_err::write(&self.path, json).map_err(|e| Error::io(e, self.path.clone()))?;

        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Load, modify and save in one step, returning the saved settings.
    pub fn update(&self, edit: impl FnOnce(&mut AppSettings)) -> Result<AppSettings> {
        let mut settings = self.load()?;
        edit(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        let settings = store.load().unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.album_grid_count, 2);
        assert_eq!(settings.album_sort_by, SortBy::LastPlayed);
        assert_eq!(settings.artist_sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_update_persists_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested/app/settings.json"));

        store.update(|s| {
            s.ignored_update_version = Some("1.0.4.6".into());
            s.start_page = StartPage::Albums;
        }).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.ignored_update_version.as_deref(), Some("1.0.4.6"));
        assert_eq!(reloaded.start_page, StartPage::Albums);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"show_lyrics": true}"#).unwrap();

        let settings = SettingsStore::new(&path).load().unwrap();
        assert!(settings.show_lyrics);
        assert_eq!(settings.artist_grid_count, 2);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        match SettingsStore::new(&path).load() {
            Err(Error::Parse { file: Some(file), .. }) => assert_eq!(file, path),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_webhook_target() {
        let mut settings = AppSettings {
            discord_webhook_url: " https://discord.com/api/webhooks/1/x ".into(),
            ..AppSettings::default()
        };
        assert_eq!(settings.webhook_target(), None);

        settings.discord_webhook_enabled = true;
        assert_eq!(settings.webhook_target(), Some("https://discord.com/api/webhooks/1/x"));
    }
}
