use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration as StdDuration;

use super::{parse_lrc, LyricLine, LyricsState};
use crate::config::Config;
use crate::constants::http;
use crate::error::{Error, Result};

const SERVICE: &str = "LRCLIB";

/// Track identity sent to the lyrics service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    /// Track title.
    pub track_name: String,
    /// Artist name.
    pub artist_name: String,
    /// Album name.
    pub album_name: String,
    /// Track duration in whole seconds.
    pub duration_seconds: u32,
}

/// Raw LRCLIB `/api/get` response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricsRecord {
    /// LRCLIB record id.
    pub id: Option<i64>,
    /// Track title as stored by LRCLIB.
    pub track_name: Option<String>,
    /// Artist name as stored by LRCLIB.
    pub artist_name: Option<String>,
    /// Album name as stored by LRCLIB.
    pub album_name: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    /// Whether the track has no vocals.
    pub instrumental: Option<bool>,
    /// Unsynced lyrics.
    pub plain_lyrics: Option<String>,
    /// LRC-tagged lyrics.
    pub synced_lyrics: Option<String>,
}

/// Outcome of a lyrics lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsLookup {
    /// The service knows this track.
    Found {
        /// Parsed synced lyrics, when the record has an LRC body.
        synced: Option<Vec<LyricLine>>,
        /// Unsynced plain text.
        plain: Option<String>,
    },
    /// The service has no record for this track.
    NotFound,
}

impl LyricsLookup {
    /// Build a lookup result from a service record, parsing only its LRC field.
    pub fn from_record(record: LyricsRecord) -> Self {
        let synced = record
            .synced_lyrics
            .as_deref()
            .map(|lrc| parse_lrc(Some(lrc)));
        Self::Found { synced, plain: record.plain_lyrics }
    }

    /// Map to the player's lyrics panel state.
    pub fn into_state(self) -> LyricsState {
        match self {
            Self::Found { synced, plain } => LyricsState::Success { synced, plain },
            Self::NotFound => LyricsState::NotFound,
        }
    }
}

impl From<Result<LyricsLookup>> for LyricsState {
    fn from(result: Result<LyricsLookup>) -> Self {
        match result {
            Ok(lookup) => lookup.into_state(),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Anything that can look up lyrics for a track.
#[async_trait]
pub trait LyricsSource: Send + Sync {
    /// Fetch lyrics, distinguishing "no lyrics" from a failed request.
    async fn get_lyrics(&self, query: &LyricsQuery) -> Result<LyricsLookup>;
}

/// Client for the LRCLIB lyrics service
#[derive(Clone)]
pub struct LrclibClient {
    base_url: String,
    client: Client,
}

impl LrclibClient {
    /// Create a new LRCLIB client from config
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.lrclib_base_url)
    }

    /// Create a client against a specific base URL
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

    fn lookup_url(&self) -> String {
        format!("{}/api/get", self.base_url)
    }
}

#[async_trait]
impl LyricsSource for LrclibClient {
    async fn get_lyrics(&self, query: &LyricsQuery) -> Result<LyricsLookup> {
        let duration = query.duration_seconds.to_string();
        let resp = self.client
            .get(self.lookup_url())
            .query(&[
                ("track_name", query.track_name.as_str()),
                ("artist_name", query.artist_name.as_str()),
                ("album_name", query.album_name.as_str()),
                ("duration", duration.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(format!("Lyrics request for {} failed: {}", query.track_name, e)))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("No lyrics for {} - {}", query.artist_name, query.track_name);
            return Ok(LyricsLookup::NotFound);
        }
        if !status.is_success() {
            return Err(Error::api_status(
                SERVICE,
                format!("Lyrics request returned {status}"),
                status.as_u16(),
            ));
        }

        let record: LyricsRecord = resp.json().await
            .map_err(|e| Error::parse(format!("Invalid JSON from {SERVICE}: {e}"), None))?;

        let lookup = LyricsLookup::from_record(record);
        if let LyricsLookup::Found { synced, plain } = &lookup {
            tracing::info!(
                "Lyrics for {}: {} synced lines, plain text {}",
                query.track_name,
                synced.as_ref().map_or(0, Vec::len),
                if plain.is_some() { "present" } else { "absent" },
            );
        }
        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    const RESPONSE: &str = r#"{
        "id": 3396226,
        "trackName": "I Want to Live",
        "artistName": "Borislav Slavov",
        "albumName": "Baldur's Gate 3",
        "duration": 233.0,
        "instrumental": false,
        "plainLyrics": "I feel your breath upon my neck\nA soft caress",
        "syncedLyrics": "[00:17.12] I feel your breath upon my neck\n[00:03.00]\n[00:20.50] A soft caress"
    }"#;

    #[test]
    fn record_deserializes_from_camel_case() {
        let record: LyricsRecord = serde_json::from_str(RESPONSE).unwrap();
        assert_eq!(record.id, Some(3_396_226));
        assert_eq!(record.album_name.as_deref(), Some("Baldur's Gate 3"));
        assert_eq!(record.instrumental, Some(false));
    }

    #[test]
    fn only_synced_field_is_parsed() {
        let record: LyricsRecord = serde_json::from_str(RESPONSE).unwrap();
        let LyricsLookup::Found { synced, plain } = LyricsLookup::from_record(record) else {
            panic!("Expected Found");
        };
        let synced = synced.unwrap();
        assert_eq!(synced.len(), 3);
        assert_eq!(synced[0], LyricLine::new(3000, ""));
        assert_eq!(synced[1].time_ms, 17_120);
        assert!(plain.unwrap().starts_with("I feel"));
    }

    #[test]
    fn missing_synced_field_stays_absent() {
        let record: LyricsRecord =
            serde_json::from_str(r#"{"plainLyrics": "words", "syncedLyrics": null}"#).unwrap();
        let state = LyricsLookup::from_record(record).into_state();
        assert_eq!(
            state,
            LyricsState::Success { synced: None, plain: Some("words".into()) }
        );
    }

    #[test]
    fn results_map_to_panel_states() {
        assert_eq!(LyricsState::from(Ok::<_, Error>(LyricsLookup::NotFound)), LyricsState::NotFound);
        let failed = LyricsState::from(Err::<LyricsLookup, _>(Error::Network("offline".into())));
        assert_eq!(failed, LyricsState::Error("Network error: offline".into()));
    }

    #[test]
    fn lookup_url_ignores_trailing_slash() {
        let client = LrclibClient::with_base_url("https://lrclib.net/");
        assert_eq!(client.lookup_url(), "https://lrclib.net/api/get");
    }
}
