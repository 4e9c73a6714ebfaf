//! Discord now-playing notifications.
//!
//! Builds webhook embeds for the playing track and posts them when the user
//! has enabled the webhook in settings.

use chrono::{Local, NaiveTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;

use crate::constants::{discord, http};
use crate::error::{Error, Result};
use crate::settings::AppSettings;
use crate::types::Track;

const SERVICE: &str = "Discord";

/// Body of a webhook execution request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Plain message content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Rich embeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
}

/// A rich embed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Embed {
    /// Embed title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Markdown body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accent colour as `0xRRGGBB`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Key/value fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<EmbedField>>,
    /// Small image at the top right.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    /// Footer line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

/// An embed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field label.
    pub name: String,
    /// Field value.
    pub value: String,
    /// Render next to neighbouring inline fields.
    #[serde(default)]
    pub inline: bool,
}

/// Embed thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedThumbnail {
    /// Image URL.
    pub url: String,
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

/// Format whole seconds as `M:SS`.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Thumbnail link for server artwork; `None` unless both parts are present.
fn thumbnail_url(server_base_url: Option<&str>, image: Option<&str>) -> Option<String> {
    let base = server_base_url.filter(|b| !b.trim().is_empty())?;
    let image = image.filter(|i| !i.trim().is_empty())?;
    Some(format!("{base}img/thumbnail/{image}"))
}

/// Build the now-playing embed for `track`.
///
/// `server_base_url` must end with `/`; `time` is the local time shown in the footer.
pub fn build_now_playing_payload(
    track: &Track,
    server_base_url: Option<&str>,
    time: NaiveTime,
) -> WebhookPayload {
    let artists = if track.artists.is_empty() {
        discord::UNKNOWN_ARTIST.to_string()
    } else {
        track.artist_line()
    };
    let album = if track.album.trim().is_empty() {
        discord::UNKNOWN_ALBUM
    } else {
        track.album.as_str()
    };

    let embed = Embed {
        title: Some(discord::NOW_PLAYING_TITLE.to_string()),
        description: Some(format!("**{}**\nby {}", track.title, artists)),
        color: Some(discord::EMBED_COLOR),
        fields: Some(vec![
            EmbedField { name: "Album".into(), value: album.to_string(), inline: true },
            EmbedField {
                name: "Duration".into(),
                value: format_duration(track.duration_secs),
                inline: true,
            },
        ]),
        thumbnail: thumbnail_url(server_base_url, track.image.as_deref())
            .map(|url| EmbedThumbnail { url }),
        footer: Some(EmbedFooter {
            text: format!("{} • {}", discord::FOOTER_PREFIX, time.format("%H:%M:%S")),
        }),
    };

    WebhookPayload { content: None, embeds: Some(vec![embed]) }
}

/// Result of a notification attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The webhook accepted the payload.
    Sent,
    /// Nothing was sent: the webhook is disabled, unset, or the track has no title.
    Skipped,
}

/// Posts now-playing embeds to a Discord webhook
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    server_base_url: Option<String>,
}

impl WebhookNotifier {
    /// Create a notifier; `server_base_url` is used for artwork thumbnails.
    pub fn new(server_base_url: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(StdDuration::from_secs(http::TIMEOUT_SECS))
                .user_agent(http::USER_AGENT)
                .build()
                .unwrap_or_default(),
            server_base_url,
        }
    }

    /// Send a now-playing notification for `track` if the settings allow it.
    ///
    /// Failures are returned to the caller, which decides whether to retry
    /// (see [`Error::is_transient`]).
    pub async fn notify(&self, settings: &AppSettings, track: &Track) -> Result<NotifyOutcome> {
        let Some(url) = settings.webhook_target() else {
            tracing::debug!("Webhook disabled or URL empty");
            return Ok(NotifyOutcome::Skipped);
        };
        if track.title.trim().is_empty() {
            tracing::debug!("Track has no title, not notifying");
            return Ok(NotifyOutcome::Skipped);
        }

        let payload = build_now_playing_payload(
            track,
            self.server_base_url.as_deref(),
            Local::now().time(),
        );
        self.send(url, &payload).await?;

        tracing::info!("Sent now-playing webhook: {}", track.title);
        Ok(NotifyOutcome::Sent)
    }

    /// Post a raw payload to `webhook_url`.
    pub async fn send(&self, webhook_url: &str, payload: &WebhookPayload) -> Result<()> {
        let resp = self.client
            .post(webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Webhook request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Failed to send webhook: {status}");
            return Err(Error::api_status(
                SERVICE,
                format!("Webhook returned {status}"),
                status.as_u16(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn track() -> Track {
        Track {
            title: "Get Lucky".into(),
            artists: vec!["Daft Punk".into(), "Pharrell Williams".into()],
            album: "Random Access Memories".into(),
            image: Some("abc123.webp".into()),
            duration_secs: 369,
        }
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 5, 9).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(369), "6:09");
        assert_eq!(format_duration(3600), "60:00");
    }

    #[test]
    fn test_now_playing_embed() {
        let payload = build_now_playing_payload(&track(), Some("http://music.local:1970/"), noon());
        let embed = &payload.embeds.as_ref().unwrap()[0];

        assert_eq!(embed.title.as_deref(), Some("🎵 Now Playing"));
        assert_eq!(
            embed.description.as_deref(),
            Some("**Get Lucky**\nby Daft Punk, Pharrell Williams")
        );
        assert_eq!(embed.color, Some(0x1D_B954));
        let fields = embed.fields.as_ref().unwrap();
        assert_eq!(fields[0].value, "Random Access Memories");
        assert_eq!(fields[1].value, "6:09");
        assert!(fields.iter().all(|f| f.inline));
        assert_eq!(
            embed.thumbnail.as_ref().unwrap().url,
            "http://music.local:1970/img/thumbnail/abc123.webp"
        );
        assert_eq!(embed.footer.as_ref().unwrap().text, "SwingMusic • 12:05:09");
    }

    #[test]
    fn test_thumbnail_requires_image_and_base() {
        let mut t = track();
        let payload = build_now_playing_payload(&t, None, noon());
        assert!(payload.embeds.unwrap()[0].thumbnail.is_none());

        t.image = Some("  ".into());
        let payload = build_now_playing_payload(&t, Some("http://host/"), noon());
        assert!(payload.embeds.unwrap()[0].thumbnail.is_none());
    }

    #[test]
    fn test_fallbacks_for_missing_metadata() {
        let t = Track { title: "Untitled".into(), ..Track::default() };
        let payload = build_now_playing_payload(&t, None, noon());
        let embed = &payload.embeds.unwrap()[0];
        assert_eq!(embed.description.as_deref(), Some("**Untitled**\nby Unknown Artist"));
        assert_eq!(embed.fields.as_ref().unwrap()[0].value, "Unknown Album");
    }

    #[test]
    fn test_payload_json_omits_absent_fields() {
        let payload = build_now_playing_payload(&track(), None, noon());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("content").is_none());
        let embed = &json["embeds"][0];
        assert!(embed.get("thumbnail").is_none());
        assert_eq!(embed["color"], 0x1D_B954);
        assert_eq!(embed["fields"][1]["name"], "Duration");
    }

    #[tokio::test]
    async fn test_notify_skips_when_disabled() {
        let notifier = WebhookNotifier::new(None);
        let mut settings = AppSettings::default();
        assert_eq!(notifier.notify(&settings, &track()).await.unwrap(), NotifyOutcome::Skipped);

        settings.discord_webhook_enabled = true;
        settings.discord_webhook_url = "   ".into();
        assert_eq!(notifier.notify(&settings, &track()).await.unwrap(), NotifyOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_notify_skips_untitled_track() {
        let notifier = WebhookNotifier::new(None);
        let settings = AppSettings {
            discord_webhook_enabled: true,
            discord_webhook_url: "http://127.0.0.1:9/hook".into(),
            ..AppSettings::default()
        };
        let untitled = Track { title: String::new(), ..track() };
        assert_eq!(notifier.notify(&settings, &untitled).await.unwrap(), NotifyOutcome::Skipped);
    }
}
