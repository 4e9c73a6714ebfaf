//! Synchronized lyrics.
//!
//! Parses LRC documents (`[mm:ss.xx]text` per line) into time-ordered
//! [`LyricLine`]s and locates the line active at a playback position.

/// LRCLIB lookup client
pub mod api;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use api::{LrclibClient, LyricsLookup, LyricsQuery, LyricsSource};

/// Whole-line LRC tag: `[MM:SS.ff]` or `[MM:SS.fff]` followed by the lyric text.
#[allow(clippy::expect_used)]
static RE_LRC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([0-9]{2}):([0-9]{2})\.([0-9]{2,3})\](.*)$").expect("valid regex: RE_LRC_LINE")
});

/// One timed lyric line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Offset from track start in milliseconds.
    pub time_ms: u64,
    /// Lyric text; empty for an instrumental break.
    pub text: String,
}

impl LyricLine {
    /// Create a line from an offset and text.
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        Self { time_ms, text: text.into() }
    }
}

impl fmt::Display for LyricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.time_ms / 60_000;
        let seconds = (self.time_ms % 60_000) / 1_000;
        let millis = self.time_ms % 1_000;
        write!(f, "[{minutes:02}:{seconds:02}.{millis:03}]{}", self.text)
    }
}

/// What the lyrics panel currently shows for the playing track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LyricsState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A lookup is in flight.
    Loading,
    /// Lyrics were found; either form may be missing.
    Success {
        /// Parsed synced lyrics, if the service had an LRC body.
        synced: Option<Vec<LyricLine>>,
        /// Unsynced plain text.
        plain: Option<String>,
    },
    /// The service has no lyrics for this track.
    NotFound,
    /// The lookup failed.
    Error(String),
}

/// Parse an optional LRC document.
///
/// Absent input means "no synced lyrics" and yields an empty vector.
pub fn parse_lrc(input: Option<&str>) -> Vec<LyricLine> {
    input.map(parse_lrc_str).unwrap_or_default()
}

/// Parse an LRC document into lines sorted by timestamp.
///
/// Lines break on `\n`, `\r\n` or a bare `\r`. Every trimmed line must be a
/// complete `[MM:SS.ff]text` or `[MM:SS.fff]text` match; anything else is
/// dropped. Equal timestamps keep document order.
pub fn parse_lrc_str(input: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = input.split(['\r', '\n']).filter_map(parse_lrc_line).collect();
    lines.sort_by_key(|line| line.time_ms);
    lines
}

/// Parse a single line, or `None` when it is not a well-formed LRC line.
fn parse_lrc_line(raw: &str) -> Option<LyricLine> {
    let caps = RE_LRC_LINE.captures(raw.trim())?;

    let minutes = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let seconds = caps.get(2)?.as_str().parse::<u64>().ok()?;
    let fraction = caps.get(3)?.as_str();
    let fraction_value = fraction.parse::<u64>().ok()?;
    // Two digits are centiseconds, three are milliseconds
    let millis = if fraction.len() == 2 { fraction_value * 10 } else { fraction_value };

    let text = caps.get(4).map_or("", |m| m.as_str()).trim();

    Some(LyricLine {
        time_ms: minutes * 60_000 + seconds * 1_000 + millis,
        text: text.to_string(),
    })
}

/// Index of the line active at `position_ms`.
///
/// That is the last line starting at or before the position; `None` before
/// the first line. `lines` must be sorted as [`parse_lrc_str`] returns them.
pub fn active_line_index(lines: &[LyricLine], position_ms: u64) -> Option<usize> {
    lines
        .partition_point(|line| line.time_ms <= position_ms)
        .checked_sub(1)
}
