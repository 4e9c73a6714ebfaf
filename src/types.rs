//! Shared domain records.
//!
//! Track metadata as the music server reports it, plus the small enums the
//! persisted settings are built from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A track as reported by the music server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Track {
    /// Track title.
    pub title: String,
    /// Credited artists, in display order.
    pub artists: Vec<String>,
    /// Album title.
    pub album: String,
    /// Artwork file name on the server, if any.
    pub image: Option<String>,
    /// Duration in whole seconds.
    pub duration_secs: u32,
}

impl Track {
    /// Artists joined for display, e.g. `"A, B"`.
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// Screen the app opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartPage {
    /// Folder browser.
    #[default]
    Folders,
    /// Album grid.
    Albums,
    /// Artist grid.
    Artists,
    /// Search screen.
    Search,
}

impl StartPage {
    /// Returns all start pages in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Folders, Self::Albums, Self::Artists, Self::Search]
    }

    /// Returns the human-readable name of this page.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Folders => "Folders",
            Self::Albums => "Albums",
            Self::Artists => "Artists",
            Self::Search => "Search",
        }
    }
}

impl fmt::Display for StartPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for StartPage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|page| page.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown start page: {s}"))
    }
}

/// Sort key for album and artist grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    /// Most recently played first.
    #[default]
    LastPlayed,
    /// Alphabetical by title or name.
    Title,
    /// Most played first.
    PlayCount,
    /// Most recently added first.
    DateAdded,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}
