//! Application constants.
//!
//! Centralizes endpoints, defaults and presentation values.

/// Remote endpoint defaults.
pub mod endpoints {
    /// Base URL of the LRCLIB lyrics service.
    pub const LRCLIB_BASE_URL: &str = "https://lrclib.net";

    /// Base URL of the `GitHub` REST API.
    pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

    /// Owner of the repository that publishes app releases.
    pub const UPDATE_OWNER: &str = "DerMinecrafter2020";

    /// Repository that publishes app releases.
    pub const UPDATE_REPO: &str = "android";
}

/// HTTP client constants.
pub mod http {
    /// Request timeout for all remote services, in seconds.
    pub const TIMEOUT_SECS: u64 = 30;

    /// `User-Agent` sent with every request (`GitHub` rejects requests without one).
    pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
}

/// Update check constants.
pub mod updates {
    /// File extensions of assets that can be installed on a device.
    pub const INSTALLABLE_EXTENSIONS: &[&str] = &[".apk"];

    /// Shown when a release carries no notes.
    pub const DEFAULT_RELEASE_NOTES: &str = "No release notes available";
}

/// Discord embed constants.
pub mod discord {
    /// Title of the now-playing embed.
    pub const NOW_PLAYING_TITLE: &str = "🎵 Now Playing";

    /// Embed accent colour.
    pub const EMBED_COLOR: u32 = 0x001D_B954;

    /// Prefix of the embed footer, followed by the local time.
    pub const FOOTER_PREFIX: &str = "SwingMusic";

    /// Fallback when a track lists no artists.
    pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

    /// Fallback when a track has no album.
    pub const UNKNOWN_ALBUM: &str = "Unknown Album";
}

/// Settings defaults.
pub mod settings {
    /// Default grid column count for album and artist views.
    pub const DEFAULT_GRID_COUNT: u32 = 2;

    /// Directory under the platform data dir holding app state.
    pub const APP_DIR: &str = "swingmusic";

    /// Settings file name.
    pub const FILE_NAME: &str = "settings.json";
}
