//! `SwingMusic` companion core.
//!
//! Synchronized LRC lyrics, in-app update checks and Discord now-playing
//! notifications for the `SwingMusic` client.


// Re-export public modules for use in integration tests and as a library
pub mod config;
pub mod constants;
pub mod discord;
pub mod error;
pub mod lyrics;
pub mod settings;
pub mod types;
pub mod updates;
