//! `SwingMusic` companion CLI.
//!
//! Usage:
//!   swingmusic lyrics --file song.lrc [--at 61000]
//!   swingmusic lyrics --track T --artist A --album B --duration 233 [--at 61000]
//!   swingmusic check-update
//!   swingmusic ignore-update <version> | --clear
//!   swingmusic notify --title T --artist A [--artist A2] --album B --duration 233 [--image I]
//!   swingmusic webhook [--url URL] [--enable | --disable]
//!   swingmusic settings

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use swingmusic::config::Config;
use swingmusic::discord::{NotifyOutcome, WebhookNotifier};
use swingmusic::lyrics::{
    active_line_index, parse_lrc_str, LrclibClient, LyricLine, LyricsQuery, LyricsSource, LyricsState,
};
use swingmusic::settings::SettingsStore;
use swingmusic::types::Track;
use swingmusic::updates::{GitHubClient, UpdateChecker};

const USAGE: &str = "usage: swingmusic <lyrics|check-update|ignore-update|notify|webhook|settings> [options]";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let config = Config::load().context("Failed to load config")?;
    let store = SettingsStore::new(config.settings_path.clone());

    match command.as_str() {
        "lyrics" => lyrics(&config, rest).await,
        "check-update" => check_update(&config, &store).await,
        "ignore-update" => ignore_update(&store, rest),
        "notify" => notify(&config, &store, rest).await,
        "webhook" => webhook(&store, rest),
        "settings" => {
            let settings = store.load()?;
            println!("# {}", store.path().display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        other => bail!("Unknown command {other:?}\n{USAGE}"),
    }
}

/// Value following `--name`, if present.
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Every value following a repeated `--name`.
fn flag_values<'a>(args: &'a [String], name: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|pair| pair[0] == name)
        .map(|pair| pair[1].as_str())
        .collect()
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    flag_value(args, name).with_context(|| format!("Missing {name}"))
}

fn parse_number<T: std::str::FromStr>(args: &[String], name: &str) -> Result<Option<T>> {
    flag_value(args, name)
        .map(|v| v.parse::<T>().map_err(|_| anyhow::anyhow!("{name} expects a number, got {v:?}")))
        .transpose()
}

async fn lyrics(config: &Config, args: &[String]) -> Result<()> {
    let position = parse_number::<u64>(args, "--at")?;

    let state = if let Some(path) = flag_value(args, "--file") {
        let text = fs_err::read_to_string(path)?;
        LyricsState::Success { synced: Some(parse_lrc_str(&text)), plain: None }
    } else {
        let query = LyricsQuery {
            track_name: required(args, "--track")?.to_string(),
            artist_name: required(args, "--artist")?.to_string(),
            album_name: required(args, "--album")?.to_string(),
            duration_seconds: parse_number(args, "--duration")?.unwrap_or(0),
        };
        LyricsState::from(LrclibClient::new(config).get_lyrics(&query).await)
    };

    match state {
        LyricsState::Success { synced: Some(lines), .. } if !lines.is_empty() => {
            print_synced(&lines, position);
        }
        LyricsState::Success { plain: Some(plain), .. } => println!("{plain}"),
        LyricsState::Success { .. } | LyricsState::NotFound => println!("No lyrics found"),
        LyricsState::Error(message) => bail!(message),
        LyricsState::Idle | LyricsState::Loading => {}
    }
    Ok(())
}

fn print_synced(lines: &[LyricLine], position: Option<u64>) {
    let active = position.and_then(|ms| active_line_index(lines, ms));
    for (i, line) in lines.iter().enumerate() {
        let marker = if Some(i) == active { ">" } else { " " };
        println!("{marker} {line}");
    }
}

async fn check_update(config: &Config, store: &SettingsStore) -> Result<()> {
    let settings = store.load()?;
    let checker = UpdateChecker::new(
        GitHubClient::new(config),
        config.update_owner.as_str(),
        config.update_repo.as_str(),
        config.installed_version.as_str(),
    );

    match checker.check(settings.ignored_update_version.as_deref()).await? {
        Some(update) => {
            println!("Update available: {} (installed {})", update.version_name, checker.installed_version());
            println!("Download: {}", update.download_url);
            println!("\n{}", update.release_notes);
        }
        None => println!("Up to date ({})", checker.installed_version()),
    }
    Ok(())
}

fn ignore_update(store: &SettingsStore, args: &[String]) -> Result<()> {
    let version = if has_flag(args, "--clear") {
        None
    } else {
        Some(args.first().context("Missing version to ignore")?.clone())
    };
    let settings = store.update(|s| s.ignored_update_version = version)?;
    match settings.ignored_update_version {
        Some(v) => println!("Ignoring update {v}"),
        None => println!("No update ignored"),
    }
    Ok(())
}

async fn notify(config: &Config, store: &SettingsStore, args: &[String]) -> Result<()> {
    let track = Track {
        title: required(args, "--title")?.to_string(),
        artists: flag_values(args, "--artist").into_iter().map(String::from).collect(),
        album: flag_value(args, "--album").unwrap_or_default().to_string(),
        image: flag_value(args, "--image").map(String::from),
        duration_secs: parse_number(args, "--duration")?.unwrap_or(0),
    };

    let settings = store.load()?;
    let notifier = WebhookNotifier::new(config.server_url.clone());
    match notifier.notify(&settings, &track).await {
        Ok(NotifyOutcome::Sent) => println!("Sent"),
        Ok(NotifyOutcome::Skipped) => println!("Skipped: webhook disabled or not configured"),
        Err(e) if e.is_transient() => bail!("{e} (temporary, try again later)"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn webhook(store: &SettingsStore, args: &[String]) -> Result<()> {
    if has_flag(args, "--enable") && has_flag(args, "--disable") {
        bail!("Pass only one of --enable and --disable");
    }

    let settings = store.update(|s| {
        if let Some(url) = flag_value(args, "--url") {
            s.discord_webhook_url = url.trim().to_string();
        }
        if has_flag(args, "--enable") {
            s.discord_webhook_enabled = true;
        }
        if has_flag(args, "--disable") {
            s.discord_webhook_enabled = false;
        }
    })?;

    println!(
        "Webhook {} ({})",
        if settings.discord_webhook_enabled { "enabled" } else { "disabled" },
        if settings.discord_webhook_url.is_empty() { "no URL" } else { "URL set" },
    );
    Ok(())
}
