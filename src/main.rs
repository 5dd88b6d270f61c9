use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snippet_player::config::{DeckConfig, Preferences, Theme};
use snippet_player::deck;
use snippet_player::tui::runner::run_tui;

#[derive(Parser)]
#[command(name = "snippet-player", about = "Typewriter-style code snippet player for the terminal.")]
struct Cli {
    /// Deck file (YAML). Defaults to the built-in showcase.
    #[arg(short, long)]
    deck: Option<PathBuf>,

    /// Delay between revealed characters, in milliseconds.
    #[arg(long)]
    typing_ms: Option<u64>,

    /// Delay before switching to the next tab, in milliseconds.
    #[arg(long)]
    switch_ms: Option<u64>,

    /// Start with auto-advance on.
    #[arg(long, conflicts_with = "no_auto")]
    auto: bool,

    /// Start with auto-advance off.
    #[arg(long)]
    no_auto: bool,

    /// Start paused.
    #[arg(long)]
    paused: bool,

    /// Color theme (duotone-sea, dracula, monokai, light).
    #[arg(long)]
    theme: Option<String>,

    /// Print the deck's tabs and inferred languages, then exit.
    #[arg(long)]
    list: bool,

    /// Write logs to this file (the TUI owns the terminal).
    #[arg(long)]
    log: Option<PathBuf>,
}

/// `RUST_LOG` wins when set and parseable; otherwise only our own crate
/// logs, at `default_level`.
fn log_filter(rust_log: Option<&str>, default_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(format!("snippet_player={default_level}")))
}

fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    let default_level = if log.is_some() { "info" } else { "warn" };
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref(), default_level);

    match log {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_ref())?;

    let deck_config = match &cli.deck {
        Some(path) => DeckConfig::load(path)
            .with_context(|| format!("cannot load deck {}", path.display()))?,
        None => deck::builtin()?,
    };
    let tabs = deck_config.tab_set()?;
    let languages = deck_config.language_table();

    if cli.list {
        for tab in tabs.iter() {
            println!("{:<16} {:<24} {}", tab.id, tab.label, languages.for_tab(tab));
        }
        return Ok(());
    }

    let mut preferences = Preferences::load();
    let mut player = deck_config.player.clone();
    preferences.apply(&mut player);

    if let Some(ms) = cli.typing_ms {
        player.typing_interval_ms = ms;
    }
    if let Some(ms) = cli.switch_ms {
        player.switch_delay_ms = ms;
    }
    if cli.auto {
        player.auto_advance = true;
    }
    if cli.no_auto {
        player.auto_advance = false;
    }
    if cli.paused {
        player.playing = false;
    }
    if let Some(name) = &cli.theme {
        let Some(theme) = Theme::from_name(name) else {
            bail!("unknown theme: {name}");
        };
        preferences.theme = theme;
    }

    info!(
        tabs = tabs.len(),
        typing_ms = player.typing_interval_ms,
        switch_ms = player.switch_delay_ms,
        "snippet-player starting"
    );

    run_tui(tabs, player, languages, preferences).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn rust_log_overrides_default_level() {
        let filter = log_filter(Some("snippet_player=debug"), "warn");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert!(filter.to_string().contains("snippet_player=debug"));
    }

    #[test]
    fn unset_rust_log_uses_default_level() {
        assert_eq!(log_filter(None, "warn").max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(None, "info").max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn blank_rust_log_uses_default_level() {
        assert_eq!(log_filter(Some("  "), "info").max_level_hint(), Some(LevelFilter::INFO));
    }
}
