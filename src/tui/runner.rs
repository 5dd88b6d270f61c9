//! TUI runner: main loop that wires everything together.
//!
//! Creates terminal, spawns the key reader, runs main TEA loop. Player
//! timers run on `TokioScheduler`; their fired ids come back through the
//! same `select!` as input and render ticks.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::{PlayerConfig, Preferences};
use crate::language::LanguageTable;
use crate::player::{PlaybackController, TabSet, TimerId, TokioScheduler};

use super::app::TuiApp;
use super::event::TuiMessage;
use super::layout;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Forward crossterm key events until `stop` is set.
fn spawn_key_reader(tx: mpsc::UnboundedSender<KeyEvent>, stop: Arc<AtomicBool>) {
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::Relaxed) {
            if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
                continue;
            }
            if let Ok(Event::Key(key)) = event::read() {
                if tx.send(key).is_err() {
                    break;
                }
            }
        }
    });
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(
    tabs: TabSet,
    player_config: PlayerConfig,
    languages: LanguageTable,
    preferences: Preferences,
) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let (scheduler, fired_rx) = TokioScheduler::new();
    let player = PlaybackController::new(tabs, &player_config, scheduler);
    let player_rx = player.subscribe();
    let mut app = TuiApp::new(player, languages, preferences);

    let (key_tx, key_rx) = mpsc::unbounded_channel();
    let stop = Arc::new(AtomicBool::new(false));
    spawn_key_reader(key_tx, stop.clone());

    let result = event_loop(&mut terminal, &mut app, fired_rx, player_rx, key_rx).await;

    stop.store(true, Ordering::Relaxed);
    app.player.dispose();

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    if app.preferences_dirty {
        match app.preferences.save() {
            Ok(()) => info!("Preferences saved"),
            Err(e) => warn!("Failed to save preferences: {e}"),
        }
    }
    result
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut TuiApp<TokioScheduler>,
    mut fired_rx: mpsc::UnboundedReceiver<TimerId>,
    mut player_rx: broadcast::Receiver<crate::player::PlayerEvent>,
    mut key_rx: mpsc::UnboundedReceiver<KeyEvent>,
) -> anyhow::Result<()> {
    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps

    loop {
        tokio::select! {
            Some(id) = fired_rx.recv() => {
                app.update(TuiMessage::Timer(id));
            }
            event = player_rx.recv() => match event {
                Ok(event) => app.update(TuiMessage::Player(event)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!("player events lagged by {n}");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    app.update(TuiMessage::Quit);
                }
            },
            Some(key) = key_rx.recv() => {
                app.update(TuiMessage::Input(key));
            }
            _ = render_interval.tick() => {
                terminal.draw(|f| layout::draw(f, app))?;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
