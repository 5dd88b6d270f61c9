//! TUI event loop messages.
//!
//! The runner multiplexes:
//! - crossterm key events (blocking reader task)
//! - fired player timers (`TokioScheduler` channel)
//! - player broadcast events
//! - render interval (30fps, draw frame)
//!
//! Everything reaches `TuiApp::update` as a TuiMessage.

use crossterm::event::KeyEvent;

use crate::player::{PlayerEvent, TimerId};

/// Messages that drive the TUI update loop.
#[derive(Debug, Clone)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// A player timer fired.
    Timer(TimerId),
    /// Player state changed.
    Player(PlayerEvent),
    /// Quit the TUI.
    Quit,
}
