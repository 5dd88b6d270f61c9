//! snippet-player: typewriter-style code snippet player.
//!
//! The core is `player::PlaybackController`, a framework-agnostic state
//! machine driven by an injected scheduler. `tui` is one renderer for it.

pub mod config;
pub mod deck;
pub mod language;
pub mod player;
pub mod tui;
