//! Terminal renderer: ratatui view over a `PlaybackController`.
//!
//! ## Architecture (TEA)
//!
//! Model (`TuiApp`) + Update (message handler) + View (`layout::draw`).
//! The view only reads controller state; every mutation goes through the
//! controller's public operations, driven by key bindings and fired timers.

pub mod app;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
