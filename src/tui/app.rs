//! TuiApp: the TEA model.
//!
//! Holds the controller plus renderer-only state (preferences, status line).
//! Update receives TuiMessages and mutates state. View reads it.

use crate::config::Preferences;
use crate::language::LanguageTable;
use crate::player::{PlaybackController, PlayerEvent, PlayerResult, Scheduler};

use super::event::TuiMessage;
use super::input;

/// Maximum number of player events kept for the status line.
const EVENT_LOG_CAPACITY: usize = 64;

/// The main TUI application state (TEA model).
pub struct TuiApp<S: Scheduler> {
    /// The playback state machine.
    pub player: PlaybackController<S>,
    /// Resolves highlighter tags for the code pane title.
    pub languages: LanguageTable,
    /// Line numbers, theme, auto-advance. Saved on exit when dirty.
    pub preferences: Preferences,
    /// Set whenever a preference changes.
    pub preferences_dirty: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Last rejected command, shown in the status bar until the next change.
    pub last_error: Option<String>,
    /// Recent player events (ring buffer).
    pub event_log: Vec<PlayerEvent>,
}

impl<S: Scheduler> TuiApp<S> {
    pub fn new(player: PlaybackController<S>, languages: LanguageTable, preferences: Preferences) -> Self {
        Self {
            player,
            languages,
            preferences,
            preferences_dirty: false,
            should_quit: false,
            last_error: None,
            event_log: Vec::new(),
        }
    }

    /// Process a message, updating state.
    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => input::handle_key(self, key),
            TuiMessage::Timer(id) => self.player.fire(id),
            TuiMessage::Player(event) => {
                if matches!(event, PlayerEvent::TabChanged { .. }) {
                    self.last_error = None;
                }
                if !matches!(event, PlayerEvent::Revealed { .. }) {
                    self.event_log.push(event);
                    if self.event_log.len() > EVENT_LOG_CAPACITY {
                        self.event_log.remove(0);
                    }
                }
            }
            TuiMessage::Quit => self.should_quit = true,
        }
    }

    /// Language tag of the active tab.
    pub fn active_language(&self) -> Option<&str> {
        self.player.active_tab().map(|tab| self.languages.for_tab(tab))
    }

    pub fn next_tab(&mut self) {
        let result = self.player.select_relative(1);
        self.record(result);
    }

    pub fn prev_tab(&mut self) {
        let result = self.player.select_relative(-1);
        self.record(result);
    }

    pub fn select_index(&mut self, index: usize) {
        let result = self.player.select_index(index);
        self.record(result);
    }

    /// Replay the active tab from the first char.
    pub fn restart(&mut self) {
        let Some(id) = self.player.active_tab().map(|t| t.id.clone()) else {
            return;
        };
        let result = self.player.select_tab(&id);
        self.record(result);
    }

    pub fn toggle_play(&mut self) {
        self.player.toggle_play();
    }

    pub fn toggle_auto_advance(&mut self) {
        let enabled = self.player.toggle_auto_advance();
        self.preferences.auto_advance = Some(enabled);
        self.preferences_dirty = true;
    }

    pub fn toggle_line_numbers(&mut self) {
        self.preferences.show_line_numbers = !self.preferences.show_line_numbers;
        self.preferences_dirty = true;
    }

    pub fn cycle_theme(&mut self) {
        self.preferences.theme = self.preferences.theme.next();
        self.preferences_dirty = true;
    }

    fn record(&mut self, result: PlayerResult<()>) {
        self.last_error = result.err().map(|e| e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{PlayerConfig, Theme};
    use crate::player::{ManualScheduler, Tab, TabSet};

    fn app(tabs: Vec<Tab>) -> TuiApp<ManualScheduler> {
        let player = PlaybackController::new(
            TabSet::new(tabs).unwrap(),
            &PlayerConfig::default(),
            ManualScheduler::new(),
        );
        TuiApp::new(player, LanguageTable::default(), Preferences::default())
    }

    #[test]
    fn quit_on_message() {
        let mut app = app(vec![]);
        app.update(TuiMessage::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn timer_message_reaches_controller() {
        let mut app = app(vec![Tab::new("a", "A", "xyz")]);
        let id = app.player.scheduler_mut().pop_due(Duration::from_secs(1)).unwrap();
        app.update(TuiMessage::Timer(id));
        assert_eq!(app.player.visible_text(), "x");
    }

    #[test]
    fn toggles_mark_preferences_dirty() {
        let mut app = app(vec![Tab::new("a", "A", "")]);
        assert!(!app.preferences_dirty);

        app.toggle_auto_advance();
        assert_eq!(app.preferences.auto_advance, Some(true));
        app.toggle_line_numbers();
        assert!(!app.preferences.show_line_numbers);
        app.cycle_theme();
        assert_eq!(app.preferences.theme, Theme::Dracula);
        assert!(app.preferences_dirty);
    }

    #[test]
    fn bad_selection_is_reported_then_cleared() {
        let mut app = app(vec![Tab::new("a", "A", ""), Tab::new("b", "B", "")]);
        app.select_index(7);
        assert!(app.last_error.is_some());
        app.next_tab();
        assert!(app.last_error.is_none());
        assert_eq!(app.player.active_index(), Some(1));
    }

    #[test]
    fn event_log_ring_buffer() {
        let mut app = app(vec![]);
        for i in 0..100 {
            app.update(TuiMessage::Player(PlayerEvent::TabsReplaced { count: i }));
        }
        assert_eq!(app.event_log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(app.event_log[0], PlayerEvent::TabsReplaced { count: 36 });
    }

    #[test]
    fn active_language_uses_table() {
        let app = app(vec![Tab::new("postgresql", "PG", "")]);
        assert_eq!(app.active_language(), Some("sql"));
    }
}
