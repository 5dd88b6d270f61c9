//! Key binding dispatch for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::player::Scheduler;

use super::app::TuiApp;

/// Handle a key event, mutating app state.
pub fn handle_key<S: Scheduler>(app: &mut TuiApp<S>, key: KeyEvent) {
    // Windows reports releases too.
    if key.kind == KeyEventKind::Release {
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_tab(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.prev_tab(),
        KeyCode::Char(' ') => app.toggle_play(),
        KeyCode::Char('a') => app.toggle_auto_advance(),
        KeyCode::Char('n') => app.toggle_line_numbers(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('r') => app.restart(),
        KeyCode::Char(c @ '1'..='9') => app.select_index(c as usize - '1' as usize),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlayerConfig, Preferences};
    use crate::language::LanguageTable;
    use crate::player::{ManualScheduler, PlaybackController, Tab, TabSet};

    fn app() -> TuiApp<ManualScheduler> {
        let tabs = TabSet::new(vec![
            Tab::new("a", "A", "alpha"),
            Tab::new("b", "B", "beta"),
            Tab::new("c", "C", "gamma"),
        ])
        .unwrap();
        let player = PlaybackController::new(tabs, &PlayerConfig::default(), ManualScheduler::new());
        TuiApp::new(player, LanguageTable::default(), Preferences::default())
    }

    fn press(app: &mut TuiApp<ManualScheduler>, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn arrows_move_between_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.player.active_index(), Some(1));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.player.active_index(), Some(2));
    }

    #[test]
    fn digits_select_by_position() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.player.active_index(), Some(2));
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.player.active_index(), Some(2));
        assert!(app.last_error.is_some());
    }

    #[test]
    fn space_toggles_playback() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.player.is_playing());
        press(&mut app, KeyCode::Char(' '));
        assert!(app.player.is_playing());
    }

    #[test]
    fn a_toggles_auto_advance() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.player.auto_advance());
    }

    #[test]
    fn r_restarts_active_tab() {
        let mut app = app();
        app.player.advance_clock(std::time::Duration::from_millis(90));
        assert_eq!(app.player.reveal_len(), 3);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.player.reveal_len(), 0);
    }

    #[test]
    fn ctrl_c_and_q_quit() {
        let mut app = app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = self::app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert_eq!(app.player.active_index(), Some(0));
    }
}
