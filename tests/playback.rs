//! End-to-end playback over the public API with a fake clock.

use std::time::Duration;

use snippet_player::config::{DeckConfig, PlayerConfig};
use snippet_player::deck;
use snippet_player::player::{ManualScheduler, PlaybackController, PlayerEvent};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Time for one tab: one tick per char, one completion check, the switch.
fn cycle_for(code: &str, config: &PlayerConfig) -> Duration {
    let chars = code.chars().count() as u64;
    ms((chars + 1) * config.typing_interval_ms + config.switch_delay_ms)
}

#[test]
fn builtin_deck_plays_through_and_wraps() {
    let deck = deck::builtin().unwrap();
    let tabs = deck.tab_set().unwrap();
    let ids: Vec<String> = tabs.iter().map(|t| t.id.clone()).collect();
    let codes: Vec<String> = tabs.iter().map(|t| t.code.clone()).collect();

    // Every revealed char is an event; keep them all.
    let config = PlayerConfig {
        event_capacity: 16_384,
        ..deck.player.clone()
    };
    let mut player = PlaybackController::new(tabs, &config, ManualScheduler::new());
    let mut rx = player.subscribe();

    for (i, code) in codes.iter().enumerate() {
        assert_eq!(player.snapshot().active_tab_id.as_deref(), Some(ids[i].as_str()));
        player.advance_clock(cycle_for(code, &config) - ms(1));
        assert_eq!(player.visible_text(), code.as_str());
        player.advance_clock(ms(1));
    }
    // back at the start
    assert_eq!(player.snapshot().active_tab_id.as_deref(), Some(ids[0].as_str()));
    assert_eq!(player.reveal_len(), 0);

    let changes: Vec<usize> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter_map(|e| match e {
            PlayerEvent::TabChanged { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![1, 2, 3, 4, 5, 0]);
}

#[test]
fn manual_deck_without_auto_advance_stays_put() {
    let yaml = r#"
player:
  typing_interval_ms: 10
  switch_delay_ms: 100
tabs:
  - { id: one, label: One, code: "abc" }
  - { id: two, label: Two, code: "de" }
"#;
    let deck = DeckConfig::from_yaml(yaml).unwrap();
    let mut player =
        PlaybackController::new(deck.tab_set().unwrap(), &deck.player, ManualScheduler::new());

    player.advance_clock(ms(10_000));
    assert_eq!(player.visible_text(), "abc");
    assert_eq!(player.scheduler().pending_count(), 0);

    player.select_tab("two").unwrap();
    player.advance_clock(ms(20));
    assert_eq!(player.visible_text(), "de");
}

#[test]
fn disposing_the_builtin_deck_releases_timers() {
    let deck = deck::builtin().unwrap();
    let mut player =
        PlaybackController::new(deck.tab_set().unwrap(), &deck.player, ManualScheduler::new());
    player.advance_clock(ms(100));
    assert_eq!(player.scheduler().pending_count(), 1);
    player.dispose();
    assert_eq!(player.scheduler().pending_count(), 0);
    assert!(player.is_disposed());
}
