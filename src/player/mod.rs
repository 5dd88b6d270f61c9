//! Playback controller: the typewriter/auto-advance state machine.
//!
//! Owns `PlaybackState` and two timers: the reveal timer (one per char,
//! `typing_interval`) and the advance timer (one per tab transition,
//! `switch_delay`). At most one of each is pending. Every transition cancels
//! the timers it invalidates before scheduling new ones.
//!
//! The controller never blocks and never reads a clock. Timers come from an
//! injected [`Scheduler`]; the host feeds fired ids back through
//! [`PlaybackController::fire`].

pub mod error;
pub mod events;
pub mod scheduler;
pub mod tab;

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::config::PlayerConfig;

pub use error::{PlayerError, PlayerResult};
pub use events::PlayerEvent;
pub use scheduler::{ManualScheduler, Scheduler, TimerId, TokioScheduler};
pub use tab::{char_prefix, Tab, TabSet};

/// Mutable playback state. Read it through [`PlaybackController::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    /// Active tab, `None` iff the tab set is empty.
    pub active_tab_id: Option<String>,
    /// Chars of the active tab currently revealed.
    pub reveal_len: usize,
    pub playing: bool,
    pub auto_advance: bool,
}

pub struct PlaybackController<S: Scheduler> {
    tabs: TabSet,
    state: PlaybackState,
    active_index: Option<usize>,
    typing_interval: Duration,
    switch_delay: Duration,
    scheduler: S,
    reveal_timer: Option<TimerId>,
    advance_timer: Option<TimerId>,
    events: broadcast::Sender<PlayerEvent>,
    disposed: bool,
}

impl<S: Scheduler> PlaybackController<S> {
    /// Create a controller. The first tab (if any) becomes active and, when
    /// playing, its reveal loop starts immediately.
    pub fn new(tabs: TabSet, config: &PlayerConfig, scheduler: S) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let mut controller = Self {
            tabs,
            state: PlaybackState {
                active_tab_id: None,
                reveal_len: 0,
                playing: config.playing,
                auto_advance: config.auto_advance,
            },
            active_index: None,
            typing_interval: config.typing_interval(),
            switch_delay: config.switch_delay(),
            scheduler,
            reveal_timer: None,
            advance_timer: None,
            events,
            disposed: false,
        };
        if !controller.tabs.is_empty() {
            controller.activate(0);
        }
        controller
    }

    /// Subscribe to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Make `tab_id` active and replay it from the start.
    pub fn select_tab(&mut self, tab_id: &str) -> PlayerResult<()> {
        if self.disposed {
            return Err(PlayerError::Disposed);
        }
        let Some(index) = self.tabs.position(tab_id) else {
            warn!(tab_id, "select_tab: no such tab");
            return Err(PlayerError::InvalidTabId(tab_id.to_string()));
        };
        self.activate(index);
        Ok(())
    }

    /// Select by position in the tab set.
    pub fn select_index(&mut self, index: usize) -> PlayerResult<()> {
        match self.tabs.get(index) {
            Some(tab) => {
                let id = tab.id.clone();
                self.select_tab(&id)
            }
            None if self.disposed => Err(PlayerError::Disposed),
            None => Err(PlayerError::InvalidTabId(format!("#{index}"))),
        }
    }

    /// Select the tab `offset` positions away, wrapping in both directions.
    pub fn select_relative(&mut self, offset: isize) -> PlayerResult<()> {
        let Some(current) = self.active_index else {
            return Err(PlayerError::EmptyTabSet);
        };
        let len = self.tabs.len() as isize;
        let target = (current as isize + offset).rem_euclid(len) as usize;
        self.select_index(target)
    }

    /// Flip play/pause. Returns the new `playing` value.
    pub fn toggle_play(&mut self) -> bool {
        if self.disposed {
            return self.state.playing;
        }
        self.state.playing = !self.state.playing;
        self.emit(PlayerEvent::PlaybackToggled {
            playing: self.state.playing,
        });

        if self.state.playing {
            if self.active_index.is_some() {
                // Continues from the current cursor; completion is re-evaluated
                // on this tick too.
                self.schedule_tick();
            }
        } else {
            self.cancel_timers();
        }
        self.state.playing
    }

    /// Flip auto-advance. Returns the new value.
    pub fn toggle_auto_advance(&mut self) -> bool {
        if self.disposed {
            return self.state.auto_advance;
        }
        self.state.auto_advance = !self.state.auto_advance;
        self.emit(PlayerEvent::AutoAdvanceToggled {
            enabled: self.state.auto_advance,
        });

        if self.state.auto_advance {
            // A pending reveal tick will reach the completion check itself.
            if self.state.playing
                && self.is_complete()
                && self.reveal_timer.is_none()
                && self.advance_timer.is_none()
            {
                self.schedule_advance();
            }
        } else if let Some(id) = self.advance_timer.take() {
            self.scheduler.cancel(id);
        }
        self.state.auto_advance
    }

    /// Swap in a new tab set. The active id survives if present (restarted
    /// from zero); otherwise the first tab becomes active.
    pub fn replace_tabs(&mut self, tabs: TabSet) {
        if self.disposed {
            return;
        }
        self.cancel_timers();
        let keep = self
            .state
            .active_tab_id
            .as_deref()
            .and_then(|id| tabs.position(id));
        self.tabs = tabs;
        self.emit(PlayerEvent::TabsReplaced {
            count: self.tabs.len(),
        });

        match keep.or(if self.tabs.is_empty() { None } else { Some(0) }) {
            Some(index) => self.activate(index),
            None => {
                self.active_index = None;
                self.state.active_tab_id = None;
                self.state.reveal_len = 0;
            }
        }
    }

    /// Active tab's code truncated to the reveal cursor.
    pub fn visible_text(&self) -> &str {
        match self.active_tab() {
            Some(tab) => char_prefix(&tab.code, self.state.reveal_len),
            None => "",
        }
    }

    /// Deliver a fired timer. Unknown, stale, or post-dispose ids are dropped.
    pub fn fire(&mut self, id: TimerId) {
        if self.disposed {
            trace!(?id, "timer fired after dispose, ignoring");
            return;
        }
        if self.reveal_timer == Some(id) {
            self.reveal_timer = None;
            self.tick();
        } else if self.advance_timer == Some(id) {
            self.advance_timer = None;
            self.advance();
        } else {
            debug!(?id, "discarding stale timer");
        }
    }

    /// Release every pending timer. The controller stays inert afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_timers();
        self.disposed = true;
        debug!("playback controller disposed");
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.state.clone()
    }

    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_index.and_then(|i| self.tabs.get(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn reveal_len(&self) -> usize {
        self.state.reveal_len
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn auto_advance(&self) -> bool {
        self.state.auto_advance
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// True when the active tab is fully revealed.
    pub fn is_complete(&self) -> bool {
        self.active_index
            .is_some_and(|i| self.state.reveal_len >= self.tabs.char_len(i))
    }

    /// Share of the active tab revealed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        match self.active_index {
            Some(i) if self.tabs.char_len(i) > 0 => {
                self.state.reveal_len as f64 / self.tabs.char_len(i) as f64
            }
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn tick(&mut self) {
        let Some(index) = self.active_index else {
            return;
        };
        if !self.state.playing {
            return;
        }

        let len = self.tabs.char_len(index);
        if self.state.reveal_len < len {
            self.state.reveal_len += 1;
            let tab_id = self.state.active_tab_id.clone().unwrap_or_default();
            trace!(%tab_id, reveal_len = self.state.reveal_len, "reveal");
            self.emit(PlayerEvent::Revealed {
                tab_id,
                reveal_len: self.state.reveal_len,
            });
            self.schedule_tick();
        } else if self.state.auto_advance {
            // A single tab loops onto itself.
            self.schedule_advance();
        }
    }

    fn advance(&mut self) {
        let Some(index) = self.active_index else {
            return;
        };
        if !self.state.playing || !self.state.auto_advance {
            return;
        }
        let next = (index + 1) % self.tabs.len();
        debug!(from = index, to = next, "auto-advance");
        self.activate(next);
    }

    fn activate(&mut self, index: usize) {
        self.cancel_timers();
        let Some(tab) = self.tabs.get(index) else {
            return;
        };
        let tab_id = tab.id.clone();
        self.active_index = Some(index);
        self.state.active_tab_id = Some(tab_id.clone());
        self.state.reveal_len = 0;
        self.emit(PlayerEvent::TabChanged { tab_id, index });

        if self.state.playing {
            self.schedule_tick();
        }
    }

    fn schedule_tick(&mut self) {
        if let Some(id) = self.reveal_timer.take() {
            self.scheduler.cancel(id);
        }
        self.reveal_timer = Some(self.scheduler.schedule(self.typing_interval));
    }

    fn schedule_advance(&mut self) {
        if let Some(id) = self.advance_timer.take() {
            self.scheduler.cancel(id);
        }
        self.advance_timer = Some(self.scheduler.schedule(self.switch_delay));
    }

    fn cancel_timers(&mut self) {
        if let Some(id) = self.reveal_timer.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.advance_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn emit(&self, event: PlayerEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

impl PlaybackController<ManualScheduler> {
    /// Move the fake clock forward by `by`, firing every timer that falls
    /// due (including ones scheduled along the way). Returns the number of
    /// timers fired.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut fired = 0;
        while let Some(id) = self.scheduler.pop_due(until) {
            self.fire(id);
            fired += 1;
        }
        self.scheduler.set_now(until);
        fired
    }
}

impl<S: Scheduler> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
