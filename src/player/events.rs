//! Player events: broadcast channel for the Renderer and other observers.
//!
//! Best-effort delivery: a subscriber that falls behind gets `Lagged` and
//! should re-read `PlaybackController::snapshot()`.

/// One state change of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A different (or the same, restarted) tab became active.
    TabChanged { tab_id: String, index: usize },
    /// The reveal cursor moved.
    Revealed { tab_id: String, reveal_len: usize },
    /// Play/pause flipped.
    PlaybackToggled { playing: bool },
    /// Auto-advance flipped.
    AutoAdvanceToggled { enabled: bool },
    /// The tab set was swapped out.
    TabsReplaced { count: usize },
}
