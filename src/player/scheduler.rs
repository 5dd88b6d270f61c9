//! Deferred-callback capability injected into the controller.
//!
//! A scheduler only hands out `TimerId`s and later reports them as fired;
//! the controller keeps the bookkeeping of which id means what. Two
//! implementations:
//! - `ManualScheduler`: fake clock, timers fire when the caller advances it
//! - `TokioScheduler`: one sleeping task per timer, fired ids posted on an
//!   mpsc channel for the event loop to drain

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Opaque handle for a pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// "Call me back after `delay`" / "never mind".
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

/// Fake-clock scheduler. Time only moves when `pop_due` is called.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<(Duration, TimerId)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fake time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|(_, p)| *p == id)
    }

    /// Earliest deadline among pending timers.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|(at, _)| *at).min()
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (pos, &(at, id)) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (at, _))| *at <= until)
            .min_by_key(|(_, (at, id))| (*at, *id))?;
        self.pending.remove(pos);
        self.now = at;
        Some(id)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((self.now + delay, id));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|(_, p)| *p != id);
    }
}

/// Real-time scheduler backed by tokio timers. Must be used from within a
/// tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    fired_tx: mpsc::UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create the scheduler and the receiver its fired timers arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            fired_tx,
            tasks: HashMap::new(),
        };
        (scheduler, fired_rx)
    }

    /// Number of timer tasks still sleeping.
    pub fn live_tasks(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.tasks.retain(|_, task| !task.is_finished());

        let id = TimerId(self.next_id);
        self.next_id += 1;
        let tx = self.fired_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the event loop has shut down.
            let _ = tx.send(id);
        });
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_fires_in_deadline_order() {
        let mut s = ManualScheduler::new();
        let late = s.schedule(Duration::from_millis(50));
        let early = s.schedule(Duration::from_millis(10));

        assert_eq!(s.pop_due(Duration::from_millis(100)), Some(early));
        assert_eq!(s.now(), Duration::from_millis(10));
        assert_eq!(s.pop_due(Duration::from_millis(100)), Some(late));
        assert_eq!(s.pop_due(Duration::from_millis(100)), None);
    }

    #[test]
    fn manual_respects_until() {
        let mut s = ManualScheduler::new();
        s.schedule(Duration::from_millis(30));
        assert_eq!(s.pop_due(Duration::from_millis(29)), None);
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn manual_cancel_removes_timer() {
        let mut s = ManualScheduler::new();
        let id = s.schedule(Duration::from_millis(5));
        assert!(s.is_pending(id));
        s.cancel(id);
        assert!(!s.is_pending(id));
        assert_eq!(s.pop_due(Duration::from_secs(1)), None);
    }

    #[test]
    fn manual_schedules_relative_to_now() {
        let mut s = ManualScheduler::new();
        s.set_now(Duration::from_millis(100));
        s.schedule(Duration::from_millis(20));
        assert_eq!(s.next_deadline(), Some(Duration::from_millis(120)));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_fires() {
        let (mut s, mut rx) = TokioScheduler::new();
        let id = s.schedule(Duration::from_millis(30));
        assert_eq!(rx.recv().await, Some(id));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_cancelled_timer_never_fires() {
        let (mut s, mut rx) = TokioScheduler::new();
        let cancelled = s.schedule(Duration::from_millis(10));
        let kept = s.schedule(Duration::from_millis(20));
        s.cancel(cancelled);
        assert_eq!(rx.recv().await, Some(kept));
        assert!(rx.try_recv().is_err());
    }
}
