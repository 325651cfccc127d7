//! Single pending auto-advance callback

use crate::scheduler::{TaskId, TaskQueue};
use crate::state::PlaybackState;
use std::time::Duration;

/// Owns at most one pending one-shot timeout at any time
#[derive(Debug, Default)]
pub struct PlaybackTimer {
    pending: Option<TaskId>,
}

impl PlaybackTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any pending timeout with a fresh one due after `interval`
    /// and marks the state as playing.
    pub fn start(
        &mut self,
        queue: &mut TaskQueue,
        state: &mut PlaybackState,
        now: Duration,
        interval: Duration,
    ) {
        self.cancel(queue);
        self.pending = Some(queue.schedule_timeout(now, interval));
        state.set_playing(true);
    }

    /// Cancels the pending timeout if present and marks the state stopped
    pub fn stop(&mut self, queue: &mut TaskQueue, state: &mut PlaybackState) {
        self.cancel(queue);
        state.set_playing(false);
    }

    fn cancel(&mut self, queue: &mut TaskQueue) {
        if let Some(id) = self.pending.take() {
            queue.cancel(id);
        }
    }

    /// Claims a fired timeout. Returns false for ids this timer no longer owns.
    pub fn fire(&mut self, id: TaskId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_id(&self) -> Option<TaskId> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speed::SpeedLevel;

    fn setup() -> (TaskQueue, PlaybackState, PlaybackTimer) {
        let state = PlaybackState::new(3, 0, SpeedLevel::from_millis(1000).unwrap());
        (TaskQueue::new(), state, PlaybackTimer::new())
    }

    #[test]
    fn test_start_replaces_pending() {
        let (mut queue, mut state, mut timer) = setup();
        timer.start(&mut queue, &mut state, Duration::ZERO, Duration::from_secs(1));
        let first = timer.pending_id().unwrap();
        timer.start(&mut queue, &mut state, Duration::ZERO, Duration::from_secs(2));

        assert_eq!(queue.pending_timeouts(), 1);
        assert!(!queue.is_pending(first));
        assert!(state.is_playing());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut queue, mut state, mut timer) = setup();
        timer.start(&mut queue, &mut state, Duration::ZERO, Duration::from_secs(1));
        timer.stop(&mut queue, &mut state);
        timer.stop(&mut queue, &mut state);

        assert_eq!(queue.pending(), 0);
        assert!(!timer.is_pending());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_fire_only_claims_own_id() {
        let (mut queue, mut state, mut timer) = setup();
        timer.start(&mut queue, &mut state, Duration::ZERO, Duration::from_secs(1));
        let stale = queue.schedule_timeout(Duration::ZERO, Duration::from_secs(1));
        let own = timer.pending_id().unwrap();

        assert!(!timer.fire(stale));
        assert!(timer.fire(own));
        assert!(!timer.fire(own));
    }
}
