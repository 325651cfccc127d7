//! Pending one-shot timeouts and per-frame callbacks.
//!
//! The queue only records what is pending; the controller decides what a
//! task does when [`SlideshowController::pump`](crate::SlideshowController::pump)
//! fires it. Nothing runs on another thread.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Handle to a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Default)]
pub struct TaskQueue {
    next_id: u64,
    timeouts: BTreeMap<TaskId, Duration>,
    frames: BTreeSet<TaskId>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TaskId {
        self.next_id += 1;
        TaskId(self.next_id)
    }

    /// Schedules a one-shot callback due at `now + delay`
    pub fn schedule_timeout(&mut self, now: Duration, delay: Duration) -> TaskId {
        let id = self.allocate();
        self.timeouts.insert(id, now + delay);
        id
    }

    /// Requests a callback on the next frame pump
    pub fn request_frame(&mut self) -> TaskId {
        let id = self.allocate();
        self.frames.insert(id);
        id
    }

    /// Cancels a pending task of either kind. Returns false if it was not pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.timeouts.remove(&id).is_some() || self.frames.remove(&id)
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.timeouts.contains_key(&id) || self.frames.contains(&id)
    }

    pub fn due_time(&self, id: TaskId) -> Option<Duration> {
        self.timeouts.get(&id).copied()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn pending(&self) -> usize {
        self.pending_timeouts() + self.pending_frames()
    }

    /// Earliest timeout deadline, if any
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timeouts.values().min().copied()
    }

    /// Removes and returns the earliest timeout due at or before `now`.
    /// Equal deadlines fire in scheduling order.
    pub fn pop_due_timeout(&mut self, now: Duration) -> Option<TaskId> {
        let (id, _) = self
            .timeouts
            .iter()
            .filter(|(_, due)| **due <= now)
            .min_by_key(|(id, due)| (**due, **id))
            .map(|(id, due)| (*id, *due))?;
        self.timeouts.remove(&id);
        Some(id)
    }

    /// Frames pending right now, in request order
    pub fn frame_ids(&self) -> Vec<TaskId> {
        self.frames.iter().copied().collect()
    }

    /// Consumes a pending frame. Returns false if it was cancelled meanwhile.
    pub fn take_frame(&mut self, id: TaskId) -> bool {
        self.frames.remove(&id)
    }

    pub fn clear(&mut self) {
        self.timeouts.clear();
        self.frames.clear();
    }
}
