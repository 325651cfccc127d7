//! Per-slide progress bars and the active bar's fill animation

use crate::scheduler::{TaskId, TaskQueue};
use crate::state::PlaybackState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarState {
    Complete,
    Active,
    Pending,
}

/// One bar of the progress snapshot; `fill` is in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarFill {
    pub state: BarState,
    pub fill: f64,
}

impl BarFill {
    fn for_slide(slide: usize, current: usize) -> Self {
        match slide.cmp(&current) {
            std::cmp::Ordering::Less => Self {
                state: BarState::Complete,
                fill: 1.0,
            },
            std::cmp::Ordering::Equal => Self {
                state: BarState::Active,
                fill: 0.0,
            },
            std::cmp::Ordering::Greater => Self {
                state: BarState::Pending,
                fill: 0.0,
            },
        }
    }
}

/// Fraction of `interval` covered by `elapsed`, capped at 1
pub fn fill_fraction(elapsed: Duration, interval: Duration) -> f64 {
    if interval.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / interval.as_secs_f64()).min(1.0)
}

/// Paints the bars and drives the active bar from wall-clock elapsed time,
/// so the fill reaches 100% when the auto-advance fires regardless of
/// frame rate.
#[derive(Debug, Default)]
pub struct ProgressRenderer {
    bars: Vec<BarFill>,
    active: Option<usize>,
    start_time: Option<Duration>,
    pending_frame: Option<TaskId>,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `start_time`, resets the active fill and requests the first frame
    pub fn start_animation(&mut self, queue: &mut TaskQueue, start_time: Duration) {
        self.stop_animation(queue);
        self.start_time = Some(start_time);
        self.set_active_fill(0.0);
        self.pending_frame = Some(queue.request_frame());
    }

    /// Cancels the pending frame callback, if any
    pub fn stop_animation(&mut self, queue: &mut TaskQueue) {
        if let Some(id) = self.pending_frame.take() {
            queue.cancel(id);
        }
    }

    /// Handles a fired frame callback.
    ///
    /// Paints `min(elapsed / interval, 1)` onto the active bar and asks for
    /// another frame until the bar is full. Does nothing once playback has
    /// stopped or for frames this renderer no longer owns.
    pub fn on_frame(
        &mut self,
        id: TaskId,
        queue: &mut TaskQueue,
        state: &PlaybackState,
        now: Duration,
    ) -> bool {
        if self.pending_frame != Some(id) {
            return false;
        }
        self.pending_frame = None;

        if !state.is_playing() {
            return false;
        }

        let Some(start) = self.start_time else {
            return false;
        };

        let progress = fill_fraction(
            now.saturating_sub(start),
            state.current_speed().as_duration(),
        );
        self.set_active_fill(progress);

        if progress < 1.0 {
            self.pending_frame = Some(queue.request_frame());
        }
        true
    }

    /// Resets every bar: earlier slides complete, the current slide active
    /// at 0%, later slides pending.
    pub fn render_all_bars(&mut self, current_index: usize, total: usize) {
        self.bars = (0..total)
            .map(|i| BarFill::for_slide(i, current_index))
            .collect();
        self.active = (current_index < total).then_some(current_index);
    }

    fn set_active_fill(&mut self, fill: f64) {
        if let Some(bar) = self.active.and_then(|i| self.bars.get_mut(i)) {
            bar.fill = fill;
        }
    }

    pub fn bars(&self) -> &[BarFill] {
        &self.bars
    }

    pub fn active_fill(&self) -> Option<f64> {
        self.active.and_then(|i| self.bars.get(i)).map(|b| b.fill)
    }

    pub fn is_animating(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn clear(&mut self, queue: &mut TaskQueue) {
        self.stop_animation(queue);
        self.bars.clear();
        self.active = None;
        self.start_time = None;
    }
}
