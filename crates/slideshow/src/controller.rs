//! Auto-play controller
//!
//! Composes the timer, progress renderer and navigator around one
//! [`PlaybackState`]. Every restart fully cancels the previous timeout and
//! frame callback before scheduling new ones, so at most one auto-advance
//! is ever pending.

use crate::clock::{Clock, SystemClock};
use crate::error::EngineResult;
use crate::navigator::SlideNavigator;
use crate::progress::{BarFill, ProgressRenderer};
use crate::render::RenderRequest;
use crate::scheduler::{TaskId, TaskQueue};
use crate::speed::{SpeedDirection, SpeedLevel, SpeedTable};
use crate::state::PlaybackState;
use crate::timer::PlaybackTimer;
use galleria_core::SlideshowSource;
use std::time::Duration;

/// Speed settings a controller is created with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    speeds: SpeedTable,
    initial_speed: SpeedLevel,
}

impl ControllerOptions {
    /// Fails if `initial_ms` is not a member of `speeds`
    pub fn new(speeds: SpeedTable, initial_ms: u64) -> EngineResult<Self> {
        let initial_speed = speeds.level(initial_ms)?;
        Ok(Self {
            speeds,
            initial_speed,
        })
    }

    /// Builds options from raw milliseconds, e.g. loaded from configuration
    pub fn from_millis(levels: Vec<u64>, initial_ms: u64) -> EngineResult<Self> {
        Self::new(SpeedTable::new(levels)?, initial_ms)
    }

    pub fn speeds(&self) -> &SpeedTable {
        &self.speeds
    }

    pub fn initial_speed(&self) -> SpeedLevel {
        self.initial_speed
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        let speeds = SpeedTable::default();
        let initial_speed = speeds.nearest(SpeedTable::DEFAULT_INITIAL_MS);
        Self {
            speeds,
            initial_speed,
        }
    }
}

/// What a [`SlideshowController::pump`] call fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub timeouts_fired: usize,
    pub frames_fired: usize,
}

pub struct SlideshowController<C: Clock = SystemClock> {
    clock: C,
    queue: TaskQueue,
    speeds: SpeedTable,
    state: PlaybackState,
    timer: PlaybackTimer,
    progress: ProgressRenderer,
    slides: Vec<String>,
    title: Option<String>,
    open: bool,
}

impl SlideshowController<SystemClock> {
    /// Controller driven by wall-clock time
    pub fn with_system_clock(options: ControllerOptions) -> Self {
        Self::new(SystemClock::new(), options)
    }
}

impl<C: Clock> SlideshowController<C> {
    pub fn new(clock: C, options: ControllerOptions) -> Self {
        Self {
            clock,
            queue: TaskQueue::new(),
            state: PlaybackState::new(0, 0, options.initial_speed),
            speeds: options.speeds,
            timer: PlaybackTimer::new(),
            progress: ProgressRenderer::new(),
            slides: Vec::new(),
            title: None,
            open: false,
        }
    }

    // ----- entry points -----

    /// Opens a slideshow over `images`, stopped, at `start_index` (clamped).
    ///
    /// Any previous session is torn down first. The current speed carries
    /// over between sessions. An empty list gives a slideshow whose
    /// playback controls do nothing.
    pub fn open(&mut self, images: Vec<String>, start_index: usize) {
        self.teardown();

        let speed = self.state.current_speed();
        self.state = PlaybackState::new(images.len(), start_index, speed);
        self.slides = images;
        self.title = None;
        self.open = true;

        log::debug!(
            "Opened slideshow with {} slides at {}",
            self.state.total_slides(),
            self.state.current_index()
        );
        self.progress
            .render_all_bars(self.state.current_index(), self.state.total_slides());
    }

    /// Opens a gallery's images, titled with its name
    pub fn open_source(&mut self, source: &SlideshowSource, start_index: usize) {
        self.open(source.image_urls.clone(), start_index);
        self.title = source.name.clone();
    }

    /// `Stopped -> Playing` starts the timer and animation;
    /// `Playing -> Stopped` stops both.
    pub fn toggle(&mut self) {
        if self.state.is_empty() {
            log::debug!("Toggle ignored: no slides");
            return;
        }

        if self.state.is_playing() {
            self.stop_playback();
            log::debug!("Auto-play paused at slide {}", self.state.current_index());
        } else {
            self.start_playback();
            log::debug!(
                "Auto-play started at {} per slide",
                self.state.current_speed()
            );
        }
    }

    /// Steps the speed one level, clamped at both ends of the table.
    /// While playing, the timer and animation restart from zero.
    pub fn change_speed(&mut self, direction: SpeedDirection) {
        let current = self.state.current_speed();
        let next = self.speeds.step(current, direction);

        if next == current {
            log::debug!("Speed already at the {:?} limit ({})", direction, current);
            return;
        }

        self.apply_speed(next);
    }

    /// UI convention: `+1` is faster, `-1` is slower, anything else is ignored
    pub fn change_speed_by(&mut self, delta: i32) {
        match SpeedDirection::from_delta(delta) {
            Some(direction) => self.change_speed(direction),
            None => log::debug!("Ignoring speed delta {}", delta),
        }
    }

    /// Sets the speed to the table member nearest `ms`
    pub fn set_speed_millis(&mut self, ms: u64) {
        let level = self.speeds.nearest(ms);
        if level != self.state.current_speed() {
            self.apply_speed(level);
        }
    }

    pub fn next(&mut self) {
        if SlideNavigator::advance_forward(&mut self.state).is_some() {
            self.on_navigate();
        }
    }

    pub fn previous(&mut self) {
        if SlideNavigator::advance_backward(&mut self.state).is_some() {
            self.on_navigate();
        }
    }

    pub fn jump_to(&mut self, index: usize) {
        if SlideNavigator::jump_to(&mut self.state, index).is_some() {
            self.on_navigate();
        }
    }

    /// Tears down and forgets the open slideshow
    pub fn close(&mut self) {
        self.teardown();
        self.progress.clear(&mut self.queue);
        self.slides.clear();
        self.title = None;
        self.open = false;
        self.state = PlaybackState::new(0, 0, self.state.current_speed());
        log::debug!("Slideshow closed");
    }

    /// Forces `Stopped` and cancels every pending timeout and frame callback
    pub fn teardown(&mut self) {
        let was_playing = self.state.is_playing();
        self.timer.stop(&mut self.queue, &mut self.state);
        self.progress.stop_animation(&mut self.queue);
        self.queue.clear();
        if was_playing {
            log::info!("Slideshow playback torn down");
        }
    }

    /// Runs everything that is due.
    ///
    /// Timeouts due at or before now fire first, earliest first. Then the
    /// frame callbacks that were pending when the pump began run; frames
    /// requested during this pump wait for the next one.
    pub fn pump(&mut self) -> PumpReport {
        let now = self.clock.now();
        let frames = self.queue.frame_ids();
        let mut report = PumpReport::default();

        while let Some(id) = self.queue.pop_due_timeout(now) {
            report.timeouts_fired += 1;
            self.on_timeout(id);
        }

        for id in frames {
            if self.queue.take_frame(id) {
                report.frames_fired += 1;
                self.progress
                    .on_frame(id, &mut self.queue, &self.state, now);
            }
        }

        report
    }

    // ----- internal transitions -----

    fn on_timeout(&mut self, id: TaskId) {
        if !self.timer.fire(id) {
            return;
        }
        if SlideNavigator::advance_forward(&mut self.state).is_some() {
            log::debug!("Auto-advanced to slide {}", self.state.current_index());
            self.on_navigate();
        }
    }

    /// Called after every manual or automatic slide change
    fn on_navigate(&mut self) {
        self.progress
            .render_all_bars(self.state.current_index(), self.state.total_slides());
        if self.state.is_playing() {
            self.start_playback();
        }
    }

    fn apply_speed(&mut self, level: SpeedLevel) {
        log::debug!("Speed {} -> {}", self.state.current_speed(), level);
        self.state.set_speed(level);
        if self.state.is_playing() {
            self.stop_playback();
            self.start_playback();
        }
    }

    fn start_playback(&mut self) {
        let now = self.clock.now();
        let interval = self.state.current_speed().as_duration();
        self.timer
            .start(&mut self.queue, &mut self.state, now, interval);
        self.progress.start_animation(&mut self.queue, now);
    }

    fn stop_playback(&mut self) {
        self.timer.stop(&mut self.queue, &mut self.state);
        self.progress.stop_animation(&mut self.queue);
    }

    // ----- queries -----

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn speeds(&self) -> &SpeedTable {
        &self.speeds
    }

    pub fn bars(&self) -> &[BarFill] {
        self.progress.bars()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn slides(&self) -> &[String] {
        &self.slides
    }

    pub fn current_image(&self) -> Option<&str> {
        self.slides
            .get(self.state.current_index())
            .map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Pending timeouts plus pending frame callbacks
    pub fn pending_tasks(&self) -> usize {
        self.queue.pending()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.queue.pending_timeouts()
    }

    pub fn pending_frames(&self) -> usize {
        self.queue.pending_frames()
    }

    /// When the auto-advance timeout is due, if one is pending
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer
            .pending_id()
            .and_then(|id| self.queue.due_time(id))
    }

    /// How long a driver may sleep before the next `pump` has work to do.
    /// `None` means nothing is scheduled.
    pub fn time_until_next_task(&self) -> Option<Duration> {
        if self.queue.pending_frames() > 0 {
            return Some(Duration::ZERO);
        }
        self.queue
            .next_deadline()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    pub fn render_request(&self) -> RenderRequest {
        let speed = self.state.current_speed();
        RenderRequest {
            current_index: self.state.current_index(),
            total_slides: self.state.total_slides(),
            image_url: self.current_image().map(String::from),
            title: self.title.clone(),
            counter: self.state.counter(),
            bars: self.progress.bars().to_vec(),
            status: self.state.status(),
            speed_ms: speed.as_millis(),
            speed_label: speed.label(),
        }
    }
}

impl<C: Clock> Drop for SlideshowController<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::progress::BarState;
    use crate::state::PlayerStatus;

    fn images(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://cdn.test/{}.jpg", i)).collect()
    }

    fn controller(initial_ms: u64) -> (SlideshowController<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let options = ControllerOptions::new(SpeedTable::default(), initial_ms).unwrap();
        (SlideshowController::new(clock.clone(), options), clock)
    }

    #[test]
    fn test_open_starts_stopped() {
        let (mut c, _) = controller(10_000);
        c.open(images(4), 2);
        assert!(c.is_open());
        assert_eq!(c.state().status(), PlayerStatus::Stopped);
        assert_eq!(c.state().current_index(), 2);
        assert_eq!(c.current_image(), Some("https://cdn.test/2.jpg"));
        assert_eq!(c.pending_tasks(), 0);
        assert_eq!(c.bars()[2].state, BarState::Active);
    }

    #[test]
    fn test_default_options_use_ten_seconds() {
        let options = ControllerOptions::default();
        assert_eq!(options.initial_speed().as_millis(), 10_000);
    }

    #[test]
    fn test_options_reject_unknown_initial_speed() {
        assert!(ControllerOptions::new(SpeedTable::default(), 3000).is_err());
        assert!(ControllerOptions::from_millis(vec![500, 1500], 1500).is_ok());
    }

    #[test]
    fn test_toggle_schedules_one_timer_and_one_frame() {
        let (mut c, _) = controller(1000);
        c.open(images(3), 0);
        c.toggle();
        assert!(c.state().is_playing());
        assert_eq!(c.pending_timeouts(), 1);
        assert_eq!(c.pending_frames(), 1);
        assert_eq!(c.next_deadline(), Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_manual_navigation_restarts_timer() {
        let (mut c, clock) = controller(1000);
        c.open(images(3), 0);
        c.toggle();
        clock.advance_millis(600);
        c.next();

        assert_eq!(c.state().current_index(), 1);
        assert_eq!(c.pending_timeouts(), 1);
        assert_eq!(c.next_deadline(), Some(Duration::from_millis(1600)));
    }

    #[test]
    fn test_navigation_while_stopped_schedules_nothing() {
        let (mut c, _) = controller(1000);
        c.open(images(3), 0);
        c.previous();
        assert_eq!(c.state().current_index(), 2);
        assert_eq!(c.pending_tasks(), 0);
    }

    #[test]
    fn test_empty_slideshow_controls_are_noops() {
        let (mut c, _) = controller(1000);
        c.open(Vec::new(), 3);
        c.toggle();
        c.next();
        c.previous();
        assert!(!c.state().is_playing());
        assert_eq!(c.pending_tasks(), 0);
        assert_eq!(c.current_image(), None);
    }

    #[test]
    fn test_speed_change_while_stopped_does_not_schedule() {
        let (mut c, _) = controller(10_000);
        c.open(images(2), 0);
        c.change_speed(SpeedDirection::Faster);
        assert_eq!(c.state().current_speed().as_millis(), 8000);
        assert_eq!(c.pending_tasks(), 0);
    }

    #[test]
    fn test_change_speed_by_ignores_other_deltas() {
        let (mut c, _) = controller(10_000);
        c.change_speed_by(0);
        c.change_speed_by(5);
        assert_eq!(c.state().current_speed().as_millis(), 10_000);
        c.change_speed_by(-1);
        assert_eq!(c.state().current_speed().as_millis(), 12_000);
    }

    #[test]
    fn test_set_speed_snaps() {
        let (mut c, _) = controller(10_000);
        c.set_speed_millis(3100);
        assert_eq!(c.state().current_speed().as_millis(), 4000);
    }

    #[test]
    fn test_speed_persists_across_open() {
        let (mut c, _) = controller(10_000);
        c.open(images(2), 0);
        c.change_speed(SpeedDirection::Slower);
        c.close();
        c.open(images(5), 0);
        assert_eq!(c.state().current_speed().as_millis(), 12_000);
    }

    #[test]
    fn test_reopen_cancels_previous_session() {
        let (mut c, _) = controller(1000);
        c.open(images(3), 0);
        c.toggle();
        c.open(images(2), 1);
        assert!(!c.state().is_playing());
        assert_eq!(c.pending_tasks(), 0);
    }

    #[test]
    fn test_render_request() {
        let (mut c, _) = controller(2000);
        c.open_source(
            &SlideshowSource {
                id: "gallery-1".into(),
                name: Some("Night".into()),
                image_urls: images(3),
            },
            1,
        );
        c.toggle();
        let r = c.render_request();
        assert_eq!(r.counter, "2 / 3");
        assert_eq!(r.title.as_deref(), Some("Night"));
        assert_eq!(r.image_url.as_deref(), Some("https://cdn.test/1.jpg"));
        assert!(r.is_playing());
        assert_eq!(r.play_icon(), "⏸");
        assert_eq!(r.speed_label, "2s/slide");
        assert_eq!(r.bars.len(), 3);
    }

    #[test]
    fn test_drop_after_close_is_harmless() {
        let (mut c, clock) = controller(1000);
        c.open(images(3), 0);
        c.toggle();
        assert!(c.pending_timeouts() > 0);
        assert!(c.pending_frames() > 0);

        c.close();
        assert_eq!(c.pending_tasks(), 0);

        // Drop runs teardown again on the already closed controller
        c.teardown();
        assert_eq!(c.pending_tasks(), 0);
        assert_eq!(c.state().status(), PlayerStatus::Stopped);

        clock.advance_millis(5_000);
        c.pump();
        assert_eq!(c.pending_tasks(), 0);
        drop(c);
    }
}
