use anyhow::{Context, Result};
use console::{style, Key, Term};
use galleria_core::SlideshowSource;
use slideshow_engine::{BarState, Clock, ControllerOptions, RenderRequest, SlideshowController};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// Width of the whole progress strip in columns
const STRIP_WIDTH: usize = 60;

/// Shortest redraw period the ticker accepts
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Toggle,
    Faster,
    Slower,
    Next,
    Previous,
    Quit,
}

/// Maps a key press to a slideshow action
pub fn action_for_key(key: &Key) -> Option<PlayerAction> {
    match key {
        Key::Char(' ') => Some(PlayerAction::Toggle),
        Key::Char('+') | Key::Char('=') => Some(PlayerAction::Faster),
        Key::Char('-') | Key::Char('_') => Some(PlayerAction::Slower),
        Key::ArrowRight | Key::Char('n') => Some(PlayerAction::Next),
        Key::ArrowLeft | Key::Char('p') => Some(PlayerAction::Previous),
        Key::Char('q') | Key::Escape | Key::CtrlC => Some(PlayerAction::Quit),
        _ => None,
    }
}

fn apply_action<C: Clock>(controller: &mut SlideshowController<C>, action: PlayerAction) {
    match action {
        PlayerAction::Toggle => controller.toggle(),
        PlayerAction::Faster => controller.change_speed_by(1),
        PlayerAction::Slower => controller.change_speed_by(-1),
        PlayerAction::Next => controller.next(),
        PlayerAction::Previous => controller.previous(),
        PlayerAction::Quit => controller.close(),
    }
}

/// Runs the slideshow until the user quits.
///
/// Keys are read on a blocking thread and forwarded over a channel; a frame
/// ticker pumps the controller so timers and progress advance in real time.
pub async fn run_slideshow(
    source: SlideshowSource,
    options: ControllerOptions,
    start_index: usize,
    autoplay: bool,
    frame_interval: Duration,
) -> Result<()> {
    let mut controller = SlideshowController::with_system_clock(options);
    controller.open_source(&source, start_index);
    if autoplay {
        controller.toggle();
    }

    let term = Term::stdout();
    if term.hide_cursor().is_err() {
        log::warn!("Failed to hide cursor");
    }

    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let reader = KeyReader::spawn(|| Term::stdout().read_key(), key_tx);

    let mut ticker = interval(frame_period(frame_interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.pump();
            }
            key = key_rx.recv() => match key.as_ref().and_then(action_for_key) {
                Some(PlayerAction::Quit) => break Ok(()),
                Some(action) => apply_action(&mut controller, action),
                None if key.is_none() => break Ok(()),
                None => {}
            },
        }

        if let Err(e) = draw(&term, &controller.render_request()) {
            break Err(e);
        }
    };

    apply_action(&mut controller, PlayerAction::Quit);
    if term.show_cursor().is_err() {
        log::warn!("Failed to restore cursor");
    }
    reader.stop();

    result
}

/// Ticker period, never shorter than `MIN_FRAME_INTERVAL`
fn frame_period(requested: Duration) -> Duration {
    requested.max(MIN_FRAME_INTERVAL)
}

/// Reads keys on a detached thread and forwards them to the player.
///
/// A read blocked in the terminal cannot be interrupted, so the thread is a
/// plain OS thread rather than a runtime blocking task: it never holds up
/// runtime shutdown and ends on its own at the next key once stopped.
struct KeyReader {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl KeyReader {
    fn spawn<R>(mut read_key: R, tx: mpsc::UnboundedSender<Key>) -> Self
    where
        R: FnMut() -> io::Result<Key> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            while !flag.load(Ordering::Acquire) {
                let key = match read_key() {
                    Ok(key) => key,
                    Err(e) => {
                        log::debug!("Key reader stopped: {}", e);
                        break;
                    }
                };
                if flag.load(Ordering::Acquire) {
                    break;
                }
                let quit = action_for_key(&key) == Some(PlayerAction::Quit);
                if tx.send(key).is_err() || quit {
                    break;
                }
            }
        });

        Self { stop, handle }
    }

    /// Asks the thread to exit and reaps it if it already has
    fn stop(self) {
        self.stop.store(true, Ordering::Release);
        if self.handle.is_finished() {
            let _ = self.handle.join();
        }
    }
}

fn draw(term: &Term, request: &RenderRequest) -> Result<()> {
    term.clear_screen().context("Failed to clear screen")?;
    for line in render_lines(request) {
        term.write_line(&line).context("Failed to write slideshow")?;
    }
    Ok(())
}

/// Text lines for one frame of the slideshow
pub fn render_lines(request: &RenderRequest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(String::new());
    if let Some(title) = &request.title {
        lines.push(format!("  {}", style(title).bold().cyan()));
    }
    lines.push(format!(
        "  {}",
        style(request.image_url.as_deref().unwrap_or("(no image)")).dim()
    ));
    lines.push(String::new());
    lines.push(format!("  {}", progress_strip(request)));
    lines.push(String::new());

    let status = if request.is_playing() {
        style("Playing").green()
    } else {
        style("Paused").yellow()
    };
    lines.push(format!(
        "  {} {}   {}   Speed: {}   {}%",
        request.play_icon(),
        request.counter,
        status,
        request.speed_label,
        request.active_percent()
    ));
    lines.push(String::new());
    lines.push("  Space play/pause   +/- speed   ←/→ or n/p navigate   q quit".to_string());

    lines
}

/// One segment per slide: full for seen slides, partial for the current one
fn progress_strip(request: &RenderRequest) -> String {
    if request.bars.is_empty() {
        return String::new();
    }

    let segment = (STRIP_WIDTH / request.bars.len()).clamp(1, 8);
    let separator = if segment > 1 { " " } else { "" };

    request
        .bars
        .iter()
        .map(|bar| {
            let filled = match bar.state {
                BarState::Complete => segment,
                BarState::Pending => 0,
                BarState::Active => ((bar.fill * segment as f64).round() as usize).min(segment),
            };
            format!("{}{}", "█".repeat(filled), "░".repeat(segment - filled))
        })
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideshow_engine::ManualClock;

    fn request_for(total: usize, index: usize, elapsed_ms: u64) -> RenderRequest {
        let clock = ManualClock::new();
        let options = ControllerOptions::from_millis(vec![1000, 2000], 1000).unwrap();
        let mut controller = SlideshowController::new(clock.clone(), options);
        let images = (0..total).map(|i| format!("https://cdn/{}.jpg", i)).collect();
        controller.open(images, index);
        controller.toggle();
        clock.advance_millis(elapsed_ms);
        controller.pump();
        controller.render_request()
    }

    #[test]
    fn test_frame_period_has_floor() {
        assert_eq!(frame_period(Duration::ZERO), MIN_FRAME_INTERVAL);
        assert_eq!(frame_period(Duration::from_millis(1)), MIN_FRAME_INTERVAL);
        assert_eq!(frame_period(Duration::from_millis(33)), Duration::from_millis(33));
    }

    #[tokio::test]
    async fn test_zero_frame_interval_ticks() {
        let mut ticker = interval(frame_period(Duration::ZERO));
        ticker.tick().await;
        ticker.tick().await;
    }

    #[test]
    fn test_key_reader_ends_on_quit() {
        let mut keys = vec![Key::Char(' '), Key::Char('q'), Key::Char('n')].into_iter();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reader = KeyReader::spawn(
            move || keys.next().ok_or_else(|| io::Error::other("no more keys")),
            tx,
        );

        reader.handle.join().unwrap();
        assert_eq!(rx.try_recv().unwrap(), Key::Char(' '));
        assert_eq!(rx.try_recv().unwrap(), Key::Char('q'));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_key_reader_honours_stop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let reader = KeyReader::spawn(
            || {
                std::thread::sleep(Duration::from_millis(5));
                Ok(Key::Char('x'))
            },
            tx,
        );

        reader.stop.store(true, Ordering::Release);
        reader.handle.join().unwrap();
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(action_for_key(&Key::Char(' ')), Some(PlayerAction::Toggle));
        assert_eq!(action_for_key(&Key::Char('+')), Some(PlayerAction::Faster));
        assert_eq!(action_for_key(&Key::Char('-')), Some(PlayerAction::Slower));
        assert_eq!(action_for_key(&Key::ArrowRight), Some(PlayerAction::Next));
        assert_eq!(action_for_key(&Key::Char('p')), Some(PlayerAction::Previous));
        assert_eq!(action_for_key(&Key::Escape), Some(PlayerAction::Quit));
        assert_eq!(action_for_key(&Key::Char('x')), None);
    }

    #[test]
    fn test_faster_lowers_interval() {
        let clock = ManualClock::new();
        let options = ControllerOptions::from_millis(vec![1000, 2000], 2000).unwrap();
        let mut controller = SlideshowController::new(clock, options);
        controller.open(vec!["a".to_string()], 0);

        apply_action(&mut controller, PlayerAction::Faster);
        assert_eq!(controller.state().current_speed().as_millis(), 1000);
        apply_action(&mut controller, PlayerAction::Slower);
        assert_eq!(controller.state().current_speed().as_millis(), 2000);
    }

    #[test]
    fn test_progress_strip_segments() {
        let request = request_for(3, 1, 500);
        let strip = progress_strip(&request);
        let segments: Vec<&str> = strip.split(' ').collect();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], "█".repeat(8));
        assert_eq!(segments[1], format!("{}{}", "█".repeat(4), "░".repeat(4)));
        assert_eq!(segments[2], "░".repeat(8));
    }

    #[test]
    fn test_many_slides_use_single_columns() {
        let request = request_for(100, 0, 0);
        let strip = progress_strip(&request);
        assert_eq!(strip.chars().count(), 100);
        assert!(!strip.contains(' '));
    }

    #[test]
    fn test_render_lines_show_counter_and_speed() {
        let request = request_for(3, 1, 0);
        let text = render_lines(&request).join("\n");
        assert!(text.contains("2 / 3"));
        assert!(text.contains("1s/slide"));
        assert!(text.contains("https://cdn/1.jpg"));
    }
}
