//! Slideshow Engine - speed-stepped auto-advance with synchronized
//! per-slide progress bars
//!
//! The engine is a single-threaded state machine. Time comes from a
//! [`Clock`] and pending callbacks live in a [`TaskQueue`]; a driver calls
//! [`SlideshowController::pump`] to run whatever is due and paints the
//! [`RenderRequest`] it gets back.

mod clock;
mod controller;
mod error;
mod navigator;
mod progress;
mod render;
mod scheduler;
mod speed;
mod state;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{ControllerOptions, PumpReport, SlideshowController};
pub use error::{EngineError, EngineResult};
pub use navigator::SlideNavigator;
pub use progress::{fill_fraction, BarFill, BarState, ProgressRenderer};
pub use render::RenderRequest;
pub use scheduler::{TaskId, TaskQueue};
pub use speed::{SpeedDirection, SpeedLevel, SpeedTable};
pub use state::{PlaybackState, PlayerStatus};
pub use timer::PlaybackTimer;

pub type Result<T> = std::result::Result<T, EngineError>;
