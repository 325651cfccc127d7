//! Slideshow state management

use crate::speed::SpeedLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Stopped,
    Playing,
}

/// State owned by one open slideshow.
///
/// `current_index < total_slides` whenever `total_slides > 0`; with no
/// slides the index stays 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    is_playing: bool,
    current_speed: SpeedLevel,
    current_index: usize,
    total_slides: usize,
}

impl PlaybackState {
    pub fn new(total_slides: usize, start_index: usize, speed: SpeedLevel) -> Self {
        let mut state = Self {
            is_playing: false,
            current_speed: speed,
            current_index: 0,
            total_slides,
        };
        state.set_index(start_index);
        state
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn status(&self) -> PlayerStatus {
        if self.is_playing {
            PlayerStatus::Playing
        } else {
            PlayerStatus::Stopped
        }
    }

    pub fn current_speed(&self) -> SpeedLevel {
        self.current_speed
    }

    pub(crate) fn set_speed(&mut self, speed: SpeedLevel) {
        self.current_speed = speed;
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Sets the index, clamping into range
    pub(crate) fn set_index(&mut self, index: usize) {
        self.current_index = if self.total_slides == 0 {
            0
        } else {
            index.min(self.total_slides - 1)
        };
    }

    pub fn total_slides(&self) -> usize {
        self.total_slides
    }

    pub fn is_empty(&self) -> bool {
        self.total_slides == 0
    }

    /// One-based position text such as `3 / 10`
    pub fn counter(&self) -> String {
        if self.total_slides == 0 {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.current_index + 1, self.total_slides)
    }
}
