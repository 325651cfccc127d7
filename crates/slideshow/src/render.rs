//! What a view layer needs to draw the slideshow

use crate::progress::BarFill;
use crate::state::PlayerStatus;
use serde::{Deserialize, Serialize};

/// Snapshot emitted by the controller for a view to paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub current_index: usize,
    pub total_slides: usize,
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub counter: String,
    pub bars: Vec<BarFill>,
    pub status: PlayerStatus,
    pub speed_ms: u64,
    pub speed_label: String,
}

impl RenderRequest {
    pub fn is_playing(&self) -> bool {
        self.status == PlayerStatus::Playing
    }

    /// Glyph for the play/pause button: shows the action a press would take
    pub fn play_icon(&self) -> &'static str {
        match self.status {
            PlayerStatus::Playing => "⏸",
            PlayerStatus::Stopped => "▶",
        }
    }

    /// Active bar fill as a whole percentage
    pub fn active_percent(&self) -> u8 {
        self.bars
            .get(self.current_index)
            .map(|b| (b.fill * 100.0).round() as u8)
            .unwrap_or(0)
    }
}
