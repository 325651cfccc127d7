//! Wrap-around slide index movement

use crate::state::PlaybackState;

/// Moves the index of a [`PlaybackState`]. Every operation returns the new
/// index, or `None` when there are no slides and nothing changed.
pub struct SlideNavigator;

impl SlideNavigator {
    /// Next slide, wrapping from the last to the first
    pub fn advance_forward(state: &mut PlaybackState) -> Option<usize> {
        let total = state.total_slides();
        if total == 0 {
            return None;
        }
        let next = if state.current_index() < total - 1 {
            state.current_index() + 1
        } else {
            0
        };
        state.set_index(next);
        Some(next)
    }

    /// Previous slide, wrapping from the first to the last
    pub fn advance_backward(state: &mut PlaybackState) -> Option<usize> {
        let total = state.total_slides();
        if total == 0 {
            return None;
        }
        let prev = if state.current_index() > 0 {
            state.current_index() - 1
        } else {
            total - 1
        };
        state.set_index(prev);
        Some(prev)
    }

    /// Direct jump; out-of-range targets are ignored
    pub fn jump_to(state: &mut PlaybackState, index: usize) -> Option<usize> {
        if index >= state.total_slides() {
            log::debug!(
                "Ignoring jump to slide {} of {}",
                index,
                state.total_slides()
            );
            return None;
        }
        state.set_index(index);
        Some(index)
    }
}
