//! Input normalization
//!
//! Keyboard nudges and pointer/touch coordinates both end up as a clamped
//! basket position. Writes land directly in the game state, so the next
//! tick always sees them.

use super::state::GameState;
use crate::clamp_percent;

/// Discrete basket movement (one key press)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Left,
    Right,
}

/// Map a pointer x coordinate (device pixels) into play-area percent
///
/// Positions outside the play area clamp to its edges. A degenerate
/// (zero-width) play area maps to the center.
pub fn pointer_to_percent(client_x: f32, rect_left: f32, rect_width: f32) -> f32 {
    if !rect_width.is_finite() || rect_width <= 0.0 {
        return 50.0;
    }
    let percent = (client_x - rect_left) / rect_width * 100.0;
    clamp_percent(percent, 0.0, 100.0)
}

impl GameState {
    /// Move the basket one step. Ignored unless a run is active.
    pub fn nudge(&mut self, nudge: Nudge) -> bool {
        if !self.is_running() {
            return false;
        }
        let step = match nudge {
            Nudge::Left => -self.tuning.nudge_step,
            Nudge::Right => self.tuning.nudge_step,
        };
        self.player.set_x(self.player.x + step);
        true
    }

    /// Place the basket at an absolute position. Ignored unless a run is active.
    pub fn set_player_x(&mut self, percent: f32) -> bool {
        if !self.is_running() {
            return false;
        }
        self.player.set_x(percent);
        true
    }

    /// Place the basket under a pointer. Ignored unless a run is active.
    pub fn point_at(&mut self, client_x: f32, rect_left: f32, rect_width: f32) -> bool {
        self.set_player_x(pointer_to_percent(client_x, rect_left, rect_width))
    }
}
