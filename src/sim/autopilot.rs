//! Idle/demo mode - the game plays itself
//!
//! Chases whichever fruit will reach the catch band soonest among those
//! the basket can still get under in time.

use std::cmp::Ordering;

use super::state::GameState;

/// Basket position the autopilot wants to reach, if anything is catchable
pub fn target_x(state: &GameState) -> Option<f32> {
    let tuning = &state.tuning;
    let player = &state.player;
    let step = tuning.autopilot_step.max(f32::EPSILON);

    state
        .objects
        .iter()
        .filter(|o| o.speed > 0.0 && o.pos.y <= tuning.catch_band_high)
        .filter_map(|o| {
            let ticks_to_band = ((tuning.catch_band_low - o.pos.y) / o.speed).max(0.0);
            let ticks_to_leave = (tuning.catch_band_high - o.pos.y) / o.speed;
            // Distance the basket edge still has to cover
            let gap = (o.pos.x - player.x).abs() - player.half_width;
            (gap <= ticks_to_leave * step).then_some((ticks_to_band, o.pos.x))
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
        .map(|(_, x)| x)
}

/// Next basket position: one bounded step toward the target
pub fn steer(state: &GameState) -> Option<f32> {
    let target = target_x(state)?;
    let step = state.tuning.autopilot_step;
    let delta = (target - state.player.x).clamp(-step, step);
    Some(state.player.x + delta)
}
