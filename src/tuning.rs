//! Data-driven game balance
//!
//! Defaults come from [`crate::consts`]. A page or test can override any
//! field, e.g. to shrink the basket or shorten a run.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub max_misses: u32,
    pub player_width: f32,
    pub player_start_x: f32,
    pub nudge_step: f32,

    pub base_spawn_interval_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub spawn_decay_per_point_ms: f64,
    pub spawn_margin: f32,
    pub spawn_y: f32,

    pub base_speed: f32,
    pub speed_gain_per_point: f32,

    pub catch_band_low: f32,
    pub catch_band_high: f32,
    pub bottom: f32,

    pub streak_size: u32,
    pub autopilot_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_misses: MAX_MISSES,
            player_width: PLAYER_WIDTH,
            player_start_x: PLAYER_START_X,
            nudge_step: NUDGE_STEP,

            base_spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_decay_per_point_ms: SPAWN_DECAY_PER_POINT_MS,
            spawn_margin: SPAWN_MARGIN,
            spawn_y: SPAWN_Y,

            base_speed: BASE_SPEED,
            speed_gain_per_point: SPEED_GAIN_PER_POINT,

            catch_band_low: CATCH_BAND_LOW,
            catch_band_high: CATCH_BAND_HIGH,
            bottom: BOTTOM,

            streak_size: STREAK_SIZE,
            autopilot_step: AUTOPILOT_STEP,
        }
    }
}

impl Tuning {
    /// Half the basket width
    pub fn half_width(&self) -> f32 {
        self.player_width / 2.0
    }

    /// Lowest legal basket position
    pub fn player_min_x(&self) -> f32 {
        self.half_width()
    }

    /// Highest legal basket position
    pub fn player_max_x(&self) -> f32 {
        100.0 - self.half_width()
    }

    /// Repair values a hand-edited settings blob can carry
    ///
    /// Non-finite fields fall back to their defaults; the basket is at most
    /// as wide as the play area and the spawn margin at most half of it.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            player_width: finite_or(self.player_width, defaults.player_width).clamp(0.0, 100.0),
            player_start_x: finite_or(self.player_start_x, defaults.player_start_x),
            nudge_step: finite_or(self.nudge_step, defaults.nudge_step),

            base_spawn_interval_ms: finite_or(
                self.base_spawn_interval_ms,
                defaults.base_spawn_interval_ms,
            ),
            min_spawn_interval_ms: finite_or(
                self.min_spawn_interval_ms,
                defaults.min_spawn_interval_ms,
            ),
            spawn_decay_per_point_ms: finite_or(
                self.spawn_decay_per_point_ms,
                defaults.spawn_decay_per_point_ms,
            ),
            spawn_margin: finite_or(self.spawn_margin, defaults.spawn_margin).clamp(0.0, 50.0),
            spawn_y: finite_or(self.spawn_y, defaults.spawn_y),

            base_speed: finite_or(self.base_speed, defaults.base_speed),
            speed_gain_per_point: finite_or(
                self.speed_gain_per_point,
                defaults.speed_gain_per_point,
            ),

            catch_band_low: finite_or(self.catch_band_low, defaults.catch_band_low),
            catch_band_high: finite_or(self.catch_band_high, defaults.catch_band_high),
            bottom: finite_or(self.bottom, defaults.bottom),

            autopilot_step: finite_or(self.autopilot_step, defaults.autopilot_step),
            ..self
        }
    }
}

fn finite_or<T: Into<f64> + Copy>(value: T, default: T) -> T {
    if value.into().is_finite() { value } else { default }
}
