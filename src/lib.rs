//! Fruit Catch - A falling-fruit arcade game with live commentary
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling, catching, game state)
//! - `session`: Run lifecycle, high score and commentary dispatch
//! - `commentary`: Generative-text commentary with local fallback
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod commentary;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::{CommentaryBoard, Session};
pub use settings::Settings;
pub use sim::StepMode;
pub use tuning::Tuning;

/// Game configuration constants
///
/// All positions are percentages of the play area: x runs 0 (left) to 100
/// (right), y runs 0 (top) to 100 (bottom).
pub mod consts {
    /// Misses allowed before the run ends
    pub const MAX_MISSES: u32 = 5;

    /// Basket width (percent of play area width)
    pub const PLAYER_WIDTH: f32 = 15.0;
    /// Basket starting position
    pub const PLAYER_START_X: f32 = 50.0;
    /// Distance moved per arrow-key press
    pub const NUDGE_STEP: f32 = 5.0;

    /// Spawn interval at score 0 (ms)
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 1000.0;
    /// Spawn interval never drops below this (ms)
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 400.0;
    /// Spawn interval reduction per point scored (ms)
    pub const SPAWN_DECAY_PER_POINT_MS: f64 = 10.0;
    /// Horizontal spawn margin on each side
    pub const SPAWN_MARGIN: f32 = 5.0;
    /// Spawn height, just above the visible top edge
    pub const SPAWN_Y: f32 = -10.0;

    /// Fall speed at score 0 (percent per tick)
    pub const BASE_SPEED: f32 = 0.4;
    /// Fall speed increase per point scored
    pub const SPEED_GAIN_PER_POINT: f32 = 0.02;

    /// Catch band, where the basket sits
    pub const CATCH_BAND_LOW: f32 = 85.0;
    pub const CATCH_BAND_HIGH: f32 = 95.0;
    /// Past this height an object counts as missed
    pub const BOTTOM: f32 = 100.0;

    /// A catch streak event fires every this many points
    pub const STREAK_SIZE: u32 = 5;

    /// Autopilot basket speed (percent per tick)
    pub const AUTOPILOT_STEP: f32 = 2.5;
}

/// Clamp a percentage into `[lo, hi]`, mapping NaN to `lo`
///
/// An empty range (`lo > hi`) collapses to its midpoint.
#[inline]
pub fn clamp_percent(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return (lo + hi) / 2.0;
    }
    if value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}
