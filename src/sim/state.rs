//! Game state and core simulation types
//!
//! Everything the tick loop mutates lives here, owned by a single
//! [`GameState`] that is updated in place every frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_percent;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No run started yet
    #[default]
    Idle,
    /// Active gameplay, ticks advance the simulation
    Playing,
    /// Run ended, ticks are ignored
    GameOver,
}

/// Events reported to the commentary layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    Start,
    CatchStreak,
    MissStreak,
    GameOver,
}

impl GameEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::Start => "start",
            GameEvent::CatchStreak => "catch_streak",
            GameEvent::MissStreak => "miss_streak",
            GameEvent::GameOver => "gameover",
        }
    }
}

/// Fruit varieties. Purely cosmetic, every kind scores the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Apple,
    Banana,
    Cherry,
    Orange,
}

/// Every kind, in spawn-table order
pub const ITEM_KINDS: [ItemKind; 4] = [
    ItemKind::Apple,
    ItemKind::Banana,
    ItemKind::Cherry,
    ItemKind::Orange,
];

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Apple => "apple",
            ItemKind::Banana => "banana",
            ItemKind::Cherry => "cherry",
            ItemKind::Orange => "orange",
        }
    }

    /// Glyph used by the DOM renderer
    pub fn glyph(&self) -> &'static str {
        match self {
            ItemKind::Apple => "\u{1F34E}",
            ItemKind::Banana => "\u{1F34C}",
            ItemKind::Cherry => "\u{1F352}",
            ItemKind::Orange => "\u{1F34A}",
        }
    }
}

/// A piece of fruit falling through the play area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ItemKind,
    /// Position in percent of the play area (y grows downward)
    pub pos: Vec2,
    /// Fall distance per tick, fixed at spawn
    pub speed: f32,
}

impl FallingObject {
    /// Advance one tick
    pub fn fall(&mut self, step_scale: f32) {
        self.pos.y += self.speed * step_scale;
    }
}

/// The basket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Center of the basket (percent)
    pub x: f32,
    pub half_width: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let mut player = Self {
            x: tuning.player_start_x,
            half_width: tuning.half_width(),
        };
        // Re-clamp in case the start position sits outside the legal range
        player.set_x(tuning.player_start_x);
        player
    }

    pub fn min_x(&self) -> f32 {
        self.half_width
    }

    pub fn max_x(&self) -> f32 {
        100.0 - self.half_width
    }

    /// Move the basket, clamped to the play area. NaN is ignored.
    pub fn set_x(&mut self, x: f32) {
        if x.is_nan() {
            return;
        }
        self.x = clamp_percent(x, self.min_x(), self.max_x());
    }

    pub fn left(&self) -> f32 {
        self.x - self.half_width
    }

    pub fn right(&self) -> f32 {
        self.x + self.half_width
    }

    /// Whether horizontal position `x` is over the basket (edges inclusive)
    pub fn covers(&self, x: f32) -> bool {
        x >= self.left() && x <= self.right()
    }
}

/// Counters for the current run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub score: u32,
    pub misses: u32,
    /// Timestamp of the last spawn (ms, same clock as tick timestamps)
    pub last_spawn_ms: f64,
    /// Timestamp of the previous tick, used by [`StepMode::Scaled`]
    pub last_tick_ms: Option<f64>,
}

/// How far objects fall per tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StepMode {
    /// Fixed step per tick. Fall speed follows the display refresh rate.
    #[default]
    PerTick,
    /// Step scaled by elapsed time relative to a reference refresh rate
    Scaled { reference_hz: f32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub step_mode: StepMode,
    /// Seed the RNG was created from
    pub seed: u64,
    /// Spawn RNG (category and horizontal position)
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub run: RunState,
    pub player: Player,
    /// Live objects, in spawn order
    pub objects: Vec<FallingObject>,
    /// Ticks advanced during the current run
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let player = Player::new(&tuning);
        Self {
            tuning,
            step_mode: StepMode::PerTick,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            run: RunState::default(),
            player,
            objects: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Reset everything for a fresh run and start playing
    pub fn start(&mut self, now_ms: f64) {
        self.run = RunState {
            last_spawn_ms: now_ms,
            ..RunState::default()
        };
        self.tuning = self.tuning.clone().sanitized();
        self.player = Player::new(&self.tuning);
        self.objects.clear();
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
    }

    /// Stop an active run. Returns false if no run was active.
    pub fn stop(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        true
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.run.score
    }

    pub fn misses(&self) -> u32 {
        self.run.misses
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}
