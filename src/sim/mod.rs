//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Resolution, in_catch_band, resolve};
pub use input::{Nudge, pointer_to_percent};
pub use snapshot::{ObjectView, Snapshot};
pub use state::{
    FallingObject, GameEvent, GamePhase, GameState, ITEM_KINDS, ItemKind, Player, RunState,
    StepMode,
};
pub use tick::{TickInput, TickOutcome, is_streak, spawn_interval_ms, spawn_speed, tick};
