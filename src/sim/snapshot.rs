//! Read-only view of the game for the presentation layer
//!
//! Copied out of the live state once per frame so rendering never touches
//! the simulation directly.

use serde::Serialize;

use super::state::{GameState, ItemKind};

/// One falling object as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectView {
    pub id: u32,
    pub kind: ItemKind,
    pub x: f32,
    pub y: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Live objects in spawn order
    pub objects: Vec<ObjectView>,
    pub score: u32,
    pub misses: u32,
    pub max_misses: u32,
    pub player_x: f32,
    pub player_width: f32,
    pub is_running: bool,
    pub is_game_over: bool,
    pub high_score: u32,
    pub commentary: String,
}

impl Snapshot {
    pub fn capture(state: &GameState, high_score: u32, commentary: String) -> Self {
        Self {
            objects: state
                .objects
                .iter()
                .map(|o| ObjectView {
                    id: o.id,
                    kind: o.kind,
                    x: o.pos.x,
                    y: o.pos.y,
                })
                .collect(),
            score: state.run.score,
            misses: state.run.misses,
            max_misses: state.tuning.max_misses,
            player_x: state.player.x,
            player_width: state.player.half_width * 2.0,
            is_running: state.is_running(),
            is_game_over: state.is_game_over(),
            high_score,
            commentary,
        }
    }

    /// Hearts left to draw
    pub fn lives_left(&self) -> u32 {
        self.max_misses.saturating_sub(self.misses)
    }
}
