//! Local commentary lines used when the text service is unavailable

use std::cell::RefCell;
use std::future;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{CommentaryFuture, CommentaryProvider};
use crate::sim::GameEvent;

pub const FALLBACK_REACTIONS: [&str; 5] = [
    "Nice catch.",
    "Reflexes within acceptable parameters.",
    "You missed one.",
    "Keep your eyes on the falling objects.",
    "Speed increasing.",
];

/// Picks a fallback line uniformly at random, ignoring the event
pub struct FallbackCommentary {
    rng: RefCell<Pcg32>,
}

impl FallbackCommentary {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RefCell::new(Pcg32::seed_from_u64(seed)),
        }
    }

    /// Draw one line
    pub fn pick(&self) -> &'static str {
        let index = self.rng.borrow_mut().random_range(0..FALLBACK_REACTIONS.len());
        FALLBACK_REACTIONS[index]
    }
}

impl CommentaryProvider for FallbackCommentary {
    fn generate_reaction(&self, _event: GameEvent, _score: u32, _misses: u32) -> CommentaryFuture {
        Box::pin(future::ready(self.pick().to_string()))
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
