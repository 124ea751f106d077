//! Session high score
//!
//! Kept in memory only; it lasts as long as the page (or process) does.

use serde::{Deserialize, Serialize};

/// Best score across the runs of this session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u32,
    runs: u32,
    last: Option<u32>,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished run's score in. Returns true if it set a new best.
    pub fn record(&mut self, score: u32) -> bool {
        self.runs += 1;
        self.last = Some(score);
        if score > self.best {
            log::info!("New high score: {} (was {})", score, self.best);
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Best score so far (0 before any run)
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Number of finished runs
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Score of the most recent finished run
    pub fn last(&self) -> Option<u32> {
        self.last
    }

    pub fn is_empty(&self) -> bool {
        self.runs == 0
    }
}
