//! Catch and miss detection
//!
//! Objects are points; the basket is a horizontal span sitting inside the
//! catch band near the bottom of the play area.

use super::state::{FallingObject, Player};
use crate::tuning::Tuning;

/// What happened to an object this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Landed in the basket
    Caught,
    /// Fell past the bottom edge
    Missed,
    /// Still in the air
    Falling,
}

/// Whether height `y` is inside the catch band (inclusive)
#[inline]
pub fn in_catch_band(y: f32, tuning: &Tuning) -> bool {
    y >= tuning.catch_band_low && y <= tuning.catch_band_high
}

/// Resolve one object against the basket. Caught takes priority over missed.
pub fn resolve(object: &FallingObject, player: &Player, tuning: &Tuning) -> Resolution {
    if in_catch_band(object.pos.y, tuning) && player.covers(object.pos.x) {
        Resolution::Caught
    } else if object.pos.y > tuning.bottom {
        Resolution::Missed
    } else {
        Resolution::Falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ItemKind;
    use glam::Vec2;

    fn object_at(x: f32, y: f32) -> FallingObject {
        FallingObject {
            id: 1,
            kind: ItemKind::Cherry,
            pos: Vec2::new(x, y),
            speed: 0.4,
        }
    }

    #[test]
    fn test_centered_catch() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert_eq!(
            resolve(&object_at(50.0, 90.0), &player, &tuning),
            Resolution::Caught
        );
    }

    #[test]
    fn test_catch_band_edges() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert_eq!(
            resolve(&object_at(42.5, 85.0), &player, &tuning),
            Resolution::Caught
        );
        assert_eq!(
            resolve(&object_at(57.5, 95.0), &player, &tuning),
            Resolution::Caught
        );
        assert_eq!(
            resolve(&object_at(50.0, 84.9), &player, &tuning),
            Resolution::Falling
        );
        assert_eq!(
            resolve(&object_at(50.0, 95.1), &player, &tuning),
            Resolution::Falling
        );
    }

    #[test]
    fn test_off_basket_in_band_keeps_falling() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert_eq!(
            resolve(&object_at(20.0, 90.0), &player, &tuning),
            Resolution::Falling
        );
    }

    #[test]
    fn test_past_bottom_is_missed() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert_eq!(
            resolve(&object_at(20.0, 101.0), &player, &tuning),
            Resolution::Missed
        );
        // Exactly at the bottom edge is not yet a miss
        assert_eq!(
            resolve(&object_at(20.0, 100.0), &player, &tuning),
            Resolution::Falling
        );
    }

    #[test]
    fn test_caught_wins_when_band_overlaps_bottom() {
        let tuning = Tuning {
            catch_band_high: 105.0,
            ..Tuning::default()
        };
        let player = Player::new(&tuning);
        assert_eq!(
            resolve(&object_at(50.0, 101.0), &player, &tuning),
            Resolution::Caught
        );
    }
}
