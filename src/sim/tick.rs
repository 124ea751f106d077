//! Per-frame simulation tick
//!
//! Called once per animation frame while a run is active. Each tick spawns
//! at most one object, moves every live object down by its per-tick step,
//! resolves catches and misses, and reports at most one event.

use glam::Vec2;
use rand::Rng;

use super::collision::{Resolution, resolve};
use super::state::{FallingObject, GameEvent, GamePhase, GameState, ITEM_KINDS, StepMode};
use crate::consts::SPAWN_MARGIN;
use crate::tuning::Tuning;

/// Scaled steps are clamped to this range so a stalled or bursty frame
/// clock never freezes or teleports objects
const MIN_STEP_SCALE: f64 = 0.25;
const MAX_STEP_SCALE: f64 = 4.0;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Frame timestamp (ms)
    pub now_ms: f64,
    /// Absolute basket position to apply before the tick, if any
    pub player_x: Option<f32>,
}

/// What a tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Objects caught this tick
    pub caught: u32,
    /// Objects missed this tick
    pub missed: u32,
    /// Event for the commentary layer (at most one per tick)
    pub event: Option<GameEvent>,
}

/// Milliseconds between spawns at the given score
pub fn spawn_interval_ms(tuning: &Tuning, score: u32) -> f64 {
    let decayed = tuning.base_spawn_interval_ms - score as f64 * tuning.spawn_decay_per_point_ms;
    decayed.max(tuning.min_spawn_interval_ms)
}

/// Fall speed for an object spawned at the given score
pub fn spawn_speed(tuning: &Tuning, score: u32) -> f32 {
    tuning.base_speed + score as f32 * tuning.speed_gain_per_point
}

/// Whether a score lands on a catch streak boundary
pub fn is_streak(score: u32, streak_size: u32) -> bool {
    streak_size > 0 && score > 0 && score % streak_size == 0
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if state.phase != GamePhase::Playing {
        return TickOutcome::default();
    }

    state.time_ticks += 1;

    if let Some(x) = input.player_x {
        state.player.set_x(x);
    }

    let scale = step_scale(state.step_mode, state.run.last_tick_ms, input.now_ms);
    state.run.last_tick_ms = Some(input.now_ms);

    // 1. Spawn
    let interval = spawn_interval_ms(&state.tuning, state.run.score);
    if input.now_ms - state.run.last_spawn_ms > interval {
        spawn_object(state);
        state.run.last_spawn_ms = input.now_ms;
    }

    // 2. Integrate and resolve, removing resolved objects in the same pass
    let mut outcome = TickOutcome::default();
    let tuning = &state.tuning;
    let player = state.player;
    let run = &mut state.run;
    state.objects.retain_mut(|object| {
        object.fall(scale);
        match resolve(object, &player, tuning) {
            Resolution::Caught => {
                run.score = run.score.saturating_add(1);
                outcome.caught += 1;
                false
            }
            Resolution::Missed => {
                run.misses = (run.misses + 1).min(tuning.max_misses);
                outcome.missed += 1;
                false
            }
            Resolution::Falling => true,
        }
    });

    // 3. Event policy: misses take priority over catches
    outcome.event = if outcome.missed > 0 {
        if state.run.misses >= state.tuning.max_misses {
            state.phase = GamePhase::GameOver;
            log::info!(
                "Run over after {} ticks: score {}",
                state.time_ticks,
                state.run.score
            );
            Some(GameEvent::GameOver)
        } else {
            Some(GameEvent::MissStreak)
        }
    } else if outcome.caught > 0 && is_streak(state.run.score, state.tuning.streak_size) {
        Some(GameEvent::CatchStreak)
    } else {
        None
    };

    if outcome.caught > 0 || outcome.missed > 0 {
        log::trace!(
            "tick {}: caught {} missed {} (score {}, misses {})",
            state.time_ticks,
            outcome.caught,
            outcome.missed,
            state.run.score,
            state.run.misses
        );
    }

    outcome
}

/// Spawn one object above the top edge
fn spawn_object(state: &mut GameState) {
    let id = state.next_entity_id();
    let kind = ITEM_KINDS[state.rng.random_range(0..ITEM_KINDS.len())];
    let margin = match state.tuning.spawn_margin {
        m if m.is_finite() => m.clamp(0.0, 50.0),
        _ => SPAWN_MARGIN,
    };
    let x = state.rng.random_range(margin..=100.0 - margin);
    let speed = spawn_speed(&state.tuning, state.run.score);

    state.objects.push(FallingObject {
        id,
        kind,
        pos: Vec2::new(x, state.tuning.spawn_y),
        speed,
    });
}

/// Multiplier applied to each object's per-tick speed
fn step_scale(mode: StepMode, last_tick_ms: Option<f64>, now_ms: f64) -> f32 {
    match (mode, last_tick_ms) {
        (StepMode::Scaled { reference_hz }, Some(prev)) if reference_hz > 0.0 => {
            let frames = (now_ms - prev) * reference_hz as f64 / 1000.0;
            if frames.is_finite() {
                frames.clamp(MIN_STEP_SCALE, MAX_STEP_SCALE) as f32
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ItemKind;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 12345);
        state.start(0.0);
        state
    }

    fn push_object(state: &mut GameState, x: f32, y: f32, speed: f32) -> u32 {
        let id = state.next_entity_id();
        state.objects.push(FallingObject {
            id,
            kind: ItemKind::Apple,
            pos: Vec2::new(x, y),
            speed,
        });
        id
    }

    /// A tick early enough that nothing spawns
    fn quiet(now_ms: f64) -> TickInput {
        TickInput {
            now_ms,
            player_x: None,
        }
    }

    #[test]
    fn test_spawn_interval_scaling() {
        let tuning = Tuning::default();
        assert_eq!(spawn_interval_ms(&tuning, 0), 1000.0);
        assert_eq!(spawn_interval_ms(&tuning, 30), 700.0);
        assert_eq!(spawn_interval_ms(&tuning, 60), 400.0);
        assert_eq!(spawn_interval_ms(&tuning, 500), 400.0);
    }

    #[test]
    fn test_spawn_speed_scaling() {
        let tuning = Tuning::default();
        assert!((spawn_speed(&tuning, 0) - 0.4).abs() < 1e-6);
        assert!((spawn_speed(&tuning, 10) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_after_interval() {
        let mut state = playing_state();

        tick(&mut state, &quiet(1000.0));
        assert!(state.objects.is_empty(), "interval must be strictly exceeded");

        tick(&mut state, &quiet(1001.0));
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.run.last_spawn_ms, 1001.0);

        let object = &state.objects[0];
        assert!(object.pos.x >= 5.0 && object.pos.x <= 95.0);
        // Spawned at -10 then integrated once in the same tick
        assert!((object.pos.y - (-10.0 + 0.4)).abs() < 1e-5);
        assert!((object.speed - 0.4).abs() < 1e-6);

        tick(&mut state, &quiet(1500.0));
        assert_eq!(state.objects.len(), 1, "no second spawn before interval");
    }

    #[test]
    fn test_nan_spawn_margin_still_spawns() {
        let mut state = playing_state();
        state.tuning.spawn_margin = f32::NAN;

        tick(&mut state, &quiet(2000.0));
        assert_eq!(state.objects.len(), 1);
        let x = state.objects[0].pos.x;
        assert!((5.0..=95.0).contains(&x));
    }

    #[test]
    fn test_centered_catch_scores() {
        let mut state = playing_state();
        push_object(&mut state, 50.0, 89.6, 0.4);

        let outcome = tick(&mut state, &quiet(10.0));
        assert_eq!(outcome.caught, 1);
        assert_eq!(outcome.missed, 0);
        assert_eq!(outcome.event, None);
        assert_eq!(state.run.score, 1);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_miss_counted_once_then_removed() {
        let mut state = playing_state();
        push_object(&mut state, 20.0, 100.6, 0.4);

        let outcome = tick(&mut state, &quiet(10.0));
        assert_eq!(outcome.missed, 1);
        assert_eq!(outcome.event, Some(GameEvent::MissStreak));
        assert_eq!(state.run.misses, 1);
        assert!(state.objects.is_empty());

        let outcome = tick(&mut state, &quiet(20.0));
        assert_eq!(outcome.missed, 0);
        assert_eq!(state.run.misses, 1);
    }

    #[test]
    fn test_fifth_miss_ends_run_once() {
        let mut state = playing_state();
        let mut gameovers = 0;

        for i in 0..5 {
            push_object(&mut state, 20.0, 100.0, 0.5);
            let outcome = tick(&mut state, &quiet(10.0 * (i + 1) as f64));
            if outcome.event == Some(GameEvent::GameOver) {
                gameovers += 1;
            }
        }
        assert_eq!(gameovers, 1);
        assert_eq!(state.run.misses, 5);
        assert!(state.is_game_over());

        // A sixth miss cannot happen: ticks are ignored
        push_object(&mut state, 20.0, 100.0, 0.5);
        let outcome = tick(&mut state, &quiet(100.0));
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(state.run.misses, 5);
        assert_eq!(state.objects.len(), 1);
    }

    #[test]
    fn test_simultaneous_misses_cap_at_max() {
        let mut state = playing_state();
        state.run.misses = 4;
        push_object(&mut state, 20.0, 100.0, 0.5);
        push_object(&mut state, 30.0, 100.0, 0.5);

        let outcome = tick(&mut state, &quiet(10.0));
        assert_eq!(outcome.missed, 2);
        assert_eq!(outcome.event, Some(GameEvent::GameOver));
        assert_eq!(state.run.misses, 5);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_catch_streak_on_multiple_of_five() {
        let mut state = playing_state();
        state.run.score = 4;
        push_object(&mut state, 50.0, 89.6, 0.4);

        let outcome = tick(&mut state, &quiet(10.0));
        assert_eq!(state.run.score, 5);
        assert_eq!(outcome.event, Some(GameEvent::CatchStreak));

        push_object(&mut state, 50.0, 89.6, 0.4);
        let outcome = tick(&mut state, &quiet(20.0));
        assert_eq!(state.run.score, 6);
        assert_eq!(outcome.event, None);
    }

    #[test]
    fn test_miss_takes_priority_over_catch() {
        let mut state = playing_state();
        state.run.score = 4;
        push_object(&mut state, 50.0, 89.6, 0.4);
        push_object(&mut state, 10.0, 100.6, 0.4);

        let outcome = tick(&mut state, &quiet(10.0));
        assert_eq!(outcome.caught, 1);
        assert_eq!(outcome.missed, 1);
        assert_eq!(state.run.score, 5);
        assert_eq!(outcome.event, Some(GameEvent::MissStreak));
    }

    #[test]
    fn test_all_objects_resolved_in_one_tick() {
        let mut state = playing_state();
        push_object(&mut state, 48.0, 89.6, 0.4);
        push_object(&mut state, 52.0, 89.6, 0.4);
        let keep = push_object(&mut state, 52.0, 10.0, 0.4);

        let outcome = tick(&mut state, &quiet(10.0));
        assert_eq!(outcome.caught, 2);
        assert_eq!(state.run.score, 2);
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.objects[0].id, keep);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut state = GameState::new(Tuning::default(), 1);
        push_object(&mut state, 50.0, 50.0, 0.4);
        let outcome = tick(&mut state, &quiet(5000.0));
        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(state.objects[0].pos.y, 50.0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_player_x_input_is_clamped() {
        let mut state = playing_state();
        tick(
            &mut state,
            &TickInput {
                now_ms: 10.0,
                player_x: Some(250.0),
            },
        );
        assert_eq!(state.player.x, 92.5);
    }

    #[test]
    fn test_objects_descend_every_tick() {
        let mut state = playing_state();
        for frame in 1..400 {
            if !state.is_running() {
                break;
            }
            let before: Vec<(u32, f32)> = state.objects.iter().map(|o| (o.id, o.pos.y)).collect();
            tick(&mut state, &quiet(frame as f64 * 16.0));
            for object in &state.objects {
                if let Some((_, y)) = before.iter().find(|(id, _)| *id == object.id) {
                    assert!(object.pos.y > *y);
                }
            }
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(Tuning::default(), 99999);
        let mut state2 = GameState::new(Tuning::default(), 99999);
        state1.start(0.0);
        state2.start(0.0);

        for frame in 1..600 {
            let input = TickInput {
                now_ms: frame as f64 * 16.7,
                player_x: Some(30.0 + (frame % 40) as f32),
            };
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.objects, state2.objects);
        assert_eq!(state1.run, state2.run);
    }

    #[test]
    fn test_step_scale() {
        let per_tick = StepMode::PerTick;
        let scaled = StepMode::Scaled { reference_hz: 60.0 };

        assert_eq!(step_scale(per_tick, Some(0.0), 33.3), 1.0);
        assert_eq!(step_scale(scaled, None, 33.3), 1.0);
        assert!((step_scale(scaled, Some(0.0), 1000.0 / 30.0) - 2.0).abs() < 1e-4);
        // Repeated or backwards timestamps still move objects
        assert_eq!(step_scale(scaled, Some(50.0), 50.0), 0.25);
        assert_eq!(step_scale(scaled, Some(50.0), 10_000.0), 4.0);
        assert_eq!(step_scale(scaled, Some(f64::NAN), 10.0), 1.0);
    }

    #[test]
    fn test_scaled_mode_moves_by_elapsed_time() {
        let mut state = playing_state();
        state.step_mode = StepMode::Scaled { reference_hz: 60.0 };
        push_object(&mut state, 50.0, 10.0, 0.5);

        tick(&mut state, &quiet(10.0));
        let y1 = state.objects[0].pos.y;
        assert!((y1 - 10.5).abs() < 1e-5);

        // Two reference frames elapsed
        tick(&mut state, &quiet(10.0 + 2000.0 / 60.0));
        assert!((state.objects[0].pos.y - (y1 + 1.0)).abs() < 1e-4);
    }
}
