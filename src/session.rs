//! Session controller
//!
//! Owns the simulation for the lifetime of a page (or process): starts and
//! ends runs, keeps the high score, forwards input, and sends game events
//! to the commentary provider without ever waiting on it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::commentary::CommentaryProvider;
use crate::highscores::HighScore;
use crate::platform::Spawner;
use crate::sim::{
    GameEvent, GameState, Nudge, Snapshot, StepMode, TickInput, TickOutcome, autopilot, tick,
};
use crate::tuning::Tuning;

/// Text shown before any commentary arrives
pub const INITIAL_COMMENTARY: &str = "System initialized. Prepare to catch.";

/// Called with the new text whenever the board changes
pub type BoardListener = Box<dyn Fn(&str)>;

/// The single "current commentary" cell
///
/// Commentary tasks write here when they resolve; the last one to resolve
/// wins. Cheap to clone (shared handle).
#[derive(Clone)]
pub struct CommentaryBoard {
    text: Rc<RefCell<String>>,
    writes: Rc<Cell<u64>>,
    listener: Rc<RefCell<Option<BoardListener>>>,
}

impl Default for CommentaryBoard {
    fn default() -> Self {
        Self::new(INITIAL_COMMENTARY)
    }
}

impl CommentaryBoard {
    pub fn new(initial: &str) -> Self {
        Self {
            text: Rc::new(RefCell::new(initial.to_string())),
            writes: Rc::new(Cell::new(0)),
            listener: Rc::new(RefCell::new(None)),
        }
    }

    /// Register the (single) change listener, replacing any previous one
    ///
    /// Lets the page redraw commentary that lands after the frame loop
    /// has stopped, e.g. the game-over reaction.
    pub fn set_listener(&self, listener: BoardListener) {
        *self.listener.borrow_mut() = Some(listener);
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set(&self, text: String) {
        *self.text.borrow_mut() = text;
        self.writes.set(self.writes.get() + 1);
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(&self.text.borrow());
        }
    }

    /// Number of writes so far, for cheap change detection
    pub fn writes(&self) -> u64 {
        self.writes.get()
    }
}

/// Runs, high score and commentary for one player
pub struct Session {
    state: GameState,
    high_score: HighScore,
    provider: Rc<dyn CommentaryProvider>,
    spawner: Rc<dyn Spawner>,
    board: CommentaryBoard,
    /// True between `start` and the matching `end`
    run_active: bool,
    autopilot: bool,
}

impl Session {
    pub fn new(
        tuning: Tuning,
        seed: u64,
        provider: Rc<dyn CommentaryProvider>,
        spawner: Rc<dyn Spawner>,
    ) -> Self {
        log::info!(
            "Session created (seed {}, commentary: {})",
            seed,
            provider.name()
        );
        Self {
            state: GameState::new(tuning, seed),
            high_score: HighScore::new(),
            provider,
            spawner,
            board: CommentaryBoard::default(),
            run_active: false,
            autopilot: false,
        }
    }

    pub fn with_step_mode(mut self, step_mode: StepMode) -> Self {
        self.state.step_mode = step_mode;
        self
    }

    /// Begin a fresh run
    pub fn start(&mut self, now_ms: f64) {
        self.state.start(now_ms);
        self.run_active = true;
        log::info!("Run started");
        self.report(GameEvent::Start);
    }

    /// End the current run. Returns false if no run was active.
    ///
    /// Folds the score into the high score and reports `GameOver` exactly
    /// once per run, whether the run ended by misses or by teardown.
    pub fn end(&mut self) -> bool {
        if !self.run_active {
            return false;
        }
        self.run_active = false;
        self.state.stop();

        let score = self.state.score();
        self.high_score.record(score);
        log::info!(
            "Run ended: score {}, misses {}, best {}",
            score,
            self.state.misses(),
            self.high_score.best()
        );
        self.report(GameEvent::GameOver);
        true
    }

    /// Advance one animation frame
    pub fn frame(&mut self, now_ms: f64) -> TickOutcome {
        let player_x = if self.autopilot {
            autopilot::steer(&self.state)
        } else {
            None
        };
        let outcome = tick(&mut self.state, &TickInput { now_ms, player_x });

        match outcome.event {
            Some(GameEvent::GameOver) => {
                self.end();
            }
            Some(event) => self.report(event),
            None => {}
        }
        outcome
    }

    pub fn move_left(&mut self) -> bool {
        self.state.nudge(Nudge::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.state.nudge(Nudge::Right)
    }

    /// Absolute basket position in percent
    pub fn set_player_x(&mut self, percent: f32) -> bool {
        self.state.set_player_x(percent)
    }

    /// Basket under a pointer at `client_x` over a play area spanning
    /// `rect_left..rect_left + rect_width` (device pixels)
    pub fn set_pointer(&mut self, client_x: f32, rect_left: f32, rect_width: f32) -> bool {
        self.state.point_at(client_x, rect_left, rect_width)
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot: {}", if enabled { "on" } else { "off" });
        }
        self.autopilot = enabled;
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.set_autopilot(!self.autopilot);
        self.autopilot
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the simulation, for tests and tooling
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn board(&self) -> &CommentaryBoard {
        &self.board
    }

    /// Copy of everything the renderer needs this frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.high_score.best(), self.board.text())
    }

    /// Fire-and-forget commentary for `event`
    fn report(&self, event: GameEvent) {
        log::debug!("Event: {}", event.as_str());
        let reaction = self
            .provider
            .generate_reaction(event, self.state.score(), self.state.misses());
        let board = self.board.clone();
        self.spawner.spawn(Box::pin(async move {
            board.set(reaction.await);
        }));
    }
}
