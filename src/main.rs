//! Fruit Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, PointerEvent};

    use fruit_catch::sim::Snapshot;
    use fruit_catch::{Session, Settings, commentary, platform};

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding the session and the DOM it draws into
    struct Game {
        session: Session,
        document: Document,
        /// One element per live falling object
        items: HashMap<u32, Element>,
        /// Pending `requestAnimationFrame` callback
        raf_handle: Option<i32>,
    }

    impl Game {
        fn element(&self, id: &str) -> Option<Element> {
            self.document.get_element_by_id(id)
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.element(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_class(&self, id: &str, class: &str) {
            if let Some(el) = self.element(id) {
                let _ = el.set_attribute("class", class);
            }
        }

        /// Start a run if none is active. Returns true if the frame loop
        /// needs (re)starting.
        fn start(&mut self) -> bool {
            if self.session.is_running() {
                return false;
            }
            self.session.start(platform::now_ms());
            self.render();
            self.raf_handle.is_none()
        }

        /// Cancel the frame loop and close out the run
        fn teardown(&mut self) {
            if let Some(handle) = self.raf_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            self.session.end();
        }

        /// Draw the current snapshot
        fn render(&mut self) {
            let snapshot = self.session.snapshot();
            self.render_hud(&snapshot);
            self.render_items(&snapshot);

            if let Some(basket) = self.element("basket") {
                let _ = basket.set_attribute(
                    "style",
                    &format!(
                        "left: {:.2}%; width: {:.2}%;",
                        snapshot.player_x, snapshot.player_width
                    ),
                );
            }

            self.render_overlay(&snapshot);
        }

        fn render_hud(&self, snapshot: &Snapshot) {
            self.set_text("score", &snapshot.score.to_string());

            let lives = snapshot.lives_left() as usize;
            let lost = snapshot.max_misses as usize - lives;
            self.set_text(
                "hearts",
                &format!("{}{}", "\u{2764}".repeat(lives), "\u{2661}".repeat(lost)),
            );

            self.set_class(
                "autopilot",
                if self.session.autopilot() { "" } else { "hidden" },
            );
        }

        fn render_items(&mut self, snapshot: &Snapshot) {
            let Some(area) = self.element("play-area") else {
                return;
            };

            for object in &snapshot.objects {
                let el = match self.items.get(&object.id) {
                    Some(el) => el.clone(),
                    None => {
                        let Ok(el) = self.document.create_element("div") else {
                            continue;
                        };
                        let _ = el.set_attribute("class", &format!("item {}", object.kind.as_str()));
                        el.set_text_content(Some(object.kind.glyph()));
                        let _ = area.append_child(&el);
                        self.items.insert(object.id, el.clone());
                        el
                    }
                };
                let _ = el.set_attribute(
                    "style",
                    &format!("left: {:.2}%; top: {:.2}%;", object.x, object.y),
                );
            }

            // Drop elements for caught/missed objects
            self.items.retain(|id, el| {
                let alive = snapshot.objects.iter().any(|o| o.id == *id);
                if !alive {
                    el.remove();
                }
                alive
            });
        }

        fn render_overlay(&self, snapshot: &Snapshot) {
            if snapshot.is_running {
                self.set_class("overlay", "hidden");
                return;
            }
            self.set_class("overlay", "");

            if snapshot.is_game_over {
                self.set_text("overlay-title", "Game Over!");
                self.set_text(
                    "overlay-body",
                    &format!("You caught {} fruits.", snapshot.score),
                );
                self.set_text("start-btn", "Try Again");
            } else {
                self.set_text("overlay-title", "Ready to Catch?");
                self.set_text(
                    "overlay-body",
                    "Drag or use arrow keys to move the basket.",
                );
                self.set_text("start-btn", "Start Game");
            }

            if snapshot.high_score > 0 {
                self.set_class("high-score", "");
                self.set_text(
                    "high-score",
                    &format!("High Score: {}", snapshot.high_score),
                );
            } else {
                self.set_class("high-score", "hidden");
            }
        }
    }

    /// API key from saved settings, or a `GEMINI_API_KEY` global set by the page
    fn load_settings() -> Settings {
        let settings = Settings::load();
        if settings.has_api_key() {
            return settings;
        }
        let key = web_sys::window()
            .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("GEMINI_API_KEY")).ok())
            .and_then(|v| v.as_string());
        settings.with_api_key(key)
    }

    pub async fn run() {
        platform::init_logging();

        log::info!("Fruit Catch starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let settings = load_settings();
        let seed = platform::seed();
        let provider = commentary::provider_from_settings(&settings, seed);
        let session = Session::new(settings.tuning.clone(), seed, provider, platform::spawner())
            .with_step_mode(settings.step_mode);

        // Commentary can land after the frame loop stops (game over), so it
        // is drawn straight from the board
        {
            let document = document.clone();
            session.board().set_listener(Box::new(move |text| {
                if let Some(el) = document.get_element_by_id("commentary") {
                    el.set_text_content(Some(text));
                }
            }));
        }
        if let Some(el) = document.get_element_by_id("commentary") {
            el.set_text_content(Some(&session.board().text()));
        }

        let game = Rc::new(RefCell::new(Game {
            session,
            document,
            items: HashMap::new(),
            raf_handle: None,
        }));
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_start_button(game.clone());
        setup_teardown(game.clone());

        game.borrow_mut().render();

        log::info!("Fruit Catch ready!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => {
                        g.session.move_left();
                    }
                    "ArrowRight" => {
                        g.session.move_right();
                    }
                    " " | "Enter" => {
                        let needs_loop = g.start();
                        drop(g);
                        if needs_loop {
                            request_animation_frame(game.clone());
                        }
                    }
                    "i" | "I" => {
                        g.session.toggle_autopilot();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer/touch move over the play area
        let area = game.borrow().element("play-area");
        if let Some(area) = area {
            let game = game.clone();
            let area_clone = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let rect = area_clone.get_bounding_client_rect();
                game.borrow_mut().session.set_pointer(
                    event.client_x() as f32,
                    rect.left() as f32,
                    rect.width() as f32,
                );
            });
            let _ = area
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let btn = game.borrow().element("start-btn");
        if let Some(btn) = btn {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let needs_loop = game.borrow_mut().start();
                if needs_loop {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().teardown();
            log::info!("Session torn down");
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(handle, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => game.borrow_mut().raf_handle = Some(id),
            Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let running = {
            let mut g = game.borrow_mut();
            g.raf_handle = None;
            g.session.frame(time);
            g.render();
            g.session.is_running()
        };

        // Game over cancels the loop: no further frames are scheduled
        if running {
            request_animation_frame(game);
        }
    }

    /// Current snapshot as JSON, for page scripts and debugging
    #[wasm_bindgen]
    pub fn snapshot_json() -> Option<String> {
        GAME.with(|slot| {
            let game = slot.borrow().clone()?;
            let json = serde_json::to_string(&game.borrow().session.snapshot()).ok();
            json
        })
    }

    /// Store an API key in LocalStorage (applies on next load). `None` clears it.
    #[wasm_bindgen]
    pub fn save_api_key(key: Option<String>) {
        let settings = Settings::load().with_api_key(key);
        settings.save();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
const DEMO_RUNS: u32 = 3;
/// Two simulated minutes per run at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
const MAX_DEMO_FRAMES: u32 = 60 * 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fruit_catch::{Session, Settings, commentary, platform};

    platform::init_logging();
    log::info!("Fruit Catch (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let seed = platform::seed();
    let provider = commentary::provider_from_settings(&settings, seed);
    let mut session = Session::new(settings.tuning.clone(), seed, provider, platform::spawner())
        .with_step_mode(settings.step_mode);
    session.set_autopilot(true);

    let frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;

    for run in 1..=DEMO_RUNS {
        // Each run the autopilot gets a little slower, so runs end differently
        session.state_mut().tuning.autopilot_step = settings.tuning.autopilot_step / run as f32;

        session.start(now);
        let mut seen_writes = 0;
        let mut frames = 0;

        while frames < MAX_DEMO_FRAMES {
            if session.board().writes() != seen_writes {
                seen_writes = session.board().writes();
                println!("  [commentary] {}", session.board().text());
            }
            if !session.is_running() {
                break;
            }
            now += frame_ms;
            frames += 1;
            session.frame(now);
        }

        if session.is_running() {
            log::info!("Run {} hit the frame limit", run);
            session.end();
            println!("  [commentary] {}", session.board().text());
        }

        let snapshot = session.snapshot();
        println!(
            "Run {}: score {}, misses {}/{}, {} frames (high score {})",
            run, snapshot.score, snapshot.misses, snapshot.max_misses, frames, snapshot.high_score
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
