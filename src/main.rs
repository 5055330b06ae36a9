//! The Amazing Looperman entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, EventTarget, HtmlCanvasElement, KeyboardEvent};

    use looperman::Settings;
    use looperman::renderer::CanvasRenderer;
    use looperman::sim::{GameState, InputState, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        renderer: CanvasRenderer,
        settings: Settings,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase transitions for overlay sync
        was_game_over: bool,
    }

    impl Game {
        fn new(seed: u64, width: f32, height: f32, renderer: CanvasRenderer, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, width, height, settings.star_count()),
                input: InputState::default(),
                renderer,
                settings,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                was_game_over: false,
            }
        }

        /// One frame: update, render, HUD sync
        fn frame(&mut self, time: f64) {
            tick(&mut self.state, &mut self.input);
            self.track_fps(time);

            if let Err(e) = self.renderer.render(&self.state, &self.settings) {
                log::warn!("Render error: {e:?}");
            }

            self.sync_hud();
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in the DOM
        fn sync_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    el.set_text_content(Some(""));
                }
            }

            // Show/hide the game-over overlay on phase transitions only
            let game_over = self.state.is_game_over();
            if game_over != self.was_game_over {
                if let Some(el) = document.get_element_by_id("game-over") {
                    let _ = el.set_attribute("class", if game_over { "" } else { "hidden" });
                }
                if game_over {
                    if let Some(el) = document.get_element_by_id("final-loops") {
                        el.set_text_content(Some(&self.state.loop_count().to_string()));
                    }
                }
                self.was_game_over = game_over;
            }
        }
    }

    /// An attached event listener; deregisters itself when dropped
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn attach(
            target: &EventTarget,
            kind: &'static str,
            callback: Closure<dyn FnMut(Event)>,
        ) -> Result<Self, JsValue> {
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
            Ok(Self {
                target: target.clone(),
                kind,
                callback,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
        }
    }

    /// Teardown handle for a running loop
    struct LoopHandle {
        running: Rc<Cell<bool>>,
        raf_id: Rc<Cell<Option<i32>>>,
        listeners: Vec<Listener>,
    }

    impl LoopHandle {
        /// Cancel the pending frame and detach every listener. Idempotent.
        fn stop(&mut self) {
            if !self.running.replace(false) {
                return;
            }
            if let Some(id) = self.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            self.listeners.clear();
        }
    }

    thread_local! {
        static HANDLE: RefCell<Option<LoopHandle>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("The Amazing Looperman starting...");

        match start() {
            Ok(handle) => {
                HANDLE.with(|slot| *slot.borrow_mut() = Some(handle));
                log::info!("The Amazing Looperman running!");
            }
            // No surface (or a hostless document) is not an error worth
            // crashing over - the page just stays static
            Err(e) => log::warn!("Setup failed, game not started: {e:?}"),
        }
    }

    /// Tear the running game down. Safe to call repeatedly, and when setup
    /// never finished.
    #[wasm_bindgen]
    pub fn stop_game() {
        HANDLE.with(|slot| {
            if let Some(mut handle) = slot.borrow_mut().take() {
                handle.stop();
                log::info!("Game loop stopped");
            }
        });
    }

    fn start() -> Result<LoopHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        // Size the canvas to the window before anything draws
        let width = window.inner_width()?.as_f64().unwrap_or(800.0) as u32;
        let height = window.inner_height()?.as_f64().unwrap_or(600.0) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let renderer = CanvasRenderer::new(&canvas)?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            width as f32,
            height as f32,
            renderer,
            settings,
        )));
        log::info!("Game initialized with seed: {seed}");

        let mut listeners = Vec::new();

        // Keyboard: ArrowRight and D both hold the one logical action;
        // everything else is ignored
        {
            let game = game.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let event: KeyboardEvent = event.unchecked_into();
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" => g.input.arrow_right = true,
                    "d" | "D" => g.input.key_d = true,
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                        log::info!("FPS counter: {}", g.settings.show_fps);
                    }
                    _ => {}
                }
            });
            listeners.push(Listener::attach(&window, "keydown", callback)?);
        }
        {
            let game = game.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let event: KeyboardEvent = event.unchecked_into();
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" => g.input.arrow_right = false,
                    "d" | "D" => g.input.key_d = false,
                    _ => {}
                }
            });
            listeners.push(Listener::attach(&window, "keyup", callback)?);
        }

        // Resize: retarget the canvas backing store and let the sim rebuild
        // everything size-relative before its next tick
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let w = window
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(800.0) as u32;
                let h = window
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(600.0) as u32;
                canvas.set_width(w);
                canvas.set_height(h);

                let mut g = game.borrow_mut();
                let star_count = g.settings.star_count();
                g.state.handle_resize(w as f32, h as f32, star_count);
            });
            listeners.push(Listener::attach(&window, "resize", callback)?);
        }

        // Restart button on the game-over overlay. Held keys are left as the
        // collision left them: a key held through the restart stays inert
        // until released and pressed again.
        if let Some(button) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                game.borrow_mut().state.reset();
            });
            listeners.push(Listener::attach(&button, "click", callback)?);
        }

        // Frame loop: the closure reschedules itself until stopped
        let running = Rc::new(Cell::new(true));
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let raf_cb: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        {
            let slot = raf_cb.clone();
            let running = running.clone();
            let raf_id = raf_id.clone();
            let game = game.clone();
            let raf_cb = raf_cb.clone();
            *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |time: f64| {
                if !running.get() {
                    return;
                }
                game.borrow_mut().frame(time);

                let borrowed = raf_cb.borrow();
                if let (Some(window), Some(closure)) = (web_sys::window(), borrowed.as_ref()) {
                    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                        Ok(id) => raf_id.set(Some(id)),
                        Err(e) => log::warn!("Failed to schedule next frame: {e:?}"),
                    }
                }
            }) as Box<dyn FnMut(f64)>));
        }

        let first = window.request_animation_frame(
            raf_cb
                .borrow()
                .as_ref()
                .expect("frame closure just installed")
                .as_ref()
                .unchecked_ref(),
        )?;
        raf_id.set(Some(first));

        Ok(LoopHandle {
            running,
            raf_id,
            listeners,
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("The Amazing Looperman (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    println!("\nRunning headless demo...");
    run_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run_demo() {
    use looperman::sim::{GameState, InputState, tick};

    let mut state = GameState::new(0xBEEF, 1000.0, 800.0, 200);
    let mut input = InputState {
        arrow_right: true,
        key_d: false,
    };

    for _ in 0..10_000 {
        tick(&mut state, &mut input);
        assert!(state.player.pos.x >= 0.0 && state.player.pos.x <= 940.0);
        if state.is_game_over() || state.loop_count() >= 3 {
            break;
        }
    }

    println!(
        "✓ Demo finished: {} loops, game over: {}",
        state.loop_count(),
        state.is_game_over()
    );
}
