//! Cube Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

    use cube_dodge::consts::*;
    use cube_dodge::highscores::format_duration;
    use cube_dodge::input::Control;
    use cube_dodge::renderer::SceneRenderState;
    use cube_dodge::sim::{GameEvent, GameOverCause, GamePhase, GameState, TickInput, tick};
    use cube_dodge::{Error, HighScores, OrbitCamera, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        highscores: HighScores,
        render_state: Option<SceneRenderState>,
        camera: OrbitCamera,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Phase shown by the overlays
        last_phase: GamePhase,
        /// Rank of the last finished run, if it made the board
        last_rank: Option<usize>,
        /// Pointer position while orbit-dragging
        drag: Option<(i32, i32)>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
            let mut camera = OrbitCamera::default();
            camera.damping = settings.orbit_damping;
            Self {
                state: GameState::with_tuning(seed, tuning),
                settings,
                highscores: HighScores::load(),
                render_state: None,
                camera,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Playing,
                last_rank: None,
                drag: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.accumulator += dt.min(MAX_FRAME_DT);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot inputs fire on a single tick
                self.input.clear_one_shots();

                for event in self.state.drain_events() {
                    if let GameEvent::GameOver(cause) = event {
                        self.record_run(cause);
                    }
                }
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            self.camera.update();

            // Track frame times for FPS
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

        fn record_run(&mut self, cause: GameOverCause) {
            let ticks = self.state.time_ticks;
            let dodged = self.state.dodged;
            self.last_rank = self.highscores.add_run(ticks, dodged, js_sys::Date::now());
            if let Some(rank) = self.last_rank {
                log::info!("New high score #{} ({:?})", rank, cause);
                self.highscores.save();
            }
        }

        /// Match the canvas backing store to its CSS size
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let ratio = self.settings.pixel_ratio(window.device_pixel_ratio());
            let width = ((canvas.client_width() as f64 * ratio) as u32).max(1);
            let height = ((canvas.client_height() as f64 * ratio) as u32).max(1);
            canvas.set_width(width);
            canvas.set_height(height);

            self.camera.set_aspect(width, height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state, &self.camera, &self.settings) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = document() else {
                return;
            };

            set_text(
                &document,
                "#hud-time .hud-value",
                &format_duration(self.state.survived_secs()),
            );
            set_text(
                &document,
                "#hud-dodged .hud-value",
                &self.state.dodged.to_string(),
            );
            let best = self
                .highscores
                .best()
                .map(|run| format_duration(run.seconds()))
                .unwrap_or_else(|| "-".to_string());
            set_text(&document, "#hud-best .hud-value", &best);

            if self.settings.show_fps {
                set_class(&document, "hud-fps", "hud-item");
                set_text(&document, "#hud-fps .hud-value", &self.fps.to_string());
            } else {
                set_class(&document, "hud-fps", "hud-item hidden");
            }

            if self.state.phase != self.last_phase {
                self.update_overlays(&document);
                self.last_phase = self.state.phase;
            }
        }

        fn update_overlays(&self, document: &Document) {
            match self.state.phase {
                GamePhase::Playing => {
                    set_class(document, "pause-overlay", "overlay hidden");
                    set_class(document, "game-over", "overlay hidden");
                }
                GamePhase::Paused => set_class(document, "pause-overlay", "overlay"),
                GamePhase::GameOver => {
                    set_text(
                        document,
                        "#final-time",
                        &format_duration(self.state.survived_secs()),
                    );
                    set_text(document, "#final-dodged", &self.state.dodged.to_string());
                    let rank = match self.last_rank {
                        Some(rank) => format!("New high score: #{}", rank),
                        None => String::new(),
                    };
                    set_text(document, "#final-rank", &rank);
                    set_class(document, "game-over", "overlay");
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    pub async fn run() -> Result<(), Error> {
        log::info!("Cube Dodge starting...");

        let window = web_sys::window().ok_or(Error::Dom("window"))?;
        let document = window.document().ok_or(Error::Dom("document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(Error::Dom("#canvas"))?
            .dyn_into()
            .map_err(|_| Error::Dom("#canvas is not a canvas"))?;

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            Tuning::load(),
            Settings::load(),
        )));
        game.borrow_mut().resize(&canvas);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let render_state = SceneRenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        // Hide loading indicator
        set_class(&document, "loading", "hidden");

        setup_keyboard(game.clone());
        setup_orbit_controls(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_buttons(&canvas, game.clone());
        setup_auto_pause(game.clone());

        set_class(&document, "hud", "");

        // Start game loop
        request_animation_frame(game);

        log::info!("Cube Dodge running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(control) = Control::from_key(&event.key()) else {
                    return;
                };
                // Keep space and arrows from scrolling the page
                event.prevent_default();
                // Auto-repeat would toggle pause/restart over and over
                if event.repeat() && matches!(control, Control::Pause | Control::Restart) {
                    return;
                }
                game.borrow_mut().input.press(control);
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(control) = Control::from_key(&event.key()) {
                    game.borrow_mut().input.release(control);
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_orbit_controls(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Start drag on the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    game.borrow_mut().drag = Some((event.client_x(), event.client_y()));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Track the drag on the window so it survives leaving the canvas
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let Some((last_x, last_y)) = g.drag else {
                    return;
                };
                let (x, y) = (event.client_x(), event.client_y());
                let viewport_height = canvas.client_height() as f32;
                g.camera
                    .rotate((x - last_x) as f32, (y - last_y) as f32, viewport_height);
                g.drag = Some((x, y));
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().drag = None;
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zoom
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                game.borrow_mut().camera.zoom(event.delta_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        // Keeps running after game over so the camera still orbits
        request_animation_frame(game);
    }

    fn setup_buttons(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.press(Control::Restart);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Paused {
                    g.input.press(Control::Pause);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("quality-btn") {
            btn.set_text_content(Some(&quality_label(&game.borrow().settings)));
            let canvas = canvas.clone();
            let label = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let next = g.settings.quality.next();
                g.settings.apply_preset(next);
                g.settings.save();
                g.resize(&canvas);
                label.set_text_content(Some(&quality_label(&g.settings)));
                log::info!("Quality set to {}", next.as_str());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn quality_label(settings: &Settings) -> String {
        format!("Quality: {}", settings.quality.as_str())
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    g.drag = None;
                    if g.state.phase == GamePhase::Playing {
                        g.input.press(Control::Pause);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside); key-ups are lost while unfocused
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                g.drag = None;
                if g.state.phase == GamePhase::Playing {
                    g.input.press(Control::Pause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Show an init failure where the loading indicator was
    pub fn show_error(error: &Error) {
        if let Some(document) = document() {
            if let Some(el) = document.get_element_by_id("loading") {
                el.set_text_content(Some(&format!("Failed to start: {}", error)));
                let _ = el.set_attribute("class", "error");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
        wasm_game::show_error(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cube Dodge (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    run_headless_demo(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one run with a simple dodging bot and report how it went
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo(seed: u64) {
    use cube_dodge::Tuning;
    use cube_dodge::consts::SIM_DT;
    use cube_dodge::highscores::format_duration;
    use cube_dodge::sim::{GameEvent, GameState, TickInput, tick};

    /// Stop after two simulated minutes
    const DEMO_TICKS: u64 = 120 * 60;
    /// How far ahead the bot looks for oncoming enemies
    const LOOKAHEAD_Z: f32 = 8.0;
    /// Bot turns back toward the middle past this x
    const EDGE_X: f32 = 8.0;

    let mut state = GameState::with_tuning(seed, Tuning::load());
    let mut input = TickInput::default();
    let mut bounces = 0u32;

    while !state.is_over() && state.time_ticks < DEMO_TICKS {
        let player = state.player.position;
        let threat = state
            .enemies
            .iter()
            .map(|e| e.body.position)
            .filter(|p| p.z < player.z + 1.0 && p.z > player.z - LOOKAHEAD_Z)
            .max_by(|a, b| a.z.total_cmp(&b.z));

        let (left, right) = match threat {
            _ if player.x > EDGE_X => (true, false),
            _ if player.x < -EDGE_X => (false, true),
            Some(enemy) if (enemy.x - player.x).abs() < 2.0 => {
                (enemy.x >= player.x, enemy.x < player.x)
            }
            _ => (false, false),
        };
        input.left = left;
        input.right = right;

        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::Bounced => bounces += 1,
                GameEvent::GameOver(cause) => log::info!("Run ended: {:?}", cause),
                _ => {}
            }
        }
    }

    println!(
        "Seed {}: survived {} and dodged {} enemies ({} bounces, {})",
        seed,
        format_duration(state.survived_secs()),
        state.dodged,
        bounces,
        if state.is_over() { "game over" } else { "time limit" },
    );
}
