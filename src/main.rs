//! Dog RPG entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use dog_rpg::audio::AudioManager;
    use dog_rpg::camera::{Camera, Minimap};
    use dog_rpg::consts::*;
    use dog_rpg::hud::{self, HudModel};
    use dog_rpg::menu::{LoadError, SceneFlow, Screen};
    use dog_rpg::renderer::{self, RenderState};
    use dog_rpg::sim::{GameEvent, GamePhase, GameState, MoveKeys, TickInput, tick};
    use dog_rpg::{HighScore, Settings};

    /// Game instance holding all state
    struct Game {
        flow: SceneFlow,
        state: Option<GameState>,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        camera: Camera,
        minimap: Minimap,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Direction keys currently held
        held: MoveKeys,
        /// High-score jingle already played this run
        celebrated: bool,
    }

    impl Game {
        fn new(settings: Settings, high_score: HighScore) -> Self {
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                flow: SceneFlow::default(),
                state: None,
                render_state: None,
                audio,
                settings,
                high_score,
                camera: Camera::default(),
                minimap: Minimap::default(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                held: MoveKeys::default(),
                celebrated: false,
            }
        }

        fn phase(&self) -> Option<GamePhase> {
            self.state.as_ref().map(|s| s.phase)
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            let Some(state) = self.state.as_mut() else {
                return;
            };

            self.accumulator += dt;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.moves = self.held;
                tick(state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.bark = false;
                self.input.dig = false;
                self.input.pause = false;
                self.input.restart = false;
            }

            let events = state.drain_events();
            let focus = state.player.pos();
            for event in &events {
                self.handle_event(event);
            }

            self.camera.follow(focus);
            self.camera.update(dt);
        }

        /// React to simulation events (audio, camera, storage)
        fn handle_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::NewHighScore { score } => {
                    if self.high_score.record(*score) {
                        self.high_score.save();
                    }
                    if self.celebrated {
                        return;
                    }
                    self.celebrated = true;
                }
                GameEvent::CameraShake {
                    duration_ms,
                    intensity,
                } => {
                    if self.settings.effective_screen_shake() {
                        self.camera.shake(*duration_ms, *intensity);
                    }
                }
                GameEvent::GameOver { score } => {
                    log::info!("Game over with score {}", score);
                }
                GameEvent::Restarted => {
                    self.celebrated = false;
                    self.accumulator = 0.0;
                }
                _ => {}
            }
            self.audio.play_event(event);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let frame = match (self.flow.screen, self.state.as_ref()) {
                (Screen::Playing, Some(state)) => {
                    renderer::build_game_frame(state, &self.camera, &self.settings, &self.minimap)
                }
                (Screen::MainMenu, _) => {
                    renderer::build_menu_frame(self.flow.menu.selected_tint(), (time / 1000.0) as f32)
                }
                _ => return,
            };

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&frame) {
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

        /// Update DOM overlay
        fn update_dom(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let screen = self.flow.screen;
            set_visible(&document, "loading", screen == Screen::Loading);
            set_visible(&document, "main-menu", screen == Screen::MainMenu);
            set_visible(&document, "hud", screen == Screen::Playing);

            let Some(state) = self.state.as_ref() else {
                return;
            };
            let hud = HudModel::from_state(state);

            set_text(&document, "health-text", &hud.health_label);
            set_width(&document, "health-fill", hud.health_fraction);
            set_text(&document, "stamina-text", &hud.stamina_label);
            set_width(&document, "stamina-fill", hud.stamina_fraction);
            set_text(&document, "score-text", &hud.score_label);
            set_text(&document, "high-score-text", &hud.high_score_label);
            if let Some(el) = element::<HtmlElement>(&document, "high-score-text") {
                let _ = el.style().set_property("color", hud.high_score_color);
            }

            set_visible(&document, "pause-menu", hud.paused);
            set_visible(&document, "game-over", hud.game_over);
            if hud.game_over {
                set_text(&document, "final-score", &hud.final_score_label);
            }

            // Floating texts
            if let Some(layer) = document.get_element_by_id("popups") {
                let html: String = renderer::text_labels(state, &self.camera)
                    .iter()
                    .map(|label| {
                        format!(
                            "<div class=\"popup\" style=\"left:{:.2}%;top:{:.2}%;color:#{:06x};opacity:{:.2}\">{}</div>",
                            label.pos.x / VIEW_WIDTH * 100.0,
                            label.pos.y / VIEW_HEIGHT * 100.0,
                            label.color,
                            label.alpha,
                            label.text
                        )
                    })
                    .collect();
                layer.set_inner_html(&html);
            }
        }

        fn start_run(&mut self) {
            let seed = js_sys::Date::now() as u64;
            if let Some(state) = self.flow.start_game(seed, self.high_score.best) {
                self.state = Some(state);
                self.accumulator = 0.0;
                self.input = TickInput::default();
                self.celebrated = false;
                self.audio.resume();
            }
        }
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.get_attribute("class").unwrap_or_default();
            let updated = hud::toggle_class(&classes, "hidden", !visible);
            if updated != classes {
                let _ = el.set_attribute("class", &updated);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_width(document: &Document, id: &str, fraction: f32) {
        if let Some(el) = element::<HtmlElement>(document, id) {
            let _ = el
                .style()
                .set_property("width", &HudModel::bar_width(fraction));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Dog RPG starting...");

        let settings = Settings::load();
        let high_score = HighScore::load();
        let game = Rc::new(RefCell::new(Game::new(settings, high_score)));

        let result = match init_graphics().await {
            Ok((render_state, canvas)) => {
                game.borrow_mut().render_state = Some(render_state);
                setup_input_handlers(&canvas, game.clone());
                setup_menu_buttons(game.clone());
                setup_auto_pause(game.clone());
                Ok(())
            }
            Err(err) => Err(err),
        };

        {
            let mut g = game.borrow_mut();
            g.flow.finish_loading(result);
            if let Some(message) = g.flow.error.clone() {
                show_error(&message);
            }
            if !g.audio.is_available() {
                log::warn!("Playing without sound");
            }
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Dog RPG running!");
    }

    /// Size the canvas and bring up WebGPU
    async fn init_graphics() -> Result<(RenderState, HtmlCanvasElement), LoadError> {
        let window = web_sys::window().ok_or(LoadError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(LoadError::MissingElement("document"))?;
        let canvas: HtmlCanvasElement =
            element(&document, "canvas").ok_or(LoadError::MissingElement("canvas"))?;

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| LoadError::Gpu(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| LoadError::Gpu(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| LoadError::Gpu(e.to_string()))?;

        Ok((render_state, canvas))
    }

    fn show_error(message: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        set_text(&document, "error-text", message);
        set_visible(&document, "error-panel", true);
        set_visible(&document, "loading", false);
    }

    /// Apply a held-key change; returns true if the key is a direction
    fn set_held(keys: &mut MoveKeys, key: &str, down: bool) -> bool {
        match key {
            "ArrowLeft" | "a" | "A" => keys.left = down,
            "ArrowRight" | "d" | "D" => keys.right = down,
            "ArrowUp" | "w" | "W" => keys.up = down,
            "ArrowDown" | "s" | "S" => keys.down = down,
            _ => return false,
        }
        true
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.flow.screen != Screen::Playing {
                    return;
                }
                let key = event.key();
                if set_held(&mut g.held, &key, true) {
                    event.prevent_default();
                    return;
                }

                let game_over = g.phase() == Some(GamePhase::GameOver);
                match key.as_str() {
                    " " => {
                        event.prevent_default();
                        if game_over {
                            g.input.restart = true;
                        } else if !event.repeat() {
                            g.input.bark = true;
                        }
                    }
                    "Enter" if game_over => g.input.restart = true,
                    "e" | "E" if !event.repeat() => g.input.dig = true,
                    "Escape" => g.input.pause = true,
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "F3" => {
                        event.prevent_default();
                        g.settings.toggle_debug_overlay();
                        g.settings.save();
                    }
                    _ => {}
                }
                g.audio.resume();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                set_held(&mut g.held, &event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click to restart after game over
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.phase() == Some(GamePhase::GameOver) {
                    g.input.restart = true;
                }
                g.audio.resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("change-color-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.flow.menu.cycle_tint();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    set_text(&document, "dog-color-name", g.flow.menu.tint_name());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().start_run();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // The game-over panel covers the canvas; any click on it restarts
        if let Some(btn) = document.get_element_by_id("game-over") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let mut g = game.borrow_mut();
                if g.phase() == Some(GamePhase::GameOver) {
                    g.input.restart = true;
                }
                g.audio.resume();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pause = true; // Toggle back to playing
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            g.update(dt);
            g.render(time);
            g.update_dom();
        }

        request_animation_frame(game);
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
                    if g.phase() == Some(GamePhase::Playing) {
                        g.input.pause = true;
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

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                // Released keys are not reported while unfocused
                g.held = MoveKeys::default();
                if g.phase() == Some(GamePhase::Playing) {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dog RPG (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use `trunk serve` to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    run_autopilot_demo(seed, 60);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Let the autopilot play a run headlessly and report how it went
#[cfg(not(target_arch = "wasm32"))]
fn run_autopilot_demo(seed: u64, seconds: u32) {
    use dog_rpg::consts::{SIM_DT, TICK_RATE};
    use dog_rpg::menu::SceneFlow;
    use dog_rpg::sim::{GameEvent, GamePhase, TickInput, tick};
    use dog_rpg::HighScore;

    let mut high_score = HighScore::load();
    let mut flow = SceneFlow::default();
    flow.finish_loading(Ok(()));
    let Some(mut state) = flow.start_game(seed, high_score.best) else {
        log::error!("Could not start a run");
        return;
    };

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let (mut digs, mut moles_killed, mut pickups) = (0u32, 0u32, 0u32);
    for t in 0..seconds * TICK_RATE {
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::Dug { .. } => digs += 1,
                GameEvent::MoleKilled { .. } => moles_killed += 1,
                GameEvent::PowerUpCollected { .. } => pickups += 1,
                GameEvent::NewHighScore { score } => {
                    high_score.record(score);
                }
                _ => {}
            }
        }
        if t % (10 * TICK_RATE) == 0 {
            log::info!(
                "t={}s score={} health={:.0} moles={}",
                t / TICK_RATE,
                state.score,
                state.health,
                state.moles.len()
            );
        }
        if state.phase == GamePhase::GameOver {
            log::info!("Autopilot lost all health");
            break;
        }
    }
    high_score.save();

    println!(
        "Seed {}: score {} (best {}), {} digs, {} moles defeated, {} pickups",
        seed, state.score, high_score.best, digs, moles_killed, pickups
    );
}
