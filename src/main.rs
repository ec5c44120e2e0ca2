//! Tiger Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use tiger_run::consts::GROUND_HEIGHT;
    use tiger_run::platform::now_ms;
    use tiger_run::sim::{GameEvent, ObstacleKind, TickInput, World, request_jump, restart, tick};
    use tiger_run::{HighScore, Settings};

    thread_local! {
        /// Latest level reported by the page's audio analyser
        static VOLUME_LEVEL: Cell<f32> = const { Cell::new(0.0) };
        /// Player preferences, loaded once at startup
        static SETTINGS: RefCell<Settings> = RefCell::new(Settings::default());
    }

    fn current_settings() -> Settings {
        SETTINGS.with(|s| s.borrow().clone())
    }

    fn update_settings(change: impl FnOnce(&mut Settings)) {
        SETTINGS.with(|s| s.borrow_mut().update(change));
    }

    #[wasm_bindgen]
    pub fn set_screen_shake(enabled: bool) {
        update_settings(|s| s.screen_shake = enabled);
    }

    #[wasm_bindgen]
    pub fn set_reactive_background(enabled: bool) {
        update_settings(|s| s.reactive_background = enabled);
    }

    #[wasm_bindgen]
    pub fn set_reduced_motion(enabled: bool) {
        update_settings(|s| s.reduced_motion = enabled);
    }

    #[wasm_bindgen]
    pub fn set_music_volume(volume: f32) {
        update_settings(|s| s.set_music_volume(volume));
    }

    #[wasm_bindgen]
    pub fn set_mute_when_hidden(enabled: bool) {
        update_settings(|s| s.mute_when_hidden = enabled);
    }

    /// Called from JS with the analyser's average frequency magnitude
    #[wasm_bindgen]
    pub fn set_volume_level(level: f32) {
        VOLUME_LEVEL.with(|v| v.set(level));
    }

    /// Called from JS to set the music element's volume
    #[wasm_bindgen]
    pub fn music_gain() -> f32 {
        let hidden = web_sys::window()
            .and_then(|w| w.document())
            .is_some_and(|d| d.visibility_state() == web_sys::VisibilityState::Hidden);
        SETTINGS.with(|s| s.borrow().music_gain(hidden))
    }

    /// Game instance holding all state
    struct Game {
        world: World,
        high_score: HighScore,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl Game {
        /// Run one simulation step and forward its events to the page
        fn update(&mut self) {
            let input = TickInput {
                jump: false,
                now_ms: now_ms(),
                volume_level: VOLUME_LEVEL.with(Cell::get),
            };
            tick(&mut self.world, &input);

            for event in self.world.drain_events() {
                match event {
                    GameEvent::Score(score) => set_text("scoreDisplay", &format!("Score: {}", score)),
                    GameEvent::GameOver {
                        score,
                        new_high_score,
                        cause,
                    } => {
                        log::info!("Caught by {:?}", cause);
                        if new_high_score && self.high_score.record(score) {
                            self.high_score.save();
                            set_text(
                                "highScoreDisplay",
                                &format!("High Score: {}", self.high_score.best),
                            );
                        }
                        set_text("finalScore", &format!("Your score: {}", score));
                        set_class("gameOver", "");
                    }
                }
            }
        }

        fn resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
            let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
            self.world.resize(width as f32, height as f32);
        }

        /// Render the current frame
        fn render(&self) {
            let ctx = &self.ctx;
            let world = &self.world;
            let (w, h) = (world.viewport.x as f64, world.viewport.y as f64);
            let floor = world.floor_y as f64;
            let half_ground = GROUND_HEIGHT as f64 / 2.0;
            let intensity = world.intensity();
            let settings = current_settings();

            ctx.clear_rect(0.0, 0.0, w, h);
            let background = if settings.reactive_background {
                intensity.background_color()
            } else {
                "#6495ED"
            };
            ctx.set_fill_style_str(background);
            ctx.fill_rect(0.0, 0.0, w, floor - half_ground);
            ctx.fill_rect(0.0, floor + half_ground, w, h - floor - half_ground);

            ctx.set_fill_style_str("#2E8B57");
            ctx.fill_rect(0.0, floor - half_ground, w, GROUND_HEIGHT as f64);

            for o in &world.obstacles {
                let (x, y) = (o.pos.x as f64, o.pos.y as f64);
                let (ow, oh) = (o.size.x as f64, o.size.y as f64);
                match o.kind {
                    ObstacleKind::Fire => {
                        fill_triangle(ctx, "#FF4500", x, y + oh, x + ow / 2.0, y, x + ow, y + oh);
                        fill_triangle(
                            ctx,
                            "#FFA500",
                            x + 5.0,
                            y + oh - 5.0,
                            x + ow / 2.0,
                            y + 5.0,
                            x + ow - 5.0,
                            y + oh - 5.0,
                        );
                    }
                    ObstacleKind::Box => {
                        ctx.set_fill_style_str("#8B4513");
                        ctx.fill_rect(x, y, ow, oh);
                        ctx.set_fill_style_str("#A0522D");
                        let mut i = 0.0;
                        while i < ow {
                            ctx.fill_rect(x + i, y, 10.0, oh);
                            i += 15.0;
                        }
                        ctx.set_fill_style_str("#654321");
                        ctx.fill_rect(x, y, ow, 5.0);
                    }
                    ObstacleKind::Hole => {
                        ctx.set_fill_style_str("#654321");
                        ctx.fill_rect(x, y, ow, oh);
                    }
                }
            }

            for hz in &world.hazards {
                let (x, y) = (hz.pos.x as f64, hz.pos.y as f64);
                let (hw, hh) = (hz.size.x as f64, hz.size.y as f64);
                fill_triangle(ctx, "#B22222", x, y + hh, x + hw / 2.0, y, x + hw, y + hh);
            }

            let p = &world.player;
            let flash = p.invincible && (now_ms() / 100.0) as i64 % 2 == 0;
            ctx.set_fill_style_str(if flash { "#FF0000" } else { "#0000FF" });
            let (px, py) = (p.pos.x as f64, p.pos.y as f64);
            let (pw, ph) = (p.size.x as f64, p.size.y as f64);
            ctx.fill_rect(px, py, pw, ph);
            ctx.set_fill_style_str("#FFFFFF");
            ctx.fill_rect(px + pw - 10.0, py + 5.0, 5.0, 5.0);
            ctx.fill_rect(px + pw - 10.0, py + 20.0, 5.0, 5.0);

            let t = &world.tiger;
            let (tx, ty) = (t.pos.x as f64, t.pos.y as f64);
            let (tw, th) = (t.size.x as f64, t.size.y as f64);
            ctx.set_fill_style_str("#FF8C00");
            ctx.fill_rect(tx, ty, tw, th);
            ctx.set_fill_style_str("#000000");
            for i in 0..3 {
                ctx.fill_rect(tx + 5.0 + i as f64 * 10.0, ty + 5.0, 5.0, th - 10.0);
            }
            ctx.set_fill_style_str("#FFFFFF");
            ctx.fill_rect(tx + tw - 10.0, ty + 5.0, 5.0, 5.0);
            ctx.fill_rect(tx + tw - 10.0, ty + 20.0, 5.0, 5.0);

            self.apply_shake(&settings);
        }

        /// Offset the canvas to follow the music's shake request
        fn apply_shake(&self, settings: &Settings) {
            let style = self.canvas.style();
            let shake = match settings.filter_shake(self.world.intensity().shake()) {
                Some(shake) if self.world.is_running() => shake,
                _ => {
                    let _ = style.set_property("transform", "none");
                    return;
                }
            };
            let amp = shake.amplitude_px() as i32;
            let phase = (now_ms() / 1000.0 / shake.period_secs() as f64).fract();
            let (dx, dy) = match (phase * 4.0) as u32 {
                0 => (0, 0),
                1 | 3 => (-amp, amp),
                _ => (amp, -amp),
            };
            let _ = style.set_property("transform", &format!("translate({}px, {}px)", dx, dy));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_triangle(
        ctx: &CanvasRenderingContext2d,
        color: &str,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) {
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        ctx.move_to(x1, y1);
        ctx.line_to(x2, y2);
        ctx.line_to(x3, y3);
        ctx.close_path();
        ctx.fill();
    }

    fn set_text(id: &str, text: &str) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(id: &str, class: &str) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", class);
        }
    }

    /// Route panics to the console and tell the player something broke
    fn install_panic_hook() {
        std::panic::set_hook(Box::new(|info| {
            console_error_panic_hook::hook(info);
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&format!("error {}", info));
            }
        }));
    }

    pub fn run() -> Result<(), JsValue> {
        install_panic_hook();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Tiger Run starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("missing #gameCanvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;

        let high_score = HighScore::load();
        let loaded = Settings::load();
        SETTINGS.with(|s| *s.borrow_mut() = loaded);
        set_text("highScoreDisplay", &format!("High Score: {}", high_score.best));

        let seed = js_sys::Date::now() as u64;
        let world = World::new(800.0, 600.0, seed).with_high_score(high_score.best);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            world,
            high_score,
            canvas,
            ctx,
        }));
        game.borrow_mut().resize();

        setup_input_handlers(game.clone())?;
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone())?;

        request_animation_frame(game);

        log::info!("Tiger Run running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Keyboard: space jumps
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    request_jump(&mut game.borrow_mut().world);
                }
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch: any tap on the canvas jumps
        {
            let canvas = game.borrow().canvas.clone();
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if request_jump(&mut game.borrow_mut().world) {
                    event.prevent_default();
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window resize re-seats the runners on the new floor
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().and_then(|w| w.document());
        let Some(btn) = document.and_then(|d| d.get_element_by_id("restartButton")) else {
            log::warn!("No #restartButton on the page");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            restart(&mut g.world, now_ms());
            set_text("scoreDisplay", "Score: 0");
            set_class("gameOver", "hidden");
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                g.world.pause();
                log::info!("Paused (tab hidden)");
            } else {
                g.world.resume();
                log::info!("Resumed");
            }
        });
        document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tiger Run (native) starting...");
    log::info!("Native mode runs a headless autoplay - use `trunk serve` for the web version");

    autoplay::run(20_000);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a simple bot jumps whatever is coming
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use tiger_run::HighScore;
    use tiger_run::sim::{Bounds, GameEvent, ObstacleKind, TickInput, World, tick};

    /// Simulated frame length (60 Hz display)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Jump when the next threat's left edge is this close ahead
    const REACTION_DISTANCE: f32 = 40.0;

    /// Whether the bot wants to jump this frame
    fn wants_jump(world: &World) -> bool {
        let player = world.player.rect();
        let floor_threat = |top: f32| top > world.floor_y - 2.0 * player.size.y;
        world
            .obstacles
            .iter()
            .filter(|o| o.kind != ObstacleKind::Box || floor_threat(o.pos.y))
            .map(|o| o.pos.x - player.right())
            .any(|gap| gap > 0.0 && gap < REACTION_DISTANCE)
    }

    pub fn run(max_steps: u32) {
        let mut high_score = HighScore::load();
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut world = World::new(800.0, 600.0, seed).with_high_score(high_score.best);
        log::info!("Autoplay with seed {}", seed);

        let mut now = 0.0;
        for _ in 0..max_steps {
            now += FRAME_MS;
            let input = TickInput {
                jump: wants_jump(&world),
                now_ms: now,
                volume_level: 0.0,
            };
            tick(&mut world, &input);

            for event in world.drain_events() {
                if let GameEvent::GameOver {
                    score,
                    new_high_score,
                    cause,
                } = event
                {
                    println!("Game over: {:?} at score {}", cause, score);
                    if new_high_score && high_score.record(score) {
                        high_score.save();
                    }
                }
            }
            if !world.is_running() {
                break;
            }
        }

        if world.is_running() {
            println!("Survived {} steps with score {}", max_steps, world.score);
        }
        println!("High score: {}", high_score.best);
    }
}
