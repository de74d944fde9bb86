//! Catch the Falling Objects entry point
//!
//! On the web this wires the canvas and DOM menus to the round controller and
//! runs the frame loop. Natively it plays one headless round with an autoplay
//! basket.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use catch_falling::audio::{AudioManager, Music, SoundEffect};
    use catch_falling::consts::*;
    use catch_falling::persistence::LocalStorage;
    use catch_falling::renderer::CanvasRenderer;
    use catch_falling::sim::{Basket, Difficulty, Feedback, RoundController, RoundState};
    use catch_falling::ui::{GameOverSummary, Hud};
    use catch_falling::{HighScore, Settings, SimError};

    /// Game instance holding all state
    struct Game {
        controller: RoundController,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        basket_x: f32,
        last_time: f64,
    }

    impl Game {
        fn start(&mut self) {
            let config = self.settings.round_config();
            let started = self
                .controller
                .set_config(config)
                .and_then(|()| self.controller.start(self.settings.difficulty));
            if report(started) {
                self.audio.resume();
                self.audio.start_music(self.settings.music);
                self.last_time = 0.0;
                show_screen(RoundState::Playing);
            }
        }

        fn pause(&mut self) {
            if report(self.controller.pause()) {
                self.audio.pause_music();
                show_screen(RoundState::Paused);
            }
        }

        fn resume(&mut self) {
            if report(self.controller.resume()) {
                self.audio.resume_music();
                self.last_time = 0.0;
                show_screen(RoundState::Playing);
            }
        }

        fn quit(&mut self) {
            if report(self.controller.quit()) {
                self.audio.stop_music();
                show_screen(RoundState::Menu);
            }
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            self.settings.difficulty = difficulty;
            mark_selected_difficulty(difficulty);
        }

        fn set_round_secs(&mut self, secs: u32) {
            self.settings.set_round_secs(secs);
            set_query_text(".slider-value", &format!("{} seconds", self.settings.round_secs));
        }

        /// Switch tracks, live if a round is running
        fn set_music(&mut self, music: Music) {
            self.settings.music = music;
            mark_selected_music(music);
            match self.controller.state() {
                RoundState::Playing => self.audio.start_music(music),
                RoundState::Paused => {
                    self.audio.start_music(music);
                    self.audio.pause_music();
                }
                _ => {}
            }
        }

        fn toggle_mute(&mut self) {
            self.settings.toggle_mute();
            self.audio.apply_settings(&self.settings);
            set_text("mute-button", if self.settings.muted { "Unmute" } else { "Mute" });
            log::info!("Sound {}", if self.settings.muted { "muted" } else { "on" });
        }

        fn set_master_volume(&mut self, volume: f32) {
            self.settings.set_master_volume(volume);
            self.audio.apply_settings(&self.settings);
        }

        /// Advance and draw one frame
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let result = if self.controller.state() == RoundState::Playing {
                match self.controller.step(dt, self.basket_x) {
                    Ok(result) => result,
                    Err(e) => {
                        log::warn!("{}", e);
                        self.controller.snapshot()
                    }
                }
            } else {
                self.controller.snapshot()
            };

            for cue in &result.feedback {
                self.audio.play(SoundEffect::for_feedback(cue));
                if matches!(cue, Feedback::RoundOver { .. }) {
                    self.audio.stop_music();
                    self.show_game_over();
                }
            }
            self.audio.update_music();

            let hud = (result.state != RoundState::Menu)
                .then(|| Hud::from_result(&result, self.controller.difficulty()));
            self.renderer
                .render(&result.objects, &Basket::at(self.basket_x), hud.as_ref());
        }

        fn show_game_over(&self) {
            let summary = GameOverSummary::new(
                &self.controller.score(),
                self.controller.high_score(),
                self.controller.difficulty(),
                self.controller.config().round_secs,
            );
            set_text("final-score", &summary.final_score.to_string());
            set_text("end-high-score", &summary.high_score.to_string());
            set_text("high-score-value", &summary.high_score.to_string());
            set_text("apples-caught", &summary.apples_caught.to_string());
            set_text("rocks-avoided", &summary.rocks_avoided.to_string());
            set_text("difficulty-level", &summary.difficulty);
            show_screen(RoundState::GameOver);
        }
    }

    /// Log a rejected transition; true if it went through
    fn report(result: Result<(), SimError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    // === DOM helpers ===

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_visible(id: &str, visible: bool) {
        let el = document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        if let Some(el) = el {
            let display = if visible { "flex" } else { "none" };
            let _ = el.style().set_property("display", display);
        }
    }

    fn show_screen(state: RoundState) {
        set_visible("main-menu", state == RoundState::Menu);
        set_visible("pause-menu", state == RoundState::Paused);
        set_visible("game-over", state == RoundState::GameOver);
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_query_text(selector: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.query_selector(selector).ok().flatten()) {
            el.set_text_content(Some(text));
        }
    }

    fn difficulty_button_id(difficulty: Difficulty) -> String {
        format!("{}-button", difficulty.as_str().to_lowercase())
    }

    fn mark_selected_difficulty(selected: Difficulty) {
        let Some(document) = document() else { return };
        for difficulty in Difficulty::ALL {
            if let Some(el) = document.get_element_by_id(&difficulty_button_id(difficulty)) {
                let _ = el
                    .class_list()
                    .toggle_with_force("selected", difficulty == selected);
            }
        }
    }

    fn mark_selected_music(selected: Music) {
        let Some(document) = document() else { return };
        for music in Music::ALL {
            if let Some(el) = document.get_element_by_id(&music.button_id()) {
                let _ = el.class_list().toggle_with_force("selected", music == selected);
            }
        }
    }

    fn on_click(id: &str, game: &Rc<RefCell<Game>>, action: impl Fn(&mut Game) + 'static) {
        let Some(el) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Missing #{}", id);
            return;
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut game.borrow_mut());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Catch the Falling Objects starting...");

        let document = document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(&canvas).ok_or("no 2d context")?;

        let settings = Settings::load();
        let high_score = HighScore::load(Box::new(LocalStorage));
        let controller =
            RoundController::unseeded(settings.round_config(), high_score).map_err(js_error)?;
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        set_text("high-score-value", &controller.high_score().to_string());
        set_query_text(".slider-value", &format!("{} seconds", settings.round_secs));
        mark_selected_difficulty(settings.difficulty);
        mark_selected_music(settings.music);
        if let Some(slider) = document
            .get_element_by_id("volume-slider")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            slider.set_value(&((settings.master_volume * 100.0).round() as u32).to_string());
        }
        show_screen(RoundState::Menu);

        let game = Rc::new(RefCell::new(Game {
            controller,
            renderer,
            audio,
            settings,
            basket_x: FIELD_WIDTH / 2.0,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_menus(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Catch the Falling Objects running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse x drives the basket, scaled from CSS pixels to the playfield
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 {
                    return;
                }
                let scale = f64::from(FIELD_WIDTH) / rect.width();
                let x = (f64::from(event.client_x()) - rect.left()) * scale;
                game.borrow_mut().basket_x = x as f32;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // P pauses, R resumes, M toggles mute
        if let Some(document) = document() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "p" | "P" if g.controller.state() == RoundState::Playing => g.pause(),
                    "r" | "R" if g.controller.state() == RoundState::Paused => g.resume(),
                    "m" | "M" => g.toggle_mute(),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menus(game: Rc<RefCell<Game>>) {
        on_click("start-button", &game, Game::start);
        on_click("play-again-button", &game, Game::start);
        on_click("resume-button", &game, Game::resume);
        on_click("quit-button", &game, Game::quit);
        on_click("menu-button", &game, Game::quit);

        for difficulty in Difficulty::ALL {
            on_click(&difficulty_button_id(difficulty), &game, move |g| {
                g.set_difficulty(difficulty)
            });
        }

        for music in Music::ALL {
            on_click(&music.button_id(), &game, move |g| g.set_music(music));
        }
        on_click("mute-button", &game, Game::toggle_mute);

        on_slider("duration-slider", &game, |g, value| match value.parse::<u32>() {
            Ok(secs) => g.set_round_secs(secs),
            Err(e) => log::warn!("Bad duration {:?}: {}", value, e),
        });
        // Percent, 0 - 100
        on_slider("volume-slider", &game, |g, value| match value.parse::<f32>() {
            Ok(percent) => g.set_master_volume(percent / 100.0),
            Err(e) => log::warn!("Bad volume {:?}: {}", value, e),
        });
    }

    fn on_slider(id: &str, game: &Rc<RefCell<Game>>, action: impl Fn(&mut Game, &str) + 'static) {
        let Some(slider) = document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        else {
            log::warn!("Missing #{}", id);
            return;
        };
        let game = game.clone();
        let slider_clone = slider.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            action(&mut game.borrow_mut(), &slider_clone.value());
        });
        let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.controller.state() == RoundState::Playing {
                        g.pause();
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
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.controller.state() == RoundState::Playing {
                    g.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        web_sys::console::error_1(&e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use catch_falling::audio::SoundEffect;
    use catch_falling::consts::*;
    use catch_falling::persistence::JsonFileStore;
    use catch_falling::platform::ManualClock;
    use catch_falling::sim::{Difficulty, FallingObject, ObjectKind, RoundController, RoundState};
    #[cfg(test)]
    use catch_falling::settings::{MAX_ROUND_SECS, MIN_ROUND_SECS};
    use catch_falling::ui::GameOverSummary;
    use catch_falling::{HighScore, Settings, SimError};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    pub const SCORES_FILE: &str = "catch_falling_scores.json";
    const FRAME: f32 = 1.0 / 60.0;

    /// Steers toward the lowest apple, sidestepping bombs about to land
    #[derive(Debug, Clone)]
    pub struct Autopilot {
        pub x: f32,
    }

    impl Autopilot {
        /// Basket speed in px/s
        const SPEED: f32 = 700.0;
        /// How far above the basket a bomb starts to matter
        const BOMB_LOOKAHEAD: f32 = 200.0;

        pub fn new() -> Self {
            Self {
                x: FIELD_WIDTH / 2.0,
            }
        }

        pub fn target(&self, objects: &[FallingObject]) -> f32 {
            let basket_top = BASKET_Y - BASKET_HEIGHT / 2.0;
            let mut target = objects
                .iter()
                .filter(|o| o.kind == ObjectKind::Apple && o.top() <= BASKET_Y)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map_or(self.x, |apple| apple.pos.x);

            let clearance = BASKET_WIDTH / 2.0 + OBJECT_RADIUS + 5.0;
            for bomb in objects.iter().filter(|o| o.kind == ObjectKind::Bomb) {
                let near = bomb.bottom() >= basket_top - Self::BOMB_LOOKAHEAD
                    && bomb.top() <= BASKET_Y + BASKET_HEIGHT / 2.0;
                if near && (bomb.pos.x - target).abs() < clearance {
                    let left = bomb.pos.x - clearance;
                    let right = bomb.pos.x + clearance;
                    target = if left < BASKET_WIDTH / 2.0 {
                        right
                    } else if right > FIELD_WIDTH - BASKET_WIDTH / 2.0 {
                        left
                    } else if (self.x - left).abs() <= (self.x - right).abs() {
                        left
                    } else {
                        right
                    };
                }
            }
            target.clamp(BASKET_WIDTH / 2.0, FIELD_WIDTH - BASKET_WIDTH / 2.0)
        }

        /// Move toward the target at basket speed
        pub fn steer(&mut self, objects: &[FallingObject], dt: f32) -> f32 {
            let step = Self::SPEED * dt;
            let delta = self.target(objects) - self.x;
            self.x += delta.clamp(-step, step);
            self.x
        }
    }

    /// `[difficulty] [seconds]` over whatever the settings file says
    pub fn settings_from_args(mut settings: Settings, args: &[String]) -> Settings {
        if let Some(name) = args.first() {
            match Difficulty::from_str(name) {
                Some(d) => settings.difficulty = d,
                None => log::warn!("Unknown difficulty {:?}, using {}", name, settings.difficulty),
            }
        }
        if let Some(secs) = args.get(1) {
            match secs.parse::<u32>() {
                Ok(secs) => settings.set_round_secs(secs),
                Err(e) => log::warn!("Bad round length {:?}: {}", secs, e),
            }
        }
        settings
    }

    pub fn run(args: &[String]) -> Result<GameOverSummary, SimError> {
        let settings = settings_from_args(Settings::load(), args);
        let high_score = HighScore::load(Box::new(JsonFileStore::open(SCORES_FILE)));
        let clock = ManualClock::new(0.0);
        let mut controller = RoundController::new(
            settings.round_config(),
            clock.clone(),
            Pcg32::from_os_rng(),
            high_score,
        )?;

        controller.start(settings.difficulty)?;
        let mut pilot = Autopilot::new();

        while controller.state() == RoundState::Playing {
            clock.advance(f64::from(FRAME));
            let basket_x = pilot.steer(controller.objects(), FRAME);
            let result = controller.step(FRAME, basket_x)?;
            for cue in &result.feedback {
                log::debug!("{:?} ({:?})", cue, SoundEffect::for_feedback(cue));
            }
        }

        Ok(GameOverSummary::new(
            &controller.score(),
            controller.high_score(),
            controller.difficulty(),
            controller.config().round_secs,
        ))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn at(kind: ObjectKind, x: f32, y: f32) -> FallingObject {
            let mut obj = FallingObject::new(kind, x, 100.0);
            obj.pos.y = y;
            obj
        }

        #[test]
        fn test_autopilot_chases_lowest_apple() {
            let pilot = Autopilot::new();
            let objects = [
                at(ObjectKind::Apple, 150.0, 100.0),
                at(ObjectKind::Apple, 650.0, 300.0),
                at(ObjectKind::Rock, 400.0, 500.0),
            ];
            assert_eq!(pilot.target(&objects), 650.0);
            assert_eq!(pilot.target(&[]), pilot.x);
        }

        #[test]
        fn test_autopilot_dodges_bombs() {
            let pilot = Autopilot { x: 300.0 };
            let objects = [
                at(ObjectKind::Apple, 400.0, 450.0),
                at(ObjectKind::Bomb, 410.0, 480.0),
            ];
            let target = pilot.target(&objects);
            assert!((target - 410.0).abs() >= BASKET_WIDTH / 2.0 + OBJECT_RADIUS);
            assert!(target < 410.0);
        }

        #[test]
        fn test_autopilot_speed_limited() {
            let mut pilot = Autopilot { x: 100.0 };
            let objects = [at(ObjectKind::Apple, 700.0, 300.0)];
            let x = pilot.steer(&objects, 0.1);
            assert!((x - 170.0).abs() < 1e-3);
        }

        #[test]
        fn test_args_override_settings() {
            let args = vec!["hard".to_string(), "30".to_string()];
            let s = settings_from_args(Settings::default(), &args);
            assert_eq!(s.difficulty, Difficulty::Hard);
            assert_eq!(s.round_secs, 30);

            let args = vec!["extreme".to_string(), "soon".to_string()];
            let s = settings_from_args(Settings::default(), &args);
            assert_eq!(s, Settings::default());
        }

        #[test]
        fn test_args_round_length_clamped() {
            let args = vec!["easy".to_string(), "0".to_string()];
            let s = settings_from_args(Settings::default(), &args);
            assert_eq!(s.round_secs, MIN_ROUND_SECS);

            let args = vec!["easy".to_string(), "86400".to_string()];
            let s = settings_from_args(Settings::default(), &args);
            assert_eq!(s.round_secs, MAX_ROUND_SECS);
            assert_eq!(s.round_config().round_secs, MAX_ROUND_SECS);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), catch_falling::SimError> {
    env_logger::init();
    log::info!("Catch the Falling Objects (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let summary = headless::run(&args)?;

    log::info!(
        "Final score {} (best {}) on {}: {} apples caught, {} rocks avoided",
        summary.final_score,
        summary.high_score,
        summary.difficulty,
        summary.apples_caught,
        summary.rocks_avoided
    );
    println!(
        "Score: {}  High score: {}  Difficulty: {}  Apples: {}  Rocks avoided: {}",
        summary.final_score,
        summary.high_score,
        summary.difficulty,
        summary.apples_caught,
        summary.rocks_avoided
    );
    Ok(())
}
