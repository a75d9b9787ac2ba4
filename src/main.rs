//! Tri Dodge entry point
//!
//! Web: binds the DOM, owns the session and drives it from
//! `requestAnimationFrame`. Native: runs a short scripted headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use tri_dodge::platform::{self, CanvasPresentation};
    use tri_dodge::scoreboard::{
        HttpScoreboard, LeaderboardEntry, LocalScoreboard, LocalStorageStore, Registration,
        Rename, ScoreboardError, ScoreboardService, UsernameStatus, canonical_key,
    };
    use tri_dodge::session::{GameOver, Session, report_game_over};
    use tri_dodge::sim::GamePhase;
    use tri_dodge::Settings;

    /// Where scores go: the HTTP API, or LocalStorage when the page asks for it
    /// with `data-scoreboard="local"` on the canvas
    enum Backend {
        Http(HttpScoreboard),
        Local(LocalScoreboard<LocalStorageStore>),
    }

    impl ScoreboardService for Backend {
        async fn check_username(&self, name: &str) -> Result<UsernameStatus, ScoreboardError> {
            match self {
                Backend::Http(s) => s.check_username(name).await,
                Backend::Local(s) => s.check_username(name).await,
            }
        }

        async fn register_username(&self, name: &str) -> Result<Registration, ScoreboardError> {
            match self {
                Backend::Http(s) => s.register_username(name).await,
                Backend::Local(s) => s.register_username(name).await,
            }
        }

        async fn submit_score(&self, username: &str, score: u64) -> Result<(), ScoreboardError> {
            match self {
                Backend::Http(s) => s.submit_score(username, score).await,
                Backend::Local(s) => s.submit_score(username, score).await,
            }
        }

        async fn rename_username(&self, old: &str, new: &str) -> Result<Rename, ScoreboardError> {
            match self {
                Backend::Http(s) => s.rename_username(old, new).await,
                Backend::Local(s) => s.rename_username(old, new).await,
            }
        }

        async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ScoreboardError> {
            match self {
                Backend::Http(s) => s.fetch_leaderboard().await,
                Backend::Local(s) => s.fetch_leaderboard().await,
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        presentation: CanvasPresentation,
        settings: Settings,
        /// A `requestAnimationFrame` callback is pending
        loop_armed: bool,
        last_score: Option<u64>,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(session: Session, presentation: CanvasPresentation, settings: Settings) -> Self {
            Self {
                last_phase: session.phase(),
                session,
                presentation,
                settings,
                loop_armed: false,
                last_score: None,
            }
        }

        fn start(&mut self) -> bool {
            self.session.phase() == GamePhase::Idle && self.session.start(&self.presentation)
        }

        fn restart(&mut self) -> bool {
            self.session.restart(&self.presentation)
        }

        /// The final screen is drawn and nothing moves until restart
        fn is_finished(&self) -> bool {
            self.session.phase() == GamePhase::Over && !self.session.is_settling()
        }

        /// Run one frame; returns the game-over hand-off on the frame it happens
        fn frame(&mut self) -> Option<GameOver> {
            self.session.frame(&mut self.presentation)
        }

        /// Sync score and buttons with the session
        fn update_hud(&mut self, document: &Document) {
            let score = self.session.score();
            if self.last_score != Some(score) {
                if let Some(el) = document.get_element_by_id("scoreDisplay") {
                    el.set_text_content(Some(&score.to_string()));
                }
                self.last_score = Some(score);
            }

            let phase = self.session.phase();
            if phase != self.last_phase || phase == GamePhase::Over {
                let show_start = phase == GamePhase::Idle;
                let show_restart = phase == GamePhase::Over && !self.session.is_settling();
                set_hidden(document, "startBtn", !show_start);
                set_hidden(document, "restartBtn", !show_restart);
                if let Some(el) = document.get_element_by_id("pauseBtn") {
                    let label = if phase == GamePhase::Paused { "Resume" } else { "Pause" };
                    el.set_text_content(Some(label));
                }
                self.last_phase = phase;
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Tri Dodge starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let backend = match canvas.get_attribute("data-scoreboard").as_deref() {
            Some("local") => Backend::Local(LocalScoreboard::open(LocalStorageStore::default())),
            _ => Backend::Http(HttpScoreboard::new("")),
        };
        let service = Rc::new(backend);

        let sidebar = document.get_element_by_id("leftSidebar");
        let presentation = CanvasPresentation::new(canvas.clone(), sidebar)?;
        let bounds = presentation.fit_to_client();

        let settings = Settings::load();
        if let Some(name) = &settings.username
            && let Some(input) = username_input(&document)
        {
            input.set_value(name);
        }

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, settings.tuning.clone(), bounds);
        log::info!("Session created with seed {seed} on {}x{}", bounds.width, bounds.height);

        let game = Rc::new(RefCell::new(Game::new(session, presentation, settings)));
        set_hidden(&document, "restartBtn", true);
        set_hidden(&document, "usernameError", true);

        setup_buttons(game.clone(), service.clone())?;
        setup_pointer(&canvas, game.clone());
        setup_resize(game.clone());
        setup_username(game.clone(), service.clone());

        spawn_local(refresh_leaderboard(service.clone()));

        game.borrow_mut().loop_armed = true;
        request_animation_frame(game, service);

        log::info!("Tri Dodge running!");
        Ok(())
    }

    fn username_input(document: &Document) -> Option<HtmlInputElement> {
        document
            .get_element_by_id("usernameInput")
            .and_then(|el| el.dyn_into().ok())
    }

    fn on_click(id: &str, mut handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        let document = document().ok_or("no document")?;
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        } else {
            log::warn!("#{id} not found");
        }
        Ok(())
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, service: Rc<Backend>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            on_click("startBtn", move || {
                game.borrow_mut().start();
            })?;
        }

        {
            let game = game.clone();
            on_click("restartBtn", move || {
                let rearm = {
                    let mut g = game.borrow_mut();
                    let rearm = g.restart() && !g.loop_armed;
                    if rearm {
                        g.loop_armed = true;
                    }
                    rearm
                };
                if rearm {
                    request_animation_frame(game.clone(), service.clone());
                }
            })?;
        }

        on_click("pauseBtn", move || {
            game.borrow_mut().session.toggle_pause();
        })
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let x = event.offset_x() as f32;
            let y = event.offset_y() as f32;
            game.borrow_mut()
                .session
                .on_pointer_move(x, y, platform::now_ms());
        });
        let _ =
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let bounds = g.presentation.fit_to_client();
            g.session.resize(bounds);
            log::debug!("Resized to {}x{}", bounds.width, bounds.height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_username(game: Rc<RefCell<Game>>, service: Rc<Backend>) {
        let save = {
            let game = game.clone();
            let service = service.clone();
            move || {
                let Some(document) = document() else {
                    return;
                };
                let Some(input) = username_input(&document) else {
                    return;
                };
                spawn_local(save_username(game.clone(), service.clone(), input.value()));
            }
        };

        {
            let save = save.clone();
            let _ = on_click("saveNameBtn", move || save());
        }

        let Some(input) = document().and_then(|d| username_input(&d)) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                save();
            }
        });
        let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Register a first username, or rename the current one
    async fn save_username(game: Rc<RefCell<Game>>, service: Rc<Backend>, typed: String) {
        let name = typed.trim().to_string();
        let current = game.borrow().settings.username.clone();
        if name.is_empty() || current.as_deref() == Some(name.as_str()) {
            return;
        }

        let accepted = match &current {
            None => match service.register_username(&name).await {
                Ok(registration) => registration.success,
                Err(e) => {
                    log::warn!("Registering {name:?} failed: {e}");
                    false
                }
            },
            Some(old) => {
                // Another player's name is off limits; a case change of our own is fine
                let same_player = canonical_key(old) == canonical_key(&name);
                let taken = match service.check_username(&name).await {
                    Ok(status) => status.taken && !same_player,
                    Err(e) => {
                        log::warn!("Checking {name:?} failed: {e}");
                        true
                    }
                };
                if taken {
                    false
                } else {
                    match service.rename_username(old, &name).await {
                        Ok(rename) => rename.success,
                        Err(e) => {
                            log::warn!("Renaming {old:?} to {name:?} failed: {e}");
                            false
                        }
                    }
                }
            }
        };

        if let Some(document) = document() {
            set_hidden(&document, "usernameError", accepted);
        }
        if !accepted {
            return;
        }

        {
            let mut g = game.borrow_mut();
            if g.settings.set_username(&name) {
                g.settings.save();
                log::info!("Username set to {name:?}");
            }
        }
        refresh_leaderboard(service).await;
    }

    async fn refresh_leaderboard(service: Rc<Backend>) {
        let entries = match service.fetch_leaderboard().await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Leaderboard unavailable: {e}");
                return;
            }
        };

        let Some(document) = document() else {
            return;
        };
        let Some(list) = document.get_element_by_id("leaderboardList") else {
            return;
        };
        list.set_inner_html("");
        for entry in &entries {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(&format!("{}: {}", entry.username, entry.score)));
                let _ = list.append_child(&item);
            }
        }
    }

    /// Submit the finished run, then let the player restart
    async fn settle_game_over(game: Rc<RefCell<Game>>, service: Rc<Backend>, over: GameOver) {
        let (username, timeout_ms) = {
            let g = game.borrow();
            (
                g.settings.username.clone(),
                g.session.tuning().submit_timeout_ms,
            )
        };

        let outcome = report_game_over(
            service.as_ref(),
            username.as_deref(),
            over,
            platform::sleep_ms(timeout_ms),
        )
        .await;
        log::info!("Game over settled: {outcome:?}");

        game.borrow_mut().session.finish_settling();
        refresh_leaderboard(service).await;
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, service: Rc<Backend>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, service);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, service: Rc<Backend>) {
        let (game_over, finished) = {
            let mut g = game.borrow_mut();
            let game_over = g.frame();
            if let Some(document) = document() {
                g.update_hud(&document);
            }
            let finished = g.is_finished();
            if finished {
                g.loop_armed = false;
            }
            (game_over, finished)
        };

        if let Some(over) = game_over {
            spawn_local(settle_game_over(game.clone(), service.clone(), over));
        }

        if finished {
            log::debug!("Final screen drawn; frame loop idle until restart");
            return;
        }
        request_animation_frame(game, service);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tri Dodge (native) starting...");
    log::info!("The playable build is the web version (`trunk serve`); running a headless session");

    let settings = match std::env::args().nth(1) {
        Some(path) => tri_dodge::Settings::load_from_path(std::path::Path::new(&path)),
        None => tri_dodge::Settings::default(),
    };

    let summary = headless::run(&settings, 42, 3_600);
    println!("{summary}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use futures::executor::block_on;
    use futures::future;
    use glam::Vec2;

    use tri_dodge::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, TICKS_PER_SECOND};
    use tri_dodge::presentation::HeadlessPresentation;
    use tri_dodge::scoreboard::{LocalScoreboard, MemoryStore, ScoreboardService};
    use tri_dodge::session::{Session, report_game_over};
    use tri_dodge::sim::{Bounds, Rect};
    use tri_dodge::Settings;

    /// Play up to `max_ticks` with a pointer sweeping the arena, restarting
    /// after each game over; returns a printable summary
    pub fn run(settings: &Settings, seed: u64, max_ticks: u64) -> String {
        let bounds = Bounds::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
        let panel = Rect::new(0.0, 0.0, 160.0, bounds.height);
        let mut presentation = HeadlessPresentation::new(bounds, panel);
        let mut session = Session::new(seed, settings.tuning.clone(), bounds);
        let service = LocalScoreboard::open(MemoryStore::default());
        let username = settings.username.clone().unwrap_or_else(|| "headless".to_string());

        let ms_per_tick = 1000.0 / TICKS_PER_SECOND as f64;
        session.start(&presentation);

        for t in 0..max_ticks {
            let now = t as f64 * ms_per_tick;
            let pointer = sweep(t, bounds);
            session.on_pointer_move(pointer.x, pointer.y, now);

            if let Some(over) = session.frame(&mut presentation) {
                let outcome = block_on(report_game_over(
                    &service,
                    Some(&username),
                    over,
                    future::pending::<()>(),
                ));
                log::info!("Round {} over at tick {}: {outcome:?}", session.rounds(), over.ticks);
                session.finish_settling();
                session.restart(&presentation);
            }
        }

        let board = block_on(service.fetch_leaderboard()).unwrap_or_default();
        let best = board.first().map(|e| e.score).unwrap_or(0);
        format!(
            "{} rounds, {} frames drawn, best score {best} (current {})",
            session.rounds(),
            presentation.frames,
            session.score()
        )
    }

    /// Pointer path: a slow Lissajous sweep over the playable area
    fn sweep(t: u64, bounds: Bounds) -> Vec2 {
        let phase = t as f32 / TICKS_PER_SECOND as f32;
        Vec2::new(
            bounds.width * (0.6 + 0.35 * (phase * 0.9).sin()),
            bounds.height * (0.5 + 0.45 * (phase * 1.3).cos()),
        )
    }
}
