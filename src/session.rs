//! Session/loop controller
//!
//! Owns the live [`GameState`] and drives it one frame at a time:
//! `Idle -> Running <-> Paused -> Over`, with start/restart resetting
//! everything from any phase. Pointer samples are applied as soon as they
//! arrive, between frames. When a frame ends the run, the host receives a
//! [`GameOver`] and settles the score submission with [`report_game_over`];
//! the session refuses to restart until [`Session::finish_settling`].

use std::future::Future;

use futures::future::{self, Either};
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::presentation::Presentation;
use crate::scoreboard::ScoreboardService;
use crate::sim::{
    Bounds, GamePhase, GameState, Rect, SpawnRequest, TickInput, TickOutcome, on_pointer,
    plan_spawn, tick,
};
use crate::tuning::Tuning;

/// Hand-off produced on the frame that ends a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub score: u64,
    pub ticks: u64,
}

/// How the game-over score submission settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Recorded,
    /// The service answered with an error (logged, not retried)
    Failed(String),
    /// The timeout won the race
    TimedOut,
    /// No username to submit under
    Skipped,
}

/// A single game session
#[derive(Debug)]
pub struct Session {
    state: GameState,
    tuning: Tuning,
    rng: Pcg32,
    bounds: Bounds,
    panel: Rect,
    pointer: Option<Vec2>,
    /// Id handed to the first shape of the next round
    next_id: u32,
    rounds: u32,
    /// Game-over score submission still in flight
    settling: bool,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning, bounds: Bounds) -> Self {
        let tuning = tuning.sanitized();
        Self {
            state: GameState::new(tuning.hit_confirm_frames),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            bounds,
            panel: Rect::EMPTY,
            pointer: None,
            next_id: 1,
            rounds: 0,
            settling: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for scripted setups in tests and tools
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Whether the last game over is still waiting on its score submission
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// The game-over submission settled; shows the final screen and allows restart
    pub fn finish_settling(&mut self) {
        self.settling = false;
    }

    /// Start a fresh round from any phase
    ///
    /// Canvas size and panel are read from `presentation` so the first spawn
    /// already keeps clear of the panel. Returns false (and does nothing)
    /// while a game-over submission is settling.
    pub fn start<P: Presentation>(&mut self, presentation: &P) -> bool {
        if self.settling {
            log::info!("Start ignored: score submission still settling");
            return false;
        }

        self.bounds = presentation.canvas_bounds();
        self.panel = presentation.panel_rect();
        let mut state = GameState::new(self.tuning.hit_confirm_frames);

        let request = SpawnRequest {
            bounds: self.bounds,
            panel: self.panel,
            pointer: self.pointer,
        };
        let plan = plan_spawn(&mut self.rng, &request, &self.tuning, self.next_id);
        self.next_id += plan.shapes.len() as u32;

        state.shapes = plan.shapes;
        state.placement_degraded = plan.degraded;
        state.phase = GamePhase::Running;
        state.normalize_order();

        self.state = state;
        self.rounds += 1;
        log::info!(
            "Round {} started with {} shapes ({} circles)",
            self.rounds,
            self.state.shapes.len(),
            self.state.circles().count()
        );
        true
    }

    /// Same as [`Session::start`]; the old state is discarded entirely
    pub fn restart<P: Presentation>(&mut self, presentation: &P) -> bool {
        log::info!("Restarting (previous score {})", self.state.score);
        self.start(presentation)
    }

    /// Toggle Running <-> Paused; returns whether the phase changed
    pub fn toggle_pause(&mut self) -> bool {
        let next = match self.state.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::Idle | GamePhase::Over => return false,
        };
        self.state.phase = next;
        log::info!("Phase -> {:?}", next);
        true
    }

    /// Apply a pointer sample; returns points scored by it
    ///
    /// The position is always remembered (spawning keeps away from it), but
    /// only scores while running.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> u32 {
        let pointer = Vec2::new(x, y);
        self.pointer = Some(pointer);

        if self.state.phase != GamePhase::Running {
            return 0;
        }

        let scored = on_pointer(&mut self.state.shapes, pointer, now_ms, &self.tuning);
        self.state.score += scored as u64;
        scored
    }

    /// Canvas was resized
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Advance one tick against explicit arena geometry
    pub fn step(&mut self, panel: Rect) -> TickOutcome {
        self.panel = panel;
        let input = TickInput {
            bounds: self.bounds,
            panel,
        };
        tick(&mut self.state, &input, &self.tuning)
    }

    /// One display frame: query the panel, tick if running, render
    ///
    /// Returns `Some` only on the frame that enters `Over`.
    pub fn frame<P: Presentation>(&mut self, presentation: &mut P) -> Option<GameOver> {
        let outcome = self.step(presentation.panel_rect());
        if outcome.game_over {
            self.settling = true;
        }
        self.render(presentation);

        outcome.game_over.then(|| GameOver {
            score: self.state.score,
            ticks: self.state.time_ticks,
        })
    }

    /// Draw the current state; also used while paused or over
    pub fn render<P: Presentation>(&self, presentation: &mut P) {
        presentation.clear_frame();
        for shape in &self.state.shapes {
            presentation.draw_shape(shape);
        }

        match self.state.phase {
            GamePhase::Idle => presentation.draw_overlay_text("Press Start"),
            GamePhase::Paused => presentation.draw_overlay_text("Paused"),
            GamePhase::Over if self.settling => presentation.draw_overlay_text("Saving score..."),
            GamePhase::Over => {
                presentation.draw_overlay_text(&format!("Game Over - {}", self.state.score))
            }
            GamePhase::Running => {}
        }
    }
}

/// Submit a finished run's score, racing it against `timeout`
///
/// Never fails: service errors and timeouts are logged and reported in the
/// outcome so the host can show the game-over screen regardless.
pub async fn report_game_over<S, T>(
    service: &S,
    username: Option<&str>,
    game_over: GameOver,
    timeout: T,
) -> SubmitOutcome
where
    S: ScoreboardService,
    T: Future<Output = ()>,
{
    let Some(username) = username else {
        log::info!("No username set, score {} not submitted", game_over.score);
        return SubmitOutcome::Skipped;
    };

    let submit = service.submit_score(username, game_over.score);
    futures::pin_mut!(submit);
    futures::pin_mut!(timeout);

    match future::select(submit, timeout).await {
        Either::Left((Ok(()), _)) => {
            log::info!("Submitted score {} for {username:?}", game_over.score);
            SubmitOutcome::Recorded
        }
        Either::Left((Err(e), _)) => {
            log::warn!("Score submission failed: {e}");
            SubmitOutcome::Failed(e.to_string())
        }
        Either::Right(((), _)) => {
            log::warn!("Score submission timed out");
            SubmitOutcome::TimedOut
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::HeadlessPresentation;
    use crate::scoreboard::{LocalScoreboard, MemoryStore};
    use crate::sim::Shape;
    use futures::executor::block_on;

    fn session() -> Session {
        Session::new(42, Tuning::default(), Bounds::new(800.0, 600.0))
    }

    fn with_panel() -> HeadlessPresentation {
        HeadlessPresentation::new(Bounds::new(800.0, 600.0), Rect::new(0.0, 0.0, 250.0, 600.0))
    }

    #[test]
    fn test_idle_until_started() {
        let mut s = session();
        let mut p = HeadlessPresentation::default();
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(s.frame(&mut p).is_none());
        assert_eq!(p.overlay.as_deref(), Some("Press Start"));
        assert!(!s.toggle_pause());
    }

    #[test]
    fn test_start_spawns_and_runs() {
        let mut s = session();
        s.start(&HeadlessPresentation::default());
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.state().shapes.len(), 5);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_pause_freezes_positions() {
        let mut s = session();
        let mut p = HeadlessPresentation::default();
        s.start(&p);
        assert!(s.toggle_pause());
        assert_eq!(s.phase(), GamePhase::Paused);

        let before: Vec<Vec2> = s.state().shapes.iter().map(|sh| sh.pos).collect();
        for _ in 0..10 {
            s.frame(&mut p);
        }
        let after: Vec<Vec2> = s.state().shapes.iter().map(|sh| sh.pos).collect();
        assert_eq!(before, after);
        assert_eq!(p.frames, 10);
        assert_eq!(p.overlay.as_deref(), Some("Paused"));

        assert!(s.toggle_pause());
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_pointer_ignored_unless_running() {
        let mut s = session();
        s.start(&HeadlessPresentation::default());
        let target = s.state().circles().next().map(|c| c.pos).unwrap();

        s.toggle_pause();
        assert_eq!(s.on_pointer_move(target.x, target.y, 0.0), 0);
        assert_eq!(s.score(), 0);

        s.toggle_pause();
        assert_eq!(s.on_pointer_move(target.x, target.y, 0.0), 1);
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session();
        s.start(&HeadlessPresentation::default());
        s.state_mut().score = 9;
        s.state_mut().contact.observe(true);
        let first_ids: Vec<u32> = s.state().shapes.iter().map(|sh| sh.id).collect();

        assert!(s.restart(&HeadlessPresentation::default()));
        assert_eq!(s.score(), 0);
        assert_eq!(s.state().contact.streak(), 0);
        assert_eq!(s.phase(), GamePhase::Running);
        assert!(s.state().shapes.iter().all(|sh| !first_ids.contains(&sh.id)));
        assert_eq!(s.rounds(), 2);
    }

    #[test]
    fn test_over_is_terminal_until_restart() {
        let mut s = session();
        let mut p = HeadlessPresentation::default();
        s.start(&p);
        s.state_mut().shapes = vec![
            Shape::circle(100, Vec2::new(400.0, 310.0), Vec2::ZERO, 10.0),
            Shape::triangle(101, Vec2::new(400.0, 300.0), Vec2::ZERO, 30.0),
        ];

        assert!(s.frame(&mut p).is_none());
        let over = s.frame(&mut p).expect("game over");
        assert_eq!(over.ticks, 2);
        assert_eq!(s.phase(), GamePhase::Over);

        assert!(s.is_settling());
        assert_eq!(p.overlay.as_deref(), Some("Saving score..."));
        assert!(!s.restart(&p));
        assert_eq!(s.phase(), GamePhase::Over);

        s.finish_settling();
        assert!(s.frame(&mut p).is_none());
        assert!(!s.toggle_pause());
        assert_eq!(s.on_pointer_move(400.0, 310.0, 5000.0), 0);
        assert_eq!(p.overlay.as_deref(), Some("Game Over - 0"));

        assert!(s.restart(&p));
        assert_eq!(s.phase(), GamePhase::Running);
    }

    #[test]
    fn test_spawn_avoids_last_pointer() {
        let mut s = session();
        s.on_pointer_move(400.0, 300.0, 0.0);
        s.start(&HeadlessPresentation::default());
        // The fallback position (right edge) is also well clear of the center
        for shape in &s.state().shapes {
            assert!(shape.pos.distance(Vec2::new(400.0, 300.0)) >= 250.0);
        }
    }

    #[test]
    fn test_first_start_reads_panel_and_bounds() {
        let p = with_panel();
        for seed in 0..200 {
            let mut s = Session::new(seed, Tuning::default(), Bounds::new(1.0, 1.0));
            s.start(&p);
            assert_eq!(s.bounds(), p.bounds);
            for shape in &s.state().shapes {
                let (min, max) = shape.bounds();
                assert!(
                    !p.panel.intersects(min, max),
                    "seed {seed}: shape {} under panel",
                    shape.id
                );
            }
        }
    }

    #[test]
    fn test_restart_uses_current_panel() {
        let mut s = session();
        s.start(&HeadlessPresentation::default());
        let p = with_panel();
        assert!(s.restart(&p));
        for shape in &s.state().shapes {
            assert!(shape.pos.x - shape.extent > p.panel.right);
        }
    }

    #[test]
    fn test_report_records_score() {
        let service = LocalScoreboard::open(MemoryStore::default());
        let over = GameOver { score: 17, ticks: 300 };

        let outcome = block_on(report_game_over(&service, Some("Lee"), over, future::pending()));
        assert_eq!(outcome, SubmitOutcome::Recorded);
        assert_eq!(service.with_board(|b| b.best_score("lee")), Some(17));
    }

    #[test]
    fn test_report_without_username_skips() {
        let service = LocalScoreboard::open(MemoryStore::default());
        let over = GameOver { score: 3, ticks: 10 };
        let outcome = block_on(report_game_over(&service, None, over, future::pending()));
        assert_eq!(outcome, SubmitOutcome::Skipped);
        assert!(service.with_board(|b| b.is_empty()));
    }

    #[test]
    fn test_report_swallows_errors() {
        let service = LocalScoreboard::open(MemoryStore::default());
        let over = GameOver { score: 3, ticks: 10 };
        let outcome = block_on(report_game_over(&service, Some("   "), over, future::pending()));
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    }
}
