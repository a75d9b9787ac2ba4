//! End-to-end session and scoreboard scenarios

use futures::executor::block_on;
use futures::future;
use glam::Vec2;

use tri_dodge::presentation::HeadlessPresentation;
use tri_dodge::scoreboard::{
    LeaderboardEntry, LocalScoreboard, MemoryStore, Registration, RejectReason, Rename,
    Scoreboard, ScoreboardError, ScoreboardService, UsernameStatus,
};
use tri_dodge::session::report_game_over;
use tri_dodge::sim::{Bounds, GamePhase, Rect, Shape};
use tri_dodge::{GameOver, Session, SubmitOutcome, Tuning};

fn running_session() -> Session {
    let mut session = Session::new(7, Tuning::default(), Bounds::new(800.0, 600.0));
    session.start(&HeadlessPresentation::default());
    session
}

/// Never answers
struct StalledService;

impl ScoreboardService for StalledService {
    async fn check_username(&self, _name: &str) -> Result<UsernameStatus, ScoreboardError> {
        future::pending().await
    }

    async fn register_username(&self, _name: &str) -> Result<Registration, ScoreboardError> {
        future::pending().await
    }

    async fn submit_score(&self, _username: &str, _score: u64) -> Result<(), ScoreboardError> {
        future::pending().await
    }

    async fn rename_username(&self, _old: &str, _new: &str) -> Result<Rename, ScoreboardError> {
        future::pending().await
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ScoreboardError> {
        future::pending().await
    }
}

/// Always fails at the transport
struct OfflineService;

impl OfflineService {
    fn offline<T>() -> Result<T, ScoreboardError> {
        Err(ScoreboardError::NetworkUnavailable("offline".to_string()))
    }
}

impl ScoreboardService for OfflineService {
    async fn check_username(&self, _name: &str) -> Result<UsernameStatus, ScoreboardError> {
        Self::offline()
    }

    async fn register_username(&self, _name: &str) -> Result<Registration, ScoreboardError> {
        Self::offline()
    }

    async fn submit_score(&self, _username: &str, _score: u64) -> Result<(), ScoreboardError> {
        Self::offline()
    }

    async fn rename_username(&self, _old: &str, _new: &str) -> Result<Rename, ScoreboardError> {
        Self::offline()
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ScoreboardError> {
        Self::offline()
    }
}

#[test]
fn circle_driven_into_triangle_ends_round_and_submits_once() {
    let mut session = running_session();
    let mut presentation = HeadlessPresentation::default();
    session.state_mut().shapes = vec![
        Shape::circle(1, Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 30.0),
        Shape::triangle(2, Vec2::new(140.0, 100.0), Vec2::ZERO, 30.0),
    ];

    // Hover from the left: scores and sends the circle toward the triangle
    assert_eq!(session.on_pointer_move(60.0, 100.0, 1000.0), 1);

    let mut game_over = None;
    for _ in 0..Tuning::default().hit_confirm_frames {
        game_over = session.frame(&mut presentation);
    }
    let over = game_over.expect("round should end after confirmed contact");
    assert_eq!(session.phase(), GamePhase::Over);
    assert_eq!(over.score, 1);

    let service = LocalScoreboard::open(MemoryStore::default());
    let outcome = block_on(report_game_over(&service, Some("Ava"), over, future::pending()));
    assert_eq!(outcome, SubmitOutcome::Recorded);

    let board = service.into_inner();
    assert_eq!(board.store().saves(), 1);
    assert_eq!(
        board.entries(),
        vec![LeaderboardEntry {
            username: "Ava".to_string(),
            score: 1
        }]
    );
}

#[test]
fn hover_scores_once_within_cooldown() {
    let mut session = running_session();
    session.state_mut().shapes = vec![Shape::circle(1, Vec2::new(60.0, 60.0), Vec2::ZERO, 30.0)];

    assert_eq!(session.on_pointer_move(300.0, 300.0, 900.0), 0);
    assert_eq!(session.on_pointer_move(50.0, 50.0, 1000.0), 1);
    assert_eq!(session.on_pointer_move(50.0, 50.0, 1050.0), 0);
    assert_eq!(session.score(), 1);

    // Circle flees away from the pointer (down-right)
    let vel = session.state().shapes[0].vel;
    assert!(vel.x > 0.0 && vel.y > 0.0);
}

#[test]
fn duplicate_registration_is_rejected_case_insensitively() {
    let service = LocalScoreboard::open(MemoryStore::default());

    let first = block_on(service.register_username("Alice")).unwrap();
    assert!(first.success);

    let second = block_on(service.register_username("Alice")).unwrap();
    assert_eq!(second, Registration::taken());
    assert_eq!(second.reason, Some(RejectReason::Taken));

    let status = block_on(service.check_username("alice")).unwrap();
    assert!(status.taken);
}

#[test]
fn full_leaderboard_evicts_lowest_entry() {
    let service = LocalScoreboard::open(MemoryStore::default());
    for i in 0..50u64 {
        block_on(service.submit_score(&format!("Player{i:02}"), 100 + i)).unwrap();
    }
    assert_eq!(block_on(service.fetch_leaderboard()).unwrap().len(), 50);

    block_on(service.submit_score("NewPlayer", 999)).unwrap();

    let board = block_on(service.fetch_leaderboard()).unwrap();
    assert_eq!(board.len(), 50);
    assert_eq!(board[0].username, "NewPlayer");
    assert_eq!(board[0].score, 999);
    assert!(board.iter().all(|e| e.username != "Player00"));
    assert!(board.iter().any(|e| e.username == "Player01"));
}

#[test]
fn rename_merges_keeping_best_score() {
    let service = LocalScoreboard::open(MemoryStore::default());
    block_on(service.submit_score("Old", 40)).unwrap();
    block_on(service.submit_score("New", 25)).unwrap();

    let rename = block_on(service.rename_username("Old", "New")).unwrap();
    assert!(rename.success);

    let board = block_on(service.fetch_leaderboard()).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].score, 40);
    assert!(!block_on(service.check_username("old")).unwrap().taken);
}

#[test]
fn scoreboard_survives_reload_from_snapshot() {
    let service = LocalScoreboard::open(MemoryStore::default());
    block_on(service.register_username("Rin")).unwrap();
    block_on(service.submit_score("Rin", 12)).unwrap();
    block_on(service.submit_score("Sol", 30)).unwrap();

    let before = service.into_inner();
    let snapshot = before.store().snapshot().cloned();
    assert!(snapshot.is_some());

    let reloaded = Scoreboard::open(MemoryStore::with_snapshot(snapshot));
    assert_eq!(reloaded.entries(), before.entries());
    assert!(reloaded.is_taken("RIN").unwrap());
}

#[test]
fn pause_freezes_simulation_but_keeps_rendering() {
    let mut session = running_session();
    let mut presentation = HeadlessPresentation::default();
    session.frame(&mut presentation);

    assert!(session.toggle_pause());
    let frozen: Vec<Vec2> = session.state().shapes.iter().map(|s| s.pos).collect();
    let ticks = session.state().time_ticks;

    for _ in 0..30 {
        assert!(session.frame(&mut presentation).is_none());
    }
    let after: Vec<Vec2> = session.state().shapes.iter().map(|s| s.pos).collect();
    assert_eq!(frozen, after);
    assert_eq!(session.state().time_ticks, ticks);
    assert_eq!(presentation.frames, 31);

    assert!(session.toggle_pause());
    session.frame(&mut presentation);
    assert_eq!(session.state().time_ticks, ticks + 1);
}

#[test]
fn stalled_submission_times_out() {
    let over = GameOver { score: 5, ticks: 120 };
    let outcome = block_on(report_game_over(
        &StalledService,
        Some("Kai"),
        over,
        future::ready(()),
    ));
    assert_eq!(outcome, SubmitOutcome::TimedOut);
}

#[test]
fn offline_submission_is_swallowed() {
    let over = GameOver { score: 5, ticks: 120 };
    let outcome = block_on(report_game_over(
        &OfflineService,
        Some("Kai"),
        over,
        future::pending(),
    ));
    assert!(matches!(outcome, SubmitOutcome::Failed(message) if message.contains("offline")));
}

#[test]
fn restart_after_game_over_starts_clean() {
    let mut session = running_session();
    let mut presentation = HeadlessPresentation::default();
    session.state_mut().shapes = vec![
        Shape::circle(1, Vec2::new(400.0, 310.0), Vec2::ZERO, 10.0),
        Shape::triangle(2, Vec2::new(400.0, 300.0), Vec2::ZERO, 30.0),
    ];
    session.state_mut().score = 12;
    while session.frame(&mut presentation).is_none() {}
    assert_eq!(session.phase(), GamePhase::Over);

    // Blocked until the submission settles
    assert!(!session.restart(&presentation));
    assert_eq!(session.score(), 12);

    session.finish_settling();
    assert!(session.restart(&presentation));
    assert_eq!(session.phase(), GamePhase::Running);
    assert_eq!(session.score(), 0);
    assert_eq!(session.state().time_ticks, 0);
    assert_eq!(session.state().shapes.len(), Tuning::default().shape_count);
}

#[test]
fn panel_overlap_never_outlasts_one_tick() {
    let bounds = Bounds::new(800.0, 600.0);
    let panel = Rect::new(0.0, 0.0, 250.0, bounds.height);

    for seed in 0..40 {
        let mut presentation = HeadlessPresentation::new(bounds, panel);
        let mut session = Session::new(seed, Tuning::default(), bounds);
        // First start, before any frame has run
        assert!(session.start(&presentation));

        let mut streaks = vec![0u32; session.state().shapes.len()];
        for shape in &session.state().shapes {
            let (min, max) = shape.bounds();
            assert!(
                !panel.intersects(min, max),
                "seed {seed}: shape {} spawned under the panel",
                shape.id
            );
        }

        for _ in 0..600 {
            session.frame(&mut presentation);
            if session.phase() != GamePhase::Running {
                break;
            }
            for (streak, shape) in streaks.iter_mut().zip(&session.state().shapes) {
                let (min, max) = shape.bounds();
                *streak = if panel.intersects(min, max) { *streak + 1 } else { 0 };
                assert!(
                    *streak < 2,
                    "seed {seed}: shape {} overlapped the panel two ticks running",
                    shape.id
                );
            }
        }
    }
}
