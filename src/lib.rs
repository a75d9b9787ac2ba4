//! Tri Dodge - hover the circles, never let them touch a triangle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, motion, collisions, spawning)
//! - `session`: Game loop controller and game-over hand-off
//! - `presentation`: Drawing/DOM query interface the session renders through
//! - `scoreboard`: Username registry and top-50 leaderboard service
//! - `platform`: Browser glue (canvas, timers, clock)
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod presentation;
pub mod scoreboard;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use scoreboard::{
    LeaderboardEntry, LocalScoreboard, Scoreboard, ScoreboardError, ScoreboardService,
};
pub use session::{GameOver, Session, SubmitOutcome};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Display refresh the tick cadence is tuned for
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Leaderboard cap
    pub const MAX_LEADERBOARD_ENTRIES: usize = 50;
    /// Longest accepted username (characters, after trimming)
    pub const MAX_USERNAME_LEN: usize = 32;

    /// Gap left between a shape pushed out of the panel and the panel edge
    pub const PANEL_CLEARANCE: f32 = 1.0;

    /// Default canvas size used by the headless runner
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
}

/// Unit vector pointing from `from` to `to`, or `fallback` when they coincide
#[inline]
pub fn direction_or(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    let d = to - from;
    if d.length_squared() > f32::EPSILON {
        d.normalize()
    } else {
        fallback
    }
}

/// Clamp `value` into `[lo, hi]`, centering when the range is inverted
#[inline]
pub fn clamp_or_center(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        value.clamp(lo, hi)
    }
}
