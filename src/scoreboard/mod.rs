//! Scoreboard service
//!
//! Username registry plus a top-50 leaderboard. The game talks to it through
//! [`ScoreboardService`], an async request/response interface; it can be
//! backed by the in-process [`LocalScoreboard`] or, in the browser, by the
//! HTTP API (`HttpScoreboard`).

pub mod board;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod http;
pub mod local;
pub mod store;

pub use board::{Scoreboard, canonical_key, validate_username};
pub use error::ScoreboardError;
#[cfg(target_arch = "wasm32")]
pub use http::HttpScoreboard;
pub use local::LocalScoreboard;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::{MemoryStore, ScoreStore, Snapshot};

use serde::{Deserialize, Serialize};

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
}

/// Answer to a username availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameStatus {
    pub taken: bool,
}

/// Why a registration was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectReason {
    Taken,
}

/// Answer to a registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl Registration {
    pub fn ok() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    pub fn taken() -> Self {
        Self {
            success: false,
            reason: Some(RejectReason::Taken),
        }
    }
}

/// Answer to a rename request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub success: bool,
}

/// Request/response interface the game uses to reach the scoreboard
///
/// Futures are not required to be `Send`: the browser build is single-threaded.
#[allow(async_fn_in_trait)]
pub trait ScoreboardService {
    async fn check_username(&self, name: &str) -> Result<UsernameStatus, ScoreboardError>;

    async fn register_username(&self, name: &str) -> Result<Registration, ScoreboardError>;

    /// Idempotent: the service keeps the best score per username
    async fn submit_score(&self, username: &str, score: u64) -> Result<(), ScoreboardError>;

    /// Scores merge (keeping the max) if `new` already has an entry
    async fn rename_username(&self, old: &str, new: &str) -> Result<Rename, ScoreboardError>;

    /// At most 50 entries, best first
    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ScoreboardError>;
}
