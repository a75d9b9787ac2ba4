//! Pluggable scoreboard storage
//!
//! The scoreboard writes a full snapshot after every mutation; stores decide
//! where it goes. Durability is best effort.

use serde::{Deserialize, Serialize};

use super::LeaderboardEntry;

/// Everything a scoreboard needs to come back after a reload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Registered display names
    #[serde(default)]
    pub usernames: Vec<String>,
    /// Leaderboard, best first
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Where scoreboard snapshots live
pub trait ScoreStore {
    fn load(&self) -> Option<Snapshot>;
    fn save(&mut self, snapshot: &Snapshot);
}

/// Keeps the latest snapshot in memory (reset with the process)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
    saves: usize,
}

impl MemoryStore {
    pub fn with_snapshot(snapshot: Option<Snapshot>) -> Self {
        Self { snapshot, saves: 0 }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of snapshots written
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Option<Snapshot> {
        self.snapshot.clone()
    }

    fn save(&mut self, snapshot: &Snapshot) {
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
    }
}

/// Persists snapshots as JSON in LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key used by default
    pub const STORAGE_KEY: &'static str = "tri_dodge_scoreboard";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::STORAGE_KEY)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Option<Snapshot> {
        let json = Self::storage()?.get_item(&self.key).ok()??;
        match serde_json::from_str::<Snapshot>(&json) {
            Ok(snapshot) => {
                log::info!("Loaded {} leaderboard entries", snapshot.leaderboard.len());
                Some(snapshot)
            }
            Err(e) => {
                log::warn!("Discarding corrupt scoreboard snapshot: {e}");
                None
            }
        }
    }

    fn save(&mut self, snapshot: &Snapshot) {
        if let Some(storage) = Self::storage()
            && let Ok(json) = serde_json::to_string(snapshot)
        {
            let _ = storage.set_item(&self.key, &json);
            log::info!("Scoreboard saved ({} entries)", snapshot.leaderboard.len());
        }
    }
}
