//! Username registry and top-50 leaderboard
//!
//! Names are compared by a canonical key (trimmed, lowercased); the display
//! form the player typed is kept next to it. Every mutation is written through
//! to the injected store.

use std::collections::BTreeMap;

use super::error::ScoreboardError;
use super::store::{ScoreStore, Snapshot};
use super::{LeaderboardEntry, Registration, Rename};
use crate::consts::{MAX_LEADERBOARD_ENTRIES, MAX_USERNAME_LEN};

/// Case-folded identity of a username
pub fn canonical_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim and validate a username
pub fn validate_username(name: &str) -> Result<&str, ScoreboardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ScoreboardError::InputRejected("name required".to_string()));
    }
    if trimmed.chars().count() > MAX_USERNAME_LEN {
        return Err(ScoreboardError::InputRejected(format!(
            "name longer than {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// A leaderboard row with its lookup key and arrival order
#[derive(Debug, Clone)]
struct Ranked {
    key: String,
    username: String,
    score: u64,
    /// Ties rank by first arrival
    seq: u64,
}

/// Registry + leaderboard over a pluggable store
#[derive(Debug)]
pub struct Scoreboard<S: ScoreStore> {
    /// canonical key -> display name
    usernames: BTreeMap<String, String>,
    /// Sorted by score descending, then arrival
    entries: Vec<Ranked>,
    next_seq: u64,
    store: S,
}

impl<S: ScoreStore> Scoreboard<S> {
    /// Open a scoreboard, restoring whatever the store holds
    pub fn open(store: S) -> Self {
        let mut board = Self {
            usernames: BTreeMap::new(),
            entries: Vec::new(),
            next_seq: 0,
            store,
        };

        if let Some(snapshot) = board.store.load() {
            for name in &snapshot.usernames {
                if let Ok(name) = validate_username(name) {
                    board.usernames.insert(canonical_key(name), name.to_string());
                }
            }
            for entry in &snapshot.leaderboard {
                if let Ok(name) = validate_username(&entry.username) {
                    board.upsert(name, entry.score);
                }
            }
            board.sort_and_cap();
            log::info!(
                "Restored scoreboard: {} usernames, {} entries",
                board.usernames.len(),
                board.entries.len()
            );
        }

        board
    }

    /// Whether a name is registered or already on the leaderboard
    pub fn is_taken(&self, name: &str) -> Result<bool, ScoreboardError> {
        let key = canonical_key(validate_username(name)?);
        Ok(self.usernames.contains_key(&key) || self.position(&key).is_some())
    }

    /// Claim a username
    pub fn register(&mut self, name: &str) -> Result<Registration, ScoreboardError> {
        let name = validate_username(name)?;
        if self.is_taken(name)? {
            return Ok(Registration::taken());
        }

        self.usernames.insert(canonical_key(name), name.to_string());
        self.persist();
        log::info!("Registered username {name:?}");
        Ok(Registration::ok())
    }

    /// Record a score, keeping the best per username
    ///
    /// Returns the rank achieved (1-indexed) or None if the entry fell off
    /// the capped board.
    pub fn submit(&mut self, username: &str, score: u64) -> Result<Option<usize>, ScoreboardError> {
        let name = validate_username(username)?;
        let key = canonical_key(name);

        self.upsert(name, score);
        self.sort_and_cap();
        self.persist();

        Ok(self.position(&key).map(|i| i + 1))
    }

    /// Rename a player, merging scores when the new name is already on the board
    pub fn rename(&mut self, old: &str, new: &str) -> Result<Rename, ScoreboardError> {
        let old = validate_username(old)?;
        let new = validate_username(new)?;
        let old_key = canonical_key(old);
        let new_key = canonical_key(new);

        match (self.position(&old_key), self.position(&new_key)) {
            (Some(o), Some(n)) if o != n => {
                let merged = self.entries[o].score.max(self.entries[n].score);
                self.entries[n].score = merged;
                self.entries.remove(o);
                log::info!("Merged {old:?} into {new:?} (best {merged})");
            }
            (Some(o), _) => {
                self.entries[o].key = new_key.clone();
                self.entries[o].username = new.to_string();
            }
            (None, _) => {}
        }

        self.usernames.remove(&old_key);
        self.usernames.insert(new_key, new.to_string());

        self.sort_and_cap();
        self.persist();
        Ok(Rename { success: true })
    }

    /// Current leaderboard, best first
    pub fn entries(&self) -> Vec<LeaderboardEntry> {
        self.entries
            .iter()
            .map(|e| LeaderboardEntry {
                username: e.username.clone(),
                score: e.score,
            })
            .collect()
    }

    /// Best score recorded for a username
    pub fn best_score(&self, username: &str) -> Option<u64> {
        self.position(&canonical_key(username))
            .map(|i| self.entries[i].score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serializable copy of the registry and leaderboard
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            usernames: self.usernames.values().cloned().collect(),
            leaderboard: self.entries(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    fn upsert(&mut self, name: &str, score: u64) {
        let key = canonical_key(name);
        match self.position(&key) {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.score = entry.score.max(score);
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.push(Ranked {
                    key,
                    username: name.to_string(),
                    score,
                    seq,
                });
            }
        }
    }

    fn sort_and_cap(&mut self) {
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then(a.seq.cmp(&b.seq)));
        if self.entries.len() > MAX_LEADERBOARD_ENTRIES {
            for evicted in &self.entries[MAX_LEADERBOARD_ENTRIES..] {
                log::debug!("Evicted {:?} ({}) from leaderboard", evicted.username, evicted.score);
            }
            self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        self.store.save(&snapshot);
    }
}
