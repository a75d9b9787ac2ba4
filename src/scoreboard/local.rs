//! In-process scoreboard service

use std::cell::RefCell;

use super::board::Scoreboard;
use super::error::ScoreboardError;
use super::store::ScoreStore;
use super::{LeaderboardEntry, Registration, Rename, ScoreboardService, UsernameStatus};

/// [`ScoreboardService`] backed by a [`Scoreboard`] living in this process
///
/// Single-threaded: the board sits in a `RefCell` and no borrow is held
/// across an await point.
#[derive(Debug)]
pub struct LocalScoreboard<S: ScoreStore> {
    board: RefCell<Scoreboard<S>>,
}

impl<S: ScoreStore> LocalScoreboard<S> {
    pub fn new(board: Scoreboard<S>) -> Self {
        Self {
            board: RefCell::new(board),
        }
    }

    pub fn open(store: S) -> Self {
        Self::new(Scoreboard::open(store))
    }

    /// Read access to the underlying board
    pub fn with_board<T>(&self, f: impl FnOnce(&Scoreboard<S>) -> T) -> T {
        f(&self.board.borrow())
    }

    pub fn into_inner(self) -> Scoreboard<S> {
        self.board.into_inner()
    }
}

impl<S: ScoreStore> ScoreboardService for LocalScoreboard<S> {
    async fn check_username(&self, name: &str) -> Result<UsernameStatus, ScoreboardError> {
        let taken = self.board.borrow().is_taken(name)?;
        Ok(UsernameStatus { taken })
    }

    async fn register_username(&self, name: &str) -> Result<Registration, ScoreboardError> {
        self.board.borrow_mut().register(name)
    }

    async fn submit_score(&self, username: &str, score: u64) -> Result<(), ScoreboardError> {
        let rank = self.board.borrow_mut().submit(username, score)?;
        match rank {
            Some(rank) => log::info!("Score {score} for {username:?} ranks #{rank}"),
            None => log::info!("Score {score} for {username:?} did not make the board"),
        }
        Ok(())
    }

    async fn rename_username(&self, old: &str, new: &str) -> Result<Rename, ScoreboardError> {
        self.board.borrow_mut().rename(old, new)
    }

    async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ScoreboardError> {
        Ok(self.board.borrow().entries())
    }
}
