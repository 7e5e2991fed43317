//! Storage collaborators consumed by the game and leaderboard services.
//!
//! The services only see these traits; the in-memory and SQLite backends
//! are interchangeable behind them.

mod error;
mod memory;
mod vocabulary;

pub use error::StoreError;
pub use memory::{MemoryGameStore, MemoryLeaderboard};
pub use vocabulary::WordList;

use std::cmp::Ordering;

use derive_getters::Getters;
use derive_new::new;
use serde::Serialize;

use crate::wordle::{Game, GameId, GameSummary, GuessTransition, Word};

/// Result of a conditional game update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Append {
    /// The guess was recorded and the game updated.
    Applied,
    /// The game no longer matched the expected state; nothing was written.
    Conflict,
}

/// Persistence for games and their guess history.
pub trait GameStore: Send + Sync {
    /// Persists a new in-progress game and returns its identifier.
    fn create_game(&self, username: &str, secret: Word) -> Result<GameId, StoreError>;

    /// Loads a game with its ordered guess history.
    fn load_game(&self, id: &GameId) -> Result<Option<Game>, StoreError>;

    /// Records `transition` if the game is still in progress with exactly
    /// `expected_remaining` guesses left. The counter, outcome and guess
    /// record are written together or not at all.
    fn append_guess_and_update(
        &self,
        id: &GameId,
        expected_remaining: u8,
        transition: &GuessTransition,
    ) -> Result<Append, StoreError>;

    /// Lists a user's games, oldest first.
    fn list_games(&self, username: &str) -> Result<Vec<GameSummary>, StoreError>;
}

/// Word membership and secret selection.
pub trait VocabularyStore: Send + Sync {
    /// True if `word` is an accepted guess.
    fn is_valid_word(&self, word: &Word) -> bool;

    /// Picks a secret word for a new game.
    fn pick_random_secret(&self) -> Word;
}

/// Running per-user score totals.
pub trait LeaderboardStore: Send + Sync {
    /// Adds `score_delta` to the user's total and one to their game count in
    /// a single step, creating the entry if needed. Returns the updated entry.
    fn atomic_increment(
        &self,
        username: &str,
        score_delta: u8,
    ) -> Result<LeaderboardEntry, StoreError>;

    /// Returns up to `n` entries ordered by [`LeaderboardEntry::rank_cmp`].
    fn ranked_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Looks up a single user's entry.
    fn entry(&self, username: &str) -> Result<Option<LeaderboardEntry>, StoreError>;
}

/// Aggregate score for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct LeaderboardEntry {
    username: String,
    total_score: u32,
    game_count: u32,
}

impl LeaderboardEntry {
    /// Mean score per game; zero for an entry with no games.
    pub fn average_score(&self) -> f64 {
        if self.game_count == 0 {
            0.0
        } else {
            f64::from(self.total_score) / f64::from(self.game_count)
        }
    }

    /// Ranking order: higher average first, then username ascending.
    ///
    /// Averages are compared exactly by cross-multiplying totals and counts.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.total_score) * u64::from(other.game_count);
        let rhs = u64::from(other.total_score) * u64::from(self.game_count);
        rhs.cmp(&lhs).then_with(|| self.username.cmp(&other.username))
    }
}
