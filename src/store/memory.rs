//! In-process stores backed by mutex-guarded maps.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, instrument, warn};

use super::{Append, GameStore, LeaderboardEntry, LeaderboardStore, StoreError};
use crate::wordle::{Game, GameId, GameStateMachine, GameSummary, GuessTransition, Outcome, Word};

/// Games by id, plus ids in the order they were created.
#[derive(Debug, Default)]
struct GameTable {
    games: HashMap<GameId, Game>,
    created: Vec<GameId>,
}

/// Game store kept in memory. Clones share the same games.
#[derive(Debug, Clone, Default)]
pub struct MemoryGameStore {
    table: Arc<Mutex<GameTable>>,
}

impl MemoryGameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, GameTable>, StoreError> {
        self.table.lock().map_err(|_| StoreError::poisoned("game store"))
    }
}

impl GameStore for MemoryGameStore {
    #[instrument(skip(self, secret))]
    fn create_game(&self, username: &str, secret: Word) -> Result<GameId, StoreError> {
        let id = GameId::generate();
        let game = Game::new(
            id.clone(),
            username.to_string(),
            secret,
            chrono::Utc::now().naive_utc(),
        );
        let mut table = self.table()?;
        table.games.insert(id.clone(), game);
        table.created.push(id.clone());
        info!(game_id = %id, "Game created");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn load_game(&self, id: &GameId) -> Result<Option<Game>, StoreError> {
        let game = self.table()?.games.get(id).cloned();
        if game.is_none() {
            debug!(game_id = %id, "Game not found");
        }
        Ok(game)
    }

    #[instrument(skip(self, transition), fields(game_id = %id))]
    fn append_guess_and_update(
        &self,
        id: &GameId,
        expected_remaining: u8,
        transition: &GuessTransition,
    ) -> Result<Append, StoreError> {
        let mut table = self.table()?;
        let Some(game) = table.games.get_mut(id) else {
            warn!("Append to unknown game");
            return Ok(Append::Conflict);
        };

        if *game.outcome() != Outcome::InProgress || *game.guesses_remaining() != expected_remaining
        {
            warn!(
                actual_remaining = game.guesses_remaining(),
                outcome = ?game.outcome(),
                "Game changed since it was read"
            );
            return Ok(Append::Conflict);
        }

        GameStateMachine::apply(game, transition.clone());
        debug!(remaining = game.guesses_remaining(), "Guess appended");
        Ok(Append::Applied)
    }

    #[instrument(skip(self))]
    fn list_games(&self, username: &str) -> Result<Vec<GameSummary>, StoreError> {
        let table = self.table()?;
        let summaries: Vec<GameSummary> = table
            .created
            .iter()
            .filter_map(|id| table.games.get(id))
            .filter(|game| game.username() == username)
            .map(Game::summary)
            .collect();
        debug!(count = summaries.len(), "Games listed");
        Ok(summaries)
    }
}

/// Leaderboard kept in memory. Clones share the same totals.
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaderboard {
    entries: Arc<Mutex<HashMap<String, LeaderboardEntry>>>,
}

impl MemoryLeaderboard {
    /// Creates an empty leaderboard.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory leaderboard");
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, LeaderboardEntry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::poisoned("leaderboard"))
    }
}

impl LeaderboardStore for MemoryLeaderboard {
    #[instrument(skip(self))]
    fn atomic_increment(
        &self,
        username: &str,
        score_delta: u8,
    ) -> Result<LeaderboardEntry, StoreError> {
        let mut entries = self.entries()?;
        let current = entries
            .get(username)
            .cloned()
            .unwrap_or_else(|| LeaderboardEntry::new(username.to_string(), 0, 0));
        let updated = LeaderboardEntry::new(
            username.to_string(),
            current.total_score() + u32::from(score_delta),
            current.game_count() + 1,
        );
        entries.insert(username.to_string(), updated.clone());
        Ok(updated)
    }

    #[instrument(skip(self))]
    fn ranked_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut ranked: Vec<LeaderboardEntry> = self.entries()?.values().cloned().collect();
        ranked.sort_by(LeaderboardEntry::rank_cmp);
        ranked.truncate(n);
        Ok(ranked)
    }

    #[instrument(skip(self))]
    fn entry(&self, username: &str) -> Result<Option<LeaderboardEntry>, StoreError> {
        Ok(self.entries()?.get(username).cloned())
    }
}
