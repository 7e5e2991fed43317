//! Game lifecycle business logic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::GameError;
use crate::store::{Append, GameStore, StoreError, VocabularyStore};
use crate::wordle::{Game, GameId, GameStateMachine, GameView, GuessOutcome, Outcome};

/// A game the user can still play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct InProgressGame {
    game_id: GameId,
    guesses_remaining: u8,
}

/// Per-user game counts.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct UserStatistics {
    in_progress: u32,
    wins: u32,
    losses: u32,
    total_games: u32,
    win_percentage: f64,
}

impl UserStatistics {
    fn from_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let (mut in_progress, mut wins, mut losses) = (0, 0, 0);
        for outcome in outcomes {
            match outcome {
                Outcome::InProgress => in_progress += 1,
                Outcome::Win => wins += 1,
                Outcome::Loss => losses += 1,
            }
        }
        let total_games = in_progress + wins + losses;
        let win_percentage = if total_games == 0 {
            0.0
        } else {
            f64::from(wins) / f64::from(total_games) * 100.0
        };
        Self {
            in_progress,
            wins,
            losses,
            total_games,
            win_percentage,
        }
    }
}

/// One mutex per game id with a live operation; idle entries are removed.
#[derive(Debug, Default)]
struct GameLocks {
    table: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl GameLocks {
    /// Runs `f` while holding the lock for `id`.
    fn with_lock<T>(&self, id: &GameId, f: impl FnOnce() -> T) -> Result<T, StoreError> {
        let slot = {
            let mut table = self
                .table
                .lock()
                .map_err(|_| StoreError::poisoned("game lock table"))?;
            Arc::clone(table.entry(id.clone()).or_default())
        };

        let result = {
            // The guarded value is `()`, so a poisoned lock carries no broken state.
            let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        let mut table = self
            .table
            .lock()
            .map_err(|_| StoreError::poisoned("game lock table"))?;
        // Holders release their slot only under the table lock, so the last
        // one out sees the table's reference alone.
        drop(slot);
        if table.get(id).is_some_and(|s| Arc::strong_count(s) == 1) {
            table.remove(id);
        }
        Ok(result)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.lock().map(|t| t.len()).unwrap_or_default()
    }
}

/// Service layer for creating, playing and inspecting games.
///
/// Mutations of one game are serialized; different games never contend.
/// Clones share stores and locks.
#[derive(Clone)]
pub struct GameService {
    games: Arc<dyn GameStore>,
    vocabulary: Arc<dyn VocabularyStore>,
    locks: Arc<GameLocks>,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

impl GameService {
    /// Creates a service over the given stores.
    #[instrument(skip_all)]
    pub fn new(games: Arc<dyn GameStore>, vocabulary: Arc<dyn VocabularyStore>) -> Self {
        info!("Creating GameService");
        Self {
            games,
            vocabulary,
            locks: Arc::new(GameLocks::default()),
        }
    }

    /// Starts a new game for `username` with a random secret.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Store`] if the game cannot be persisted.
    #[instrument(skip(self))]
    pub fn create_game(&self, username: &str) -> Result<GameId, GameError> {
        let secret = self.vocabulary.pick_random_secret();
        let id = self.games.create_game(username, secret)?;
        info!(game_id = %id, "New game started");
        Ok(id)
    }

    /// Submits a guess to one of the user's games.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotFound`] if the game does not exist or belongs to
    ///   another user
    /// - [`GameError::GameAlreadyFinished`], [`GameError::InvalidGuessLength`]
    ///   or [`GameError::InvalidVocabularyWord`] if the guess is rejected
    /// - [`GameError::Conflict`] if another process updated the game first
    #[instrument(skip(self), fields(game_id = %id))]
    pub fn submit_guess(
        &self,
        username: &str,
        id: &GameId,
        raw_guess: &str,
    ) -> Result<GuessOutcome, GameError> {
        self.locks.with_lock(id, || {
            let mut game = self.owned_game(username, id)?;
            let transition =
                GameStateMachine::submit_guess(&game, raw_guess, self.vocabulary.as_ref())
                    .inspect_err(|e| warn!(error = %e, "Guess rejected"))?;

            match self
                .games
                .append_guess_and_update(id, *game.guesses_remaining(), &transition)?
            {
                Append::Applied => {
                    GameStateMachine::apply(&mut game, transition);
                    debug!(
                        remaining = game.guesses_remaining(),
                        outcome = ?game.outcome(),
                        "Guess stored"
                    );
                    Ok(GameStateMachine::outcome(&game))
                }
                Append::Conflict => {
                    warn!("Concurrent update detected");
                    Err(GameError::Conflict(id.clone()))
                }
            }
        })?
    }

    /// Returns the progress view of one of the user's games.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the game does not exist or belongs
    /// to another user.
    #[instrument(skip(self), fields(game_id = %id))]
    pub fn get_progress(&self, username: &str, id: &GameId) -> Result<GameView, GameError> {
        let game = self.owned_game(username, id)?;
        Ok(GameStateMachine::progress(&game))
    }

    /// Fetches a game by id for callers that already own it, such as result
    /// reporting after a finishing guess.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the game does not exist or belongs
    /// to another user.
    #[instrument(skip(self), fields(game_id = %id))]
    pub fn game(&self, username: &str, id: &GameId) -> Result<Game, GameError> {
        self.owned_game(username, id)
    }

    /// Lists the user's unfinished games, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Store`] on storage failure.
    #[instrument(skip(self))]
    pub fn list_in_progress(&self, username: &str) -> Result<Vec<InProgressGame>, GameError> {
        let games: Vec<InProgressGame> = self
            .games
            .list_games(username)?
            .into_iter()
            .filter(|summary| *summary.outcome() == Outcome::InProgress)
            .map(|summary| InProgressGame {
                game_id: summary.game_id().clone(),
                guesses_remaining: *summary.guesses_remaining(),
            })
            .collect();
        debug!(count = games.len(), "In-progress games listed");
        Ok(games)
    }

    /// Counts the user's games by outcome.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Store`] on storage failure.
    #[instrument(skip(self))]
    pub fn statistics(&self, username: &str) -> Result<UserStatistics, GameError> {
        let summaries = self.games.list_games(username)?;
        let stats = UserStatistics::from_outcomes(summaries.iter().map(|s| *s.outcome()));
        debug!(
            total = stats.total_games,
            wins = stats.wins,
            losses = stats.losses,
            "Statistics computed"
        );
        Ok(stats)
    }

    fn owned_game(&self, username: &str, id: &GameId) -> Result<Game, GameError> {
        match self.games.load_game(id)? {
            Some(game) if game.username() == username => Ok(game),
            Some(_) => {
                warn!(game_id = %id, "Game belongs to another user");
                Err(GameError::NotFound(id.clone()))
            }
            None => Err(GameError::NotFound(id.clone())),
        }
    }
}
