//! Database row models and their conversions into domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::schema;
use crate::store::{LeaderboardEntry, StoreError};
use crate::wordle::{Game, GameId, GameSummary, GuessRecord, Outcome, Word, evaluate};

/// Game row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: String,
    username: String,
    secret_word: String,
    guesses_remaining: i32,
    outcome: String,
    created_at: NaiveDateTime,
}

impl GameRow {
    /// Parses the stored outcome string.
    #[instrument(skip(self), fields(outcome = %self.outcome))]
    pub fn parse_outcome(&self) -> Result<Outcome, StoreError> {
        self.outcome
            .parse()
            .map_err(|_| StoreError::new(format!("Invalid outcome: '{}'", self.outcome)))
    }

    fn parse_remaining(&self) -> Result<u8, StoreError> {
        u8::try_from(self.guesses_remaining).map_err(|_| {
            StoreError::new(format!(
                "Invalid guesses_remaining {} for game {}",
                self.guesses_remaining, self.id
            ))
        })
    }

    /// Listing view of the row.
    pub fn into_summary(self) -> Result<GameSummary, StoreError> {
        let remaining = self.parse_remaining()?;
        let outcome = self.parse_outcome()?;
        Ok(GameSummary::new(
            GameId::from(self.id),
            remaining,
            outcome,
            self.created_at,
        ))
    }

    /// Rebuilds the full game; classifications are recomputed from the secret.
    #[instrument(skip_all, fields(game_id = %self.id, guesses = guesses.len()))]
    pub fn into_game(self, guesses: Vec<GuessRow>) -> Result<Game, StoreError> {
        let remaining = self.parse_remaining()?;
        let outcome = self.parse_outcome()?;
        let secret = parse_word(&self.secret_word)?;

        let records = guesses
            .into_iter()
            .map(|row| {
                let guess = parse_word(&row.word)?;
                let number = u8::try_from(row.guess_number).map_err(|_| {
                    StoreError::new(format!("Invalid guess_number {}", row.guess_number))
                })?;
                Ok(GuessRecord::new(number, guess, evaluate(&secret, &guess)))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(Game::restore(
            GameId::from(self.id),
            self.username,
            secret,
            remaining,
            outcome,
            records,
            self.created_at,
        ))
    }
}

/// Insertable game row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow {
    id: String,
    username: String,
    secret_word: String,
    guesses_remaining: i32,
    outcome: String,
    created_at: NaiveDateTime,
}

/// Guess row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::guesses)]
pub struct GuessRow {
    game_id: String,
    guess_number: i32,
    word: String,
}

/// Insertable guess row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::guesses)]
pub struct NewGuessRow {
    game_id: String,
    guess_number: i32,
    word: String,
}

/// Leaderboard row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::leaderboard_entries)]
pub struct LeaderboardRow {
    username: String,
    total_score: i32,
    game_count: i32,
}

impl TryFrom<LeaderboardRow> for LeaderboardEntry {
    type Error = StoreError;

    fn try_from(row: LeaderboardRow) -> Result<Self, Self::Error> {
        let total = u32::try_from(row.total_score)
            .map_err(|_| StoreError::new(format!("Negative total_score for {}", row.username)))?;
        let count = u32::try_from(row.game_count)
            .map_err(|_| StoreError::new(format!("Negative game_count for {}", row.username)))?;
        Ok(LeaderboardEntry::new(row.username, total, count))
    }
}

fn parse_word(stored: &str) -> Result<Word, StoreError> {
    Word::parse(stored).map_err(|e| StoreError::new(format!("Invalid stored word '{}': {}", stored, e)))
}
