//! SQLite-backed game and leaderboard stores.

use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::models::{GameRow, GuessRow, LeaderboardRow, NewGameRow, NewGuessRow};
use crate::db::schema;
use crate::store::{Append, GameStore, LeaderboardEntry, LeaderboardStore, StoreError};
use crate::wordle::{Game, GameId, GameSummary, GuessTransition, MAX_GUESSES, Outcome, Word};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Busy timeout applied to every connection so concurrent writers wait on
/// the database lock instead of failing.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Store backed by a SQLite database file.
///
/// Each operation opens its own connection, so clones can be shared across
/// threads freely.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `path` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the path is not valid UTF-8, the database
    /// cannot be opened, or a migration fails.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = path
            .as_ref()
            .to_str()
            .ok_or_else(|| StoreError::new("Database path is not valid UTF-8"))?
            .to_string();

        let store = Self { db_path };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;

        info!(path = %store.db_path, migrations = applied.len(), "SQLite store ready");
        Ok(store)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            BUSY_TIMEOUT_MS
        ))?;
        Ok(conn)
    }
}

// ─────────────────────────────────────────────────────────────
//  Games
// ─────────────────────────────────────────────────────────────

impl GameStore for SqliteStore {
    #[instrument(skip(self, secret))]
    fn create_game(&self, username: &str, secret: Word) -> Result<GameId, StoreError> {
        let mut conn = self.connection()?;
        let id = GameId::generate();

        let row = NewGameRow::new(
            id.as_str().to_string(),
            username.to_string(),
            secret.to_string(),
            i32::from(MAX_GUESSES),
            Outcome::InProgress.as_str().to_string(),
            chrono::Utc::now().naive_utc(),
        );
        diesel::insert_into(schema::games::table)
            .values(&row)
            .execute(&mut conn)?;

        info!(game_id = %id, "Game created");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn load_game(&self, id: &GameId) -> Result<Option<Game>, StoreError> {
        let mut conn = self.connection()?;

        let Some(row) = schema::games::table
            .find(id.as_str())
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?
        else {
            debug!(game_id = %id, "Game not found");
            return Ok(None);
        };

        let guesses = schema::guesses::table
            .filter(schema::guesses::game_id.eq(id.as_str()))
            .order(schema::guesses::guess_number.asc())
            .select(GuessRow::as_select())
            .load(&mut conn)?;

        debug!(game_id = %id, guesses = guesses.len(), "Game loaded");
        row.into_game(guesses).map(Some)
    }

    #[instrument(skip(self, transition), fields(game_id = %id))]
    fn append_guess_and_update(
        &self,
        id: &GameId,
        expected_remaining: u8,
        transition: &GuessTransition,
    ) -> Result<Append, StoreError> {
        use schema::games::dsl as g;

        let mut conn = self.connection()?;
        conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let updated = diesel::update(
                g::games
                    .filter(g::id.eq(id.as_str()))
                    .filter(g::guesses_remaining.eq(i32::from(expected_remaining)))
                    .filter(g::outcome.eq(Outcome::InProgress.as_str())),
            )
            .set((
                g::guesses_remaining.eq(i32::from(*transition.guesses_remaining())),
                g::outcome.eq(transition.outcome().as_str()),
            ))
            .execute(conn)?;

            if updated == 0 {
                warn!("Game changed since it was read");
                return Ok(Append::Conflict);
            }

            let record = transition.record();
            diesel::insert_into(schema::guesses::table)
                .values(&NewGuessRow::new(
                    id.as_str().to_string(),
                    i32::from(*record.guess_number()),
                    record.guess().to_string(),
                ))
                .execute(conn)?;

            debug!(
                guess_number = record.guess_number(),
                remaining = transition.guesses_remaining(),
                "Guess appended"
            );
            Ok(Append::Applied)
        })
    }

    #[instrument(skip(self))]
    fn list_games(&self, username: &str) -> Result<Vec<GameSummary>, StoreError> {
        let mut conn = self.connection()?;

        let rows = schema::games::table
            .filter(schema::games::username.eq(username))
            // rowid follows insertion order.
            .order(sql::<BigInt>("games.rowid").asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;

        debug!(count = rows.len(), "Games listed");
        rows.into_iter().map(GameRow::into_summary).collect()
    }
}

// ─────────────────────────────────────────────────────────────
//  Leaderboard
// ─────────────────────────────────────────────────────────────

impl LeaderboardStore for SqliteStore {
    #[instrument(skip(self))]
    fn atomic_increment(
        &self,
        username: &str,
        score_delta: u8,
    ) -> Result<LeaderboardEntry, StoreError> {
        use schema::leaderboard_entries::dsl as l;

        let mut conn = self.connection()?;
        let delta = i32::from(score_delta);

        let row = diesel::insert_into(l::leaderboard_entries)
            .values((
                l::username.eq(username),
                l::total_score.eq(delta),
                l::game_count.eq(1),
            ))
            .on_conflict(l::username)
            .do_update()
            .set((
                l::total_score.eq(l::total_score + delta),
                l::game_count.eq(l::game_count + 1),
            ))
            .returning(LeaderboardRow::as_returning())
            .get_result(&mut conn)?;

        let entry = LeaderboardEntry::try_from(row)?;
        info!(
            total = entry.total_score(),
            games = entry.game_count(),
            "Leaderboard entry updated"
        );
        Ok(entry)
    }

    #[instrument(skip(self))]
    fn ranked_top(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        use schema::leaderboard_entries::dsl as l;

        let mut conn = self.connection()?;
        let limit = i64::try_from(n).unwrap_or(i64::MAX);

        let rows = l::leaderboard_entries
            .filter(l::game_count.gt(0))
            .order((
                sql::<Double>("CAST(total_score AS REAL) / game_count").desc(),
                l::username.asc(),
            ))
            .limit(limit)
            .select(LeaderboardRow::as_select())
            .load(&mut conn)?;

        debug!(count = rows.len(), "Leaderboard loaded");
        rows.into_iter().map(LeaderboardEntry::try_from).collect()
    }

    #[instrument(skip(self))]
    fn entry(&self, username: &str) -> Result<Option<LeaderboardEntry>, StoreError> {
        let mut conn = self.connection()?;

        schema::leaderboard_entries::table
            .find(username)
            .select(LeaderboardRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(LeaderboardEntry::try_from)
            .transpose()
    }
}
