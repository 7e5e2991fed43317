//! Leaderboard aggregation over submitted game results.

use std::sync::Arc;

use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::LeaderboardError;
use crate::store::{LeaderboardEntry, LeaderboardStore};
use crate::wordle::{Decision, MAX_GUESSES, score};

/// One leaderboard row as presented to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct RankedEntry {
    username: String,
    average_score: f64,
}

impl From<&LeaderboardEntry> for RankedEntry {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            username: entry.username().clone(),
            average_score: entry.average_score(),
        }
    }
}

/// Records finished games and ranks players by average score.
#[derive(Clone)]
pub struct LeaderboardAggregator {
    store: Arc<dyn LeaderboardStore>,
}

impl std::fmt::Debug for LeaderboardAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardAggregator").finish_non_exhaustive()
    }
}

impl LeaderboardAggregator {
    /// Creates an aggregator over `store`.
    #[instrument(skip_all)]
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        info!("Creating LeaderboardAggregator");
        Self { store }
    }

    /// Adds one finished game to the user's running total.
    ///
    /// # Errors
    ///
    /// - [`LeaderboardError::InvalidUsername`] for an empty username
    /// - [`LeaderboardError::InvalidLossGuessCount`] for a loss not on guess 6
    /// - [`LeaderboardError::InvalidGuessCount`] for a win outside guesses 1..=6
    /// - [`LeaderboardError::Store`] on storage failure
    #[instrument(skip(self))]
    pub fn record_result(
        &self,
        username: &str,
        decision: Decision,
        guesses_used: u8,
    ) -> Result<LeaderboardEntry, LeaderboardError> {
        if username.trim().is_empty() {
            warn!("Result rejected: empty username");
            return Err(LeaderboardError::InvalidUsername);
        }
        match decision {
            Decision::Loss if guesses_used != MAX_GUESSES => {
                warn!("Result rejected: loss before the last guess");
                return Err(LeaderboardError::InvalidLossGuessCount(guesses_used));
            }
            Decision::Win if !(1..=MAX_GUESSES).contains(&guesses_used) => {
                warn!("Result rejected: guess count out of range");
                return Err(LeaderboardError::InvalidGuessCount(guesses_used));
            }
            _ => {}
        }

        let points = score(decision, guesses_used);
        let entry = self.store.atomic_increment(username, points)?;
        info!(
            points,
            total = entry.total_score(),
            games = entry.game_count(),
            "Result recorded"
        );
        Ok(entry)
    }

    /// Top `n` players by average score, username ascending on ties.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Store`] on storage failure.
    #[instrument(skip(self))]
    pub fn top_n(&self, n: usize) -> Result<Vec<RankedEntry>, LeaderboardError> {
        let ranked: Vec<RankedEntry> = self
            .store
            .ranked_top(n)?
            .iter()
            .map(RankedEntry::from)
            .collect();
        debug!(count = ranked.len(), "Leaderboard ranked");
        Ok(ranked)
    }

    /// A single user's running totals, if they have any results.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::Store`] on storage failure.
    #[instrument(skip(self))]
    pub fn entry(&self, username: &str) -> Result<Option<LeaderboardEntry>, LeaderboardError> {
        Ok(self.store.entry(username)?)
    }
}
