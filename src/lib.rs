//! Strictly Wordle library - a word-guessing game service
//!
//! Players get six attempts to find a secret five-letter word. Each guess is
//! classified letter by letter, finished games are scored, and a leaderboard
//! ranks players by their average score.
//!
//! # Architecture
//!
//! - **Wordle**: pure game core (evaluation, state machine, scoring)
//! - **Store**: persistence traits with in-memory backends and word lists
//! - **Db**: SQLite backend via diesel
//! - **Service**: game lifecycle and leaderboard aggregation
//! - **Server**: axum REST adapter
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strictly_wordle::{GameService, MemoryGameStore, Outcome, WordList};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = GameService::new(
//!     Arc::new(MemoryGameStore::new()),
//!     Arc::new(WordList::builtin()?),
//! );
//! let id = service.create_game("alice")?;
//! let outcome = service.submit_guess("alice", &id, "crane")?;
//! assert!(matches!(outcome.outcome(), Outcome::InProgress | Outcome::Win));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod error;
mod server;
mod service;
mod store;
mod wordle;

// Crate-level exports - Configuration
pub use config::{
    AppConfig, ConfigError, LeaderboardConfig, ServerConfig, StorageConfig, WordsConfig,
};

// Crate-level exports - Errors
pub use error::{ErrorKind, GameError, LeaderboardError};

// Crate-level exports - Game core
pub use wordle::{
    Classification, Decision, Game, GameId, GameIsActive, GameStateMachine, GameSummary,
    GameView, GuessContract, GuessIsAccepted, GuessIsWellFormed, GuessOutcome, GuessRecord,
    GuessTransition, InvariantViolation, LegalGuess, LetterClassification, MAX_GUESSES,
    Outcome, WORD_LENGTH, Word, WordError, assert_invariants, evaluate, score,
};

// Crate-level exports - Storage
pub use db::SqliteStore;
pub use store::{
    Append, GameStore, LeaderboardEntry, LeaderboardStore, MemoryGameStore, MemoryLeaderboard,
    StoreError, VocabularyStore, WordList,
};

// Crate-level exports - Services
pub use service::{
    GameService, InProgressGame, LeaderboardAggregator, RankedEntry, UserStatistics,
};

// Crate-level exports - HTTP transport
pub use server::{ApiError, AppState, CurrentUser, USER_HEADER, create_router};
