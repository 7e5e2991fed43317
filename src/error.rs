//! Error taxonomy for game and leaderboard operations.
//!
//! Every error reports an [`ErrorKind`] so transports can decide how to
//! present it without matching on individual variants.

use derive_more::{Display, From};

use crate::store::StoreError;
use crate::wordle::GameId;

/// Broad class of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Bad user input; nothing was mutated and the caller can correct it.
    #[display("validation")]
    Validation,
    /// The target is in a state that forbids the operation, or a concurrent
    /// update won the race. Re-fetch before retrying.
    #[display("state conflict")]
    StateConflict,
    /// The referenced entity does not exist for this caller.
    #[display("not found")]
    NotFound,
    /// Storage backend failure.
    #[display("internal")]
    Internal,
}

/// Errors from creating, playing or inspecting a game.
#[derive(Debug, Clone, Display, From)]
pub enum GameError {
    /// The guess is not exactly five letters long.
    #[display("Word length should be 5, got {length}")]
    InvalidGuessLength {
        /// Number of characters submitted.
        length: usize,
    },

    /// The guess is not an accepted word and does not match the secret.
    #[display("Not a valid guess: {_0}")]
    InvalidVocabularyWord(String),

    /// The game already reached a terminal outcome.
    #[display("Game {_0} is already finished")]
    GameAlreadyFinished(GameId),

    /// No game with this identifier for the caller.
    #[display("No game with identifier {_0} for your username")]
    NotFound(GameId),

    /// Another guess on the same game was applied first.
    #[display("Game {_0} was updated concurrently; re-fetch and retry")]
    Conflict(GameId),

    /// Storage failure.
    #[display("{_0}")]
    #[from]
    Store(StoreError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl GameError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidGuessLength { .. } | Self::InvalidVocabularyWord(_) => {
                ErrorKind::Validation
            }
            Self::GameAlreadyFinished(_) | Self::Conflict(_) => ErrorKind::StateConflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Errors from submitting results or querying the leaderboard.
#[derive(Debug, Clone, Display, From)]
pub enum LeaderboardError {
    /// A loss was reported with a guess count other than six.
    #[display("Loss always requires 6 guesses, got {_0}")]
    InvalidLossGuessCount(u8),

    /// A win was reported with a guess count outside 1..=6.
    #[display("Guess number must be between 1 and 6 for a win, got {_0}")]
    InvalidGuessCount(u8),

    /// The username is empty.
    #[display("Username must not be empty")]
    InvalidUsername,

    /// Storage failure.
    #[display("{_0}")]
    #[from]
    Store(StoreError),
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl LeaderboardError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLossGuessCount(_) | Self::InvalidGuessCount(_) | Self::InvalidUsername => {
                ErrorKind::Validation
            }
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}
