//! Errors raised by game and leaderboard backends.

use derive_more::{Display, Error};
use tracing::instrument;

/// A backend could not read or write games or leaderboard entries.
///
/// Services surface it as [`ErrorKind::Internal`](crate::ErrorKind::Internal).
/// `file` and `line` point at the backend call that gave up.
#[derive(Debug, Clone, Display, Error)]
#[display("Storage error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// What the backend was doing and why it failed.
    pub message: String,
    /// Line of the failing backend call.
    pub line: u32,
    /// File of the failing backend call.
    pub file: &'static str,
}

impl StoreError {
    /// Records a backend failure at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// An in-memory table whose lock holder panicked mid-update.
    #[track_caller]
    pub fn poisoned(what: &str) -> Self {
        Self::new(format!("{what} lock poisoned"))
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
