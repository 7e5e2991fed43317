//! Scoring of finished games.

use tracing::instrument;

use super::types::{Decision, MAX_GUESSES};

/// Points for a finished game.
///
/// A loss scores 0. A win scores `7 - guesses_used`, so a first-guess win is
/// worth 6 and a sixth-guess win is worth 1.
///
/// # Panics
///
/// Panics if `guesses_used` is outside `1..=6`. Callers validate user input
/// before scoring, so reaching the panic is a defect.
#[instrument(level = "trace")]
pub fn score(decision: Decision, guesses_used: u8) -> u8 {
    assert!(
        (1..=MAX_GUESSES).contains(&guesses_used),
        "guesses_used must be within 1..={MAX_GUESSES}, got {guesses_used}"
    );
    match decision {
        Decision::Loss => 0,
        Decision::Win => MAX_GUESSES + 1 - guesses_used,
    }
}
