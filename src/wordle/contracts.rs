//! Contract-based validation for guesses.
//!
//! Preconditions reject a guess before anything is computed; the
//! postcondition checks the computed transition before it is persisted.
//! A precondition failure is a user-facing [`GameError`]; a postcondition
//! failure is a defect and panics.

use derive_more::{Display, Error};
use tracing::{instrument, warn};

use super::machine::GuessTransition;
use super::types::{Game, MAX_GUESSES, Outcome, Word, WordError};
use crate::error::GameError;
use crate::store::VocabularyStore;

// ─────────────────────────────────────────────────────────────
//  Guess Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the game has not reached a terminal outcome and has a
/// guess left.
pub struct GameIsActive;

impl GameIsActive {
    /// Checks the precondition.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn check(game: &Game) -> Result<(), GameError> {
        if game.outcome().is_terminal() || *game.guesses_remaining() == 0 {
            warn!(
                outcome = ?game.outcome(),
                remaining = game.guesses_remaining(),
                "Guess submitted to finished game"
            );
            Err(GameError::GameAlreadyFinished(game.id().clone()))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the guess is exactly five letters.
pub struct GuessIsWellFormed;

impl GuessIsWellFormed {
    /// Checks the precondition and returns the parsed word.
    #[instrument]
    pub fn check(raw: &str) -> Result<Word, GameError> {
        Word::parse(raw).map_err(|err| match err {
            WordError::WrongLength { length } => GameError::InvalidGuessLength { length },
            WordError::NotAlphabetic(word) => GameError::InvalidVocabularyWord(word),
        })
    }
}

/// Precondition: the guess is in the vocabulary, or is the secret itself.
pub struct GuessIsAccepted;

impl GuessIsAccepted {
    /// Checks the precondition.
    #[instrument(skip(game, vocabulary), fields(game_id = %game.id(), guess = %guess))]
    pub fn check<V>(game: &Game, guess: &Word, vocabulary: &V) -> Result<(), GameError>
    where
        V: VocabularyStore + ?Sized,
    {
        if guess == game.secret() || vocabulary.is_valid_word(guess) {
            Ok(())
        } else {
            Err(GameError::InvalidVocabularyWord(guess.to_string()))
        }
    }
}

/// Composite precondition, checked in order: active game, well-formed guess,
/// accepted word.
pub struct LegalGuess;

impl LegalGuess {
    /// Validates all preconditions and returns the parsed guess.
    #[instrument(skip(game, vocabulary), fields(game_id = %game.id()))]
    pub fn check<V>(game: &Game, raw: &str, vocabulary: &V) -> Result<Word, GameError>
    where
        V: VocabularyStore + ?Sized,
    {
        GameIsActive::check(game)?;
        let guess = GuessIsWellFormed::check(raw)?;
        GuessIsAccepted::check(game, &guess, vocabulary)?;
        Ok(guess)
    }
}

// ─────────────────────────────────────────────────────────────
//  Guess Postconditions
// ─────────────────────────────────────────────────────────────

/// Violation of a postcondition.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invariant violation: {}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariants.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Contract for a single guess.
///
/// Postconditions:
/// - The counter drops by exactly one and never goes below zero
/// - The record carries the next sequential guess number
/// - The outcome is `InProgress` iff guesses remain and the guess missed
pub struct GuessContract;

impl GuessContract {
    /// Checks the postconditions of `after` relative to `before`.
    pub fn post(before: &Game, after: &GuessTransition) -> Result<(), InvariantViolation> {
        let mut violations = Vec::new();

        let remaining = *after.guesses_remaining();
        if before.guesses_remaining().checked_sub(1) != Some(remaining) {
            violations.push("guesses remaining decrease by exactly one");
        }

        let number = *after.record().guess_number();
        if usize::from(number) != before.guesses().len() + 1
            || number != MAX_GUESSES.saturating_sub(remaining)
        {
            violations.push("guess numbers are sequential");
        }

        let solved = after.record().classification().is_solved();
        let expected = if solved {
            Outcome::Win
        } else if remaining == 0 {
            Outcome::Loss
        } else {
            Outcome::InProgress
        };
        if *after.outcome() != expected {
            violations.push("outcome matches the guess and remaining count");
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(InvariantViolation::new(format!(
                "Postcondition failed: {}",
                violations.join("; ")
            )))
        }
    }
}

/// Panics if the transition breaks a game invariant.
#[instrument(skip_all, fields(game_id = %before.id()))]
pub fn assert_invariants(before: &Game, after: &GuessTransition) {
    if let Err(violation) = GuessContract::post(before, after) {
        panic!("{violation}");
    }
}
