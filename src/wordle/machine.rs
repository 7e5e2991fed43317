//! Per-game state machine.
//!
//! `InProgress` is the only state that accepts guesses; `Win` and `Loss`
//! are terminal. A guess is first turned into a [`GuessTransition`] without
//! touching the game, so a rejected guess cannot leave partial state behind.
//! The caller persists the transition as one unit and then applies it.

use derive_getters::Getters;
use tracing::{debug, info, instrument};

use super::contracts::{LegalGuess, assert_invariants};
use super::evaluate::evaluate;
use super::types::{Game, GameView, GuessOutcome, GuessRecord, Outcome};
use crate::error::GameError;
use crate::store::VocabularyStore;

/// The complete effect of one accepted guess.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GuessTransition {
    /// The record to append.
    record: GuessRecord,
    /// Counter after the guess.
    guesses_remaining: u8,
    /// Outcome after the guess.
    outcome: Outcome,
}

impl GuessTransition {
    #[cfg(test)]
    pub(crate) fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// Stateless driver for game transitions.
pub struct GameStateMachine;

impl GameStateMachine {
    /// Validates `raw_guess` and computes the resulting transition.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameAlreadyFinished`] if the game is over
    /// - [`GameError::InvalidGuessLength`] if the guess is not five letters
    /// - [`GameError::InvalidVocabularyWord`] if the guess is neither an
    ///   accepted word nor the secret
    #[instrument(skip(game, vocabulary), fields(game_id = %game.id(), remaining = game.guesses_remaining()))]
    pub fn submit_guess<V>(
        game: &Game,
        raw_guess: &str,
        vocabulary: &V,
    ) -> Result<GuessTransition, GameError>
    where
        V: VocabularyStore + ?Sized,
    {
        let guess = LegalGuess::check(game, raw_guess, vocabulary)?;

        let guesses_remaining = game.guesses_remaining() - 1;
        let classification = evaluate(game.secret(), &guess);
        let outcome = if guess == *game.secret() {
            Outcome::Win
        } else if guesses_remaining == 0 {
            Outcome::Loss
        } else {
            Outcome::InProgress
        };

        let record = GuessRecord::new(game.guesses_used() + 1, guess, classification);
        debug!(
            guess_number = record.guess_number(),
            classification = %classification,
            ?outcome,
            "Guess evaluated"
        );

        let transition = GuessTransition {
            record,
            guesses_remaining,
            outcome,
        };
        assert_invariants(game, &transition);
        Ok(transition)
    }

    /// Applies a transition produced by [`Self::submit_guess`] for this game.
    #[instrument(skip_all, fields(game_id = %game.id()))]
    pub fn apply(game: &mut Game, transition: GuessTransition) {
        let GuessTransition {
            record,
            guesses_remaining,
            outcome,
        } = transition;
        game.apply(record, guesses_remaining, outcome);
        if outcome.is_terminal() {
            info!(?outcome, guesses_used = game.guesses_used(), "Game finished");
        }
    }

    /// Response for a just-applied guess.
    pub fn outcome(game: &Game) -> GuessOutcome {
        GuessOutcome::new(
            game.id().clone(),
            *game.guesses_remaining(),
            *game.outcome(),
            game.guesses().clone(),
        )
    }

    /// Read-only progress view; finished games report only their result.
    #[instrument(skip_all, fields(game_id = %game.id()))]
    pub fn progress(game: &Game) -> GameView {
        match game.outcome().decision() {
            Some(decision) => GameView::Finished {
                game_id: game.id().clone(),
                guesses_used: game.guesses_used(),
                decision,
            },
            None => GameView::InProgress {
                game_id: game.id().clone(),
                guesses_remaining: *game.guesses_remaining(),
                guesses: game.guesses().clone(),
            },
        }
    }
}
