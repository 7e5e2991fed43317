//! Word-guessing game core: evaluation, state machine and scoring.

mod contracts;
mod evaluate;
mod machine;
mod score;
mod types;

pub use contracts::{
    GameIsActive, GuessContract, GuessIsAccepted, GuessIsWellFormed, InvariantViolation,
    LegalGuess, assert_invariants,
};
pub use evaluate::evaluate;
pub use machine::{GameStateMachine, GuessTransition};
pub use score::score;
pub use types::{
    Classification, Decision, Game, GameId, GameSummary, GameView, GuessOutcome, GuessRecord,
    LetterClassification, MAX_GUESSES, Outcome, WORD_LENGTH, Word, WordError,
};
