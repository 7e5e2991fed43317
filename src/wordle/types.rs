//! Core domain types for the word-guessing game.

use std::fmt::{self, Write as _};

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize, Serializer};
use strum::{EnumString, IntoStaticStr};
use tracing::instrument;

/// Number of letters in every secret word and guess.
pub const WORD_LENGTH: usize = 5;

/// Number of guesses a new game starts with.
pub const MAX_GUESSES: u8 = 6;

/// Reason a string could not be turned into a [`Word`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum WordError {
    /// Not exactly [`WORD_LENGTH`] characters.
    #[display("expected {WORD_LENGTH} letters, got {length}")]
    WrongLength {
        /// Number of characters found.
        length: usize,
    },
    /// Contains something other than ASCII letters.
    #[display("'{_0}' contains characters other than letters")]
    NotAlphabetic(#[error(not(source))] String),
}

/// A five-letter word, normalized to lowercase ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word([u8; WORD_LENGTH]);

impl Word {
    /// Parses a word, checking length before content.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::WrongLength`] if `raw` is not five characters and
    /// [`WordError::NotAlphabetic`] if any character is not an ASCII letter.
    pub fn parse(raw: &str) -> Result<Self, WordError> {
        let length = raw.chars().count();
        if length != WORD_LENGTH {
            return Err(WordError::WrongLength { length });
        }

        let mut letters = [0u8; WORD_LENGTH];
        for (slot, ch) in letters.iter_mut().zip(raw.chars()) {
            if !ch.is_ascii_alphabetic() {
                return Err(WordError::NotAlphabetic(raw.to_string()));
            }
            *slot = ch.to_ascii_lowercase() as u8;
        }
        Ok(Self(letters))
    }

    /// Returns the letters of the word.
    pub fn letters(&self) -> &[u8; WORD_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &letter in &self.0 {
            f.write_char(char::from(letter))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Opaque unique game identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Generates a fresh random identifier.
    #[instrument]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Verdict for a single letter of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterClassification {
    /// Right letter, right position.
    Correct,
    /// Letter occurs elsewhere in the secret and was not already matched.
    Present,
    /// No unmatched occurrence in the secret.
    Absent,
}

/// Per-position classification of a whole guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Classification([LetterClassification; WORD_LENGTH]);

impl Classification {
    /// Wraps a set of per-position marks.
    pub fn new(marks: [LetterClassification; WORD_LENGTH]) -> Self {
        Self(marks)
    }

    /// Returns the marks in position order.
    pub fn marks(&self) -> &[LetterClassification; WORD_LENGTH] {
        &self.0
    }

    /// True when every position is [`LetterClassification::Correct`].
    pub fn is_solved(&self) -> bool {
        self.0.iter().all(|m| *m == LetterClassification::Correct)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mark in &self.0 {
            let tile = match mark {
                LetterClassification::Correct => '🟩',
                LetterClassification::Present => '🟨',
                LetterClassification::Absent => '⬛',
            };
            f.write_char(tile)?;
        }
        Ok(())
    }
}

/// Lifecycle state of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// Still accepting guesses.
    InProgress,
    /// The secret was guessed.
    Win,
    /// Ran out of guesses.
    Loss,
}

impl Outcome {
    /// True for [`Outcome::Win`] and [`Outcome::Loss`].
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The terminal decision, if any.
    pub fn decision(self) -> Option<Decision> {
        match self {
            Self::InProgress => None,
            Self::Win => Some(Decision::Win),
            Self::Loss => Some(Decision::Loss),
        }
    }

    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Terminal result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The player guessed the secret.
    Win,
    /// The player used every guess without finding the secret.
    Loss,
}

impl From<Decision> for Outcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Win => Self::Win,
            Decision::Loss => Self::Loss,
        }
    }
}

/// One accepted guess and its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct GuessRecord {
    /// Position of the guess in the game, starting at 1.
    guess_number: u8,
    /// The guessed word.
    guess: Word,
    /// Per-letter verdicts against the secret.
    classification: Classification,
}

/// Full state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Game {
    id: GameId,
    username: String,
    secret: Word,
    guesses_remaining: u8,
    outcome: Outcome,
    guesses: Vec<GuessRecord>,
    created_at: NaiveDateTime,
}

impl Game {
    /// Creates a fresh game with the full guess allowance.
    #[instrument(skip_all, fields(game_id = %id, username = %username))]
    pub fn new(id: GameId, username: String, secret: Word, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            username,
            secret,
            guesses_remaining: MAX_GUESSES,
            outcome: Outcome::InProgress,
            guesses: Vec::new(),
            created_at,
        }
    }

    /// Rebuilds a game from persisted parts.
    pub fn restore(
        id: GameId,
        username: String,
        secret: Word,
        guesses_remaining: u8,
        outcome: Outcome,
        guesses: Vec<GuessRecord>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            username,
            secret,
            guesses_remaining,
            outcome,
            guesses,
            created_at,
        }
    }

    /// Number of guesses consumed so far.
    pub fn guesses_used(&self) -> u8 {
        MAX_GUESSES - self.guesses_remaining
    }

    /// Lightweight listing view.
    pub fn summary(&self) -> GameSummary {
        GameSummary::new(
            self.id.clone(),
            self.guesses_remaining,
            self.outcome,
            self.created_at,
        )
    }

    /// Applies an already-validated guess.
    pub(crate) fn apply(&mut self, record: GuessRecord, guesses_remaining: u8, outcome: Outcome) {
        self.guesses.push(record);
        self.guesses_remaining = guesses_remaining;
        self.outcome = outcome;
    }
}

/// Listing row for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct GameSummary {
    game_id: GameId,
    guesses_remaining: u8,
    outcome: Outcome,
    created_at: NaiveDateTime,
}

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, new)]
pub struct GuessOutcome {
    game_id: GameId,
    guesses_remaining: u8,
    outcome: Outcome,
    guesses: Vec<GuessRecord>,
}

/// Read-only view of a game's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameView {
    /// Game still accepting guesses, with its history.
    InProgress {
        /// Game identifier.
        game_id: GameId,
        /// Guesses left.
        guesses_remaining: u8,
        /// Ordered guess history.
        guesses: Vec<GuessRecord>,
    },
    /// Game over; only the decision and the number of guesses are reported.
    Finished {
        /// Game identifier.
        game_id: GameId,
        /// Guesses consumed.
        guesses_used: u8,
        /// Win or loss.
        decision: Decision,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_parse_normalizes_case() {
        let word = Word::parse("CrAnE").expect("valid word");
        assert_eq!(word.to_string(), "crane");
    }

    #[test]
    fn test_word_parse_rejects_length() {
        assert_eq!(
            Word::parse("cranes"),
            Err(WordError::WrongLength { length: 6 })
        );
        assert_eq!(Word::parse(""), Err(WordError::WrongLength { length: 0 }));
    }

    #[test]
    fn test_word_parse_counts_characters_not_bytes() {
        assert!(matches!(
            Word::parse("crâne"),
            Err(WordError::NotAlphabetic(_))
        ));
    }

    #[test]
    fn test_word_parse_rejects_digits() {
        assert!(matches!(
            Word::parse("cr4ne"),
            Err(WordError::NotAlphabetic(_))
        ));
    }

    #[test]
    fn test_outcome_storage_strings() {
        assert_eq!(Outcome::InProgress.as_str(), "in_progress");
        assert_eq!("loss".parse::<Outcome>(), Ok(Outcome::Loss));
        assert!("draw".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_new_game_has_full_allowance() {
        let game = Game::new(
            GameId::from("g1"),
            "alice".to_string(),
            Word::parse("crane").expect("valid word"),
            chrono::Utc::now().naive_utc(),
        );
        assert_eq!(*game.guesses_remaining(), MAX_GUESSES);
        assert_eq!(game.guesses_used(), 0);
        assert_eq!(*game.outcome(), Outcome::InProgress);
        assert!(game.guesses().is_empty());
    }
}
