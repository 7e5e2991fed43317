//! Word lists for secret selection and guess validation.

use std::collections::HashSet;
use std::path::Path;

use rand::Rng;
use tracing::{debug, info, instrument};

use super::VocabularyStore;
use crate::config::{ConfigError, WordsConfig};
use crate::wordle::Word;

const BUILTIN_ANSWERS: &str = include_str!("../../data/answers.txt");
const BUILTIN_GUESSES: &str = include_str!("../../data/guesses.txt");

/// Immutable vocabulary: secret candidates plus extra accepted guesses.
///
/// Every answer is also an accepted guess.
#[derive(Debug, Clone)]
pub struct WordList {
    answers: Vec<Word>,
    accepted: HashSet<Word>,
}

impl WordList {
    /// Builds a word list from parsed words.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `answers` is empty.
    #[instrument(skip_all, fields(answers = answers.len(), extra = extra.len()))]
    pub fn from_words(answers: Vec<Word>, extra: Vec<Word>) -> Result<Self, ConfigError> {
        if answers.is_empty() {
            return Err(ConfigError::new("Answer list must contain at least one word"));
        }
        let accepted: HashSet<Word> = answers.iter().chain(extra.iter()).copied().collect();
        debug!(accepted = accepted.len(), "Word list built");
        Ok(Self { answers, accepted })
    }

    /// The lists shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] only if the bundled lists are malformed.
    #[instrument]
    pub fn builtin() -> Result<Self, ConfigError> {
        let answers = parse_list(BUILTIN_ANSWERS, "built-in answers")?;
        let extra = parse_list(BUILTIN_GUESSES, "built-in guesses")?;
        Self::from_words(answers, extra)
    }

    /// Builds a word list from configuration, using the built-in list for any
    /// file that is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file cannot be read or contains an entry
    /// that is not a five-letter word.
    #[instrument(skip(config))]
    pub fn from_config(config: &WordsConfig) -> Result<Self, ConfigError> {
        let answers = match config.answers_path() {
            Some(path) => read_list(path)?,
            None => parse_list(BUILTIN_ANSWERS, "built-in answers")?,
        };
        let extra = match config.guesses_path() {
            Some(path) => read_list(path)?,
            None => parse_list(BUILTIN_GUESSES, "built-in guesses")?,
        };
        let list = Self::from_words(answers, extra)?;
        info!(
            answers = list.answers.len(),
            accepted = list.accepted.len(),
            "Vocabulary loaded"
        );
        Ok(list)
    }

    /// Secret word candidates.
    pub fn answers(&self) -> &[Word] {
        &self.answers
    }
}

impl VocabularyStore for WordList {
    fn is_valid_word(&self, word: &Word) -> bool {
        self.accepted.contains(word)
    }

    fn pick_random_secret(&self) -> Word {
        let index = rand::rng().random_range(0..self.answers.len());
        self.answers[index]
    }
}

/// Reads a newline-separated word file.
#[instrument(skip(path), fields(path = %path.display()))]
fn read_list(path: &Path) -> Result<Vec<Word>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!(
            "Failed to read word list {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_list(&content, &path.display().to_string())
}

/// Parses one word per line, skipping blank lines and `#` comments.
fn parse_list(content: &str, source: &str) -> Result<Vec<Word>, ConfigError> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            Word::parse(line).map_err(|e| {
                ConfigError::new(format!("{}:{}: invalid word '{}': {}", source, number, line, e))
            })
        })
        .collect()
}
