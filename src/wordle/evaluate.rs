//! Guess evaluation against a secret word.

use tracing::instrument;

use super::types::{Classification, LetterClassification, WORD_LENGTH, Word};

/// Classifies each letter of `guess` against `secret`.
///
/// Exact matches are resolved first and consume their secret position. Each
/// remaining guess letter, left to right, then claims the leftmost unconsumed
/// occurrence of the same letter in the secret, so a secret letter backs at
/// most one `Present` mark.
#[instrument(level = "trace", skip_all, fields(secret = %secret, guess = %guess))]
pub fn evaluate(secret: &Word, guess: &Word) -> Classification {
    let secret = secret.letters();
    let guess = guess.letters();

    let mut marks = [LetterClassification::Absent; WORD_LENGTH];
    let mut consumed = [false; WORD_LENGTH];

    for i in 0..WORD_LENGTH {
        if guess[i] == secret[i] {
            marks[i] = LetterClassification::Correct;
            consumed[i] = true;
        }
    }

    for (i, letter) in guess.iter().enumerate() {
        if marks[i] == LetterClassification::Correct {
            continue;
        }
        let unclaimed = (0..WORD_LENGTH).find(|&j| !consumed[j] && secret[j] == *letter);
        if let Some(j) = unclaimed {
            consumed[j] = true;
            marks[i] = LetterClassification::Present;
        }
    }

    Classification::new(marks)
}
