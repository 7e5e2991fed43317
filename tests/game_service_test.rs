//! Tests for the game service over in-memory stores.

use std::sync::Arc;

use strictly_wordle::{
    Decision, ErrorKind, GameError, GameId, GameService, GameView, LetterClassification,
    MemoryGameStore, Outcome, VocabularyStore, Word, WordList,
};

fn word(s: &str) -> Word {
    Word::parse(s).expect("valid test word")
}

/// Service whose only possible secret is `secret`.
fn service_with_secret(secret: &str) -> GameService {
    let vocabulary = WordList::from_words(
        vec![word(secret)],
        vec![word("trace"), word("slate"), word("adieu"), word("north")],
    )
    .expect("Failed to build word list");
    GameService::new(Arc::new(MemoryGameStore::new()), Arc::new(vocabulary))
}

/// Vocabulary that never lists the secret as an accepted guess.
struct SecretNotListed {
    secret: Word,
    accepted: Vec<Word>,
}

impl VocabularyStore for SecretNotListed {
    fn is_valid_word(&self, word: &Word) -> bool {
        self.accepted.contains(word)
    }

    fn pick_random_secret(&self) -> Word {
        self.secret
    }
}

#[test]
fn test_new_game_is_in_progress() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    match service.get_progress("alice", &id).expect("Progress failed") {
        GameView::InProgress {
            game_id,
            guesses_remaining,
            guesses,
        } => {
            assert_eq!(game_id, id);
            assert_eq!(guesses_remaining, 6);
            assert!(guesses.is_empty());
        }
        other => panic!("Expected in-progress view, got {:?}", other),
    }
}

#[test]
fn test_guess_then_win() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    let first = service
        .submit_guess("alice", &id, "trace")
        .expect("First guess failed");
    assert_eq!(*first.outcome(), Outcome::InProgress);
    assert_eq!(*first.guesses_remaining(), 5);
    assert_eq!(
        first.guesses()[0].classification().marks(),
        &[
            LetterClassification::Absent,
            LetterClassification::Correct,
            LetterClassification::Correct,
            LetterClassification::Present,
            LetterClassification::Correct,
        ]
    );

    let second = service
        .submit_guess("alice", &id, "crane")
        .expect("Winning guess failed");
    assert_eq!(*second.outcome(), Outcome::Win);
    assert_eq!(*second.guesses_remaining(), 4);
    assert_eq!(second.guesses().len(), 2);
    assert_eq!(*second.guesses()[1].guess_number(), 2);
    assert!(second.guesses()[1].classification().is_solved());

    match service.get_progress("alice", &id).expect("Progress failed") {
        GameView::Finished {
            guesses_used,
            decision,
            ..
        } => {
            assert_eq!(guesses_used, 2);
            assert_eq!(decision, Decision::Win);
        }
        other => panic!("Expected finished view, got {:?}", other),
    }
}

#[test]
fn test_six_misses_lose_and_further_guesses_rejected() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    for attempt in 1..=6u8 {
        let outcome = service
            .submit_guess("alice", &id, "slate")
            .expect("Guess failed");
        assert_eq!(*outcome.guesses_remaining(), 6 - attempt);
        let expected = if attempt == 6 {
            Outcome::Loss
        } else {
            Outcome::InProgress
        };
        assert_eq!(*outcome.outcome(), expected);
    }

    let err = service
        .submit_guess("alice", &id, "crane")
        .expect_err("Guess on finished game should fail");
    assert!(matches!(err, GameError::GameAlreadyFinished(_)));
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    match service.get_progress("alice", &id).expect("Progress failed") {
        GameView::Finished {
            guesses_used,
            decision,
            ..
        } => {
            assert_eq!(guesses_used, 6);
            assert_eq!(decision, Decision::Loss);
        }
        other => panic!("Expected finished view, got {:?}", other),
    }
}

#[test]
fn test_wrong_length_leaves_game_untouched() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    let err = service
        .submit_guess("alice", &id, "cran")
        .expect_err("Short guess should fail");
    assert!(matches!(err, GameError::InvalidGuessLength { length: 4 }));
    assert_eq!(err.kind(), ErrorKind::Validation);

    match service.get_progress("alice", &id).expect("Progress failed") {
        GameView::InProgress {
            guesses_remaining,
            guesses,
            ..
        } => {
            assert_eq!(guesses_remaining, 6);
            assert!(guesses.is_empty());
        }
        other => panic!("Expected in-progress view, got {:?}", other),
    }
}

#[test]
fn test_unknown_word_rejected() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    let err = service
        .submit_guess("alice", &id, "zzzzz")
        .expect_err("Unknown word should fail");
    assert!(matches!(err, GameError::InvalidVocabularyWord(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_secret_accepted_even_when_not_listed() {
    let vocabulary = SecretNotListed {
        secret: word("crane"),
        accepted: vec![word("trace")],
    };
    let service = GameService::new(Arc::new(MemoryGameStore::new()), Arc::new(vocabulary));
    let id = service.create_game("alice").expect("Create failed");

    let outcome = service
        .submit_guess("alice", &id, "crane")
        .expect("Secret should always be accepted");
    assert_eq!(*outcome.outcome(), Outcome::Win);
}

#[test]
fn test_guesses_are_case_insensitive() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    let outcome = service
        .submit_guess("alice", &id, "CRANE")
        .expect("Upper-case guess failed");
    assert_eq!(*outcome.outcome(), Outcome::Win);
}

#[test]
fn test_other_users_game_is_not_found() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    let err = service
        .get_progress("bob", &id)
        .expect_err("Bob should not see Alice's game");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service
        .submit_guess("bob", &id, "crane")
        .expect_err("Bob should not play Alice's game");
    assert!(matches!(err, GameError::NotFound(_)));
}

#[test]
fn test_unknown_game_is_not_found() {
    let service = service_with_secret("crane");
    let err = service
        .get_progress("alice", &GameId::from("no-such-game"))
        .expect_err("Unknown id should fail");
    assert!(matches!(err, GameError::NotFound(_)));
}

#[test]
fn test_in_progress_list_and_statistics() {
    let service = service_with_secret("crane");
    let won = service.create_game("alice").expect("Create failed");
    let open = service.create_game("alice").expect("Create failed");
    service.create_game("bob").expect("Create failed");

    service
        .submit_guess("alice", &won, "crane")
        .expect("Winning guess failed");
    service
        .submit_guess("alice", &open, "trace")
        .expect("Guess failed");

    let in_progress = service
        .list_in_progress("alice")
        .expect("Listing failed");
    assert_eq!(in_progress.len(), 1);
    assert_eq!(*in_progress[0].game_id(), open);
    assert_eq!(*in_progress[0].guesses_remaining(), 5);

    let stats = service.statistics("alice").expect("Statistics failed");
    assert_eq!(*stats.in_progress(), 1);
    assert_eq!(*stats.wins(), 1);
    assert_eq!(*stats.losses(), 0);
    assert_eq!(*stats.total_games(), 2);
    assert!((stats.win_percentage() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_concurrent_guesses_on_one_game_stay_consistent() {
    let service = service_with_secret("crane");
    let id = service.create_game("alice").expect("Create failed");

    let results: Vec<Result<u8, GameError>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (service, id) = (&service, &id);
                s.spawn(move || {
                    service
                        .submit_guess("alice", id, "slate")
                        .map(|outcome| *outcome.guesses_remaining())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("Worker panicked"))
            .collect()
    });

    let mut remaining: Vec<u8> = results.iter().filter_map(|r| r.as_ref().ok()).copied().collect();
    remaining.sort_unstable();
    assert_eq!(remaining, vec![0, 1, 2, 3, 4, 5]);
    for failure in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(failure, GameError::GameAlreadyFinished(_)));
    }

    let game = service.game("alice", &id).expect("Load failed");
    assert_eq!(*game.outcome(), Outcome::Loss);
    let numbers: Vec<u8> = game.guesses().iter().map(|g| *g.guess_number()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_different_games_progress_independently() {
    let service = service_with_secret("crane");
    let ids: Vec<GameId> = (0..4)
        .map(|_| service.create_game("alice").expect("Create failed"))
        .collect();

    std::thread::scope(|s| {
        for id in &ids {
            let service = &service;
            s.spawn(move || {
                for _ in 0..3 {
                    service
                        .submit_guess("alice", id, "north")
                        .expect("Guess failed");
                }
            });
        }
    });

    for id in &ids {
        let game = service.game("alice", id).expect("Load failed");
        assert_eq!(*game.guesses_remaining(), 3);
        assert_eq!(game.guesses().len(), 3);
    }
}
