//! Tests for the SQLite store.

use std::sync::Arc;

use tempfile::NamedTempFile;

use strictly_wordle::{
    Append, Decision, GameId, GameService, GameStateMachine, GameStore, LeaderboardAggregator,
    LeaderboardStore, Outcome, SqliteStore, Word, WordList, evaluate,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let store = SqliteStore::open(db_file.path()).expect("Failed to open store");
    (db_file, store)
}

fn word(s: &str) -> Word {
    Word::parse(s).expect("valid test word")
}

fn vocabulary() -> WordList {
    WordList::from_words(
        vec![word("crane")],
        vec![word("trace"), word("slate"), word("north")],
    )
    .expect("Failed to build word list")
}

#[test]
fn test_create_and_load_game() {
    let (_db, store) = setup_test_db();
    let id = store.create_game("alice", word("crane")).expect("Create failed");

    let game = store
        .load_game(&id)
        .expect("Load failed")
        .expect("Game missing");
    assert_eq!(*game.id(), id);
    assert_eq!(game.username(), "alice");
    assert_eq!(*game.secret(), word("crane"));
    assert_eq!(*game.guesses_remaining(), 6);
    assert_eq!(*game.outcome(), Outcome::InProgress);
    assert!(game.guesses().is_empty());
}

#[test]
fn test_load_unknown_game() {
    let (_db, store) = setup_test_db();
    let game = store
        .load_game(&GameId::from("missing"))
        .expect("Load failed");
    assert!(game.is_none());
}

#[test]
fn test_reopen_keeps_data() {
    let (db, store) = setup_test_db();
    let id = store.create_game("alice", word("crane")).expect("Create failed");
    drop(store);

    let reopened = SqliteStore::open(db.path()).expect("Reopen failed");
    assert!(reopened.load_game(&id).expect("Load failed").is_some());
}

#[test]
fn test_append_recomputes_classification_on_load() {
    let (_db, store) = setup_test_db();
    let words = vocabulary();
    let id = store.create_game("alice", word("crane")).expect("Create failed");
    let game = store.load_game(&id).expect("Load failed").expect("Game missing");

    let transition =
        GameStateMachine::submit_guess(&game, "trace", &words).expect("Guess rejected");
    let result = store
        .append_guess_and_update(&id, *game.guesses_remaining(), &transition)
        .expect("Append failed");
    assert_eq!(result, Append::Applied);

    let stored = store.load_game(&id).expect("Load failed").expect("Game missing");
    assert_eq!(*stored.guesses_remaining(), 5);
    assert_eq!(stored.guesses().len(), 1);
    let record = &stored.guesses()[0];
    assert_eq!(*record.guess_number(), 1);
    assert_eq!(*record.guess(), word("trace"));
    assert_eq!(
        *record.classification(),
        evaluate(&word("crane"), &word("trace"))
    );
}

#[test]
fn test_stale_append_conflicts_without_writing() {
    let (_db, store) = setup_test_db();
    let words = vocabulary();
    let id = store.create_game("alice", word("crane")).expect("Create failed");
    let game = store.load_game(&id).expect("Load failed").expect("Game missing");

    let transition =
        GameStateMachine::submit_guess(&game, "slate", &words).expect("Guess rejected");
    let first = store
        .append_guess_and_update(&id, 6, &transition)
        .expect("Append failed");
    let second = store
        .append_guess_and_update(&id, 6, &transition)
        .expect("Append failed");

    assert_eq!(first, Append::Applied);
    assert_eq!(second, Append::Conflict);
    let stored = store.load_game(&id).expect("Load failed").expect("Game missing");
    assert_eq!(stored.guesses().len(), 1);
    assert_eq!(*stored.guesses_remaining(), 5);
}

#[test]
fn test_finished_game_rejects_append() {
    let (_db, store) = setup_test_db();
    let words = vocabulary();
    let id = store.create_game("alice", word("crane")).expect("Create failed");
    let game = store.load_game(&id).expect("Load failed").expect("Game missing");

    let winning =
        GameStateMachine::submit_guess(&game, "crane", &words).expect("Guess rejected");
    store
        .append_guess_and_update(&id, 6, &winning)
        .expect("Append failed");

    let finished = store.load_game(&id).expect("Load failed").expect("Game missing");
    assert_eq!(*finished.outcome(), Outcome::Win);

    // A transition computed before the win must not land afterwards.
    let late = GameStateMachine::submit_guess(&game, "slate", &words).expect("Guess rejected");
    let result = store
        .append_guess_and_update(&id, 5, &late)
        .expect("Append failed");
    assert_eq!(result, Append::Conflict);
}

#[test]
fn test_list_games_by_user() {
    let (_db, store) = setup_test_db();
    let first = store.create_game("alice", word("crane")).expect("Create failed");
    store.create_game("bob", word("crane")).expect("Create failed");
    let second = store.create_game("alice", word("crane")).expect("Create failed");

    let games = store.list_games("alice").expect("List failed");
    let ids: Vec<GameId> = games.iter().map(|g| g.game_id().clone()).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(games.iter().all(|g| *g.outcome() == Outcome::InProgress));
    assert!(store.list_games("carol").expect("List failed").is_empty());
}

#[test]
fn test_in_progress_games_listed_oldest_first() {
    let (_db, store) = setup_test_db();
    let games = GameService::new(Arc::new(store), Arc::new(vocabulary()));

    let created: Vec<GameId> = (0..8)
        .map(|_| games.create_game("alice").expect("Create failed"))
        .collect();
    let listed: Vec<GameId> = games
        .list_in_progress("alice")
        .expect("List failed")
        .into_iter()
        .map(|g| g.game_id().clone())
        .collect();
    assert_eq!(listed, created);
}

#[test]
fn test_increment_upserts_entry() {
    let (_db, store) = setup_test_db();
    assert!(store.entry("alice").expect("Lookup failed").is_none());

    let first = store.atomic_increment("alice", 4).expect("Increment failed");
    assert_eq!((*first.total_score(), *first.game_count()), (4, 1));

    let second = store.atomic_increment("alice", 0).expect("Increment failed");
    assert_eq!((*second.total_score(), *second.game_count()), (4, 2));

    let stored = store
        .entry("alice")
        .expect("Lookup failed")
        .expect("Entry missing");
    assert_eq!(stored, second);
}

#[test]
fn test_ranked_top_orders_by_average_then_name() {
    let (_db, store) = setup_test_db();
    // alice: 9/3 = 3.0, bob: 3/1 = 3.0, carol: 4/2 = 2.0, dave: 1/1 = 1.0
    for (user, score) in [("alice", 4), ("alice", 4), ("alice", 1), ("bob", 3)] {
        store.atomic_increment(user, score).expect("Increment failed");
    }
    for (user, score) in [("carol", 4), ("carol", 0), ("dave", 1)] {
        store.atomic_increment(user, score).expect("Increment failed");
    }

    let ranked: Vec<String> = store
        .ranked_top(10)
        .expect("Ranking failed")
        .into_iter()
        .map(|e| e.username().clone())
        .collect();
    assert_eq!(ranked, vec!["alice", "bob", "carol", "dave"]);

    assert_eq!(store.ranked_top(2).expect("Ranking failed").len(), 2);
}

#[test]
fn test_concurrent_increments_are_all_counted() {
    let (_db, store) = setup_test_db();
    std::thread::scope(|s| {
        for _ in 0..4 {
            let store = store.clone();
            s.spawn(move || {
                for _ in 0..10 {
                    store.atomic_increment("alice", 2).expect("Increment failed");
                }
            });
        }
    });

    let entry = store
        .entry("alice")
        .expect("Lookup failed")
        .expect("Entry missing");
    assert_eq!(*entry.game_count(), 40);
    assert_eq!(*entry.total_score(), 80);
}

#[test]
fn test_services_over_sqlite() {
    let (_db, store) = setup_test_db();
    let store = Arc::new(store);
    let games = GameService::new(store.clone(), Arc::new(vocabulary()));
    let leaderboard = LeaderboardAggregator::new(store);

    let id = games.create_game("alice").expect("Create failed");
    games
        .submit_guess("alice", &id, "trace")
        .expect("Guess failed");
    let outcome = games
        .submit_guess("alice", &id, "crane")
        .expect("Guess failed");
    assert_eq!(*outcome.outcome(), Outcome::Win);
    assert_eq!(outcome.guesses().len(), 2);

    leaderboard
        .record_result("alice", Decision::Win, 2)
        .expect("Record failed");
    let top = leaderboard.top_n(10).expect("Ranking failed");
    assert_eq!(top.len(), 1);
    assert!((top[0].average_score() - 5.0).abs() < f64::EPSILON);

    let stats = games.statistics("alice").expect("Statistics failed");
    assert_eq!(*stats.wins(), 1);
    assert!(games.list_in_progress("alice").expect("List failed").is_empty());
}
