//! SQLite persistence for games, guesses and leaderboard totals.

mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use repository::SqliteStore;
