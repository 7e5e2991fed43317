//! Strictly Wordle - Unified CLI

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

use strictly_wordle::{
    AppConfig, AppState, GameService, GameStore, LeaderboardAggregator, LeaderboardStore,
    MemoryGameStore, MemoryLeaderboard, SqliteStore, Word, WordList, create_router, evaluate,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_wordle=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Evaluate { secret, guess } => run_evaluate(&secret, &guess),
    }
}

/// Run the HTTP game server
#[instrument(skip(host, port))]
async fn run_server(config_path: PathBuf, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = AppConfig::load_or_default(&config_path)?;
    let host = host.unwrap_or_else(|| config.server().host().clone());
    let port = port.unwrap_or(*config.server().port());

    let vocabulary = Arc::new(WordList::from_config(config.words())?);
    let (games, leaderboard): (Arc<dyn GameStore>, Arc<dyn LeaderboardStore>) =
        match config.storage().database_path() {
            Some(path) => {
                let store = Arc::new(SqliteStore::open(path)?);
                let games: Arc<dyn GameStore> = store.clone();
                let leaderboard: Arc<dyn LeaderboardStore> = store;
                (games, leaderboard)
            }
            None => {
                warn!("No database_path configured, state will be lost on exit");
                let games: Arc<dyn GameStore> = Arc::new(MemoryGameStore::new());
                let leaderboard: Arc<dyn LeaderboardStore> = Arc::new(MemoryLeaderboard::new());
                (games, leaderboard)
            }
        };

    let state = AppState::new(
        GameService::new(games, vocabulary),
        LeaderboardAggregator::new(leaderboard),
        config.leaderboard(),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Server ready at http://{}:{}/", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Print the classification of `guess` against `secret`
fn run_evaluate(secret: &str, guess: &str) -> Result<()> {
    let secret = Word::parse(secret).with_context(|| format!("Invalid secret '{}'", secret))?;
    let guess = Word::parse(guess).with_context(|| format!("Invalid guess '{}'", guess))?;
    let classification = evaluate(&secret, &guess);

    println!("{}", guess);
    println!("{}", classification);
    for (letter, mark) in guess.to_string().chars().zip(classification.marks()) {
        println!("  {} {:?}", letter, mark);
    }
    Ok(())
}
