//! Command-line interface for strictly_wordle.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strictly Wordle - word-guessing game service with a leaderboard
#[derive(Parser, Debug)]
#[command(name = "strictly_wordle")]
#[command(about = "Word-guessing game service with a leaderboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to the TOML configuration file (defaults are used if missing)
        #[arg(short, long, default_value = "wordle.toml")]
        config: PathBuf,

        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Classify a guess against a secret and print the result
    Evaluate {
        /// The secret word
        secret: String,

        /// The guessed word
        guess: String,
    },
}
