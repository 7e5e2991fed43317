//! Business logic layer between the transport and the stores.

mod game;
mod leaderboard;

pub use game::{GameService, InProgressGame, UserStatistics};
pub use leaderboard::{LeaderboardAggregator, RankedEntry};
