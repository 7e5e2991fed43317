//! Axum HTTP adapter over the game and leaderboard services.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Banner |
//! | POST | `/games` | Start a game |
//! | GET | `/games` | Caller's in-progress games |
//! | GET | `/games/statistics` | Caller's win/loss counts |
//! | POST | `/games/{id}` | Submit a guess |
//! | GET | `/games/{id}` | Game progress |
//! | POST | `/results` | Submit a finished game's result |
//! | GET | `/leaderboard` | Top players by average score |
//!
//! The caller is identified by the `x-wordle-user` header. Verifying that
//! identity is left to whatever sits in front of this service.

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::config::LeaderboardConfig;
use crate::error::{ErrorKind, GameError, LeaderboardError};
use crate::service::{GameService, InProgressGame, LeaderboardAggregator, RankedEntry, UserStatistics};
use crate::wordle::{Decision, GameId, GameView, GuessOutcome, MAX_GUESSES};

/// Header carrying the authenticated username.
pub const USER_HEADER: &str = "x-wordle-user";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    games: GameService,
    leaderboard: LeaderboardAggregator,
    leaderboard_size: usize,
    report_results: bool,
}

impl AppState {
    /// Bundles the services with the leaderboard settings.
    #[instrument(skip_all, fields(size = config.size(), report_results = config.report_results()))]
    pub fn new(
        games: GameService,
        leaderboard: LeaderboardAggregator,
        config: &LeaderboardConfig,
    ) -> Self {
        Self {
            games,
            leaderboard,
            leaderboard_size: *config.size(),
            report_results: *config.report_results(),
        }
    }
}

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/games", post(handle_create_game).get(handle_list_games))
        .route("/games/statistics", get(handle_statistics))
        .route("/games/{id}", post(handle_guess).get(handle_progress))
        .route("/results", post(handle_submit_result))
        .route("/leaderboard", get(handle_leaderboard))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────
//  Errors and extractors
// ─────────────────────────────────────────────────────────────

/// Error rendered as `{ "message": ... }` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn from_kind(kind: ErrorKind, message: String) -> Self {
        let status = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::StateConflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, message)
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

impl From<LeaderboardError> for ApiError {
    fn from(err: LeaderboardError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            debug!(status = %self.status, message = %self.message, "Request rejected");
        }
        let body = Json(ErrorBody {
            message: self.message,
        });
        if self.status == StatusCode::UNAUTHORIZED {
            (
                self.status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Wordle\"")],
                body,
            )
                .into_response()
        } else {
            (self.status, body).into_response()
        }
    }
}

/// Username taken from the [`USER_HEADER`] header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Self(name.to_string()))
            .ok_or_else(|| {
                warn!("Request without caller identity");
                ApiError::new(StatusCode::UNAUTHORIZED, "Missing x-wordle-user header")
            })
    }
}

/// Runs a store-bound closure off the async runtime.
async fn blocking<T, E, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Worker task failed: {}", e),
            )
        })?
        .map_err(Into::into)
}

// ─────────────────────────────────────────────────────────────
//  Request/response types
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreatedGame {
    game_id: GameId,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
struct GuessRequest {
    guess: String,
}

#[derive(Debug, Deserialize)]
struct ResultRequest {
    username: String,
    status: Decision,
    guess_number: u8,
}

#[derive(Debug, Serialize)]
struct ResultRecorded {
    message: &'static str,
}

// ─────────────────────────────────────────────────────────────
//  Handlers
// ─────────────────────────────────────────────────────────────

async fn handle_index() -> &'static str {
    "Wordle game service. Start a game with POST /games.\n"
}

#[instrument(skip(state))]
async fn handle_create_game(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
) -> Result<(StatusCode, Json<CreatedGame>), ApiError> {
    let games = state.games.clone();
    let game_id = blocking(move || games.create_game(&username)).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedGame {
            game_id,
            message: "Game successfully created",
        }),
    ))
}

#[instrument(skip(state))]
async fn handle_list_games(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
) -> Result<Json<Vec<InProgressGame>>, ApiError> {
    let games = state.games.clone();
    blocking(move || games.list_in_progress(&username))
        .await
        .map(Json)
}

#[instrument(skip(state))]
async fn handle_statistics(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
) -> Result<Json<UserStatistics>, ApiError> {
    let games = state.games.clone();
    blocking(move || games.statistics(&username)).await.map(Json)
}

#[instrument(skip(state, request))]
async fn handle_guess(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<GuessRequest>,
) -> Result<Json<GuessOutcome>, ApiError> {
    let game_id = GameId::from(id);
    let games = state.games.clone();
    let outcome = {
        let (username, game_id) = (username.clone(), game_id.clone());
        blocking(move || games.submit_guess(&username, &game_id, &request.guess)).await?
    };

    if let Some(decision) = outcome.outcome().decision().filter(|_| state.report_results) {
        let guesses_used = MAX_GUESSES - outcome.guesses_remaining();
        let leaderboard = state.leaderboard.clone();
        // The guess is committed at this point; reporting failures are logged, not returned.
        match blocking(move || leaderboard.record_result(&username, decision, guesses_used)).await
        {
            Ok(_) => info!(game_id = %game_id, ?decision, "Finished game reported to leaderboard"),
            Err(err) => error!(
                game_id = %game_id,
                ?decision,
                error = %err.message,
                "Failed to report finished game to leaderboard"
            ),
        }
    }

    Ok(Json(outcome))
}

#[instrument(skip(state))]
async fn handle_progress(
    State(state): State<AppState>,
    CurrentUser(username): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let games = state.games.clone();
    let game_id = GameId::from(id);
    blocking(move || games.get_progress(&username, &game_id))
        .await
        .map(Json)
}

#[instrument(skip(state))]
async fn handle_submit_result(
    State(state): State<AppState>,
    Json(request): Json<ResultRequest>,
) -> Result<(StatusCode, Json<ResultRecorded>), ApiError> {
    let leaderboard = state.leaderboard.clone();
    blocking(move || {
        leaderboard.record_result(&request.username, request.status, request.guess_number)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ResultRecorded {
            message: "Result recorded",
        }),
    ))
}

#[instrument(skip(state))]
async fn handle_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankedEntry>>, ApiError> {
    let leaderboard = state.leaderboard.clone();
    let size = state.leaderboard_size;
    blocking(move || leaderboard.top_n(size)).await.map(Json)
}
