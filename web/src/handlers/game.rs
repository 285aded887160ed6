//! Game-related handlers.

use axum::{extract::State, http::StatusCode, Json};
use games_uttt::{GameError, Move, Symbol};
use std::sync::Arc;
use tracing::{debug, error};

use crate::game::GameSession;
use crate::types::{
    FirstPlayer, GameStateResponse, MoveRequest, MoveResponse, NewGameRequest, RandomMoveResponse,
};
use crate::AppState;

type HandlerError = (StatusCode, String);

fn bad_request(e: GameError) -> HandlerError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn bot_failed(e: anyhow::Error) -> HandlerError {
    error!("Bot move failed: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Bot move failed: {}", e),
    )
}

/// Get current game state.
pub async fn get_game_state(State(state): State<Arc<AppState>>) -> Json<GameStateResponse> {
    let session = state.session.lock().await;
    Json(session.to_response())
}

/// Start a new game.
pub async fn new_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewGameRequest>,
) -> Result<Json<GameStateResponse>, HandlerError> {
    let mut session = state.session.lock().await;

    // X always opens, so whoever goes first plays X
    let human = match req.first {
        FirstPlayer::Player => Symbol::X,
        FirstPlayer::Bot => Symbol::O,
    };
    *session = GameSession::new(human, state.next_seed(), state.mcts_config.clone());

    if req.first == FirstPlayer::Bot {
        session.bot_move().await.map_err(bot_failed)?;
    }

    Ok(Json(session.to_response()))
}

/// Make a move (player + bot response).
pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, HandlerError> {
    let mut session = state.session.lock().await;

    if session.is_game_over() {
        return Err((StatusCode::BAD_REQUEST, "Game is already over".to_string()));
    }
    if !session.is_human_turn() {
        return Err((StatusCode::BAD_REQUEST, "Not your turn".to_string()));
    }

    let mv = Move::from(req);
    session.play(mv).map_err(bad_request)?;
    debug!(mv = %mv, ply = session.state().ply(), "Player moved");

    // If game is not over, bot makes a move
    let search = if !session.is_game_over() {
        Some(session.bot_move().await.map_err(bot_failed)?)
    } else {
        None
    };

    Ok(Json(MoveResponse {
        state: session.to_response(),
        bot_move: search.and_then(|s| s.best_move),
        score: search.map(|s| s.score),
        iterations: search.map(|s| s.iterations),
    }))
}

/// Play a uniformly random move for the side to move.
pub async fn random_move(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RandomMoveResponse>, HandlerError> {
    let mut session = state.session.lock().await;
    let result = session.random_move().map_err(bad_request)?;

    Ok(Json(RandomMoveResponse {
        state: session.to_response(),
        played: result.played,
    }))
}

/// Search for and play the best move for the side to move.
pub async fn best_move(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MoveResponse>, HandlerError> {
    let mut session = state.session.lock().await;
    let result = session.bot_move().await.map_err(bot_failed)?;

    Ok(Json(MoveResponse {
        state: session.to_response(),
        bot_move: result.best_move,
        score: Some(result.score),
        iterations: Some(result.iterations),
    }))
}
