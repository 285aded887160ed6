//! Response types for the web API.

use games_uttt::{Board, CodeSet, CompletionSets, Move, Symbol};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Current game state.
#[derive(Serialize, Deserialize)]
pub struct GameStateResponse {
    /// 9×9 cells indexed [sub-board code][cell], "X", "O" or ""
    pub board: Board,
    /// Sub-boards won by X, won by O and drawn
    pub completed: CompletionSets,
    /// Player to move
    pub turn: Symbol,
    /// Which symbol the human plays (depends on who went first)
    pub human: Symbol,
    /// Sub-board codes the player to move may play in
    pub next_zone: CodeSet,
    /// Is the game over?
    pub game_over: bool,
    /// Winner, if the game ended with a meta-board line
    pub winner: Option<Symbol>,
    /// Legal moves for the player to move
    pub legal_moves: Vec<Move>,
    /// Status message
    pub message: String,
}

/// Response after a human or best move.
#[derive(Serialize, Deserialize)]
pub struct MoveResponse {
    /// Updated game state
    #[serde(flatten)]
    pub state: GameStateResponse,
    /// Move chosen by the search (if the bot moved)
    pub bot_move: Option<Move>,
    /// Mean rollout reward of the chosen move for the side that played it
    pub score: Option<f64>,
    /// Search iterations behind the chosen move
    pub iterations: Option<u32>,
}

/// Response after a random move.
#[derive(Serialize, Deserialize)]
pub struct RandomMoveResponse {
    /// Updated game state
    #[serde(flatten)]
    pub state: GameStateResponse,
    /// Move played, `None` if the game was already decided
    pub played: Option<Move>,
}
