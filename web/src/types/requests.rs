//! Request types for the web API.

use games_uttt::Move;
use serde::Deserialize;

/// Who plays the opening move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstPlayer {
    #[default]
    Player,
    Bot,
}

/// Request to start a new game.
#[derive(Deserialize)]
pub struct NewGameRequest {
    /// Who plays first: "player" or "bot"
    #[serde(default)]
    pub first: FirstPlayer,
}

/// Request to make a move.
#[derive(Deserialize)]
pub struct MoveRequest {
    /// Sub-board row (0-2)
    pub sub_row: u8,
    /// Sub-board column (0-2)
    pub sub_col: u8,
    /// Cell row inside the sub-board (0-2)
    pub cell_row: u8,
    /// Cell column inside the sub-board (0-2)
    pub cell_col: u8,
}

impl From<MoveRequest> for Move {
    fn from(req: MoveRequest) -> Self {
        Move::new(req.sub_row, req.sub_col, req.cell_row, req.cell_col)
    }
}
