//! Error types for rule violations.

use thiserror::Error;

use crate::board::Move;

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMoveReason {
    #[error("coordinates out of range")]
    OutOfBounds,

    #[error("cell is already occupied")]
    Occupied,

    #[error("sub-board is outside the next zone")]
    OutsideZone,

    #[error("game is already over")]
    GameOver,
}

/// Errors raised by the rules engine.
///
/// These are contract violations: callers are expected to offer only legal
/// moves, so any of these reaching the caller indicates a bug upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Illegal move {mv}: {reason}")]
    IllegalMove {
        mv: Move,
        reason: IllegalMoveReason,
    },

    #[error("No legal moves to choose from")]
    EmptySelection,
}
