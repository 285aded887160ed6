//! Ultimate Tic-Tac-Toe rules engine
//!
//! Nine 3×3 sub-boards arranged on a 3×3 meta-board. The cell a player picks
//! inside a sub-board names the sub-board the opponent must play in next;
//! winning a sub-board claims that square of the meta-board, and three
//! claimed squares in a line win the game.
//!
//! This crate provides the pure game model consumed by the `mcts` crate and
//! the web service:
//! - [`Board`], [`Move`], [`SubBoardCode`], [`CodeSet`]: the 9×9 grid and its addressing
//! - [`rules`]: sub-board and meta-board win/draw detection, forced zones
//! - [`GameState::apply_move`]: the state transition
//! - [`compute_random_move`]: one uniformly random legal move
//!
//! # Usage
//!
//! ```rust
//! use games_uttt::{GameState, Move};
//!
//! let state = GameState::new();
//! let next = state.apply_move(Move::new(1, 1, 0, 2)).unwrap();
//!
//! // O is now confined to the top-right sub-board
//! assert_eq!(next.legal_moves().len(), 9);
//! ```

pub mod board;
pub mod error;
pub mod random;
pub mod rules;
pub mod state;

pub use board::{Board, Cell, CodeSet, Move, SubBoardCode, Symbol};
pub use error::{GameError, IllegalMoveReason};
pub use random::{compute_random_move, random_legal_move, RandomMove};
pub use rules::{
    is_draw, meta_winner, next_zone, sub_board_full, sub_board_winner, CompletionSets,
};
pub use state::{GameState, Outcome};
