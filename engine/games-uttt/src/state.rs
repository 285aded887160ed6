//! Game state and the state-transition function.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, CodeSet, Move, Symbol};
use crate::error::{GameError, IllegalMoveReason};
use crate::rules::{is_draw, meta_winner, next_zone, CompletionSets};

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Symbol),
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Symbol> {
        match self {
            Outcome::Win(symbol) => Some(symbol),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(symbol) => write!(f, "{} wins", symbol),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Complete snapshot of an Ultimate Tic-Tac-Toe game.
///
/// `GameState` is `Copy`: every transition yields an independent value and
/// nothing is shared between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub completed: CompletionSets,
    /// Player to move
    pub turn: Symbol,
    /// Sub-boards the player to move may play in (empty once the game is over)
    pub next_zone: CodeSet,
    pub game_over: bool,
}

impl GameState {
    /// Opening position: empty board, X to move, any sub-board allowed.
    pub fn new() -> Self {
        Self {
            board: Board::empty(),
            completed: CompletionSets::new(),
            turn: Symbol::X,
            next_zone: CodeSet::ALL,
            game_over: false,
        }
    }

    /// Replay `moves` from the opening position.
    pub fn from_moves(moves: &[Move]) -> Result<Self, GameError> {
        moves
            .iter()
            .try_fold(Self::new(), |state, &mv| state.apply_move(mv))
    }

    /// Apply `mv` for the player to move and return the resulting state.
    ///
    /// `self` is never modified. The move must target an empty cell inside a
    /// sub-board of the next zone, and the game must not be over.
    pub fn apply_move(&self, mv: Move) -> Result<GameState, GameError> {
        let illegal = |reason| GameError::IllegalMove { mv, reason };

        if self.game_over {
            return Err(illegal(IllegalMoveReason::GameOver));
        }
        let (code, target) = match (mv.sub_board(), mv.target()) {
            (Some(code), Some(target)) => (code, target),
            _ => return Err(illegal(IllegalMoveReason::OutOfBounds)),
        };
        if !self.next_zone.contains(code) {
            return Err(illegal(IllegalMoveReason::OutsideZone));
        }

        let board = self.board.place_symbol(mv, self.turn)?;

        let mut completed = self.completed;
        completed.update(code, board.sub_board(code));

        // Draw is judged on the sets with this move folded in, so a move that
        // closes the last open sub-board ends the game immediately.
        let game_over = meta_winner(completed.won_by(self.turn)) || is_draw(&completed);
        let next_zone = if game_over {
            CodeSet::EMPTY
        } else {
            next_zone(target, &completed)
        };

        Ok(GameState {
            board,
            completed,
            turn: self.turn.opponent(),
            next_zone,
            game_over,
        })
    }

    /// All legal moves: zones in ascending code order, cells row-major.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.game_over {
            return Vec::new();
        }

        let mut moves = Vec::new();
        for code in self.next_zone.iter() {
            let cells = self.board.sub_board(code);
            for (cell, _) in cells.iter().enumerate().filter(|(_, c)| c.is_empty()) {
                moves.push(Move::from_code(code, cell as u8));
            }
        }
        moves
    }

    pub fn is_legal(&self, mv: &Move) -> bool {
        !self.game_over
            && mv.sub_board().is_some_and(|code| self.next_zone.contains(code))
            && self.board.cell(mv).is_some_and(|cell| cell.is_empty())
    }

    /// Result as implied by the completion sets, if the game is decided.
    ///
    /// A meta-board line takes precedence over all nine sub-boards being
    /// decided.
    pub fn outcome(&self) -> Option<Outcome> {
        if meta_winner(self.completed.x) {
            Some(Outcome::Win(Symbol::X))
        } else if meta_winner(self.completed.o) {
            Some(Outcome::Win(Symbol::O))
        } else if self.game_over || is_draw(&self.completed) {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Copy of this state with the game-over flag and next zone made
    /// consistent with its completion sets.
    pub fn settle(&self) -> GameState {
        let mut state = *self;
        if state.outcome().is_some() {
            state.game_over = true;
            state.next_zone = CodeSet::EMPTY;
        }
        state
    }

    /// Number of moves played so far.
    pub fn ply(&self) -> usize {
        self.board.occupied()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9u8 {
            if row > 0 && row % 3 == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for col in 0..9u8 {
                if col > 0 && col % 3 == 0 {
                    write!(f, "| ")?;
                }
                let cell = self.board.get(row / 3, col / 3, row % 3, col % 3);
                let ch = cell.symbol().map_or('.', Symbol::as_char);
                write!(f, "{}", ch)?;
                if col < 8 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        match self.outcome().filter(|_| self.game_over) {
            Some(outcome) => write!(f, "Game over: {}", outcome),
            None => {
                let zone: Vec<String> =
                    self.next_zone.iter().map(|c| c.to_string()).collect();
                write!(f, "{} to move in {}", self.turn, zone.join(" "))
            }
        }
    }
}
