//! Win, draw and forced-zone rules.
//!
//! The same eight lines decide both a single sub-board (over its nine cells)
//! and the meta-board (over the nine sub-board codes).

use serde::{Deserialize, Serialize};

use crate::board::{Cell, CodeSet, SubBoardCode, Symbol};

/// Winning lines over a 3×3 grid in row-major indexing.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Returns the symbol holding a complete line in `cells`, if any.
pub fn sub_board_winner(cells: &[Cell; 9]) -> Option<Symbol> {
    LINES.iter().find_map(|&[a, b, c]| {
        let symbol = cells[a].symbol()?;
        (cells[a] == cells[b] && cells[b] == cells[c]).then_some(symbol)
    })
}

/// True iff no cell is empty.
pub fn sub_board_full(cells: &[Cell; 9]) -> bool {
    cells.iter().all(|cell| !cell.is_empty())
}

/// True iff some meta-board line is entirely contained in `won`.
pub fn meta_winner(won: CodeSet) -> bool {
    LINES.iter().any(|line| {
        line.iter()
            .all(|&index| won.contains(SubBoardCode::ALL[index]))
    })
}

/// True iff every sub-board has been decided one way or another.
pub fn is_draw(completed: &CompletionSets) -> bool {
    completed.x.len() + completed.o.len() + completed.drawn.len() == 9
}

/// Sub-boards the next player may play in after being sent to `target`.
///
/// Exactly `{target}` when it is still open, otherwise every open sub-board.
pub fn next_zone(target: SubBoardCode, completed: &CompletionSets) -> CodeSet {
    if completed.is_completed(target) {
        completed.open()
    } else {
        CodeSet::single(target)
    }
}

/// Completion status of the nine sub-boards.
///
/// A code belongs to at most one of the three sets and is never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CompletionSets {
    /// Sub-boards won by X
    pub x: CodeSet,
    /// Sub-boards won by O
    pub o: CodeSet,
    /// Sub-boards filled without a winner
    pub drawn: CodeSet,
}

impl CompletionSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn won_by(&self, symbol: Symbol) -> CodeSet {
        match symbol {
            Symbol::X => self.x,
            Symbol::O => self.o,
        }
    }

    /// Union of all three sets.
    pub fn completed(&self) -> CodeSet {
        self.x.union(self.o).union(self.drawn)
    }

    pub fn is_completed(&self, code: SubBoardCode) -> bool {
        self.completed().contains(code)
    }

    /// Sub-boards still open for play.
    pub fn open(&self) -> CodeSet {
        self.completed().complement()
    }

    /// Record `code` as won by `symbol`. No-op if already completed.
    pub fn record_win(&mut self, code: SubBoardCode, symbol: Symbol) {
        if self.is_completed(code) {
            return;
        }
        match symbol {
            Symbol::X => self.x.insert(code),
            Symbol::O => self.o.insert(code),
        }
    }

    /// Record `code` as drawn. No-op if already completed.
    pub fn record_draw(&mut self, code: SubBoardCode) {
        if !self.is_completed(code) {
            self.drawn.insert(code);
        }
    }

    /// Fold the current contents of sub-board `code` into the sets.
    pub fn update(&mut self, code: SubBoardCode, cells: &[Cell; 9]) {
        if let Some(winner) = sub_board_winner(cells) {
            self.record_win(code, winner);
        } else if sub_board_full(cells) {
            self.record_draw(code);
        }
    }
}
