//! Board model: symbols, cells, sub-board codes and the 9×9 grid.
//!
//! The grid is stored as nine sub-boards of nine cells each. A sub-board is
//! addressed by its [`SubBoardCode`] (dense index `row * 3 + col`), a cell
//! within it by `cell_row * 3 + cell_col`. Every transformation returns a new
//! [`Board`]; the board is `Copy`, so snapshots never alias.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, IllegalMoveReason};

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The other player.
    pub fn opponent(self) -> Symbol {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Content of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The symbol occupying this cell, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Symbol::X),
            Cell::O => Some(Symbol::O),
        }
    }
}

impl From<Symbol> for Cell {
    fn from(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Cell::X,
            Symbol::O => Cell::O,
        }
    }
}

/// Identifies one of the nine sub-boards.
///
/// Encoded densely as `sub_row * 3 + sub_col`, so the nine codes are `0..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubBoardCode(u8);

impl SubBoardCode {
    /// All nine codes in ascending order.
    pub const ALL: [SubBoardCode; 9] = [
        SubBoardCode(0),
        SubBoardCode(1),
        SubBoardCode(2),
        SubBoardCode(3),
        SubBoardCode(4),
        SubBoardCode(5),
        SubBoardCode(6),
        SubBoardCode(7),
        SubBoardCode(8),
    ];

    /// Code for the sub-board at `(row, col)`, or `None` if out of range.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < 3 && col < 3 {
            Some(SubBoardCode(row * 3 + col))
        } else {
            None
        }
    }

    /// Code from its dense index, or `None` if `index > 8`.
    pub fn from_index(index: u8) -> Option<Self> {
        (index < 9).then_some(SubBoardCode(index))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

impl fmt::Display for SubBoardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row(), self.col())
    }
}

/// A set of sub-board codes, packed into the low nine bits of a `u16`.
///
/// Serialized as the ascending list of code indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct CodeSet(u16);

impl CodeSet {
    pub const EMPTY: CodeSet = CodeSet(0);
    pub const ALL: CodeSet = CodeSet(0x1FF);

    pub fn single(code: SubBoardCode) -> Self {
        CodeSet(1 << code.0)
    }

    #[inline]
    pub fn contains(self, code: SubBoardCode) -> bool {
        self.0 & (1 << code.0) != 0
    }

    /// Adds `code`; adding a present code is a no-op.
    #[inline]
    pub fn insert(&mut self, code: SubBoardCode) {
        self.0 |= 1 << code.0;
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: CodeSet) -> CodeSet {
        CodeSet(self.0 | other.0)
    }

    /// Codes in `ALL` that are not in `self`.
    pub fn complement(self) -> CodeSet {
        CodeSet(!self.0 & Self::ALL.0)
    }

    pub fn is_superset(self, other: CodeSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit mask (bit `i` set means code `i` is present).
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Iterate over contained codes in ascending order.
    pub fn iter(self) -> impl Iterator<Item = SubBoardCode> {
        SubBoardCode::ALL
            .into_iter()
            .filter(move |code| self.contains(*code))
    }
}

impl FromIterator<SubBoardCode> for CodeSet {
    fn from_iter<I: IntoIterator<Item = SubBoardCode>>(iter: I) -> Self {
        let mut set = CodeSet::EMPTY;
        for code in iter {
            set.insert(code);
        }
        set
    }
}

impl From<CodeSet> for Vec<u8> {
    fn from(set: CodeSet) -> Self {
        set.iter().map(|code| code.0).collect()
    }
}

impl TryFrom<Vec<u8>> for CodeSet {
    type Error = String;

    fn try_from(codes: Vec<u8>) -> Result<Self, Self::Error> {
        codes
            .into_iter()
            .map(|index| {
                SubBoardCode::from_index(index)
                    .ok_or_else(|| format!("Invalid sub-board code: {}", index))
            })
            .collect()
    }
}

/// A move: which sub-board, and which cell inside it.
///
/// The cell coordinates double as the target sub-board for the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub sub_row: u8,
    pub sub_col: u8,
    pub cell_row: u8,
    pub cell_col: u8,
}

impl Move {
    pub fn new(sub_row: u8, sub_col: u8, cell_row: u8, cell_col: u8) -> Self {
        Self {
            sub_row,
            sub_col,
            cell_row,
            cell_col,
        }
    }

    /// Build a move from a sub-board code and a cell index (`0..9`).
    pub fn from_code(code: SubBoardCode, cell: u8) -> Self {
        Self::new(code.row(), code.col(), cell / 3, cell % 3)
    }

    pub fn in_bounds(&self) -> bool {
        self.sub_row < 3 && self.sub_col < 3 && self.cell_row < 3 && self.cell_col < 3
    }

    /// The sub-board this move is played in.
    pub fn sub_board(&self) -> Option<SubBoardCode> {
        SubBoardCode::new(self.sub_row, self.sub_col)
    }

    /// The sub-board the opponent is sent to.
    pub fn target(&self) -> Option<SubBoardCode> {
        SubBoardCode::new(self.cell_row, self.cell_col)
    }

    #[inline]
    pub fn cell_index(&self) -> usize {
        (self.cell_row * 3 + self.cell_col) as usize
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})/({},{})",
            self.sub_row, self.sub_col, self.cell_row, self.cell_col
        )
    }
}

/// The 9×9 grid, stored as nine sub-boards of nine cells.
///
/// Serializes as a nested array indexed `[sub-board code][cell index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; 9]; 9],
}

impl Board {
    /// A board with every cell empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cell at the given four coordinates. Panics if any is out of range.
    pub fn get(&self, sub_row: u8, sub_col: u8, cell_row: u8, cell_col: u8) -> Cell {
        self.cells[(sub_row * 3 + sub_col) as usize][(cell_row * 3 + cell_col) as usize]
    }

    /// Cell addressed by a move.
    pub fn cell(&self, mv: &Move) -> Option<Cell> {
        let code = mv.sub_board()?;
        mv.in_bounds().then(|| self.cells[code.index()][mv.cell_index()])
    }

    /// The nine cells of a sub-board in row-major order.
    #[inline]
    pub fn sub_board(&self, code: SubBoardCode) -> &[Cell; 9] {
        &self.cells[code.index()]
    }

    /// Returns a copy of this board with `symbol` placed at `mv`.
    ///
    /// Fails without touching `self` if the move is out of range or the cell
    /// is already occupied.
    pub fn place_symbol(&self, mv: Move, symbol: Symbol) -> Result<Board, GameError> {
        let cell = self.cell(&mv).ok_or(GameError::IllegalMove {
            mv,
            reason: IllegalMoveReason::OutOfBounds,
        })?;
        if !cell.is_empty() {
            return Err(GameError::IllegalMove {
                mv,
                reason: IllegalMoveReason::Occupied,
            });
        }

        let mut board = *self;
        let code = (mv.sub_row * 3 + mv.sub_col) as usize;
        board.cells[code][mv.cell_index()] = symbol.into();
        Ok(board)
    }

    /// Number of occupied cells across the whole grid.
    pub fn occupied(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }
}
