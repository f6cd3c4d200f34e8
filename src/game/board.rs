use super::player::{Cell, Side};
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Fixed 6x7 grid. Row 0 is the top, row 5 is the bottom; discs stack upward
/// from row 5 with no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    /// Discs per column, kept in step with `cells`.
    filled: [usize; COLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            filled: [0; COLS],
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Lowest empty row in `col`, or `None` if the column is full or out of range
    pub fn drop_height(&self, col: usize) -> Option<usize> {
        if col >= COLS || self.filled[col] == ROWS {
            return None;
        }
        Some(ROWS - 1 - self.filled[col])
    }

    /// Write a disc. `row` must come from `drop_height(col)` on this same board.
    pub fn place(&mut self, row: usize, col: usize, side: Side) {
        debug_assert_eq!(self.drop_height(col), Some(row), "placement must respect gravity");
        self.cells[row][col] = side.to_cell();
        self.filled[col] += 1;
    }

    /// Copy of this board with one extra disc; `self` is left untouched
    pub fn with_move(&self, row: usize, col: usize, side: Side) -> Board {
        let mut next = *self;
        next.place(row, col, side);
        next
    }

    /// Drop a disc into a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, side: Side) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn { column: col });
        }
        let row = self
            .drop_height(col)
            .ok_or(MoveError::ColumnFull { column: col })?;
        self.place(row, col, side);
        Ok(row)
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        self.drop_height(col).is_none()
    }

    /// True iff the top row has no empty cell. Gravity makes that equivalent
    /// to every cell being occupied.
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|&cell| cell != Cell::Empty)
    }

    /// Columns that can still accept a disc, ascending
    pub fn available_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Total discs on the board
    pub fn disc_count(&self) -> usize {
        self.filled.iter().sum()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
