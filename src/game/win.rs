//! Four-in-a-row detection around the most recent placement.

use super::board::{Board, COLS, ROWS};
use super::player::Side;

/// Discs in a row needed to win.
pub const WIN_LENGTH: usize = 4;

/// Line a winning run lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right (`\`).
    DiagonalDownRight,
    /// Top-right to bottom-left (`/`).
    DiagonalDownLeft,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Horizontal,
        Axis::Vertical,
        Axis::DiagonalDownRight,
        Axis::DiagonalDownLeft,
    ];

    /// Unit step `(d_row, d_col)` in the positive direction
    pub fn step(self) -> (isize, isize) {
        match self {
            Axis::Horizontal => (0, 1),
            Axis::Vertical => (1, 0),
            Axis::DiagonalDownRight => (1, 1),
            Axis::DiagonalDownLeft => (1, -1),
        }
    }
}

/// Exactly four contiguous, collinear `(row, col)` coordinates of one side,
/// ordered along the axis' positive direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningRun {
    pub side: Side,
    pub axis: Axis,
    pub cells: [(usize, usize); WIN_LENGTH],
}

impl WinningRun {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }
}

/// Check whether the disc just placed at `(row, col)` completes four in a row
/// for `side`. Only lines through that cell are inspected.
pub fn check(board: &Board, row: usize, col: usize, side: Side) -> Option<WinningRun> {
    Axis::ALL
        .into_iter()
        .find_map(|axis| run_along(board, row, col, side, axis))
}

fn run_along(board: &Board, row: usize, col: usize, side: Side, axis: Axis) -> Option<WinningRun> {
    let (dr, dc) = axis.step();
    let forward = walk(board, row, col, side, dr, dc);
    let backward = walk(board, row, col, side, -dr, -dc);

    let origin = backward.len();
    let mut line: Vec<(usize, usize)> = backward.into_iter().rev().collect();
    line.push((row, col));
    line.extend(forward);

    if line.len() < WIN_LENGTH {
        return None;
    }

    // Earliest four-cell window that still contains the origin.
    let start = origin.saturating_sub(WIN_LENGTH - 1).min(line.len() - WIN_LENGTH);
    let mut cells = [(0, 0); WIN_LENGTH];
    cells.copy_from_slice(&line[start..start + WIN_LENGTH]);

    Some(WinningRun { side, axis, cells })
}

/// Up to `WIN_LENGTH - 1` cells of `side` stepping away from the origin,
/// stopping at the edge or the first cell that is not `side`.
fn walk(board: &Board, row: usize, col: usize, side: Side, dr: isize, dc: isize) -> Vec<(usize, usize)> {
    let target = side.to_cell();
    let mut cells = Vec::with_capacity(WIN_LENGTH - 1);
    let (mut r, mut c) = (row as isize, col as isize);

    for _ in 1..WIN_LENGTH {
        r += dr;
        c += dc;
        if r < 0 || c < 0 || r >= ROWS as isize || c >= COLS as isize {
            break;
        }
        let (ru, cu) = (r as usize, c as usize);
        if board.get(ru, cu) != target {
            break;
        }
        cells.push((ru, cu));
    }

    cells
}
