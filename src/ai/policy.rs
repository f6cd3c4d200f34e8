//! One-ply heuristic: take a winning drop, else block the opponent's winning
//! drop, else draw a column at random with a bias toward the center.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent::Opponent;
use crate::game::{win, Board, Side, COLS};

/// Center column index; it carries the largest weight.
pub const CENTER_COLUMN: usize = COLS / 2;

/// Selection weight of `col`: `COLS - |col - CENTER_COLUMN|`.
pub fn center_weight(col: usize) -> usize {
    COLS - col.abs_diff(CENTER_COLUMN)
}

/// First column (ascending order) in which a `side` disc would complete four
/// in a row. Every probe runs against a copy, so `board` is never modified.
pub fn winning_column(board: &Board, side: Side, available: &[usize]) -> Option<usize> {
    available.iter().copied().find(|&col| {
        board
            .drop_height(col)
            .is_some_and(|row| win::check(&board.with_move(row, col, side), row, col, side).is_some())
    })
}

/// Pick uniformly from a pool holding each available column `center_weight` times.
pub fn weighted_center_column<R: Rng + ?Sized>(available: &[usize], rng: &mut R) -> Option<usize> {
    let pool: Vec<usize> = available
        .iter()
        .flat_map(|&col| std::iter::repeat(col).take(center_weight(col)))
        .collect();
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}

/// Full priority order: win, then block, then weighted random.
pub fn choose_column<R: Rng + ?Sized>(
    board: &Board,
    side: Side,
    opponent: Side,
    available: &[usize],
    rng: &mut R,
) -> Option<usize> {
    winning_column(board, side, available)
        .or_else(|| winning_column(board, opponent, available))
        .or_else(|| weighted_center_column(available, rng))
}

/// Opponent driven by [`choose_column`].
pub struct HeuristicOpponent {
    rng: StdRng,
}

impl HeuristicOpponent {
    pub fn new() -> Self {
        HeuristicOpponent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible random draws
    pub fn with_seed(seed: u64) -> Self {
        HeuristicOpponent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for HeuristicOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for HeuristicOpponent {
    fn choose_column(&mut self, board: &Board, side: Side) -> Option<usize> {
        let available = board.available_columns();
        choose_column(board, side, side.other(), &available, &mut self.rng)
    }

    fn name(&self) -> &str {
        "Heuristic"
    }

    fn fork(&mut self) -> Box<dyn Opponent> {
        Box::new(HeuristicOpponent::with_seed(self.rng.random()))
    }
}
