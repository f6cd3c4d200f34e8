use tracing::debug;

use super::win::{self, WinningRun};
use super::{Board, Side};
use crate::error::{InvalidState, MoveError};

/// Where the turn state machine currently rests. `Won` and `Draw` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    AwaitingMove(Side),
    Won { side: Side, run: WinningRun },
    Draw,
}

/// Outcome of the game so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Win(Side, WinningRun),
    Draw,
}

/// A disc that has been accepted onto the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub side: Side,
}

/// Result of one accepted move: where the disc landed and the state it led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub placed: Placement,
    pub state: EngineState,
}

/// Validates and applies column drops, advancing the turn state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEngine {
    board: Board,
    state: EngineState,
    moves: Vec<Placement>,
}

impl RuleEngine {
    /// Fresh game, `PlayerA` to move
    pub fn new() -> Self {
        RuleEngine {
            board: Board::new(),
            state: EngineState::AwaitingMove(Side::PlayerA),
            moves: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Side to move, or `None` once the game is over
    pub fn side_to_move(&self) -> Option<Side> {
        match self.state {
            EngineState::AwaitingMove(side) => Some(side),
            _ => None,
        }
    }

    pub fn result(&self) -> GameResult {
        match self.state {
            EngineState::AwaitingMove(_) => GameResult::InProgress,
            EngineState::Won { side, run } => GameResult::Win(side, run),
            EngineState::Draw => GameResult::Draw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, EngineState::AwaitingMove(_))
    }

    /// Accepted placements in play order
    pub fn moves(&self) -> &[Placement] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<Placement> {
        self.moves.last().copied()
    }

    /// Drop a disc for the side to move. On error nothing changes.
    pub fn apply_move(&mut self, column: usize) -> Result<Transition, MoveError> {
        let side = match self.state {
            EngineState::AwaitingMove(side) => side,
            _ => return Err(MoveError::InvalidState(InvalidState::GameOver)),
        };
        let row = self.board.drop_piece(column, side)?;
        let placed = Placement { row, col: column, side };
        self.moves.push(placed);

        // A win on the final disc is a win, never a draw.
        self.state = if let Some(run) = win::check(&self.board, row, column, side) {
            EngineState::Won { side, run }
        } else if self.board.is_full() {
            EngineState::Draw
        } else {
            EngineState::AwaitingMove(side.other())
        };

        debug!(row, column, side = side.name(), state = ?self.state, "disc placed");
        Ok(Transition { placed, state: self.state })
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Alternating 42-disc sequence that fills the board with no four in a row.
#[cfg(test)]
pub(crate) const DRAW_SEQUENCE: [usize; 42] = [
    5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1, 2, 2, 6, 2, 6, 6, 3, 6, 2, 0,
    3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
];
