//! Core Connect Four game logic: board, sides, four-in-a-row detection, and
//! the turn state machine.

mod board;
mod player;
mod state;
pub mod win;

pub use board::{Board, COLS, ROWS};
pub use player::{Cell, Side};
pub use state::{EngineState, GameResult, Placement, RuleEngine, Transition};
pub use win::{Axis, WinningRun, WIN_LENGTH};

#[cfg(test)]
pub(crate) use state::DRAW_SEQUENCE;
