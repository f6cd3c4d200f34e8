use super::GameMode;
use crate::game::{EngineState, Side, Transition, WinningRun};

/// Notifications sent from the session to the presentation layer. Each one
/// carries everything needed to update the display without asking the
/// engine again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted { mode: GameMode, first: Side },
    DiscPlaced { row: usize, col: usize, side: Side },
    TurnChanged(Side),
    GameWon { side: Side, run: WinningRun },
    GameDraw,
    OpponentThinkingStarted,
    OpponentThinkingEnded,
}

impl GameEvent {
    /// The disc placement followed by the state it led to.
    pub fn from_transition(transition: &Transition) -> [GameEvent; 2] {
        let placed = GameEvent::DiscPlaced {
            row: transition.placed.row,
            col: transition.placed.col,
            side: transition.placed.side,
        };
        let next = match transition.state {
            EngineState::AwaitingMove(side) => GameEvent::TurnChanged(side),
            EngineState::Won { side, run } => GameEvent::GameWon { side, run },
            EngineState::Draw => GameEvent::GameDraw,
        };
        [placed, next]
    }
}
