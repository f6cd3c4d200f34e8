use crate::game::{Board, Side};

/// Interface for automated opponents.
pub trait Opponent: Send {
    /// Pick a column for `side` to drop into, or `None` if no column is open.
    /// Implementations must not keep any reference to `board`.
    fn choose_column(&mut self, board: &Board, side: Side) -> Option<usize>;

    /// Return the opponent's display name.
    fn name(&self) -> &str;

    /// Independent copy to hand to a worker thread for one turn.
    fn fork(&mut self) -> Box<dyn Opponent>;
}
