mod agent;
pub mod policy;

pub use agent::Opponent;
pub use policy::{choose_column, HeuristicOpponent};
