use std::path::PathBuf;

use crate::game::Side;

/// Why a move was refused even though the column itself may be fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidState {
    #[error("the game is over")]
    GameOver,

    #[error("{requested:?} cannot move, it is {to_move:?}'s turn")]
    WrongSide { requested: Side, to_move: Side },

    #[error("the opponent is thinking")]
    OpponentThinking,
}

/// Errors returned for a rejected column drop. A rejected move never changes
/// the board or emits a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range")]
    InvalidColumn { column: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("move not allowed: {0}")]
    InvalidState(#[from] InvalidState),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
