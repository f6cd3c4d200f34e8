//! # Connect Four
//!
//! A Connect Four rule engine with a one-ply heuristic opponent and a terminal
//! front-end built with Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, sides, win detection, turn state machine
//! - [`ai`] — Opponent trait and the win/block/center-bias heuristic
//! - [`session`] — Game session: mode, delayed opponent turns, notifications
//! - [`ui`] — Terminal UI
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
