//! Terminal front-end: forwards column drops to the session and renders the
//! notifications it emits.

mod app;
mod game_view;

pub use app::App;
