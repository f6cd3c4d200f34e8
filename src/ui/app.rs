use std::io;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use super::game_view::{self, GameView};
use crate::config::AppConfig;
use crate::error::{InvalidState, MoveError};
use crate::game::{WinningRun, COLS};
use crate::session::{GameEvent, GameMode, GameSession};

pub struct App {
    session: GameSession,
    events: Receiver<GameEvent>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    winning_run: Option<WinningRun>,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let (tx, rx) = channel();
        let mut app = App {
            session: GameSession::new(config, tx),
            events: rx,
            selected_column: COLS / 2, // Start in middle
            should_quit: false,
            message: None,
            winning_run: None,
        };
        app.drain_events();
        app
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.session.poll_opponent();
            self.drain_events();

            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece(self.selected_column);
            }
            KeyCode::Char(c @ '1'..='7') => {
                let column = c as usize - '1' as usize;
                self.selected_column = column;
                self.drop_piece(column);
            }
            KeyCode::Char('r') => {
                self.session.reset();
            }
            KeyCode::Char('m') => {
                self.session.set_mode(self.session.mode().toggled());
            }
            _ => {}
        }
        self.drain_events();
    }

    /// Drop a piece for whichever human is to move
    fn drop_piece(&mut self, column: usize) {
        let side = match self.session.mode() {
            GameMode::HumanVsHuman => match self.session.side_to_move() {
                Some(side) => side,
                None => {
                    self.message = Some("Game over! Press 'r' to restart.".to_string());
                    return;
                }
            },
            GameMode::HumanVsOpponent => self.session.human_side(),
        };

        if let Err(err) = self.session.request_move(column, side) {
            self.message = Some(match err {
                MoveError::ColumnFull { .. } => "Column is full!".to_string(),
                MoveError::InvalidColumn { .. } => "Invalid column!".to_string(),
                MoveError::InvalidState(InvalidState::GameOver) => {
                    "Game over! Press 'r' to restart.".to_string()
                }
                MoveError::InvalidState(InvalidState::OpponentThinking) => {
                    "Wait, the computer is thinking...".to_string()
                }
                MoveError::InvalidState(InvalidState::WrongSide { .. }) => {
                    "Not your turn!".to_string()
                }
            });
        }
    }

    fn drain_events(&mut self) {
        let pending: Vec<GameEvent> = self.events.try_iter().collect();
        for event in pending {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameStarted { mode, .. } => {
                self.winning_run = None;
                self.message = Some(format!("New game: {}", mode.label()));
            }
            GameEvent::DiscPlaced { .. } | GameEvent::TurnChanged(_) => {
                self.message = None;
            }
            GameEvent::GameWon { side, run } => {
                self.winning_run = Some(run);
                self.message = Some(format!("{} wins! Press 'r' to restart.", side.name()));
            }
            GameEvent::GameDraw => {
                self.message = Some("It's a draw! Press 'r' to restart.".to_string());
            }
            GameEvent::OpponentThinkingStarted => {
                self.message = Some("Computer is thinking...".to_string());
            }
            GameEvent::OpponentThinkingEnded => {
                self.message = None;
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let view = GameView {
            engine: self.session.engine(),
            mode: self.session.mode(),
            human_side: self.session.human_side(),
            thinking: self.session.opponent_thinking_elapsed(),
            selected_column: self.selected_column,
            winning_run: self.winning_run.as_ref(),
            message: self.message.as_deref(),
        };
        game_view::render(frame, &view);
    }
}
