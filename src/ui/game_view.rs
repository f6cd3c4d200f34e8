use std::time::Duration;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::game::{Cell, GameResult, RuleEngine, Side, WinningRun, COLS, ROWS};
use crate::session::GameMode;

/// Everything the game screen shows, borrowed for one frame.
pub struct GameView<'a> {
    pub engine: &'a RuleEngine,
    pub mode: GameMode,
    pub human_side: Side,
    /// Time the opponent has been thinking, if it is
    pub thinking: Option<Duration>,
    pub selected_column: usize,
    pub winning_run: Option<&'a WinningRun>,
    pub message: Option<&'a str>,
}

fn side_color(side: Side) -> Color {
    match side {
        Side::PlayerA => Color::Red,
        Side::PlayerB => Color::Yellow,
    }
}

pub fn render(frame: &mut Frame, view: &GameView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, view: &GameView, area: Rect) {
    let (status, color) = match view.engine.result() {
        GameResult::Win(side, _) => (format!("{} wins", side.name()), side_color(side)),
        GameResult::Draw => ("Draw".to_string(), Color::White),
        GameResult::InProgress => {
            let side = view.engine.side_to_move().unwrap_or(Side::PlayerA);
            let who = match (view.mode, view.thinking) {
                (GameMode::HumanVsOpponent, Some(elapsed)) if side != view.human_side => {
                    format!("Computer (thinking {:.1}s)", elapsed.as_secs_f32())
                }
                (GameMode::HumanVsOpponent, _) if side != view.human_side => "Computer".to_string(),
                (GameMode::HumanVsOpponent, _) => "You".to_string(),
                (GameMode::HumanVsHuman, _) => "Player".to_string(),
            };
            (format!("{}: {}", who, side.name()), side_color(side))
        }
    };

    let header = Paragraph::new(format!("{}  |  {}", status, view.mode.label()))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &GameView, area: Rect) {
    let board = view.engine.board();
    let last = view.engine.last_move();
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        let label = format!(" {} ", col + 1);
        if col == view.selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];
        for col in 0..COLS {
            let cell = board.get(row, col);
            let mut style = match cell.side() {
                Some(side) => Style::default().fg(side_color(side)),
                None => Style::default().fg(Color::DarkGray),
            };
            if view.winning_run.is_some_and(|run| run.contains(row, col)) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
            } else if last.is_some_and(|p| p.row == row && p.col == col) {
                style = style.add_modifier(Modifier::BOLD);
            }
            let symbol = if cell == Cell::Empty { " . " } else { " ● " };
            row_spans.push(Span::styled(symbol, style));
        }
        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == view.selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new("←/→: Move  |  Enter/1-7: Drop  |  R: Restart  |  M: Mode  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
