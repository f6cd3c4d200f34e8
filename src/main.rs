use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use connect_four::config::AppConfig;
use connect_four::game::Side;
use connect_four::session::GameMode;
use connect_four::ui::App;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Two players at one keyboard
    Human,
    /// Play against the computer
    Computer,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    /// Red, moves first
    Red,
    /// Yellow, moves second
    Yellow,
}

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Override the game mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Override the side you play against the computer
    #[arg(long, value_enum)]
    side: Option<SideArg>,

    /// Seed the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    if let Some(path) = &cli.log_file {
        init_logging(path, cli.log_level)?;
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(mode) = cli.mode {
        config.game.mode = match mode {
            ModeArg::Human => GameMode::HumanVsHuman,
            ModeArg::Computer => GameMode::HumanVsOpponent,
        };
    }
    if let Some(side) = cli.side {
        config.game.human_side = match side {
            SideArg::Red => Side::PlayerA,
            SideArg::Yellow => Side::PlayerB,
        };
    }
    if cli.seed.is_some() {
        config.opponent.seed = cli.seed;
    }

    run(&config).context("running terminal UI")
}

fn init_logging(path: &Path, level: tracing::Level) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn run(config: &AppConfig) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(config);
    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
