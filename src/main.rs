use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use minimax_connect_four::ai::Difficulty;
use minimax_connect_four::config::AppConfig;
use minimax_connect_four::ui::{App, Opponent};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

/// Play Connect Four against a minimax opponent in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against the computer")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Override the opponent difficulty
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Override the search depth limit
    #[arg(long)]
    depth: Option<usize>,

    /// Which player the computer controls (1 moves first)
    #[arg(long)]
    ai_player: Option<u8>,

    /// Computer opponent
    #[arg(long, value_enum, default_value = "minimax")]
    opponent: Opponent,

    /// Log file; the terminal is owned by the UI
    #[arg(long, default_value = "connect_four.log")]
    log_file: PathBuf,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml().context("serializing default config")?);
        return Ok(());
    }

    init_logging(&cli.log_file)?;

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(difficulty) = cli.difficulty {
        config.ai.difficulty = difficulty;
    }
    if let Some(depth) = cli.depth {
        config.search.depth_limit = depth;
    }
    if let Some(ai_player) = cli.ai_player {
        config.game.ai_player = ai_player;
    }
    config.validate().context("invalid configuration")?;

    info!(
        difficulty = %config.ai.difficulty,
        depth = config.search.depth_limit,
        opponent = cli.opponent.name(),
        "starting game"
    );

    run(App::new(config, cli.opponent)).context("terminal UI failed")
}

fn init_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
