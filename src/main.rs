//! Terminal recreations of two app UI interactions.
//!
//! `Today` shows a list of cards that morph into a full-screen detail
//! surface and back; `Browse` shows a scrolling column of shelves under a
//! header that fades out as the content scrolls.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{AppState, Screen},
};
use crate::config::AppConfig;
use crate::core::catalog::Catalog;
use crate::ui::screen;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Card morph and fading header demos")]
struct Cli {
    /// Screen shown at startup.
    #[arg(long, value_enum, default_value_t = Screen::Today)]
    screen: Screen,

    /// Number of cards on the Today screen.
    #[arg(long, default_value_t = 5)]
    cards: usize,

    /// Rows of scrolling over which the browse header fades (overrides config).
    #[arg(long)]
    fade_distance: Option<f64>,

    /// Animation tick interval in milliseconds.
    #[arg(long, default_value_t = 33)]
    tick_ms: u64,

    /// Write tracing output to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective config file and exit.
    #[arg(long)]
    print_config: bool,

    /// Save the effective config to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

type Tui = Terminal<CrosstermBackend<Stderr>>;

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut user_config = AppConfig::load();
    if let Some(distance) = cli.fade_distance {
        user_config.fade_distance = if distance.is_finite() {
            distance.clamp(1.0, 200.0)
        } else {
            config::DEFAULT_FADE_DISTANCE
        };
    }

    if cli.print_config {
        print!("{}", user_config.serialise());
        return Ok(());
    }
    if cli.write_config {
        user_config.save()?;
        println!("wrote {}", config::config_path().display());
        return Ok(());
    }

    let date_label = chrono::Local::now().format("%A, %B %-d").to_string();
    let catalog = Catalog::with_card_count(cli.cards);
    let mut state = AppState::new(catalog, user_config, cli.screen, date_label);
    let tick = Duration::from_millis(cli.tick_ms.max(1));

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state, tick).await;

    // ── teardown ──────────────────────────────────────────────
    // Restore the terminal even when the loop failed.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(terminal: &mut Tui, state: &mut AppState, tick: Duration) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| screen::draw(frame, state))?;

        // Report what this frame showed back to the transition machine
        // before any new input is handled.
        handler::dispatch_lifecycle(state);

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize(w, h) => {
                        tracing::debug!(w, h, "terminal resized");
                    }
                }
            }

            _ = ticker.tick() => handler::on_tick(state),
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
