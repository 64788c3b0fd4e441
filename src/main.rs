//! games-admin - Games Catalog Admin
//!
//! A vim-style TUI for browsing, editing and deleting the records of a
//! hosted games table.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

mod app;
mod auth;
mod catalog;
mod form;
mod input;
mod logging;
mod remote;
mod router;
mod tasks;
mod ui;

use app::{App, AppConfig, Overrides};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
use remote::HttpStore;

#[derive(Debug, Parser)]
#[command(name = "games-admin", version, about = "Admin console for a hosted games catalog")]
struct Cli {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the hosted backend
    #[arg(long)]
    url: Option<String>,

    /// Public (anon) API key
    #[arg(long)]
    anon_key: Option<String>,

    /// Table holding the games
    #[arg(long)]
    table: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log filter, e.g. "debug" or "games_admin=trace"
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Self {
            api_url: cli.url,
            anon_key: cli.anon_key,
            table: cli.table,
            request_timeout_secs: cli.timeout,
            log_level: cli.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.take().as_deref()).context("Failed to load configuration")?;
    config.apply(cli.into());

    let _guard = logging::init(&config)?;

    let store = HttpStore::new(config.store_config()?).context("Failed to create HTTP client")?;
    let mut app = App::new(config, Arc::new(store));

    install_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();
    // Terminal polling blocks this worker
    let result = tokio::task::block_in_place(|| run_app(&mut terminal, &mut app));
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "terminal loop failed");
    }
    info!("exiting");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> anyhow::Result<()> {
    loop {
        app.process_events();

        terminal.draw(|frame| {
            app.render(frame);
        })?;

        if event::poll(POLL_INTERVAL)? {
            handle_event(app, event::read()?);
            // Drain whatever else is buffered before the next frame
            while event::poll(Duration::ZERO)? {
                handle_event(app, event::read()?);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Restores the terminal before the default hook prints the panic.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        error!(%info, "panic");
        default_hook(info);
    }));
}

fn handle_event(app: &mut App, event: Event) {
    if let Event::Key(key) = event {
        app.handle_key_event(key);
    }
}
