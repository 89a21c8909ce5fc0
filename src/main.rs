mod cli;
mod config;
mod error;
mod kanban_board;
mod logging;
mod store;
mod task;
mod ui;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, process::ExitCode};
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::kanban_board::KanbanBoard;
use crate::store::{SqliteStore, TaskRepository};
use crate::ui::App;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "exiting with error");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    logging::init(&config.logging);

    let store = SqliteStore::new(&config.database.path);
    store.initialize()?;
    info!(db = %store.path().display(), "store initialized");

    match cli.command {
        Some(command) => cli::run(&store, command, &mut io::stdout().lock()),
        None => run_board(&store),
    }
}

fn run_board(store: &SqliteStore) -> Result<()> {
    let mut app = App::new(KanbanBoard::load(store)?);

    // Terminal setup
    enable_raw_mode()?;
    let _restore = TerminalGuard::new(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app, store);
    terminal.show_cursor()?;
    result
}

/// Leaves raw mode and the alternate screen. Errors are ignored since this
/// also runs while unwinding from a failed setup.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Runs `restore` when dropped, on every exit path out of the board.
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}
