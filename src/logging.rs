use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global subscriber. Output goes to a file because the board owns
/// the terminal; `RUST_LOG` overrides the configured level.
///
/// Logging is skipped, never fatal, when no file can be resolved or opened.
pub fn init(config: &LoggingConfig) {
    let Some(path) = config.resolved_file() else {
        return;
    };
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("taskers: logging disabled, cannot open {}: {err}", path.display());
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
