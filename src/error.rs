//! Error type shared by the store, the board and both front ends.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskersError {
    /// Task text rejected before it reaches the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any failure opening, reading or writing the task database.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskersError>;

impl TaskersError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
