//! Error type shared by every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GuestListError>;

#[derive(Debug, Error)]
pub enum GuestListError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to load font '{}': {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
