//! Error types shared by every genrecli command.
//!
//! Each variant maps to a distinct process exit status so scripts driving the
//! CLI can tell a missing configuration apart from a network failure or a run
//! that finished with some playlists left behind.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable token. Run `genrecli auth` first.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spotify API error: {0}")]
    Http(#[from] reqwest::Error),

    /// A taxonomy document could not be read back or rewritten.
    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled")]
    Cancelled,

    /// The run completed but some playlists failed or could not be resolved.
    #[error("{failed} of {total} playlist(s) could not be synchronized")]
    Partial { failed: usize, total: usize },
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Auth(_) => 3,
            Error::Io(_) | Error::Json(_) | Error::Taxonomy(_) => 4,
            Error::Http(_) => 5,
            Error::NotFound(_) | Error::InvalidInput(_) => 6,
            Error::Partial { .. } => 7,
            Error::Cancelled => 130,
        }
    }
}
