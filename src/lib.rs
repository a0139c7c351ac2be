//! Genre Playlist CLI Library
//!
//! This library sorts the liked tracks of a Spotify user into playlists, one
//! per taxonomy class and one per sub-genre bucket. The taxonomy lives in
//! external JSON documents, one per class, and grows as unknown genres are
//! triaged. Runs can be full (create playlists) or incremental (add the tracks
//! liked since the last confirmed run to the playlists that already exist).
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `classification` - Taxonomy, genre resolution, partitioning and sync engine
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loaded from the environment and `.env`
//! - `error` - Error type and exit statuses
//! - `management` - Persisted local state (token, watermark)
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use genrecli::{config, cli};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> genrecli::Res<()> {
//!     config::load_env().await?;
//!     let cfg = config::Config::from_env()?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod classification;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate returns [`Error`], which carries the
/// exit status the CLI reports when the failure reaches `main`.
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loading taxonomy from {}", dir.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist created: {}", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark.
///
/// Unlike a panic this does not stop the program. Fatal errors travel back to
/// `main` as [`Error`] values and are turned into an exit status there.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for per-item failures that are reported and skipped: a malformed
/// taxonomy document, a failed artist lookup, a playlist that could not be
/// created.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
