//! Configuration management for genrecli.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Instead of reading the environment at
//! every call site, the CLI builds one [`Config`] at startup and passes it to
//! the components that need it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{Error, Res};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SCOPE: &str =
    "user-library-read playlist-read-private playlist-modify-public playlist-modify-private";

/// Returns the local data directory for genrecli.
///
/// `GENRECLI_DATA_DIR` overrides the platform default:
/// - Linux: `~/.local/share/genrecli`
/// - macOS: `~/Library/Application Support/genrecli`
/// - Windows: `%LOCALAPPDATA%/genrecli`
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var("GENRECLI_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("genrecli");
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// Creates the data directory if needed. A missing `.env` file is not an
/// error since every value can also come from the process environment.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file exists
/// but cannot be parsed.
pub async fn load_env() -> Res<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

/// Runtime configuration shared by the Spotify client, the auth flow and the
/// classification engine.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub redirect_uri: String,
    pub server_address: String,
    pub scope: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub data_dir: PathBuf,
    pub genres_dir: PathBuf,
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `SPOTIFY_API_AUTH_CLIENT_ID` is unset,
    /// before any network activity takes place.
    pub fn from_env() -> Res<Self> {
        let client_id = env::var("SPOTIFY_API_AUTH_CLIENT_ID")
            .map_err(|_| Error::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string()))?;
        let data_dir = data_dir();
        let genres_dir = env::var("GENRES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("genres"));

        Ok(Self {
            client_id,
            redirect_uri: var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            server_address: var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            scope: var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            api_url: var_or("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            data_dir,
            genres_dir,
        })
    }

    /// Overrides the taxonomy directory, e.g. from `--genres-dir`.
    pub fn with_genres_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.genres_dir = dir;
        }
        self
    }

    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("cache/token.json")
    }

    pub fn watermark_path(&self) -> PathBuf {
        self.data_dir.join("state/last_update.json")
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
