//! Configuration management for chartlist.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. The same `.env` file doubles as the
//! credential store: client credentials are written there by the operator and
//! tokens plus the user id are written back by the token lifecycle.
//!
//! Settings (endpoints, delays, timeouts, paths) are resolved in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (or the one given on the CLI)
//! 3. Application defaults
//!
//! Credentials are the exception: the credential store reads the `.env` file
//! first and only falls back to the environment, because tokens are rewritten
//! in the file during a run while the environment keeps the startup values.

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_SCOPE: &str = "playlist-modify-private user-read-private";
pub const DEFAULT_CHART_URL: &str = "https://www.billboard.com/charts/hot-100";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IDENTITY_DELAY_MS: u64 = 1_000;
const DEFAULT_BATCH_DELAY_MS: u64 = 5_000;
const DEFAULT_CALLBACK_WAIT_SECS: u64 = 120;

/// Loads environment variables from the credential `.env` file.
///
/// Without an explicit path the file lives in the platform-specific local
/// data directory under `chartlist/.env`:
/// - Linux: `~/.local/share/chartlist/.env`
/// - macOS: `~/Library/Application Support/chartlist/.env`
/// - Windows: `%LOCALAPPDATA%/chartlist/.env`
///
/// A missing file is not an error; the parent directory is created so the
/// credential store can write to it later. Returns the path that was used.
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created or an
/// existing file cannot be parsed.
pub async fn load_env(path: Option<PathBuf>) -> Result<PathBuf, String> {
    let path = path.unwrap_or_else(default_env_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(path)
}

pub fn default_env_path() -> PathBuf {
    data_dir().join(".env")
}

/// Directory for the chart cache, the playlist registry and the `.env` file.
///
/// `CHARTLIST_DATA_DIR` overrides the platform default.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var("CHARTLIST_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("chartlist");
    path
}

/// Remote endpoints used by the Spotify client.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize: String,
    pub token: String,
    pub api: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            authorize: env_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token: env_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api: env_or("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
        }
    }

    pub fn me(&self) -> String {
        format!("{}/me", self.api)
    }

    pub fn search(&self) -> String {
        format!("{}/search", self.api)
    }

    pub fn user_playlists(&self, user_id: &str) -> String {
        format!("{}/users/{}/playlists", self.api, user_id)
    }

    pub fn playlist_tracks(&self, playlist_id: &str) -> String {
        format!("{}/playlists/{}/tracks", self.api, playlist_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize: DEFAULT_AUTH_URL.to_string(),
            token: DEFAULT_TOKEN_URL.to_string(),
            api: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Fixed delays that space out bursts of calls to the rate-limited API.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Before the identity lookup that follows token acquisition.
    pub identity_delay: Duration,
    /// Before the first add-tracks batch that follows the search burst.
    pub batch_delay: Duration,
}

impl Pacing {
    pub fn from_env() -> Self {
        Self {
            identity_delay: Duration::from_millis(env_u64(
                "CHARTLIST_IDENTITY_DELAY_MS",
                DEFAULT_IDENTITY_DELAY_MS,
            )),
            batch_delay: Duration::from_millis(env_u64(
                "CHARTLIST_BATCH_DELAY_MS",
                DEFAULT_BATCH_DELAY_MS,
            )),
        }
    }

    /// No delays at all, for tests and dry environments.
    pub fn none() -> Self {
        Self {
            identity_delay: Duration::ZERO,
            batch_delay: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            identity_delay: Duration::from_millis(DEFAULT_IDENTITY_DELAY_MS),
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
        }
    }
}

/// Everything the workflow needs besides credentials.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoints: Endpoints,
    pub redirect_uri: String,
    pub scope: String,
    pub pacing: Pacing,
    pub http_timeout: Duration,
    pub chart_url: String,
    pub server_address: String,
    pub callback_wait: Duration,
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            endpoints: Endpoints::from_env(),
            redirect_uri: env_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: env_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            pacing: Pacing::from_env(),
            http_timeout: Duration::from_secs(env_u64(
                "CHARTLIST_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
            chart_url: env_or("CHARTLIST_CHART_URL", DEFAULT_CHART_URL)
                .trim_end_matches('/')
                .to_string(),
            server_address: env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            callback_wait: Duration::from_secs(env_u64(
                "CHARTLIST_CALLBACK_WAIT_SECS",
                DEFAULT_CALLBACK_WAIT_SECS,
            )),
            data_dir: data_dir(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
