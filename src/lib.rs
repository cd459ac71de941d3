//! Hot 100 to Spotify playlist library
//!
//! This library scrapes a dated "Hot 100" chart and materializes the listed
//! songs as a private Spotify playlist. It includes the OAuth2 token lifecycle,
//! track search, batched playlist population and the local bookkeeping that
//! lets repeated runs skip dates that were already processed.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `chart` - Chart page scraping
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types for remote API calls
//! - `management` - Local persistence of credentials, charts and playlist ids
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and session
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `workflow` - Per-date orchestration of scrape, auth, search and populate
//!
//! # Example
//!
//! ```
//! use chartlist::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> chartlist::Res<()> {
//!     config::load_env(None).await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod workflow;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI glue where several unrelated error types meet. Library
/// code that talks to Spotify returns [`error::ApiError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Starting authentication process...");
/// info!("Found {} songs", count);
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
/// success!("Playlist created");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red cross and keeps going.
///
/// Used for failed remote calls that the caller degrades around: a title
/// that could not be searched, a batch that was rejected, a token refresh
/// that did not go through.
///
/// # Example
///
/// ```
/// failure!("Request failed for track '{}': {}", title, e);
/// ```
#[macro_export]
macro_rules! failure {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "x".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only the CLI layer uses it, for
/// problems that leave nothing useful to do (unreadable configuration, a
/// malformed date argument).
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No tracks found for '{}'", title);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
