//! # CLI Module
//!
//! This module provides the command-line interface layer for chartlist. It
//! implements the user-facing commands and wires the real collaborators
//! (HTTP clients, files in the data directory, operator prompts) into the
//! library types.
//!
//! ## Commands
//!
//! - [`run`] - scrape the chart of a date and build its playlist
//! - [`auth`] - only acquire/validate/refresh the token and look up the user id
//! - [`history`] - show which dates already have a playlist
//! - [`chart`] - show the songs of a chart date
//!
//! ## Error Handling Philosophy
//!
//! - **Graceful Degradation**: failed searches and failed batches are logged,
//!   the rest of the run continues
//! - **Hard Stops**: only an empty chart or a failed playlist creation end a
//!   run early
//! - **Exit Codes**: 1 for unusable input/configuration, 2 for partial
//!   failures when `--strict` is given, 0 otherwise
//!
//! ## Usage Patterns
//!
//! ```bash
//! chartlist auth                       # one-time authorization
//! chartlist run --date 2024-08-03      # build the playlist of a date
//! chartlist run                        # prompts for the date
//! chartlist history                    # dates already handled
//! chartlist chart --date 2024-08-03    # songs of that chart
//! ```

mod auth;
mod chart;
mod history;
mod run;

pub use auth::auth;
pub use chart::chart;
pub use history::history;
pub use run::run;
