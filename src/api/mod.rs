//! # API Module
//!
//! HTTP endpoints of the short-lived local server that stands in for the
//! OAuth redirect target (`http://localhost:8888/callback` by default).
//!
//! - [`callback`] - records the authorization code (or the denial) Spotify
//!   redirects the browser with
//! - [`health`] - status and version, handy to check that the port is ours
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use chartlist::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
