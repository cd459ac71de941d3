//! # Spotify Integration Module
//!
//! This module is the integration layer between chartlist and the Spotify Web
//! API. It covers the OAuth2 token lifecycle, the account lookup, track search
//! and playlist population.
//!
//! ## Architecture
//!
//! ```text
//! Workflow (per date)
//!          ↓
//! Session (credentials + pacing, one per run)
//!     ├── auth      token acquisition, probe, refresh
//!     ├── user      account id discovery
//!     ├── search    title -> track uri
//!     └── playlist  create + batched add
//!          ↓
//! SpotifyApi (HttpSpotify over reqwest, or a fake in tests)
//!          ↓
//! Spotify Web API
//! ```
//!
//! Every remote call answers with `Result<_, ApiError>`. The session methods
//! turn those into log lines plus an absence (`None`, a skipped title, a
//! failed batch in the report) so a single bad call never sinks the run.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - authorization-code exchange and refresh
//! - `GET /me` - liveness probe and account id
//! - `GET /search?q=...&type=track` - track lookup
//! - `POST /users/{user_id}/playlists` - create playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks, at most 100 per call
//!
//! ## Thread Safety
//!
//! Calls are issued strictly one after another. The session is the only
//! holder of the credential set and every call reads the token from it, so a
//! refreshed token is visible to everything that follows.

pub mod auth;
pub mod client;
pub mod playlist;
pub mod search;
pub mod session;
pub mod user;

pub use auth::{AuthCodePrompt, CallbackServerPrompt, OperatorPrompt, StdinPrompt, TokenStatus};
pub use client::HttpSpotify;
pub use playlist::{BATCH_CEILING, BatchReport};
pub use search::Resolution;
pub use session::{Session, SessionConfig};

use crate::{
    error::ApiError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, SearchResponse, TokenResponse, UserProfile,
    },
};

/// The remote calls the session relies on.
///
/// Implementations issue exactly one request per method call and never retry.
#[allow(async_fn_in_trait)]
pub trait SpotifyApi {
    /// Form-encoded POST to the token endpoint.
    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError>;

    /// Authenticated `GET /me`; `Ok(true)` only for HTTP 200.
    async fn probe(&self, token: &str) -> Result<bool, ApiError>;

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError>;

    async fn search_tracks(&self, token: &str, query: &str) -> Result<SearchResponse, ApiError>;

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ApiError>;

    async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        request: &AddTrackToPlaylistRequest,
    ) -> Result<AddTrackToPlaylistResponse, ApiError>;
}

impl<T: SpotifyApi + ?Sized> SpotifyApi for &T {
    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        (**self).request_token(form).await
    }

    async fn probe(&self, token: &str) -> Result<bool, ApiError> {
        (**self).probe(token).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        (**self).current_user(token).await
    }

    async fn search_tracks(&self, token: &str, query: &str) -> Result<SearchResponse, ApiError> {
        (**self).search_tracks(token, query).await
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ApiError> {
        (**self).create_playlist(token, user_id, request).await
    }

    async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        request: &AddTrackToPlaylistRequest,
    ) -> Result<AddTrackToPlaylistResponse, ApiError> {
        (**self).add_tracks(token, playlist_id, request).await
    }
}
