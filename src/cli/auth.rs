use std::path::Path;

use crate::{
    config::Settings,
    error, info,
    management::CredentialStore,
    spotify::{HttpSpotify, OperatorPrompt, Session, SessionConfig, TokenStatus},
    success, warning,
};

/// Runs the token lifecycle and identity lookup without touching playlists.
///
/// With `reset` the stored access token is dropped first, which forces the
/// authorization-code flow (needed once the refresh token is revoked).
pub async fn auth(settings: &Settings, env_path: &Path, callback: bool, reset: bool) -> bool {
    let api = match HttpSpotify::from_settings(settings) {
        Ok(api) => api,
        Err(e) => error!("Cannot build HTTP client for Spotify: {}", e),
    };

    let store = CredentialStore::new(env_path);
    let mut session = match Session::load(api, store, SessionConfig::from(settings)).await {
        Ok(session) => session,
        Err(e) => error!(
            "Cannot load credentials from {}: {}\nSet CLIENT_ID and CLIENT_SECRET first.",
            env_path.display(),
            e
        ),
    };

    if reset {
        session.clear_access_token().await;
        info!("Stored access token cleared");
    }

    let prompt = OperatorPrompt::from_settings(settings, callback);
    let status = session.ensure_token(&prompt).await;
    match status {
        TokenStatus::Valid => success!("Access token is valid"),
        TokenStatus::Refreshed | TokenStatus::Acquired => {}
        TokenStatus::Unavailable => {
            warning!("No usable access token");
            return false;
        }
    }

    if session.ensure_identity().await {
        if let Some(user_id) = session.user_id() {
            success!("Authorized as {}", user_id);
        }
        true
    } else {
        false
    }
}
