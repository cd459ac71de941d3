use crate::{
    config::{self, Pacing, Settings},
    error::ApiError,
    failure,
    management::{
        CredentialStore, Credentials, KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN, KEY_USER_ID,
        StoreError,
    },
};

use super::SpotifyApi;

/// OAuth and pacing parameters of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub authorize_url: String,
    pub redirect_uri: String,
    pub scope: String,
    pub pacing: Pacing,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            authorize_url: config::DEFAULT_AUTH_URL.to_string(),
            redirect_uri: config::DEFAULT_REDIRECT_URI.to_string(),
            scope: config::DEFAULT_SCOPE.to_string(),
            pacing: Pacing::default(),
        }
    }
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            authorize_url: settings.endpoints.authorize.clone(),
            redirect_uri: settings.redirect_uri.clone(),
            scope: settings.scope.clone(),
            pacing: settings.pacing,
        }
    }
}

/// One authenticated conversation with Spotify.
///
/// The session owns the credential set for the duration of a run. Tokens and
/// the user id only change through the setters below, which write the store
/// first and then replace the in-memory values together.
pub struct Session<A> {
    api: A,
    store: CredentialStore,
    credentials: Credentials,
    config: SessionConfig,
}

impl<A: SpotifyApi> Session<A> {
    pub fn new(
        api: A,
        store: CredentialStore,
        credentials: Credentials,
        config: SessionConfig,
    ) -> Self {
        Self {
            api,
            store,
            credentials,
            config,
        }
    }

    /// Builds a session from whatever the credential store holds.
    pub async fn load(
        api: A,
        store: CredentialStore,
        config: SessionConfig,
    ) -> Result<Self, StoreError> {
        let credentials = store.load().await?;
        Ok(Self::new(api, store, credentials, config))
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credentials.access_token.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.credentials.user_id.as_deref()
    }

    pub(crate) fn require_token(&self) -> Result<String, ApiError> {
        self.access_token()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Auth("no access token on record".to_string()))
    }

    pub(crate) fn require_user_id(&self) -> Result<String, ApiError> {
        self.user_id()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Auth("no user id on record".to_string()))
    }

    /// Stores a new access token and, when the response carried one, a new
    /// refresh token.
    pub async fn set_tokens(&mut self, access_token: String, refresh_token: Option<String>) {
        let mut pairs = vec![(KEY_ACCESS_TOKEN, access_token.as_str())];
        if let Some(refresh) = refresh_token.as_deref() {
            pairs.push((KEY_REFRESH_TOKEN, refresh));
        }
        if let Err(e) = self.store.save_all(&pairs).await {
            failure!(
                "Failed to save tokens to {}: {}",
                self.store.path().display(),
                e
            );
        }

        self.credentials.access_token = Some(access_token);
        if refresh_token.is_some() {
            self.credentials.refresh_token = refresh_token;
        }
    }

    pub async fn set_user_id(&mut self, user_id: String) {
        if let Err(e) = self.store.save(KEY_USER_ID, &user_id).await {
            failure!(
                "Failed to save user id to {}: {}",
                self.store.path().display(),
                e
            );
        }
        self.credentials.user_id = Some(user_id);
    }

    /// Forgets the access token so the next `ensure_token` runs the
    /// authorization-code flow again.
    pub async fn clear_access_token(&mut self) {
        if let Err(e) = self.store.save(KEY_ACCESS_TOKEN, "").await {
            failure!(
                "Failed to clear access token in {}: {}",
                self.store.path().display(),
                e
            );
        }
        self.credentials.access_token = None;
    }
}
