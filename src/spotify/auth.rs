use std::{
    io::Write,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::Mutex,
};

use crate::{
    config::Settings, error::ApiError, failure, info, server::start_api_server, success,
    types::AuthCallback, utils, warning,
};

use super::{Session, SpotifyApi};

/// Builds the URL the operator opens to grant access.
///
/// The query is assembled verbatim; Spotify accepts the redirect uri and the
/// space-joined scope unencoded and browsers encode them on the way out.
pub fn authorize_url(
    authorize_endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
) -> String {
    format!(
        "{authorize_endpoint}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}"
    )
}

/// Where the one-time authorization code comes from.
#[allow(async_fn_in_trait)]
pub trait AuthCodePrompt {
    /// Shows `auth_url` to the operator and returns the code they obtained,
    /// or `None` if no code arrived.
    async fn authorization_code(&self, auth_url: &str) -> Option<String>;
}

/// Opens the browser and reads the code (or the redirected URL) from stdin.
#[derive(Debug, Clone, Default)]
pub struct StdinPrompt;

impl AuthCodePrompt for StdinPrompt {
    async fn authorization_code(&self, auth_url: &str) -> Option<String> {
        info!("Opening browser for authorization: {}", auth_url);
        if webbrowser::open(auth_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            );
        }

        print!("Enter the authorization code from the redirected URL: ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(_) => utils::extract_auth_code(&line),
            Err(e) => {
                failure!("Cannot read authorization code: {}", e);
                None
            }
        }
    }
}

/// Serves the redirect target locally and picks the code up from Spotify's
/// redirect, so the operator does not have to copy it.
#[derive(Debug, Clone)]
pub struct CallbackServerPrompt {
    pub address: String,
    pub wait: Duration,
}

impl AuthCodePrompt for CallbackServerPrompt {
    async fn authorization_code(&self, auth_url: &str) -> Option<String> {
        let shared_state: Arc<Mutex<AuthCallback>> = Arc::new(Mutex::new(AuthCallback::default()));

        let server_state = Arc::clone(&shared_state);
        let address = self.address.clone();
        let server = tokio::spawn(async move {
            if let Err(e) = start_api_server(&address, server_state).await {
                failure!("Callback server on {} stopped: {}", address, e);
            }
        });

        info!("Opening browser for authorization: {}", auth_url);
        if webbrowser::open(auth_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            );
        }

        let code = wait_for_code(shared_state, self.wait).await;
        server.abort();
        code
    }
}

/// The prompt chosen on the command line.
#[derive(Debug, Clone)]
pub enum OperatorPrompt {
    Stdin(StdinPrompt),
    Callback(CallbackServerPrompt),
}

impl OperatorPrompt {
    pub fn from_settings(settings: &Settings, callback: bool) -> Self {
        if callback {
            OperatorPrompt::Callback(CallbackServerPrompt {
                address: settings.server_address.clone(),
                wait: settings.callback_wait,
            })
        } else {
            OperatorPrompt::Stdin(StdinPrompt)
        }
    }
}

impl AuthCodePrompt for OperatorPrompt {
    async fn authorization_code(&self, auth_url: &str) -> Option<String> {
        match self {
            OperatorPrompt::Stdin(prompt) => prompt.authorization_code(auth_url).await,
            OperatorPrompt::Callback(prompt) => prompt.authorization_code(auth_url).await,
        }
    }
}

async fn wait_for_code(shared_state: Arc<Mutex<AuthCallback>>, max_wait: Duration) -> Option<String> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        {
            let lock = shared_state.lock().await;
            if let Some(code) = &lock.code {
                return Some(code.clone());
            }
            if let Some(error) = &lock.error {
                failure!("Authorization was denied: {}", error);
                return None;
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    failure!("No authorization code received within {}s", max_wait.as_secs());
    None
}

/// What `ensure_token` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// The stored token passed the probe.
    Valid,
    /// The stored token failed the probe and was refreshed.
    Refreshed,
    /// A new token was obtained through the authorization-code flow.
    Acquired,
    /// No usable token; callers that need one have to stop.
    Unavailable,
}

impl TokenStatus {
    pub fn is_usable(self) -> bool {
        !matches!(self, TokenStatus::Unavailable)
    }
}

impl<A: SpotifyApi> Session<A> {
    /// Makes sure a usable access token is on record.
    ///
    /// Without a token the authorization-code flow runs through `prompt`.
    /// With one, a single probe decides whether a refresh is needed. Failures
    /// are logged and leave the previous token state untouched.
    pub async fn ensure_token<P: AuthCodePrompt>(&mut self, prompt: &P) -> TokenStatus {
        let Some(token) = self.access_token().map(str::to_string) else {
            return match self.authorize(prompt).await {
                Ok(()) => TokenStatus::Acquired,
                Err(e) => {
                    failure!("Authorization failed: {}", e);
                    TokenStatus::Unavailable
                }
            };
        };

        if self.validate(&token).await {
            return TokenStatus::Valid;
        }

        match self.refresh().await {
            Ok(()) => TokenStatus::Refreshed,
            Err(e) => {
                failure!("Failed to refresh access token: {}", e);
                TokenStatus::Unavailable
            }
        }
    }

    /// One authenticated probe; true only for HTTP 200.
    pub async fn validate(&self, token: &str) -> bool {
        match self.api().probe(token).await {
            Ok(valid) => valid,
            Err(e) => {
                warning!("Access token probe failed: {}", e);
                false
            }
        }
    }

    pub fn authorize_url(&self) -> String {
        authorize_url(
            &self.config().authorize_url,
            &self.credentials().client_id,
            &self.config().redirect_uri,
            &self.config().scope,
        )
    }

    /// Runs the authorization-code flow: URL, operator, code exchange.
    pub async fn authorize<P: AuthCodePrompt>(&mut self, prompt: &P) -> Result<(), ApiError> {
        let url = self.authorize_url();
        let code = prompt
            .authorization_code(&url)
            .await
            .ok_or_else(|| ApiError::Auth("no authorization code entered".to_string()))?;
        self.exchange_code(&code).await
    }

    pub async fn exchange_code(&mut self, code: &str) -> Result<(), ApiError> {
        let response = {
            let credentials = self.credentials();
            let form = [
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config().redirect_uri.as_str()),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ];
            self.api().request_token(&form).await?
        };

        self.set_tokens(response.access_token, response.refresh_token)
            .await;
        success!("Access and refresh tokens saved");
        Ok(())
    }

    /// Mints a new access token from the stored refresh token.
    ///
    /// A 400/401 answer means the refresh token itself is no longer accepted
    /// and is reported as [`ApiError::Auth`].
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let refresh_token = self
            .credentials()
            .refresh_token
            .clone()
            .ok_or_else(|| ApiError::Auth("no refresh token on record".to_string()))?;

        let response = {
            let credentials = self.credentials();
            let form = [
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ];
            match self.api().request_token(&form).await {
                Ok(response) => response,
                Err(e) if matches!(e.status(), Some(400 | 401)) => {
                    return Err(ApiError::Auth(format!(
                        "refresh token rejected, run `chartlist auth --reset`: {e}"
                    )));
                }
                Err(e) => return Err(e),
            }
        };

        self.set_tokens(response.access_token, response.refresh_token)
            .await;
        success!("Access token refreshed");
        Ok(())
    }
}
