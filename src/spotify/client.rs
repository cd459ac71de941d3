use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::{
    config::{Endpoints, Settings},
    error::ApiError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, SearchResponse, TokenResponse, UserProfile,
    },
};

use super::SpotifyApi;

/// [`SpotifyApi`] over HTTP.
///
/// One `reqwest::Client` is shared by all calls. Every request carries the
/// configured timeout, so a hanging endpoint surfaces as a transport error
/// instead of blocking the run.
#[derive(Debug, Clone)]
pub struct HttpSpotify {
    client: Client,
    endpoints: Endpoints,
}

impl HttpSpotify {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(settings.endpoints.clone(), settings.http_timeout)
    }
}

/// Passes successful responses through and turns the rest into
/// [`ApiError::Status`] carrying the response body for context.
async fn check_status(endpoint: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

impl SpotifyApi for HttpSpotify {
    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        let url = &self.endpoints.token;
        let response = self.client.post(url).form(form).send().await?;
        let response = check_status(url, response).await?;
        Ok(response.json::<TokenResponse>().await?)
    }

    async fn probe(&self, token: &str) -> Result<bool, ApiError> {
        let response = self
            .client
            .get(self.endpoints.me())
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response.status() == StatusCode::OK)
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let url = self.endpoints.me();
        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let response = check_status(&url, response).await?;
        Ok(response.json::<UserProfile>().await?)
    }

    async fn search_tracks(&self, token: &str, query: &str) -> Result<SearchResponse, ApiError> {
        let url = self.endpoints.search();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("type", "track")])
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(&url, response).await?;
        Ok(response.json::<SearchResponse>().await?)
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ApiError> {
        let url = self.endpoints.user_playlists(user_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let response = check_status(&url, response).await?;
        Ok(response.json::<CreatePlaylistResponse>().await?)
    }

    async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        request: &AddTrackToPlaylistRequest,
    ) -> Result<AddTrackToPlaylistResponse, ApiError> {
        let url = self.endpoints.playlist_tracks(playlist_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let response = check_status(&url, response).await?;
        Ok(response.json::<AddTrackToPlaylistResponse>().await?)
    }
}
