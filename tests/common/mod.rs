#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use chartlist::{
    chart::ChartSource,
    config::Pacing,
    error::ApiError,
    management::{CredentialStore, Credentials},
    spotify::{AuthCodePrompt, Session, SessionConfig, SpotifyApi},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, SearchResponse, TokenResponse, Track, TrackPage, UserProfile,
    },
};
use chrono::NaiveDate;
use tempfile::TempDir;

/// One recorded call against the fake API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Token(Vec<(String, String)>),
    Probe(String),
    CurrentUser(String),
    Search(String),
    CreatePlaylist {
        user_id: String,
        name: String,
        description: String,
        public: bool,
    },
    AddTracks {
        playlist_id: String,
        uris: Vec<String>,
    },
}

/// In-memory stand-in for the Spotify Web API that records every call.
#[derive(Debug, Default)]
pub struct FakeSpotify {
    calls: Mutex<Vec<Call>>,
    /// Tokens for which the probe answers 200.
    pub valid_tokens: HashSet<String>,
    /// Answer of the token endpoint; `None` answers HTTP 400.
    pub token_response: Option<TokenResponse>,
    /// Answer of `GET /me`; `None` answers HTTP 401.
    pub user_id: Option<String>,
    /// Search results by query; unknown queries return zero items.
    pub search_results: HashMap<String, Vec<String>>,
    /// Queries whose search answers HTTP 500.
    pub failing_searches: HashSet<String>,
    /// Answer of create playlist; `None` answers HTTP 403.
    pub playlist_id: Option<String>,
    /// Zero-based add-tracks calls that answer HTTP 502.
    pub failing_batches: HashSet<usize>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn token_calls(&self) -> Vec<Vec<(String, String)>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Token(form) => Some(form),
                _ => None,
            })
            .collect()
    }

    pub fn probe_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Probe(_)))
    }

    pub fn search_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Search(_)))
    }

    pub fn create_count(&self) -> usize {
        self.count(|c| matches!(c, Call::CreatePlaylist { .. }))
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AddTracks { uris, .. } => Some(uris),
                _ => None,
            })
            .collect()
    }

    fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| f(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn status(endpoint: &str, status: u16) -> ApiError {
        ApiError::Status {
            endpoint: endpoint.to_string(),
            status,
            body: String::new(),
        }
    }
}

impl SpotifyApi for FakeSpotify {
    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        self.record(Call::Token(
            form.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self.token_response
            .clone()
            .ok_or_else(|| Self::status("token", 400))
    }

    async fn probe(&self, token: &str) -> Result<bool, ApiError> {
        self.record(Call::Probe(token.to_string()));
        Ok(self.valid_tokens.contains(token))
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        self.record(Call::CurrentUser(token.to_string()));
        self.user_id
            .clone()
            .map(|id| UserProfile {
                id,
                display_name: None,
            })
            .ok_or_else(|| Self::status("me", 401))
    }

    async fn search_tracks(&self, _token: &str, query: &str) -> Result<SearchResponse, ApiError> {
        self.record(Call::Search(query.to_string()));
        if self.failing_searches.contains(query) {
            return Err(Self::status("search", 500));
        }
        let items = self
            .search_results
            .get(query)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|uri| Track {
                id: None,
                name: query.to_string(),
                uri,
            })
            .collect();
        Ok(SearchResponse {
            tracks: Some(TrackPage { items }),
        })
    }

    async fn create_playlist(
        &self,
        _token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, ApiError> {
        self.record(Call::CreatePlaylist {
            user_id: user_id.to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            public: request.public,
        });
        self.playlist_id
            .clone()
            .map(|id| CreatePlaylistResponse {
                id,
                name: request.name.clone(),
            })
            .ok_or_else(|| Self::status("playlists", 403))
    }

    async fn add_tracks(
        &self,
        _token: &str,
        playlist_id: &str,
        request: &AddTrackToPlaylistRequest,
    ) -> Result<AddTrackToPlaylistResponse, ApiError> {
        let index = self.batches().len();
        self.record(Call::AddTracks {
            playlist_id: playlist_id.to_string(),
            uris: request.uris.clone(),
        });
        if self.failing_batches.contains(&index) {
            return Err(Self::status("tracks", 502));
        }
        Ok(AddTrackToPlaylistResponse {
            snapshot_id: Some(format!("snapshot-{}", index)),
        })
    }
}

/// Prompt that hands out a fixed code and counts how often it was asked.
#[derive(Debug, Clone, Default)]
pub struct FakePrompt {
    pub code: Option<String>,
    pub asked: Arc<AtomicUsize>,
    pub last_url: Arc<Mutex<Option<String>>>,
}

impl FakePrompt {
    pub fn with_code(code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl AuthCodePrompt for FakePrompt {
    async fn authorization_code(&self, auth_url: &str) -> Option<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        *self.last_url.lock().unwrap() = Some(auth_url.to_string());
        self.code.clone()
    }
}

/// Chart source with fixed titles that counts scrapes.
#[derive(Debug, Clone, Default)]
pub struct FakeChart {
    pub titles: Vec<String>,
    pub scrapes: Arc<AtomicUsize>,
}

impl FakeChart {
    pub fn new(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|t| t.to_string()).collect(),
            scrapes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn scrapes(&self) -> usize {
        self.scrapes.load(Ordering::SeqCst)
    }
}

impl ChartSource for FakeChart {
    async fn titles(&self, _date: NaiveDate) -> Vec<String> {
        self.scrapes.fetch_add(1, Ordering::SeqCst);
        self.titles.clone()
    }
}

/// Fresh, empty directory that is removed when the returned guard drops.
pub fn temp_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("chartlist-test-{}-", name))
        .tempdir()
        .unwrap()
}

pub fn test_config() -> SessionConfig {
    SessionConfig {
        pacing: Pacing::none(),
        ..SessionConfig::default()
    }
}

pub fn credentials(access_token: Option<&str>, refresh_token: Option<&str>) -> Credentials {
    Credentials {
        client_id: "client-123".to_string(),
        client_secret: "secret-456".to_string(),
        access_token: access_token.map(str::to_string),
        refresh_token: refresh_token.map(str::to_string),
        user_id: None,
    }
}

pub fn session<'a>(
    api: &'a FakeSpotify,
    dir: &Path,
    credentials: Credentials,
) -> Session<&'a FakeSpotify> {
    Session::new(
        api,
        CredentialStore::new(dir.join(".env")),
        credentials,
        test_config(),
    )
}

pub fn token_response(access: &str, refresh: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        scope: None,
        expires_in: Some(3600),
    }
}

pub fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}
