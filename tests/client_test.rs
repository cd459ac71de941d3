use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use chartlist::{
    config::Endpoints,
    error::ApiError,
    server,
    spotify::{HttpSpotify, SpotifyApi},
    types::{AddTrackToPlaylistRequest, AuthCallback, CreatePlaylistRequest},
};
use serde_json::{Value, json};

/// One request as the stub saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    query: Option<String>,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Seen>>>;

async fn stub(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header_value(header::AUTHORIZATION);
    log.lock().unwrap().push(Seen {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: authorization.clone(),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });

    let authorized = authorization.as_deref() == Some("Bearer good");
    match (method.as_str(), uri.path()) {
        ("POST", "/api/token") => Json(json!({
            "access_token": "fresh",
            "token_type": "Bearer",
            "scope": "playlist-modify-private user-read-private",
            "expires_in": 3600
        }))
        .into_response(),
        ("GET", "/v1/me") if authorized => {
            Json(json!({ "id": "user-1", "display_name": "Tester" })).into_response()
        }
        ("GET", "/v1/me") => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
        )
            .into_response(),
        ("GET", "/v1/search") => Json(json!({
            "tracks": {
                "items": [
                    { "id": "t1", "name": "Rock & Roll", "uri": "spotify:track:t1" },
                    { "id": "t2", "name": "Rock & Roll (Live)", "uri": "spotify:track:t2" }
                ]
            }
        }))
        .into_response(),
        ("POST", "/v1/users/user-1/playlists") => (
            StatusCode::CREATED,
            Json(json!({ "id": "pl_1", "name": "2024-08-03 / Top 100 Songs" })),
        )
            .into_response(),
        ("POST", "/v1/playlists/broken/tracks") => {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
        ("POST", path) if path.starts_with("/v1/playlists/") => (
            StatusCode::CREATED,
            Json(json!({ "snapshot_id": "snap-1" })),
        )
            .into_response(),
        _ => (StatusCode::FORBIDDEN, "forbidden").into_response(),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spotify_stub() -> (HttpSpotify, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let addr = serve(Router::new().fallback(stub).with_state(Arc::clone(&log))).await;

    let base = format!("http://{}", addr);
    let endpoints = Endpoints {
        authorize: format!("{}/authorize", base),
        token: format!("{}/api/token", base),
        api: format!("{}/v1", base),
    };
    let api = HttpSpotify::new(endpoints, Duration::from_secs(5)).unwrap();
    (api, log)
}

fn last(log: &Log) -> Seen {
    log.lock().unwrap().last().cloned().unwrap()
}

#[tokio::test]
async fn test_token_request_is_form_encoded() {
    let (api, log) = spotify_stub().await;

    let response = api
        .request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", "r"),
            ("client_id", "client-123"),
            ("client_secret", "secret-456"),
        ])
        .await
        .unwrap();

    assert_eq!(response.access_token, "fresh");
    assert_eq!(response.refresh_token, None);
    assert_eq!(response.expires_in, Some(3600));

    let seen = last(&log);
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/api/token");
    assert_eq!(
        seen.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        seen.body,
        "grant_type=refresh_token&refresh_token=r&client_id=client-123&client_secret=secret-456"
    );
    assert_eq!(seen.authorization, None);
}

#[tokio::test]
async fn test_token_check_sends_bearer_and_reads_status() {
    let (api, log) = spotify_stub().await;

    assert!(api.probe("good").await.unwrap());
    assert_eq!(last(&log).authorization.as_deref(), Some("Bearer good"));

    assert!(!api.probe("stale").await.unwrap());
    let seen = last(&log);
    assert_eq!(seen.path, "/v1/me");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer stale"));
}

#[tokio::test]
async fn test_current_user_maps_rejection_to_status_error() {
    let (api, _log) = spotify_stub().await;

    let profile = api.current_user("good").await.unwrap();
    assert_eq!(profile.id, "user-1");

    let err = api.current_user("stale").await.unwrap_err();
    match err {
        ApiError::Status {
            endpoint,
            status,
            body,
        } => {
            assert!(endpoint.ends_with("/v1/me"));
            assert_eq!(status, 401);
            assert!(body.contains("The access token expired"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_search_query_is_encoded() {
    let (api, log) = spotify_stub().await;

    let response = api.search_tracks("good", "Rock & Roll #1").await.unwrap();

    let uris: Vec<String> = response
        .tracks
        .unwrap()
        .items
        .into_iter()
        .map(|t| t.uri)
        .collect();
    assert_eq!(uris, vec!["spotify:track:t1", "spotify:track:t2"]);

    let seen = last(&log);
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/v1/search");
    assert_eq!(seen.query.as_deref(), Some("q=Rock+%26+Roll+%231&type=track"));
    assert_eq!(seen.authorization.as_deref(), Some("Bearer good"));
}

#[tokio::test]
async fn test_create_playlist_posts_json_body() {
    let (api, log) = spotify_stub().await;
    let request = CreatePlaylistRequest {
        name: "2024-08-03 / Top 100 Songs".to_string(),
        description: "Top 100 songs on 2024-08-03".to_string(),
        public: false,
    };

    let response = api.create_playlist("good", "user-1", &request).await.unwrap();
    assert_eq!(response.id, "pl_1");

    let seen = last(&log);
    assert_eq!(seen.path, "/v1/users/user-1/playlists");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(
        body,
        json!({
            "name": "2024-08-03 / Top 100 Songs",
            "description": "Top 100 songs on 2024-08-03",
            "public": false
        })
    );

    let err = api
        .create_playlist("good", "someone-else", &request)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_add_tracks_reports_server_failure() {
    let (api, log) = spotify_stub().await;
    let request = AddTrackToPlaylistRequest {
        uris: vec!["spotify:track:t1".to_string(), "spotify:track:t2".to_string()],
    };

    let response = api.add_tracks("good", "pl_1", &request).await.unwrap();
    assert_eq!(response.snapshot_id.as_deref(), Some("snap-1"));
    let body: Value = serde_json::from_str(&last(&log).body).unwrap();
    assert_eq!(body, json!({ "uris": ["spotify:track:t1", "spotify:track:t2"] }));

    let err = api.add_tracks("good", "broken", &request).await.unwrap_err();
    match err {
        ApiError::Status {
            endpoint,
            status,
            body,
        } => {
            assert!(endpoint.ends_with("/v1/playlists/broken/tracks"));
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoints = Endpoints {
        authorize: String::new(),
        token: format!("http://{}/api/token", addr),
        api: format!("http://{}/v1", addr),
    };
    let api = HttpSpotify::new(endpoints, Duration::from_secs(2)).unwrap();

    let err = api.probe("good").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_callback_records_code_and_error() {
    let state = Arc::new(tokio::sync::Mutex::new(AuthCallback::default()));
    let addr = serve(server::router(Arc::clone(&state))).await;
    let client = reqwest::Client::new();

    let page = client
        .get(format!("http://{}/callback?code=AQBx12", addr))
        .send()
        .await
        .unwrap();
    assert!(page.status().is_success());
    assert!(page.text().await.unwrap().contains("Authorization received"));
    assert_eq!(state.lock().await.code.as_deref(), Some("AQBx12"));

    let health: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["code_received"], true);

    let denied = Arc::new(tokio::sync::Mutex::new(AuthCallback::default()));
    let addr = serve(server::router(Arc::clone(&denied))).await;
    client
        .get(format!("http://{}/callback?error=access_denied", addr))
        .send()
        .await
        .unwrap();
    let recorded = denied.lock().await;
    assert_eq!(recorded.error.as_deref(), Some("access_denied"));
    assert_eq!(recorded.code, None);
}
