use chartlist::{
    chart::parse_titles,
    config::{Endpoints, Pacing},
    spotify::auth::authorize_url,
    types::{AddTrackToPlaylistRequest, CreatePlaylistRequest},
    utils::*,
};
use chrono::NaiveDate;

#[test]
fn test_parse_date() {
    let date = parse_date("2024-08-03").unwrap();
    assert_eq!(date, NaiveDate::from_ymd_opt(2024, 8, 3).unwrap());

    // surrounding whitespace from a prompt is fine
    assert_eq!(parse_date(" 2024-08-03\n").unwrap(), date);

    assert!(parse_date("03/08/2024").is_err());
    assert!(parse_date("2024-02-30").is_err());
    assert!(parse_date("").is_err());
}

#[test]
fn test_playlist_naming() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
    assert_eq!(date_key(date), "2024-01-06");
    assert_eq!(playlist_name(date), "2024-01-06 / Top 100 Songs");
    assert_eq!(playlist_description(date), "Top 100 songs on 2024-01-06");
}

#[test]
fn test_extract_auth_code() {
    assert_eq!(extract_auth_code("AQBx12\n"), Some("AQBx12".to_string()));
    assert_eq!(
        extract_auth_code("http://localhost:8888/callback?code=AQBx12&state=s"),
        Some("AQBx12".to_string())
    );
    assert_eq!(
        extract_auth_code("localhost:8888/callback?code=AQBx12"),
        Some("AQBx12".to_string())
    );
    assert_eq!(
        extract_auth_code("http://localhost:8888/callback?error=access_denied"),
        None
    );
    assert_eq!(extract_auth_code("   "), None);
}

#[test]
fn test_authorize_url_is_verbatim() {
    let url = authorize_url(
        "https://accounts.spotify.com/authorize",
        "cid",
        "http://localhost:8888/callback",
        "playlist-modify-private user-read-private",
    );
    assert_eq!(
        url,
        "https://accounts.spotify.com/authorize?client_id=cid&response_type=code&redirect_uri=http://localhost:8888/callback&scope=playlist-modify-private user-read-private"
    );
}

#[test]
fn test_endpoint_paths() {
    let endpoints = Endpoints::default();
    assert_eq!(endpoints.me(), "https://api.spotify.com/v1/me");
    assert_eq!(endpoints.search(), "https://api.spotify.com/v1/search");
    assert_eq!(
        endpoints.user_playlists("u1"),
        "https://api.spotify.com/v1/users/u1/playlists"
    );
    assert_eq!(
        endpoints.playlist_tracks("p1"),
        "https://api.spotify.com/v1/playlists/p1/tracks"
    );
}

#[test]
fn test_default_pacing() {
    let pacing = Pacing::default();
    assert_eq!(pacing.identity_delay.as_secs(), 1);
    assert_eq!(pacing.batch_delay.as_secs(), 5);
    assert!(Pacing::none().batch_delay.is_zero());
}

#[test]
fn test_request_bodies() {
    let create = CreatePlaylistRequest {
        name: "2024-08-03 / Top 100 Songs".to_string(),
        description: "Top 100 songs on 2024-08-03".to_string(),
        public: false,
    };
    assert_eq!(
        serde_json::to_value(&create).unwrap(),
        serde_json::json!({
            "name": "2024-08-03 / Top 100 Songs",
            "description": "Top 100 songs on 2024-08-03",
            "public": false
        })
    );

    let add = AddTrackToPlaylistRequest {
        uris: vec!["spotify:track:1".to_string()],
    };
    assert_eq!(
        serde_json::to_value(&add).unwrap(),
        serde_json::json!({ "uris": ["spotify:track:1"] })
    );
}

#[test]
fn test_search_response_first_item() {
    let body = r#"{"tracks":{"items":[{"id":"1","name":"A","uri":"spotify:track:1"},{"id":"2","name":"B","uri":"spotify:track:2"}]}}"#;
    let response: chartlist::types::SearchResponse = serde_json::from_str(body).unwrap();
    let first = response.tracks.unwrap().items.into_iter().next().unwrap();
    assert_eq!(first.uri, "spotify:track:1");
}

#[test]
fn test_parse_chart_titles() {
    let html = r#"
        <html><body><ul>
          <li class="o-chart-results-list__item lrv-u-width-100p">
            <ul><li><h3 id="title-of-a-story">
                A Bar Song (Tipsy)
            </h3><span>Shaboozey</span></li></ul>
          </li>
          <li class="lrv-u-width-100p"><div>row without a list</div></li>
          <li class="lrv-u-width-100p">
            <ul><li><h3>Espresso</h3></li><li><h3>ignored</h3></li></ul>
          </li>
          <li class="other"><ul><li><h3>Not a chart row</h3></li></ul></li>
        </ul></body></html>
    "#;

    let titles = parse_titles(html).unwrap();
    assert_eq!(titles, vec!["A Bar Song (Tipsy)", "Espresso"]);
}

#[test]
fn test_parse_chart_titles_empty_page() {
    assert!(parse_titles("<html><body></body></html>").unwrap().is_empty());
}
