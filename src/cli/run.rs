use std::{io::Write, path::Path};

use chrono::NaiveDate;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    chart::BillboardChart,
    config::Settings,
    error,
    management::{ChartCache, CredentialStore, PlaylistRegistry},
    spotify::{HttpSpotify, OperatorPrompt, SessionConfig},
    utils,
    workflow::{Outcome, Workflow},
};

/// Runs the chart-to-playlist workflow for one date.
///
/// The date comes from `--date` or, when omitted, from a prompt.
pub async fn run(
    settings: &Settings,
    env_path: &Path,
    date: Option<String>,
    callback: bool,
) -> Outcome {
    let date = resolve_date(date).await;

    let chart = match BillboardChart::from_settings(settings) {
        Ok(chart) => chart,
        Err(e) => error!("Cannot build HTTP client for chart scraping: {}", e),
    };
    let api = match HttpSpotify::from_settings(settings) {
        Ok(api) => api,
        Err(e) => error!("Cannot build HTTP client for Spotify: {}", e),
    };

    let workflow = Workflow::new(
        chart,
        OperatorPrompt::from_settings(settings, callback),
        ChartCache::new(&settings.data_dir),
        PlaylistRegistry::in_dir(&settings.data_dir),
        CredentialStore::new(env_path),
        SessionConfig::from(settings),
    );

    workflow.run(date, api).await
}

pub(crate) async fn resolve_date(date: Option<String>) -> NaiveDate {
    let raw = match date {
        Some(date) => date,
        None => read_date().await,
    };

    match utils::parse_date(&raw) {
        Ok(date) => date,
        Err(e) => error!("{}", e),
    }
}

async fn read_date() -> String {
    print!("Enter date in the format YYYY-MM-DD: ");
    let _ = std::io::stdout().flush();

    let mut line = String::new();
    if let Err(e) = BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        error!("Cannot read date: {}", e);
    }
    line
}
