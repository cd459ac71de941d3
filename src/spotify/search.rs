use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error::ApiError, failure, success, warning};

use super::{Session, SpotifyApi};

/// Outcome of resolving a list of titles.
///
/// `uris` keeps the relative order of the titles that matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub uris: Vec<String>,
    pub unmatched: Vec<String>,
    pub failed: Vec<String>,
}

impl<A: SpotifyApi> Session<A> {
    /// Looks a single title up and takes the first hit.
    pub async fn resolve_track(&self, title: &str) -> Result<String, ApiError> {
        let token = self.require_token()?;
        let response = self.api().search_tracks(&token, title).await?;
        let tracks = response.tracks.ok_or_else(|| ApiError::Malformed {
            endpoint: "search".to_string(),
            field: "tracks",
        })?;

        tracks
            .items
            .into_iter()
            .next()
            .map(|track| track.uri)
            .ok_or_else(|| ApiError::NotFound(title.to_string()))
    }

    /// Resolves every title, one search call each, in order.
    ///
    /// Titles without a match and titles whose search failed are logged and
    /// left out; they never stop the remaining lookups.
    pub async fn resolve_tracks(&self, titles: &[String]) -> Resolution {
        let mut resolution = Resolution::default();

        if let Err(e) = self.require_token() {
            failure!("Cannot search tracks: {}", e);
            resolution.failed = titles.to_vec();
            return resolution;
        }

        let pb = ProgressBar::new(titles.len() as u64);
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg} [{pos}/{len}]") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message("Searching tracks...");

        for title in titles {
            match self.resolve_track(title).await {
                Ok(uri) => resolution.uris.push(uri),
                Err(ApiError::NotFound(_)) => {
                    pb.suspend(|| warning!("No tracks found for '{}'", title));
                    resolution.unmatched.push(title.clone());
                }
                Err(e) => {
                    pb.suspend(|| failure!("Request failed for track '{}': {}", title, e));
                    resolution.failed.push(title.clone());
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        success!(
            "Retrieved URIs for {} of {} tracks",
            resolution.uris.len(),
            titles.len()
        );
        resolution
    }
}
