use chrono::NaiveDate;
use tokio::time::sleep;

use crate::{
    error::ApiError,
    failure, success,
    types::{AddTrackToPlaylistRequest, CreatePlaylistRequest},
    utils,
};

use super::{Session, SpotifyApi};

/// Most uris Spotify accepts in one add-tracks call.
pub const BATCH_CEILING: usize = 100;

/// What happened to the batches of one `add_tracks` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Batches attempted, failed ones included.
    pub batches: usize,
    /// Tracks in batches the API accepted.
    pub added: usize,
    /// Zero-based indices of rejected batches.
    pub failed_batches: Vec<usize>,
    /// Tracks in rejected batches.
    pub failed_tracks: usize,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty()
    }
}

impl<A: SpotifyApi> Session<A> {
    /// Creates the private playlist for `date` and returns its id.
    ///
    /// Every call that reaches the API creates a new playlist. Callers check
    /// the playlist registry first; nothing here guards against duplicates.
    pub async fn create_playlist(&self, date: NaiveDate) -> Option<String> {
        match self.try_create_playlist(date).await {
            Ok(id) => {
                success!("Playlist '{}' created", utils::playlist_name(date));
                Some(id)
            }
            Err(e) => {
                failure!("Failed to create playlist: {}", e);
                None
            }
        }
    }

    async fn try_create_playlist(&self, date: NaiveDate) -> Result<String, ApiError> {
        let token = self.require_token()?;
        let user_id = self.require_user_id()?;
        let request = CreatePlaylistRequest {
            name: utils::playlist_name(date),
            description: utils::playlist_description(date),
            public: false,
        };

        let response = self
            .api()
            .create_playlist(&token, &user_id, &request)
            .await?;
        if response.id.is_empty() {
            return Err(ApiError::Malformed {
                endpoint: "create playlist".to_string(),
                field: "id",
            });
        }
        Ok(response.id)
    }

    /// Appends `uris` to the playlist in batches of [`BATCH_CEILING`].
    ///
    /// Batches go out one after another in order, each attempted once. A
    /// rejected batch is logged and recorded in the report; the following
    /// batches are still sent and accepted ones are never rolled back.
    pub async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        if uris.is_empty() {
            return report;
        }

        let token = match self.require_token() {
            Ok(token) => token,
            Err(e) => {
                failure!("Cannot add tracks to playlist: {}", e);
                report.batches = uris.len().div_ceil(BATCH_CEILING);
                report.failed_batches = (0..report.batches).collect();
                report.failed_tracks = uris.len();
                return report;
            }
        };

        sleep(self.config().pacing.batch_delay).await;

        for (index, chunk) in uris.chunks(BATCH_CEILING).enumerate() {
            report.batches += 1;
            let request = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
            };

            match self.api().add_tracks(&token, playlist_id, &request).await {
                Ok(_) => {
                    report.added += chunk.len();
                    success!("Added {} tracks to playlist", chunk.len());
                }
                Err(e) => {
                    report.failed_batches.push(index);
                    report.failed_tracks += chunk.len();
                    failure!("Failed to add tracks to playlist (batch {}): {}", index + 1, e);
                }
            }
        }

        report
    }
}
