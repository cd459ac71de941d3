//! Per-date orchestration.
//!
//! A run walks one chart date through these stages:
//!
//! ```text
//! NoChartData     -- scrape (or chart cache hit) -->  ChartReady
//! ChartReady      -- playlist id on record ------->  Done
//!                 -- otherwise ------------------->  NeedsPlaylist
//! NeedsPlaylist   -- ensure token + identity ----->  ReadyToCreate
//! ReadyToCreate   -- create playlist ------------->  PlaylistCreated | Failed
//! PlaylistCreated -- record id, search, populate ->  Done
//! ```
//!
//! The chart cache and the playlist registry are the checkpoints: a later run
//! picks up from whatever they hold. Nothing here retries automatically.

use std::fmt;

use chrono::NaiveDate;

use crate::{
    chart::ChartSource,
    failure, info,
    management::{ChartCache, CredentialStore, PlaylistRegistry},
    spotify::{AuthCodePrompt, BatchReport, Session, SessionConfig, SpotifyApi},
    success, utils, warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NoChartData,
    ChartReady,
    NeedsPlaylist,
    ReadyToCreate,
    PlaylistCreated,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NoChartData => "no chart data",
            Stage::ChartReady => "chart ready",
            Stage::NeedsPlaylist => "needs playlist",
            Stage::ReadyToCreate => "ready to create",
            Stage::PlaylistCreated => "playlist created",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Counts of one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub playlist_id: String,
    pub titles: usize,
    pub matched: usize,
    pub unmatched: Vec<String>,
    pub failed_searches: Vec<String>,
    pub batches: BatchReport,
    /// The playlist exists remotely but its id could not be written down.
    pub unrecorded: bool,
}

impl Summary {
    pub fn has_partial_failure(&self) -> bool {
        !self.unmatched.is_empty()
            || !self.failed_searches.is_empty()
            || !self.batches.is_complete()
            || self.unrecorded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The chart had no titles; nothing to do.
    NoChartData,
    /// A playlist id was already on record for the date.
    AlreadyDone { playlist_id: String },
    /// The run stopped before a playlist could be populated.
    Failed { stage: Stage, reason: String },
    Completed(Summary),
}

impl Outcome {
    /// Whether a strict caller should report this run as not fully successful.
    pub fn is_partial_failure(&self) -> bool {
        match self {
            Outcome::NoChartData | Outcome::AlreadyDone { .. } => false,
            Outcome::Failed { .. } => true,
            Outcome::Completed(summary) => summary.has_partial_failure(),
        }
    }

    pub fn final_stage(&self) -> Stage {
        match self {
            Outcome::NoChartData => Stage::NoChartData,
            Outcome::Failed { .. } => Stage::Failed,
            Outcome::AlreadyDone { .. } | Outcome::Completed(_) => Stage::Done,
        }
    }
}

/// Local collaborators of a run.
pub struct Workflow<C, P> {
    chart: C,
    prompt: P,
    cache: ChartCache,
    registry: PlaylistRegistry,
    store: CredentialStore,
    config: SessionConfig,
}

impl<C: ChartSource, P: AuthCodePrompt> Workflow<C, P> {
    pub fn new(
        chart: C,
        prompt: P,
        cache: ChartCache,
        registry: PlaylistRegistry,
        store: CredentialStore,
        config: SessionConfig,
    ) -> Self {
        Self {
            chart,
            prompt,
            cache,
            registry,
            store,
            config,
        }
    }

    /// Runs the date through every stage that is still pending.
    ///
    /// `api` is only used once the date needs a playlist; dates that are
    /// already recorded or have no chart data cause no remote calls.
    pub async fn run<A: SpotifyApi>(&self, date: NaiveDate, api: A) -> Outcome {
        let key = utils::date_key(date);

        let Some(titles) = self.chart_titles(date, &key).await else {
            info!("No songs found in the chart for {}", key);
            return Outcome::NoChartData;
        };

        let mut registry = match self.registry.load_from_cache().await {
            Ok(registry) => registry,
            Err(e) => {
                return failed(
                    Stage::ChartReady,
                    format!(
                        "cannot read playlist registry {}: {}",
                        self.registry.path().display(),
                        e
                    ),
                );
            }
        };

        if let Some(playlist_id) = registry.get(&key) {
            info!("Playlist for {} already exists in Spotify ({})", key, playlist_id);
            return Outcome::AlreadyDone {
                playlist_id: playlist_id.to_string(),
            };
        }

        let mut session =
            match Session::load(api, self.store.clone(), self.config.clone()).await {
                Ok(session) => session,
                Err(e) => {
                    return failed(
                        Stage::NeedsPlaylist,
                        format!(
                            "cannot load credentials from {}: {}",
                            self.store.path().display(),
                            e
                        ),
                    );
                }
            };

        let token_status = session.ensure_token(&self.prompt).await;
        if !token_status.is_usable() {
            warning!("No usable access token; playlist creation will be refused");
        }
        session.ensure_identity().await;

        let Some(playlist_id) = session.create_playlist(date).await else {
            return failed(Stage::ReadyToCreate, "playlist could not be created".to_string());
        };

        let mut summary = Summary {
            playlist_id: playlist_id.clone(),
            titles: titles.len(),
            ..Summary::default()
        };

        if let Err(e) = registry.set(&key, &playlist_id).await {
            failure!(
                "Failed to record playlist {} for {}; a later run will create another one: {}",
                playlist_id,
                key,
                e
            );
            summary.unrecorded = true;
        }

        info!("Starting the process to add tracks");
        let resolution = session.resolve_tracks(&titles).await;
        summary.matched = resolution.uris.len();
        summary.batches = session.add_tracks(&playlist_id, &resolution.uris).await;
        summary.unmatched = resolution.unmatched;
        summary.failed_searches = resolution.failed;

        if summary.has_partial_failure() {
            warning!(
                "Playlist {} populated with {} of {} songs",
                playlist_id,
                summary.batches.added,
                summary.titles
            );
        } else {
            success!("Playlist {} populated with {} songs", playlist_id, summary.batches.added);
        }

        Outcome::Completed(summary)
    }

    /// Chart cache first, scrape second. `None` when both come up empty.
    async fn chart_titles(&self, date: NaiveDate, key: &str) -> Option<Vec<String>> {
        match self.cache.load(key).await {
            Ok(Some(titles)) if !titles.is_empty() => {
                info!("List of top 100 songs on {} already exists", key);
                return Some(titles);
            }
            Ok(_) => {}
            Err(e) => failure!("Cannot read cached chart for {}: {}", key, e),
        }

        let titles = self.chart.titles(date).await;
        if titles.is_empty() {
            return None;
        }

        if let Err(e) = self.cache.save(key, &titles).await {
            failure!("Failed to cache chart for {}: {}", key, e);
        }
        Some(titles)
    }
}

fn failed(stage: Stage, reason: String) -> Outcome {
    failure!("Run stopped at stage '{}': {}", stage, reason);
    Outcome::Failed { stage, reason }
}
