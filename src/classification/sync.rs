use std::collections::{BTreeMap, HashMap, HashSet};

use super::{DeletionCandidate, Pacing, PlaylistSpec, filter_owned};
use crate::{
    Res, info,
    spotify::{ADD_TRACKS_BATCH, MusicService, fetch_all_playlists, fetch_playlist_items},
    success,
    types::CreatePlaylistRequest,
    utils, warning,
};

/// What happened to one playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Dry run: printed, nothing written.
    Planned { tracks: usize },
    Created { id: String, added: usize },
    Updated { added: usize },
    UpToDate,
    /// No owned playlist carries this name.
    Missing,
    Removed,
    Failed(String),
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::Failed(_) | SyncOutcome::Missing)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Playlist name and outcome, in processing order.
    pub entries: Vec<(String, SyncOutcome)>,
}

impl SyncReport {
    fn push(&mut self, name: &str, outcome: SyncOutcome) {
        self.entries.push((name.to_string(), outcome));
    }

    pub fn outcome(&self, name: &str) -> Option<&SyncOutcome> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    /// Entries that failed or could not be resolved.
    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_failure()).count()
    }

    /// Entries whose remote calls errored. Missing playlists are not counted.
    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, SyncOutcome::Failed(_)))
            .count()
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn tracks_added(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, o)| match o {
                SyncOutcome::Created { added, .. } | SyncOutcome::Updated { added } => *added,
                _ => 0,
            })
            .sum()
    }

    /// `Err(Partial)` when any entry failed.
    pub fn into_result(self) -> Res<Self> {
        match self.failures() {
            0 => Ok(self),
            failed => Err(crate::Error::Partial {
                failed,
                total: self.total(),
            }),
        }
    }
}

/// Applies planned changes to the remote library.
///
/// With `confirm` unset no playlist is created, filled or removed. Create and
/// unfollow then make no remote call at all; update still reads playlists to
/// work out its plan. Calls are issued one at a time, and a failure on one
/// playlist is recorded before the next playlist is attempted.
pub struct SyncExecutor<'a, S: MusicService + ?Sized> {
    service: &'a S,
    pacing: Pacing,
    confirm: bool,
}

impl<'a, S: MusicService + ?Sized> SyncExecutor<'a, S> {
    pub fn new(service: &'a S, pacing: Pacing, confirm: bool) -> Self {
        Self {
            service,
            pacing,
            confirm,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        !self.confirm
    }

    /// Creates one private playlist per [`PlaylistSpec`] and fills it.
    pub async fn create(&self, owner_id: &str, specs: &[PlaylistSpec]) -> SyncReport {
        let mut report = SyncReport::default();

        for spec in specs {
            if self.is_dry_run() {
                info!(
                    "[dry run] would create '{}' with {} track(s)",
                    spec.name,
                    spec.track_uris.len()
                );
                report.push(
                    &spec.name,
                    SyncOutcome::Planned {
                        tracks: spec.track_uris.len(),
                    },
                );
                continue;
            }

            let outcome = match self.create_one(owner_id, spec).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warning!("Could not create '{}': {}", spec.name, e);
                    SyncOutcome::Failed(e.to_string())
                }
            };
            report.push(&spec.name, outcome);
            Pacing::pause(self.pacing.batch).await;
        }

        report
    }

    async fn create_one(&self, owner_id: &str, spec: &PlaylistSpec) -> Res<SyncOutcome> {
        let request = CreatePlaylistRequest::private(&spec.name, &spec.kind.description());
        let id = self.service.create_playlist(owner_id, &request).await?;
        let added = self.add_in_batches(&id, &spec.track_uris).await?;
        success!("Created '{}' with {} track(s)", spec.name, added);
        Ok(SyncOutcome::Created { id, added })
    }

    /// Adds the missing tracks of `desired` to the owned playlists of the
    /// same name.
    ///
    /// The playlist list is read once. Only tracks not already in the remote
    /// playlist are sent, so running twice adds nothing the second time. A
    /// dry run performs the same reads and reports the residual it would add.
    pub async fn update(
        &self,
        owner_id: &str,
        desired: &BTreeMap<String, Vec<String>>,
    ) -> Res<SyncReport> {
        let mut report = SyncReport::default();
        if desired.is_empty() {
            return Ok(report);
        }

        let pb = utils::spinner("Fetching your playlists...");
        let playlists = fetch_all_playlists(self.service).await;
        pb.finish_and_clear();

        let owned = filter_owned(&playlists?, owner_id);
        // First listed wins when several owned playlists share a name.
        let mut by_name: HashMap<&str, &str> = HashMap::new();
        for p in &owned {
            by_name.entry(p.name.as_str()).or_insert(p.id.as_str());
        }

        for (name, uris) in desired {
            let Some(id) = by_name.get(name.as_str()) else {
                warning!("No playlist named '{}' found, skipping", name);
                report.push(name, SyncOutcome::Missing);
                continue;
            };

            let outcome = match self.update_one(id, uris).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warning!("Could not update '{}': {}", name, e);
                    SyncOutcome::Failed(e.to_string())
                }
            };
            match &outcome {
                SyncOutcome::Planned { tracks } => {
                    info!("[dry run] would add {} track(s) to '{}'", tracks, name)
                }
                SyncOutcome::Updated { added } => {
                    success!("Added {} track(s) to '{}'", added, name)
                }
                SyncOutcome::UpToDate => info!("'{}' is already up to date", name),
                _ => {}
            }
            report.push(name, outcome);
            Pacing::pause(self.pacing.batch).await;
        }

        Ok(report)
    }

    async fn update_one(&self, playlist_id: &str, desired: &[String]) -> Res<SyncOutcome> {
        let existing = fetch_playlist_items(self.service, playlist_id).await?;
        let existing: HashSet<String> = existing.into_iter().filter_map(|i| i.uri).collect();

        let residual: Vec<String> = desired
            .iter()
            .filter(|uri| !existing.contains(*uri))
            .cloned()
            .collect();
        if residual.is_empty() {
            return Ok(SyncOutcome::UpToDate);
        }
        if self.is_dry_run() {
            return Ok(SyncOutcome::Planned {
                tracks: residual.len(),
            });
        }

        let added = self.add_in_batches(playlist_id, &residual).await?;
        Ok(SyncOutcome::Updated { added })
    }

    async fn add_in_batches(&self, playlist_id: &str, uris: &[String]) -> Res<usize> {
        let mut added = 0;
        for batch in uris.chunks(ADD_TRACKS_BATCH) {
            self.service.add_tracks(playlist_id, batch).await?;
            added += batch.len();
            Pacing::pause(self.pacing.batch).await;
        }
        Ok(added)
    }

    /// Unfollows the given playlists.
    pub async fn unfollow(&self, candidates: &[DeletionCandidate]) -> SyncReport {
        let mut report = SyncReport::default();

        for candidate in candidates {
            let playlist = &candidate.playlist;
            if self.is_dry_run() {
                info!(
                    "[dry run] would delete '{}' ({} track(s))",
                    playlist.name, playlist.track_count
                );
                report.push(
                    &playlist.name,
                    SyncOutcome::Planned {
                        tracks: playlist.track_count as usize,
                    },
                );
                continue;
            }

            let outcome = match self.service.unfollow_playlist(&playlist.id).await {
                Ok(()) => {
                    success!("Deleted '{}'", playlist.name);
                    SyncOutcome::Removed
                }
                Err(e) => {
                    warning!("Could not delete '{}': {}", playlist.name, e);
                    SyncOutcome::Failed(e.to_string())
                }
            };
            report.push(&playlist.name, outcome);
            Pacing::pause(self.pacing.unfollow).await;
        }

        report
    }
}
