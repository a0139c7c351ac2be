use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::Pacing;
use crate::{
    Error, Res,
    spotify::{MusicService, fetch_playlist_items},
    types::{PlaylistItem, PlaylistSummary},
    utils, warning,
};

/// Name marker of the playlists this tool creates.
pub const AUTO_MARKER: &str = "(auto)";

/// Name fragments that suggest a playlist was generated rather than curated.
pub const SUSPECT_KEYWORDS: [&str; 7] = [
    "auto",
    "automatic",
    "generated",
    "spotify",
    "daily",
    "weekly",
    "discover",
];

/// Fragments looked for by the `check` command.
pub const CHECK_KEYWORDS: [&str; 2] = [AUTO_MARKER, "mix"];

/// Case-insensitive test on playlist names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePredicate {
    Contains(String),
    AnyOf(Vec<String>),
}

impl NamePredicate {
    pub fn marker() -> Self {
        NamePredicate::Contains(AUTO_MARKER.to_string())
    }

    pub fn any_of<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NamePredicate::AnyOf(keywords.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self {
            NamePredicate::Contains(needle) => name.contains(&needle.to_lowercase()),
            NamePredicate::AnyOf(needles) => needles
                .iter()
                .any(|needle| name.contains(&needle.to_lowercase())),
        }
    }
}

/// Playlists owned by `user_id`. Every mutating path goes through this.
pub fn filter_owned<'a, I>(playlists: I, user_id: &str) -> Vec<PlaylistSummary>
where
    I: IntoIterator<Item = &'a PlaylistSummary>,
{
    playlists
        .into_iter()
        .filter(|p| p.owner_id == user_id)
        .cloned()
        .collect()
}

pub fn filter_by_name<'a, I>(playlists: I, predicate: &NamePredicate) -> Vec<PlaylistSummary>
where
    I: IntoIterator<Item = &'a PlaylistSummary>,
{
    playlists
        .into_iter()
        .filter(|p| predicate.matches(&p.name))
        .cloned()
        .collect()
}

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// The calendar month containing `day`, in UTC.
    pub fn month(day: NaiveDate) -> Res<Self> {
        let invalid = || Error::InvalidInput(format!("no calendar month for {day}"));

        let first = day.with_day(1).ok_or_else(invalid)?;
        let next = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        }
        .ok_or_else(invalid)?;

        Ok(Self {
            start: first.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc(),
            end: next.and_hms_opt(0, 0, 0).ok_or_else(invalid)?.and_utc(),
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Earliest `added_at` among `items`, ignoring items without one.
pub fn earliest_added(items: &[PlaylistItem]) -> Option<DateTime<Utc>> {
    items.iter().filter_map(|i| i.added_at).min()
}

/// Earliest and latest `added_at` among `items`.
pub fn added_range(items: &[PlaylistItem]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut dates = items.iter().filter_map(|i| i.added_at);
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// How playlists are picked for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionTarget {
    /// Name carries [`AUTO_MARKER`].
    Marker,
    /// First track was added inside the window.
    Window(DateWindow),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionCandidate {
    pub playlist: PlaylistSummary,
    pub first_added: Option<DateTime<Utc>>,
}

/// Owned playlists matching `target`.
///
/// Ownership is checked first, so playlists of other users never become
/// candidates whatever their name or content. Window targeting reads every
/// owned playlist's items; empty playlists and playlists whose items could
/// not be read are left out.
pub async fn find_deletion_candidates<S: MusicService + ?Sized>(
    service: &S,
    playlists: &[PlaylistSummary],
    user_id: &str,
    target: &DeletionTarget,
    pacing: Pacing,
) -> Vec<DeletionCandidate> {
    let owned = filter_owned(playlists, user_id);

    match target {
        DeletionTarget::Marker => filter_by_name(&owned, &NamePredicate::marker())
            .into_iter()
            .map(|playlist| DeletionCandidate {
                playlist,
                first_added: None,
            })
            .collect(),
        DeletionTarget::Window(window) => {
            let pb = utils::progress_bar(owned.len() as u64, "Scanning playlists");
            let mut candidates = Vec::new();

            for playlist in owned {
                pb.inc(1);
                if playlist.track_count == 0 {
                    continue;
                }

                let items = match fetch_playlist_items(service, &playlist.id).await {
                    Ok(items) => items,
                    Err(e) => {
                        warning!("Could not read '{}': {}", playlist.name, e);
                        continue;
                    }
                };
                Pacing::pause(pacing.page).await;

                match earliest_added(&items) {
                    Some(first_added) if window.contains(first_added) => {
                        candidates.push(DeletionCandidate {
                            playlist,
                            first_added: Some(first_added),
                        });
                    }
                    _ => {}
                }
            }

            pb.finish_and_clear();
            candidates
        }
    }
}
