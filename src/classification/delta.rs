use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use super::{
    GenreIndex, Pacing, Taxonomy,
    partition::{PlaylistKind, candidate_tracks},
};
use crate::{Res, spotify::MusicService, types::SavedTrack, utils};

/// Result of scanning one page of liked tracks against the watermark.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaPage {
    pub tracks: Vec<SavedTrack>,
    /// A track at or before the watermark was met; later pages are older
    /// still and need not be fetched.
    pub reached_watermark: bool,
}

/// Keeps the tracks of a newest-first page that were added after
/// `watermark`.
///
/// Stops at the first track added at or before the watermark. Tracks with no
/// usable `added_at` are kept and do not stop the scan. Without a watermark
/// every track is new.
pub fn take_newer(items: Vec<SavedTrack>, watermark: Option<DateTime<Utc>>) -> DeltaPage {
    let Some(watermark) = watermark else {
        return DeltaPage {
            tracks: items,
            reached_watermark: false,
        };
    };

    let mut page = DeltaPage::default();
    for track in items {
        match track.added_at {
            Some(added_at) if added_at <= watermark => {
                page.reached_watermark = true;
                break;
            }
            _ => page.tracks.push(track),
        }
    }
    page
}

/// Liked tracks added after `watermark`, newest first.
///
/// Relies on the service listing liked tracks newest first; paging stops as
/// soon as a page reaches the watermark.
pub async fn new_liked_tracks<S: MusicService + ?Sized>(
    service: &S,
    watermark: Option<DateTime<Utc>>,
    pacing: Pacing,
) -> Res<Vec<SavedTrack>> {
    let pb = utils::spinner("Fetching new liked tracks...");
    let mut tracks = Vec::new();
    let mut cursor = None;

    loop {
        let page = match service.liked_tracks_page(cursor).await {
            Ok(page) => page,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };
        let delta = take_newer(page.items, watermark);
        tracks.extend(delta.tracks);
        pb.set_message(format!("Found {} new liked track(s)...", tracks.len()));

        match page.next {
            Some(next) if !delta.reached_watermark => cursor = Some(next),
            _ => break,
        }
        Pacing::pause(pacing.page).await;
    }

    pb.finish_and_clear();
    Ok(tracks)
}

/// Tracks to add per existing playlist name, for every class and bucket that
/// matches at least one of the new tracks.
///
/// Names follow the same scheme as full runs so they resolve to the
/// playlists created back then. No minimum or maximum size applies.
pub fn desired_additions(taxonomy: &Taxonomy, index: &GenreIndex) -> BTreeMap<String, Vec<String>> {
    let mut desired = BTreeMap::new();

    for class in taxonomy.classes() {
        let tracks = candidate_tracks(class.genres_in_order(), index);
        if !tracks.is_empty() {
            let kind = PlaylistKind::Class {
                code: class.code().to_string(),
                label: class.label().to_string(),
            };
            merge(&mut desired, kind.playlist_name(), tracks);
        }

        for (bucket_key, bucket_label) in class.buckets() {
            let tracks = candidate_tracks(class.bucket_genres(bucket_key), index);
            if !tracks.is_empty() {
                let kind = PlaylistKind::Bucket {
                    class_code: class.code().to_string(),
                    bucket_key: bucket_key.clone(),
                    bucket_label: bucket_label.clone(),
                };
                merge(&mut desired, kind.playlist_name(), tracks);
            }
        }
    }

    desired
}

// Two buckets may share a label and therefore a playlist name.
fn merge(desired: &mut BTreeMap<String, Vec<String>>, name: String, tracks: Vec<String>) {
    let entry = desired.entry(name).or_default();
    if entry.is_empty() {
        *entry = tracks;
        return;
    }

    let mut seen: HashSet<String> = entry.iter().cloned().collect();
    for uri in tracks {
        if seen.insert(uri.clone()) {
            entry.push(uri);
        }
    }
}
