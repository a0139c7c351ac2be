use std::collections::HashSet;

use super::{GenreIndex, Taxonomy, ownership::AUTO_MARKER};

/// Candidate sets smaller than this do not become playlists.
pub const MIN_PLAYLIST_TRACKS: usize = 3;
/// Upper bound on the tracks put into a newly created playlist.
pub const MAX_PLAYLIST_TRACKS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistKind {
    Class {
        code: String,
        label: String,
    },
    Bucket {
        class_code: String,
        bucket_key: String,
        bucket_label: String,
    },
}

impl PlaylistKind {
    /// Remote playlist name. The `(auto)` suffix is how later runs recognise
    /// the playlists this tool manages and must not change.
    pub fn playlist_name(&self) -> String {
        match self {
            PlaylistKind::Class { label, .. } => class_playlist_name(label),
            PlaylistKind::Bucket {
                class_code,
                bucket_label,
                ..
            } => bucket_playlist_name(class_code, bucket_label),
        }
    }

    pub fn description(&self) -> String {
        match self {
            PlaylistKind::Class { code, label } => {
                format!("Auto-generated playlist for class {code}: {label}")
            }
            PlaylistKind::Bucket {
                class_code,
                bucket_key,
                bucket_label,
            } => format!(
                "Auto-generated playlist for sub-genre {bucket_key} ({bucket_label}) of class {class_code}"
            ),
        }
    }

    /// Short grouping label for tables: class code or bucket key.
    pub fn group(&self) -> String {
        match self {
            PlaylistKind::Class { code, .. } => format!("class {code}"),
            PlaylistKind::Bucket { bucket_key, .. } => format!("bucket {bucket_key}"),
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, PlaylistKind::Class { .. })
    }
}

pub fn class_playlist_name(label: &str) -> String {
    format!("{label} {AUTO_MARKER}")
}

pub fn bucket_playlist_name(class_code: &str, bucket_label: &str) -> String {
    format!("[{class_code}] {bucket_label} {AUTO_MARKER}")
}

/// A playlist to create: name, origin and tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSpec {
    pub name: String,
    pub kind: PlaylistKind,
    /// At most [`MAX_PLAYLIST_TRACKS`], in first-seen order.
    pub track_uris: Vec<String>,
    /// Size of the candidate set before truncation.
    pub total_tracks: usize,
    pub source_genre_count: usize,
}

/// A class or bucket left out because it matched too few tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTarget {
    pub name: String,
    pub kind: PlaylistKind,
    pub total_tracks: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub playlists: Vec<PlaylistSpec>,
    pub skipped: Vec<SkippedTarget>,
}

impl Partition {
    pub fn class_playlists(&self) -> impl Iterator<Item = &PlaylistSpec> {
        self.playlists.iter().filter(|p| p.kind.is_class())
    }

    pub fn bucket_playlists(&self) -> impl Iterator<Item = &PlaylistSpec> {
        self.playlists.iter().filter(|p| !p.kind.is_class())
    }

    fn admit(&mut self, kind: PlaylistKind, candidates: Vec<String>, source_genre_count: usize) {
        let name = kind.playlist_name();
        let total_tracks = candidates.len();

        if total_tracks < MIN_PLAYLIST_TRACKS {
            self.skipped.push(SkippedTarget {
                name,
                kind,
                total_tracks,
            });
            return;
        }

        let mut track_uris = candidates;
        track_uris.truncate(MAX_PLAYLIST_TRACKS);
        self.playlists.push(PlaylistSpec {
            name,
            kind,
            track_uris,
            total_tracks,
            source_genre_count,
        });
    }
}

/// Deduplicated union of the tracks of `genres`, in first-seen order.
pub fn candidate_tracks<I, G>(genres: I, index: &GenreIndex) -> Vec<String>
where
    I: IntoIterator<Item = G>,
    G: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut tracks = Vec::new();
    for genre in genres {
        for uri in index.tracks(genre.as_ref()) {
            if seen.insert(uri.as_str()) {
                tracks.push(uri.clone());
            }
        }
    }
    tracks
}

/// Computes the class playlists then the bucket playlists of `taxonomy`.
///
/// A track lands in every class and bucket one of its genres belongs to.
/// Buckets without genres are ignored; sets under [`MIN_PLAYLIST_TRACKS`] are
/// reported as skipped; sets over [`MAX_PLAYLIST_TRACKS`] keep their first
/// tracks in bucket, genre and track order.
pub fn partition(taxonomy: &Taxonomy, index: &GenreIndex) -> Partition {
    let mut result = Partition::default();

    for class in taxonomy.classes() {
        let candidates = candidate_tracks(class.genres_in_order(), index);
        result.admit(
            PlaylistKind::Class {
                code: class.code().to_string(),
                label: class.label().to_string(),
            },
            candidates,
            class.all_genres().len(),
        );
    }

    for class in taxonomy.classes() {
        for (bucket_key, bucket_label) in class.buckets() {
            let genres = class.bucket_genres(bucket_key);
            if genres.is_empty() {
                continue;
            }

            let candidates = candidate_tracks(genres, index);
            result.admit(
                PlaylistKind::Bucket {
                    class_code: class.code().to_string(),
                    bucket_key: bucket_key.clone(),
                    bucket_label: bucket_label.clone(),
                },
                candidates,
                genres.len(),
            );
        }
    }

    result
}
