use std::collections::{BTreeMap, HashMap, HashSet};

use super::Pacing;
use crate::{spotify::MusicService, types::SavedTrack, utils, warning};

/// Genre assigned to tracks whose artist has no known genre.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Genre tag to the URIs of the tracks carrying it.
///
/// Tags are stored normalized. URIs keep the order in which they were first
/// seen and appear at most once per tag; the same URI may appear under many
/// tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreIndex {
    tracks_by_genre: BTreeMap<String, Vec<String>>,
    // (tag, uri) pairs already stored
    members: HashSet<(String, String)>,
}

impl GenreIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, genre: &str, uri: &str) {
        let genre = utils::normalize_genre(genre);
        if self.members.insert((genre.clone(), uri.to_string())) {
            self.tracks_by_genre
                .entry(genre)
                .or_default()
                .push(uri.to_string());
        }
    }

    pub fn tracks(&self, genre: &str) -> &[String] {
        self.tracks_by_genre
            .get(&utils::normalize_genre(genre))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.tracks_by_genre
            .contains_key(&utils::normalize_genre(genre))
    }

    /// Tags in sorted order.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.tracks_by_genre.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tracks_by_genre
            .iter()
            .map(|(g, uris)| (g.as_str(), uris.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.tracks_by_genre.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks_by_genre.is_empty()
    }
}

impl<G: AsRef<str>, U: AsRef<str>> FromIterator<(G, U)> for GenreIndex {
    fn from_iter<I: IntoIterator<Item = (G, U)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (genre, uri) in iter {
            index.insert(genre.as_ref(), uri.as_ref());
        }
        index
    }
}

/// Resolves tracks to genres through their first listed artist.
///
/// The artist cache lives as long as the resolver, which is one run. Every
/// distinct artist costs one remote lookup followed by the artist pacing
/// delay; repeated artists are free.
pub struct GenreResolver<'a, S: MusicService + ?Sized> {
    service: &'a S,
    pacing: Pacing,
    cache: HashMap<String, Vec<String>>,
    cold_lookups: usize,
}

impl<'a, S: MusicService + ?Sized> GenreResolver<'a, S> {
    pub fn new(service: &'a S, pacing: Pacing) -> Self {
        Self {
            service,
            pacing,
            cache: HashMap::new(),
            cold_lookups: 0,
        }
    }

    /// Builds the genre index of `tracks`.
    ///
    /// Tracks without an artist id, artists without genres and artists whose
    /// lookup failed all land under [`UNKNOWN_GENRE`]. A failed lookup is
    /// reported once and cached as empty.
    pub async fn resolve(&mut self, tracks: &[SavedTrack]) -> GenreIndex {
        let pb = utils::progress_bar(tracks.len() as u64, "Analyzing genres");
        let mut index = GenreIndex::new();

        for track in tracks {
            let genres = match track.primary_artist_id() {
                Some(artist_id) => self.genres_for(artist_id).await,
                None => Vec::new(),
            };

            if genres.is_empty() {
                index.insert(UNKNOWN_GENRE, &track.uri);
            } else {
                for genre in &genres {
                    index.insert(genre, &track.uri);
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        index
    }

    async fn genres_for(&mut self, artist_id: &str) -> Vec<String> {
        if let Some(genres) = self.cache.get(artist_id) {
            return genres.clone();
        }

        let genres = match self.service.artist_genres(artist_id).await {
            Ok(genres) => genres,
            Err(e) => {
                warning!("Genre lookup failed for artist {}: {}", artist_id, e);
                Vec::new()
            }
        };
        self.cold_lookups += 1;
        Pacing::pause(self.pacing.artist_lookup).await;

        self.cache.insert(artist_id.to_string(), genres.clone());
        genres
    }

    /// Number of remote lookups issued so far.
    pub fn cold_lookups(&self) -> usize {
        self.cold_lookups
    }

    pub fn cached_artists(&self) -> usize {
        self.cache.len()
    }
}
