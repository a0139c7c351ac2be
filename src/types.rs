use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

// Spotify Web API payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

impl User {
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    /// Absent for local files.
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackObject {
    pub added_at: Option<String>,
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    pub tracks: Option<PlaylistTracksRef>,
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackRef {
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackObject {
    pub added_at: Option<String>,
    pub track: Option<PlaylistTrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistDetailsResponse {
    pub description: Option<String>,
    pub followers: Option<Followers>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

impl CreatePlaylistRequest {
    /// Private, non-collaborative playlist, the only kind genrecli creates.
    pub fn private(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

// Domain values handed to the classification engine

/// A liked track with the moment it was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTrack {
    pub uri: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
    /// `None` when the service sent no date or one that failed to parse.
    pub added_at: Option<DateTime<Utc>>,
}

impl SavedTrack {
    /// Id of the first listed artist, the one genres are inherited from.
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }

    /// Converts an API item, dropping entries without a track payload.
    pub fn from_api(item: SavedTrackObject) -> Option<Self> {
        let track = item.track?;
        Some(Self {
            uri: track.uri,
            name: track.name,
            artists: track.artists,
            added_at: item.added_at.as_deref().and_then(utils::parse_timestamp),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub owner_name: String,
    pub track_count: u64,
    pub public: bool,
    pub collaborative: bool,
}

impl From<SimplifiedPlaylist> for PlaylistSummary {
    fn from(p: SimplifiedPlaylist) -> Self {
        Self {
            owner_name: p.owner.display_name.unwrap_or_else(|| p.owner.id.clone()),
            owner_id: p.owner.id,
            id: p.id,
            name: p.name,
            track_count: p.tracks.map(|t| t.total).unwrap_or(0),
            public: p.public.unwrap_or(false),
            collaborative: p.collaborative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistItem {
    pub uri: Option<String>,
    pub added_at: Option<DateTime<Utc>>,
}

impl From<PlaylistTrackObject> for PlaylistItem {
    fn from(item: PlaylistTrackObject) -> Self {
        Self {
            uri: item.track.and_then(|t| t.uri),
            added_at: item.added_at.as_deref().and_then(utils::parse_timestamp),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistDetails {
    pub description: String,
    pub followers: u64,
}

/// One page of a paginated listing. `next` is the opaque cursor for the
/// following page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub tracks: u64,
    pub visibility: String,
    pub owner: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct PlaylistSpecTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub playlist: String,
    pub group: String,
    pub tracks: usize,
    pub genres: usize,
}
