#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::Utc;
use genrecli::{
    Error, Res,
    spotify::{ADD_TRACKS_BATCH, MusicService},
    types::{
        ArtistRef, CreatePlaylistRequest, Page, PlaylistDetails, PlaylistItem, PlaylistSummary,
        SavedTrack, User,
    },
    utils,
};

/// Every call the engine made, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentUser,
    LikedPage(Option<String>),
    PlaylistsPage(Option<String>),
    Items(String),
    Details(String),
    Artist(String),
    Create {
        owner: String,
        name: String,
        description: String,
        public: bool,
        collaborative: bool,
    },
    Add {
        playlist: String,
        uris: Vec<String>,
    },
    Unfollow(String),
}

impl Call {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::Create { .. } | Call::Add { .. } | Call::Unfollow(_)
        )
    }
}

/// In-memory stand-in for the streaming service.
///
/// Listings are paged with cursors of the form `offset:N`. Created playlists
/// and added tracks become visible to later reads, so consecutive runs
/// against one fake behave like consecutive runs against the real service.
pub struct FakeService {
    user: User,
    page_size: usize,
    liked: Vec<SavedTrack>,
    artists: HashMap<String, Vec<String>>,
    failing_artists: HashSet<String>,
    failing_creates: HashSet<String>,
    failing_adds: HashSet<String>,
    details: HashMap<String, PlaylistDetails>,
    playlists: Mutex<Vec<PlaylistSummary>>,
    items: Mutex<HashMap<String, Vec<PlaylistItem>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeService {
    pub fn new(user_id: &str) -> Self {
        Self {
            user: User {
                id: user_id.to_string(),
                display_name: Some(format!("{user_id} display")),
            },
            page_size: 50,
            liked: Vec::new(),
            artists: HashMap::new(),
            failing_artists: HashSet::new(),
            failing_creates: HashSet::new(),
            failing_adds: HashSet::new(),
            details: HashMap::new(),
            playlists: Mutex::new(Vec::new()),
            items: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_liked(mut self, tracks: Vec<SavedTrack>) -> Self {
        self.liked = tracks;
        self
    }

    pub fn with_artist(mut self, artist_id: &str, genres: &[&str]) -> Self {
        self.artists.insert(
            artist_id.to_string(),
            genres.iter().map(|g| g.to_string()).collect(),
        );
        self
    }

    pub fn with_failing_artist(mut self, artist_id: &str) -> Self {
        self.failing_artists.insert(artist_id.to_string());
        self
    }

    pub fn with_failing_create(mut self, name: &str) -> Self {
        self.failing_creates.insert(name.to_string());
        self
    }

    /// Every add-tracks call on `playlist_id` fails.
    pub fn with_failing_add(mut self, playlist_id: &str) -> Self {
        self.failing_adds.insert(playlist_id.to_string());
        self
    }

    pub fn with_playlist(self, playlist: PlaylistSummary, items: Vec<PlaylistItem>) -> Self {
        self.items
            .lock()
            .unwrap()
            .insert(playlist.id.clone(), items);
        self.playlists.lock().unwrap().push(playlist);
        self
    }

    pub fn with_details(mut self, playlist_id: &str, description: &str, followers: u64) -> Self {
        self.details.insert(
            playlist_id.to_string(),
            PlaylistDetails {
                description: description.to_string(),
                followers,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn playlists(&self) -> Vec<PlaylistSummary> {
        self.playlists.lock().unwrap().clone()
    }

    pub fn playlist_uris(&self, playlist_id: &str) -> Vec<String> {
        self.items
            .lock()
            .unwrap()
            .get(playlist_id)
            .map(|items| items.iter().filter_map(|i| i.uri.clone()).collect())
            .unwrap_or_default()
    }

    pub fn playlist_id(&self, name: &str) -> Option<String> {
        self.playlists()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn page<T: Clone>(&self, all: &[T], cursor: Option<&str>) -> Page<T> {
        let offset = cursor
            .and_then(|c| c.strip_prefix("offset:"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let end = (offset + self.page_size).min(all.len());
        let items = all.get(offset..end).map(<[T]>::to_vec).unwrap_or_default();
        let next = (end < all.len()).then(|| format!("offset:{end}"));
        Page { items, next }
    }
}

#[async_trait]
impl MusicService for FakeService {
    async fn current_user(&self) -> Res<User> {
        self.record(Call::CurrentUser);
        Ok(self.user.clone())
    }

    async fn liked_tracks_page(&self, cursor: Option<String>) -> Res<Page<SavedTrack>> {
        self.record(Call::LikedPage(cursor.clone()));
        Ok(self.page(&self.liked, cursor.as_deref()))
    }

    async fn playlists_page(&self, cursor: Option<String>) -> Res<Page<PlaylistSummary>> {
        self.record(Call::PlaylistsPage(cursor.clone()));
        let playlists = self.playlists();
        Ok(self.page(&playlists, cursor.as_deref()))
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Res<Page<PlaylistItem>> {
        self.record(Call::Items(playlist_id.to_string()));
        let items = self
            .items
            .lock()
            .unwrap()
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("playlist {playlist_id}")))?;
        Ok(self.page(&items, cursor.as_deref()))
    }

    async fn playlist_details(&self, playlist_id: &str) -> Res<PlaylistDetails> {
        self.record(Call::Details(playlist_id.to_string()));
        Ok(self.details.get(playlist_id).cloned().unwrap_or_default())
    }

    async fn artist_genres(&self, artist_id: &str) -> Res<Vec<String>> {
        self.record(Call::Artist(artist_id.to_string()));
        if self.failing_artists.contains(artist_id) {
            return Err(Error::NotFound(format!("artist {artist_id}")));
        }
        Ok(self.artists.get(artist_id).cloned().unwrap_or_default())
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Res<String> {
        self.record(Call::Create {
            owner: owner_id.to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
            public: request.public,
            collaborative: request.collaborative,
        });
        if self.failing_creates.contains(&request.name) {
            return Err(Error::InvalidInput(format!("cannot create {}", request.name)));
        }

        let mut playlists = self.playlists.lock().unwrap();
        let id = format!("created-{}", playlists.len() + 1);
        playlists.push(PlaylistSummary {
            id: id.clone(),
            name: request.name.clone(),
            owner_id: owner_id.to_string(),
            owner_name: owner_id.to_string(),
            track_count: 0,
            public: request.public,
            collaborative: request.collaborative,
        });
        self.items.lock().unwrap().insert(id.clone(), Vec::new());
        Ok(id)
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.record(Call::Add {
            playlist: playlist_id.to_string(),
            uris: uris.to_vec(),
        });
        assert!(uris.len() <= ADD_TRACKS_BATCH, "batch too large");
        if self.failing_adds.contains(playlist_id) {
            return Err(Error::InvalidInput(format!("cannot add to {playlist_id}")));
        }

        let mut items = self.items.lock().unwrap();
        let entry = items
            .get_mut(playlist_id)
            .ok_or_else(|| Error::NotFound(format!("playlist {playlist_id}")))?;
        entry.extend(uris.iter().map(|uri| PlaylistItem {
            uri: Some(uri.clone()),
            added_at: Some(Utc::now()),
        }));
        Ok(())
    }

    async fn unfollow_playlist(&self, playlist_id: &str) -> Res<()> {
        self.record(Call::Unfollow(playlist_id.to_string()));
        self.playlists.lock().unwrap().retain(|p| p.id != playlist_id);
        Ok(())
    }
}

/// Liked track `uri` by `artist_id`, saved at `added_at` (RFC 3339).
pub fn track(uri: &str, artist_id: Option<&str>, added_at: Option<&str>) -> SavedTrack {
    SavedTrack {
        uri: uri.to_string(),
        name: format!("{uri} title"),
        artists: vec![ArtistRef {
            id: artist_id.map(str::to_string),
            name: artist_id.unwrap_or("local artist").to_string(),
        }],
        added_at: added_at.and_then(utils::parse_timestamp),
    }
}

pub fn playlist(id: &str, name: &str, owner_id: &str, track_count: u64) -> PlaylistSummary {
    PlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
        owner_id: owner_id.to_string(),
        owner_name: owner_id.to_string(),
        track_count,
        public: false,
        collaborative: false,
    }
}

pub fn item(uri: &str, added_at: Option<&str>) -> PlaylistItem {
    PlaylistItem {
        uri: Some(uri.to_string()),
        added_at: added_at.and_then(utils::parse_timestamp),
    }
}

pub fn write_class(dir: &Path, file_name: &str, json: &str) {
    std::fs::write(dir.join(file_name), json).unwrap();
}

/// Class document with a single bucket `1.1` named after the class.
pub fn simple_class(code: &str, label: &str, genres: &[&str]) -> String {
    serde_json::json!({
        "class_code": code,
        "class_label": label,
        "buckets": { "1.1": format!("{label} core") },
        "genres_by_bucket": { "1.1": genres },
    })
    .to_string()
}
