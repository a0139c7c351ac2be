//! # Spotify Integration Module
//!
//! The remote side of genrecli. [`MusicService`] is the seam between the
//! classification engine and the streaming service: the engine only ever
//! talks to that trait, and [`SpotifyClient`] implements it over the Spotify
//! Web API with `reqwest`.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Classification Engine (generic over MusicService)
//!     ↓
//! SpotifyClient
//!     ├── Authentication (OAuth 2.0 PKCE, token refresh)
//!     ├── Library (current user, liked tracks)
//!     ├── Artists (genre lookup)
//!     └── Playlists (list, items, create, add, unfollow)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Pagination
//!
//! Listings are exposed page by page. A page carries the service's `next`
//! URL as an opaque cursor; passing it back yields the following page. The
//! helpers in this module follow cursors to exhaustion. Callers that need to
//! stop early (the incremental watermark scan) drive the page methods
//! themselves.
//!
//! ## Error Handling
//!
//! Every call returns [`crate::Res`]. Non-success statuses become
//! [`crate::Error::Http`]. Nothing is retried here; callers decide whether a
//! failure skips one item or aborts the run.
//!
//! ## API Coverage
//!
//! - `GET /me`
//! - `GET /me/tracks`
//! - `GET /me/playlists`
//! - `GET /playlists/{id}` and `GET /playlists/{id}/tracks`
//! - `GET /artists/{id}`
//! - `POST /users/{user_id}/playlists`
//! - `POST /playlists/{id}/tracks`
//! - `DELETE /playlists/{id}/followers`

use async_trait::async_trait;

use crate::{
    Res,
    types::{
        CreatePlaylistRequest, Page, PlaylistDetails, PlaylistItem, PlaylistSummary, SavedTrack,
        User,
    },
};

mod artists;
pub mod auth;
mod client;
mod library;
mod playlist;

pub use client::SpotifyClient;

/// Maximum number of URIs accepted by one add-tracks call.
pub const ADD_TRACKS_BATCH: usize = 100;

/// Operations the classification engine needs from the streaming service.
#[async_trait]
pub trait MusicService: Send + Sync {
    async fn current_user(&self) -> Res<User>;

    /// Liked tracks, most recently added first.
    async fn liked_tracks_page(&self, cursor: Option<String>) -> Res<Page<SavedTrack>>;

    /// Playlists followed or owned by the current user.
    async fn playlists_page(&self, cursor: Option<String>) -> Res<Page<PlaylistSummary>>;

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Res<Page<PlaylistItem>>;

    async fn playlist_details(&self, playlist_id: &str) -> Res<PlaylistDetails>;

    async fn artist_genres(&self, artist_id: &str) -> Res<Vec<String>>;

    /// Creates a playlist and returns its id.
    async fn create_playlist(&self, owner_id: &str, request: &CreatePlaylistRequest)
    -> Res<String>;

    /// Appends at most [`ADD_TRACKS_BATCH`] URIs.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()>;

    /// Removes the playlist from the current user's library. Playlists owned
    /// by someone else are only unfollowed, never deleted.
    async fn unfollow_playlist(&self, playlist_id: &str) -> Res<()>;
}

/// Follows playlist pages to the end.
pub async fn fetch_all_playlists<S: MusicService + ?Sized>(
    service: &S,
) -> Res<Vec<PlaylistSummary>> {
    let mut playlists = Vec::new();
    let mut cursor = None;
    loop {
        let page = service.playlists_page(cursor).await?;
        playlists.extend(page.items);
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(playlists)
}

/// Follows the item pages of one playlist to the end.
pub async fn fetch_playlist_items<S: MusicService + ?Sized>(
    service: &S,
    playlist_id: &str,
) -> Res<Vec<PlaylistItem>> {
    let mut items = Vec::new();
    let mut cursor = None;
    loop {
        let page = service.playlist_items_page(playlist_id, cursor).await?;
        items.extend(page.items);
        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(items)
}
