use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use super::MusicService;
use crate::{
    Res,
    config::Config,
    management::TokenManager,
    types::{
        CreatePlaylistRequest, Page, PlaylistDetails, PlaylistItem, PlaylistSummary, SavedTrack,
        User,
    },
};

/// Spotify Web API client.
///
/// Owns the HTTP connection pool and the token manager. One instance is built
/// per run and handed to every component that talks to Spotify.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(config: &Config, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Loads the persisted token and builds a client.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Auth`] when no token has been stored yet.
    pub async fn connect(config: &Config) -> Res<Self> {
        let tokens = TokenManager::load(config).await?;
        Ok(Self::new(config, tokens))
    }

    /// Absolute URL for an API path, or the cursor itself when continuing a
    /// paginated listing.
    pub(super) fn url(&self, path: &str, cursor: Option<String>) -> String {
        cursor.unwrap_or_else(|| format!("{}{}", self.api_url, path))
    }

    async fn token(&self) -> String {
        self.tokens.lock().await.get_valid_token().await
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        let token = self.token().await;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        Ok(checked(response)?.json::<T>().await?)
    }

    pub(super) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Res<T> {
        let token = self.token().await;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Ok(checked(response)?.json::<T>().await?)
    }

    pub(super) async fn delete(&self, url: &str) -> Res<()> {
        let token = self.token().await;
        let response = self.http.delete(url).bearer_auth(token).send().await?;
        checked(response)?;
        Ok(())
    }
}

fn checked(response: Response) -> Res<Response> {
    Ok(response.error_for_status()?)
}

#[async_trait]
impl MusicService for SpotifyClient {
    async fn current_user(&self) -> Res<User> {
        self.fetch_current_user().await
    }

    async fn liked_tracks_page(&self, cursor: Option<String>) -> Res<Page<SavedTrack>> {
        self.fetch_liked_tracks_page(cursor).await
    }

    async fn playlists_page(&self, cursor: Option<String>) -> Res<Page<PlaylistSummary>> {
        self.fetch_playlists_page(cursor).await
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Res<Page<PlaylistItem>> {
        self.fetch_playlist_items_page(playlist_id, cursor).await
    }

    async fn playlist_details(&self, playlist_id: &str) -> Res<PlaylistDetails> {
        self.fetch_playlist_details(playlist_id).await
    }

    async fn artist_genres(&self, artist_id: &str) -> Res<Vec<String>> {
        self.fetch_artist_genres(artist_id).await
    }

    async fn create_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Res<String> {
        self.post_playlist(owner_id, request).await
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        self.post_tracks(playlist_id, uris).await
    }

    async fn unfollow_playlist(&self, playlist_id: &str) -> Res<()> {
        self.delete_follow(playlist_id).await
    }
}
