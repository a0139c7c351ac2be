use super::SpotifyClient;
use crate::{Res, types::Artist};

impl SpotifyClient {
    /// Retrieves the genre tags Spotify attaches to an artist.
    ///
    /// Uses `GET /artists/{id}`. The list may be empty; classifying such
    /// artists under the sentinel genre is up to the caller.
    ///
    /// # Example
    ///
    /// ```
    /// let genres = client.fetch_artist_genres("4NHQUGzhtTLFvgF5SZesLK").await?;
    /// ```
    pub(super) async fn fetch_artist_genres(&self, artist_id: &str) -> Res<Vec<String>> {
        let url = self.url(&format!("/artists/{artist_id}"), None);
        let artist = self.get_json::<Artist>(&url).await?;
        Ok(artist.genres)
    }
}
