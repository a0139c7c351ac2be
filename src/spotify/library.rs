use super::SpotifyClient;
use crate::{
    Res,
    types::{Page, Paging, SavedTrack, SavedTrackObject, User},
};

const LIKED_TRACKS_LIMIT: u32 = 50;

impl SpotifyClient {
    pub(super) async fn fetch_current_user(&self) -> Res<User> {
        let url = self.url("/me", None);
        self.get_json::<User>(&url).await
    }

    /// Retrieves one page of the user's saved tracks.
    ///
    /// Spotify returns saved tracks ordered by `added_at`, newest first. The
    /// incremental update relies on that ordering to stop paging early.
    /// Items whose track payload is missing (removed from the catalogue) are
    /// dropped.
    pub(super) async fn fetch_liked_tracks_page(
        &self,
        cursor: Option<String>,
    ) -> Res<Page<SavedTrack>> {
        let url = self.url(&format!("/me/tracks?limit={LIKED_TRACKS_LIMIT}"), cursor);
        let paging = self.get_json::<Paging<SavedTrackObject>>(&url).await?;

        Ok(Page {
            items: paging
                .items
                .into_iter()
                .filter_map(SavedTrack::from_api)
                .collect(),
            next: paging.next,
        })
    }
}
