use super::SpotifyClient;
use crate::{
    Res,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, Page, Paging, PlaylistDetails, PlaylistDetailsResponse,
        PlaylistItem, PlaylistSummary, PlaylistTrackObject, SimplifiedPlaylist,
    },
};

const PLAYLISTS_LIMIT: u32 = 50;
const PLAYLIST_ITEMS_LIMIT: u32 = 100;

impl SpotifyClient {
    pub(super) async fn fetch_playlists_page(
        &self,
        cursor: Option<String>,
    ) -> Res<Page<PlaylistSummary>> {
        let url = self.url(&format!("/me/playlists?limit={PLAYLISTS_LIMIT}"), cursor);
        let paging = self.get_json::<Paging<SimplifiedPlaylist>>(&url).await?;

        Ok(Page {
            items: paging.items.into_iter().map(PlaylistSummary::from).collect(),
            next: paging.next,
        })
    }

    /// Retrieves one page of playlist items, restricted to the fields the
    /// engine reads (track URI and `added_at`).
    pub(super) async fn fetch_playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<String>,
    ) -> Res<Page<PlaylistItem>> {
        let url = self.url(
            &format!(
                "/playlists/{playlist_id}/tracks?limit={PLAYLIST_ITEMS_LIMIT}&fields=items(added_at,track(uri)),next"
            ),
            cursor,
        );
        let paging = self.get_json::<Paging<PlaylistTrackObject>>(&url).await?;

        Ok(Page {
            items: paging.items.into_iter().map(PlaylistItem::from).collect(),
            next: paging.next,
        })
    }

    pub(super) async fn fetch_playlist_details(&self, playlist_id: &str) -> Res<PlaylistDetails> {
        let url = self.url(
            &format!("/playlists/{playlist_id}?fields=description,followers(total)"),
            None,
        );
        let details = self.get_json::<PlaylistDetailsResponse>(&url).await?;

        Ok(PlaylistDetails {
            description: details.description.unwrap_or_default(),
            followers: details.followers.map(|f| f.total).unwrap_or(0),
        })
    }

    pub(super) async fn post_playlist(
        &self,
        owner_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Res<String> {
        let url = self.url(&format!("/users/{owner_id}/playlists"), None);
        let created = self
            .post_json::<_, CreatePlaylistResponse>(&url, request)
            .await?;
        Ok(created.id)
    }

    pub(super) async fn post_tracks(&self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let url = self.url(&format!("/playlists/{playlist_id}/tracks"), None);
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        self.post_json::<_, AddTrackToPlaylistResponse>(&url, &body)
            .await?;
        Ok(())
    }

    pub(super) async fn delete_follow(&self, playlist_id: &str) -> Res<()> {
        let url = self.url(&format!("/playlists/{playlist_id}/followers"), None);
        self.delete(&url).await
    }
}
