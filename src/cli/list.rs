use crate::{
    Res,
    config::Config,
    info,
    spotify::{MusicService, SpotifyClient},
};

use super::{load_playlists, print_playlists};

/// Prints every playlist in the library, sorted by name.
pub async fn list(config: &Config) -> Res<()> {
    let client = SpotifyClient::connect(config).await?;
    let user = client.current_user().await?;

    let mut playlists = load_playlists(&client).await?;
    playlists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let owned = playlists.iter().filter(|p| p.owner_id == user.id).count();
    info!(
        "{} playlist(s), {} owned by {}",
        playlists.len(),
        owned,
        user.name()
    );
    print_playlists(&playlists, &user.id);
    Ok(())
}
