use crate::{
    Res,
    classification::{NamePredicate, Pacing, filter_by_name, ownership::CHECK_KEYWORDS},
    config::Config,
    info,
    spotify::{MusicService, SpotifyClient},
    warning,
};

use super::{load_playlists, print_playlists};

/// Shows the playlists named with `(auto)` or `mix`, with their descriptions.
pub async fn check(config: &Config) -> Res<()> {
    let client = SpotifyClient::connect(config).await?;
    let pacing = Pacing::default();
    let user = client.current_user().await?;
    let playlists = load_playlists(&client).await?;

    let matching = filter_by_name(&playlists, &NamePredicate::any_of(CHECK_KEYWORDS));
    if matching.is_empty() {
        info!("No playlist matches {}.", CHECK_KEYWORDS.join(" or "));
        return Ok(());
    }

    print_playlists(&matching, &user.id);

    for playlist in &matching {
        match client.playlist_details(&playlist.id).await {
            Ok(details) if details.description.is_empty() => {
                info!("{}: (no description)", playlist.name)
            }
            Ok(details) => info!("{}: {}", playlist.name, details.description),
            Err(e) => warning!("Could not read details of '{}': {}", playlist.name, e),
        }
        Pacing::pause(pacing.page).await;
    }
    Ok(())
}
