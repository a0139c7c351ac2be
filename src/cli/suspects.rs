use crate::{
    Res,
    classification::{NamePredicate, filter_by_name, ownership::SUSPECT_KEYWORDS},
    config::Config,
    info,
    spotify::{MusicService, SpotifyClient},
    warning,
};

use super::{load_playlists, print_playlists};

/// Lists playlists whose names suggest they were generated, then the whole
/// library with the playlists of other users marked.
pub async fn suspects(config: &Config) -> Res<()> {
    let client = SpotifyClient::connect(config).await?;
    let user = client.current_user().await?;
    let playlists = load_playlists(&client).await?;

    let suspects = filter_by_name(&playlists, &NamePredicate::any_of(SUSPECT_KEYWORDS));
    if suspects.is_empty() {
        info!("No suspicious playlist names found.");
    } else {
        warning!(
            "{} playlist(s) look generated (keywords: {}):",
            suspects.len(),
            SUSPECT_KEYWORDS.join(", ")
        );
        print_playlists(&suspects, &user.id);
    }

    let foreign = playlists.iter().filter(|p| p.owner_id != user.id).count();
    info!(
        "All {} playlist(s), {} owned by someone else:",
        playlists.len(),
        foreign
    );
    print_playlists(&playlists, &user.id);
    Ok(())
}
