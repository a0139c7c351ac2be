use crate::{
    Res,
    classification::{NamePredicate, Pacing, filter_by_name, ownership::added_range},
    config::Config,
    info,
    spotify::{MusicService, SpotifyClient, fetch_playlist_items},
    success, utils, warning,
};

use super::{load_playlists, visibility};

/// Prints the details of every playlist carrying the `(auto)` marker.
///
/// For each one: owner, track count, visibility, collaborative flag, the
/// dates the first and last tracks were added, description and followers.
/// Read-only.
pub async fn analyze(config: &Config) -> Res<()> {
    let client = SpotifyClient::connect(config).await?;
    let pacing = Pacing::default();
    let user = client.current_user().await?;

    let playlists = load_playlists(&client).await?;
    let marked = filter_by_name(&playlists, &NamePredicate::marker());
    if marked.is_empty() {
        info!("No (auto) playlist found.");
        return Ok(());
    }

    info!(
        "{} (auto) playlist(s) out of {} in the library",
        marked.len(),
        playlists.len()
    );

    for (idx, playlist) in marked.iter().enumerate() {
        let owned = playlist.owner_id == user.id;
        println!();
        info!("{}. {}", idx + 1, playlist.name);
        println!(
            "    owner:         {}{}",
            playlist.owner_name,
            if owned { " (you)" } else { "" }
        );
        println!("    tracks:        {}", playlist.track_count);
        println!("    visibility:    {}", visibility(playlist));
        println!("    collaborative: {}", playlist.collaborative);
        println!("    id:            {}", playlist.id);

        match fetch_playlist_items(&client, &playlist.id).await {
            Ok(items) => {
                println!("    checked:       {} item(s)", items.len());
                if let Some((first, last)) = added_range(&items) {
                    println!("    first added:   {}", utils::format_timestamp(&first));
                    println!("    last added:    {}", utils::format_timestamp(&last));
                }
            }
            Err(e) => warning!("Could not read tracks of '{}': {}", playlist.name, e),
        }

        match client.playlist_details(&playlist.id).await {
            Ok(details) => {
                if !details.description.is_empty() {
                    println!("    description:   {}", details.description);
                }
                println!("    followers:     {}", details.followers);
            }
            Err(e) => warning!("Could not read details of '{}': {}", playlist.name, e),
        }

        Pacing::pause(pacing.page).await;
    }

    println!();
    success!("{} playlist(s) analyzed", marked.len());
    Ok(())
}
