use chrono::Utc;

use crate::{
    Res,
    classification::{
        ConsoleDecisions, GenreResolver, Pacing, SkipUnknown, SyncExecutor, new_liked_tracks,
        partition, triage,
    },
    config::Config,
    info,
    management::WatermarkManager,
    spotify::{MusicService, SpotifyClient},
    success, warning,
};

use super::{load_taxonomy, print_partition};

/// Full run: classifies every liked track and creates the class and bucket
/// playlists.
///
/// Without `confirm` the playlists are only listed. With it they are created
/// and, if none failed, the watermark is moved to the start of this run so
/// that a later `update` only looks at tracks liked since.
pub async fn build(config: &Config, confirm: bool, skip_unknown: bool) -> Res<()> {
    let mut taxonomy = load_taxonomy(config).await?;
    let client = SpotifyClient::connect(config).await?;
    let pacing = Pacing::default();

    let user = client.current_user().await?;
    info!("Signed in as {}", user.name());

    let started = Utc::now();
    let tracks = new_liked_tracks(&client, None, pacing).await?;
    info!("{} liked track(s) found", tracks.len());
    if tracks.is_empty() {
        warning!("Nothing to classify.");
        return Ok(());
    }

    let mut resolver = GenreResolver::new(&client, pacing);
    let index = resolver.resolve(&tracks).await;
    info!(
        "{} genre(s) across {} artist(s)",
        index.len(),
        resolver.cached_artists()
    );

    if skip_unknown {
        triage(&index, &mut taxonomy, &mut SkipUnknown).await;
    } else {
        triage(&index, &mut taxonomy, &mut ConsoleDecisions).await;
    }

    let planned = partition(&taxonomy, &index);
    if planned.playlists.is_empty() {
        warning!("No class or bucket has enough tracks for a playlist.");
        return Ok(());
    }
    print_partition(&planned);

    if !confirm {
        warning!("Dry run, nothing was created. Re-run with --confirm to apply.");
    }

    let executor = SyncExecutor::new(&client, pacing, confirm);
    let report = executor.create(&user.id, &planned.playlists).await;

    if confirm {
        if report.failed() == 0 {
            WatermarkManager::from_config(config).persist(started).await?;
        }
        success!(
            "{} playlist(s) created, {} track(s) added",
            report.total() - report.failures(),
            report.tracks_added()
        );
    }

    report.into_result().map(|_| ())
}
