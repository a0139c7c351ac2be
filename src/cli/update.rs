use chrono::Utc;
use dialoguer::Confirm;
use tabled::{Table, Tabled};

use crate::{
    Error, Res,
    classification::{
        ConsoleDecisions, GenreResolver, Pacing, SkipUnknown, SyncExecutor, desired_additions,
        new_liked_tracks, triage,
    },
    config::Config,
    info,
    management::WatermarkManager,
    spotify::{MusicService, SpotifyClient},
    success, utils, warning,
};

use super::load_taxonomy;

#[derive(Tabled)]
struct AdditionRow {
    playlist: String,
    #[tabled(rename = "new tracks")]
    tracks: usize,
}

/// Incremental run: adds the tracks liked since the last confirmed run to
/// the existing playlists of the matching classes and buckets.
///
/// When no run has been recorded yet every liked track counts as new. That
/// needs `all`, or a yes at the prompt; otherwise the run is cancelled.
pub async fn update(config: &Config, confirm: bool, all: bool, skip_unknown: bool) -> Res<()> {
    let mut taxonomy = load_taxonomy(config).await?;
    let watermarks = WatermarkManager::from_config(config);
    let watermark = watermarks.load().await?;

    match watermark {
        Some(at) => info!("Looking for tracks liked after {}", utils::format_timestamp(&at)),
        None if all => info!("No previous run recorded, treating every liked track as new"),
        None => {
            let go_on = Confirm::new()
                .with_prompt("No previous run recorded. Treat every liked track as new?")
                .default(false)
                .interact()
                .unwrap_or(false);
            if !go_on {
                return Err(Error::Cancelled);
            }
        }
    }

    let client = SpotifyClient::connect(config).await?;
    let pacing = Pacing::default();
    let user = client.current_user().await?;

    let started = Utc::now();
    let tracks = new_liked_tracks(&client, watermark, pacing).await?;
    if tracks.is_empty() {
        success!("No new liked tracks.");
        if confirm {
            watermarks.persist(started).await?;
        }
        return Ok(());
    }
    info!("{} new liked track(s)", tracks.len());

    let mut resolver = GenreResolver::new(&client, pacing);
    let index = resolver.resolve(&tracks).await;

    if skip_unknown {
        triage(&index, &mut taxonomy, &mut SkipUnknown).await;
    } else {
        triage(&index, &mut taxonomy, &mut ConsoleDecisions).await;
    }

    let desired = desired_additions(&taxonomy, &index);
    if desired.is_empty() {
        warning!("None of the new tracks belongs to a known class.");
    } else {
        let rows: Vec<AdditionRow> = desired
            .iter()
            .map(|(name, uris)| AdditionRow {
                playlist: name.clone(),
                tracks: uris.len(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    if !confirm {
        warning!("Dry run, nothing was changed. Re-run with --confirm to apply.");
    }

    let executor = SyncExecutor::new(&client, pacing, confirm);
    let report = executor.update(&user.id, &desired).await?;

    if confirm {
        if report.failed() == 0 {
            watermarks.persist(started).await?;
        }
        success!("{} track(s) added", report.tracks_added());
    }

    report.into_result().map(|_| ())
}
