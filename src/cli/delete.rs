use dialoguer::Confirm;
use tabled::{Table, Tabled};

use crate::{
    Error, Res,
    classification::{
        DeletionTarget, Pacing, SyncExecutor, ownership::find_deletion_candidates,
    },
    config::Config,
    info,
    spotify::{MusicService, SpotifyClient},
    success, utils, warning,
};

use super::load_playlists;

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "#")]
    index: usize,
    name: String,
    tracks: u64,
    #[tabled(rename = "first added")]
    first_added: String,
    id: String,
}

/// Unfollows owned playlists, picked either by the `(auto)` marker or by the
/// month their first track was added in (`YYYY-MM`).
///
/// Playlists of other users are never candidates. Without `confirm` the
/// candidates are only listed; with it a final prompt must be answered yes.
pub async fn delete(config: &Config, confirm: bool, auto: bool, month: Option<String>) -> Res<()> {
    let target = match (auto, month) {
        (true, None) => DeletionTarget::Marker,
        (false, Some(month)) => DeletionTarget::Window(utils::parse_month(&month)?),
        _ => {
            return Err(Error::InvalidInput(
                "pick exactly one of --auto or --month".to_string(),
            ));
        }
    };

    let client = SpotifyClient::connect(config).await?;
    let pacing = Pacing::default();
    let user = client.current_user().await?;
    let playlists = load_playlists(&client).await?;

    let candidates =
        find_deletion_candidates(&client, &playlists, &user.id, &target, pacing).await;
    if candidates.is_empty() {
        info!("No playlist to delete.");
        return Ok(());
    }

    let rows: Vec<CandidateRow> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| CandidateRow {
            index: idx + 1,
            name: c.playlist.name.clone(),
            tracks: c.playlist.track_count,
            first_added: c
                .first_added
                .map(|at| utils::format_timestamp(&at))
                .unwrap_or_else(|| "-".to_string()),
            id: c.playlist.id.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));

    if !confirm {
        warning!(
            "Dry run, {} playlist(s) would be deleted. Re-run with --confirm to apply.",
            candidates.len()
        );
        return Ok(());
    }

    let sure = Confirm::new()
        .with_prompt(format!("Delete these {} playlist(s)?", candidates.len()))
        .default(false)
        .interact()
        .unwrap_or(false);
    if !sure {
        return Err(Error::Cancelled);
    }

    let report = SyncExecutor::new(&client, pacing, true)
        .unfollow(&candidates)
        .await;
    success!(
        "{} of {} playlist(s) deleted",
        report.total() - report.failures(),
        report.total()
    );
    report.into_result().map(|_| ())
}
