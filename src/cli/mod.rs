//! # CLI Module
//!
//! Command implementations for genrecli. Each command builds what it needs
//! from the [`Config`] it is given, reports progress on the console and
//! returns a [`crate::Res`] whose error carries the process exit status.
//!
//! ## Commands
//!
//! ### Classification
//!
//! - [`build`] - Full run: classify every liked track and create one playlist
//!   per class and per sub-genre bucket
//! - [`update`] - Incremental run: add the tracks liked since the last
//!   confirmed run to the playlists that already exist
//!
//! ### Inspection
//!
//! - [`analyze`] - Details of every playlist carrying the `(auto)` marker
//! - [`suspects`] - Playlists whose names suggest they were generated
//! - [`list`] - All playlists in the library
//! - [`check`] - `(auto)` and mix playlists with their descriptions
//!
//! ### Cleanup
//!
//! - [`delete`] - Unfollow owned playlists picked by marker or by month
//!
//! ### Authentication
//!
//! - [`auth`] - OAuth 2.0 PKCE authorization
//!
//! ## Dry Runs
//!
//! `build`, `update` and `delete` only print what they would change unless
//! called with `--confirm`. A dry run sends no mutating request and does not
//! move the watermark.
//!
//! ## Usage Patterns
//!
//! ```bash
//! genrecli auth                     # Authenticate with Spotify
//! genrecli build                    # Preview the playlists a full run creates
//! genrecli build --confirm          # Create them
//! genrecli update --confirm         # Later: add newly liked tracks
//! genrecli delete --auto            # Preview removal of generated playlists
//! ```

use tabled::Table;

use crate::{
    Error, Res,
    classification::{Partition, Taxonomy},
    config::Config,
    info,
    spotify::{MusicService, fetch_all_playlists},
    types::{PlaylistSpecTableRow, PlaylistSummary, PlaylistTableRow},
    utils,
};

mod analyze;
mod auth;
mod build;
mod check;
mod delete;
mod list;
mod suspects;
mod update;

pub use analyze::analyze;
pub use auth::auth;
pub use build::build;
pub use check::check;
pub use delete::delete;
pub use list::list;
pub use suspects::suspects;
pub use update::update;

/// Loads the taxonomy, refusing to go on without a single class.
async fn load_taxonomy(config: &Config) -> Res<Taxonomy> {
    let taxonomy = Taxonomy::load(&config.genres_dir).await?;
    if taxonomy.is_empty() {
        return Err(Error::Config(format!(
            "no usable class document in {}",
            config.genres_dir.display()
        )));
    }
    Ok(taxonomy)
}

async fn load_playlists<S: MusicService + ?Sized>(service: &S) -> Res<Vec<PlaylistSummary>> {
    let pb = utils::spinner("Fetching your playlists...");
    let playlists = fetch_all_playlists(service).await;
    pb.finish_and_clear();
    playlists
}

fn visibility(playlist: &PlaylistSummary) -> String {
    if playlist.collaborative {
        "collaborative".to_string()
    } else if playlist.public {
        "public".to_string()
    } else {
        "private".to_string()
    }
}

fn print_playlists<'a, I>(playlists: I, user_id: &str)
where
    I: IntoIterator<Item = &'a PlaylistSummary>,
{
    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .enumerate()
        .map(|(idx, p)| PlaylistTableRow {
            index: idx + 1,
            name: p.name.clone(),
            tracks: p.track_count,
            visibility: visibility(p),
            owner: if p.owner_id == user_id {
                "you".to_string()
            } else {
                format!("{} (not yours)", p.owner_name)
            },
            id: p.id.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

fn print_partition(partition: &Partition) {
    let rows: Vec<PlaylistSpecTableRow> = partition
        .playlists
        .iter()
        .enumerate()
        .map(|(idx, spec)| PlaylistSpecTableRow {
            index: idx + 1,
            playlist: spec.name.clone(),
            group: spec.kind.group(),
            tracks: spec.track_uris.len(),
            genres: spec.source_genre_count,
        })
        .collect();

    println!("{}", Table::new(rows));

    for spec in partition
        .playlists
        .iter()
        .filter(|s| s.total_tracks > s.track_uris.len())
    {
        info!(
            "'{}' matched {} tracks, keeping the first {}",
            spec.name,
            spec.total_tracks,
            spec.track_uris.len()
        );
    }
    if !partition.skipped.is_empty() {
        info!(
            "{} class(es)/bucket(s) skipped for having too few tracks",
            partition.skipped.len()
        );
    }
}
