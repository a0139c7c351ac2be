//! # Classification Engine
//!
//! Turns a pile of liked tracks into playlist memberships.
//!
//! ```text
//! Taxonomy ──► GenreResolver ──► triage ──► partition ──► SyncExecutor::create
//!    ▲                              │
//!    └──────── add_genre ◄──────────┘
//!
//! Watermark ──► delta ──► GenreResolver ──► desired_additions ──► SyncExecutor::update
//! ```
//!
//! - [`taxonomy`] - class documents, genre insertion and rewrite
//! - [`resolver`] - artist genre lookup with a per-run cache
//! - [`triage`] - genres the taxonomy does not know yet
//! - [`partition`] - class and bucket playlists with size policies
//! - [`delta`] - tracks liked since the last confirmed run
//! - [`sync`] - remote reconciliation, dry-run aware
//! - [`ownership`] - owner, name and date filters over playlists
//!
//! Everything here runs sequentially: each remote call is awaited before the
//! next one is issued, with fixed [`Pacing`] delays in between.

use std::time::Duration;

pub mod delta;
pub mod ownership;
pub mod partition;
pub mod resolver;
pub mod sync;
pub mod taxonomy;
pub mod triage;

pub use delta::{DeltaPage, desired_additions, new_liked_tracks, take_newer};
pub use ownership::{
    AUTO_MARKER, DateWindow, DeletionCandidate, DeletionTarget, NamePredicate, filter_by_name,
    filter_owned,
};
pub use partition::{Partition, PlaylistKind, PlaylistSpec, partition};
pub use resolver::{GenreIndex, GenreResolver, UNKNOWN_GENRE};
pub use sync::{SyncExecutor, SyncOutcome, SyncReport};
pub use taxonomy::{AddOutcome, ClassDocument, GenreClass, Taxonomy};
pub use triage::{
    BucketChoice, ConsoleDecisions, Decision, DecisionProvider, SkipUnknown, TriageReport,
    UnknownGenre, triage, unknown_genres,
};

/// Fixed self-throttling delays between remote calls.
///
/// The delays are not adaptive and do not react to rate-limit responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After every cold artist lookup.
    pub artist_lookup: Duration,
    /// Between pages of a paginated listing.
    pub page: Duration,
    /// After every add-tracks batch and after every finished playlist.
    pub batch: Duration,
    /// After every unfollow.
    pub unfollow: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            artist_lookup: Duration::from_millis(100),
            page: Duration::from_millis(100),
            batch: Duration::from_millis(200),
            unfollow: Duration::from_millis(150),
        }
    }
}

impl Pacing {
    /// No delays at all, for tests and fakes.
    pub fn none() -> Self {
        Self {
            artist_lookup: Duration::ZERO,
            page: Duration::ZERO,
            batch: Duration::ZERO,
            unfollow: Duration::ZERO,
        }
    }

    pub(crate) async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
