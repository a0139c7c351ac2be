mod common;

use std::collections::BTreeMap;

use common::{Call, FakeService, item, playlist};
use genrecli::{
    Error,
    classification::{
        DeletionCandidate, Pacing, PlaylistKind, PlaylistSpec, SyncExecutor, SyncOutcome,
    },
};

fn spec(label: &str, uris: Vec<String>) -> PlaylistSpec {
    let kind = PlaylistKind::Class {
        code: "01".to_string(),
        label: label.to_string(),
    };
    PlaylistSpec {
        name: kind.playlist_name(),
        total_tracks: uris.len(),
        track_uris: uris,
        kind,
        source_genre_count: 1,
    }
}

fn uris(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}:{i}")).collect()
}

fn desired(entries: &[(&str, Vec<&str>)]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(name, uris)| {
            (
                name.to_string(),
                uris.iter().map(|u| u.to_string()).collect(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_create_private_playlists_in_batches() {
    let service = FakeService::new("me");
    let executor = SyncExecutor::new(&service, Pacing::none(), true);

    let report = executor
        .create("me", &[spec("Electro", uris("t", 250))])
        .await;

    let calls = service.mutating_calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[0],
        Call::Create {
            owner: "me".to_string(),
            name: "Electro (auto)".to_string(),
            description: "Auto-generated playlist for class 01: Electro".to_string(),
            public: false,
            collaborative: false,
        }
    );
    let batch_sizes: Vec<usize> = calls[1..]
        .iter()
        .map(|c| match c {
            Call::Add { uris, .. } => uris.len(),
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(batch_sizes, vec![100, 100, 50]);

    let id = service.playlist_id("Electro (auto)").unwrap();
    assert_eq!(service.playlist_uris(&id), uris("t", 250));
    assert_eq!(
        report.outcome("Electro (auto)"),
        Some(&SyncOutcome::Created { id, added: 250 })
    );
    assert_eq!(report.failures(), 0);
}

#[tokio::test]
async fn test_create_failure_does_not_stop_the_run() {
    let service = FakeService::new("me").with_failing_create("Broken (auto)");
    let executor = SyncExecutor::new(&service, Pacing::none(), true);

    let report = executor
        .create(
            "me",
            &[spec("Broken", uris("b", 3)), spec("Fine", uris("f", 3))],
        )
        .await;

    assert!(matches!(
        report.outcome("Broken (auto)"),
        Some(SyncOutcome::Failed(_))
    ));
    assert!(matches!(
        report.outcome("Fine (auto)"),
        Some(SyncOutcome::Created { added: 3, .. })
    ));
    assert_eq!(report.failed(), 1);

    let err = report.into_result().unwrap_err();
    assert!(matches!(err, Error::Partial { failed: 1, total: 2 }));
    assert_eq!(err.exit_code(), 7);
}

#[tokio::test]
async fn test_create_dry_run_issues_no_calls() {
    let service = FakeService::new("me");
    let executor = SyncExecutor::new(&service, Pacing::none(), false);

    let created = executor.create("me", &[spec("Jazz", uris("j", 5))]).await;

    assert!(service.calls().is_empty());
    assert!(service.playlists().is_empty());
    assert_eq!(
        created.outcome("Jazz (auto)"),
        Some(&SyncOutcome::Planned { tracks: 5 })
    );
}

#[tokio::test]
async fn test_update_dry_run_reports_residual_without_writing() {
    let service = FakeService::new("me")
        .with_playlist(playlist("p1", "Electro (auto)", "me", 1), vec![item("t:1", None)])
        .with_playlist(playlist("p2", "Jazz (auto)", "me", 1), vec![item("t:5", None)]);
    let executor = SyncExecutor::new(&service, Pacing::none(), false);

    let report = executor
        .update(
            "me",
            &desired(&[
                ("Electro (auto)", vec!["t:1", "t:2", "t:3"]),
                ("Jazz (auto)", vec!["t:5"]),
                ("Gone (auto)", vec!["t:9"]),
            ]),
        )
        .await
        .unwrap();

    assert!(service.mutating_calls().is_empty());
    assert_eq!(service.playlist_uris("p1"), vec!["t:1"]);
    assert_eq!(
        report.outcome("Electro (auto)"),
        Some(&SyncOutcome::Planned { tracks: 2 })
    );
    assert_eq!(report.outcome("Jazz (auto)"), Some(&SyncOutcome::UpToDate));
    assert_eq!(report.outcome("Gone (auto)"), Some(&SyncOutcome::Missing));
    assert_eq!(report.tracks_added(), 0);
}

#[tokio::test]
async fn test_create_add_failure_is_reported_and_run_continues() {
    // the first playlist created by the fake gets id created-1
    let service = FakeService::new("me").with_failing_add("created-1");
    let executor = SyncExecutor::new(&service, Pacing::none(), true);

    let report = executor
        .create(
            "me",
            &[spec("Broken", uris("b", 3)), spec("Fine", uris("f", 3))],
        )
        .await;

    assert!(matches!(
        report.outcome("Broken (auto)"),
        Some(SyncOutcome::Failed(_))
    ));
    assert!(matches!(
        report.outcome("Fine (auto)"),
        Some(SyncOutcome::Created { added: 3, .. })
    ));
    assert_eq!(report.failed(), 1);
    assert!(service.playlist_uris("created-1").is_empty());
    assert_eq!(service.playlist_uris("created-2"), uris("f", 3));
}

#[tokio::test]
async fn test_update_add_failure_is_reported_and_run_continues() {
    let service = FakeService::new("me")
        .with_playlist(playlist("p1", "A (auto)", "me", 0), vec![])
        .with_playlist(playlist("p2", "B (auto)", "me", 0), vec![])
        .with_failing_add("p1");
    let executor = SyncExecutor::new(&service, Pacing::none(), true);

    let report = executor
        .update("me", &desired(&[("A (auto)", vec!["t:1"]), ("B (auto)", vec!["t:2"])]))
        .await
        .unwrap();

    assert!(matches!(
        report.outcome("A (auto)"),
        Some(SyncOutcome::Failed(_))
    ));
    assert_eq!(
        report.outcome("B (auto)"),
        Some(&SyncOutcome::Updated { added: 1 })
    );
    assert_eq!(report.failed(), 1);
    assert_eq!(service.playlist_uris("p2"), vec!["t:2"]);
    assert!(matches!(
        report.into_result(),
        Err(Error::Partial { failed: 1, total: 2 })
    ));
}

#[tokio::test]
async fn test_update_adds_only_the_residual() {
    let service = FakeService::new("me").with_playlist(
        playlist("p1", "Electro (auto)", "me", 2),
        vec![item("t:1", None), item("t:2", None)],
    );
    let executor = SyncExecutor::new(&service, Pacing::none(), true);

    let report = executor
        .update("me", &desired(&[("Electro (auto)", vec!["t:3", "t:1", "t:4"])]))
        .await
        .unwrap();

    assert_eq!(
        report.outcome("Electro (auto)"),
        Some(&SyncOutcome::Updated { added: 2 })
    );
    assert_eq!(
        service.mutating_calls(),
        vec![Call::Add {
            playlist: "p1".to_string(),
            uris: vec!["t:3".to_string(), "t:4".to_string()],
        }]
    );
}

#[tokio::test]
async fn test_update_twice_adds_nothing_the_second_time() {
    let service = FakeService::new("me")
        .with_playlist(playlist("p1", "Electro (auto)", "me", 0), vec![]);
    let executor = SyncExecutor::new(&service, Pacing::none(), true);
    let wanted = desired(&[("Electro (auto)", vec!["t:1", "t:2"])]);

    executor.update("me", &wanted).await.unwrap();
    service.clear_calls();
    let second = executor.update("me", &wanted).await.unwrap();

    assert!(service.mutating_calls().is_empty());
    assert_eq!(second.outcome("Electro (auto)"), Some(&SyncOutcome::UpToDate));
    assert_eq!(second.tracks_added(), 0);
}

#[tokio::test]
async fn test_update_ignores_playlists_of_other_users() {
    let service = FakeService::new("me")
        .with_playlist(playlist("theirs", "Electro (auto)", "someone", 0), vec![]);
    let executor = SyncExecutor::new(&service, Pacing::none(), true);

    let report = executor
        .update("me", &desired(&[("Electro (auto)", vec!["t:1"])]))
        .await
        .unwrap();

    assert_eq!(report.outcome("Electro (auto)"), Some(&SyncOutcome::Missing));
    assert_eq!(report.failures(), 1);
    assert_eq!(report.failed(), 0);
    assert!(service.mutating_calls().is_empty());
}

#[tokio::test]
async fn test_update_reads_playlist_list_once() {
    let service = FakeService::new("me")
        .with_playlist(playlist("p1", "A (auto)", "me", 0), vec![])
        .with_playlist(playlist("p2", "B (auto)", "me", 0), vec![]);
    let executor = SyncExecutor::new(&service, Pacing::none(), true);

    executor
        .update("me", &desired(&[("A (auto)", vec!["t:1"]), ("B (auto)", vec!["t:2"])]))
        .await
        .unwrap();

    let listings = service
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::PlaylistsPage(_)))
        .count();
    assert_eq!(listings, 1);
}

#[tokio::test]
async fn test_unfollow_candidates() {
    let service = FakeService::new("me")
        .with_playlist(playlist("p1", "Old (auto)", "me", 3), vec![])
        .with_playlist(playlist("p2", "Keep", "me", 3), vec![]);
    let candidates = vec![DeletionCandidate {
        playlist: playlist("p1", "Old (auto)", "me", 3),
        first_added: None,
    }];

    let dry = SyncExecutor::new(&service, Pacing::none(), false)
        .unfollow(&candidates)
        .await;
    assert!(service.calls().is_empty());
    assert_eq!(dry.outcome("Old (auto)"), Some(&SyncOutcome::Planned { tracks: 3 }));

    let report = SyncExecutor::new(&service, Pacing::none(), true)
        .unfollow(&candidates)
        .await;
    assert_eq!(report.outcome("Old (auto)"), Some(&SyncOutcome::Removed));
    assert_eq!(service.mutating_calls(), vec![Call::Unfollow("p1".to_string())]);
    assert_eq!(service.playlists().len(), 1);
}
