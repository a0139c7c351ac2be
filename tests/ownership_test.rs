mod common;

use chrono::NaiveDate;
use common::{Call, FakeService, item, playlist};
use genrecli::{
    classification::{
        DateWindow, DeletionTarget, NamePredicate, Pacing, filter_by_name, filter_owned,
        ownership::{SUSPECT_KEYWORDS, added_range, earliest_added, find_deletion_candidates},
    },
    types::PlaylistSummary,
    utils,
};

fn library() -> Vec<PlaylistSummary> {
    vec![
        playlist("p1", "Electro (auto)", "me", 10),
        playlist("p2", "Road trip", "me", 5),
        playlist("p3", "Jazz (AUTO)", "someone", 7),
        playlist("p4", "Discover Weekly", "spotify", 30),
        playlist("p5", "Empty (auto)", "me", 0),
    ]
}

fn names(playlists: &[PlaylistSummary]) -> Vec<&str> {
    playlists.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_filter_owned() {
    let all = library();

    let owned = filter_owned(&all, "me");

    assert_eq!(names(&owned), vec!["Electro (auto)", "Road trip", "Empty (auto)"]);
}

#[test]
fn test_name_predicates_ignore_case() {
    let all = library();

    let marked = filter_by_name(&all, &NamePredicate::marker());
    let suspects = filter_by_name(&all, &NamePredicate::any_of(SUSPECT_KEYWORDS));
    let mixes = filter_by_name(&all, &NamePredicate::any_of(["trip", "nothing"]));

    assert_eq!(
        names(&marked),
        vec!["Electro (auto)", "Jazz (AUTO)", "Empty (auto)"]
    );
    assert_eq!(
        names(&suspects),
        vec![
            "Electro (auto)",
            "Jazz (AUTO)",
            "Discover Weekly",
            "Empty (auto)"
        ]
    );
    assert_eq!(names(&mixes), vec!["Road trip"]);
}

#[test]
fn test_month_window_is_half_open() {
    let window = utils::parse_month("2024-02").unwrap();

    let at = |s: &str| utils::parse_timestamp(s).unwrap();
    assert!(window.contains(at("2024-02-01T00:00:00Z")));
    assert!(window.contains(at("2024-02-29T23:59:59Z")));
    assert!(!window.contains(at("2024-03-01T00:00:00Z")));
    assert!(!window.contains(at("2024-01-31T23:59:59Z")));
}

#[test]
fn test_december_window_ends_next_year() {
    let window = DateWindow::month(NaiveDate::from_ymd_opt(2023, 12, 15).unwrap()).unwrap();

    assert_eq!(window.start, utils::parse_timestamp("2023-12-01T00:00:00Z").unwrap());
    assert_eq!(window.end, utils::parse_timestamp("2024-01-01T00:00:00Z").unwrap());
}

#[test]
fn test_parse_month_rejects_garbage() {
    assert!(utils::parse_month("2024-13").is_err());
    assert!(utils::parse_month("March").is_err());
}

#[test]
fn test_added_range_ignores_undated_items() {
    let items = vec![
        item("t:1", Some("2024-03-10T00:00:00Z")),
        item("t:2", None),
        item("t:3", Some("2024-01-05T00:00:00Z")),
        item("t:4", Some("2024-06-01T00:00:00Z")),
    ];

    assert_eq!(
        earliest_added(&items),
        utils::parse_timestamp("2024-01-05T00:00:00Z")
    );
    assert_eq!(
        added_range(&items),
        Some((
            utils::parse_timestamp("2024-01-05T00:00:00Z").unwrap(),
            utils::parse_timestamp("2024-06-01T00:00:00Z").unwrap()
        ))
    );
    assert_eq!(added_range(&[item("t:1", None)]), None);
}

#[tokio::test]
async fn test_marker_deletion_never_targets_foreign_playlists() {
    let service = FakeService::new("me");
    let all = library();

    let candidates =
        find_deletion_candidates(&service, &all, "me", &DeletionTarget::Marker, Pacing::none())
            .await;

    let ids: Vec<&str> = candidates.iter().map(|c| c.playlist.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p5"]);
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_window_deletion_uses_earliest_added_of_owned_playlists() {
    let service = FakeService::new("me")
        .with_playlist(
            playlist("in", "Spring", "me", 2),
            vec![
                item("t:1", Some("2024-04-20T00:00:00Z")),
                item("t:2", Some("2024-03-02T00:00:00Z")),
            ],
        )
        .with_playlist(
            playlist("late", "Later", "me", 1),
            vec![item("t:3", Some("2024-04-02T00:00:00Z"))],
        )
        .with_playlist(playlist("empty", "Nothing", "me", 0), vec![])
        .with_playlist(
            playlist("foreign", "Theirs", "someone", 1),
            vec![item("t:4", Some("2024-03-05T00:00:00Z"))],
        );
    let all = service.playlists();
    let window = utils::parse_month("2024-03").unwrap();

    let candidates = find_deletion_candidates(
        &service,
        &all,
        "me",
        &DeletionTarget::Window(window),
        Pacing::none(),
    )
    .await;

    let ids: Vec<&str> = candidates.iter().map(|c| c.playlist.id.as_str()).collect();
    assert_eq!(ids, vec!["in"]);
    assert_eq!(
        candidates[0].first_added,
        utils::parse_timestamp("2024-03-02T00:00:00Z")
    );

    let read: Vec<Call> = service
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Items(_)))
        .collect();
    assert_eq!(
        read,
        vec![Call::Items("in".to_string()), Call::Items("late".to_string())]
    );
}
