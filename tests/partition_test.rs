mod common;

use common::{FakeService, simple_class, track, write_class};
use genrecli::classification::{
    GenreIndex, GenreResolver, Pacing, PlaylistKind, Taxonomy, partition,
    partition::{MAX_PLAYLIST_TRACKS, MIN_PLAYLIST_TRACKS, bucket_playlist_name, class_playlist_name},
    unknown_genres,
};
use tempfile::{TempDir, tempdir};

async fn load(classes: &[(&str, String)]) -> (TempDir, Taxonomy) {
    let dir = tempdir().unwrap();
    for (file, json) in classes {
        write_class(dir.path(), file, json);
    }
    let taxonomy = Taxonomy::load(dir.path()).await.unwrap();
    (dir, taxonomy)
}

fn uris(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}:{i:04}")).collect()
}

#[test]
fn test_playlist_names_carry_marker() {
    assert_eq!(class_playlist_name("Electro"), "Electro (auto)");
    assert_eq!(bucket_playlist_name("02", "Deep House"), "[02] Deep House (auto)");
}

#[test]
fn test_descriptions() {
    let class = PlaylistKind::Class {
        code: "02".to_string(),
        label: "Electro".to_string(),
    };
    let bucket = PlaylistKind::Bucket {
        class_code: "02".to_string(),
        bucket_key: "2.1".to_string(),
        bucket_label: "House".to_string(),
    };

    assert_eq!(
        class.description(),
        "Auto-generated playlist for class 02: Electro"
    );
    assert_eq!(
        bucket.description(),
        "Auto-generated playlist for sub-genre 2.1 (House) of class 02"
    );
}

#[tokio::test]
async fn test_example_scenario_yields_no_playlist() {
    let (_dir, taxonomy) = load(&[(
        "01.json",
        simple_class("01", "Electro", &["house", "techno"]),
    )])
    .await;
    let service = FakeService::new("me")
        .with_artist("a", &["house"])
        .with_artist("b", &["techno"])
        .with_artist("c", &["jazz"]);
    let tracks = vec![
        track("A", Some("a"), None),
        track("B", Some("b"), None),
        track("C", Some("c"), None),
    ];

    let index = GenreResolver::new(&service, Pacing::none())
        .resolve(&tracks)
        .await;

    assert_eq!(index.tracks("house"), &["A".to_string()]);
    assert_eq!(index.tracks("techno"), &["B".to_string()]);
    assert_eq!(index.tracks("jazz"), &["C".to_string()]);

    let unknown: Vec<String> = unknown_genres(&index, &taxonomy)
        .into_iter()
        .map(|u| u.genre)
        .collect();
    assert_eq!(unknown, vec!["jazz"]);

    let planned = partition(&taxonomy, &index);
    assert!(planned.playlists.is_empty());
    let skipped_class = planned
        .skipped
        .iter()
        .find(|s| s.name == "Electro (auto)")
        .unwrap();
    assert_eq!(skipped_class.total_tracks, 2);
}

#[tokio::test]
async fn test_minimum_size_policy() {
    let (_dir, taxonomy) = load(&[
        ("01.json", simple_class("01", "Small", &["small"])),
        ("02.json", simple_class("02", "Exact", &["exact"])),
    ])
    .await;
    let mut index = GenreIndex::new();
    for uri in uris("s", MIN_PLAYLIST_TRACKS - 1) {
        index.insert("small", &uri);
    }
    for uri in uris("e", MIN_PLAYLIST_TRACKS) {
        index.insert("exact", &uri);
    }

    let planned = partition(&taxonomy, &index);
    let names: Vec<&str> = planned.playlists.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(names, vec!["Exact (auto)", "[02] Exact core (auto)"]);
    assert_eq!(planned.skipped.len(), 2);
    assert!(planned.skipped.iter().all(|s| s.name.contains("Small")));
}

#[tokio::test]
async fn test_track_lands_in_every_matching_class() {
    let (_dir, taxonomy) = load(&[
        ("01.json", simple_class("01", "Electro", &["house"])),
        ("02.json", simple_class("02", "Pop", &["dance pop"])),
    ])
    .await;
    let index: GenreIndex = vec![
        ("house", "t:shared"),
        ("dance pop", "t:shared"),
        ("house", "t:1"),
        ("house", "t:2"),
        ("dance pop", "t:3"),
        ("dance pop", "t:4"),
    ]
    .into_iter()
    .collect();

    let planned = partition(&taxonomy, &index);

    let electro = planned
        .class_playlists()
        .find(|p| p.name == "Electro (auto)")
        .unwrap();
    let pop = planned
        .class_playlists()
        .find(|p| p.name == "Pop (auto)")
        .unwrap();
    assert!(electro.track_uris.contains(&"t:shared".to_string()));
    assert!(pop.track_uris.contains(&"t:shared".to_string()));
}

#[tokio::test]
async fn test_class_candidates_are_deduplicated_across_buckets() {
    let (_dir, taxonomy) = load(&[(
        "01.json",
        r#"{
            "class_code": "01",
            "class_label": "Rock",
            "buckets": {"1.1": "Classic", "1.2": "Indie", "1.3": "Empty"},
            "genres_by_bucket": {"1.1": ["classic rock"], "1.2": ["indie rock"], "1.3": []}
        }"#
        .to_string(),
    )])
    .await;
    let index: GenreIndex = vec![
        ("classic rock", "t:1"),
        ("classic rock", "t:2"),
        ("classic rock", "t:3"),
        ("indie rock", "t:3"),
        ("indie rock", "t:4"),
        ("indie rock", "t:5"),
    ]
    .into_iter()
    .collect();

    let planned = partition(&taxonomy, &index);

    let class = planned.class_playlists().next().unwrap();
    assert_eq!(class.track_uris, vec!["t:1", "t:2", "t:3", "t:4", "t:5"]);
    assert_eq!(class.source_genre_count, 2);

    let buckets: Vec<&str> = planned
        .bucket_playlists()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(
        buckets,
        vec!["[01] Classic (auto)", "[01] Indie (auto)"]
    );
    assert!(planned.skipped.iter().all(|s| !s.name.contains("Empty")));
}

#[tokio::test]
async fn test_truncation_keeps_first_seen_tracks() {
    let (_dir, taxonomy) = load(&[(
        "01.json",
        simple_class("01", "Huge", &["first", "second"]),
    )])
    .await;
    let first = uris("a", 700);
    let second = uris("b", 700);
    let mut index = GenreIndex::new();
    for uri in &first {
        index.insert("first", uri);
    }
    for uri in &second {
        index.insert("second", uri);
    }

    let planned = partition(&taxonomy, &index);
    let again = partition(&taxonomy, &index);

    let class = planned.class_playlists().next().unwrap();
    assert_eq!(class.total_tracks, 1400);
    assert_eq!(class.track_uris.len(), MAX_PLAYLIST_TRACKS);
    assert_eq!(class.track_uris[..700], first[..]);
    assert_eq!(class.track_uris[700..], second[..300]);
    assert_eq!(planned, again);
}
