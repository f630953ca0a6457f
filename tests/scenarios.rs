//! End-to-end matching scenarios.
//!
//! Tests the full stack: RecordSource → PlateIndex → BkTree, including
//! the published-snapshot lookups used by the request layer and the
//! plate-file export used for refreshes.

use std::io::Write;

use platematch::{
    levenshtein, BkTree, Config, DuplicatePolicy, LineFileSource, Match, PlateIndex,
    PlateMatchError, PlateStatus, StaticSource, ValidationError,
};

/// Helper: open an index over `plates` with default config.
fn open_index(plates: &[&str]) -> PlateIndex {
    PlateIndex::open(&StaticSource::new(plates.iter().copied()), Config::default()).unwrap()
}

// ============================================================================
// Distance fixtures
// ============================================================================

#[test]
fn test_known_distance_fixtures() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("ABC123", "ABCl23"), 1);
}

// ============================================================================
// Search scenarios
// ============================================================================

#[test]
fn test_single_near_match() {
    let index = open_index(&["ABC123", "XYZ789", "DEF456"]);
    assert_eq!(index.search("ABCl23", 2), vec![Match::new("ABC123", 1)]);
}

#[test]
fn test_no_match_beyond_threshold() {
    let index = open_index(&["ABC123", "XYZ789"]);
    assert!(index.search("ZZZ999", 2).is_empty());
}

#[test]
fn test_empty_index_returns_nothing() {
    let index = PlateIndex::new(Config::default()).unwrap();
    assert!(index.search("ANYTHING", 5).is_empty());

    let tree = BkTree::new();
    assert!(tree.search("ANYTHING", 5).is_empty());
}

#[test]
fn test_duplicate_insertion_skip_policy() {
    let index = open_index(&["XYZ789", "XYZ789"]);
    assert_eq!(index.len(), 1);
    assert_eq!(index.search("XYZ789", 0), vec![Match::new("XYZ789", 0)]);
}

#[test]
fn test_duplicate_insertion_keep_policy() {
    let config = Config {
        duplicate_policy: DuplicatePolicy::Keep,
        ..Default::default()
    };
    let index = PlateIndex::open(&StaticSource::new(["XYZ789", "XYZ789"]), config).unwrap();

    let matches = index.search("XYZ789", 0);
    assert_eq!(matches.len(), 2);
    for m in matches {
        assert_eq!(m, Match::new("XYZ789", 0));
    }
}

#[test]
fn test_ranked_output_is_deterministic() {
    let index = open_index(&["ABD123", "ABC124", "ABC123", "ABC133"]);
    let first = index.search("ABC123", 2);
    let second = index.search("ABC123", 2);
    assert_eq!(first, second);

    let distances: Vec<usize> = first.iter().map(|m| m.distance).collect();
    let mut sorted = distances.clone();
    sorted.sort_unstable();
    assert_eq!(distances, sorted);
}

// ============================================================================
// Lookup boundary
// ============================================================================

#[test]
fn test_lookup_registered_and_unregistered() {
    let index = open_index(&["ABC123", "XYZ789", "DEF456"]);

    let report = index.lookup("XYZ78P", None).unwrap();
    assert_eq!(report.status, PlateStatus::Registered);
    assert_eq!(report.best(), Some(&Match::new("XYZ789", 1)));

    let report = index.lookup("ZZZ999", Some(2)).unwrap();
    assert_eq!(report.status, PlateStatus::Unregistered);
    assert!(report.matches.is_empty());
}

#[test]
fn test_lookup_negative_distance_is_invalid_argument() {
    let index = open_index(&["ABC123"]);
    let err = index.lookup("ABC123", Some(-2)).unwrap_err();
    assert!(matches!(
        err,
        PlateMatchError::Validation(ValidationError::NegativeDistance { value: -2 })
    ));
}

#[test]
fn test_lookup_report_serializes() {
    let index = open_index(&["ABC123"]);
    let report = index.lookup("ABCl23", Some(1)).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert_eq!(
        json,
        r#"{"detected_plate":"ABCl23","matches":[{"term":"ABC123","distance":1}],"status":"registered"}"#
    );
}

// ============================================================================
// Plate file export
// ============================================================================

#[test]
fn test_rebuild_from_refreshed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "ABC123").unwrap();
    writeln!(file, "XYZ789").unwrap();
    file.flush().unwrap();

    let source = LineFileSource::new(file.path());
    let index = PlateIndex::open(&source, Config::default()).unwrap();
    assert_eq!(index.len(), 2);
    assert!(index.search("DEF456", 0).is_empty());

    // Registry export grows; a rebuild picks it up
    writeln!(file, "DEF456").unwrap();
    file.flush().unwrap();

    assert_eq!(index.rebuild(&source).unwrap(), 2);
    assert_eq!(index.len(), 3);
    assert_eq!(index.search("DEF456", 0), vec![Match::new("DEF456", 0)]);
}

#[test]
fn test_missing_file_keeps_previous_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plates.txt");
    std::fs::write(&path, "ABC123\n").unwrap();

    let source = LineFileSource::new(&path);
    let index = PlateIndex::open(&source, Config::default()).unwrap();

    std::fs::remove_file(&path).unwrap();
    let err = index.rebuild(&source).unwrap_err();
    assert!(err.is_source());
    assert_eq!(index.generation(), 1);
    assert_eq!(index.search("ABC123", 0).len(), 1);
}
