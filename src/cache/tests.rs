use super::*;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn write_then_read_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    write_string_atomic(&path, r#"{"a":1}"#).unwrap();
    assert_eq!(try_read_to_string(&path).unwrap(), r#"{"a":1}"#);
}

#[test]
fn missing_file_reads_as_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(try_read_to_string(&path).is_none());
}

#[test]
fn atomic_write_leaves_no_temp_file_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    write_string_atomic(&path, "x").unwrap();
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("artifact.json")]);
}

#[test]
fn freshness_respects_ttl() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    write_string_atomic(&path, "x").unwrap();
    assert!(is_fresh(&path, Duration::from_secs(3600)));
    assert!(!is_fresh(&path, Duration::from_secs(0)));
}

#[test]
fn missing_artifact_is_never_fresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(!is_fresh(&path, Duration::from_secs(86_400)));
}

#[test]
fn append_line_creates_and_grows_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("week_1").join("weather.jsonl");
    append_line(&path, "{\"a\":1}").unwrap();
    append_line(&path, "{\"a\":2}").unwrap();
    let contents = try_read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn player_model_path_is_keyed_by_id_and_year() {
    let root = PathBuf::from("/tmp/cache-root");
    let path = player_model_path(&root, 4567, 2026);
    assert_eq!(path, root.join("player_4567_2026.json"));
}
