use super::*;
use chrono::TimeZone;
use serde_json::json;
use tempfile::tempdir;

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn envelope(tag: &str, publish_time: DateTime<Utc>) -> FeedEnvelope {
    FeedEnvelope::new(json!({ "tag": tag }), publish_time, publish_time)
}

#[test]
fn resolve_with_no_as_of_returns_most_recent() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    store.record(1, 2026, 4, "weather", &envelope("t0", at(0))).unwrap();
    store.record(1, 2026, 4, "weather", &envelope("t1", at(100))).unwrap();
    store.record(1, 2026, 4, "weather", &envelope("t2", at(200))).unwrap();

    let resolved = store.resolve(1, 2026, 4, "weather", None).unwrap();
    assert_eq!(resolved.data["tag"], "t2");
}

#[test]
fn resolve_with_as_of_returns_latest_at_or_before_cutoff() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    store.record(1, 2026, 4, "weather", &envelope("t0", at(0))).unwrap();
    store.record(1, 2026, 4, "weather", &envelope("t1", at(100))).unwrap();
    store.record(1, 2026, 4, "weather", &envelope("t2", at(200))).unwrap();

    let resolved = store.resolve(1, 2026, 4, "weather", Some(at(150))).unwrap();
    assert_eq!(resolved.data["tag"], "t1");
}

#[test]
fn resolve_misses_when_no_record_precedes_cutoff() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    store.record(1, 2026, 4, "weather", &envelope("t0", at(500))).unwrap();

    assert!(store.resolve(1, 2026, 4, "weather", Some(at(10))).is_none());
}

#[test]
fn resolve_misses_on_unknown_feed() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    assert!(store.resolve(1, 2026, 4, "weather", None).is_none());
}

#[test]
fn prune_drops_records_older_than_retention() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let old = Utc::now() - Duration::days(100);
    let recent = Utc::now() - Duration::days(1);
    store.record(1, 2026, 4, "weather", &envelope("old", old)).unwrap();
    store.record(1, 2026, 4, "weather", &envelope("recent", recent)).unwrap();

    store.prune(45).unwrap();

    let resolved = store.resolve(1, 2026, 4, "weather", None).unwrap();
    assert_eq!(resolved.data["tag"], "recent");
}

#[test]
fn prune_removes_empty_files() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let old = Utc::now() - Duration::days(100);
    store.record(1, 2026, 4, "weather", &envelope("old", old)).unwrap();

    store.prune(45).unwrap();
    assert!(store.resolve(1, 2026, 4, "weather", None).is_none());
}
