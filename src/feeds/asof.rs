//! As-of resolution and staleness marking: wraps
//! [`crate::feeds::store::SnapshotStore::resolve`] with the
//! `degrade_warn` miss policy and the per-feed staleness check.

use chrono::{DateTime, Duration, Utc};

use crate::feeds::envelope::FeedEnvelope;
use crate::feeds::store::SnapshotStore;

/// Resolve a feed as of `as_of` (or "latest" when `None`), falling back
/// to a neutral envelope with `as_of_miss` on a true miss, and flagging
/// `stale` when the resolved record is older than `as_of - max_staleness`.
pub fn resolve_as_of(
    store: &SnapshotStore,
    league_id: u32,
    year: u16,
    week: u32,
    feed_name: &str,
    as_of: Option<DateTime<Utc>>,
    max_staleness_seconds: Option<i64>,
) -> FeedEnvelope {
    match store.resolve(league_id, year, week, feed_name, as_of) {
        Some(mut envelope) => {
            if let (Some(cutoff), Some(max_staleness)) = (as_of, max_staleness_seconds) {
                let threshold = cutoff - Duration::seconds(max_staleness.max(0));
                if envelope.publish_time < threshold {
                    envelope = envelope
                        .with_flag("stale")
                        .with_warning(format!("feed {feed_name} record is stale as of {cutoff}"));
                }
            }
            envelope
        }
        None => FeedEnvelope::neutral(
            as_of.unwrap_or_else(Utc::now),
            "as_of_miss",
            format!("no {feed_name} record at or before the as-of cutoff"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::tempdir;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn resolves_to_cutoff_record_not_future_records() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let t0 = FeedEnvelope::new(json!({"tag": "t0"}), at(0), at(0));
        let t1 = FeedEnvelope::new(json!({"tag": "t1"}), at(100), at(100));
        let t2 = FeedEnvelope::new(json!({"tag": "t2"}), at(200), at(200));
        store.record(1, 2026, 4, "weather", &t0).unwrap();
        store.record(1, 2026, 4, "weather", &t1).unwrap();
        store.record(1, 2026, 4, "weather", &t2).unwrap();

        let resolved = resolve_as_of(&store, 1, 2026, 4, "weather", Some(at(100)), None);
        assert_eq!(resolved.data["tag"], "t1");
        assert!(!resolved.has_flag("as_of_miss"));
    }

    #[test]
    fn missing_records_degrade_to_neutral_with_as_of_miss() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let resolved = resolve_as_of(&store, 1, 2026, 4, "weather", Some(at(50)), None);
        assert!(resolved.has_flag("as_of_miss"));
        assert!(!resolved.warnings.is_empty());
    }

    #[test]
    fn stale_record_is_flagged_but_still_returned() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let old = FeedEnvelope::new(json!({"tag": "old"}), at(0), at(0));
        store.record(1, 2026, 4, "weather", &old).unwrap();

        let resolved = resolve_as_of(&store, 1, 2026, 4, "weather", Some(at(1000)), Some(500));
        assert_eq!(resolved.data["tag"], "old");
        assert!(resolved.has_flag("stale"));
    }
}
