//! Feed snapshot store.
//!
//! An append-only JSONL log per (league, year, week, feed_name), laid out
//! as `<snapshot_root>/<league_id>/<year>/week_<w>/<feed_name>.jsonl`.
//! Concurrent appenders rely on `O_APPEND`'s atomic-offset guarantee
//! rather than an advisory file lock, matching the rest of the pack's
//! preference for plain `std::fs` I/O over a locking crate.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::feeds::envelope::FeedEnvelope;

pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn feed_path(&self, league_id: u32, year: u16, week: u32, feed_name: &str) -> PathBuf {
        self.root
            .join(league_id.to_string())
            .join(year.to_string())
            .join(format!("week_{week}"))
            .join(format!("{feed_name}.jsonl"))
    }

    /// Append one envelope record. Records within a file are assumed
    /// written in non-decreasing `publish_time` order by the caller; the
    /// store does not resort on read.
    pub fn record(
        &self,
        league_id: u32,
        year: u16,
        week: u32,
        feed_name: &str,
        envelope: &FeedEnvelope,
    ) -> Result<()> {
        let path = self.feed_path(league_id, year, week, feed_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(envelope)?;
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// As-of resolution: the latest record with
    /// `publish_time <= as_of`, or the most recent record if `as_of` is
    /// `None`. Returns `None` on a true miss (no file, or no record
    /// satisfying the cutoff) — the caller (the alpha provider or the
    /// backtest evaluator) is responsible for substituting
    /// `FeedEnvelope::neutral` with the `as_of_miss` flag.
    pub fn resolve(
        &self,
        league_id: u32,
        year: u16,
        week: u32,
        feed_name: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Option<FeedEnvelope> {
        let path = self.feed_path(league_id, year, week, feed_name);
        let envelopes = read_envelopes(&path).ok()?;

        match as_of {
            None => envelopes.into_iter().max_by_key(|e| e.publish_time),
            Some(cutoff) => envelopes
                .into_iter()
                .filter(|e| e.publish_time <= cutoff)
                .max_by_key(|e| e.publish_time),
        }
    }

    /// Drop records older than `retention_days`, rewriting each file
    /// in place (temp file + atomic rename, via [`crate::cache`]).
    pub fn prune(&self, retention_days: i64) -> Result<()> {
        if !self.root.exists() {
            return Ok(());
        }
        let cutoff = Utc::now() - Duration::days(retention_days);
        for path in jsonl_files(&self.root)? {
            let kept: Vec<FeedEnvelope> = read_envelopes(&path)?
                .into_iter()
                .filter(|e| e.publish_time >= cutoff)
                .collect();
            if kept.is_empty() {
                let _ = fs::remove_file(&path);
                continue;
            }
            let mut buf = String::new();
            for e in &kept {
                buf.push_str(&serde_json::to_string(e)?);
                buf.push('\n');
            }
            crate::cache::write_string_atomic(&path, &buf)?;
        }
        Ok(())
    }
}

fn read_envelopes(path: &Path) -> Result<Vec<FeedEnvelope>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}

fn jsonl_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().map(|e| e == "jsonl").unwrap_or(false) {
                out.push(path);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests;
