//! Shared on-disk cache helpers: path layout + atomic write discipline.
//!
//! Every component that persists to `cache_dir` (the player model store in
//! [`crate::model::store`], the feed snapshot store in [`crate::feeds::store`])
//! goes through this module so the write discipline (temp file, fsync,
//! atomic rename) lives in one place instead of being re-derived per
//! caller.

use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

#[cfg(test)]
mod tests;

/// Root cache directory, defaulting to the OS cache dir under an
/// app-specific namespace; overridable via `SimulationConfig::cache_dir`.
pub fn default_cache_root() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("ffl-sim")
}

/// Path: `<root>/player_<id>_<year>.json`
pub fn player_model_path(root: &Path, player_id: u64, year: u16) -> PathBuf {
    root.join(format!("player_{}_{}.json", player_id, year))
}

/// Try to read a file into a String.
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();
    f.read_to_string(&mut s).ok()?;
    Some(s)
}

/// Write `contents` to `path` via a temp file + fsync + atomic rename, so a
/// reader never observes a partially written artifact.
pub fn write_string_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let tmp_path = parent.join(format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("cache"),
        std::process::id()
    ));

    {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(contents.as_bytes())?;
        f.sync_all()?;
    }

    fs::rename(&tmp_path, path)
}

/// Append a line to a file, creating it (and its parent directories) if
/// absent. Used by the append-only feed snapshot log.
pub fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(f, "{}", line)
}

/// Whether a cached artifact's mtime is still within `ttl` of now.
pub fn is_fresh(path: &Path, ttl: Duration) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age <= ttl,
        Err(_) => true, // clock skew puts mtime in the future; treat as fresh
    }
}
