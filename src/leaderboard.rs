//! Persistent leaderboard.
//!
//! Scores live in a versioned TOML file (`saves/leaderboard_v1.toml`).  A
//! schema change bumps both the version field and the file name so old and new
//! formats never mix.  Older files without a `version` key are migrated in
//! place on load.
//!
//! Failure policy: an unreadable or corrupt store reads as "no scores yet";
//! a failed write is logged and swallowed.  Only name validation surfaces an
//! error to the caller, and that one is shown inline.

use crate::config::Difficulty;
use crate::constants::{NAME_MAX_LEN, NAME_MIN_LEN};
use crate::error::{GameError, GameResult};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const LEADERBOARD_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    pub difficulty: Difficulty,
    /// Archetype id, e.g. `"atlas"`.
    pub archetype: String,
    /// Seconds since the Unix epoch.
    pub date: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct LeaderboardFile {
    version: u32,
    #[serde(default)]
    entries: Vec<ScoreEntry>,
}

/// Check a player name: 3–10 characters of letters, digits, space or `_`.
///
/// Leading and trailing whitespace is ignored.  Returns the trimmed name.
pub fn validate_name(raw: &str) -> GameResult<String> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < NAME_MIN_LEN || len > NAME_MAX_LEN {
        return Err(GameError::InvalidName {
            reason: format!("must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters"),
        });
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == ' ' || *c == '_'))
    {
        return Err(GameError::InvalidName {
            reason: format!("'{bad}' is not allowed (letters, digits, space, _)"),
        });
    }
    Ok(name.to_string())
}

/// Highest score first; equal scores put the most recent entry first.
pub fn sort_entries(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(b.date.cmp(&a.date)));
}

pub fn current_unix_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// `YYYY-MM-DD` (UTC) for a Unix timestamp.
pub fn format_date(unix: u64) -> String {
    i64::try_from(unix)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// ── Stores ────────────────────────────────────────────────────────────────────

/// Backing store for the leaderboard.
pub trait ScoreStore {
    fn load_scores(&self) -> GameResult<Vec<ScoreEntry>>;
    fn save_scores(&mut self, entries: &[ScoreEntry]) -> GameResult<()>;
}

/// TOML file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(PathBuf::from("saves").join(format!("leaderboard_v{LEADERBOARD_VERSION}.toml")))
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load_scores(&self) -> GameResult<Vec<ScoreEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|err| GameError::Storage {
            context: format!("failed to read {}: {err}", self.path.display()),
        })?;
        parse_with_migration(&contents)
    }

    fn save_scores(&mut self, entries: &[ScoreEntry]) -> GameResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|err| GameError::Storage {
                context: format!("failed to create {}: {err}", dir.display()),
            })?;
        }
        let file = LeaderboardFile {
            version: LEADERBOARD_VERSION,
            entries: entries.to_vec(),
        };
        let serialized = toml::to_string_pretty(&file).map_err(|err| GameError::Serialization {
            message: err.to_string(),
        })?;
        fs::write(&self.path, serialized).map_err(|err| GameError::Storage {
            context: format!("failed to write {}: {err}", self.path.display()),
        })
    }
}

fn parse_with_migration(contents: &str) -> GameResult<Vec<ScoreEntry>> {
    let mut value: toml::Value = toml::from_str(contents).map_err(|err| {
        GameError::Serialization {
            message: format!("failed to parse leaderboard TOML: {err}"),
        }
    })?;

    migrate_value(&mut value)?;

    let file: LeaderboardFile = value.try_into().map_err(|err| GameError::Serialization {
        message: format!("failed to decode migrated leaderboard: {err}"),
    })?;
    Ok(file.entries)
}

fn migrate_value(value: &mut toml::Value) -> GameResult<()> {
    let table = value.as_table_mut().ok_or_else(|| GameError::Serialization {
        message: "leaderboard root must be a TOML table".to_string(),
    })?;

    if !table.contains_key("version") {
        table.insert(
            "version".to_string(),
            toml::Value::Integer(LEADERBOARD_VERSION as i64),
        );
    }

    let version = table
        .get("version")
        .and_then(toml::Value::as_integer)
        .ok_or_else(|| GameError::Serialization {
            message: "leaderboard version is missing or invalid".to_string(),
        })?;

    if version != LEADERBOARD_VERSION as i64 {
        return Err(GameError::Serialization {
            message: format!(
                "unsupported leaderboard version {} (expected {})",
                version, LEADERBOARD_VERSION
            ),
        });
    }
    Ok(())
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entries: Vec<ScoreEntry>,
    /// Simulate an unavailable store: every call fails.
    pub broken: bool,
}

impl ScoreStore for MemoryStore {
    fn load_scores(&self) -> GameResult<Vec<ScoreEntry>> {
        if self.broken {
            return Err(GameError::Storage {
                context: "memory store unavailable".to_string(),
            });
        }
        Ok(self.entries.clone())
    }

    fn save_scores(&mut self, entries: &[ScoreEntry]) -> GameResult<()> {
        if self.broken {
            return Err(GameError::Storage {
                context: "memory store unavailable".to_string(),
            });
        }
        self.entries = entries.to_vec();
        Ok(())
    }
}

// ── Operations ────────────────────────────────────────────────────────────────

/// Stored scores, or an empty board if the store cannot be read.
pub fn load_or_empty(store: &dyn ScoreStore) -> Vec<ScoreEntry> {
    match store.load_scores() {
        Ok(mut entries) => {
            sort_entries(&mut entries);
            entries
        }
        Err(err) => {
            warn!("Leaderboard unavailable ({err}); starting empty");
            Vec::new()
        }
    }
}

/// Add `entry`, keep the top `cap` and persist.  Returns the new board even
/// when the write fails.
pub fn submit(store: &mut dyn ScoreStore, entry: ScoreEntry, cap: usize) -> Vec<ScoreEntry> {
    let mut entries = load_or_empty(store);
    entries.push(entry);
    sort_entries(&mut entries);
    entries.truncate(cap);
    match store.save_scores(&entries) {
        Ok(()) => info!("Leaderboard saved ({} entries)", entries.len()),
        Err(err) => error!("Failed to save leaderboard: {err}"),
    }
    entries
}

/// Bevy resource wrapping the active store.
#[derive(Resource)]
pub struct ScoreBoard {
    pub store: Box<dyn ScoreStore + Send + Sync>,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self {
            store: Box::new(FileStore::default()),
        }
    }
}

impl ScoreBoard {
    pub fn entries(&self) -> Vec<ScoreEntry> {
        load_or_empty(self.store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64, date: u64) -> ScoreEntry {
        ScoreEntry {
            name: name.to_string(),
            score,
            difficulty: Difficulty::Medium,
            archetype: "atlas".to_string(),
            date,
        }
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("ab").is_err());
        assert_eq!(validate_name("Ab_9").as_deref(), Ok("Ab_9"));
        assert_eq!(validate_name("  Neo One ").as_deref(), Ok("Neo One"));
        assert!(validate_name("ElevenChars").is_err());
        assert!(validate_name("bad-name").is_err());
    }

    #[test]
    fn ties_put_most_recent_first() {
        let mut entries = vec![entry("old", 500, 10), entry("top", 900, 1), entry("new", 500, 20)];
        sort_entries(&mut entries);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["top", "new", "old"]);
    }

    #[test]
    fn submit_truncates_to_cap() {
        let mut store = MemoryStore::default();
        for i in 0..20 {
            submit(&mut store, entry("pilot", i * 10, i), 15);
        }
        assert_eq!(store.entries.len(), 15);
        assert_eq!(store.entries[0].score, 190);
        assert!(store.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn broken_store_reads_empty_and_submit_survives() {
        let mut store = MemoryStore {
            broken: true,
            ..MemoryStore::default()
        };
        assert!(load_or_empty(&store).is_empty());
        let board = submit(&mut store, entry("pilot", 42, 1), 15);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn file_without_version_is_migrated() {
        let contents = r#"
[[entries]]
name = "Ada"
score = 1200
difficulty = "hard"
archetype = "comet"
date = 1700000000
"#;
        let entries = parse_with_migration(contents).expect("legacy file must migrate");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].difficulty, Difficulty::Hard);
    }

    #[test]
    fn future_version_is_rejected() {
        assert!(parse_with_migration("version = 2\nentries = []\n").is_err());
    }

    #[test]
    fn file_store_round_trip_in_temp_dir() {
        let dir = std::env::temp_dir().join(format!("psyche-rover-lb-{}", std::process::id()));
        let mut store = FileStore::new(dir.join("leaderboard_v1.toml"));
        submit(&mut store, entry("Ada", 300, 5), 15);
        submit(&mut store, entry("Bob", 700, 6), 15);
        let loaded = load_or_empty(&store);
        assert_eq!(loaded[0].name, "Bob");
        assert_eq!(loaded.len(), 2);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn dates_format_as_iso_days() {
        assert_eq!(format_date(0), "1970-01-01");
        assert_eq!(format_date(1_700_000_000), "2023-11-14");
    }

    #[test]
    fn out_of_range_date_reads_unknown() {
        assert_eq!(format_date(u64::MAX), "unknown");
    }

    #[test]
    fn current_timestamp_is_after_the_epoch() {
        assert!(current_unix_timestamp() > 1_700_000_000);
    }
}
