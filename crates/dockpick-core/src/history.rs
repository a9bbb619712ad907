//! Recently dispatched actions
//!
//! Persisted to `<data dir>/history` as `timestamp|container|action` lines,
//! newest first, never more than [`HISTORY_LIMIT`] lines.

use crate::store::{read_lines, write_lines};
use crate::{Action, Result};
use chrono::{Local, NaiveDateTime};
use dockpick_config::Config;
use std::path::{Path, PathBuf};

/// Maximum number of entries kept
pub const HISTORY_LIMIT: usize = 20;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: NaiveDateTime,
    pub container: String,
    pub action: Action,
}

impl HistoryEntry {
    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.container,
            self.action
        )
    }

    fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.splitn(3, '|');
        let timestamp = NaiveDateTime::parse_from_str(parts.next()?, TIMESTAMP_FORMAT).ok()?;
        let container = parts.next()?.to_string();
        let action = parts.next()?.parse().ok()?;
        Some(Self {
            timestamp,
            container,
            action,
        })
    }
}

/// Bounded newest-first action log backed by a file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store at the location named by the configuration
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::at(config.history_path()?))
    }

    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an action now
    pub fn record(&self, container: &str, action: Action) -> Result<()> {
        self.record_at(container, action, Local::now().naive_local())
    }

    /// Record an action with an explicit timestamp
    pub fn record_at(&self, container: &str, action: Action, timestamp: NaiveDateTime) -> Result<()> {
        let entry = HistoryEntry {
            timestamp,
            container: container.to_string(),
            action,
        };
        let mut lines = vec![entry.to_line()];
        lines.extend(read_lines(&self.path)?);
        lines.truncate(HISTORY_LIMIT);
        write_lines(&self.path, &lines)
    }

    /// Up to `limit` entries, most recent first. Unreadable lines are skipped.
    pub fn list(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        Ok(read_lines(&self.path)?
            .iter()
            .filter_map(|line| {
                let entry = HistoryEntry::parse_line(line);
                if entry.is_none() {
                    tracing::warn!("Skipping malformed history line: {}", line);
                }
                entry
            })
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, minute, 0)
            .unwrap()
    }

    fn store() -> (tempfile::TempDir, HistoryStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(tmp.path().join("history"));
        (tmp, store)
    }

    #[test]
    fn test_line_format() {
        let (_tmp, store) = store();
        store.record_at("web", Action::Restart, at(5)).unwrap();
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "2024-05-01 12:05:00|web|restart\n"
        );
    }

    #[test]
    fn test_newest_first() {
        let (_tmp, store) = store();
        store.record_at("a", Action::ExecShell, at(1)).unwrap();
        store.record_at("b", Action::FollowLogs, at(2)).unwrap();

        let entries = store.list(HISTORY_LIMIT).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].container, "b");
        assert_eq!(entries[0].action, Action::FollowLogs);
        assert_eq!(entries[1].container, "a");
        assert_eq!(entries[1].timestamp, at(1));
    }

    #[test]
    fn test_capped_at_limit() {
        let (_tmp, store) = store();
        for i in 0..25 {
            store
                .record_at(&format!("c{}", i), Action::ShowInfo, at(i))
                .unwrap();
        }

        let entries = store.list(100).unwrap();
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries.first().unwrap().container, "c24");
        assert_eq!(entries.last().unwrap().container, "c5");
        assert!(!entries.iter().any(|e| e.container == "c4"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), HISTORY_LIMIT);
    }

    #[test]
    fn test_list_limit_and_malformed_lines() {
        let (_tmp, store) = store();
        std::fs::write(
            store.path(),
            "2024-05-01 12:03:00|web|exec\ngarbage\n2024-05-01 12:02:00|db|reboot\n2024-05-01 12:01:00|db|ports\n",
        )
        .unwrap();

        let entries = store.list(HISTORY_LIMIT).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].action, Action::ShowPorts);

        assert_eq!(store.list(1).unwrap().len(), 1);
    }
}
