//! Question history, persisted as a JSON list next to the database.
//!
//! The pipeline itself neither reads nor writes history; it belongs
//! entirely to this presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub sql: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

impl HistoryEntry {
    pub fn success(question: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            question: question.into(),
            sql: Some(sql.into()),
            success: true,
            error: None,
        }
    }

    pub fn failure(question: impl Into<String>, sql: Option<String>, error: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            question: question.into(),
            sql,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Load existing history; a missing file is an empty history.
pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Vec<HistoryEntry>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Append one entry, rewriting the whole file.
pub fn append<P: AsRef<Path>>(path: P, entry: HistoryEntry) -> io::Result<()> {
    let mut entries = load(&path)?;
    entries.push(entry);
    let json = serde_json::to_string_pretty(&entries)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("nlsql_history_{name}_{}.json", std::process::id()))
    }

    #[test]
    fn missing_file_is_empty_history() {
        let entries = load(temp_path("missing")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn append_and_reload_round_trip() {
        let path = temp_path("roundtrip");
        std::fs::remove_file(&path).ok();

        append(&path, HistoryEntry::success("q1", "SELECT 1")).unwrap();
        append(&path, HistoryEntry::failure("q2", None, "backend down")).unwrap();

        let entries = load(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].success);
        assert_eq!(entries[0].sql.as_deref(), Some("SELECT 1"));
        assert!(!entries[1].success);
        assert_eq!(entries[1].error.as_deref(), Some("backend down"));

        std::fs::remove_file(&path).ok();
    }
}
