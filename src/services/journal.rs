//! Append-only signal journal.
//!
//! Every generated signal is written to an ordered log for audit. The log is
//! never read back to produce signals.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::JournalEntry;

/// Journal persistence errors.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal is not a JSON array: {0}")]
    Serde(#[from] serde_json::Error),
}

/// An ordered log that only grows.
pub trait AppendOnlyLog: Send + Sync {
    /// Create an empty log if none exists yet.
    fn initialize(&self) -> Result<(), JournalError>;

    /// Add one entry at the end of the log.
    fn append(&self, entry: &JournalEntry) -> Result<(), JournalError>;

    /// All entries in append order.
    fn entries(&self) -> Result<Vec<JournalEntry>, JournalError>;
}

/// Journal stored as a single JSON array file.
///
/// Each append loads the whole array, pushes one record and rewrites the
/// file. There is no locking: two processes (or two concurrent requests)
/// appending at once can lose an entry. Suitable for a single low-volume
/// writer only.
pub struct JsonFileJournal {
    path: PathBuf,
}

impl JsonFileJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw records, so entries written by other tools survive a rewrite.
    fn load_raw(&self) -> Result<Vec<Value>, JournalError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store_raw(&self, records: &[Value]) -> Result<(), JournalError> {
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl AppendOnlyLog for JsonFileJournal {
    fn initialize(&self) -> Result<(), JournalError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.store_raw(&[])?;
        debug!("Created signal journal at {}", self.path.display());
        Ok(())
    }

    fn append(&self, entry: &JournalEntry) -> Result<(), JournalError> {
        let mut records = self.load_raw()?;
        records.push(serde_json::to_value(entry)?);
        self.store_raw(&records)?;
        debug!(
            "Journaled {} {} for {} ({} entries)",
            entry.signal.action.label(),
            entry.signal.timeframe,
            entry.signal.pair,
            records.len()
        );
        Ok(())
    }

    fn entries(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let records = self.load_raw()?;
        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable journal record {}: {}", i, e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Signal, SignalAction, Timeframe};
    use chrono::Utc;

    fn create_test_journal(name: &str) -> JsonFileJournal {
        let dir = std::env::temp_dir().join(format!(
            "creata_journal_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        JsonFileJournal::new(dir.join("signals.json"))
    }

    fn cleanup_test_journal(journal: &JsonFileJournal) {
        if let Some(dir) = journal.path().parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    fn entry(pair: &str, action: SignalAction) -> JournalEntry {
        JournalEntry::new(Signal {
            pair: pair.to_string(),
            timeframe: Timeframe::OneHour,
            action,
            take_profit: None,
            stop_loss: None,
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn test_initialize_creates_empty_array() {
        let journal = create_test_journal("init");
        journal.initialize().unwrap();

        let content = fs::read_to_string(journal.path()).unwrap();
        assert_eq!(content.trim(), "[]");
        assert!(journal.entries().unwrap().is_empty());
        cleanup_test_journal(&journal);
    }

    #[test]
    fn test_initialize_keeps_existing_log() {
        let journal = create_test_journal("keep");
        journal.initialize().unwrap();
        journal.append(&entry("BTC/USDT", SignalAction::Buy)).unwrap();

        journal.initialize().unwrap();
        assert_eq!(journal.entries().unwrap().len(), 1);
        cleanup_test_journal(&journal);
    }

    #[test]
    fn test_append_preserves_order() {
        let journal = create_test_journal("order");
        journal.initialize().unwrap();

        let written = vec![
            entry("BTC/USDT", SignalAction::Buy),
            entry("ETH/USDT", SignalAction::Hold),
            entry("EUR/USD", SignalAction::Sell),
        ];
        for e in &written {
            journal.append(e).unwrap();
        }

        assert_eq!(journal.entries().unwrap(), written);
        cleanup_test_journal(&journal);
    }

    #[test]
    fn test_append_without_initialize() {
        let journal = create_test_journal("lazy");
        fs::create_dir_all(journal.path().parent().unwrap()).unwrap();

        journal.append(&entry("SOL/USDT", SignalAction::Sell)).unwrap();
        assert_eq!(journal.entries().unwrap().len(), 1);
        cleanup_test_journal(&journal);
    }

    #[test]
    fn test_foreign_records_survive_append() {
        let journal = create_test_journal("foreign");
        fs::create_dir_all(journal.path().parent().unwrap()).unwrap();
        fs::write(
            journal.path(),
            r#"[{"symbol": "BTC/USDT", "market_type": "crypto", "signal": "BUY"}]"#,
        )
        .unwrap();

        journal.append(&entry("BTC/USDT", SignalAction::Hold)).unwrap();

        let raw: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(journal.path()).unwrap()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0]["market_type"], "crypto");
        // Only the record this crate wrote parses as an entry
        assert_eq!(journal.entries().unwrap().len(), 1);
        cleanup_test_journal(&journal);
    }

    #[test]
    fn test_corrupt_log_is_an_error() {
        let journal = create_test_journal("corrupt");
        fs::create_dir_all(journal.path().parent().unwrap()).unwrap();
        fs::write(journal.path(), "{not json").unwrap();

        let result = journal.append(&entry("BTC/USDT", SignalAction::Buy));
        assert!(matches!(result, Err(JournalError::Serde(_))));
        cleanup_test_journal(&journal);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let journal = create_test_journal("missing_dir");
        let result = journal.append(&entry("BTC/USDT", SignalAction::Buy));
        assert!(matches!(result, Err(JournalError::Io(_))));
    }
}
