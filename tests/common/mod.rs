//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use creata::services::journal::{AppendOnlyLog, JournalError};
use creata::sources::{FetchError, MarketDataAdapter, MarketRouter};
use creata::types::{JournalEntry, MarketType, PricePoint, Series, Timeframe};

/// Bars from closes, with `high = close + 1` and `low = close - 1`.
pub fn bars(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        })
        .collect()
}

/// Start at `start`, add `up` on odd bars and `down` on even bars.
pub fn zigzag_closes(start: f64, up: f64, down: f64, count: usize) -> Vec<f64> {
    let mut close = start;
    (0..count)
        .map(|i| {
            if i > 0 {
                close += if i % 2 == 1 { up } else { down };
            }
            close
        })
        .collect()
}

/// 60 bars ending 130, 129, 131 in a choppy uptrend.
pub fn rising_zigzag() -> Vec<f64> {
    zigzag_closes(100.0, 2.0, -1.0, 60)
}

/// Mirror of [`rising_zigzag`] ending 170, 171, 169.
pub fn falling_zigzag() -> Vec<f64> {
    zigzag_closes(200.0, -2.0, 1.0, 60)
}

pub fn linear_closes(start: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64).collect()
}

/// Data source that serves fixed closes, or fails on demand.
pub struct FakeSource {
    closes: Mutex<Option<Vec<f64>>>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn serving(closes: Vec<f64>) -> Arc<Self> {
        Arc::new(Self {
            closes: Mutex::new(Some(closes)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            closes: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_closes(&self, closes: Vec<f64>) {
        *self.closes.lock().unwrap() = Some(closes);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataAdapter for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch(
        &self,
        _symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let closes = self.closes.lock().unwrap().clone();
        match closes {
            Some(closes) => {
                let mut series = Series::new(timeframe, bars(&closes));
                series.truncate_to_latest(limit);
                Ok(series)
            }
            None => Err(FetchError::Status(503)),
        }
    }
}

pub fn router_with(market: MarketType, source: Arc<FakeSource>) -> MarketRouter {
    MarketRouter::new().with_adapter(market, source)
}

/// In-memory journal.
#[derive(Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl AppendOnlyLog for MemoryJournal {
    fn initialize(&self) -> Result<(), JournalError> {
        Ok(())
    }

    fn append(&self, entry: &JournalEntry) -> Result<(), JournalError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn entries(&self) -> Result<Vec<JournalEntry>, JournalError> {
        Ok(self.entries.lock().unwrap().clone())
    }
}

/// Journal whose every write fails.
pub struct FailingJournal;

impl AppendOnlyLog for FailingJournal {
    fn initialize(&self) -> Result<(), JournalError> {
        Ok(())
    }

    fn append(&self, _entry: &JournalEntry) -> Result<(), JournalError> {
        Err(JournalError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only journal",
        )))
    }

    fn entries(&self) -> Result<Vec<JournalEntry>, JournalError> {
        Ok(Vec::new())
    }
}

/// Fresh temp directory for a test, removed on drop.
pub struct TempDir(pub std::path::PathBuf);

impl TempDir {
    pub fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("creata_it_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    pub fn path(&self, file: &str) -> std::path::PathBuf {
        self.0.join(file)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// Journal whose appends block the calling thread.
pub struct SlowJournal(pub std::time::Duration);

impl AppendOnlyLog for SlowJournal {
    fn initialize(&self) -> Result<(), JournalError> {
        Ok(())
    }

    fn append(&self, _entry: &JournalEntry) -> Result<(), JournalError> {
        std::thread::sleep(self.0);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<JournalEntry>, JournalError> {
        Ok(Vec::new())
    }
}
