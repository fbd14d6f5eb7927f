//! Collection-stats log.
//!
//! Tracks and exposes counts of what the analyzer has processed without
//! storing any composed text, key identifiers, or clipboard contents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Collection statistics for the current run.
#[derive(Debug)]
pub struct TransparencyLog {
    /// Number of keystroke events processed
    keystroke_events: AtomicU64,
    /// Number of paste events processed
    paste_events: AtomicU64,
    /// Number of sessions evaluated
    sessions_analyzed: AtomicU64,
    /// Number of verdict reports exported
    reports_exported: AtomicU64,
    /// Run start time
    run_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl TransparencyLog {
    /// Create a new transparency log.
    pub fn new() -> Self {
        Self {
            keystroke_events: AtomicU64::new(0),
            paste_events: AtomicU64::new(0),
            sessions_analyzed: AtomicU64::new(0),
            reports_exported: AtomicU64::new(0),
            run_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a transparency log with persistence.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        // Try to load existing stats
        if let Err(e) = log.load() {
            eprintln!("Note: Could not load previous collection stats: {e}");
        }

        log
    }

    /// Record a keystroke event.
    pub fn record_keystroke_event(&self) {
        self.keystroke_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a paste event.
    pub fn record_paste_event(&self) {
        self.paste_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an evaluated session.
    pub fn record_session_analyzed(&self) {
        self.sessions_analyzed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an exported report.
    pub fn record_report_exported(&self) {
        self.reports_exported.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> TransparencyStats {
        TransparencyStats {
            keystroke_events: self.keystroke_events.load(Ordering::Relaxed),
            paste_events: self.paste_events.load(Ordering::Relaxed),
            sessions_analyzed: self.sessions_analyzed.load(Ordering::Relaxed),
            reports_exported: self.reports_exported.load(Ordering::Relaxed),
            run_start: self.run_start,
            run_duration_secs: (Utc::now() - self.run_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Collection Statistics:\n\
             - Keystroke events processed: {}\n\
             - Paste events processed: {}\n\
             - Sessions analyzed: {}\n\
             - Reports exported: {}\n\
             - Run duration: {} seconds\n\
             \n\
             Data Handling:\n\
             - No composed text retained\n\
             - No clipboard contents retained\n\
             - Only timing, counts, and paste lengths processed",
            stats.keystroke_events,
            stats.paste_events,
            stats.sessions_analyzed,
            stats.reports_exported,
            stats.run_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                keystroke_events: stats.keystroke_events,
                paste_events: stats.paste_events,
                sessions_analyzed: stats.sessions_analyzed,
                reports_exported: stats.reports_exported,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.keystroke_events
                    .store(persisted.keystroke_events, Ordering::Relaxed);
                self.paste_events
                    .store(persisted.paste_events, Ordering::Relaxed);
                self.sessions_analyzed
                    .store(persisted.sessions_analyzed, Ordering::Relaxed);
                self.reports_exported
                    .store(persisted.reports_exported, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.keystroke_events.store(0, Ordering::Relaxed);
        self.paste_events.store(0, Ordering::Relaxed);
        self.sessions_analyzed.store(0, Ordering::Relaxed);
        self.reports_exported.store(0, Ordering::Relaxed);
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of transparency statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransparencyStats {
    pub keystroke_events: u64,
    pub paste_events: u64,
    pub sessions_analyzed: u64,
    pub reports_exported: u64,
    pub run_start: DateTime<Utc>,
    pub run_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    keystroke_events: u64,
    paste_events: u64,
    sessions_analyzed: u64,
    reports_exported: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared transparency log.
pub type SharedTransparencyLog = Arc<TransparencyLog>;

/// Create a new shared transparency log.
pub fn create_shared_log() -> SharedTransparencyLog {
    Arc::new(TransparencyLog::new())
}

/// Create a new shared transparency log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedTransparencyLog {
    Arc::new(TransparencyLog::with_persistence(path))
}
