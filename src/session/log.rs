//! Session diagnostics log.
//!
//! Tracks how the capture path behaved over a tracking session: how many
//! reads parsed cleanly, how many attempts were retried, and how many reads
//! were abandoned. Nothing here affects the rate math; it exists so a stuck
//! capture path (window moved, menu closed) is visible after the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Counters for the current tracking session.
#[derive(Debug)]
pub struct SessionLog {
    /// Reads that produced a parsed value
    reads_succeeded: AtomicU64,
    /// Individual capture attempts that failed to parse
    parse_failures: AtomicU64,
    /// Reads abandoned after the retry budget was spent
    reads_abandoned: AtomicU64,
    /// Completed runs reported by the tracker
    runs_completed: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Unique id for this session
    session_id: Uuid,
    /// Path for persisting counters
    persist_path: Option<PathBuf>,
}

impl SessionLog {
    /// Create a new session log.
    pub fn new() -> Self {
        Self {
            reads_succeeded: AtomicU64::new(0),
            parse_failures: AtomicU64::new(0),
            reads_abandoned: AtomicU64::new(0),
            runs_completed: AtomicU64::new(0),
            session_start: Utc::now(),
            session_id: Uuid::new_v4(),
            persist_path: None,
        }
    }

    /// Create a session log that persists counters to the given path.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            eprintln!("Ignoring unreadable session stats, starting fresh counters: {e}");
        }

        log
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Record a read that parsed successfully.
    pub fn record_read_succeeded(&self) {
        self.reads_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a capture attempt that failed to parse.
    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a read abandoned after exhausting retries.
    pub fn record_read_abandoned(&self) {
        self.reads_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed run.
    pub fn record_run_completed(&self) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            reads_succeeded: self.reads_succeeded.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            reads_abandoned: self.reads_abandoned.load(Ordering::Relaxed),
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Successful reads: {}\n\
             - Parse failures (retried): {}\n\
             - Reads abandoned: {}\n\
             - Runs completed: {}\n\
             - Session duration: {} seconds",
            stats.reads_succeeded,
            stats.parse_failures,
            stats.reads_abandoned,
            stats.runs_completed,
            stats.session_duration_secs
        )
    }

    /// Save counters to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                reads_succeeded: stats.reads_succeeded,
                parse_failures: stats.parse_failures,
                reads_abandoned: stats.reads_abandoned,
                runs_completed: stats.runs_completed,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load counters from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.reads_succeeded
                    .store(persisted.reads_succeeded, Ordering::Relaxed);
                self.parse_failures
                    .store(persisted.parse_failures, Ordering::Relaxed);
                self.reads_abandoned
                    .store(persisted.reads_abandoned, Ordering::Relaxed);
                self.runs_completed
                    .store(persisted.runs_completed, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.reads_succeeded.store(0, Ordering::Relaxed);
        self.parse_failures.store(0, Ordering::Relaxed);
        self.reads_abandoned.store(0, Ordering::Relaxed);
        self.runs_completed.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of session statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub reads_succeeded: u64,
    pub parse_failures: u64,
    pub reads_abandoned: u64,
    pub runs_completed: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    reads_succeeded: u64,
    parse_failures: u64,
    reads_abandoned: u64,
    runs_completed: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared session log.
pub type SharedSessionLog = Arc<SessionLog>;

/// Create a new shared session log.
pub fn create_shared_log() -> SharedSessionLog {
    Arc::new(SessionLog::new())
}

/// Create a new shared session log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedSessionLog {
    Arc::new(SessionLog::with_persistence(path))
}
