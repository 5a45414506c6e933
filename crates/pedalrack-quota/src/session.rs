//! Per-client session state.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::limits::PROCESS_RETENTION_HOURS;

/// Resource usage of one client.
///
/// Sessions live inside a [`SessionTracker`](crate::SessionTracker); callers only
/// ever see cloned snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSession {
    /// Opaque client identifier.
    pub client_id: String,
    /// When the session was first seen.
    pub created_at: DateTime<Utc>,
    /// Last upload or processing event.
    pub last_activity: DateTime<Utc>,
    /// Files the client currently holds.
    pub file_ids: Vec<String>,
    /// Recent processing events, oldest first.
    pub process_events: Vec<DateTime<Utc>>,
    /// Bytes held across the client's current files.
    pub bytes_uploaded: u64,
}

impl UserSession {
    pub(crate) fn new(client_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            client_id: client_id.to_string(),
            created_at: now,
            last_activity: now,
            file_ids: Vec::new(),
            process_events: Vec::new(),
            bytes_uploaded: 0,
        }
    }

    /// Number of files held.
    pub fn file_count(&self) -> usize {
        self.file_ids.len()
    }

    /// Returns true if the client holds `file_id`.
    pub fn holds(&self, file_id: &str) -> bool {
        self.file_ids.iter().any(|id| id == file_id)
    }

    /// Processing events strictly newer than `now - window`.
    pub fn recent_process_count(&self, now: DateTime<Utc>, window: Duration) -> usize {
        let cutoff = now - window;
        self.process_events.iter().filter(|ts| **ts > cutoff).count()
    }

    /// Returns true if the session has been idle for longer than `max_age`.
    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.last_activity > max_age
    }

    /// Register a file. Re-registering a held file id changes nothing.
    pub(crate) fn add_file(&mut self, file_id: &str, size_bytes: u64, now: DateTime<Utc>) {
        self.last_activity = now;
        if self.holds(file_id) {
            return;
        }
        self.file_ids.push(file_id.to_string());
        self.bytes_uploaded = self.bytes_uploaded.saturating_add(size_bytes);
    }

    /// Release a file. Returns false if it was not held.
    pub(crate) fn remove_file(&mut self, file_id: &str, size_bytes: u64, now: DateTime<Utc>) -> bool {
        let Some(pos) = self.file_ids.iter().position(|id| id == file_id) else {
            return false;
        };
        self.file_ids.remove(pos);
        self.bytes_uploaded = self.bytes_uploaded.saturating_sub(size_bytes);
        self.last_activity = now;
        true
    }

    /// Record a processing event and prune events past the retention window.
    pub(crate) fn add_process(&mut self, now: DateTime<Utc>) {
        self.process_events.push(now);
        self.last_activity = now;
        let cutoff = now - Duration::hours(PROCESS_RETENTION_HOURS);
        self.process_events.retain(|ts| *ts > cutoff);
    }

    /// No held files and no retained processing events.
    pub(crate) fn is_vacant(&self, now: DateTime<Utc>) -> bool {
        self.file_ids.is_empty()
            && self.recent_process_count(now, Duration::hours(PROCESS_RETENTION_HOURS)) == 0
    }
}
