//! Concurrent session map with atomic admission checks.

use chrono::Duration;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::QuotaError;
use crate::limits::{MIB, PROCESS_WINDOW_HOURS, QuotaLimits};
use crate::session::UserSession;

/// A session removed by [`SessionTracker::sweep_expired`].
///
/// The caller owns `file_ids` from here on and is expected to delete the
/// underlying uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiredSession {
    /// Client that owned the session.
    pub client_id: String,
    /// Files the client still held.
    pub file_ids: Vec<String>,
}

#[derive(Debug)]
struct Slot {
    session: UserSession,
    evicted: bool,
}

type SharedSlot = Arc<Mutex<Slot>>;

/// Tracks every client's uploads and processing events.
///
/// The map lock is only held to find or insert a session; per-client work runs
/// under that session's own lock, so clients never contend with each other.
/// Removing a session takes the map lock before the session lock, always in
/// that order.
#[derive(Debug)]
pub struct SessionTracker {
    limits: QuotaLimits,
    clock: Arc<dyn Clock>,
    sessions: RwLock<HashMap<String, SharedSlot>>,
}

impl SessionTracker {
    /// Tracker on wall-clock time.
    pub fn new(limits: QuotaLimits) -> Self {
        Self::with_clock(limits, Arc::new(SystemClock))
    }

    /// Tracker on a caller-supplied clock.
    pub fn with_clock(limits: QuotaLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            limits,
            clock,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The limits this tracker enforces.
    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    /// Snapshot of a client's session, creating it on first contact.
    pub fn session(&self, client_id: &str) -> UserSession {
        self.with_session(client_id, |session| session.clone())
    }

    /// Snapshot of a client's session if one exists.
    pub fn find(&self, client_id: &str) -> Option<UserSession> {
        let slot = self.sessions.read().get(client_id).cloned()?;
        let guard = slot.lock();
        (!guard.evicted).then(|| guard.session.clone())
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Check whether an upload of `size_bytes` would be admitted.
    ///
    /// Checks run in order: per-file size, concurrent file count, cumulative bytes.
    pub fn can_upload_file(&self, client_id: &str, size_bytes: u64) -> Result<(), QuotaError> {
        self.with_session(client_id, |session| {
            self.check_upload(session, size_bytes)
        })
        .inspect_err(|err| tracing::warn!(client = client_id, %err, "upload denied"))
    }

    /// Register an uploaded file without checking limits.
    pub fn record_file(&self, client_id: &str, file_id: &str, size_bytes: u64) {
        let now = self.clock.now();
        self.with_session(client_id, |session| session.add_file(file_id, size_bytes, now));
    }

    /// Check and register an upload under one lock.
    ///
    /// Two concurrent uploads can never both pass against the same headroom.
    pub fn try_record_file(
        &self,
        client_id: &str,
        file_id: &str,
        size_bytes: u64,
    ) -> Result<(), QuotaError> {
        let now = self.clock.now();
        self.with_session(client_id, |session| {
            self.check_upload(session, size_bytes)?;
            session.add_file(file_id, size_bytes, now);
            Ok(())
        })
        .inspect_err(|err| tracing::warn!(client = client_id, %err, "upload denied"))
    }

    /// Check whether a processing request would be admitted.
    pub fn can_process(&self, client_id: &str) -> Result<(), QuotaError> {
        self.with_session(client_id, |session| self.check_process(session))
            .inspect_err(|err| tracing::warn!(client = client_id, %err, "processing denied"))
    }

    /// Record a processing event without checking limits.
    pub fn record_process(&self, client_id: &str) {
        let now = self.clock.now();
        self.with_session(client_id, |session| session.add_process(now));
    }

    /// Check and record a processing event under one lock.
    pub fn try_record_process(&self, client_id: &str) -> Result<(), QuotaError> {
        let now = self.clock.now();
        self.with_session(client_id, |session| {
            self.check_process(session)?;
            session.add_process(now);
            Ok(())
        })
        .inspect_err(|err| tracing::warn!(client = client_id, %err, "processing denied"))
    }

    /// Release a file and its bytes.
    ///
    /// Returns whether the file was held. A session left with no files and no
    /// retained processing events is dropped.
    ///
    /// # Errors
    ///
    /// [`QuotaError::SessionNotFound`] if the client has no session.
    pub fn remove_file(
        &self,
        client_id: &str,
        file_id: &str,
        size_bytes: u64,
    ) -> Result<bool, QuotaError> {
        let not_found = || QuotaError::SessionNotFound(client_id.to_string());
        let slot = self
            .sessions
            .read()
            .get(client_id)
            .cloned()
            .ok_or_else(not_found)?;

        let now = self.clock.now();
        let (removed, vacant) = {
            let mut guard = slot.lock();
            if guard.evicted {
                return Err(not_found());
            }
            let removed = guard.session.remove_file(file_id, size_bytes, now);
            (removed, guard.session.is_vacant(now))
        };

        if vacant {
            self.drop_if_vacant(client_id);
        }
        Ok(removed)
    }

    /// Remove sessions idle for longer than the configured maximum age.
    pub fn sweep(&self) -> Vec<ExpiredSession> {
        self.sweep_expired(self.limits.session_max_age())
    }

    /// Remove sessions idle for longer than `max_age`, handing back the files they held.
    pub fn sweep_expired(&self, max_age: Duration) -> Vec<ExpiredSession> {
        let now = self.clock.now();
        let mut expired = Vec::new();
        let mut sessions = self.sessions.write();
        sessions.retain(|client_id, slot| {
            let mut guard = slot.lock();
            if !guard.session.is_expired(now, max_age) {
                return true;
            }
            guard.evicted = true;
            expired.push(ExpiredSession {
                client_id: client_id.clone(),
                file_ids: std::mem::take(&mut guard.session.file_ids),
            });
            false
        });
        drop(sessions);

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired sessions swept");
        }
        expired
    }

    fn check_upload(&self, session: &UserSession, size_bytes: u64) -> Result<(), QuotaError> {
        let limits = &self.limits;
        if size_bytes > limits.max_file_bytes {
            return Err(QuotaError::FileTooLarge {
                size_bytes,
                limit_mb: limits.max_file_bytes / MIB,
            });
        }
        if session.file_count() >= limits.max_files {
            return Err(QuotaError::TooManyFiles {
                limit: limits.max_files,
            });
        }
        if session.bytes_uploaded.saturating_add(size_bytes) > limits.max_total_bytes {
            return Err(QuotaError::TotalQuotaExceeded {
                held_bytes: session.bytes_uploaded,
                limit_mb: limits.max_total_bytes / MIB,
            });
        }
        Ok(())
    }

    fn check_process(&self, session: &UserSession) -> Result<(), QuotaError> {
        let now = self.clock.now();
        let recent = session.recent_process_count(now, Duration::hours(PROCESS_WINDOW_HOURS));
        if recent >= self.limits.max_processes_per_hour {
            return Err(QuotaError::RateLimited {
                limit: self.limits.max_processes_per_hour,
            });
        }
        Ok(())
    }

    /// Run `f` on the client's live session, creating it if needed.
    ///
    /// A session evicted between lookup and lock is skipped and the lookup retried,
    /// which lands on a fresh session.
    fn with_session<R>(&self, client_id: &str, mut f: impl FnMut(&mut UserSession) -> R) -> R {
        loop {
            let slot = self.slot(client_id);
            let mut guard = slot.lock();
            if guard.evicted {
                continue;
            }
            return f(&mut guard.session);
        }
    }

    fn slot(&self, client_id: &str) -> SharedSlot {
        if let Some(slot) = self.sessions.read().get(client_id) {
            return Arc::clone(slot);
        }
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let slot = sessions.entry(client_id.to_string()).or_insert_with(|| {
            tracing::debug!(client = client_id, "session created");
            Arc::new(Mutex::new(Slot {
                session: UserSession::new(client_id, now),
                evicted: false,
            }))
        });
        Arc::clone(slot)
    }

    fn drop_if_vacant(&self, client_id: &str) {
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let Some(slot) = sessions.get(client_id) else {
            return;
        };
        let vacant = {
            let mut guard = slot.lock();
            let vacant = !guard.evicted && guard.session.is_vacant(now);
            if vacant {
                guard.evicted = true;
            }
            vacant
        };
        if vacant {
            sessions.remove(client_id);
            tracing::debug!(client = client_id, "empty session dropped");
        }
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(QuotaLimits::default())
    }
}
