//! Quota limits.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Trailing window the hourly processing cap is evaluated over.
pub const PROCESS_WINDOW_HOURS: i64 = 1;

/// How long processing events are retained before `record_process` prunes them.
pub const PROCESS_RETENTION_HOURS: i64 = 2;

/// Per-client resource limits, fixed at startup.
///
/// Every field has a default, so a settings file may set any subset:
///
/// ```toml
/// max_files = 10
/// max_processes_per_hour = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaLimits {
    /// Largest single upload in bytes.
    pub max_file_bytes: u64,
    /// Most files a client may hold at once.
    pub max_files: usize,
    /// Cap on the bytes a client holds across all uploads.
    pub max_total_bytes: u64,
    /// Processing requests allowed per trailing hour.
    pub max_processes_per_hour: usize,
    /// Inactivity after which a session is swept.
    pub session_max_age_hours: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 100 * MIB,
            max_files: 5,
            max_total_bytes: 500 * MIB,
            max_processes_per_hour: 20,
            session_max_age_hours: 24,
        }
    }
}

impl QuotaLimits {
    /// Inactivity window as a duration.
    pub fn session_max_age(&self) -> Duration {
        Duration::hours(i64::from(self.session_max_age_hours))
    }
}
