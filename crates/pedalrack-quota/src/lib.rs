//! Per-client resource quotas for pedalrack.
//!
//! A [`SessionTracker`] keeps one [`UserSession`] per client identifier and
//! enforces the [`QuotaLimits`] fixed at startup:
//!
//! - size of a single upload
//! - number of files held at once
//! - bytes held across all uploads
//! - processing requests per trailing hour
//!
//! Sessions idle past the configured age are removed by [`SessionTracker::sweep`],
//! which hands back the file ids the caller must clean up.
//!
//! # Example
//!
//! ```rust
//! use pedalrack_quota::{QuotaError, QuotaLimits, SessionTracker};
//!
//! let tracker = SessionTracker::new(QuotaLimits {
//!     max_files: 1,
//!     ..QuotaLimits::default()
//! });
//!
//! tracker.try_record_file("ip_10.0.0.1", "upload-1", 1024).unwrap();
//! let denied = tracker.try_record_file("ip_10.0.0.1", "upload-2", 1024);
//! assert_eq!(denied, Err(QuotaError::TooManyFiles { limit: 1 }));
//! ```

mod clock;
mod error;
mod identity;
mod limits;
mod session;
mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::QuotaError;
pub use identity::{
    SUPPORTED_AUDIO_EXTENSIONS, client_identifier, is_supported_audio_extension,
    sanitize_filename,
};
pub use limits::{MIB, PROCESS_RETENTION_HOURS, PROCESS_WINDOW_HOURS, QuotaLimits};
pub use session::UserSession;
pub use tracker::{ExpiredSession, SessionTracker};
