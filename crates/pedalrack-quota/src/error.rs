//! Admission denials and session lookup failures.

use thiserror::Error;

/// Why a quota check denied a request, or why a session could not be found.
///
/// Display strings are written for end users and can be surfaced verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuotaError {
    /// The upload alone is larger than the per-file cap.
    #[error("File size exceeds maximum of {limit_mb}MB")]
    FileTooLarge {
        /// Size of the rejected upload in bytes.
        size_bytes: u64,
        /// Per-file cap in MiB.
        limit_mb: u64,
    },

    /// The client already holds the maximum number of files.
    #[error("Maximum {limit} files per user. Delete some files first.")]
    TooManyFiles {
        /// Concurrent file cap.
        limit: usize,
    },

    /// The upload would push the client past its cumulative byte quota.
    #[error("Total upload quota ({limit_mb}MB) exceeded. Delete some files first.")]
    TotalQuotaExceeded {
        /// Bytes the client already holds.
        held_bytes: u64,
        /// Cumulative cap in MiB.
        limit_mb: u64,
    },

    /// The client hit the hourly processing cap.
    #[error("Processing limit reached ({limit} per hour). Please wait.")]
    RateLimited {
        /// Processing requests allowed per hour.
        limit: usize,
    },

    /// No session exists for the client.
    #[error("session not found: {0}")]
    SessionNotFound(String),
}

impl QuotaError {
    /// Returns true for admission denials, false for lookup failures.
    pub fn is_denial(&self) -> bool {
        !matches!(self, QuotaError::SessionNotFound(_))
    }
}
