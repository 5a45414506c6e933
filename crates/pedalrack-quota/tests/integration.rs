//! End-to-end quota scenarios driven through the public API.

use chrono::{Duration, Utc};
use pedalrack_quota::{
    ManualClock, MIB, QuotaError, QuotaLimits, SessionTracker, client_identifier,
    sanitize_filename,
};
use proptest::prelude::*;
use std::sync::Arc;

fn tracker_at_now() -> (SessionTracker, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let tracker = SessionTracker::with_clock(QuotaLimits::default(), clock.clone());
    (tracker, clock)
}

#[test]
fn upload_lifecycle() {
    let (tracker, _) = tracker_at_now();
    let client = client_identifier(Some("203.0.113.5"), None);

    for i in 0..5 {
        tracker
            .try_record_file(&client, &format!("take-{i}"), 20 * MIB)
            .unwrap();
    }
    let denied = tracker.try_record_file(&client, "take-5", MIB).unwrap_err();
    assert_eq!(
        denied.to_string(),
        "Maximum 5 files per user. Delete some files first."
    );

    assert!(tracker.remove_file(&client, "take-0", 20 * MIB).unwrap());
    tracker.try_record_file(&client, "take-5", MIB).unwrap();

    let session = tracker.find(&client).unwrap();
    assert_eq!(session.file_count(), 5);
    assert_eq!(session.bytes_uploaded, 81 * MIB);
}

#[test]
fn processing_window_and_expiry() {
    let (tracker, clock) = tracker_at_now();

    for _ in 0..20 {
        tracker.try_record_process("c").unwrap();
    }
    assert!(matches!(
        tracker.try_record_process("c"),
        Err(QuotaError::RateLimited { limit: 20 })
    ));

    clock.advance(Duration::hours(1));
    tracker.try_record_process("c").unwrap();

    clock.advance(Duration::hours(25));
    let expired = tracker.sweep();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].client_id, "c");
    assert_eq!(tracker.session_count(), 0);
}

#[test]
fn custom_limits_apply() {
    let limits = QuotaLimits {
        max_file_bytes: MIB,
        max_processes_per_hour: 1,
        ..QuotaLimits::default()
    };
    let tracker = SessionTracker::new(limits);
    assert!(matches!(
        tracker.can_upload_file("c", MIB + 1),
        Err(QuotaError::FileTooLarge { limit_mb: 1, .. })
    ));
    tracker.try_record_process("c").unwrap();
    assert!(tracker.can_process("c").is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Admitted uploads never exceed any configured cap.
    #[test]
    fn admitted_uploads_stay_within_limits(sizes in prop::collection::vec(0u64..150 * MIB, 1..20)) {
        let tracker = SessionTracker::default();
        for (i, size) in sizes.iter().enumerate() {
            let _ = tracker.try_record_file("c", &format!("f{i}"), *size);
        }
        let limits = tracker.limits().clone();
        if let Some(session) = tracker.find("c") {
            prop_assert!(session.file_count() <= limits.max_files);
            prop_assert!(session.bytes_uploaded <= limits.max_total_bytes);
        }
    }

    /// Sanitized names are never empty, never hidden, and only use the safe alphabet.
    #[test]
    fn sanitized_names_are_safe(name in ".{0,300}") {
        let safe = sanitize_filename(&name);
        prop_assert!(!safe.is_empty());
        prop_assert!(!safe.starts_with('.'));
        prop_assert!(safe.len() <= 255);
        prop_assert!(safe.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
    }
}
