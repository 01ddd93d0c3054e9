//! Well-known collection keys and workflow defaults.

use carebridge_types::Nurse;
use std::time::Duration;

/// Collection key for prescription-review records.
pub const PRESCRIPTION_QUEUE_KEY: &str = "prescriptionQueue";

/// Collection key for bookings created downstream of approvals.
pub const USER_BOOKINGS_KEY: &str = "userBookings";

/// Collection key for the nurse-facing assignment mirror.
pub const NURSE_ASSIGNMENTS_KEY: &str = "nurseAssignments";

/// Default interval for the submitter-side single-record watcher.
pub const DEFAULT_RECORD_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default interval for dashboard-style whole-queue watchers.
pub const DEFAULT_QUEUE_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Last-resort nurse when neither the reviewer nor the patient picked one.
///
/// Nurse selection is three-level: reviewer-assigned, then the patient's
/// pre-submission choice, then this fallback.
pub fn fallback_nurse() -> Nurse {
    Nurse {
        id: "nurse-duty".into(),
        name: "Duty Nurse".into(),
        rating: None,
        specialization: Some("General Home Care".into()),
        phone: None,
        image: None,
    }
}
