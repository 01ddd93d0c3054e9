//! Booking and nurse-assignment records created downstream of an approval.

use crate::nurse::Nurse;
use crate::status::BookingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A booking in the `userBookings` collection.
///
/// Created once a prescription reaches `approved`, carrying forward the
/// price, nurse and service fields resolved during review. Status
/// transitions (`completed`/`cancelled`) are driven by flows outside the
/// workflow core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct BookingRecord {
    pub id: String,
    /// Queue record this booking was created from, when known. Bookings
    /// created directly by other flows may not have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription_id: Option<String>,
    pub patient_name: String,
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nurse: Option<Nurse>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Priority shown on the nurse-facing dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum AssignmentPriority {
    Normal,
    High,
}

/// A row in the `nurseAssignments` collection.
///
/// Mirrors a booking for the nurse-facing dashboard, with the free-text
/// context (`notes`, `symptoms`) the patient supplied at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct NurseAssignment {
    pub id: String,
    pub booking_id: String,
    pub patient_name: String,
    pub service_type: String,
    pub status: BookingStatus,
    pub priority: AssignmentPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nurse: Option<Nurse>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
