//! Review and booking status enums.
//!
//! Status values are persisted as lowercase strings (`"pending"`,
//! `"approved"`, ...) to match the JSON layout the browser clients write.
//! The string constants and conversion helpers exist so that CLI arguments
//! and query parameters can be validated against one authoritative list.

use serde::{Deserialize, Serialize};

/// Valid review status strings as stored in `prescriptionQueue`.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// All valid review status strings.
pub const VALID_REVIEW_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

/// Lifecycle state of a prescription-review record.
///
/// Transitions are one-directional: `Pending` is the only non-terminal
/// state, and a record that has left it is never re-reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_APPROVED => Ok(Self::Approved),
            STATUS_REJECTED => Ok(Self::Rejected),
            _ => Err(format!(
                "Invalid review status '{s}'. Must be one of: {}",
                VALID_REVIEW_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Approved => STATUS_APPROVED,
            Self::Rejected => STATUS_REJECTED,
        }
    }

    /// Whether the status is terminal for the record.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filter for queue listings: every record, or an exact status match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(ReviewStatus),
}

impl StatusFilter {
    /// Parse a filter from a query/CLI string (`"all"` or a status value).
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        if s == "all" {
            return Ok(Self::All);
        }
        ReviewStatus::from_str_value(s).map(Self::Only)
    }

    /// Whether a record with the given status passes this filter.
    pub fn matches(&self, status: ReviewStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Lifecycle state of a booking created downstream of an approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub enum BookingStatus {
    Confirmed,
    Completed,
    Cancelled,
    Emergency,
}

impl BookingStatus {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "emergency" => Ok(Self::Emergency),
            _ => Err(format!(
                "Invalid booking status '{s}'. Must be one of: confirmed, completed, cancelled, emergency"
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status_round_trip() {
        for status in &[
            ReviewStatus::Pending,
            ReviewStatus::Approved,
            ReviewStatus::Rejected,
        ] {
            assert_eq!(
                ReviewStatus::from_str_value(status.as_str()).unwrap(),
                *status
            );
        }
    }

    #[test]
    fn test_review_status_rejects_unknown_value() {
        let result = ReviewStatus::from_str_value("escalated");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid review status"));
    }

    #[test]
    fn test_review_status_serialises_lowercase() {
        let json = serde_json::to_string(&ReviewStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }

    #[test]
    fn test_only_pending_is_non_terminal() {
        assert!(!ReviewStatus::Pending.is_terminal());
        assert!(ReviewStatus::Approved.is_terminal());
        assert!(ReviewStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_filter_all_matches_everything() {
        for status in &[
            ReviewStatus::Pending,
            ReviewStatus::Approved,
            ReviewStatus::Rejected,
        ] {
            assert!(StatusFilter::All.matches(*status));
        }
    }

    #[test]
    fn test_status_filter_only_matches_exact() {
        let filter = StatusFilter::Only(ReviewStatus::Rejected);
        assert!(filter.matches(ReviewStatus::Rejected));
        assert!(!filter.matches(ReviewStatus::Pending));
    }

    #[test]
    fn test_status_filter_parses_all_and_status() {
        assert_eq!(StatusFilter::from_str_value("all").unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_str_value("pending").unwrap(),
            StatusFilter::Only(ReviewStatus::Pending)
        );
        assert!(StatusFilter::from_str_value("done").is_err());
    }

    #[test]
    fn test_booking_status_round_trip() {
        for status in &[
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::Emergency,
        ] {
            assert_eq!(
                BookingStatus::from_str_value(status.as_str()).unwrap(),
                *status
            );
        }
    }

    #[test]
    fn test_valid_review_statuses_complete() {
        assert_eq!(VALID_REVIEW_STATUSES.len(), 3);
    }
}
