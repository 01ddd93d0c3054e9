//! The review state machine.
//!
//! A record's lifecycle is `pending → approved | rejected`, one transition
//! per record. Both transitions and their field effects are applied in a
//! single place, [`apply_decision`], so the invariants (one-directional
//! transitions, rejection reason present iff rejected) cannot drift apart
//! across call sites. A rejected record's only recovery path is a brand-new
//! submission with a new id.

use crate::{WorkflowError, WorkflowResult};
use carebridge_types::{NonEmptyText, Nurse, PrescriptionRecord, ReviewStatus};
use chrono::{DateTime, Utc};

/// Fields a reviewer may override on approval.
///
/// A reviewer can correct the requested service (e.g. the uploaded
/// prescription actually calls for wound care) and set or adjust the price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceOverride {
    pub service_type: Option<String>,
    pub price: Option<f64>,
}

/// The reviewer's decision on a pending record.
///
/// Modelled as a tagged variant rather than a bag of optional fields so the
/// approved/rejected invariants are enforced by construction: a rejection
/// cannot exist without a reason, and an approval cannot carry one.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewDecision {
    Approved {
        /// Nurse attached by the reviewer; takes priority over any nurse the
        /// patient selected before submission.
        assigned_nurse: Option<Nurse>,
        service_override: Option<ServiceOverride>,
    },
    Rejected {
        reason: NonEmptyText,
    },
}

/// Applies a review decision to a record in place.
///
/// # Arguments
///
/// * `record` - The record to transition; must be `pending`.
/// * `reviewer` - Identity of the reviewing actor, stamped onto the record.
/// * `decision` - The decision to apply.
/// * `now` - Review timestamp, stamped onto the record.
///
/// # Errors
///
/// Returns `WorkflowError::AlreadyReviewed` if the record has already left
/// `pending`; transitions are one-directional and re-review is not a
/// mutation of the same record.
pub fn apply_decision(
    record: &mut PrescriptionRecord,
    reviewer: &str,
    decision: &ReviewDecision,
    now: DateTime<Utc>,
) -> WorkflowResult<()> {
    if record.status != ReviewStatus::Pending {
        return Err(WorkflowError::AlreadyReviewed {
            id: record.id.clone(),
            status: record.status,
        });
    }

    match decision {
        ReviewDecision::Approved {
            assigned_nurse,
            service_override,
        } => {
            record.status = ReviewStatus::Approved;
            record.assigned_nurse = assigned_nurse.clone();
            record.rejection_reason = None;

            if let Some(overrides) = service_override {
                if let Some(service_type) = &overrides.service_type {
                    record.service_type = service_type.clone();
                }
                if let Some(price) = overrides.price {
                    record.price = Some(price);
                }
            }
        }
        ReviewDecision::Rejected { reason } => {
            record.status = ReviewStatus::Rejected;
            record.rejection_reason = Some(reason.as_str().to_owned());
            record.assigned_nurse = None;
        }
    }

    record.reviewer = Some(reviewer.to_owned());
    record.reviewed_at = Some(now);

    Ok(())
}

/// Selects the nurse for the step after approval.
///
/// Priority is exactly three levels: the reviewer-assigned nurse, then the
/// nurse the patient picked before submission, then the fallback.
pub fn select_nurse(record: &PrescriptionRecord, fallback: &Nurse) -> Nurse {
    record
        .assigned_nurse
        .clone()
        .or_else(|| record.preferred_nurse.clone())
        .unwrap_or_else(|| fallback.clone())
}

/// What the submitter may do next, derived from the record's current state.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// The record is still pending; keep polling.
    AwaitingReview,
    /// Approved: the continue action is unlocked with the selected nurse.
    ProceedToCheckout { nurse: Nurse },
    /// Rejected: forward progress is blocked; only a new submission helps.
    ResubmitRequired { reason: String },
}

/// Derives the submitter-side continuation for a record.
pub fn continuation(record: &PrescriptionRecord, fallback: &Nurse) -> Continuation {
    match record.status {
        ReviewStatus::Pending => Continuation::AwaitingReview,
        ReviewStatus::Approved => Continuation::ProceedToCheckout {
            nurse: select_nurse(record, fallback),
        },
        ReviewStatus::Rejected => Continuation::ResubmitRequired {
            reason: record
                .rejection_reason
                .clone()
                .unwrap_or_else(|| "prescription rejected".to_owned()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_record() -> PrescriptionRecord {
        PrescriptionRecord {
            id: "RX-1".into(),
            patient_name: "Amina Okafor".into(),
            service_type: "IV Therapy".into(),
            attachment: None,
            created_at: Utc::now(),
            status: ReviewStatus::Pending,
            reviewer: None,
            reviewed_at: None,
            rejection_reason: None,
            price: None,
            assigned_nurse: None,
            preferred_nurse: None,
            extra: serde_json::Map::new(),
        }
    }

    fn nurse(id: &str, name: &str) -> Nurse {
        Nurse {
            id: id.into(),
            name: name.into(),
            rating: None,
            specialization: None,
            phone: None,
            image: None,
        }
    }

    #[test]
    fn test_approve_stamps_reviewer_and_timestamp() {
        let mut record = pending_record();
        let now = Utc::now();

        apply_decision(
            &mut record,
            "dr.mensah",
            &ReviewDecision::Approved {
                assigned_nurse: None,
                service_override: None,
            },
            now,
        )
        .expect("approving a pending record should succeed");

        assert_eq!(record.status, ReviewStatus::Approved);
        assert_eq!(record.reviewer.as_deref(), Some("dr.mensah"));
        assert_eq!(record.reviewed_at, Some(now));
        assert!(record.rejection_reason.is_none());
    }

    #[test]
    fn test_approve_applies_service_override() {
        let mut record = pending_record();

        apply_decision(
            &mut record,
            "dr.mensah",
            &ReviewDecision::Approved {
                assigned_nurse: None,
                service_override: Some(ServiceOverride {
                    service_type: Some("Wound Care".into()),
                    price: Some(220.0),
                }),
            },
            Utc::now(),
        )
        .expect("approval should succeed");

        assert_eq!(record.service_type, "Wound Care");
        assert_eq!(record.price, Some(220.0));
    }

    #[test]
    fn test_reject_sets_reason_and_clears_nurse() {
        let mut record = pending_record();
        record.preferred_nurse = Some(nurse("n-1", "Nurse B"));

        apply_decision(
            &mut record,
            "dr.mensah",
            &ReviewDecision::Rejected {
                reason: NonEmptyText::new("illegible").unwrap(),
            },
            Utc::now(),
        )
        .expect("rejection should succeed");

        assert_eq!(record.status, ReviewStatus::Rejected);
        assert_eq!(record.rejection_reason.as_deref(), Some("illegible"));
        assert!(record.assigned_nurse.is_none(), "rejection must not assign a nurse");
    }

    #[test]
    fn test_transitions_are_one_directional() {
        let mut record = pending_record();
        apply_decision(
            &mut record,
            "dr.mensah",
            &ReviewDecision::Approved {
                assigned_nurse: None,
                service_override: None,
            },
            Utc::now(),
        )
        .expect("first review should succeed");

        let err = apply_decision(
            &mut record,
            "dr.addo",
            &ReviewDecision::Rejected {
                reason: NonEmptyText::new("changed my mind").unwrap(),
            },
            Utc::now(),
        )
        .expect_err("second review should be rejected");

        assert!(matches!(
            err,
            WorkflowError::AlreadyReviewed {
                status: ReviewStatus::Approved,
                ..
            }
        ));
        assert_eq!(record.status, ReviewStatus::Approved, "record must be unchanged");
        assert_eq!(record.reviewer.as_deref(), Some("dr.mensah"));
    }

    #[test]
    fn test_nurse_priority_reviewer_wins() {
        let mut record = pending_record();
        record.preferred_nurse = Some(nurse("n-b", "Nurse B"));
        record.assigned_nurse = Some(nurse("n-a", "Nurse A"));

        let selected = select_nurse(&record, &nurse("n-c", "Nurse C"));
        assert_eq!(selected.name, "Nurse A");
    }

    #[test]
    fn test_nurse_priority_preferred_when_no_reviewer_nurse() {
        let mut record = pending_record();
        record.preferred_nurse = Some(nurse("n-b", "Nurse B"));

        let selected = select_nurse(&record, &nurse("n-c", "Nurse C"));
        assert_eq!(selected.name, "Nurse B");
    }

    #[test]
    fn test_nurse_priority_fallback_when_both_absent() {
        let record = pending_record();
        let selected = select_nurse(&record, &nurse("n-c", "Nurse C"));
        assert_eq!(selected.name, "Nurse C");
    }

    #[test]
    fn test_continuation_pending_awaits_review() {
        let record = pending_record();
        assert_eq!(
            continuation(&record, &nurse("n-c", "Nurse C")),
            Continuation::AwaitingReview
        );
    }

    #[test]
    fn test_continuation_approved_unlocks_checkout() {
        let mut record = pending_record();
        apply_decision(
            &mut record,
            "dr.mensah",
            &ReviewDecision::Approved {
                assigned_nurse: Some(nurse("n-a", "Nurse A")),
                service_override: None,
            },
            Utc::now(),
        )
        .unwrap();

        match continuation(&record, &nurse("n-c", "Nurse C")) {
            Continuation::ProceedToCheckout { nurse } => assert_eq!(nurse.name, "Nurse A"),
            other => panic!("expected ProceedToCheckout, got {other:?}"),
        }
    }

    #[test]
    fn test_continuation_rejected_requires_resubmit() {
        let mut record = pending_record();
        apply_decision(
            &mut record,
            "dr.mensah",
            &ReviewDecision::Rejected {
                reason: NonEmptyText::new("illegible").unwrap(),
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(
            continuation(&record, &nurse("n-c", "Nurse C")),
            Continuation::ResubmitRequired {
                reason: "illegible".into()
            }
        );
    }
}
