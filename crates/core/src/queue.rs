//! The prescription queue service.
//!
//! Domain-specific wrapper over the record store for the `prescriptionQueue`
//! collection: submission by the patient-side actor, listing/searching for
//! the reviewer dashboard, and the single review mutation. Approval also
//! creates the downstream booking and nurse assignment so the submitter's
//! continue action has something to land on.

use crate::booking::BookingService;
use crate::config::CoreConfig;
use crate::constants::{self, PRESCRIPTION_QUEUE_KEY};
use crate::review::{self, Continuation, ReviewDecision};
use crate::store::RecordStore;
use crate::{WorkflowError, WorkflowResult};
use carebridge_types::{
    AttachmentMeta, NonEmptyText, Nurse, PrescriptionRecord, ReviewStatus, StatusFilter,
};
use chrono::Utc;
use std::sync::Arc;

/// A submission before it has been accepted into the queue.
#[derive(Debug, Clone)]
pub struct NewPrescription {
    /// Caller-supplied id; must not collide with an existing record.
    pub id: String,
    pub patient_name: String,
    pub service_type: String,
    pub attachment: Option<AttachmentMeta>,
    /// Nurse the patient picked before submitting, if any.
    pub preferred_nurse: Option<Nurse>,
    pub price: Option<f64>,
    /// Context for downstream steps, persisted unchanged.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Service for prescription queue operations.
#[derive(Clone)]
pub struct PrescriptionService {
    cfg: Arc<CoreConfig>,
    store: RecordStore,
}

impl PrescriptionService {
    /// Creates a new prescription service against the configured data directory.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store = RecordStore::new(cfg.clone());
        Self { cfg, store }
    }

    pub(crate) fn cfg(&self) -> &Arc<CoreConfig> {
        &self.cfg
    }

    /// Submits a new prescription for review.
    ///
    /// The record enters the queue with status `pending` and a creation
    /// timestamp; all review fields start empty.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` if:
    /// - the id, patient name, or service type is empty
    ///   (`WorkflowError::InvalidInput`),
    /// - a record with the same id already exists
    ///   (`WorkflowError::DuplicateRecordId`),
    /// - persisting the updated collection fails.
    pub fn submit(&self, new_prescription: NewPrescription) -> WorkflowResult<PrescriptionRecord> {
        let id = NonEmptyText::new(&new_prescription.id)
            .map_err(|_| WorkflowError::InvalidInput("prescription id cannot be empty".into()))?;
        NonEmptyText::new(&new_prescription.patient_name)
            .map_err(|_| WorkflowError::InvalidInput("patient name cannot be empty".into()))?;
        NonEmptyText::new(&new_prescription.service_type)
            .map_err(|_| WorkflowError::InvalidInput("service type cannot be empty".into()))?;

        let mut records: Vec<PrescriptionRecord> =
            self.store.read_collection(PRESCRIPTION_QUEUE_KEY);

        if records.iter().any(|r| r.id == id.as_str()) {
            return Err(WorkflowError::DuplicateRecordId(id.into_inner()));
        }

        let record = PrescriptionRecord {
            id: id.into_inner(),
            patient_name: new_prescription.patient_name.trim().to_owned(),
            service_type: new_prescription.service_type.trim().to_owned(),
            attachment: new_prescription.attachment,
            created_at: Utc::now(),
            status: ReviewStatus::Pending,
            reviewer: None,
            reviewed_at: None,
            rejection_reason: None,
            price: new_prescription.price,
            assigned_nurse: None,
            preferred_nurse: new_prescription.preferred_nurse,
            extra: new_prescription.extra,
        };

        records.push(record.clone());
        self.store.write_collection(PRESCRIPTION_QUEUE_KEY, &records)?;

        tracing::info!(
            "prescription {} submitted for {} ({})",
            record.id,
            record.patient_name,
            record.service_type
        );

        Ok(record)
    }

    /// Returns the record with the given id, if present.
    pub fn get(&self, id: &str) -> Option<PrescriptionRecord> {
        let records: Vec<PrescriptionRecord> = self.store.read_collection(PRESCRIPTION_QUEUE_KEY);
        records.into_iter().find(|r| r.id == id)
    }

    /// Lists records matching a status filter and an optional search term.
    ///
    /// The search is a case-insensitive substring match against the patient
    /// name and the service type. Records come back in insertion order
    /// (append order); no consumer should rely on that order for
    /// correctness.
    pub fn list_by_status(
        &self,
        filter: StatusFilter,
        search: Option<&str>,
    ) -> Vec<PrescriptionRecord> {
        let records: Vec<PrescriptionRecord> = self.store.read_collection(PRESCRIPTION_QUEUE_KEY);
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        records
            .into_iter()
            .filter(|r| filter.matches(r.status))
            .filter(|r| match &needle {
                None => true,
                Some(needle) => {
                    r.patient_name.to_lowercase().contains(needle)
                        || r.service_type.to_lowercase().contains(needle)
                }
            })
            .collect()
    }

    /// Applies a review decision to the record with the given id.
    ///
    /// On approval, the downstream booking and nurse assignment are created
    /// after the queue update has been persisted, so a reviewer crash
    /// between the two writes leaves an approved record without a booking
    /// rather than a booking without an approval.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError` if:
    /// - no record has the given id (`WorkflowError::RecordNotFound`),
    /// - the record has already been reviewed
    ///   (`WorkflowError::AlreadyReviewed`),
    /// - persisting either collection fails.
    pub fn review(
        &self,
        id: &str,
        reviewer: &str,
        decision: &ReviewDecision,
    ) -> WorkflowResult<PrescriptionRecord> {
        let mut records: Vec<PrescriptionRecord> =
            self.store.read_collection(PRESCRIPTION_QUEUE_KEY);

        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| WorkflowError::RecordNotFound(id.to_owned()))?;

        review::apply_decision(&mut records[position], reviewer, decision, Utc::now())?;
        let updated = records[position].clone();

        self.store.write_collection(PRESCRIPTION_QUEUE_KEY, &records)?;

        tracing::info!(
            "prescription {} reviewed by {}: {}",
            updated.id,
            reviewer,
            updated.status
        );

        if updated.status == ReviewStatus::Approved {
            let booking = BookingService::new(self.cfg.clone()).create_from_approval(&updated)?;
            tracing::info!(
                "booking {} created for prescription {}",
                booking.id,
                updated.id
            );
        }

        Ok(updated)
    }

    /// Derives the submitter-side continuation for the record with the
    /// given id, using the configured fallback nurse as the last selection
    /// level.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::RecordNotFound` if no record has the id.
    pub fn continuation(&self, id: &str) -> WorkflowResult<Continuation> {
        let record = self
            .get(id)
            .ok_or_else(|| WorkflowError::RecordNotFound(id.to_owned()))?;
        Ok(review::continuation(&record, &constants::fallback_nurse()))
    }
}
