//! Bookings and nurse assignments created downstream of an approval.
//!
//! Once a prescription is approved, the workflow materialises a `confirmed`
//! booking in `userBookings` and mirrors it into `nurseAssignments` for the
//! nurse-facing dashboard. Later status transitions (`completed`,
//! `cancelled`) are driven by flows outside this crate through
//! [`BookingService::update_status`].

use crate::config::CoreConfig;
use crate::constants::{self, NURSE_ASSIGNMENTS_KEY, USER_BOOKINGS_KEY};
use crate::review;
use crate::store::RecordStore;
use crate::{WorkflowError, WorkflowResult};
use carebridge_types::{
    AssignmentPriority, BookingRecord, BookingStatus, NurseAssignment, PrescriptionRecord,
    ReviewStatus,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Service for booking and nurse-assignment operations.
#[derive(Clone)]
pub struct BookingService {
    store: RecordStore,
}

fn extra_text(record: &PrescriptionRecord, key: &str) -> Option<String> {
    record
        .extra
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_owned)
}

impl BookingService {
    /// Creates a new booking service against the configured data directory.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: RecordStore::new(cfg),
        }
    }

    /// Creates the booking and nurse assignment for an approved prescription.
    ///
    /// The booking carries forward the patient, service, price and
    /// carry-forward context from the record, and resolves the nurse through
    /// the three-level selection (reviewer-assigned, then pre-submission
    /// preferred, then the fallback duty nurse).
    ///
    /// Calling this twice for the same prescription returns the existing
    /// booking instead of creating a second one.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` if the record is not approved,
    /// or a storage error if either collection cannot be written.
    pub fn create_from_approval(
        &self,
        record: &PrescriptionRecord,
    ) -> WorkflowResult<BookingRecord> {
        if record.status != ReviewStatus::Approved {
            return Err(WorkflowError::InvalidInput(format!(
                "prescription {} is not approved (status: {})",
                record.id, record.status
            )));
        }

        let mut bookings: Vec<BookingRecord> = self.store.read_collection(USER_BOOKINGS_KEY);
        if let Some(existing) = bookings
            .iter()
            .find(|b| b.prescription_id.as_deref() == Some(record.id.as_str()))
        {
            return Ok(existing.clone());
        }

        let nurse = review::select_nurse(record, &constants::fallback_nurse());
        let created_at = Utc::now();

        let booking = BookingRecord {
            id: Uuid::new_v4().simple().to_string(),
            prescription_id: Some(record.id.clone()),
            patient_name: record.patient_name.clone(),
            service_type: record.service_type.clone(),
            price: record.price,
            status: BookingStatus::Confirmed,
            nurse: Some(nurse.clone()),
            created_at,
            extra: record.extra.clone(),
        };

        bookings.push(booking.clone());
        self.store.write_collection(USER_BOOKINGS_KEY, &bookings)?;

        let priority = match record.extra.get("urgent").and_then(|v| v.as_bool()) {
            Some(true) => AssignmentPriority::High,
            _ => AssignmentPriority::Normal,
        };

        let assignment = NurseAssignment {
            id: Uuid::new_v4().simple().to_string(),
            booking_id: booking.id.clone(),
            patient_name: record.patient_name.clone(),
            service_type: record.service_type.clone(),
            status: BookingStatus::Confirmed,
            priority,
            notes: extra_text(record, "notes"),
            symptoms: extra_text(record, "symptoms"),
            nurse: Some(nurse),
            created_at,
            extra: serde_json::Map::new(),
        };

        let mut assignments: Vec<NurseAssignment> =
            self.store.read_collection(NURSE_ASSIGNMENTS_KEY);
        assignments.push(assignment);
        self.store
            .write_collection(NURSE_ASSIGNMENTS_KEY, &assignments)?;

        Ok(booking)
    }

    /// Lists all bookings.
    pub fn list(&self) -> Vec<BookingRecord> {
        self.store.read_collection(USER_BOOKINGS_KEY)
    }

    /// Lists all nurse assignments.
    pub fn list_assignments(&self) -> Vec<NurseAssignment> {
        self.store.read_collection(NURSE_ASSIGNMENTS_KEY)
    }

    /// Updates the status of a booking and its mirrored assignment.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::BookingNotFound` if no booking has the given
    /// id, or a storage error if either collection cannot be written.
    pub fn update_status(&self, id: &str, status: BookingStatus) -> WorkflowResult<BookingRecord> {
        let mut bookings: Vec<BookingRecord> = self.store.read_collection(USER_BOOKINGS_KEY);

        let position = bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| WorkflowError::BookingNotFound(id.to_owned()))?;

        bookings[position].status = status;
        let updated = bookings[position].clone();
        self.store.write_collection(USER_BOOKINGS_KEY, &bookings)?;

        let mut assignments: Vec<NurseAssignment> =
            self.store.read_collection(NURSE_ASSIGNMENTS_KEY);
        let mut changed = false;
        for assignment in assignments.iter_mut().filter(|a| a.booking_id == id) {
            assignment.status = status;
            changed = true;
        }
        if changed {
            self.store
                .write_collection(NURSE_ASSIGNMENTS_KEY, &assignments)?;
        }

        tracing::info!("booking {} moved to {}", updated.id, updated.status);

        Ok(updated)
    }
}
