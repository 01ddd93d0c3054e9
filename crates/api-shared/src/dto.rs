//! Request and response bodies for the REST API.
//!
//! These mirror the persisted camelCase layout so a browser client can post
//! back exactly what it reads. Fields the API does not model are accepted
//! through the same carry-forward mechanism the records use.

use carebridge_types::{AttachmentMeta, BookingRecord, Nurse, PrescriptionRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Request body for submitting a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPrescriptionReq {
    /// Record id; generated by the server when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub patient_name: String,
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_nurse: Option<Nurse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentMeta>,
    /// Context for downstream steps, persisted unchanged.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request body for reviewing a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReq {
    /// `"approved"` or `"rejected"`.
    pub decision: String,
    /// Identity of the reviewing actor.
    pub reviewer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_nurse: Option<Nurse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Required when `decision` is `"rejected"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Listing response for the prescription queue.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListPrescriptionsRes {
    pub prescriptions: Vec<PrescriptionRecord>,
}

/// Submitter-side continuation for a record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContinuationRes {
    /// `"awaiting_review"`, `"proceed_to_checkout"`, or `"resubmit_required"`.
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nurse: Option<Nurse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Listing response for bookings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListBookingsRes {
    pub bookings: Vec<BookingRecord>,
}
