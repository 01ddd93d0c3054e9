//! The prescription-review record, the unit of work in the queue.

use crate::attachment::AttachmentMeta;
use crate::nurse::Nurse;
use crate::status::ReviewStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record flowing through the prescription-review workflow.
///
/// Created by the submitting actor with status [`ReviewStatus::Pending`],
/// mutated exactly once by the reviewing actor, and read repeatedly by the
/// submitter via polling. The `id` is caller-supplied, unique within the
/// queue, and is the sole key used for lookup.
///
/// Fields this model does not know about (scheduling date/time, cart
/// contents, order flags) are captured into `extra` and persisted back
/// unchanged; downstream steps read them, the workflow itself never does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PrescriptionRecord {
    pub id: String,
    pub patient_name: String,
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentMeta>,
    pub created_at: DateTime<Utc>,

    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Present if and only if `status` is [`ReviewStatus::Rejected`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Nurse attached by the reviewer during approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_nurse: Option<Nurse>,
    /// Nurse chosen by the patient before submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_nurse: Option<Nurse>,

    /// Carry-forward bag: fields owned by other steps, passed through
    /// unchanged.
    #[serde(flatten)]
    #[cfg_attr(feature = "utoipa", schema(value_type = Object))]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> PrescriptionRecord {
        PrescriptionRecord {
            id: "RX-1".into(),
            patient_name: "Amina Okafor".into(),
            service_type: "IV Therapy".into(),
            attachment: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).unwrap(),
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

    #[test]
    fn test_serialises_camel_case_fields() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["patientName"], "Amina Okafor");
        assert_eq!(json["serviceType"], "IV Therapy");
        assert_eq!(json["status"], "pending");
        assert!(json.get("rejectionReason").is_none());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = r#"{
            "id": "RX-9",
            "patientName": "Kofi Asante",
            "serviceType": "Medicine Order",
            "createdAt": "2024-03-04T10:30:00Z",
            "status": "pending",
            "scheduledDate": "2024-03-06",
            "cartItems": [{"name": "Paracetamol", "qty": 2}],
            "isMedicineOrder": true
        }"#;

        let record: PrescriptionRecord =
            serde_json::from_str(raw).expect("record with extra fields should deserialise");
        assert_eq!(record.extra["scheduledDate"], "2024-03-06");
        assert_eq!(record.extra["isMedicineOrder"], true);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["scheduledDate"], "2024-03-06");
        assert_eq!(back["cartItems"][0]["name"], "Paracetamol");
    }

    #[test]
    fn test_rejection_reason_round_trips() {
        let mut record = sample_record();
        record.status = ReviewStatus::Rejected;
        record.rejection_reason = Some("illegible".into());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["rejectionReason"], "illegible");

        let back: PrescriptionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
