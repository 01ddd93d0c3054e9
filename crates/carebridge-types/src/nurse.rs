//! Nurse payload carried through the workflow.

use serde::{Deserialize, Serialize};

/// A nurse as supplied by the booking/checkout collaborators.
///
/// The workflow treats this as an opaque payload: it is attached during
/// review or pre-selected before submission, carried into the booking, and
/// never interpreted beyond the three-level selection priority. Only `id`
/// and `name` are required; the remaining fields are whatever the catalogue
/// happened to include.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Nurse {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
