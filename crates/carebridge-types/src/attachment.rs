//! Prescription attachment metadata.

use crate::text::NonEmptyText;
use serde::{Deserialize, Serialize};

/// Metadata describing an uploaded prescription file.
///
/// Only metadata is persisted; the binary content itself is never copied
/// into the data directory. The digest allows a resubmitted file to be
/// recognised without retaining the bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct AttachmentMeta {
    /// Original filename from the upload.
    #[cfg_attr(feature = "utoipa", schema(value_type = String))]
    pub file_name: NonEmptyText,

    /// Size of the file in bytes.
    pub size_bytes: u64,

    /// Detected media type (MIME type), if available.
    ///
    /// Best-effort detection from content; not authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Lowercase hexadecimal SHA-256 digest of the file content.
    pub sha256: String,
}
