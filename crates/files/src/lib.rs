//! # CareBridge Files
//!
//! Attachment inspection for prescription uploads.
//!
//! CareBridge never stores the binary content of an uploaded prescription;
//! only metadata travels through the workflow. This crate turns a file on
//! disk into that metadata: original name, byte size, best-effort media
//! type, and a SHA-256 content digest so a resubmitted file can be
//! recognised later without keeping the bytes.

mod attachments;

pub use attachments::{AttachmentService, DEFAULT_MAX_ATTACHMENT_BYTES};

/// Error type for attachment inspection.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("attachment path is not a regular file: {0}")]
    NotAFile(std::path::PathBuf),
    #[error("attachment has no usable file name: {0}")]
    InvalidFileName(std::path::PathBuf),
    #[error("attachment is empty: {0}")]
    EmptyFile(std::path::PathBuf),
    #[error("attachment exceeds the maximum size of {max_bytes} bytes: {path}")]
    TooLarge {
        path: std::path::PathBuf,
        max_bytes: u64,
    },
    #[error("failed to read attachment: {0}")]
    FileRead(std::io::Error),
}

/// Result type for attachment inspection.
pub type AttachmentResult<T> = Result<T, AttachmentError>;
