//! Attachment inspection service.
//!
//! # Design
//!
//! - Metadata only: the upload is read once to hash and sniff it, and the
//!   bytes are never copied anywhere
//! - Content-addressed identity: the SHA-256 digest identifies the content,
//!   so the same prescription photo resubmitted later can be recognised
//! - Defensive: directories, special files, empty files and oversized files
//!   are rejected before any content is read in full

use crate::{AttachmentError, AttachmentResult};
use carebridge_types::{AttachmentMeta, NonEmptyText};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Default upper bound for an uploaded prescription file.
///
/// Scans and photos of a paper prescription comfortably fit; anything
/// larger is almost certainly the wrong file.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024; // 20 MiB

const HASH_READ_BUFFER_BYTES: usize = 8 * 1024;

/// Service for turning an uploaded file into [`AttachmentMeta`].
#[derive(Debug, Clone)]
pub struct AttachmentService {
    max_bytes: u64,
}

impl AttachmentService {
    /// Creates a service with [`DEFAULT_MAX_ATTACHMENT_BYTES`].
    pub fn new() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }

    /// Creates a service with an explicit size bound.
    pub fn with_max_size_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Inspects the file at `path` and produces its attachment metadata.
    ///
    /// The file is streamed once to compute the SHA-256 digest; the first
    /// block is also used for media-type sniffing.
    ///
    /// # Errors
    ///
    /// Returns `AttachmentError` if:
    /// - `path` is not a regular file,
    /// - the file name is missing or not valid UTF-8,
    /// - the file is empty or exceeds the configured size bound,
    /// - reading the file fails.
    pub fn inspect(&self, path: &Path) -> AttachmentResult<AttachmentMeta> {
        let metadata = fs::metadata(path).map_err(AttachmentError::FileRead)?;
        if !metadata.is_file() {
            return Err(AttachmentError::NotAFile(path.to_path_buf()));
        }

        let size_bytes = metadata.len();
        if size_bytes == 0 {
            return Err(AttachmentError::EmptyFile(path.to_path_buf()));
        }
        if size_bytes > self.max_bytes {
            return Err(AttachmentError::TooLarge {
                path: path.to_path_buf(),
                max_bytes: self.max_bytes,
            });
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| NonEmptyText::new(name).ok())
            .ok_or_else(|| AttachmentError::InvalidFileName(path.to_path_buf()))?;

        let mut file = fs::File::open(path).map_err(AttachmentError::FileRead)?;
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; HASH_READ_BUFFER_BYTES];
        let mut head: Vec<u8> = Vec::new();

        loop {
            let read = file.read(&mut buffer).map_err(AttachmentError::FileRead)?;
            if read == 0 {
                break;
            }
            if head.is_empty() {
                head.extend_from_slice(&buffer[..read]);
            }
            hasher.update(&buffer[..read]);
        }

        let sha256 = hex::encode(hasher.finalize());
        let media_type = infer::get(&head).map(|kind| kind.mime_type().to_owned());

        Ok(AttachmentMeta {
            file_name,
            size_bytes,
            media_type,
            sha256,
        })
    }
}

impl Default for AttachmentService {
    fn default() -> Self {
        Self::new()
    }
}
