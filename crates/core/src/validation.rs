//! Input validation utilities.
//!
//! This module contains functions for validating inputs to ensure they meet
//! safety and correctness requirements before being used in operations.

use crate::{WorkflowError, WorkflowResult};

/// Validates that a collection key is safe for use as a file name.
///
/// Collection keys become `<key>.json` file names inside the data directory.
/// This function applies defensive guardrails to prevent path traversal or
/// malformed file names:
/// - Rejects empty or whitespace-only strings
/// - Bounds the length to avoid pathological inputs
/// - Restricts characters to a conservative ASCII set suitable for a file name
///
/// # Arguments
///
/// * `key` - The collection key to validate.
///
/// # Errors
///
/// Returns a `WorkflowError::InvalidInput` if the key is invalid.
pub fn validate_collection_key_safe_for_path(key: &str) -> WorkflowResult<()> {
    const MAX_KEY_LEN: usize = 64;

    if key.trim().is_empty() {
        return Err(WorkflowError::InvalidInput(
            "collection key cannot be empty".into(),
        ));
    }

    if key.len() > MAX_KEY_LEN {
        return Err(WorkflowError::InvalidInput(format!(
            "collection key exceeds maximum length of {} characters",
            MAX_KEY_LEN
        )));
    }

    if !key.is_ascii() {
        return Err(WorkflowError::InvalidInput(
            "collection key must contain only ASCII characters".into(),
        ));
    }

    let ok = key
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));

    if !ok {
        return Err(WorkflowError::InvalidInput(
            "collection key contains invalid characters (only alphanumeric, '-', '_' allowed)"
                .into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_keys_are_valid() {
        for key in &["prescriptionQueue", "userBookings", "nurseAssignments"] {
            assert!(
                validate_collection_key_safe_for_path(key).is_ok(),
                "key '{key}' should be valid"
            );
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(validate_collection_key_safe_for_path("").is_err());
        assert!(validate_collection_key_safe_for_path("   ").is_err());
    }

    #[test]
    fn test_path_traversal_characters_rejected() {
        assert!(validate_collection_key_safe_for_path("../etc/passwd").is_err());
        assert!(validate_collection_key_safe_for_path("queue/evil").is_err());
        assert!(validate_collection_key_safe_for_path("queue.json").is_err());
    }

    #[test]
    fn test_overlong_key_rejected() {
        let key = "q".repeat(65);
        assert!(validate_collection_key_safe_for_path(&key).is_err());
    }

    #[test]
    fn test_non_ascii_key_rejected() {
        assert!(validate_collection_key_safe_for_path("queué").is_err());
    }
}
