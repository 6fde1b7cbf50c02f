//! Common types used across the upload form.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.

use serde_json::json;
use thiserror::Error;

/// Lifecycle state of the upload form.
///
/// Single authoritative value owned by the controller. The machine is
/// long-lived for the life of the view; there is no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    /// No upload started yet, or the previous one has been acknowledged.
    Idle,
    /// A request is in flight. At most one at a time.
    Uploading,
    /// The last request got a 2xx response.
    Success,
    /// The last request failed; candidates are kept for retry.
    Error,
}

/// Why a candidate file was refused by the selection handler.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// MIME type outside the allowed set.
    #[error("Invalid file type (PNG, JPG, PDF only)")]
    UnsupportedType(String),
    /// File larger than the 2 MiB cap.
    #[error("File size exceeds 2MB")]
    TooLarge(u64),
}

impl RejectReason {
    /// Machine-readable context for the diagnostic log: the offending
    /// MIME type or byte size.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            RejectReason::UnsupportedType(mime) => json!({ "mime": mime }),
            RejectReason::TooLarge(size) => json!({ "size": size }),
        }
    }
}

/// A file refused during selection, with the offending file's name.
///
/// The aggregated user notice is one line per rejected file.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{name}: {reason}")]
pub struct RejectedFile {
    /// Name of the offered file.
    pub name: String,
    /// Why it was refused.
    pub reason: RejectReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_messages_match_ui_copy() {
        let wrong_type = RejectReason::UnsupportedType("text/plain".to_string());
        assert_eq!(wrong_type.to_string(), "Invalid file type (PNG, JPG, PDF only)");

        let too_large = RejectReason::TooLarge(3 * 1024 * 1024);
        assert_eq!(too_large.to_string(), "File size exceeds 2MB");
    }

    #[test]
    fn reject_detail_carries_the_offending_value() {
        let wrong_type = RejectReason::UnsupportedType("text/plain".to_string());
        assert_eq!(wrong_type.detail(), json!({ "mime": "text/plain" }));

        let too_large = RejectReason::TooLarge(2_097_153);
        assert_eq!(too_large.detail(), json!({ "size": 2_097_153 }));
    }

    #[test]
    fn rejected_file_names_the_file() {
        let rejected = RejectedFile {
            name: "notes.txt".to_string(),
            reason: RejectReason::UnsupportedType("text/plain".to_string()),
        };
        assert_eq!(
            rejected.to_string(),
            "notes.txt: Invalid file type (PNG, JPG, PDF only)"
        );
    }
}
