//! Application configuration.
//!
//! Centralized configuration for the upload form. In development these are
//! hardcoded. In production they could be loaded from environment or a
//! config file.

/// Upload endpoint URL.
///
/// Fixed HTTP endpoint accepting `POST multipart/form-data`.
pub const UPLOAD_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Multipart field name, repeated once per attached file.
pub const FILE_FIELD: &str = "files";

/// Maximum number of candidate files held at once.
pub const MAX_FILES: usize = 3;

/// Maximum file size for upload (in bytes).
///
/// 2 MiB limit.
pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// MIME types accepted by the selection handler.
pub const ALLOWED_TYPES: [&str; 3] = ["image/png", "image/jpeg", "application/pdf"];

/// DOM id of the hidden file input element.
pub const FILE_INPUT_ID: &str = "fileInput";
