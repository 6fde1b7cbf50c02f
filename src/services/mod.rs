//! External communication.
//!
//! # Services
//!
//! - [`upload`] - Multipart POST to the upload endpoint with progress

pub mod upload;

pub use upload::*;
