//! UI components for the upload form.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//!
//! # Feature Components
//! - [`UploadSection`] - Drop zone, file picker and submit
//! - [`PreviewSection`] - Candidate list with thumbnails
//! - [`ProgressSection`] - In-flight upload progress

mod hero;
mod preview;
mod progress;
mod upload;

pub use hero::*;
pub use preview::*;
pub use progress::*;
pub use upload::*;
