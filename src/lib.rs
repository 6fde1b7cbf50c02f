//! Dropform - Leptos file upload form
//!
//! A WebAssembly frontend for attaching up to three files (PNG, JPG or
//! PDF, 2 MiB each) and sending them to a fixed endpoint as one
//! multipart POST, with live upload progress.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                              │
//! │  ├── UploadSection (drop zone, picker, submit, notices)     │
//! │  ├── PreviewSection (candidate thumbnails)                  │
//! │  └── ProgressSection (while a request is in flight)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Endpoint URL and validation limits
//! - [`types`] - Status and rejection types
//! - [`controller`] - The form state machine (DOM-free, unit-tested)
//! - [`files`] - Browser file handles and scoped preview URLs
//! - [`picker`] - Injectable file-picker capability
//! - [`diagnostics`] - Structured diagnostic logging
//! - [`components`] - Leptos view layer
//! - [`services`] - Multipart upload client

use std::rc::Rc;

use leptos::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod files;
pub mod picker;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;

pub use controller::{validate, Candidate, FileLike, UploadController};
pub use diagnostics::{ConsoleDiagnostics, DiagnosticEvent, DiagnosticSink};
pub use files::{ObjectUrl, WebFile};
pub use picker::{DomPicker, FilePicker};
pub use types::{RejectReason, RejectedFile, UploadStatus};

pub use components::*;
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Starting upload form");

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let diag: Rc<dyn DiagnosticSink> = Rc::new(ConsoleDiagnostics);
    let state = create_rw_signal(UploadController::<WebFile>::new(diag));
    let picker: Rc<dyn FilePicker> = Rc::new(DomPicker::new(FILE_INPUT_ID));

    // Unmount releases the preview URLs along with the candidates.
    on_cleanup(move || {
        let _ = state.try_update(|ctrl| ctrl.clear());
    });

    view! {
        <div class="container">
            <Hero/>

            <UploadSection state=state picker=picker/>

            <PreviewSection state=state/>

            <ProgressSection state=state/>
        </div>
    }
}
