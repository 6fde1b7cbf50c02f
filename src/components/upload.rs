//! Upload section: drop zone, file picker and submit.
//!
//! Picker-selected and dropped files go through the same
//! validation/accumulation path on the controller. Submit assembles the
//! multipart payload and drives the status transitions around the single
//! in-flight request.

use std::rc::Rc;

use leptos::*;
use serde_json::json;
use web_sys::{DragEvent, Event, FileList, HtmlInputElement};

use crate::config::FILE_INPUT_ID;
use crate::controller::UploadController;
use crate::files::WebFile;
use crate::picker::FilePicker;
use crate::services::{build_form_data, send_files, UploadError};
use crate::types::UploadStatus;

/// Transient user-visible notice below the form.
#[derive(Clone, PartialEq)]
enum Notice {
    Success(String),
    Error(String),
}

fn collect_files(list: FileList) -> Vec<WebFile> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(WebFile::new)
        .collect()
}

/// Feed a batch of offered files to the controller and surface the
/// aggregated rejection message, one line per rejected file.
fn offer_files(
    state: RwSignal<UploadController<WebFile>>,
    set_notice: WriteSignal<Option<Notice>>,
    batch: Vec<WebFile>,
) {
    if batch.is_empty() {
        return;
    }
    let mut rejected = Vec::new();
    state.update(|ctrl| rejected = ctrl.accept(batch));
    if rejected.is_empty() {
        set_notice.set(None);
    } else {
        let lines: Vec<String> = rejected.iter().map(ToString::to_string).collect();
        set_notice.set(Some(Notice::Error(lines.join("\n"))));
    }
}

fn fail_upload(
    state: RwSignal<UploadController<WebFile>>,
    set_notice: WriteSignal<Option<Notice>>,
    err: UploadError,
) {
    let detail = match &err {
        UploadError::Server { status, body } => json!({ "status": status, "body": body }),
        UploadError::Transport(message) => json!({ "error": message }),
    };
    state.update(|ctrl| ctrl.finish_error(&err.to_string(), Some(detail)));
    set_notice.set(Some(Notice::Error(format!(
        "Error uploading files: {}",
        err.user_message()
    ))));
}

#[component]
pub fn UploadSection(
    state: RwSignal<UploadController<WebFile>>,
    picker: Rc<dyn FilePicker>,
) -> impl IntoView {
    let (notice, set_notice) = create_signal(None::<Notice>);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(list) = input.files() {
            offer_files(state, set_notice, collect_files(list));
        }
        // Allow picking the same file again after a removal.
        input.set_value("");
    };

    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        state.update(|ctrl| ctrl.set_drag_active(true));
    };

    let on_drag_leave = move |_: DragEvent| {
        state.update(|ctrl| ctrl.set_drag_active(false));
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        state.update(|ctrl| ctrl.set_drag_active(false));
        if let Some(list) = ev.data_transfer().and_then(|dt| dt.files()) {
            offer_files(state, set_notice, collect_files(list));
        }
    };

    let on_submit = move |_| {
        let mut started = false;
        state.update(|ctrl| started = ctrl.begin_upload());
        if !started {
            return;
        }
        set_notice.set(None);
        let files: Vec<WebFile> = state.with_untracked(|ctrl| {
            ctrl.files().iter().map(|c| c.file().clone()).collect()
        });

        spawn_local(async move {
            let form = match build_form_data(&files) {
                Ok(form) => form,
                Err(err) => {
                    fail_upload(state, set_notice, err);
                    return;
                }
            };

            let result = send_files(&form, move |loaded, total| {
                state.update(|ctrl| ctrl.record_progress(loaded, total));
            })
            .await;

            match result {
                Ok(meta) => {
                    log::info!("Upload complete: {} {}", meta.status, meta.status_text);
                    state.update(|ctrl| ctrl.finish_success());
                    set_notice.set(Some(Notice::Success(
                        "Files uploaded successfully!".to_string(),
                    )));
                }
                Err(err) => fail_upload(state, set_notice, err),
            }
        });
    };

    let uploading = move || state.get().status() == UploadStatus::Uploading;

    view! {
        <div
            class="upload-section"
            class=("drag-active", move || state.get().drag_active())
            on:dragover=on_drag_over
            on:dragleave=on_drag_leave
            on:drop=on_drop
        >
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">"Drag & drop files here, or click to select"</div>
            <div class="upload-hint">"PNG, JPG or PDF, up to 3 files, 2MB each"</div>

            <input
                type="file"
                id=FILE_INPUT_ID
                multiple
                accept=".png,.jpg,.jpeg,.pdf"
                style="display:none"
                on:change=on_file_change
            />

            <button class="upload-button" on:click=move |_| picker.open()>
                "Select Files"
            </button>
        </div>

        <button
            class="submit-button"
            on:click=on_submit
            disabled=move || !state.get().can_submit()
        >
            {move || if uploading() { "Uploading..." } else { "Upload" }}
        </button>

        {move || notice.get().map(|notice| match notice {
            Notice::Success(message) => view! {
                <div class="notice notice-success">{message}</div>
            },
            Notice::Error(message) => view! {
                <div class="notice notice-error">
                    {message
                        .lines()
                        .map(|line| view! { <div>{line.to_string()}</div> })
                        .collect_view()}
                </div>
            },
        })}
    }
}
