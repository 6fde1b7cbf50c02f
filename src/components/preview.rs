//! Candidate file previews.
//!
//! One row per candidate: a thumbnail from the file's object URL for
//! images, a generic placeholder for PDFs, the file name and a remove
//! control.

use leptos::*;

use crate::controller::{FileLike, UploadController};
use crate::files::WebFile;

#[component]
pub fn PreviewSection(state: RwSignal<UploadController<WebFile>>) -> impl IntoView {
    view! {
        <div class="preview-list">
            // Keyed by the candidate's stable id: a row's content is
            // captured once, so positions must never be reused after a
            // mid-list removal.
            <For
                each=move || state.get().files().to_vec()
                key=|candidate| candidate.id()
                children=move |candidate| {
                    let id = candidate.id();
                    let file = candidate.file();
                    let name = file.name();
                    let thumb = match file.preview_url() {
                        Some(url) => view! {
                            <img class="preview-thumb" src=url alt="Preview"/>
                        }
                        .into_view(),
                        None => view! {
                            <div class="preview-placeholder">"PDF"</div>
                        }
                        .into_view(),
                    };

                    view! {
                        <div class="preview-item">
                            {thumb}
                            <span class="preview-name">{name}</span>
                            <button
                                class="preview-remove"
                                on:click=move |_| state.update(|ctrl| ctrl.remove(id))
                            >
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
