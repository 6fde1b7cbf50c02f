//! Upload progress indicator.

use leptos::*;

use crate::controller::UploadController;
use crate::files::WebFile;
use crate::types::UploadStatus;

/// Progress bar plus rounded percent, shown only while a request is in
/// flight.
#[component]
pub fn ProgressSection(state: RwSignal<UploadController<WebFile>>) -> impl IntoView {
    let uploading = move || state.get().status() == UploadStatus::Uploading;

    view! {
        <Show when=uploading fallback=|| view! {}>
            <div class="progress-section">
                <progress
                    class="progress-bar"
                    max="100"
                    value=move || format!("{:.0}", state.get().progress())
                />
                <p class="progress-percent">
                    {move || format!("{:.0}%", state.get().progress())}
                </p>
            </div>
        </Show>
    }
}
