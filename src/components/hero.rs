//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"File Upload Form"</h1>
            <p class="subtitle">
                "Attach up to 3 files (PNG, JPG or PDF, 2MB max each) "
                "and send them in one go."
            </p>
        </div>
    }
}
