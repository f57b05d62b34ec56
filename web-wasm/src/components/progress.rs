//! セッション進捗

use bias_tagger_common::SessionView;
use leptos::prelude::*;

#[component]
pub fn SessionProgress(view: ReadSignal<SessionView>) -> impl IntoView {
    view! {
        <p class="progress-text">
            "Images tagged this session: "
            <strong>{move || view.with(|v| v.tagged_count)}</strong>
        </p>
    }
}
