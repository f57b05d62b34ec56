//! レビュー画面
//!
//! 表示はすべて SessionView から組み立て、操作はコールバック経由でセッションに渡す。

use bias_tagger_common::{DecisionKind, SessionState, SessionView, BIAS_CATEGORIES};
use leptos::prelude::*;

/// 画面の大枠
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Active,
    Exhausted,
    Failed,
}

impl From<SessionState> for Phase {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Exhausted => Phase::Exhausted,
            SessionState::LoadFailed => Phase::Failed,
            _ => Phase::Active,
        }
    }
}

#[component]
pub fn ReviewPanel(
    view: ReadSignal<SessionView>,
    #[prop(into)] on_toggle: Callback<String>,
    #[prop(into)] on_notes: Callback<String>,
    #[prop(into)] on_submit: Callback<()>,
    #[prop(into)] on_skip: Callback<()>,
    #[prop(into)] on_retry: Callback<()>,
) -> impl IntoView {
    let state = Memo::new(move |_| view.with(|v| v.state));
    let phase = Memo::new(move |_| Phase::from(state.get()));

    move || match phase.get() {
        Phase::Exhausted => view! {
            <div class="no-images">
                <h2>"🎉 All done!"</h2>
                <p>"No more images to review. Thanks for tagging!"</p>
            </div>
        }
        .into_any(),
        Phase::Failed => view! {
            <div class="no-images">
                <p>"The next image could not be loaded."</p>
                <button class="btn btn-secondary" on:click=move |_| on_retry.run(())>
                    "Retry"
                </button>
            </div>
        }
        .into_any(),
        Phase::Active => view! {
            <ReviewCard
                view=view
                state=state
                on_toggle=on_toggle
                on_notes=on_notes
                on_submit=on_submit
                on_skip=on_skip
            />
        }
        .into_any(),
    }
}

#[component]
fn ReviewCard(
    view: ReadSignal<SessionView>,
    state: Memo<SessionState>,
    on_toggle: Callback<String>,
    on_notes: Callback<String>,
    on_submit: Callback<()>,
    on_skip: Callback<()>,
) -> impl IntoView {
    let disabled = move || !view.with(|v| v.inputs_enabled());
    let has_item = move || view.with(|v| v.item.is_some());
    let media_url = move || view.with(|v| v.item.as_ref().map(|i| i.media_url.clone()).unwrap_or_default());
    let prompt = move || view.with(|v| v.item.as_ref().map(|i| i.prompt_or_default().to_string()).unwrap_or_default());
    let tags = move || view.with(|v| v.item.as_ref().map(|i| i.tags_label()).unwrap_or_default());

    view! {
        <div class="tagger-container">
            <Show
                when=has_item
                fallback=|| view! { <div class="loading">"Loading next image..."</div> }
            >
                <div class="image-container">
                    <img class="current-image" src=media_url alt=prompt />
                    <div class="image-info">
                        <div class="info-row">
                            <strong>"Prompt: "</strong>
                            <span>{prompt}</span>
                        </div>
                        <div class="info-row">
                            <strong>"Tags: "</strong>
                            <span>{tags}</span>
                        </div>
                    </div>
                </div>
            </Show>

            <div class="tagging-panel">
                <h3>"Select bias categories"</h3>
                <div class="bias-options">
                    {BIAS_CATEGORIES
                        .iter()
                        .map(|&(value, label)| {
                            view! {
                                <label class="bias-option">
                                    <input
                                        type="checkbox"
                                        name="bias"
                                        value=value
                                        prop:checked=move || view.with(|v| v.draft.is_selected(value))
                                        prop:disabled=disabled
                                        on:change=move |_| on_toggle.run(value.to_string())
                                    />
                                    <span>{label}</span>
                                </label>
                            }
                        })
                        .collect_view()}
                </div>

                <div class="form-group">
                    <label for="notes">"Notes (optional)"</label>
                    <textarea
                        id="notes"
                        placeholder="Describe the bias you noticed..."
                        prop:value=move || view.with(|v| v.draft.notes.clone())
                        prop:disabled=disabled
                        on:input=move |ev| on_notes.run(event_target_value(&ev))
                    />
                </div>

                <div class="actions">
                    <button class="btn btn-primary" prop:disabled=disabled on:click=move |_| on_submit.run(())>
                        {move || {
                            if state.get() == SessionState::Submitting(DecisionKind::Tag) {
                                "Submitting..."
                            } else {
                                "Submit Tags"
                            }
                        }}
                    </button>
                    <button class="btn btn-secondary" prop:disabled=disabled on:click=move |_| on_skip.run(())>
                        {move || {
                            if state.get() == SessionState::Submitting(DecisionKind::Skip) {
                                "Skipping..."
                            } else {
                                "No Bias - Next Image"
                            }
                        }}
                    </button>
                </div>
                <p class="shortcut-hint">"Ctrl+Enter to submit, Ctrl+→ for no bias"</p>
            </div>
        </div>
    }
}
