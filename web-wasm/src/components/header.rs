//! ヘッダーコンポーネント（ページ切り替え）

use crate::app::Page;
use leptos::prelude::*;

#[component]
pub fn Header(page: ReadSignal<Page>, set_page: WriteSignal<Page>) -> impl IntoView {
    let tab = move |target: Page, label: &'static str| {
        view! {
            <button
                class="nav-link"
                class:active=move || page.get() == target
                on:click=move |_| set_page.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <header class="header">
            <h1>"AI Image Bias Tagger"</h1>
            <nav class="nav">
                {tab(Page::Review, "Tag Images")}
                {tab(Page::Dashboard, "Dashboard")}
            </nav>
        </header>
    }
}
