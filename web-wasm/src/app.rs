//! メインアプリケーションコンポーネント

use crate::api::BrowserApi;
use crate::components::{
    dashboard::Dashboard, header::Header, notice::NoticeBanner, progress::SessionProgress,
    review_panel::ReviewPanel,
};
use crate::session::{build_session, shortcut, Shortcut, SignalPresenter, Toast, WebSession};
use bias_tagger_common::SessionView;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

/// 表示中のページ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Review,
    Dashboard,
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (page, set_page) = signal(Page::Review);
    let (view, set_view) = signal(SessionView::default());
    let (toast, set_toast) = signal(None::<Toast>);

    // セッションはページを切り替えても保持する
    let session: StoredValue<Rc<WebSession>, LocalStorage> = StoredValue::new_local(Rc::new(build_session(
        BrowserApi::same_origin(),
        SignalPresenter::new(set_view, set_toast),
    )));

    let load_next = move || {
        let session = session.get_value();
        spawn_local(async move {
            session.load_next().await;
        });
    };
    let run = move |action: Shortcut| {
        let session = session.get_value();
        spawn_local(async move {
            match action {
                Shortcut::Submit => session.submit_draft().await,
                Shortcut::Skip => session.skip().await,
            };
        });
    };

    load_next();

    let _keys = window_event_listener(ev::keydown, move |ev| {
        if page.get_untracked() != Page::Review {
            return;
        }
        if let Some(action) = shortcut(&ev.key(), ev.ctrl_key()) {
            ev.prevent_default();
            run(action);
        }
    });

    let on_toggle = Callback::new(move |tag: String| session.with_value(|s| s.toggle_tag(&tag)));
    let on_notes = Callback::new(move |notes: String| session.with_value(|s| s.set_notes(notes)));
    let on_submit = Callback::new(move |_: ()| run(Shortcut::Submit));
    let on_skip = Callback::new(move |_: ()| run(Shortcut::Skip));
    let on_retry = Callback::new(move |_: ()| load_next());

    view! {
        <div class="container">
            <Header page=page set_page=set_page />
            <NoticeBanner toast=toast />

            {move || match page.get() {
                Page::Review => view! {
                    <ReviewPanel
                        view=view
                        on_toggle=on_toggle
                        on_notes=on_notes
                        on_submit=on_submit
                        on_skip=on_skip
                        on_retry=on_retry
                    />
                    <SessionProgress view=view />
                }
                .into_any(),
                Page::Dashboard => view! { <Dashboard set_toast=set_toast /> }.into_any(),
            }}
        </div>
    }
}
