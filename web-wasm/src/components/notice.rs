//! 通知バナー

use crate::session::Toast;
use bias_tagger_common::NoticeLevel;
use leptos::prelude::*;

#[component]
pub fn NoticeBanner(toast: ReadSignal<Option<Toast>>) -> impl IntoView {
    move || {
        toast.get().map(|t| {
            let class = match t.notice.level {
                NoticeLevel::Success => "notification success",
                NoticeLevel::Error => "notification error",
            };
            view! { <div class=class role="status">{t.notice.message}</div> }
        })
    }
}
