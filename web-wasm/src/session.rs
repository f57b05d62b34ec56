//! ブラウザ用のセッション部品
//!
//! ReviewSession の状態をLeptosのシグナルへ流し、待ち時間はgloo-timersで取る。

use crate::api::BrowserApi;
use bias_tagger_common::{Notice, Pacer, Presenter, ReviewSession, SessionView};
use gloo::timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::cell::Cell;
use std::time::Duration;

/// 通知を表示しておく時間
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

pub type WebSession = ReviewSession<BrowserApi, BrowserApi, GlooPacer, SignalPresenter>;

pub fn build_session(api: BrowserApi, presenter: SignalPresenter) -> WebSession {
    ReviewSession::new(api.clone(), api, GlooPacer, presenter, Default::default())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooPacer;

impl Pacer for GlooPacer {
    async fn pause(&self, delay: Duration) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

/// 表示中の通知（idで古いタイマーによる消去を防ぐ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

thread_local! {
    static NEXT_TOAST_ID: Cell<u64> = const { Cell::new(0) };
}

/// セッションの状態をシグナルに書き込む
#[derive(Clone, Copy)]
pub struct SignalPresenter {
    view: WriteSignal<SessionView>,
    toast: WriteSignal<Option<Toast>>,
}

impl SignalPresenter {
    pub fn new(view: WriteSignal<SessionView>, toast: WriteSignal<Option<Toast>>) -> Self {
        Self { view, toast }
    }
}

impl Presenter for SignalPresenter {
    fn notify(&self, notice: Notice) {
        show_notice(self.toast, notice);
    }

    fn render(&self, view: &SessionView) {
        self.view.set(view.clone());
    }
}

/// 通知を出し、一定時間後に消す
pub fn show_notice(toast: WriteSignal<Option<Toast>>, notice: Notice) {
    let id = NEXT_TOAST_ID.with(|next| {
        let id = next.get() + 1;
        next.set(id);
        id
    });
    toast.set(Some(Toast { id, notice }));
    set_timeout(
        move || {
            toast.update(|current| {
                if current.as_ref().is_some_and(|t| t.id == id) {
                    *current = None;
                }
            })
        },
        NOTICE_DURATION,
    );
}

/// キーボードショートカット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Submit,
    Skip,
}

/// Ctrl+Enter で送信、Ctrl+→ でスキップ
pub fn shortcut(key: &str, ctrl: bool) -> Option<Shortcut> {
    if !ctrl {
        return None;
    }
    match key {
        "Enter" => Some(Shortcut::Submit),
        "ArrowRight" => Some(Shortcut::Skip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut() {
        assert_eq!(shortcut("Enter", true), Some(Shortcut::Submit));
        assert_eq!(shortcut("ArrowRight", true), Some(Shortcut::Skip));
        assert_eq!(shortcut("Enter", false), None);
        assert_eq!(shortcut("ArrowLeft", true), None);
    }
}
