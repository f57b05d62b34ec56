//! レビューセッション（1枚ずつのレビューキュー状態機械）
//!
//! 画像取得 → 表示 → 判定 → 送信 → 次へ、の流れを管理する。
//! 画像の取得元（ImageSource）と送信先（TagSink）は外部から注入する。
//!
//! ## 状態遷移
//! - `Idle` → `Loading` → `AwaitingDecision` → `Submitting` → `Loading` …
//! - キューが空になれば `Exhausted`、取得失敗なら `LoadFailed`
//!   （どちらも `load_next()` で再開できる）
//!
//! 単一スレッド前提。全操作は `&self` を取り、内部状態は `Cell`/`RefCell` で持つ。
//! `.await` をまたいで借用を保持しないこと。

use crate::error::{Error, Result};
use crate::types::{normalize_tags, Decision, DecisionKind, ReviewItem};
use std::cell::{Cell, RefCell};
use std::time::Duration;
use tracing::{debug, warn};

/// タグ送信成功から次の画像取得までの待ち時間
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(500);

pub const VALIDATION_MESSAGE: &str = "Please select at least one bias type or click \"No Bias\"";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Tags submitted successfully!";

/// 次の画像の取得結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextItem {
    Item(ReviewItem),
    /// これ以上レビュー対象がない
    Exhausted,
}

/// 次のレビュー対象を返す取得元
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    /// `Err(Error::Exhausted)` も `Ok(NextItem::Exhausted)` と同じ扱いになる
    async fn next(&self) -> Result<NextItem>;
}

/// 判定の送信先
#[allow(async_fn_in_trait)]
pub trait TagSink {
    async fn record_decision(&self, decision: &Decision) -> Result<()>;

    async fn record_skip(&self, image_id: &str) -> Result<()>;
}

/// UI上の間（ま）を取るためのタイマー
#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn pause(&self, delay: Duration);
}

/// 待たないPacer（テスト・非対話用）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

impl Pacer for NoPause {
    async fn pause(&self, _delay: Duration) {}
}

/// 通知レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// オペレーターへの通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// 表示層
pub trait Presenter {
    fn notify(&self, notice: Notice);

    /// 状態が変わるたびに呼ばれる
    fn render(&self, _view: &SessionView) {}
}

/// セッション状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// まだ何も読み込んでいない
    #[default]
    Idle,
    Loading,
    AwaitingDecision,
    Submitting(DecisionKind),
    /// キューが空
    Exhausted,
    /// 取得に失敗（再読み込み待ち）
    LoadFailed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::AwaitingDecision => "awaiting-decision",
            SessionState::Submitting(DecisionKind::Tag) => "submitting",
            SessionState::Submitting(DecisionKind::Skip) => "skipping",
            SessionState::Exhausted => "exhausted",
            SessionState::LoadFailed => "load-failed",
        }
    }
}

/// 未送信の入力（選択カテゴリとメモ）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionDraft {
    pub selected: Vec<String>,
    pub notes: String,
}

impl DecisionDraft {
    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected.iter().any(|t| t == tag)
    }
}

/// 表示層に渡すスナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionView {
    pub state: SessionState,
    pub item: Option<ReviewItem>,
    pub tagged_count: u64,
    pub draft: DecisionDraft,
}

impl SessionView {
    pub fn inputs_enabled(&self) -> bool {
        self.state == SessionState::AwaitingDecision && self.item.is_some()
    }
}

/// `load_next()` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 新しい画像がレビュー対象になった（ID）
    Ready(String),
    Exhausted,
    Failed(String),
    /// 読み込み中のため無視
    Ignored,
}

/// `submit()` / `skip()` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// 送信成功（送信したID）
    Recorded(String),
    /// 入力不備のため送信しなかった
    Rejected,
    /// 送信失敗（同じ画像のまま再送可能）
    Failed(String),
    /// 判定を受け付けない状態だった
    Ignored,
}

/// セッション設定
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub pacing_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { pacing_delay: DEFAULT_PACING_DELAY }
    }
}

/// レビューセッション
pub struct ReviewSession<S, K, P, V> {
    source: S,
    sink: K,
    pacer: P,
    presenter: V,
    config: SessionConfig,
    state: Cell<SessionState>,
    current: RefCell<Option<ReviewItem>>,
    draft: RefCell<DecisionDraft>,
    tagged_count: Cell<u64>,
}

impl<S, K, P, V> ReviewSession<S, K, P, V>
where
    S: ImageSource,
    K: TagSink,
    P: Pacer,
    V: Presenter,
{
    pub fn new(source: S, sink: K, pacer: P, presenter: V, config: SessionConfig) -> Self {
        Self {
            source,
            sink,
            pacer,
            presenter,
            config,
            state: Cell::new(SessionState::Idle),
            current: RefCell::new(None),
            draft: RefCell::new(DecisionDraft::default()),
            tagged_count: Cell::new(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    pub fn current_item(&self) -> Option<ReviewItem> {
        self.current.borrow().clone()
    }

    pub fn tagged_count(&self) -> u64 {
        self.tagged_count.get()
    }

    pub fn draft(&self) -> DecisionDraft {
        self.draft.borrow().clone()
    }

    pub fn inputs_enabled(&self) -> bool {
        self.state.get() == SessionState::AwaitingDecision && self.current.borrow().is_some()
    }

    pub fn presenter(&self) -> &V {
        &self.presenter
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.state.get(),
            item: self.current.borrow().clone(),
            tagged_count: self.tagged_count.get(),
            draft: self.draft.borrow().clone(),
        }
    }

    /// 次の画像を読み込む
    pub async fn load_next(&self) -> LoadOutcome {
        if self.state.get() == SessionState::Loading {
            debug!("load_next ignored: already loading");
            return LoadOutcome::Ignored;
        }

        *self.current.borrow_mut() = None;
        self.transition(SessionState::Loading);

        match self.source.next().await {
            Ok(NextItem::Item(item)) => {
                let id = item.id.clone();
                *self.draft.borrow_mut() = DecisionDraft::default();
                *self.current.borrow_mut() = Some(item);
                debug!(image_id = %id, "item ready for review");
                self.transition(SessionState::AwaitingDecision);
                LoadOutcome::Ready(id)
            }
            Ok(NextItem::Exhausted) => self.exhaust(),
            Err(e) if e.is_exhaustion() => self.exhaust(),
            Err(e) => {
                warn!(error = %e, "failed to load next image");
                self.transition(SessionState::LoadFailed);
                self.presenter.notify(Notice::error(format!("Error loading image: {}", e)));
                LoadOutcome::Failed(e.to_string())
            }
        }
    }

    /// 選択したバイアスカテゴリで送信
    pub async fn submit<I, T>(&self, selected_bias_tags: I, notes: &str) -> DecisionOutcome
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let Some(image_id) = self.decision_target() else {
            debug!(state = self.state.get().as_str(), "submit ignored");
            return DecisionOutcome::Ignored;
        };

        let bias_tags = normalize_tags(selected_bias_tags);
        if bias_tags.is_empty() {
            self.presenter.notify(Notice::error(VALIDATION_MESSAGE));
            return DecisionOutcome::Rejected;
        }

        let decision = Decision::tag(image_id.clone(), bias_tags, notes);
        self.transition(SessionState::Submitting(DecisionKind::Tag));

        match self.sink.record_decision(&decision).await {
            Ok(()) => {
                self.acknowledge(&image_id);
                self.presenter.notify(Notice::success(SUBMIT_SUCCESS_MESSAGE));
                self.pacer.pause(self.config.pacing_delay).await;
                self.load_next().await;
                DecisionOutcome::Recorded(image_id)
            }
            Err(e) => self.reject(&image_id, "Error submitting tags", e),
        }
    }

    /// セッション内の入力内容で送信
    pub async fn submit_draft(&self) -> DecisionOutcome {
        let draft = self.draft();
        self.submit(&draft.selected, &draft.notes).await
    }

    /// バイアスなしとしてスキップ
    pub async fn skip(&self) -> DecisionOutcome {
        let Some(image_id) = self.decision_target() else {
            debug!(state = self.state.get().as_str(), "skip ignored");
            return DecisionOutcome::Ignored;
        };

        self.transition(SessionState::Submitting(DecisionKind::Skip));

        match self.sink.record_skip(&image_id).await {
            Ok(()) => {
                self.acknowledge(&image_id);
                // スキップは待たずに次へ
                self.load_next().await;
                DecisionOutcome::Recorded(image_id)
            }
            Err(e) => self.reject(&image_id, "Error skipping image", e),
        }
    }

    /// カテゴリ選択を切り替え
    pub fn toggle_tag(&self, tag: &str) {
        if !self.inputs_enabled() {
            return;
        }
        {
            let mut draft = self.draft.borrow_mut();
            if let Some(pos) = draft.selected.iter().position(|t| t == tag) {
                draft.selected.remove(pos);
            } else {
                draft.selected.push(tag.to_string());
            }
        }
        self.render();
    }

    /// カテゴリ選択をまとめて設定
    pub fn set_selected_tags<I, T>(&self, tags: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if !self.inputs_enabled() {
            return;
        }
        self.draft.borrow_mut().selected = normalize_tags(tags);
        self.render();
    }

    pub fn set_notes(&self, notes: impl Into<String>) {
        if !self.inputs_enabled() {
            return;
        }
        self.draft.borrow_mut().notes = notes.into();
        self.render();
    }

    /// 判定を受け付けられるなら対象IDを返す
    fn decision_target(&self) -> Option<String> {
        if self.state.get() != SessionState::AwaitingDecision {
            return None;
        }
        self.current.borrow().as_ref().map(|item| item.id.clone())
    }

    fn acknowledge(&self, image_id: &str) {
        let count = self.tagged_count.get() + 1;
        self.tagged_count.set(count);
        debug!(image_id, tagged_count = count, "decision recorded");
        self.render();
    }

    fn reject(&self, image_id: &str, context: &str, error: Error) -> DecisionOutcome {
        warn!(image_id, error = %error, "{}", context);
        self.transition(SessionState::AwaitingDecision);
        self.presenter.notify(Notice::error(format!("{}: {}", context, error)));
        DecisionOutcome::Failed(error.to_string())
    }

    fn exhaust(&self) -> LoadOutcome {
        debug!("review queue exhausted");
        *self.current.borrow_mut() = None;
        self.transition(SessionState::Exhausted);
        LoadOutcome::Exhausted
    }

    fn transition(&self, next: SessionState) {
        let prev = self.state.replace(next);
        if prev != next {
            debug!(from = prev.as_str(), to = next.as_str(), "session state");
        }
        self.render();
    }

    fn render(&self) {
        self.presenter.render(&self.view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::collections::VecDeque;
    use std::rc::Rc;

    fn item(id: &str) -> ReviewItem {
        ReviewItem {
            id: id.to_string(),
            media_url: format!("/i/{}.jpg", id),
            prompt: Some("p".into()),
            tags: vec![],
        }
    }

    /// 事前に積んだ結果を順に返す取得元
    struct FakeSource {
        queue: RefCell<VecDeque<Result<NextItem>>>,
        calls: Rc<Cell<usize>>,
    }

    impl FakeSource {
        fn with(results: Vec<Result<NextItem>>, calls: Rc<Cell<usize>>) -> Self {
            Self { queue: RefCell::new(results.into()), calls }
        }
    }

    impl ImageSource for &FakeSource {
        async fn next(&self) -> Result<NextItem> {
            self.calls.set(self.calls.get() + 1);
            self.queue.borrow_mut().pop_front().unwrap_or(Ok(NextItem::Exhausted))
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum SinkCall {
        Decision(Decision),
        Skip(String),
    }

    #[derive(Default)]
    struct FakeSink {
        calls: RefCell<Vec<SinkCall>>,
        fail_next: Cell<bool>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl FakeSink {
        fn failing() -> Self {
            let sink = Self::default();
            sink.fail_next.set(true);
            sink
        }

        async fn respond(&self) -> Result<()> {
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.fail_next.replace(false) {
                Err(Error::Server { status: 500, message: "Error submitting some tags".into() })
            } else {
                Ok(())
            }
        }
    }

    impl TagSink for &FakeSink {
        async fn record_decision(&self, decision: &Decision) -> Result<()> {
            self.calls.borrow_mut().push(SinkCall::Decision(decision.clone()));
            self.respond().await
        }

        async fn record_skip(&self, image_id: &str) -> Result<()> {
            self.calls.borrow_mut().push(SinkCall::Skip(image_id.to_string()));
            self.respond().await
        }
    }

    /// pauseの呼び出しと、その時点での取得回数を記録するPacer
    struct RecordingPacer {
        pauses: RefCell<Vec<Duration>>,
        source_calls: Rc<Cell<usize>>,
        fetches_at_pause: RefCell<Vec<usize>>,
    }

    impl Pacer for &RecordingPacer {
        async fn pause(&self, delay: Duration) {
            self.pauses.borrow_mut().push(delay);
            self.fetches_at_pause.borrow_mut().push(self.source_calls.get());
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        notices: RefCell<Vec<Notice>>,
        views: RefCell<Vec<SessionView>>,
    }

    impl Presenter for Rc<RecordingPresenter> {
        fn notify(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }

        fn render(&self, view: &SessionView) {
            self.views.borrow_mut().push(view.clone());
        }
    }

    struct Harness {
        source: FakeSource,
        sink: FakeSink,
        pacer: RecordingPacer,
        presenter: Rc<RecordingPresenter>,
    }

    impl Harness {
        fn new(results: Vec<Result<NextItem>>) -> Self {
            Self::with_sink(results, FakeSink::default())
        }

        fn with_sink(results: Vec<Result<NextItem>>, sink: FakeSink) -> Self {
            let source_calls = Rc::new(Cell::new(0));
            Self {
                source: FakeSource::with(results, Rc::clone(&source_calls)),
                sink,
                pacer: RecordingPacer {
                    pauses: RefCell::new(Vec::new()),
                    source_calls,
                    fetches_at_pause: RefCell::new(Vec::new()),
                },
                presenter: Rc::new(RecordingPresenter::default()),
            }
        }

        fn session(
            &self,
        ) -> ReviewSession<&FakeSource, &FakeSink, &RecordingPacer, Rc<RecordingPresenter>> {
            ReviewSession::new(
                &self.source,
                &self.sink,
                &self.pacer,
                Rc::clone(&self.presenter),
                SessionConfig::default(),
            )
        }

        fn notices(&self) -> Vec<Notice> {
            self.presenter.notices.borrow().clone()
        }

        fn sink_calls(&self) -> Vec<SinkCall> {
            self.sink.calls.borrow().clone()
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let h = Harness::new(vec![]);
        let session = h.session();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.current_item().is_none());
        assert_eq!(session.tagged_count(), 0);
        assert!(!session.inputs_enabled());
    }

    #[test]
    fn test_load_next_sets_current_item() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a1"))), Ok(NextItem::Item(item("a2")))]);
        let session = h.session();

        assert_eq!(block_on(session.load_next()), LoadOutcome::Ready("a1".into()));
        assert_eq!(session.state(), SessionState::AwaitingDecision);
        assert_eq!(session.current_item().unwrap().id, "a1");

        assert_eq!(block_on(session.load_next()), LoadOutcome::Ready("a2".into()));
        assert_eq!(session.current_item().unwrap().id, "a2");
    }

    #[test]
    fn test_load_never_exposes_two_items() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a1"))), Ok(NextItem::Item(item("a2")))]);
        let session = h.session();
        block_on(session.load_next());
        block_on(session.load_next());

        // 読み込み中は必ずitemなし、AwaitingDecisionでは直近に取得したitem
        let views = h.presenter.views.borrow();
        let mut last_fetched = None;
        for view in views.iter() {
            match view.state {
                SessionState::Loading => assert!(view.item.is_none()),
                SessionState::AwaitingDecision => {
                    let id = view.item.as_ref().map(|i| i.id.clone());
                    assert!(id.is_some());
                    last_fetched = id;
                }
                _ => {}
            }
        }
        assert_eq!(last_fetched.as_deref(), Some("a2"));
    }

    #[test]
    fn test_load_clears_previous_draft() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a1"))), Ok(NextItem::Item(item("a2")))]);
        let session = h.session();
        block_on(session.load_next());
        session.toggle_tag("age");
        session.set_notes("hmm");
        assert_eq!(session.draft().selected, vec!["age"]);

        block_on(session.load_next());
        assert_eq!(session.draft(), DecisionDraft::default());
    }

    #[test]
    fn test_exhaustion_by_flag() {
        let h = Harness::new(vec![Ok(NextItem::Exhausted)]);
        let session = h.session();
        assert_eq!(block_on(session.load_next()), LoadOutcome::Exhausted);
        assert_eq!(session.state(), SessionState::Exhausted);
        assert!(session.current_item().is_none());
        assert!(h.notices().is_empty());
    }

    #[test]
    fn test_exhaustion_by_error() {
        let h = Harness::new(vec![Err(Error::Exhausted)]);
        let session = h.session();
        assert_eq!(block_on(session.load_next()), LoadOutcome::Exhausted);
        assert_eq!(session.state(), SessionState::Exhausted);
        assert!(session.current_item().is_none());
        assert!(h.notices().is_empty());
    }

    #[test]
    fn test_no_sink_calls_after_exhaustion() {
        let h = Harness::new(vec![Ok(NextItem::Exhausted)]);
        let session = h.session();
        block_on(session.load_next());

        assert_eq!(block_on(session.submit(["age"], "")), DecisionOutcome::Ignored);
        assert_eq!(block_on(session.skip()), DecisionOutcome::Ignored);
        assert!(h.sink_calls().is_empty());
        assert_eq!(session.tagged_count(), 0);
    }

    #[test]
    fn test_exhausted_session_can_load_again() {
        let h = Harness::new(vec![Ok(NextItem::Exhausted), Ok(NextItem::Item(item("b1")))]);
        let session = h.session();
        block_on(session.load_next());
        assert_eq!(block_on(session.load_next()), LoadOutcome::Ready("b1".into()));
        assert_eq!(session.state(), SessionState::AwaitingDecision);
    }

    #[test]
    fn test_load_failure_reports_and_is_retryable() {
        let h = Harness::new(vec![
            Err(Error::Transport("connection refused".into())),
            Ok(NextItem::Item(item("a1"))),
        ]);
        let session = h.session();

        let outcome = block_on(session.load_next());
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert_eq!(session.state(), SessionState::LoadFailed);
        assert!(session.current_item().is_none());
        assert_eq!(
            h.notices(),
            vec![Notice::error("Error loading image: connection refused")]
        );

        assert_eq!(block_on(session.load_next()), LoadOutcome::Ready("a1".into()));
    }

    #[test]
    fn test_item_without_id_is_not_reviewable() {
        let body = r#"{"has_more":true,"image":{"media_url":"/x.jpg"}}"#;
        let h = Harness::new(vec![crate::api::interpret_next_response(200, body)]);
        let session = h.session();

        assert!(matches!(block_on(session.load_next()), LoadOutcome::Failed(_)));
        assert_eq!(session.state(), SessionState::LoadFailed);
        assert!(session.current_item().is_none());
        assert_eq!(block_on(session.submit(["age"], "")), DecisionOutcome::Ignored);
        assert!(h.sink_calls().is_empty());
        assert_eq!(h.notices()[0].level, NoticeLevel::Error);
        assert!(h.notices()[0].message.starts_with("Error loading image: Unexpected response:"));
    }

    #[test]
    fn test_submit_scenario_increments_and_advances_after_pause() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a1"))), Ok(NextItem::Item(item("a3")))]);
        let session = h.session();
        block_on(session.load_next());

        let outcome = block_on(session.submit(["age"], ""));
        assert_eq!(outcome, DecisionOutcome::Recorded("a1".into()));
        assert_eq!(session.tagged_count(), 1);
        assert_eq!(
            h.sink_calls(),
            vec![SinkCall::Decision(Decision::tag("a1", ["age"], ""))]
        );
        assert_eq!(h.notices(), vec![Notice::success(SUBMIT_SUCCESS_MESSAGE)]);
        assert_eq!(*h.pacer.pauses.borrow(), vec![DEFAULT_PACING_DELAY]);
        // 待ち終わってから次を取得する
        assert_eq!(*h.pacer.fetches_at_pause.borrow(), vec![1]);
        assert_eq!(h.source.calls.get(), 2);
        assert_eq!(session.current_item().unwrap().id, "a3");
    }

    #[test]
    fn test_submit_acknowledges_before_advancing() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a1"))), Ok(NextItem::Item(item("a3")))]);
        let session = h.session();
        block_on(session.load_next());
        h.presenter.views.borrow_mut().clear();

        block_on(session.submit(["gender"], "note"));

        let views = h.presenter.views.borrow();
        let counted = views.iter().position(|v| v.tagged_count == 1).unwrap();
        let loading = views.iter().position(|v| v.state == SessionState::Loading).unwrap();
        assert!(counted < loading);
        // 間を取っている間も入力は無効
        assert_eq!(views[counted].state, SessionState::Submitting(DecisionKind::Tag));
    }

    #[test]
    fn test_submit_empty_tags_is_rejected_without_sink_call() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a1")))]);
        let session = h.session();
        block_on(session.load_next());

        let empty: [&str; 0] = [];
        assert_eq!(block_on(session.submit(empty, "")), DecisionOutcome::Rejected);
        assert_eq!(block_on(session.submit(["  ", ""], "")), DecisionOutcome::Rejected);

        assert!(h.sink_calls().is_empty());
        assert_eq!(session.tagged_count(), 0);
        assert_eq!(session.state(), SessionState::AwaitingDecision);
        assert_eq!(session.current_item().unwrap().id, "a1");
        assert_eq!(h.notices()[0], Notice::error(VALIDATION_MESSAGE));
    }

    #[test]
    fn test_submit_failure_keeps_item_for_retry() {
        let h = Harness::with_sink(vec![Ok(NextItem::Item(item("a1")))], FakeSink::failing());
        let session = h.session();
        block_on(session.load_next());

        let outcome = block_on(session.submit(["age"], ""));
        assert!(matches!(outcome, DecisionOutcome::Failed(_)));
        assert_eq!(session.tagged_count(), 0);
        assert_eq!(session.state(), SessionState::AwaitingDecision);
        assert!(session.inputs_enabled());
        assert_eq!(
            h.notices(),
            vec![Notice::error("Error submitting tags: Error submitting some tags")]
        );
        assert!(h.pacer.pauses.borrow().is_empty());
        assert_eq!(h.source.calls.get(), 1);

        // 再送は同じID
        assert_eq!(block_on(session.submit(["age"], "")), DecisionOutcome::Recorded("a1".into()));
        let calls = h.sink_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(session.tagged_count(), 1);
    }

    #[test]
    fn test_skip_scenario_advances_without_pause() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a2"))), Ok(NextItem::Item(item("a4")))]);
        let session = h.session();
        block_on(session.load_next());

        assert_eq!(block_on(session.skip()), DecisionOutcome::Recorded("a2".into()));
        assert_eq!(h.sink_calls(), vec![SinkCall::Skip("a2".into())]);
        assert_eq!(session.tagged_count(), 1);
        assert!(h.pacer.pauses.borrow().is_empty());
        assert_eq!(h.source.calls.get(), 2);
        assert_eq!(session.current_item().unwrap().id, "a4");
        assert!(h.notices().is_empty());
    }

    #[test]
    fn test_skip_failure_does_not_advance() {
        let h = Harness::with_sink(vec![Ok(NextItem::Item(item("a2")))], FakeSink::failing());
        let session = h.session();
        block_on(session.load_next());

        assert!(matches!(block_on(session.skip()), DecisionOutcome::Failed(_)));
        assert_eq!(session.tagged_count(), 0);
        assert_eq!(session.current_item().unwrap().id, "a2");
        assert_eq!(session.state(), SessionState::AwaitingDecision);
        assert_eq!(h.source.calls.get(), 1);
        assert_eq!(h.notices()[0].level, NoticeLevel::Error);
        assert!(h.notices()[0].message.starts_with("Error skipping image:"));
    }

    #[test]
    fn test_count_after_mixed_decisions() {
        let h = Harness::new(vec![
            Ok(NextItem::Item(item("a1"))),
            Ok(NextItem::Item(item("a2"))),
            Ok(NextItem::Item(item("a3"))),
            Ok(NextItem::Exhausted),
        ]);
        let session = h.session();
        block_on(session.load_next());
        block_on(session.submit(["age"], ""));
        block_on(session.skip());
        block_on(session.submit(["race", "class"], "two"));

        assert_eq!(session.tagged_count(), 3);
        assert_eq!(session.state(), SessionState::Exhausted);
        assert!(session.current_item().is_none());
    }

    #[test]
    fn test_submit_before_load_is_ignored() {
        let h = Harness::new(vec![]);
        let session = h.session();
        assert_eq!(block_on(session.submit(["age"], "")), DecisionOutcome::Ignored);
        assert_eq!(block_on(session.skip()), DecisionOutcome::Ignored);
        assert!(h.sink_calls().is_empty());
        assert!(h.notices().is_empty());
    }

    #[test]
    fn test_concurrent_triggers_issue_one_sink_call() {
        let sink = FakeSink::default();
        let (release, gate) = oneshot::channel();
        *sink.gate.borrow_mut() = Some(gate);
        let h = Harness::with_sink(vec![Ok(NextItem::Item(item("a1")))], sink);
        let session = h.session();
        block_on(session.load_next());

        let (first, second, third) = block_on(async {
            futures::join!(
                session.submit(["age"], ""),
                async {
                    let again = session.submit(["age"], "").await;
                    let skipped = session.skip().await;
                    let _ = release.send(());
                    (again, skipped)
                },
                async { session.submit_draft().await },
            )
        });

        assert_eq!(first, DecisionOutcome::Recorded("a1".into()));
        assert_eq!(second, (DecisionOutcome::Ignored, DecisionOutcome::Ignored));
        assert_eq!(third, DecisionOutcome::Ignored);
        assert_eq!(h.sink_calls().len(), 1);
        assert_eq!(session.tagged_count(), 1);
    }

    #[test]
    fn test_draft_submit_uses_selection() {
        let h = Harness::new(vec![Ok(NextItem::Item(item("a1")))]);
        let session = h.session();
        block_on(session.load_next());
        session.toggle_tag("race");
        session.toggle_tag("age");
        session.toggle_tag("race");
        session.set_notes("  older man only ");

        block_on(session.submit_draft());
        assert_eq!(
            h.sink_calls(),
            vec![SinkCall::Decision(Decision {
                image_id: "a1".into(),
                bias_tags: vec!["age".into()],
                notes: Some("older man only".into()),
            })]
        );
    }

    #[test]
    fn test_draft_ignored_when_inputs_disabled() {
        let h = Harness::new(vec![Ok(NextItem::Exhausted)]);
        let session = h.session();
        session.toggle_tag("age");
        session.set_notes("x");
        block_on(session.load_next());
        session.set_selected_tags(["gender"]);
        assert_eq!(session.draft(), DecisionDraft::default());
    }

    #[test]
    fn test_view_inputs_enabled() {
        let mut view = SessionView::default();
        assert!(!view.inputs_enabled());
        view.state = SessionState::AwaitingDecision;
        view.item = Some(item("a1"));
        assert!(view.inputs_enabled());
        view.state = SessionState::Submitting(DecisionKind::Skip);
        assert!(!view.inputs_enabled());
    }
}
