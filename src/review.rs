//! 対話式レビューモジュール
//!
//! ターミナルで1枚ずつ画像を表示し、バイアスカテゴリを選んで送信する。
//! 状態遷移は ReviewSession が持ち、ここは入力と表示だけを担当する。

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use bias_tagger_common::{
    Notice, NoticeLevel, Pacer, Presenter, ReviewItem, ReviewSession, SessionConfig, SessionState,
    SessionView, BIAS_CATEGORIES,
};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// tokioのsleepで間を取る
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// ターミナル表示
pub struct TerminalPresenter {
    spinner: RefCell<Option<ProgressBar>>,
    last_count: Cell<u64>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            spinner: RefCell::new(None),
            last_count: Cell::new(0),
        }
    }

    fn start_spinner(&self, message: &'static str) {
        let mut spinner = self.spinner.borrow_mut();
        if spinner.is_some() {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        *spinner = Some(pb);
    }

    fn stop_spinner(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for TerminalPresenter {
    fn notify(&self, notice: Notice) {
        self.stop_spinner();
        match notice.level {
            NoticeLevel::Success => println!("✔ {}", notice.message),
            NoticeLevel::Error => eprintln!("✖ {}", notice.message),
        }
    }

    fn render(&self, view: &SessionView) {
        match view.state {
            SessionState::Loading => self.start_spinner("Loading next image..."),
            SessionState::Submitting(_) => self.start_spinner("Submitting..."),
            _ => self.stop_spinner(),
        }

        if view.tagged_count != self.last_count.replace(view.tagged_count) {
            self.stop_spinner();
            println!("Images tagged this session: {}", view.tagged_count);
        }
    }
}

pub type TerminalSession = ReviewSession<ApiClient, ApiClient, TokioPacer, TerminalPresenter>;

pub fn build_session(client: ApiClient, config: &Config) -> TerminalSession {
    ReviewSession::new(
        client.clone(),
        client,
        TokioPacer,
        TerminalPresenter::new(),
        SessionConfig {
            pacing_delay: config.pacing_delay(),
        },
    )
}

/// オペレーターの操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Tag,
    NoBias,
    Quit,
}

const ACTIONS: &[(ReviewAction, &str)] = &[
    (ReviewAction::Tag, "Tag bias categories"),
    (ReviewAction::NoBias, "No Bias - Next Image"),
    (ReviewAction::Quit, "Quit"),
];

/// レビュー結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSummary {
    pub tagged: u64,
    pub exhausted: bool,
}

/// 対話式レビューを実行
pub async fn run_review(client: ApiClient, config: &Config, limit: Option<u64>) -> Result<ReviewSummary> {
    let media_base = client.clone();
    let session = build_session(client, config);

    println!("Server: {}", media_base.base_url());
    println!("---");
    session.load_next().await;

    let mut shown: Option<String> = None;
    loop {
        if limit.is_some_and(|n| session.tagged_count() >= n) {
            println!("\nReached the limit of {} decisions.", session.tagged_count());
            break;
        }

        match session.state() {
            SessionState::AwaitingDecision => {
                let Some(item) = session.current_item() else { break };
                if shown.as_deref() != Some(item.id.as_str()) {
                    print_item(&item, &media_base.absolute_media_url(&item.media_url));
                    shown = Some(item.id.clone());
                }

                match prompt_action()? {
                    ReviewAction::Tag => {
                        let tags = prompt_bias_tags()?;
                        let notes = prompt_notes()?;
                        session.submit(&tags, &notes).await;
                    }
                    ReviewAction::NoBias => {
                        session.skip().await;
                    }
                    ReviewAction::Quit => break,
                }
            }
            SessionState::Exhausted => {
                println!("\n🎉 No more images to review. Thanks for tagging!");
                break;
            }
            SessionState::LoadFailed => {
                let retry = Confirm::new()
                    .with_prompt("Retry loading the next image?")
                    .default(true)
                    .interact()?;
                if !retry {
                    break;
                }
                session.load_next().await;
            }
            SessionState::Idle | SessionState::Loading | SessionState::Submitting(_) => {
                // 逐次実行なのでここには来ない
                break;
            }
        }
    }

    session.presenter().stop_spinner();
    Ok(ReviewSummary {
        tagged: session.tagged_count(),
        exhausted: session.state() == SessionState::Exhausted,
    })
}

fn print_item(item: &ReviewItem, media_url: &str) {
    println!();
    println!("🖼  {}", item.id);
    println!("  Image:  {}", media_url);
    println!("  Prompt: {}", item.prompt_or_default());
    println!("  Tags:   {}", item.tags_label());
    println!();
}

fn prompt_action() -> Result<ReviewAction> {
    let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();
    let index = Select::new()
        .with_prompt("Decision")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(ACTIONS[index].0)
}

fn prompt_bias_tags() -> Result<Vec<String>> {
    let labels: Vec<&str> = BIAS_CATEGORIES.iter().map(|(_, label)| *label).collect();
    let picked = MultiSelect::new()
        .with_prompt("Bias categories (space to select, enter to confirm)")
        .items(&labels)
        .interact()?;
    Ok(selected_values(&picked))
}

fn prompt_notes() -> Result<String> {
    let notes: String = Input::new()
        .with_prompt("Notes (optional)")
        .allow_empty(true)
        .interact_text()?;
    Ok(notes)
}

/// MultiSelectのインデックスを送信値に変換
pub fn selected_values(indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .filter_map(|&i| BIAS_CATEGORIES.get(i))
        .map(|(value, _)| value.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_values() {
        assert_eq!(selected_values(&[0, 2]), vec!["age", "race"]);
        assert!(selected_values(&[]).is_empty());
        assert_eq!(selected_values(&[99, 1]), vec!["gender"]);
    }

    #[test]
    fn test_actions_cover_all() {
        let actions: Vec<_> = ACTIONS.iter().map(|(a, _)| *a).collect();
        assert_eq!(actions, vec![ReviewAction::Tag, ReviewAction::NoBias, ReviewAction::Quit]);
    }

    #[test]
    fn test_presenter_counts_once() {
        let presenter = TerminalPresenter::new();
        let mut view = SessionView::default();
        presenter.render(&view);
        view.tagged_count = 1;
        presenter.render(&view);
        assert_eq!(presenter.last_count.get(), 1);
    }
}
