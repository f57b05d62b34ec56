//! Bias Tagger Common Library
//!
//! CLIとWeb(WASM)で共有される型・レビューセッション・API定義

pub mod api;
pub mod bias;
pub mod dashboard;
pub mod error;
pub mod session;
pub mod types;

pub use bias::{display_name, BIAS_CATEGORIES};
pub use error::{Error, Result};
pub use session::{
    DecisionDraft, DecisionOutcome, ImageSource, LoadOutcome, NextItem, NoPause, Notice,
    NoticeLevel, Pacer, Presenter, ReviewSession, SessionConfig, SessionState, SessionView,
    TagSink,
};
pub use types::{Decision, DecisionKind, ReviewItem, Statistics};
