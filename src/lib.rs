//! bias-tagger: AI生成画像のバイアスタグ付けレビュークライアント

pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod review;
