//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 通信そのものの失敗（接続不可・タイムアウトなど）
    #[error("{0}")]
    Transport(String),

    /// サーバーがエラーステータスを返した
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 想定外のレスポンス形式
    #[error("Unexpected response: {0}")]
    Protocol(String),

    /// キューが空（エラーではなく終端シグナル）
    #[error("No more images available")]
    Exhausted,
}

impl Error {
    /// キュー枯渇シグナルかどうか
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Error::Exhausted)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
