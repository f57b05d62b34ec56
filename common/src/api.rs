//! タグ付けサーバーのHTTP API定義（CLI/WASM共通）
//!
//! エンドポイントのパス、リクエストボディ、レスポンスの解釈を扱う。
//! 通信そのものは各クライアント（reqwest / gloo）が行う。

use crate::error::{Error, Result};
use crate::session::NextItem;
use crate::types::{Decision, ReviewItem};
use serde::{Deserialize, Serialize};

pub const NEXT_IMAGE_PATH: &str = "/api/next-image";
pub const SUBMIT_TAGS_PATH: &str = "/api/submit-tags";
pub const SKIP_IMAGE_PATH: &str = "/api/skip-image";
pub const STATISTICS_PATH: &str = "/api/statistics";
pub const LOAD_MOCK_DATA_PATH: &str = "/api/load-mock-data";

/// 旧サーバーがキュー枯渇時に返すエラーメッセージの一部
const EXHAUSTED_MESSAGE: &str = "No more images";

/// ベースURLとパスを結合
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// `GET /api/next-image` のレスポンス
#[derive(Debug, Deserialize)]
struct NextImageResponse {
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    image: Option<ReviewItem>,
}

/// エラーレスポンスのボディ
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// 送信系レスポンスのボディ
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    pub count: Option<u64>,
}

/// `POST /api/submit-tags` のリクエスト
#[derive(Debug, Serialize)]
pub struct SubmitTagsRequest<'a> {
    pub image_id: &'a str,
    pub bias_tags: &'a [String],
    pub notes: &'a str,
}

impl<'a> From<&'a Decision> for SubmitTagsRequest<'a> {
    fn from(decision: &'a Decision) -> Self {
        Self {
            image_id: &decision.image_id,
            bias_tags: &decision.bias_tags,
            notes: decision.notes.as_deref().unwrap_or(""),
        }
    }
}

/// `POST /api/skip-image` のリクエスト
#[derive(Debug, Serialize)]
pub struct SkipImageRequest<'a> {
    pub image_id: &'a str,
}

/// 次の画像レスポンスを解釈
///
/// `has_more: false` はステータスに関係なく枯渇扱い。
/// 旧サーバー互換として、エラーメッセージに "No more images" を含む
/// 失敗レスポンスも枯渇扱いにする（文字列判定はここだけに閉じ込める）。
pub fn interpret_next_response(status: u16, body: &str) -> Result<NextItem> {
    let success = (200..300).contains(&status);

    let invalid = match serde_json::from_str::<NextImageResponse>(body) {
        Ok(NextImageResponse { has_more: true, image: Some(item) }) if success => {
            return Ok(NextItem::Item(item));
        }
        Ok(NextImageResponse { has_more: false, .. }) if success || body_has_flag(body) => {
            return Ok(NextItem::Exhausted);
        }
        Ok(_) => None,
        Err(e) => Some(e),
    };

    if !success {
        let message = error_message(status, body);
        if message.contains(EXHAUSTED_MESSAGE) {
            return Ok(NextItem::Exhausted);
        }
        return Err(Error::Server { status, message });
    }

    match invalid {
        Some(e) => Err(Error::Protocol(format!("invalid next-image response: {}", e))),
        None => Err(Error::Protocol(format!(
            "next-image response without an image: {}",
            truncate_body(body)
        ))),
    }
}

/// 送信系レスポンスを解釈
pub fn interpret_action_response(status: u16, body: &str) -> Result<ActionResponse> {
    if !(200..300).contains(&status) {
        return Err(Error::Server {
            status,
            message: error_message(status, body),
        });
    }

    let response: ActionResponse = serde_json::from_str(body).unwrap_or_default();
    Ok(response)
}

/// エラーボディからメッセージを取り出す
pub fn error_message(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .or(parsed.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// `has_more` が明示されているか（欠落時のデフォルトfalseと区別する）
fn body_has_flag(body: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("has_more").cloned())
        .is_some()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 120;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    }
}
