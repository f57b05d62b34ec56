//! タグ付けサーバーのHTTPクライアント
//!
//! reqwestでAPIを呼び出し、レスポンスの解釈は bias_tagger_common::api に任せる。
//! サーバーはCookieセッションでレビュアーを識別するため、Cookieストアを有効にする。

use crate::config::Config;
use crate::error::Result;
use bias_tagger_common::api::{
    self, ActionResponse, SkipImageRequest, SubmitTagsRequest, LOAD_MOCK_DATA_PATH,
    NEXT_IMAGE_PATH, SKIP_IMAGE_PATH, STATISTICS_PATH, SUBMIT_TAGS_PATH,
};
use bias_tagger_common::{Decision, Error as CommonError, ImageSource, NextItem, Statistics, TagSink};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(concat!("bias-tagger/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 画像URLを絶対URLに変換（相対パスならサーバー基準）
    pub fn absolute_media_url(&self, media_url: &str) -> String {
        if media_url.starts_with("http://") || media_url.starts_with("https://") || media_url.is_empty() {
            media_url.to_string()
        } else {
            api::endpoint(&self.base_url, &format!("/{}", media_url.trim_start_matches('/')))
        }
    }

    pub async fn next_image(&self) -> bias_tagger_common::Result<NextItem> {
        let (status, body) = self.get(NEXT_IMAGE_PATH).await?;
        api::interpret_next_response(status, &body)
    }

    pub async fn submit_tags(&self, decision: &Decision) -> bias_tagger_common::Result<ActionResponse> {
        let (status, body) = self.post(SUBMIT_TAGS_PATH, &SubmitTagsRequest::from(decision)).await?;
        api::interpret_action_response(status, &body)
    }

    pub async fn skip_image(&self, image_id: &str) -> bias_tagger_common::Result<ActionResponse> {
        let (status, body) = self.post(SKIP_IMAGE_PATH, &SkipImageRequest { image_id }).await?;
        api::interpret_action_response(status, &body)
    }

    pub async fn statistics(&self) -> bias_tagger_common::Result<Statistics> {
        let (status, body) = self.get(STATISTICS_PATH).await?;
        if !(200..300).contains(&status) {
            return Err(CommonError::Server { status, message: api::error_message(status, &body) });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// サーバーにモックデータを読み込ませる
    pub async fn load_mock_data(&self) -> bias_tagger_common::Result<ActionResponse> {
        let (status, body) = self.post(LOAD_MOCK_DATA_PATH, &serde_json::json!({})).await?;
        let response = api::interpret_action_response(status, &body)?;
        if !response.success {
            return Err(CommonError::Server { status, message: response.message });
        }
        Ok(response)
    }

    async fn get(&self, path: &str) -> bias_tagger_common::Result<(u16, String)> {
        let url = api::endpoint(&self.base_url, path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await.map_err(transport)?;
        read_body(response).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> bias_tagger_common::Result<(u16, String)> {
        let url = api::endpoint(&self.base_url, path);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await.map_err(transport)?;
        read_body(response).await
    }
}

async fn read_body(response: reqwest::Response) -> bias_tagger_common::Result<(u16, String)> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(transport)?;
    debug!(status, bytes = body.len(), "response");
    Ok((status, body))
}

fn transport(e: reqwest::Error) -> CommonError {
    if e.is_timeout() {
        CommonError::Transport(format!("request timed out: {}", e))
    } else {
        CommonError::Transport(e.to_string())
    }
}

impl ImageSource for ApiClient {
    async fn next(&self) -> bias_tagger_common::Result<NextItem> {
        self.next_image().await
    }
}

impl TagSink for ApiClient {
    async fn record_decision(&self, decision: &Decision) -> bias_tagger_common::Result<()> {
        self.submit_tags(decision).await.map(|_| ())
    }

    async fn record_skip(&self, image_id: &str) -> bias_tagger_common::Result<()> {
        self.skip_image(image_id).await.map(|_| ())
    }
}
