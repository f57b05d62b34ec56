//! fetch によるタグ付けサーバー呼び出し
//!
//! 同一オリジンで配信されるため、ベースURLは空（相対パス）が既定。
//! Cookieセッションはブラウザがそのまま送る。

use bias_tagger_common::api::{
    self, ActionResponse, SkipImageRequest, SubmitTagsRequest, NEXT_IMAGE_PATH, SKIP_IMAGE_PATH,
    STATISTICS_PATH, SUBMIT_TAGS_PATH,
};
use bias_tagger_common::{Decision, Error, ImageSource, NextItem, Result, Statistics, TagSink};
use gloo::net::http::{Request, Response};

#[derive(Debug, Clone, Default)]
pub struct BrowserApi {
    base_url: String,
}

impl BrowserApi {
    /// ページと同じオリジンのサーバー
    pub fn same_origin() -> Self {
        Self::default()
    }

    fn url(&self, path: &str) -> String {
        api::endpoint(&self.base_url, path)
    }

    pub async fn next_image(&self) -> Result<NextItem> {
        let (status, body) = read(Request::get(&self.url(NEXT_IMAGE_PATH)).send().await).await?;
        api::interpret_next_response(status, &body)
    }

    pub async fn submit_tags(&self, decision: &Decision) -> Result<ActionResponse> {
        let request = Request::post(&self.url(SUBMIT_TAGS_PATH))
            .json(&SubmitTagsRequest::from(decision))
            .map_err(transport)?;
        let (status, body) = read(request.send().await).await?;
        api::interpret_action_response(status, &body)
    }

    pub async fn skip_image(&self, image_id: &str) -> Result<ActionResponse> {
        let request = Request::post(&self.url(SKIP_IMAGE_PATH))
            .json(&SkipImageRequest { image_id })
            .map_err(transport)?;
        let (status, body) = read(request.send().await).await?;
        api::interpret_action_response(status, &body)
    }

    pub async fn statistics(&self) -> Result<Statistics> {
        let (status, body) = read(Request::get(&self.url(STATISTICS_PATH)).send().await).await?;
        if !(200..300).contains(&status) {
            return Err(Error::Server { status, message: api::error_message(status, &body) });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

async fn read(sent: std::result::Result<Response, gloo::net::Error>) -> Result<(u16, String)> {
    let response = sent.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    Ok((status, body))
}

fn transport(e: gloo::net::Error) -> Error {
    Error::Transport(e.to_string())
}

impl ImageSource for BrowserApi {
    async fn next(&self) -> Result<NextItem> {
        self.next_image().await
    }
}

impl TagSink for BrowserApi {
    async fn record_decision(&self, decision: &Decision) -> Result<()> {
        self.submit_tags(decision).await.map(|_| ())
    }

    async fn record_skip(&self, image_id: &str) -> Result<()> {
        self.skip_image(image_id).await.map(|_| ())
    }
}
