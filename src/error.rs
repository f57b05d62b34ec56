use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("サーバーURLが不正です: {0}。`bias-tagger config --set-server http://host:port` で設定してください")]
    InvalidServerUrl(String),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] bias_tagger_common::Error),
}

impl From<dialoguer::Error> for TaggerError {
    fn from(e: dialoguer::Error) -> Self {
        TaggerError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaggerError>;
