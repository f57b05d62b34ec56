use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// サーバーURLを上書きする環境変数
pub const SERVER_ENV_VAR: &str = "BIAS_TAGGER_SERVER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    /// HTTPリクエストのタイムアウト（0で無効）
    pub request_timeout_seconds: u64,
    /// タグ送信後、次の画像を取得するまでの待ち時間
    pub pacing_delay_ms: u64,
    /// `stats --watch` の更新間隔
    pub refresh_interval_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".into(),
            request_timeout_seconds: 30,
            pacing_delay_ms: 500,
            refresh_interval_seconds: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TaggerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("bias-tagger").join("config.json"))
    }

    /// 接続先サーバー（引数 > 環境変数 > 設定ファイル）
    pub fn resolve_server(&self, cli_override: Option<&str>) -> Result<String> {
        let env = std::env::var(SERVER_ENV_VAR).ok();
        let server = cli_override
            .map(str::to_string)
            .or(env.filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| self.server_url.clone());
        validate_server_url(&server)
    }

    pub fn set_server_url(&mut self, url: &str) -> Result<()> {
        self.server_url = validate_server_url(url)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_seconds > 0).then(|| Duration::from_secs(self.request_timeout_seconds))
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds.max(1))
    }
}

/// http(s)://で始まるURLのみ受け付け、末尾の`/`は落とす
pub fn validate_server_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed.split("://").nth(1).is_some_and(|rest| !rest.is_empty());
    if has_scheme && has_host {
        Ok(trimmed.to_string())
    } else {
        Err(TaggerError::InvalidServerUrl(url.to_string()))
    }
}
