//! HTTP設定とアプリケーションディレクトリの解決

use crate::env::EnvVar;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// タイムアウト秒数を上書きする環境変数
pub const ENV_HTTP_TIMEOUT: &str = "MFI_HTTP_TIMEOUT_SECS";
/// リトライ回数を上書きする環境変数
pub const ENV_HTTP_RETRIES: &str = "MFI_HTTP_RETRIES";
/// アプリケーションディレクトリを指定する環境変数
pub const ENV_APP_DIR: &str = "MFI_APP_DIR";

/// HTTP設定
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// タイムアウト
    pub timeout: Option<Duration>,
    /// User-Agent
    pub user_agent: String,
    /// 最大リトライ回数（初回リクエストを含まない）
    pub max_retries: u32,
    /// リトライ間隔（試行回数に比例して伸びる）
    pub retry_backoff: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            user_agent: "mfi-cli".to_string(),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl HttpConfig {
    /// デフォルト値に環境変数の上書きを適用
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = EnvVar::get_parsed::<u64>(ENV_HTTP_TIMEOUT) {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(retries) = EnvVar::get_parsed::<u32>(ENV_HTTP_RETRIES) {
            config.max_retries = retries;
        }
        config
    }

    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

/// 対象アプリケーションのディレクトリを解決
///
/// 優先順位: 明示的な指定 > MFI_APP_DIR > カレントディレクトリ
pub fn resolve_app_dir(explicit: Option<PathBuf>) -> std::io::Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(dir) = EnvVar::get(ENV_APP_DIR) {
        return Ok(PathBuf::from(dir));
    }
    std::env::current_dir()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
