//! 共通HTTPヘルパー
//!
//! リモートのマニフェストを取得するための HTTP クライアント抽象化。
//! テスト時はスタブ実装を注入できる。

use crate::config::HttpConfig;
use crate::error::{MfiError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::collections::BTreeMap;
use std::future::Future;
use std::io::IsTerminal;
use std::pin::Pin;
use tracing::{debug, warn};

/// HTTP レスポンス
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// ヘッダー（名前は小文字に正規化）
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// ヘッダーを大文字小文字を区別せずに取得
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// 2xx かどうか
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP クライアント trait
pub trait HttpClient: Send + Sync {
    /// URL に GET リクエストを送る
    ///
    /// 非2xx のステータスはエラーにせず、そのまま `HttpResponse` として返す。
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>>;
}

/// reqwest ベースの HTTP クライアント
pub struct ReqwestClient {
    client: Client,
    config: HttpConfig,
}

impl ReqwestClient {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            client: config.build_client(),
            config,
        }
    }

    async fn get_once(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        if !response.status().is_success() {
            // エラー時のボディは読み捨てる
            return Ok(HttpResponse {
                status,
                headers,
                body: Vec::new(),
            });
        }

        let pb = progress_bar(response.content_length());
        let bytes = response.bytes().await?;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(HttpResponse {
            status,
            headers,
            body: bytes.to_vec(),
        })
    }
}

impl HttpClient for ReqwestClient {
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        Box::pin(async move {
            let mut attempt: u32 = 0;
            loop {
                let outcome = match self.get_once(url).await {
                    Ok(response) if is_retriable_status(response.status) => Err(MfiError::HttpStatus {
                        url: url.to_string(),
                        status: response.status,
                    }),
                    other => other,
                };

                match outcome {
                    Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                        attempt += 1;
                        warn!(url, attempt, error = %e, "retrying HTTP request");
                        tokio::time::sleep(self.config.retry_backoff * attempt).await;
                    }
                    Err(MfiError::HttpStatus { status, .. }) => {
                        debug!(url, status, "giving up after retries");
                        return Ok(HttpResponse {
                            status,
                            ..HttpResponse::default()
                        });
                    }
                    other => return other,
                }
            }
        })
    }
}

/// リトライ対象のステータスかどうか
pub fn is_retriable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// 端末に接続されている場合のみプログレスバーを作成
fn progress_bar(total_size: Option<u64>) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }

    let pb = match total_size {
        Some(total) if total > 0 => {
            let pb = ProgressBar::new(total);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        }
        _ => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} Downloading...") {
                pb.set_style(style);
            }
            pb
        }
    };

    Some(pb)
}

#[cfg(test)]
pub mod stub;

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
