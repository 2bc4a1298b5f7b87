//! テスト用スタブ HTTP クライアント

use super::*;
use std::sync::Mutex;

enum StubReply {
    Response(HttpResponse),
    ConnectionError,
}

/// URL ごとに固定のレスポンスを返すスタブ
pub struct StubHttp {
    replies: Mutex<BTreeMap<String, StubReply>>,
    requests: Mutex<Vec<String>>,
}

impl StubHttp {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(BTreeMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 200 レスポンスを登録
    pub fn serve(&self, url: &str, body: &str, headers: &[(&str, &str)]) {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        self.reply(
            url,
            HttpResponse {
                status: 200,
                headers,
                body: body.as_bytes().to_vec(),
            },
        );
    }

    /// ステータスのみのレスポンスを登録
    pub fn serve_status(&self, url: &str, status: u16) {
        self.reply(
            url,
            HttpResponse {
                status,
                ..HttpResponse::default()
            },
        );
    }

    /// 接続エラーを返す URL を登録
    pub fn refuse(&self, url: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), StubReply::ConnectionError);
    }

    fn reply(&self, url: &str, response: HttpResponse) {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), StubReply::Response(response));
    }

    /// 受け取ったリクエストの URL 一覧
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for StubHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for StubHttp {
    fn get<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(url.to_string());
            match self.replies.lock().unwrap().get(url) {
                Some(StubReply::Response(response)) => Ok(response.clone()),
                Some(StubReply::ConnectionError) => Err(MfiError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
                None => Ok(HttpResponse {
                    status: 404,
                    ..HttpResponse::default()
                }),
            }
        })
    }
}
