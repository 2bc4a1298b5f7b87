pub mod code;
pub mod formatter;

use std::fmt;
use thiserror::Error;

pub use code::ErrorCode;

/// ソース解決失敗の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// ファイル/ディレクトリが存在しない
    NotFound,
    /// HTTP 取得に失敗（トランスポートエラーまたは非2xx）
    Unreachable,
    /// 存在するが読み込めない（権限など）
    Unreadable,
}

impl SourceErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceErrorKind::NotFound => "not found",
            SourceErrorKind::Unreachable => "unreachable",
            SourceErrorKind::Unreadable => "unreadable",
        }
    }
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ソース解決エラー
#[derive(Debug, Error)]
#[error("{location} is {kind}: {message}")]
pub struct SourceError {
    pub kind: SourceErrorKind,
    /// パスまたは URL
    pub location: String,
    pub message: String,
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            message: message.into(),
        }
    }

    /// I/O エラーを種別付きのソースエラーに変換
    ///
    /// `NotFound` 以外はすべて `Unreadable` として扱う。
    pub fn from_io(location: impl Into<String>, err: &std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            _ => SourceErrorKind::Unreadable,
        };
        Self::new(kind, location, err.to_string())
    }
}

/// マニフェスト単位の失敗
#[derive(Debug)]
pub struct UnitFailure {
    /// 失敗したユニットのソース名（ファイル名など）
    pub source_name: String,
    pub cause: MfiError,
}

/// バッチ内の複数の失敗をまとめたエラー
#[derive(Debug)]
pub struct AggregateError {
    failures: Vec<UnitFailure>,
}

impl AggregateError {
    pub fn new(failures: Vec<UnitFailure>) -> Self {
        Self { failures }
    }

    pub fn failures(&self) -> &[UnitFailure] {
        &self.failures
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} manifest(s) failed to import", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  {}: {}", failure.source_name, failure.cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// MFI統一エラー型
#[derive(Debug, Error)]
pub enum MfiError {
    #[error("Missing required option: {0}")]
    Config(String),

    #[error("Invalid module '{module}': {reason}")]
    InvalidModule { module: String, reason: String },

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Invalid manifest format: {0}")]
    Format(String),

    #[error("Component creation failed: {0}")]
    Creation(String),

    #[error("{0}")]
    Aggregate(#[from] AggregateError),

    #[error("Import cancelled after {created} component(s) were created")]
    Cancelled { created: usize },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, MfiError>;

impl MfiError {
    /// リトライ可能なエラーかどうか
    pub fn is_retryable(&self) -> bool {
        match self {
            MfiError::Network(_) => true,
            MfiError::HttpStatus { status, .. } => {
                // 429 と 5xx はリトライ可能
                *status == 429 || (*status >= 500 && *status < 600)
            }
            _ => false,
        }
    }

    /// エラーコードを返す
    pub fn code(&self) -> ErrorCode {
        match self {
            MfiError::Config(_) => ErrorCode::Cfg001,
            MfiError::InvalidModule { .. } => ErrorCode::Cfg002,
            MfiError::Source(e) => match e.kind {
                SourceErrorKind::NotFound => ErrorCode::Src001,
                SourceErrorKind::Unreachable => ErrorCode::Src002,
                SourceErrorKind::Unreadable => ErrorCode::Src003,
            },
            MfiError::Format(_) | MfiError::Json(_) | MfiError::Yaml(_) => ErrorCode::Fmt001,
            MfiError::Creation(_) => ErrorCode::Crt001,
            MfiError::Aggregate(_) => ErrorCode::Imp001,
            MfiError::Cancelled { .. } => ErrorCode::Imp002,
            MfiError::Network(_) | MfiError::HttpStatus { .. } => ErrorCode::Net001,
            MfiError::Io(_) => ErrorCode::Io001,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
