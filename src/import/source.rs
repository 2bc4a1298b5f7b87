//! インポート元の解決
//!
//! 1つのパス文字列を、その形だけで次の3通りに振り分ける。
//!
//! - `http://` / `https://` の絶対 URL: GET して1ユニット
//! - ローカルディレクトリ: 直下のマニフェストファイルごとに1ユニット
//! - ローカルファイル: 1ユニット
//!
//! 呼び出し側はどの形だったかを意識せず `ManifestUnits` を消費するだけでよい。

use crate::error::{MfiError, Result, SourceError, SourceErrorKind, UnitFailure};
use crate::fs::{FileSystem, FsFileType};
use crate::http::{HttpClient, HttpResponse};
use crate::import::format::is_manifest_file;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::debug;
use url::Url;

/// ファイル名が決められない場合に使う名前
pub const PLACEHOLDER_NAME: &str = "manifest";

/// ユニットの取得元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    LocalFile,
    LocalDirEntry,
}

/// 解決済みの入力1件（形式・名前の決定前）
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestUnit {
    /// ファイル名、Content-Disposition、URL 末尾のいずれかから決めた名前
    pub suggested_name: String,
    pub raw_content: Vec<u8>,
    pub source_kind: SourceKind,
}

/// パス文字列の分類結果
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocation {
    Remote(Url),
    LocalDir(PathBuf),
    LocalFile(PathBuf),
}

/// ManifestUnit の遅延列
///
/// ディレクトリの場合、各ファイルは `next()` が呼ばれた時点で読み込まれる。
/// 個別ファイルの読み込み失敗はそのユニットの失敗として返し、列は継続する。
pub struct ManifestUnits {
    inner: UnitsInner,
}

enum UnitsInner {
    Single(Option<ManifestUnit>),
    Directory {
        fs: Arc<dyn FileSystem>,
        entries: std::vec::IntoIter<(String, PathBuf)>,
    },
}

impl ManifestUnits {
    fn single(unit: ManifestUnit) -> Self {
        Self {
            inner: UnitsInner::Single(Some(unit)),
        }
    }

    /// 残りのユニット数の上限
    pub fn remaining(&self) -> usize {
        match &self.inner {
            UnitsInner::Single(unit) => usize::from(unit.is_some()),
            UnitsInner::Directory { entries, .. } => entries.len(),
        }
    }
}

impl Iterator for ManifestUnits {
    type Item = std::result::Result<ManifestUnit, UnitFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            UnitsInner::Single(unit) => unit.take().map(Ok),
            UnitsInner::Directory { fs, entries } => {
                let (name, path) = entries.next()?;
                let item = fs
                    .read(&path)
                    .map(|raw_content| ManifestUnit {
                        suggested_name: name.clone(),
                        raw_content,
                        source_kind: SourceKind::LocalDirEntry,
                    })
                    .map_err(|e| UnitFailure {
                        source_name: name,
                        cause: source_error(&path.to_string_lossy(), e).into(),
                    });
                Some(item)
            }
        }
    }
}

/// インポート元リゾルバー
pub struct SourceResolver {
    fs: Arc<dyn FileSystem>,
    http: Arc<dyn HttpClient>,
}

impl SourceResolver {
    pub fn new(fs: Arc<dyn FileSystem>, http: Arc<dyn HttpClient>) -> Self {
        Self { fs, http }
    }

    /// パス文字列を分類する
    ///
    /// ローカルパスが存在しない場合は `NotFound`、権限不足などで
    /// 種別を取得できない場合は `Unreadable`。
    pub fn classify(&self, source_path: &str) -> std::result::Result<SourceLocation, SourceError> {
        if let Some(url) = parse_remote_url(source_path) {
            return Ok(SourceLocation::Remote(url));
        }

        let path = PathBuf::from(source_path);
        match self.fs.file_type(&path) {
            Ok(FsFileType::Dir) => Ok(SourceLocation::LocalDir(path)),
            Ok(FsFileType::File) => Ok(SourceLocation::LocalFile(path)),
            Err(e) => Err(source_error(source_path, e)),
        }
    }

    /// パス文字列を ManifestUnit の列に解決する
    pub async fn resolve(&self, source_path: &str) -> Result<ManifestUnits> {
        match self.classify(source_path)? {
            SourceLocation::Remote(url) => self.fetch_remote(url).await,
            SourceLocation::LocalDir(dir) => self.list_directory(&dir),
            SourceLocation::LocalFile(path) => self.read_file(&path),
        }
    }

    async fn fetch_remote(&self, url: Url) -> Result<ManifestUnits> {
        debug!(%url, "fetching remote manifest");

        let response = self.http.get(url.as_str()).await.map_err(|e| {
            SourceError::new(SourceErrorKind::Unreachable, url.as_str(), e.to_string())
        })?;

        if !response.is_success() {
            return Err(SourceError::new(
                SourceErrorKind::Unreachable,
                url.as_str(),
                format!("server returned status {}", response.status),
            )
            .into());
        }

        let suggested_name = remote_file_name(&url, &response);
        debug!(%url, name = %suggested_name, bytes = response.body.len(), "fetched remote manifest");

        Ok(ManifestUnits::single(ManifestUnit {
            suggested_name,
            raw_content: response.body,
            source_kind: SourceKind::Http,
        }))
    }

    fn list_directory(&self, dir: &Path) -> Result<ManifestUnits> {
        let location = dir.to_string_lossy().to_string();
        let entries = self
            .fs
            .read_dir(dir)
            .map_err(|e| source_error(&location, e))?;

        let mut files: Vec<(String, PathBuf)> = entries
            .into_iter()
            .filter(|entry| entry.is_file())
            .filter_map(|entry| entry.file_name().map(|name| (name, entry.path)))
            .filter(|(name, _)| is_manifest_file(name))
            .collect();

        // 列挙順を固定する
        files.sort_by(|a, b| a.0.cmp(&b.0));

        debug!(dir = %location, count = files.len(), "listed manifest files");

        Ok(ManifestUnits {
            inner: UnitsInner::Directory {
                fs: Arc::clone(&self.fs),
                entries: files.into_iter(),
            },
        })
    }

    fn read_file(&self, path: &Path) -> Result<ManifestUnits> {
        let location = path.to_string_lossy().to_string();
        let raw_content = self.fs.read(path).map_err(|e| source_error(&location, e))?;

        let suggested_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

        Ok(ManifestUnits::single(ManifestUnit {
            suggested_name,
            raw_content,
            source_kind: SourceKind::LocalFile,
        }))
    }
}

/// http/https の絶対 URL ならパースして返す
fn parse_remote_url(source_path: &str) -> Option<Url> {
    Url::parse(source_path)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// ファイル I/O のエラーをソースエラーに変換
fn source_error(location: &str, err: MfiError) -> SourceError {
    match err {
        MfiError::Io(io) => SourceError::from_io(location, &io),
        MfiError::Source(source) => source,
        other => SourceError::new(SourceErrorKind::Unreadable, location, other.to_string()),
    }
}

/// リモートのファイル名を決める
///
/// 優先順位: Content-Disposition > URL の最後のパスセグメント > プレースホルダー
fn remote_file_name(url: &Url, response: &HttpResponse) -> String {
    response
        .header("content-disposition")
        .and_then(content_disposition_filename)
        .or_else(|| url_file_name(url))
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
}

/// Content-Disposition ヘッダーから filename パラメータを取り出す
///
/// ディレクトリ部分は取り除き、ベース名だけを返す。
pub fn content_disposition_filename(header: &str) -> Option<String> {
    static FILENAME_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = FILENAME_RE
        .get_or_init(|| Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"([^"]*)"|([^;\s]+))"#).ok())
        .as_ref()?;

    let caps = re.captures(header)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str();
    base_name(value)
}

/// URL の最後の空でないパスセグメント
fn url_file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .and_then(base_name)
}

fn base_name(value: &str) -> Option<String> {
    value
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
