//! 対象アプリケーションとコンポーネントストア
//!
//! アプリケーションはディレクトリをルートとし、コンポーネントは
//! `<root>/components/` 以下にモジュールごとのディレクトリとして配置される。
//!
//! ```text
//! <root>/components/
//! ├── service-web-1.yaml        # ルートモジュール ("")
//! ├── params.json
//! └── a/
//!     └── b/                    # モジュール "a.b"
//!         └── db.json
//! ```

use crate::component::{ParamMap, ResolvedComponent, TemplateType};
use crate::error::{MfiError, Result};
use crate::fs::FileSystem;
use crate::import::document;
use crate::import::format::is_manifest_file;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// コンポーネントを格納するディレクトリ名
pub const COMPONENTS_DIR: &str = "components";
/// モジュールごとのパラメータファイル名
pub const PARAMS_FILE: &str = "params.json";
/// パラメータファイルと同じ語幹のため、コンポーネント名に使えない名前
pub const RESERVED_NAME: &str = "params";

/// モジュール名を正規化する
///
/// `/`・空文字列・空白のみはルートモジュールとして `""` になる。
/// 前後の `/` は取り除き、それ以外はそのまま通す（`a.b` は `a.b`）。
/// `.` 区切りの各要素は空でなく、パス区切り文字を含まないこと。
pub fn normalize_module(module: &str) -> Result<String> {
    let normalized = module.trim().trim_matches('/');
    if normalized.is_empty() {
        return Ok(String::new());
    }

    let invalid = |reason: &str| MfiError::InvalidModule {
        module: module.to_string(),
        reason: reason.to_string(),
    };
    for part in normalized.split('.') {
        if part.trim().is_empty() {
            return Err(invalid("empty segment"));
        }
        if part.contains(['/', '\\']) {
            return Err(invalid("segments must not contain path separators"));
        }
    }

    Ok(normalized.to_string())
}

/// 既存コンポーネントの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEntry {
    pub name: String,
    pub template_type: TemplateType,
    pub path: PathBuf,
}

/// インポート先アプリケーションの抽象化
pub trait AppContext: Send + Sync {
    /// アプリケーションが使うファイルシステム
    fn fs(&self) -> Arc<dyn FileSystem>;

    /// モジュールのディレクトリ（不正なモジュール名はエラー）
    fn module_dir(&self, module: &str) -> Result<PathBuf>;

    /// モジュール内の既存コンポーネント一覧（名前順）
    fn components(&self, module: &str) -> Result<Vec<ComponentEntry>>;

    /// モジュール内で使用済みのコンポーネント名
    ///
    /// 既存コンポーネントに加え、予約名 `params` を含む。
    fn component_names(&self, module: &str) -> Result<BTreeSet<String>> {
        let mut names: BTreeSet<String> = self
            .components(module)?
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        names.insert(RESERVED_NAME.to_string());
        Ok(names)
    }
}

/// ディレクトリをルートとするアプリケーション
pub struct LocalApp {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl LocalApp {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }
}

impl AppContext for LocalApp {
    fn fs(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    fn module_dir(&self, module: &str) -> Result<PathBuf> {
        let module = normalize_module(module)?;
        Ok(module
            .split('.')
            .filter(|part| !part.is_empty())
            .fold(self.root.join(COMPONENTS_DIR), |dir, part| dir.join(part)))
    }

    fn components(&self, module: &str) -> Result<Vec<ComponentEntry>> {
        let dir = self.module_dir(module)?;
        if !self.fs.is_dir(&dir) {
            return Ok(Vec::new());
        }

        let mut entries: Vec<ComponentEntry> = self
            .fs
            .read_dir(&dir)?
            .into_iter()
            .filter(|entry| entry.is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name()?;
                if file_name == PARAMS_FILE || !is_manifest_file(&file_name) {
                    return None;
                }
                let (stem, ext) = file_name.rsplit_once('.')?;
                Some(ComponentEntry {
                    name: stem.to_string(),
                    template_type: TemplateType::from_extension(ext)?,
                    path: entry.path,
                })
            })
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// コンポーネント作成先（シンク）
pub trait ComponentCreator: Send + Sync {
    /// コンポーネントを作成し、作成したパスを返す
    ///
    /// 既存コンポーネントとの名前衝突や不正な内容は `MfiError::Creation`。
    fn create(&self, app: &dyn AppContext, component: &ResolvedComponent) -> Result<PathBuf>;
}

/// ファイルとして書き出すコンポーネント作成先
#[derive(Debug, Default, Clone, Copy)]
pub struct FsComponentCreator;

impl FsComponentCreator {
    fn write_params(
        &self,
        fs: &dyn FileSystem,
        dir: &Path,
        name: &str,
        params: &ParamMap,
    ) -> Result<()> {
        let path = dir.join(PARAMS_FILE);
        let mut all: BTreeMap<String, ParamMap> = if fs.exists(&path) {
            serde_json::from_str(&fs.read_to_string(&path)?).map_err(|e| {
                MfiError::Creation(format!("{} is not valid: {}", path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };

        all.insert(name.to_string(), params.clone());
        let mut content = serde_json::to_string_pretty(&all)?;
        content.push('\n');
        fs.write(&path, content.as_bytes())
    }
}

impl ComponentCreator for FsComponentCreator {
    fn create(&self, app: &dyn AppContext, component: &ResolvedComponent) -> Result<PathBuf> {
        let fs = app.fs();
        let module = &component.module_name;
        let name = &component.component_name;

        if name == RESERVED_NAME {
            return Err(MfiError::Creation(format!(
                "'{}' is reserved for {} in module '{}'",
                name, PARAMS_FILE, module
            )));
        }

        if app.component_names(module)?.contains(name) {
            return Err(MfiError::Creation(format!(
                "component '{}' already exists in module '{}'",
                name, module
            )));
        }

        if let Err(e) = document::parse(&component.text, component.template_type) {
            return Err(MfiError::Creation(format!(
                "'{}' is not valid {}: {}",
                name, component.template_type, e
            )));
        }

        let dir = app.module_dir(module)?;
        fs.create_dir_all(&dir)?;

        let path = dir.join(format!("{}.{}", name, component.template_type.extension()));
        fs.write(&path, component.text.as_bytes())?;

        if !component.params.is_empty() {
            self.write_params(fs.as_ref(), &dir, name, &component.params)?;
        }

        debug!(path = %path.display(), "component written");
        Ok(path)
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
