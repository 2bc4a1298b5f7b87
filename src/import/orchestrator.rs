use crate::app::{normalize_module, AppContext, ComponentCreator, FsComponentCreator};
use crate::component::ResolvedComponent;
use crate::config::HttpConfig;
use crate::error::{AggregateError, MfiError, Result, UnitFailure};
use crate::http::{HttpClient, ReqwestClient};
use crate::import::format;
use crate::import::naming;
use crate::import::params;
use crate::import::source::{ManifestUnit, SourceResolver};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// インポートの入力オプション
///
/// `app` は必須。`module` を省略した場合はルートモジュール。
#[derive(Clone, Default)]
pub struct ImportOptions {
    pub app: Option<Arc<dyn AppContext>>,
    pub module: String,
    pub path: String,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, app: Arc<dyn AppContext>) -> Self {
        self.app = Some(app);
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// 作成に成功したコンポーネント
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedComponent {
    pub source_name: String,
    pub component_name: String,
    pub path: PathBuf,
}

/// 1回のインポートの結果
///
/// 中断された場合も、それまでに処理したユニットの結果を保持する。
#[derive(Debug, Default)]
pub struct ImportReport {
    pub created: Vec<CreatedComponent>,
    pub failures: Vec<UnitFailure>,
    pub cancelled: bool,
}

impl ImportReport {
    /// 中断されていれば Cancelled、失敗が1件でもあれば AggregateError にする
    pub fn into_result(self) -> Result<Vec<CreatedComponent>> {
        if self.cancelled {
            Err(MfiError::Cancelled {
                created: self.created.len(),
            })
        } else if self.failures.is_empty() {
            Ok(self.created)
        } else {
            Err(AggregateError::new(self.failures).into())
        }
    }
}

/// インポート処理
pub struct Import {
    app: Arc<dyn AppContext>,
    module: String,
    path: String,
    http: Arc<dyn HttpClient>,
    creator: Arc<dyn ComponentCreator>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Import {
    /// オプションからインポート処理を作る
    ///
    /// `app` がない場合や、モジュール名が不正な場合は I/O を行う前に失敗する。
    pub fn new(options: ImportOptions) -> Result<Self> {
        let app = options
            .app
            .ok_or_else(|| MfiError::Config("app".to_string()))?;

        Ok(Self {
            app,
            module: normalize_module(&options.module)?,
            path: options.path,
            http: Arc::new(ReqwestClient::new(HttpConfig::from_env())),
            creator: Arc::new(FsComponentCreator),
            cancel: None,
        })
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    pub fn with_creator(mut self, creator: Arc<dyn ComponentCreator>) -> Self {
        self.creator = creator;
        self
    }

    /// ユニット間で確認する中断フラグを設定
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// 正規化済みのモジュール名
    pub fn module(&self) -> &str {
        &self.module
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// インポートを実行し、中断または失敗があればエラーを返す
    pub async fn run(&self) -> Result<Vec<CreatedComponent>> {
        self.execute().await?.into_result()
    }

    /// インポートを実行し、ユニットごとの成否をまとめて返す
    ///
    /// ソース解決の失敗だけが `Err` になる。中断は `cancelled` に記録する。
    pub async fn execute(&self) -> Result<ImportReport> {
        let resolver = SourceResolver::new(self.app.fs(), Arc::clone(&self.http));
        let mut units = resolver.resolve(&self.path).await?;

        let mut used: HashSet<String> = self.app.component_names(&self.module)?.into_iter().collect();
        let mut report = ImportReport::default();

        info!(path = %self.path, module = %self.module, units = units.remaining(), "importing manifests");

        // 中断フラグは次のユニットを読み込む前に確認する
        while units.remaining() > 0 {
            if self.is_cancelled() {
                warn!(created = report.created.len(), "import cancelled");
                report.cancelled = true;
                break;
            }
            let Some(item) = units.next() else {
                break;
            };

            let unit = match item {
                Ok(unit) => unit,
                Err(failure) => {
                    warn!(source = %failure.source_name, error = %failure.cause, "manifest could not be read");
                    report.failures.push(failure);
                    continue;
                }
            };

            let source_name = unit.suggested_name.clone();
            match self.import_unit(&unit, &mut used) {
                Ok(created) => {
                    info!(source = %source_name, name = %created.component_name, "component created");
                    report.created.push(created);
                }
                Err(cause) => {
                    warn!(source = %source_name, error = %cause, "manifest import failed");
                    report.failures.push(UnitFailure { source_name, cause });
                }
            }
        }

        Ok(report)
    }

    fn import_unit(&self, unit: &ManifestUnit, used: &mut HashSet<String>) -> Result<CreatedComponent> {
        let template_type = format::detect(&unit.suggested_name, &unit.raw_content);
        debug!(source = %unit.suggested_name, kind = ?unit.source_kind, %template_type, "detected format");

        let component_name = naming::derive_name(unit, template_type, used)?;
        used.insert(component_name.clone());

        let text = params::manifest_text(&unit.suggested_name, &unit.raw_content)?;
        let params = params::extract(&text, template_type);

        let component = ResolvedComponent {
            module_name: self.module.clone(),
            component_name,
            text,
            params,
            template_type,
        };

        let path = self.creator.create(self.app.as_ref(), &component)?;

        Ok(CreatedComponent {
            source_name: unit.suggested_name.clone(),
            component_name: component.component_name,
            path,
        })
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
