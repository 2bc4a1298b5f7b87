//! コンポーネントの共通型
//!
//! インポート結果としてコンポーネントストアに渡される値を定義する。

use std::collections::BTreeMap;
use std::fmt;

/// マニフェストとして扱う拡張子
pub const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// コンポーネントのテンプレート形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateType {
    Yaml,
    Json,
}

impl TemplateType {
    /// 拡張子から判定（大文字小文字を区別しない、先頭のドットは不要）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(TemplateType::Yaml),
            "json" => Some(TemplateType::Json),
            _ => None,
        }
    }

    /// 書き出し時の拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            TemplateType::Yaml => "yaml",
            TemplateType::Json => "json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Yaml => "YAML",
            TemplateType::Json => "JSON",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// コンポーネントパラメータ（キー順を固定するため BTreeMap）
pub type ParamMap = BTreeMap<String, serde_json::Value>;

/// コンポーネント作成コールバックに渡す最終成果物
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedComponent {
    /// 正規化済みモジュール名（ルートは空文字列）
    pub module_name: String,
    pub component_name: String,
    /// マニフェストの内容（バイト列をそのまま文字列化したもの）
    pub text: String,
    pub params: ParamMap,
    pub template_type: TemplateType,
}
