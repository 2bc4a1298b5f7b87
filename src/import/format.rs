//! マニフェスト形式の判定
//!
//! 判定はファイル名の拡張子を優先し、拡張子で決まらない場合のみ内容を見る。
//! 内容の判定は JSON としての厳密なパースに成功するかどうかだけで行い、
//! それ以外はすべて YAML とみなす。

use crate::component::{TemplateType, MANIFEST_EXTENSIONS};
use std::path::Path;

/// ファイル名の拡張子を取得（小文字化済み）
fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// マニフェスト拡張子（.yaml / .yml / .json）を持つファイル名かどうか
pub fn is_manifest_file(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| MANIFEST_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// ファイル名と内容からテンプレート形式を判定する。失敗はしない。
pub fn detect(filename: &str, content: &[u8]) -> TemplateType {
    if let Some(template_type) = extension_of(filename)
        .as_deref()
        .and_then(TemplateType::from_extension)
    {
        return template_type;
    }

    if serde_json::from_slice::<serde_json::Value>(content).is_ok() {
        TemplateType::Json
    } else {
        TemplateType::Yaml
    }
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
