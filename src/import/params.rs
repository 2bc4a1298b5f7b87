//! マニフェストからのパラメータ抽出
//!
//! マニフェストのトップレベルに `params` マッピングがあれば、その内容を
//! コンポーネントパラメータとして取り出す。通常のリソースマニフェストには
//! `params` がないため、空のマップになる。

use crate::component::{ParamMap, TemplateType};
use crate::error::{MfiError, Result};
use crate::import::document;
use serde_json::Value;

/// パラメータを保持するトップレベルのキー
pub const PARAMS_KEY: &str = "params";

/// マニフェストの生バイト列をテキストとして取り出す
///
/// コンポーネントはテキストとして保存されるため、UTF-8 でない内容は形式エラー。
pub fn manifest_text(source_name: &str, raw: &[u8]) -> Result<String> {
    String::from_utf8(raw.to_vec()).map_err(|e| {
        MfiError::Format(format!("{}: content is not valid UTF-8 ({})", source_name, e))
    })
}

/// パラメータを抽出する。パースできない内容は空のマップとして扱う。
pub fn extract(text: &str, template_type: TemplateType) -> ParamMap {
    let Ok(value) = document::parse(text, template_type) else {
        return ParamMap::new();
    };

    match value.get(PARAMS_KEY) {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        _ => ParamMap::new(),
    }
}
