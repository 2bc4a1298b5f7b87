//! マニフェスト文書の構造的パース
//!
//! YAML と JSON を同じ `serde_json::Value` 表現に読み込む。

use crate::component::TemplateType;
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;

/// マニフェストをパースする
///
/// YAML の複数ドキュメントは先頭のドキュメントのみを対象にする。
/// 空の YAML は `Value::Null` になる。
pub(crate) fn parse(text: &str, template_type: TemplateType) -> Result<Value> {
    match template_type {
        TemplateType::Json => Ok(serde_json::from_str(text)?),
        TemplateType::Yaml => match serde_yaml::Deserializer::from_str(text).next() {
            Some(doc) => Ok(Value::deserialize(doc)?),
            None => Ok(Value::Null),
        },
    }
}

/// ドット区切りのパスで文字列フィールドを取り出す（空文字列は None）
pub(crate) fn lookup_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
