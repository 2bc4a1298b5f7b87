//! コンポーネント名の決定
//!
//! ## 規則
//!
//! 1. マニフェスト内の名前（`metadata.name`、なければトップレベルの `name`）が
//!    あれば `service-<name>` を語幹とし、常に `-<n>` を付ける（n は 1 から）。
//! 2. 名前がなければ提案ファイル名から拡張子を除いたものを語幹とする。
//!    未使用ならそのまま、使用済みなら `-<n>` を付ける。
//! 3. `-<n>` は使用済み名前集合にない最小の n を選ぶ。同じ入力からは常に同じ名前になる。
//!
//! 名前に使えない文字は `-` に置き換える。

use crate::component::TemplateType;
use crate::error::{MfiError, Result};
use crate::import::document;
use crate::import::source::ManifestUnit;
use std::collections::HashSet;
use tracing::debug;

/// マニフェスト由来の名前に付ける接頭辞
pub const SERVICE_PREFIX: &str = "service";

/// マニフェストの内容から名前フィールドを探す
pub fn manifest_name(text: &str, template_type: TemplateType) -> Option<String> {
    let value = document::parse(text, template_type).ok()?;
    document::lookup_str(&value, &["metadata", "name"])
        .or_else(|| document::lookup_str(&value, &["name"]))
        .map(sanitize)
        .filter(|name| !name.is_empty())
}

/// ファイル名から拡張子を除いた語幹
pub fn filename_stem(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains(['/', '\\']) => stem,
        _ => filename,
    };
    sanitize(stem)
}

/// 名前に使えない文字を `-` に置き換え、連続・前後の `-` を除く
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' };
        if c == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// 使用済みでない最小の `<stem>-<n>` を返す
fn numbered(stem: &str, used: &HashSet<String>) -> String {
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{stem}-{n}");
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// ManifestUnit のコンポーネント名を決める
///
/// 内容から名前が得られず、ファイル名からも語幹が作れない場合のみ失敗する。
pub fn derive_name(
    unit: &ManifestUnit,
    template_type: TemplateType,
    used: &HashSet<String>,
) -> Result<String> {
    let from_content = std::str::from_utf8(&unit.raw_content)
        .ok()
        .and_then(|text| manifest_name(text, template_type));

    if let Some(name) = from_content {
        let derived = numbered(&format!("{SERVICE_PREFIX}-{name}"), used);
        debug!(source = %unit.suggested_name, name = %derived, "derived name from manifest");
        return Ok(derived);
    }

    let stem = filename_stem(&unit.suggested_name);
    if stem.is_empty() {
        return Err(MfiError::Format(format!(
            "{}: manifest has no name field and the file name is not usable",
            unit.suggested_name
        )));
    }

    let derived = if used.contains(&stem) {
        numbered(&stem, used)
    } else {
        stem
    };
    debug!(source = %unit.suggested_name, name = %derived, "derived name from file name");
    Ok(derived)
}

#[cfg(test)]
#[path = "naming_test.rs"]
mod tests;
