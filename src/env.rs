/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// 環境変数を取得（空文字列はNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    /// 環境変数を数値として取得（パースできない場合はNone）
    pub fn get_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        Self::get(key).and_then(|v| v.trim().parse().ok())
    }
}
