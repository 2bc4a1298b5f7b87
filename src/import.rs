//! インポート機能モジュール
//!
//! ファイル・ディレクトリ・URL からマニフェストを取り込み、
//! 対象アプリケーションのコンポーネントとして登録する。
//!
//! ## 処理の流れ
//!
//! ```text
//! Import::run
//!   └─ SourceResolver::resolve ──▶ ManifestUnit の列（遅延）
//!        └─ ユニットごとに
//!             format::detect ─▶ naming::derive_name ─▶ params::extract
//!                                                       └─▶ ComponentCreator::create
//! ```

pub(crate) mod document;
pub mod format;
pub mod naming;
mod orchestrator;
pub mod params;
pub mod source;

pub use orchestrator::{CreatedComponent, Import, ImportOptions, ImportReport};
