//! mfi import コマンド
//!
//! ファイル・ディレクトリ・URL のマニフェストを、対象アプリケーションの
//! モジュールにコンポーネントとして取り込む。

use crate::app::LocalApp;
use crate::config::resolve_app_dir;
use crate::error::Result;
use crate::fs::RealFs;
use crate::import::{Import, ImportOptions, ImportReport};
use crate::output::{created_line, failure_line, CommandSummary};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(after_help = "SOURCE FORMATS:\n  \
    https://host/path/app.yaml   Download a single manifest\n  \
    ./service.json               Import a single file\n  \
    ./manifests/                 Import every .yaml/.yml/.json file in a directory")]
pub struct Args {
    /// Manifest file, directory or HTTP(S) URL
    pub path: String,

    /// Target module ("/" for the root module, "a.b" for nested modules)
    #[arg(long, short, default_value = "/")]
    pub module: String,

    /// Application directory (defaults to MFI_APP_DIR or the current directory)
    #[arg(long, value_name = "DIR")]
    pub app_dir: Option<PathBuf>,
}

pub async fn run(args: Args) -> Result<()> {
    let app_dir = resolve_app_dir(args.app_dir)?;
    debug!(app_dir = %app_dir.display(), "resolved application directory");
    let app = Arc::new(LocalApp::new(app_dir, Arc::new(RealFs)));

    let cancel = Arc::new(AtomicBool::new(false));
    watch_ctrl_c(Arc::clone(&cancel));

    let options = ImportOptions::new()
        .with_app(app)
        .with_module(args.module)
        .with_path(args.path);
    let report = Import::new(options)?
        .with_cancel_flag(cancel)
        .execute()
        .await?;

    print_report(&report);
    report.into_result().map(|_| ())
}

/// Ctrl-C で中断フラグを立てる。処理中のユニットは最後まで実行される。
fn watch_ctrl_c(cancel: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.store(true, Ordering::SeqCst);
        }
    });
}

fn print_report(report: &ImportReport) {
    for created in &report.created {
        println!("{}", created_line(created));
    }
    for failure in &report.failures {
        println!("{}", failure_line(failure));
    }
    println!(
        "{}",
        CommandSummary::format(report.created.len(), report.failures.len())
    );
}
