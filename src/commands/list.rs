//! mfi list コマンド
//!
//! モジュール内のコンポーネント一覧を表示する。

use crate::app::{normalize_module, AppContext, ComponentEntry, LocalApp};
use crate::config::resolve_app_dir;
use crate::error::Result;
use crate::fs::RealFs;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
pub struct Args {
    /// Module to list ("/" for the root module)
    #[arg(long, short, default_value = "/")]
    pub module: String,

    /// Application directory (defaults to MFI_APP_DIR or the current directory)
    #[arg(long, value_name = "DIR")]
    pub app_dir: Option<PathBuf>,
}

pub async fn run(args: Args) -> Result<()> {
    let app = LocalApp::new(resolve_app_dir(args.app_dir)?, Arc::new(RealFs));
    let module = normalize_module(&args.module)?;
    let entries = app.components(&module)?;

    if entries.is_empty() {
        println!("No components in {}", module_label(&module));
    } else {
        println!("{}", build_table(&entries));
        println!("{} component(s) in {}", entries.len(), module_label(&module));
    }

    Ok(())
}

fn module_label(module: &str) -> String {
    if module.is_empty() {
        "root module".to_string()
    } else {
        format!("module '{}'", module)
    }
}

fn build_table(entries: &[ComponentEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Type", "Path"]);

    for entry in entries {
        table.add_row(vec![
            entry.name.clone(),
            entry.template_type.to_string(),
            entry.path.display().to_string(),
        ]);
    }

    table
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
