use clap::{Parser, Subcommand};

use crate::commands::{import, list};

#[derive(Debug, Parser)]
#[command(name = "mfi")]
#[command(about = "Manifest Import CLI", long_about = None)]
pub struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// マニフェストをコンポーネントとしてインポート
    Import(import::Args),

    /// モジュール内のコンポーネント一覧
    List(list::Args),
}
