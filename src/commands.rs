use crate::cli::Command;
use crate::error::Result;

pub mod import;
pub mod list;

pub async fn dispatch(cli: crate::cli::Cli) -> Result<()> {
    match cli.command {
        Command::Import(args) => import::run(args).await,
        Command::List(args) => list::run(args).await,
    }
}
