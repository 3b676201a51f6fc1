use clap::Parser;
use marketplace_seed::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Seed(args) => cli::seed::run(args).await,
        Command::Purge(args) => cli::purge::run(args).await,
    }
}
