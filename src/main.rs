// havoc - administrative shell for the ./havoc control plane
use anyhow::Context;
use clap::Parser;
use havoc_cli::cli::{execute_command, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    execute_command(args).await.context("havoc failed")?;
    Ok(())
}
