//! armtc - Arm LLVM Embedded Toolchain installer CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use armtc_cli::cmd;
use armtc_cli::cmd::install::ExportVars;
use armtc_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries results only.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Install {
            release,
            platform,
            path_env_var,
            toolchain_env_var,
            no_cache,
        } => {
            let exports = ExportVars {
                path: path_env_var,
                toolchain: toolchain_env_var,
            };
            cmd::install::install(&release, platform, &exports, no_cache).await
        }
        Commands::List { json } => cmd::list::list(json),
        Commands::Url { release, platform } => cmd::url::url(&release, platform),
        Commands::Find { dir, platform } => cmd::find::find(&dir, platform),
    }
}
