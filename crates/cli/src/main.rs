//! TMAT CLI - Main Entry Point
//!
//! Runs the login, list-query and form-submission scenario families against
//! the configured web application, once per browser.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{fixtures, run};

/// TMAT - data-driven UI acceptance runner
#[derive(Parser)]
#[command(name = "tmat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "tmat.toml", global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every scenario family on each configured browser
    Run(run::RunArgs),

    /// Show the scenario records found in the data directory
    Fixtures(fixtures::FixturesArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run(args) => {
            let clean = run::execute(args, &cli.config, cli.format).await?;
            if !clean {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Fixtures(args) => fixtures::execute(args, &cli.config, cli.format)?,
        Commands::Version => {
            println!("TMAT CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Engine: tmat-common v{}", tmat_common::VERSION);
        }
    }

    Ok(ExitCode::SUCCESS)
}
