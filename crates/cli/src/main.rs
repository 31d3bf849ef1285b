//! siteeval CLI - Main Entry Point
//!
//! Evaluates a deployed site against a query file and sets the exit code
//! from the overall pass rate: 0 when the gate is met, 1 when it is not,
//! 2 when the harness itself fails.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use siteeval_common::EvalConfig;

mod commands;
mod output;

use commands::{config, queries, run};

/// siteeval - web endpoint evaluation harness
#[derive(Parser)]
#[command(name = "siteeval")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// TOML configuration file (environment variables and flags override it)
    #[arg(long, global = true, env = "SITEEVAL_CONFIG")]
    config: Option<PathBuf>,

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
    /// Evaluate the target site and write the JSON and HTML reports
    Run(run::RunArgs),

    /// List the test cases in the query file
    Queries(queries::QueriesArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

async fn dispatch(cli: Cli) -> anyhow::Result<bool> {
    let eval_config = EvalConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run(args) => run::execute(args, eval_config, cli.format).await,
        Commands::Queries(args) => {
            queries::execute(args, eval_config, cli.format)?;
            Ok(true)
        }
        Commands::Config(args) => {
            config::execute(args, eval_config, cli.format)?;
            Ok(true)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            output::print_error(&format!("Failed to create tokio runtime: {}", e));
            std::process::exit(2);
        }
    };

    let code = match runtime.block_on(dispatch(cli)) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            output::print_error(&format!("{:?}", e));
            2
        }
    };
    std::process::exit(code);
}
