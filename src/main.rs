//! Command-line interface for query-synth
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # One result per user, printed as JSON lines
//! query-synth generate --config config.yaml
//!
//! # Reproducible run: fixed seed, workers and clock
//! query-synth generate --config config.yaml \
//!   --rounds 10 --workers 4 --seed 7 --now 1700000000
//! ```
//!
//! ## Check
//! ```bash
//! query-synth check --config config.yaml
//! ```
//!
//! Logs go to stderr and are controlled with `RUST_LOG`, e.g.
//! `RUST_LOG=synth_generator=debug`.

use clap::{Parser, Subcommand};
use query_synth::{run_check, run_generate, CheckArgs, GenerateArgs};

#[derive(Parser)]
#[command(name = "query-synth")]
#[command(about = "Generate query workloads on behalf of simulated users")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate queries for the configured users
    Generate(GenerateArgs),

    /// Load a configuration and print what it contains
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(args).await,
        Commands::Check(args) => run_check(args).await,
    }
}
