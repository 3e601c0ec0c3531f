//! CLI argument definitions.

use clap::Args;
use std::path::PathBuf;

/// Arguments for generating query workloads.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Path to the root configuration file (YAML or JSON)
    #[arg(long, short = 'c', env = "QUERY_SYNTH_CONFIG")]
    pub config: PathBuf,

    /// Users to generate for (comma-separated, empty = all users)
    #[arg(long, value_delimiter = ',')]
    pub users: Vec<String>,

    /// Number of generations per user
    #[arg(long, default_value = "1")]
    pub rounds: u32,

    /// Random seed (same seed, workers and --now give the same output)
    #[arg(long, default_value = "42", env = "QUERY_SYNTH_SEED")]
    pub seed: u64,

    /// Number of parallel workers
    #[arg(long, default_value = "1")]
    pub workers: usize,

    /// Clock override in Unix epoch seconds (default: current time)
    #[arg(long)]
    pub now: Option<i64>,

    /// Pretty-print each result instead of one JSON object per line
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for validating a configuration.
#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    /// Path to the root configuration file (YAML or JSON)
    #[arg(long, short = 'c', env = "QUERY_SYNTH_CONFIG")]
    pub config: PathBuf,
}
