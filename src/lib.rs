//! QuerySynth Library
//!
//! Generates query workloads on behalf of simulated users, for load testing
//! a query backend.
//!
//! # Features
//!
//! - Static users: a fixed template list with a selection policy
//! - Random users: named pages of templates, or a shared pool
//! - Named or custom time windows, optional filter clauses
//! - Reproducible output: a seed and a clock fully determine the workload
//!
//! # Crates
//!
//! - `synth_core` - profiles, catalogs and the configuration loader
//! - `synth_generator` - the per-user generation engine
//!
//! # CLI Usage
//!
//! ```bash
//! # Two rounds for every user, four workers, fixed clock
//! query-synth generate --config config.yaml --rounds 2 --workers 4 --now 1700000000
//!
//! # Only some users
//! query-synth generate --config config.yaml --users ops,analyst
//!
//! # Validate a configuration
//! query-synth check --config config.yaml
//! ```

pub mod args;
pub mod check;
pub mod generate;

pub use args::{CheckArgs, GenerateArgs};
pub use check::{run_check, ConfigSummary};
pub use generate::run_generate;
