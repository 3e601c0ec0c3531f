//! Query workload generator for simulated users.
//!
//! This crate provides the [`QueryGenerator`], which turns a user profile into
//! rendered query strings. The generator owns a seeded RNG, so the same seed,
//! configuration and clock always produce the same workload.
//!
//! # Architecture
//!
//! ```text
//! AppConfig (Arc, read-only)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  QueryGenerator  │
//! │                  │
//! │  - config        │
//! │  - rng (StdRng)  │
//! └────────┬─────────┘
//!          │  time_window → filter → selection → template
//!          ▼
//!    GenerationResult { queries, user_type, user_name, time_period_name, ... }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use synth_core::{AppConfig, Catalog, ProfileVariant, StaticProfile, UserProfile};
//! use synth_generator::QueryGenerator;
//!
//! let profile = UserProfile::new(
//!     "ops",
//!     ProfileVariant::Static(
//!         StaticProfile::new(vec!["events | where ts > ${time_left_border}".into()])
//!             .with_fixed_borders(3600, 0),
//!     ),
//! )
//! .with_using_filters(false);
//! let config = Arc::new(AppConfig::new(vec![profile], Catalog::default()));
//!
//! let mut generator = QueryGenerator::new(config, 42);
//! let result = generator.generate_at("ops", 1_700_000_000).unwrap().unwrap();
//! assert_eq!(result.queries, vec!["events | where ts > 1699996400"]);
//! assert_eq!(result.time_period_name, "Last 1h");
//! ```
//!
//! # Placeholders
//!
//! - `${time_left_border}` / `${time_right_border}` - window borders, epoch seconds
//! - `${filter_block}` - `(<filter>)`, or empty
//! - `${filter_and_block}` - `AND (<filter>)`, or empty
//! - `${filter_or_block}` - `OR (<filter>)`, or empty

pub mod filter;
pub mod generator;
pub mod result;
pub mod selection;
pub mod template;
pub mod time_window;

// Re-exports for convenience
pub use generator::{GeneratorError, QueryGenerator};
pub use result::GenerationResult;
pub use selection::{PageSelection, MIXED_PAGE};
pub use template::{Placeholders, TemplateError};
pub use time_window::{format_interval, ResolvedWindow, TimeSpec, TimeWindowError};
