//! Core types for the query-synth workload generator.
//!
//! This crate provides the data model shared by the generator and the CLI:
//!
//! - [`UserProfile`] - a simulated user's configuration (static or random)
//! - [`QuerySubsetSpec`] / [`SelectionPolicy`] - templates of a page and how to pick them
//! - [`NamedTimePeriod`] / [`TimeRange`] - time window vocabulary
//! - [`Catalog`] / [`FilterCatalog`] - shared dynamic templates and filters
//! - [`AppConfig`] - everything above, resolved and immutable
//! - [`ConfigLoader`] - reads an [`AppConfig`] from YAML/JSON files
//!
//! # Architecture
//!
//! ```text
//! synth-core (this crate)
//!    │
//!    ├─── synth-generator  (resolves windows, filters and templates per user)
//!    │
//!    └─── query-synth      (CLI: loads config, runs workers, prints results)
//! ```
//!
//! # Example
//!
//! ```rust
//! use synth_core::{UserProfile, UserType};
//!
//! let users: Vec<UserProfile> = serde_yaml::from_str(r#"
//! - user_type: static
//!   user_name: ops
//!   queries: ["events | where ts > ${time_left_border}"]
//!   time_left_border: 3600
//! "#).unwrap();
//!
//! assert_eq!(users[0].kind(), UserType::Static);
//! ```

pub mod catalog;
pub mod error;
pub mod loader;
pub mod period;
pub mod profile;

// Re-exports for convenience
pub use catalog::{
    AppConfig, Catalog, FilterCatalog, DEFAULT_FILTERS_KEY, DEFAULT_FILTER_PROBABILITY,
};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use period::{InvalidTimeRange, NamedTimePeriod, TimeRange};
pub use profile::{
    ProfileVariant, QueryPages, QuerySource, QuerySubsetSpec, RandomProfile, SelectionPolicy,
    StaticProfile, UserProfile, UserType,
};
