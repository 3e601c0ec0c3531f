//! Output of one generation.

use serde::Serialize;
use synth_core::{TimeRange, UserType};

/// Rendered queries plus the metadata describing how they were produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub queries: Vec<String>,
    /// `STATIC` or `RANDOM`
    pub user_type: String,
    /// Profile name, optionally followed by the page and " with filter"
    pub user_name: String,
    pub time_period_name: String,
    pub applied_filter: Option<String>,
    pub time_left_border: i64,
    pub time_right_border: i64,
}

impl GenerationResult {
    pub(crate) fn new(
        queries: Vec<String>,
        user_type: UserType,
        user_name: String,
        time_period_name: String,
        applied_filter: Option<String>,
        range: TimeRange,
    ) -> Self {
        Self {
            queries,
            user_type: user_type.label().to_string(),
            user_name,
            time_period_name,
            applied_filter,
            time_left_border: range.left(),
            time_right_border: range.right(),
        }
    }

    /// Borders as `left-right`.
    pub fn formatted_time_range(&self) -> String {
        format!("{}-{}", self.time_left_border, self.time_right_border)
    }

    pub fn has_filter(&self) -> bool {
        self.applied_filter
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty())
    }

    /// First rendered query, or an empty string.
    pub fn first_query(&self) -> &str {
        self.queries.first().map(String::as_str).unwrap_or("")
    }

    pub fn joined_queries(&self) -> String {
        self.queries.join("; ")
    }

    /// Window width in seconds.
    pub fn duration_secs(&self) -> i64 {
        self.time_right_border - self.time_left_border
    }
}
