//! User profile definitions.
//!
//! A profile describes how a simulated user picks its queries, time window
//! and filter. Two variants exist, discriminated by the `user_type` key:
//!
//! - **static**: a fixed list of query templates with one selection policy
//! - **random**: named pages of templates, or a shared/file-backed pool
//!
//! Profiles are immutable. The loader attaches file-backed content through
//! the consuming `with_loaded_*` builders, which return new values.

use crate::period::NamedTimePeriod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Selection Policy
// ============================================================================

/// Default for `is_all_select`.
pub const DEFAULT_SELECT_ALL: bool = true;
/// Default for `min_selected_queries`.
pub const DEFAULT_MIN_SELECTED: usize = 2;
/// Default for `max_count_selected_in_percent`.
pub const DEFAULT_MAX_PERCENT: u32 = 50;
/// Default for `is_random_selection`.
pub const DEFAULT_RANDOM_SELECTION: bool = true;

/// How many templates are chosen from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Return the full pool, in order
    pub select_all: bool,
    /// Floor on the number of selected templates
    pub min_selected: usize,
    /// Share of the pool (0-100) to select when sampling randomly
    pub max_percent: u32,
    /// Shuffle before truncating; otherwise take the leading templates
    pub random_selection: bool,
}

impl SelectionPolicy {
    fn from_options(
        select_all: Option<bool>,
        min_selected: Option<usize>,
        max_percent: Option<u32>,
        random_selection: Option<bool>,
    ) -> Self {
        Self {
            select_all: select_all.unwrap_or(DEFAULT_SELECT_ALL),
            min_selected: min_selected.unwrap_or(DEFAULT_MIN_SELECTED),
            max_percent: max_percent.unwrap_or(DEFAULT_MAX_PERCENT),
            random_selection: random_selection.unwrap_or(DEFAULT_RANDOM_SELECTION),
        }
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::from_options(None, None, None, None)
    }
}

// ============================================================================
// Query Subset Spec
// ============================================================================

/// Ordered templates of one page plus the policy used to pick from them.
///
/// In configuration a page is either a bare list of templates or an object:
///
/// ```yaml
/// dashboards:
///   queries: ["a", "b", "c"]
///   is_all_select: false
///   min_selected_queries: 1
///   max_count_selected_in_percent: 30
/// overview: ["x", "y"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuerySubsetRepr")]
pub struct QuerySubsetSpec {
    /// Raw templates; duplicates allowed, order significant
    pub queries: Vec<String>,

    /// File the templates are read from by the loader
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queries_file: Option<String>,

    #[serde(rename = "is_all_select")]
    pub select_all: bool,

    #[serde(rename = "min_selected_queries")]
    pub min_selected: usize,

    #[serde(rename = "max_count_selected_in_percent")]
    pub max_percent: u32,

    #[serde(rename = "is_random_selection")]
    pub random_selection: bool,
}

impl QuerySubsetSpec {
    /// Spec with the default policy (select everything).
    pub fn new(queries: Vec<String>) -> Self {
        let policy = SelectionPolicy::default();
        Self {
            queries,
            queries_file: None,
            select_all: policy.select_all,
            min_selected: policy.min_selected,
            max_percent: policy.max_percent,
            random_selection: policy.random_selection,
        }
    }

    /// Replace the policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.select_all = policy.select_all;
        self.min_selected = policy.min_selected;
        self.max_percent = policy.max_percent;
        self.random_selection = policy.random_selection;
        self
    }

    /// Replace the templates with ones read from `queries_file`.
    pub fn with_loaded_queries(mut self, queries: Vec<String>) -> Self {
        self.queries = queries;
        self
    }

    pub fn policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            select_all: self.select_all,
            min_selected: self.min_selected,
            max_percent: self.max_percent,
            random_selection: self.random_selection,
        }
    }

    pub fn has_queries_file(&self) -> bool {
        self.queries_file.as_deref().is_some_and(|f| !f.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuerySubsetRepr {
    List(Vec<String>),
    Spec {
        #[serde(default)]
        queries: Vec<String>,
        #[serde(default)]
        queries_file: Option<String>,
        #[serde(default)]
        is_all_select: Option<bool>,
        #[serde(default)]
        min_selected_queries: Option<usize>,
        #[serde(default)]
        max_count_selected_in_percent: Option<u32>,
        #[serde(default)]
        is_random_selection: Option<bool>,
    },
}

impl From<QuerySubsetRepr> for QuerySubsetSpec {
    fn from(repr: QuerySubsetRepr) -> Self {
        match repr {
            QuerySubsetRepr::List(queries) => QuerySubsetSpec::new(queries),
            QuerySubsetRepr::Spec {
                queries,
                queries_file,
                is_all_select,
                min_selected_queries,
                max_count_selected_in_percent,
                is_random_selection,
            } => {
                let policy = SelectionPolicy::from_options(
                    is_all_select,
                    min_selected_queries,
                    max_count_selected_in_percent,
                    is_random_selection,
                );
                QuerySubsetSpec {
                    queries_file,
                    ..QuerySubsetSpec::new(queries).with_policy(policy)
                }
            }
        }
    }
}

/// Page name to subset spec, iterated in page-name order.
pub type QueryPages = BTreeMap<String, QuerySubsetSpec>;

// ============================================================================
// Profiles
// ============================================================================

/// Discriminator of the two profile variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Static,
    Random,
}

impl UserType {
    /// Label used in generation results.
    pub fn label(&self) -> &'static str {
        match self {
            UserType::Static => "STATIC",
            UserType::Random => "RANDOM",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_true() -> bool {
    true
}

/// A named user's generation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name, also the lookup key
    pub user_name: String,

    /// Inline filter clauses; empty means "use the shared catalog"
    #[serde(default)]
    pub filters: Vec<String>,

    /// Filter file, doubling as a filter catalog key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters_file: Option<String>,

    /// Chance (0-100) of attaching a filter; the catalog default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_apply_probability: Option<u8>,

    /// Master switch for filters
    #[serde(default = "default_true")]
    pub using_filters: bool,

    /// Variant-specific settings
    #[serde(flatten)]
    pub variant: ProfileVariant,
}

/// Variant payload of a [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum ProfileVariant {
    Static(StaticProfile),
    Random(RandomProfile),
}

impl UserProfile {
    pub fn new(user_name: impl Into<String>, variant: ProfileVariant) -> Self {
        Self {
            user_name: user_name.into(),
            filters: Vec::new(),
            filters_file: None,
            filter_apply_probability: None,
            using_filters: true,
            variant,
        }
    }

    pub fn kind(&self) -> UserType {
        match self.variant {
            ProfileVariant::Static(_) => UserType::Static,
            ProfileVariant::Random(_) => UserType::Random,
        }
    }

    pub fn has_inline_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// The filter file name, if one is set and non-empty.
    pub fn filters_file_name(&self) -> Option<&str> {
        self.filters_file.as_deref().filter(|f| !f.is_empty())
    }

    /// Set inline filters.
    pub fn with_filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    /// Set the filter apply probability.
    pub fn with_filter_probability(mut self, probability: u8) -> Self {
        self.filter_apply_probability = Some(probability);
        self
    }

    /// Enable or disable filters.
    pub fn with_using_filters(mut self, enabled: bool) -> Self {
        self.using_filters = enabled;
        self
    }

    /// Attach filters read from a file, filling in the probability when unset.
    pub fn with_loaded_filters(mut self, filters: Vec<String>, default_probability: u8) -> Self {
        self.filters = filters;
        if self.filter_apply_probability.is_none() {
            self.filter_apply_probability = Some(default_probability);
        }
        self
    }
}

/// Profile with an explicit list of templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticProfile {
    #[serde(default)]
    pub queries: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries_file: Option<String>,

    /// Seconds before "now" where the window starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left_border: Option<u64>,

    /// Seconds before "now" where the window ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_right_border: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<NamedTimePeriod>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_left: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_right: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_select: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selected_queries: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count_selected_in_percent: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_random_selection: Option<bool>,
}

impl StaticProfile {
    pub fn new(queries: Vec<String>) -> Self {
        Self {
            queries,
            ..Self::default()
        }
    }

    pub fn with_fixed_borders(mut self, left: u64, right: u64) -> Self {
        self.time_left_border = Some(left);
        self.time_right_border = Some(right);
        self
    }

    pub fn with_times(mut self, times: Vec<NamedTimePeriod>) -> Self {
        self.times = Some(times);
        self
    }

    pub fn with_custom_bounds(mut self, max_left: u64, max_right: u64) -> Self {
        self.max_time_left = Some(max_left);
        self.max_time_right = Some(max_right);
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.is_all_select = Some(policy.select_all);
        self.min_selected_queries = Some(policy.min_selected);
        self.max_count_selected_in_percent = Some(policy.max_percent);
        self.is_random_selection = Some(policy.random_selection);
        self
    }

    /// Replace the templates with ones read from `queries_file`.
    pub fn with_loaded_queries(mut self, queries: Vec<String>) -> Self {
        self.queries = queries;
        self
    }

    pub fn has_queries_file(&self) -> bool {
        self.queries_file.as_deref().is_some_and(|f| !f.is_empty())
    }

    pub fn policy(&self) -> SelectionPolicy {
        SelectionPolicy::from_options(
            self.is_all_select,
            self.min_selected_queries,
            self.max_count_selected_in_percent,
            self.is_random_selection,
        )
    }

    /// The templates and policy as one subset spec.
    pub fn as_subset_spec(&self) -> QuerySubsetSpec {
        QuerySubsetSpec::new(self.queries.clone()).with_policy(self.policy())
    }
}

/// Where a random profile draws its templates from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuerySource<'a> {
    /// Inline pages; one page is picked per generation
    Pages(&'a QueryPages),
    /// Pages read from the profile's `queries_file`, pooled together
    FilePool(&'a QueryPages),
    /// The shared dynamic templates of the catalog, pooled together
    SharedPool,
}

/// Profile drawing templates from named pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomProfile {
    #[serde(default)]
    pub queries: QueryPages,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<NamedTimePeriod>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_left: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time_right: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left_border: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_right_border: Option<u64>,

    /// Pages read from `queries_file` by the loader
    #[serde(skip)]
    pub file_pages: QueryPages,
}

impl RandomProfile {
    pub fn new(queries: QueryPages) -> Self {
        Self {
            queries,
            ..Self::default()
        }
    }

    /// Profile drawing from the catalog's shared templates.
    pub fn shared() -> Self {
        Self::default()
    }

    pub fn with_fixed_borders(mut self, left: u64, right: u64) -> Self {
        self.time_left_border = Some(left);
        self.time_right_border = Some(right);
        self
    }

    pub fn with_times(mut self, times: Vec<NamedTimePeriod>) -> Self {
        self.times = Some(times);
        self
    }

    pub fn with_custom_bounds(mut self, max_left: u64, max_right: u64) -> Self {
        self.max_time_left = Some(max_left);
        self.max_time_right = Some(max_right);
        self
    }

    /// Attach pages read from `queries_file`.
    pub fn with_loaded_queries(mut self, pages: QueryPages) -> Self {
        self.file_pages = pages;
        self
    }

    pub fn has_inline_queries(&self) -> bool {
        !self.queries.is_empty()
    }

    pub fn has_queries_file(&self) -> bool {
        self.queries_file.as_deref().is_some_and(|f| !f.is_empty())
    }

    pub fn uses_dynamic_templates(&self) -> bool {
        !self.has_inline_queries() && !self.has_queries_file()
    }

    pub fn query_source(&self) -> QuerySource<'_> {
        if self.has_inline_queries() {
            QuerySource::Pages(&self.queries)
        } else if self.has_queries_file() {
            QuerySource::FilePool(&self.file_pages)
        } else {
            QuerySource::SharedPool
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
