//! Shared, read-only configuration: user profiles, dynamic templates and filters.

use crate::profile::{QueryPages, UserProfile, UserType};
use std::collections::HashMap;

/// Key of the filter list used when a profile names no catalog key.
pub const DEFAULT_FILTERS_KEY: &str = "default_filters";

/// Filter apply probability used when neither profile nor config sets one.
pub const DEFAULT_FILTER_PROBABILITY: u8 = 66;

/// Catalog key to filter clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCatalog {
    lists: HashMap<String, Vec<String>>,
    default_key: String,
}

impl FilterCatalog {
    pub fn new(lists: HashMap<String, Vec<String>>, default_key: impl Into<String>) -> Self {
        Self {
            lists,
            default_key: default_key.into(),
        }
    }

    /// Catalog holding only a default list.
    pub fn with_defaults(filters: Vec<String>) -> Self {
        let mut lists = HashMap::new();
        lists.insert(DEFAULT_FILTERS_KEY.to_string(), filters);
        Self::new(lists, DEFAULT_FILTERS_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.lists.get(key).map(Vec::as_slice)
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// The list under the default key, empty when absent.
    pub fn default_filters(&self) -> &[String] {
        self.get(&self.default_key).unwrap_or_default()
    }

    /// Catalog keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::new(HashMap::new(), DEFAULT_FILTERS_KEY)
    }
}

/// Shared pools every profile may draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Dynamic query templates, by page
    pub pages: QueryPages,
    /// Filter clauses, by catalog key
    pub filters: FilterCatalog,
    /// Probability applied to profiles without their own
    pub base_probability_filter: u8,
}

impl Catalog {
    pub fn new(pages: QueryPages, filters: FilterCatalog) -> Self {
        Self {
            pages,
            filters,
            base_probability_filter: DEFAULT_FILTER_PROBABILITY,
        }
    }

    pub fn with_base_probability(mut self, probability: u8) -> Self {
        self.base_probability_filter = probability;
        self
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(QueryPages::new(), FilterCatalog::default())
    }
}

/// Fully resolved configuration, immutable after load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    users: HashMap<String, UserProfile>,
    pub catalog: Catalog,
}

impl AppConfig {
    /// Build from profiles keyed by their `user_name`. A later profile with
    /// the same name replaces an earlier one; the loader rejects duplicates
    /// before getting here.
    pub fn new(users: impl IntoIterator<Item = UserProfile>, catalog: Catalog) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.user_name.clone(), user))
                .collect(),
            catalog,
        }
    }

    pub fn user(&self, name: &str) -> Option<&UserProfile> {
        self.users.get(name)
    }

    pub fn has_user(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    /// User names, sorted.
    pub fn user_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.users.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn users(&self) -> impl Iterator<Item = &UserProfile> {
        self.users.values()
    }

    pub fn count_by_kind(&self, kind: UserType) -> usize {
        self.users().filter(|u| u.kind() == kind).count()
    }
}
