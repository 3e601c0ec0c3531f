//! Query subset selection.
//!
//! Policies (see [`SelectionPolicy`]):
//!
//! - `select_all` - every template, in order
//! - fixed count - the first `min_selected` templates, in order
//! - random - `max(min_selected, len * max_percent / 100)` templates, capped
//!   at `len`, taken from the front of a uniform shuffle

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use synth_core::{QueryPages, QuerySource, QuerySubsetSpec, RandomProfile, SelectionPolicy};

/// Page label used when templates are pooled across pages.
pub const MIXED_PAGE: &str = "Mixed";

/// Number of templates the random policy keeps out of `len`.
pub fn target_count(len: usize, policy: &SelectionPolicy) -> usize {
    let by_percent = (len as u64 * u64::from(policy.max_percent) / 100) as usize;
    policy.min_selected.max(by_percent).min(len)
}

/// Apply `policy` to `queries`.
pub fn select_subset<R: Rng>(
    queries: &[String],
    policy: &SelectionPolicy,
    rng: &mut R,
) -> Vec<String> {
    if queries.is_empty() {
        return Vec::new();
    }

    if policy.select_all {
        return queries.to_vec();
    }

    if !policy.random_selection {
        let count = policy.min_selected.min(queries.len());
        return queries[..count].to_vec();
    }

    let count = target_count(queries.len(), policy);
    let mut selected = queries.to_vec();
    selected.shuffle(rng);
    selected.truncate(count);
    selected
}

/// Apply a page's own policy to its templates.
pub fn select_from_spec<R: Rng>(spec: &QuerySubsetSpec, rng: &mut R) -> Vec<String> {
    select_subset(&spec.queries, &spec.policy(), rng)
}

/// Pick one page uniformly by index.
pub fn pick_page<'a, R: Rng>(
    pages: &'a QueryPages,
    rng: &mut R,
) -> Option<(&'a str, &'a QuerySubsetSpec)> {
    if pages.is_empty() {
        return None;
    }
    let index = rng.random_range(0..pages.len());
    pages
        .iter()
        .nth(index)
        .map(|(name, spec)| (name.as_str(), spec))
}

/// Every template across all pages, first occurrence kept.
pub fn pool_pages(pages: &QueryPages) -> Vec<String> {
    let mut seen = HashSet::new();
    pages
        .values()
        .flat_map(|spec| spec.queries.iter())
        .filter(|query| seen.insert(query.as_str()))
        .cloned()
        .collect()
}

/// Templates chosen for a random profile and the page they came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSelection {
    pub page: Option<String>,
    pub templates: Vec<String>,
}

impl PageSelection {
    fn mixed(templates: Vec<String>) -> Self {
        Self {
            page: Some(MIXED_PAGE.to_string()),
            templates,
        }
    }
}

/// Choose templates for a random profile.
///
/// Inline pages: one page is drawn and its policy applied. File-backed and
/// shared pools: all pages are pooled and returned whole under [`MIXED_PAGE`].
pub fn select_for_random<R: Rng>(
    profile: &RandomProfile,
    shared: &QueryPages,
    rng: &mut R,
) -> PageSelection {
    match profile.query_source() {
        QuerySource::Pages(pages) => match pick_page(pages, rng) {
            Some((name, spec)) => PageSelection {
                page: Some(name.to_string()),
                templates: select_from_spec(spec, rng),
            },
            None => PageSelection::default(),
        },
        QuerySource::FilePool(pages) => PageSelection::mixed(pool_pages(pages)),
        QuerySource::SharedPool => PageSelection::mixed(pool_pages(shared)),
    }
}
