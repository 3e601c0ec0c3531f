//! Filter clause selection.

use rand::Rng;
use std::path::Path;
use synth_core::{FilterCatalog, UserProfile};

/// Decide whether this generation gets a filter.
///
/// A uniform draw in `[0, 100)` applies the filter when it is at most the
/// probability, so `p` in `1..=99` applies with chance `(p + 1)%`. Zero never
/// applies and 100 always does.
pub fn should_apply<R: Rng>(profile: &UserProfile, default_probability: u8, rng: &mut R) -> bool {
    if !profile.using_filters {
        return false;
    }
    let probability = profile
        .filter_apply_probability
        .unwrap_or(default_probability);
    if probability == 0 {
        return false;
    }
    let draw: u8 = rng.random_range(0..100);
    draw <= probability
}

/// The list a filter is drawn from: the profile's inline filters, else the
/// catalog list named by its filter file, else the catalog default list.
pub fn filter_pool<'a>(profile: &'a UserProfile, catalog: &'a FilterCatalog) -> &'a [String] {
    if profile.has_inline_filters() {
        return &profile.filters;
    }

    if let Some(file) = profile.filters_file_name() {
        if let Some(filters) = catalog.get(catalog_key(file)).filter(|f| !f.is_empty()) {
            return filters;
        }
    }

    catalog.default_filters()
}

/// Pick one filter uniformly from the profile's pool.
pub fn select<'a, R: Rng>(
    profile: &'a UserProfile,
    catalog: &'a FilterCatalog,
    rng: &mut R,
) -> Option<&'a str> {
    let pool = filter_pool(profile, catalog);
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())].as_str())
}

/// Apply-then-select in one step.
pub fn choose_filter<R: Rng>(
    profile: &UserProfile,
    catalog: &FilterCatalog,
    default_probability: u8,
    rng: &mut R,
) -> Option<String> {
    if !should_apply(profile, default_probability, rng) {
        return None;
    }
    let filter = select(profile, catalog, rng).map(str::to_string);
    tracing::debug!("Filter for {}: {:?}", profile.user_name, filter);
    filter
}

/// Catalog key for a filter file name: the name without its extension.
pub fn catalog_key(file: &str) -> &str {
    match Path::new(file).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => &file[..file.len() - ext.len() - 1],
        None => file,
    }
}
