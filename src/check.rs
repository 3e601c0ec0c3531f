//! Check command handler.

use crate::args::CheckArgs;
use anyhow::Context;
use serde::Serialize;
use synth_core::{AppConfig, ConfigLoader, UserType};

/// What a loaded configuration contains.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConfigSummary {
    pub static_users: usize,
    pub random_users: usize,
    pub users: Vec<String>,
    /// Shared dynamic pages and their template counts
    pub pages: Vec<(String, usize)>,
    pub filter_keys: Vec<String>,
    /// Key whose list backs users without their own filters
    pub default_filters_key: String,
    pub base_probability_filter: u8,
}

impl ConfigSummary {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            static_users: config.count_by_kind(UserType::Static),
            random_users: config.count_by_kind(UserType::Random),
            users: config.user_names().into_iter().map(str::to_string).collect(),
            pages: config
                .catalog
                .pages
                .iter()
                .map(|(name, spec)| (name.clone(), spec.queries.len()))
                .collect(),
            filter_keys: config
                .catalog
                .filters
                .keys()
                .into_iter()
                .map(str::to_string)
                .collect(),
            default_filters_key: config.catalog.filters.default_key().to_string(),
            base_probability_filter: config.catalog.base_probability_filter,
        }
    }
}

/// Run the check command.
pub async fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let loader = ConfigLoader::new(&args.config);
    let config = loader.load().with_context(|| {
        format!(
            "Failed to load configuration from {}",
            loader.config_path().display()
        )
    })?;

    let summary = ConfigSummary::from_config(&config);
    tracing::info!(
        "Configuration OK: {} static and {} random user(s)",
        summary.static_users,
        summary.random_users
    );
    print!("{}", serde_yaml::to_string(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use synth_core::{
        Catalog, FilterCatalog, ProfileVariant, QueryPages, QuerySubsetSpec, RandomProfile,
        StaticProfile, UserProfile, DEFAULT_FILTERS_KEY,
    };

    #[test]
    fn test_summary() {
        let mut pages = QueryPages::new();
        pages.insert(
            "home".to_string(),
            QuerySubsetSpec::new(vec!["a".to_string(), "b".to_string()]),
        );
        let mut filters = HashMap::new();
        filters.insert(DEFAULT_FILTERS_KEY.to_string(), vec!["x".to_string()]);
        filters.insert("errors".to_string(), vec!["y".to_string()]);
        let catalog = Catalog::new(pages, FilterCatalog::new(filters, DEFAULT_FILTERS_KEY))
            .with_base_probability(40);

        let users = vec![
            UserProfile::new("s", ProfileVariant::Static(StaticProfile::default())),
            UserProfile::new("r1", ProfileVariant::Random(RandomProfile::shared())),
            UserProfile::new("r2", ProfileVariant::Random(RandomProfile::shared())),
        ];
        let summary = ConfigSummary::from_config(&AppConfig::new(users, catalog));

        assert_eq!(
            summary,
            ConfigSummary {
                static_users: 1,
                random_users: 2,
                users: vec!["r1".into(), "r2".into(), "s".into()],
                pages: vec![("home".into(), 2)],
                filter_keys: vec![DEFAULT_FILTERS_KEY.into(), "errors".into()],
                default_filters_key: DEFAULT_FILTERS_KEY.into(),
                base_probability_filter: 40,
            }
        );

        let yaml = serde_yaml::to_string(&summary).unwrap();
        assert!(yaml.contains("random_users: 2"));
    }
}
