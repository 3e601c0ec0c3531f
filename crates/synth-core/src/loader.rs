//! Configuration loading.
//!
//! The root config points at three further files:
//!
//! ```yaml
//! users_config_path: users.yaml   # list of profiles
//! queries_path: queries.yaml      # page -> templates (shared dynamic pool)
//! filters_path: filters.yaml      # list, or catalog key -> list
//! base_probability_filter: 66
//! ```
//!
//! Relative paths resolve against the base directory, which defaults to the
//! directory holding the root config. JSON files are accepted as well since
//! they parse as YAML.

use crate::catalog::{
    AppConfig, Catalog, FilterCatalog, DEFAULT_FILTERS_KEY, DEFAULT_FILTER_PROBABILITY,
};
use crate::error::ConfigError;
use crate::profile::{ProfileVariant, QueryPages, UserProfile};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct RootConfig {
    users_config_path: Option<String>,
    queries_path: Option<String>,
    filters_path: Option<String>,
    base_probability_filter: Option<u8>,
}

/// Loads an [`AppConfig`] from a root config file and the files it references.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: PathBuf,
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Loader for `config_path`, resolving relative paths next to it.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            config_path,
            base_dir,
        }
    }

    /// Resolve relative paths (including the root config) against `base_dir`.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        if self.config_path.is_relative() {
            self.config_path = self.base_dir.join(&self.config_path);
        }
        self
    }

    /// Root config file, after base-dir resolution.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Read every file and build the resolved configuration.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let root: RootConfig = read_yaml(&self.config_path)?;

        let users_path = root
            .users_config_path
            .as_deref()
            .ok_or(ConfigError::MissingKey("users_config_path"))?;
        let base_probability = root
            .base_probability_filter
            .unwrap_or(DEFAULT_FILTER_PROBABILITY);

        let pages = match root.queries_path.as_deref() {
            Some(path) => self.load_pages(path)?,
            None => QueryPages::new(),
        };
        let filters = match root.filters_path.as_deref() {
            Some(path) => self.load_filter_catalog(path)?,
            None => FilterCatalog::default(),
        };
        let catalog = Catalog::new(pages, filters).with_base_probability(base_probability);

        let users = self.load_users(users_path, &catalog)?;

        tracing::info!(
            "Loaded {} users, {} query pages, {} filter keys from {}",
            users.len(),
            catalog.pages.len(),
            catalog.filters.keys().len(),
            self.config_path.display()
        );

        Ok(AppConfig::new(users, catalog))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Read a page map and pull in any per-page `queries_file`.
    fn load_pages(&self, path: &str) -> Result<QueryPages, ConfigError> {
        let path = self.resolve(path);
        let value = read_value(&path)?;
        if !value.is_mapping() {
            return Err(ConfigError::UnexpectedShape {
                path,
                expected: "a mapping of page names to queries",
            });
        }
        let pages: QueryPages =
            serde_yaml::from_value(value).map_err(|source| ConfigError::Yaml {
                path: path.clone(),
                source,
            })?;

        Ok(pages
            .into_iter()
            .map(|(name, spec)| {
                let Some(file) = spec.queries_file.clone().filter(|f| !f.is_empty()) else {
                    return (name, spec);
                };
                match self.read_list(&file) {
                    Ok(queries) => (name, spec.with_loaded_queries(queries)),
                    Err(e) => {
                        tracing::warn!("Could not load queries for page '{name}' from {file}: {e}");
                        (name, spec)
                    }
                }
            })
            .collect())
    }

    /// Read the filter catalog: a bare list becomes the default key.
    fn load_filter_catalog(&self, path: &str) -> Result<FilterCatalog, ConfigError> {
        let path = self.resolve(path);
        let value = read_value(&path)?;
        let lists: HashMap<String, Vec<String>> = match value {
            Value::Sequence(_) => {
                let filters = from_value(&path, value)?;
                HashMap::from([(DEFAULT_FILTERS_KEY.to_string(), filters)])
            }
            Value::Mapping(_) => from_value(&path, value)?,
            _ => {
                return Err(ConfigError::UnexpectedShape {
                    path,
                    expected: "a list of filters or a mapping of filter lists",
                })
            }
        };
        Ok(FilterCatalog::new(lists, DEFAULT_FILTERS_KEY))
    }

    fn load_users(&self, path: &str, catalog: &Catalog) -> Result<Vec<UserProfile>, ConfigError> {
        let path = self.resolve(path);
        let value = read_value(&path)?;
        if !value.is_sequence() {
            return Err(ConfigError::UnexpectedShape {
                path,
                expected: "a list of user profiles",
            });
        }
        let profiles: Vec<UserProfile> = from_value(&path, value)?;

        let mut seen = HashSet::new();
        let mut users = Vec::with_capacity(profiles.len());
        for profile in profiles {
            if !seen.insert(profile.user_name.clone()) {
                return Err(ConfigError::DuplicateUser(profile.user_name));
            }
            let profile = self.load_user_queries(profile)?;
            let profile = self.load_user_filters(profile, catalog)?;
            users.push(profile);
        }
        Ok(users)
    }

    fn load_user_queries(&self, profile: UserProfile) -> Result<UserProfile, ConfigError> {
        let variant = match profile.variant {
            ProfileVariant::Static(p) if p.has_queries_file() => {
                let file = p.queries_file.clone().unwrap_or_default();
                let queries = self.read_list(&file)?;
                ProfileVariant::Static(p.with_loaded_queries(queries))
            }
            ProfileVariant::Random(p) if p.has_queries_file() => {
                let file = p.queries_file.clone().unwrap_or_default();
                let pages = self.load_pages(&file)?;
                ProfileVariant::Random(p.with_loaded_queries(pages))
            }
            other => other,
        };
        Ok(UserProfile { variant, ..profile })
    }

    fn load_user_filters(
        &self,
        profile: UserProfile,
        catalog: &Catalog,
    ) -> Result<UserProfile, ConfigError> {
        if profile.has_inline_filters() {
            return Ok(profile);
        }

        let filters = match profile.filters_file_name() {
            Some(file) => self.read_list(file)?,
            None => catalog.filters.default_filters().to_vec(),
        };

        if filters.is_empty() {
            return Ok(profile);
        }
        Ok(profile.with_loaded_filters(filters, catalog.base_probability_filter))
    }

    /// Read a file holding a list of strings.
    fn read_list(&self, path: &str) -> Result<Vec<String>, ConfigError> {
        let path = self.resolve(path);
        let value = read_value(&path)?;
        if !value.is_sequence() {
            return Err(ConfigError::UnexpectedShape {
                path,
                expected: "a list of strings",
            });
        }
        from_value(&path, value)
    }
}

fn read_value(path: &Path) -> Result<Value, ConfigError> {
    read_yaml(path)
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn from_value<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T, ConfigError> {
    serde_yaml::from_value(value).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{QuerySource, UserType};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "config.yaml",
            r#"
users_config_path: users.yaml
queries_path: queries.yaml
filters_path: filters.yaml
base_probability_filter: 40
"#,
        );
        write(
            &dir,
            "queries.yaml",
            r#"
overview: ["q1", "q2", "q3"]
details:
  queries_file: details.yaml
  is_all_select: false
broken:
  queries: ["kept"]
  queries_file: missing.yaml
"#,
        );
        write(&dir, "details.yaml", r#"["d1", "d2"]"#);
        write(
            &dir,
            "filters.yaml",
            r#"
default_filters: ["status = 200", "status = 500"]
slow: ["latency > 1000"]
"#,
        );
        write(&dir, "ops_queries.yaml", "- s1\n- s2\n");
        write(&dir, "ops_filters.yaml", "- host = 'a'\n");
        write(&dir, "pages.yaml", "alpha: [p1]\nbeta: [p2, p1]\n");
        write(
            &dir,
            "users.yaml",
            r#"
- user_type: static
  user_name: ops
  queries_file: ops_queries.yaml
  filters_file: ops_filters.yaml
  time_left_border: 3600
- user_type: random
  user_name: shared
- user_type: random
  user_name: paged
  queries_file: pages.yaml
  filters: ["inline"]
"#,
        );
        dir
    }

    #[test]
    fn test_load_full_config() {
        let dir = fixture();
        let config = ConfigLoader::new(dir.path().join("config.yaml"))
            .load()
            .unwrap();

        assert_eq!(config.user_names(), vec!["ops", "paged", "shared"]);
        assert_eq!(config.count_by_kind(UserType::Random), 2);
        assert_eq!(config.catalog.base_probability_filter, 40);

        let pages = &config.catalog.pages;
        assert_eq!(pages["overview"].queries, vec!["q1", "q2", "q3"]);
        assert_eq!(pages["details"].queries, vec!["d1", "d2"]);
        assert!(!pages["details"].select_all);
        // Unreadable page files keep the inline list
        assert_eq!(pages["broken"].queries, vec!["kept"]);

        assert_eq!(
            config.catalog.filters.get("slow").unwrap(),
            ["latency > 1000".to_string()]
        );
    }

    #[test]
    fn test_user_files_are_resolved() {
        let dir = fixture();
        let config = ConfigLoader::new(dir.path().join("config.yaml"))
            .load()
            .unwrap();

        let ops = config.user("ops").unwrap();
        let ProfileVariant::Static(profile) = &ops.variant else {
            panic!("Expected static profile");
        };
        assert_eq!(profile.queries, vec!["s1", "s2"]);
        assert_eq!(ops.filters, vec!["host = 'a'"]);
        assert_eq!(ops.filter_apply_probability, Some(40));

        let shared = config.user("shared").unwrap();
        assert_eq!(shared.filters, vec!["status = 200", "status = 500"]);

        let paged = config.user("paged").unwrap();
        assert_eq!(paged.filters, vec!["inline"]);
        assert_eq!(paged.filter_apply_probability, None);
        let ProfileVariant::Random(profile) = &paged.variant else {
            panic!("Expected random profile");
        };
        let QuerySource::FilePool(file_pages) = profile.query_source() else {
            panic!("Expected file-backed pool");
        };
        assert_eq!(file_pages["beta"].queries, vec!["p2", "p1"]);
    }

    #[test]
    fn test_filters_as_plain_list() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "config.json",
            r#"{"users_config_path": "users.yaml", "filters_path": "filters.yaml"}"#,
        );
        write(&dir, "filters.yaml", "- a\n- b\n");
        write(&dir, "users.yaml", "- user_type: random\n  user_name: r\n");

        let config = ConfigLoader::new(dir.path().join("config.json"))
            .load()
            .unwrap();

        assert_eq!(config.catalog.filters.default_filters().len(), 2);
        assert_eq!(config.catalog.base_probability_filter, 66);
        assert!(config.catalog.pages.is_empty());
        assert_eq!(config.user("r").unwrap().filter_apply_probability, Some(66));
    }

    #[test]
    fn test_relative_config_with_base_dir() {
        let dir = fixture();
        let loader = ConfigLoader::new("config.yaml").with_base_dir(dir.path());
        assert_eq!(loader.config_path(), dir.path().join("config.yaml"));

        let config = loader.load().unwrap();
        assert!(config.has_user("ops"));
    }

    #[test]
    fn test_missing_users_key() {
        let dir = TempDir::new().unwrap();
        write(&dir, "config.yaml", "queries_path: queries.yaml\n");

        let err = ConfigLoader::new(dir.path().join("config.yaml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey("users_config_path")));
    }

    #[test]
    fn test_duplicate_users_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "config.yaml", "users_config_path: users.yaml\n");
        write(
            &dir,
            "users.yaml",
            "- user_type: random\n  user_name: twin\n- user_type: static\n  user_name: twin\n",
        );

        let err = ConfigLoader::new(dir.path().join("config.yaml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateUser(name) if name == "twin"));
    }

    #[test]
    fn test_wrong_shapes() {
        let dir = TempDir::new().unwrap();
        write(&dir, "config.yaml", "users_config_path: users.yaml\nqueries_path: queries.yaml\n");
        write(&dir, "users.yaml", "[]\n");
        write(&dir, "queries.yaml", "- not\n- a\n- mapping\n");

        let err = ConfigLoader::new(dir.path().join("config.yaml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedShape { .. }));
    }

    #[test]
    fn test_missing_user_queries_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "config.yaml", "users_config_path: users.yaml\n");
        write(
            &dir,
            "users.yaml",
            "- user_type: static\n  user_name: s\n  queries_file: nowhere.yaml\n",
        );

        let err = ConfigLoader::new(dir.path().join("config.yaml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
