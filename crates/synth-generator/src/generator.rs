//! Per-user generation orchestrator.

use crate::filter::choose_filter;
use crate::result::GenerationResult;
use crate::selection::{select_for_random, select_from_spec};
use crate::template::{Placeholders, TemplateError};
use crate::time_window::{resolve, ResolvedWindow, TimeSpec, TimeWindowError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use synth_core::{AppConfig, ProfileVariant, RandomProfile, StaticProfile, UserProfile};

const WITH_FILTER_SUFFIX: &str = " with filter";

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Rejected before any work began
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No profile with this user name
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// The profile's time settings cannot produce a window
    #[error("Time window configuration error for user '{user}': {source}")]
    Configuration {
        user: String,
        #[source]
        source: TimeWindowError,
    },

    /// A selected template could not be rendered
    #[error("Failed to render queries for user '{user}': {source}")]
    Render {
        user: String,
        #[source]
        source: TemplateError,
    },
}

/// Produces query workloads for the users of an [`AppConfig`].
///
/// Each generator owns its random source. For concurrent use, give every
/// worker its own generator over a shared `Arc<AppConfig>`.
pub struct QueryGenerator<R = StdRng> {
    config: Arc<AppConfig>,
    rng: R,
}

impl QueryGenerator<StdRng> {
    /// Create a generator with a seeded `StdRng`.
    pub fn new(config: Arc<AppConfig>, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QueryGenerator<R> {
    /// Create a generator drawing from an existing random source.
    pub fn with_rng(config: Arc<AppConfig>, rng: R) -> Self {
        Self { config, rng }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Generate for `user_name` at the current time.
    pub fn generate(
        &mut self,
        user_name: &str,
    ) -> Result<Option<GenerationResult>, GeneratorError> {
        self.generate_at(user_name, chrono::Utc::now().timestamp())
    }

    /// Generate for `user_name` with `now` given in epoch seconds.
    ///
    /// `Ok(None)` means the user had nothing to run this time (a random
    /// profile whose selection came out empty).
    pub fn generate_at(
        &mut self,
        user_name: &str,
        now: i64,
    ) -> Result<Option<GenerationResult>, GeneratorError> {
        if user_name.trim().is_empty() {
            return Err(GeneratorError::InvalidArgument(
                "user name must not be blank".to_string(),
            ));
        }

        let config = Arc::clone(&self.config);
        let user = config
            .user(user_name)
            .ok_or_else(|| GeneratorError::UnknownUser(user_name.to_string()))?;

        match &user.variant {
            ProfileVariant::Static(profile) => self
                .generate_static(&config, user, profile, now)
                .map(Some),
            ProfileVariant::Random(profile) => self.generate_random(&config, user, profile, now),
        }
    }

    fn generate_static(
        &mut self,
        config: &AppConfig,
        user: &UserProfile,
        profile: &StaticProfile,
        now: i64,
    ) -> Result<GenerationResult, GeneratorError> {
        let window = self.resolve_window(user, now)?;
        let filter = self.pick_filter(config, user);
        let templates = select_from_spec(&profile.as_subset_spec(), &mut self.rng);
        tracing::debug!(
            "Selected {} of {} queries for {}",
            templates.len(),
            profile.queries.len(),
            user.user_name
        );

        let queries = render_all(user, &templates, &window, filter.as_deref())?;
        let name = display_name(&user.user_name, None, filter.is_some());

        Ok(GenerationResult::new(
            queries,
            user.kind(),
            name,
            window.label,
            filter,
            window.range,
        ))
    }

    fn generate_random(
        &mut self,
        config: &AppConfig,
        user: &UserProfile,
        profile: &RandomProfile,
        now: i64,
    ) -> Result<Option<GenerationResult>, GeneratorError> {
        let selection = select_for_random(profile, &config.catalog.pages, &mut self.rng);
        if selection.templates.is_empty() {
            tracing::warn!(
                "No queries selected for user {} (page: {:?}), skipping",
                user.user_name,
                selection.page
            );
            return Ok(None);
        }
        tracing::debug!(
            "Selected {} queries from page {:?} for {}",
            selection.templates.len(),
            selection.page,
            user.user_name
        );

        let window = self.resolve_window(user, now)?;
        let filter = self.pick_filter(config, user);

        let queries = render_all(user, &selection.templates, &window, filter.as_deref())?;
        let name = display_name(
            &user.user_name,
            selection.page.as_deref(),
            filter.is_some(),
        );

        Ok(Some(GenerationResult::new(
            queries,
            user.kind(),
            name,
            window.label,
            filter,
            window.range,
        )))
    }

    fn resolve_window(
        &mut self,
        user: &UserProfile,
        now: i64,
    ) -> Result<ResolvedWindow, GeneratorError> {
        resolve(&TimeSpec::from_profile(user), now, &mut self.rng).map_err(|source| {
            GeneratorError::Configuration {
                user: user.user_name.clone(),
                source,
            }
        })
    }

    fn pick_filter(&mut self, config: &AppConfig, user: &UserProfile) -> Option<String> {
        choose_filter(
            user,
            &config.catalog.filters,
            config.catalog.base_probability_filter,
            &mut self.rng,
        )
    }
}

fn render_all(
    user: &UserProfile,
    templates: &[String],
    window: &ResolvedWindow,
    filter: Option<&str>,
) -> Result<Vec<String>, GeneratorError> {
    let placeholders = Placeholders::new(&window.range, filter);
    templates
        .iter()
        .map(|template| placeholders.render(template))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| GeneratorError::Render {
            user: user.user_name.clone(),
            source,
        })
}

fn display_name(user_name: &str, page: Option<&str>, filtered: bool) -> String {
    let mut name = user_name.to_string();
    if let Some(page) = page {
        name.push(' ');
        name.push_str(page);
    }
    if filtered {
        name.push_str(WITH_FILTER_SUFFIX);
    }
    name
}
