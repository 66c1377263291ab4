//! Built-in skills for Skillbox.
//!
//! - [`GetWeatherSkill`] — metric forecast for a city (OpenWeatherMap).
//! - [`AgeEstimateSkill`] — age estimate from a first name (agify.io), optionally per country.
//!
//! # Main entry points
//!
//! - [`register_builtins()`] — Register both skills against the public endpoints.
//! - [`register_builtins_with_endpoints()`] — Same, with overridden endpoints.

/// First-name age estimate skill.
pub mod age_estimate;
/// ISO 3166-1 alpha-2 code set.
pub mod iso3166;
/// Weather forecast skill.
pub mod weather;

pub use age_estimate::AgeEstimateSkill;
pub use weather::GetWeatherSkill;

use skillbox_core::{LocaleCatalog, SkillboxResult};
use skillbox_skills::SkillRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Remote endpoints used by the built-in skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// OpenWeatherMap 5-day forecast endpoint.
    pub weather_url: String,
    /// agify.io endpoint.
    pub agify_url: String,
    /// Request timeout of the weather skill. The age skill takes its timeout from the input.
    pub weather_timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_url: weather::OPENWEATHER_FORECAST_URL.to_string(),
            agify_url: age_estimate::AGIFY_URL.to_string(),
            weather_timeout: Duration::from_millis(age_estimate::DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Register both skills against the public endpoints.
pub fn register_builtins(
    registry: &mut SkillRegistry,
    catalog: Arc<LocaleCatalog>,
) -> SkillboxResult<()> {
    register_builtins_with_endpoints(registry, catalog, &Endpoints::default())
}

/// Register both skills. `catalog` is shared read-only by every skill.
pub fn register_builtins_with_endpoints(
    registry: &mut SkillRegistry,
    catalog: Arc<LocaleCatalog>,
    endpoints: &Endpoints,
) -> SkillboxResult<()> {
    let weather = GetWeatherSkill::new(catalog.clone())?
        .with_base_url(endpoints.weather_url.as_str())
        .with_timeout(endpoints.weather_timeout);
    let age = AgeEstimateSkill::new(catalog)?.with_base_url(endpoints.agify_url.as_str());

    registry.register(Arc::new(weather));
    registry.register(Arc::new(age));
    info!(count = registry.skill_count(), "Built-in skills registered");
    Ok(())
}

/// Host part of `url`, or the raw string when it does not parse.
pub(crate) fn remote_host(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
