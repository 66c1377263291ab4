use crate::iso3166;
use serde::Deserialize;
use serde_json::Value;
use skillbox_core::{SkillboxError, SkillboxResult};
use std::time::Duration;

/// Request timeout used when the input does not provide a positive one.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

const USE_COUNTRY_UNDEFINED: &str = "The flag indicating whether to use the country is undefined. You must set the flag indicating whether to use the country in the configuration.";
const RETRIEVAL_METHOD_UNDEFINED: &str = "The country retrieval method is undefined. You must set the country retrieval method in the configuration.";
const COUNTRY_ID_MISSING: &str = "The country ID is missing in the configuration. You must set the country ID in the configuration or specify that you want to provide it at runtime.";
const COUNTRY_ID_OVERRIDDEN: &str =
    "The country ID is already defined in the configuration and cannot be overridden at runtime.";
const COUNTRY_ID_UNDEFINED: &str = "The country ID is undefined. You must set the country ID in the configuration or provide it in the `countryId` property in the input at runtime.";

/// How the country used for the estimate is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryRetrievalMethod {
    /// Fixed in the configuration (`"set"`).
    SetInConfiguration,
    /// Supplied with every input (`"provide"`).
    ProvidedAtRuntime,
}

impl CountryRetrievalMethod {
    /// Parses the stored form value. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "set" => Some(Self::SetInConfiguration),
            "provide" => Some(Self::ProvidedAtRuntime),
            _ => None,
        }
    }

    /// Stored form value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetInConfiguration => "set",
            Self::ProvidedAtRuntime => "provide",
        }
    }
}

/// Stored configuration of the age estimate skill.
///
/// Fields keep their raw string form so the form provider can echo whatever
/// the user typed; typed views are exposed through the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgeEstimateConfig {
    /// `useCountry` when it is a string.
    pub use_country: Option<String>,
    /// Whether the `useCountry` key exists at all, whatever its value.
    pub use_country_present: bool,
    /// `countryRetrievalMethod` when it is a string.
    pub country_retrieval_method: Option<String>,
    /// `countryId` when it is a string.
    pub country_id: Option<String>,
}

impl AgeEstimateConfig {
    /// Reads the recognized fields. Unknown fields are dropped and non-string
    /// values count as absent, except that `useCountry` records its presence.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            use_country: field("useCountry"),
            use_country_present: value.get("useCountry").is_some(),
            country_retrieval_method: field("countryRetrievalMethod"),
            country_id: field("countryId"),
        }
    }

    /// Only the string `"true"` enables the country.
    pub fn uses_country(&self) -> bool {
        self.use_country.as_deref() == Some("true")
    }

    /// Typed retrieval method, `None` when unset or unknown.
    pub fn retrieval_method(&self) -> Option<CountryRetrievalMethod> {
        self.country_retrieval_method
            .as_deref()
            .and_then(CountryRetrievalMethod::parse)
    }

    /// Country enabled and expected in every input.
    pub fn country_at_runtime(&self) -> bool {
        self.uses_country()
            && self.retrieval_method() == Some(CountryRetrievalMethod::ProvidedAtRuntime)
    }
}

/// Runtime input of the age estimate skill.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeEstimateInput {
    /// First name to estimate.
    #[serde(default)]
    pub name: Option<String>,
    /// Country code, only accepted when the configuration asks for it.
    #[serde(default)]
    pub country_id: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl AgeEstimateInput {
    /// Deserializes the input, reporting type mismatches as [`SkillboxError::InvalidInput`].
    pub fn from_json(value: &Value) -> SkillboxResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| SkillboxError::InvalidInput(format!("Invalid skill input: {e}")))
    }

    /// Zero means "not set".
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(
            self.timeout
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        )
    }
}

/// Decides which country code, if any, the estimate is scoped to.
///
/// The configuration always wins: a code fixed there cannot be overridden by
/// the input. Any resulting code must be ISO 3166-1 alpha-2.
pub fn resolve_country(
    config: &AgeEstimateConfig,
    input: &AgeEstimateInput,
) -> SkillboxResult<Option<String>> {
    if !config.use_country_present {
        return Err(SkillboxError::Configuration(USE_COUNTRY_UNDEFINED.to_string()));
    }
    if !config.uses_country() {
        return Ok(None);
    }

    let country_id = match config.retrieval_method() {
        Some(CountryRetrievalMethod::SetInConfiguration) => {
            let fixed = config
                .country_id
                .clone()
                .ok_or_else(|| SkillboxError::Configuration(COUNTRY_ID_MISSING.to_string()))?;
            if input.country_id.is_some() {
                return Err(SkillboxError::Configuration(
                    COUNTRY_ID_OVERRIDDEN.to_string(),
                ));
            }
            fixed
        }
        Some(CountryRetrievalMethod::ProvidedAtRuntime) => input
            .country_id
            .clone()
            .ok_or_else(|| SkillboxError::Configuration(COUNTRY_ID_UNDEFINED.to_string()))?,
        None => {
            return Err(SkillboxError::Configuration(
                RETRIEVAL_METHOD_UNDEFINED.to_string(),
            ))
        }
    };

    if !iso3166::is_alpha2(&country_id) {
        return Err(SkillboxError::Configuration(format!(
            "The {country_id} country ID is not valid. Only ISO 3166-1 alpha-2 codes are supported."
        )));
    }
    Ok(Some(country_id))
}
