use super::config::{AgeEstimateConfig, CountryRetrievalMethod};
use super::schema::config_schema;
use crate::iso3166;
use serde::Serialize;
use serde_json::{json, Value};
use skillbox_core::locale::AgeEstimateStrings;
use skillbox_core::{FormEvent, FormResponse, LocaleBundle, SkillboxError, SkillboxResult};
use tracing::debug;

const COUNTRY_EVENT: &str = "changeCountryOption";

/// Values pre-filled in the configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeFormData {
    /// `"true"` or `"false"`. Defaults to `"false"`.
    pub use_country: String,
    /// `"set"` or `"provide"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_retrieval_method: Option<String>,
    /// Country code fixed in the configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
}

impl Default for AgeFormData {
    fn default() -> Self {
        Self {
            use_country: "false".to_string(),
            country_retrieval_method: None,
            country_id: None,
        }
    }
}

impl AgeFormData {
    /// Defaults overlaid with every recognized configuration field.
    fn merged(config: &AgeEstimateConfig) -> Self {
        let defaults = Self::default();
        Self {
            use_country: config.use_country.clone().unwrap_or(defaults.use_country),
            country_retrieval_method: config.country_retrieval_method.clone(),
            country_id: config.country_id.clone(),
        }
    }

    /// Only the fields the current answers make relevant. Returns the form data
    /// and whether the configured country code is acceptable.
    fn reconciled(config: &AgeEstimateConfig) -> (Self, bool) {
        let mut data = Self::default();
        let mut country_valid = true;

        if let Some(flag) = config.use_country.as_deref().filter(|f| !f.is_empty()) {
            data.use_country = flag.to_string();
        }
        if config.uses_country() {
            data.country_retrieval_method = config.country_retrieval_method.clone();
            if config.retrieval_method() == Some(CountryRetrievalMethod::SetInConfiguration) {
                data.country_id = config.country_id.clone();
                country_valid = config.country_id.as_deref().is_some_and(iso3166::is_alpha2);
            }
        }
        (data, country_valid)
    }
}

fn ui_schema(strings: &AgeEstimateStrings) -> Value {
    json!({
        "useCountry": {
            "ui:widget": "CheckboxWidget",
            "ui:options": { "triggerEvent": COUNTRY_EVENT }
        },
        "link": {
            "ui:field": "LinkField"
        },
        "countryRetrievalMethod": {
            "ui:widget": "radio",
            "ui:options": { "triggerEvent": COUNTRY_EVENT }
        },
        "countryId": {
            "ui:placeholder": strings.country_id.placeholder,
            "ui:options": { "triggerEvent": COUNTRY_EVENT }
        }
    })
}

/// Computes the configuration form for `event`.
///
/// A missing or non-object configuration is rejected first, then unknown
/// events. Any other failure is reported as [`SkillboxError::Unexpected`].
pub fn compute_form(
    bundle: &LocaleBundle,
    configuration: Option<&Value>,
    event: &str,
) -> SkillboxResult<FormResponse> {
    let Some(configuration) = configuration.filter(|c| c.is_object()) else {
        return Err(SkillboxError::InvalidConfiguration(
            bundle.errors.configuration_is_not_valid.clone(),
        ));
    };
    build_form(bundle, configuration, event).map_err(|err| match err {
        SkillboxError::UnsupportedEvent { .. } | SkillboxError::InvalidConfiguration(_) => err,
        other => SkillboxError::Unexpected(other.to_string()),
    })
}

fn build_form(
    bundle: &LocaleBundle,
    configuration: &Value,
    event: &str,
) -> SkillboxResult<FormResponse> {
    let parsed = FormEvent::parse(event).filter(|e| {
        matches!(
            e,
            FormEvent::Init | FormEvent::Reopen | FormEvent::ChangeCountryOption
        )
    });
    let Some(parsed) = parsed else {
        return Err(SkillboxError::UnsupportedEvent {
            event: event.to_string(),
            message: bundle.errors.event_error.clone(),
        });
    };

    let strings = &bundle.age_estimate;
    let config = AgeEstimateConfig::from_json(configuration);
    let (form_data, country_valid) = match parsed {
        FormEvent::Init => (AgeFormData::merged(&config), true),
        _ => AgeFormData::reconciled(&config),
    };
    debug!(event = parsed.as_str(), country_valid, "Computed age estimate form");

    let error = (!country_valid).then_some(strings.country_id.error.as_str());
    Ok(FormResponse {
        schema: config_schema(strings, error),
        ui_schema: ui_schema(strings),
        form_data: serde_json::to_value(&form_data)?,
        is_form_submittable: country_valid,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use skillbox_core::LocaleCatalog;

    fn bundle() -> LocaleBundle {
        LocaleCatalog::builtin().unwrap().resolve(None).clone()
    }

    #[test]
    fn test_init_with_empty_configuration() {
        let bundle = bundle();
        let form = compute_form(&bundle, Some(&json!({})), "init").unwrap();
        assert_eq!(form.form_data, json!({"useCountry": "false"}));
        assert!(form.is_form_submittable);
        assert_eq!(form.schema, config_schema(&bundle.age_estimate, None));
    }

    #[test]
    fn test_init_keeps_configured_values_and_drops_unknown() {
        let form = compute_form(
            &bundle(),
            Some(&json!({
                "useCountry": "true",
                "countryRetrievalMethod": "set",
                "countryId": "UK",
                "extra": 1
            })),
            "init",
        )
        .unwrap();
        assert_eq!(
            form.form_data,
            json!({"useCountry": "true", "countryRetrievalMethod": "set", "countryId": "UK"})
        );
        assert!(form.is_form_submittable);
    }

    #[test]
    fn test_reopen_drops_irrelevant_fields() {
        let form = compute_form(
            &bundle(),
            Some(&json!({
                "useCountry": "false",
                "countryRetrievalMethod": "set",
                "countryId": "US"
            })),
            "reopen",
        )
        .unwrap();
        assert_eq!(form.form_data, json!({"useCountry": "false"}));

        let form = compute_form(
            &bundle(),
            Some(&json!({
                "useCountry": "true",
                "countryRetrievalMethod": "provide",
                "countryId": "US"
            })),
            "changeCountryOption",
        )
        .unwrap();
        assert_eq!(
            form.form_data,
            json!({"useCountry": "true", "countryRetrievalMethod": "provide"})
        );
        assert!(form.is_form_submittable);
    }

    #[test]
    fn test_missing_country_with_set_is_not_submittable() {
        let form = compute_form(
            &bundle(),
            Some(&json!({"useCountry": "true", "countryRetrievalMethod": "set"})),
            "changeCountryOption",
        )
        .unwrap();
        assert!(!form.is_form_submittable);
        assert_eq!(
            form.form_data,
            json!({"useCountry": "true", "countryRetrievalMethod": "set"})
        );
    }

    #[test]
    fn test_empty_flag_keeps_default() {
        let form = compute_form(&bundle(), Some(&json!({"useCountry": ""})), "reopen").unwrap();
        assert_eq!(form.form_data, json!({"useCountry": "false"}));
    }

    #[test]
    fn test_non_string_flag_counts_as_disabled() {
        for event in ["init", "reopen", "changeCountryOption"] {
            let form = compute_form(
                &bundle(),
                Some(&json!({"useCountry": true, "countryRetrievalMethod": "set"})),
                event,
            )
            .unwrap();
            assert_eq!(form.form_data["useCountry"], json!("false"), "event {event}");
            assert!(form.is_form_submittable);
        }
    }

    #[test]
    fn test_non_object_configuration_is_invalid() {
        let err = compute_form(&bundle(), Some(&json!("oops")), "init").unwrap_err();
        assert_eq!(err.kind(), "InvalidConfigurationError");
        let err = compute_form(&bundle(), Some(&Value::Null), "dummy").unwrap_err();
        assert_eq!(err.kind(), "InvalidConfigurationError");
    }

    #[test]
    fn test_weather_event_is_unsupported() {
        let err = compute_form(&bundle(), Some(&json!({})), "updateValues").unwrap_err();
        assert_eq!(err.kind(), "UnsupportedEventError");
    }
}
