//! Weather forecast skill backed by the OpenWeatherMap 5 day / 3 hour API.

use crate::remote_host;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use skillbox_core::locale::WeatherStrings;
use skillbox_core::{
    ExecutionContext, FormEvent, FormResponse, LocaleBundle, LocaleCatalog, SkillboxError,
    SkillboxResult,
};
use skillbox_skills::{RemoteClient, Skill, SkillDescriptor};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, Instrument};

/// Public OpenWeatherMap forecast endpoint.
pub const OPENWEATHER_FORECAST_URL: &str = "http://api.openweathermap.org/data/2.5/forecast";

/// Forecast horizon used when the configuration does not set one.
pub const DEFAULT_NUMBER_OF_HOURS: i64 = 6;

/// The API reports one entry every 3 hours.
const HOURS_PER_ENTRY: f64 = 3.0;

const UPDATE_EVENT: &str = "updateValues";
const SNIPPET: &str = "// Snippet code to get and execute a skill\n\
const skill = task.getSkill(\"<SKILL_NAME>\");\n\
const result = await skill.execute(<SKILL_INPUT>);\n\
task.context.logger.info(result);\n\
return result;";

/// Stored configuration of the weather skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Never logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Forecast horizon in hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_hours: Option<i64>,
}

impl WeatherConfig {
    /// Reads the recognized fields. Values of the wrong type count as absent.
    pub fn from_json(value: &Value) -> Self {
        Self {
            api_key: value
                .get("api_key")
                .and_then(Value::as_str)
                .map(str::to_string),
            number_of_hours: value.get("number_of_hours").and_then(Value::as_i64),
        }
    }

    fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Number of 3-hour entries covering the configured horizon.
    pub fn entry_count(&self) -> usize {
        let hours = self.number_of_hours.unwrap_or(DEFAULT_NUMBER_OF_HOURS) as f64;
        (hours / HOURS_PER_ENTRY).ceil().max(0.0) as usize
    }

    /// Defaults overlaid with the configured values.
    fn merged_over_defaults(&self) -> Self {
        Self {
            api_key: Some(self.api_key.clone().unwrap_or_default()),
            number_of_hours: Some(self.number_of_hours.unwrap_or(DEFAULT_NUMBER_OF_HOURS)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    #[serde(default)]
    city: Value,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp_max: f64,
    temp_min: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
}

#[derive(Debug, Serialize)]
struct ForecastSlot {
    time: i64,
    temp: TemperatureRange,
    weather: Option<String>,
}

#[derive(Debug, Serialize)]
struct TemperatureRange {
    max: f64,
    min: f64,
}

#[derive(Debug, Serialize)]
struct WeatherOutput {
    data: Vec<ForecastSlot>,
    city: Value,
}

impl WeatherOutput {
    fn project(response: ForecastResponse, entries: usize) -> Self {
        let data = response
            .list
            .into_iter()
            .take(entries)
            .map(|entry| ForecastSlot {
                time: entry.dt,
                temp: TemperatureRange {
                    max: entry.main.temp_max,
                    min: entry.main.temp_min,
                },
                weather: entry.weather.into_iter().next().map(|c| c.main),
            })
            .collect();
        Self {
            data,
            city: response.city,
        }
    }
}

/// Fetches a metric forecast for a city.
pub struct GetWeatherSkill {
    descriptor: SkillDescriptor,
    client: RemoteClient,
    base_url: String,
    timeout: Duration,
    catalog: Arc<LocaleCatalog>,
}

impl GetWeatherSkill {
    /// Creates the skill against the public OpenWeatherMap endpoint.
    pub fn new(catalog: Arc<LocaleCatalog>) -> SkillboxResult<Self> {
        Ok(Self {
            descriptor: SkillDescriptor {
                name: "get_weather".to_string(),
                description: "Get the weather forecast for a city.".to_string(),
                remote_host: remote_host(OPENWEATHER_FORECAST_URL),
            },
            client: RemoteClient::new()?,
            base_url: OPENWEATHER_FORECAST_URL.to_string(),
            timeout: Duration::from_secs(5),
            catalog,
        })
    }

    /// Points the executor at another forecast endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self.descriptor.remote_host = remote_host(&self.base_url);
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn forecast(&self, configuration: &Value, input: &Value) -> SkillboxResult<Value> {
        let config = WeatherConfig::from_json(configuration);
        let city = input.get("city").and_then(Value::as_str);
        info!(
            city = city.unwrap_or_default(),
            number_of_hours = ?config.number_of_hours,
            has_api_key = config.has_api_key(),
            "Fetching weather"
        );

        let mut query = Vec::with_capacity(3);
        if let Some(city) = city {
            query.push(("q", city.to_string()));
        }
        if let Some(api_key) = &config.api_key {
            query.push(("appid", api_key.clone()));
        }
        query.push(("units", "metric".to_string()));

        let body = self
            .client
            .get_json(&self.base_url, &query, self.timeout)
            .await?;
        let response: ForecastResponse =
            serde_json::from_value(body).map_err(|e| SkillboxError::RemoteService {
                status: None,
                message: format!("Unexpected response body: {e}"),
            })?;

        let output = WeatherOutput::project(response, config.entry_count());
        debug!(entries = output.data.len(), "Forecast projected");
        Ok(serde_json::to_value(output)?)
    }
}

fn config_schema(strings: &WeatherStrings) -> Value {
    json!({
        "type": "object",
        "title": strings.title,
        "description": strings.description,
        "required": ["api_key"],
        "properties": {
            "api_key": {
                "title": strings.api_key.title,
                "type": "string"
            },
            "number_of_hours": {
                "title": strings.number_of_hours.title,
                "type": "integer",
                "minimum": 3,
                "maximum": 36,
                "multipleOf": 3
            }
        }
    })
}

fn ui_schema() -> Value {
    json!({
        "api_key": {
            "ui:autofocus": true,
            "ui:options": { "triggerEvent": UPDATE_EVENT }
        },
        "number_of_hours": {
            "ui:widget": "range",
            "ui:options": { "triggerEvent": UPDATE_EVENT }
        }
    })
}

fn compute_form(
    bundle: &LocaleBundle,
    configuration: Option<&Value>,
    event: &str,
) -> SkillboxResult<FormResponse> {
    let Some(configuration) = configuration.filter(|c| c.is_object()) else {
        return Err(SkillboxError::InvalidConfiguration(
            bundle.errors.configuration_is_not_valid.clone(),
        ));
    };
    let config = WeatherConfig::from_json(configuration);

    let (form_data, submittable) = match FormEvent::parse(event) {
        Some(FormEvent::Init) => (config.merged_over_defaults(), false),
        Some(FormEvent::Reopen) => (config.merged_over_defaults(), config.has_api_key()),
        Some(FormEvent::UpdateValues) => (config.clone(), config.has_api_key()),
        _ => {
            return Err(SkillboxError::UnsupportedEvent {
                event: event.to_string(),
                message: bundle.errors.event_error.clone(),
            })
        }
    };

    let form_data = serde_json::to_value(&form_data)
        .map_err(|e| SkillboxError::Unexpected(e.to_string()))?;
    Ok(FormResponse {
        schema: config_schema(&bundle.weather),
        ui_schema: ui_schema(),
        form_data,
        is_form_submittable: submittable,
    })
}

#[async_trait]
impl Skill for GetWeatherSkill {
    fn descriptor(&self) -> &SkillDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        configuration: &Value,
        input: Option<&Value>,
        ctx: &ExecutionContext,
    ) -> SkillboxResult<Value> {
        let Some(input) = input.filter(|v| !v.is_null()) else {
            error!(
                skill = %ctx.skill,
                invocation = %ctx.invocation_id,
                "Skill is called with no input"
            );
            return Err(SkillboxError::no_input());
        };
        self.forecast(configuration, input)
            .instrument(ctx.span())
            .await
    }

    fn form(
        &self,
        configuration: Option<&Value>,
        event: &str,
        locale: Option<&str>,
    ) -> SkillboxResult<FormResponse> {
        compute_form(self.catalog.resolve(locale), configuration, event)
    }

    fn input_schema(&self, _configuration: &Value) -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Input schema for skill: Get Weather",
            "type": "object",
            "properties": {
                "city": {
                    "description": "Name of the city to get the forecast for",
                    "type": "string"
                }
            },
            "required": ["city"]
        })
    }

    fn output_schema(&self, _configuration: &Value) -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "Output schema for skill: Get Weather",
            "type": "object",
            "properties": {
                "data": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "time": { "type": "integer" },
                            "temp": {
                                "type": "object",
                                "properties": {
                                    "max": { "type": "number" },
                                    "min": { "type": "number" }
                                }
                            },
                            "weather": { "type": ["string", "null"] }
                        },
                        "required": ["time", "temp", "weather"]
                    }
                },
                "city": { "type": "object" }
            },
            "required": ["data", "city"]
        })
    }

    fn snippet(&self, _configuration: &Value) -> String {
        SNIPPET.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bundle() -> LocaleBundle {
        LocaleCatalog::builtin().unwrap().resolve(None).clone()
    }

    #[test]
    fn test_entry_count() {
        let count = |hours: i64| {
            WeatherConfig {
                api_key: None,
                number_of_hours: Some(hours),
            }
            .entry_count()
        };
        assert_eq!(count(6), 2);
        assert_eq!(count(7), 3);
        assert_eq!(count(36), 12);
        assert_eq!(count(0), 0);
        assert_eq!(count(-3), 0);
        assert_eq!(WeatherConfig::default().entry_count(), 2);
    }

    #[test]
    fn test_init_merges_over_defaults() {
        let form = compute_form(&bundle(), Some(&json!({"number_of_hours": 12})), "init").unwrap();
        assert_eq!(form.form_data, json!({"api_key": "", "number_of_hours": 12}));
        assert!(!form.is_form_submittable);
        assert_eq!(form.schema["title"], "Weather report configurator");
    }

    #[test]
    fn test_reopen_requires_api_key() {
        let form = compute_form(&bundle(), Some(&json!({"api_key": "k"})), "reopen").unwrap();
        assert_eq!(form.form_data, json!({"api_key": "k", "number_of_hours": 6}));
        assert!(form.is_form_submittable);
        let form = compute_form(&bundle(), Some(&json!({"api_key": ""})), "reopen").unwrap();
        assert!(!form.is_form_submittable);
    }

    #[test]
    fn test_update_values_replaces_wholesale() {
        let form = compute_form(&bundle(), Some(&json!({"api_key": "k"})), "updateValues").unwrap();
        assert_eq!(form.form_data, json!({"api_key": "k"}));
        assert!(form.is_form_submittable);
        assert_eq!(form.ui_schema["api_key"]["ui:options"]["triggerEvent"], "updateValues");
    }

    #[test]
    fn test_form_errors() {
        let err = compute_form(&bundle(), Some(&json!({})), "changeCountryOption").unwrap_err();
        assert_eq!(
            err.to_string(),
            "changeCountryOption is not a valid event in the configuration of this skill"
        );
        let err = compute_form(&bundle(), None, "init").unwrap_err();
        assert_eq!(err.kind(), "InvalidConfigurationError");
    }

    #[test]
    fn test_projection_handles_missing_condition() {
        let response: ForecastResponse = serde_json::from_value(json!({
            "list": [
                {"dt": 1, "main": {"temp_max": 3.5, "temp_min": 1.0}, "weather": []},
                {"dt": 2, "main": {"temp_max": 4.0, "temp_min": 2.0}, "weather": [{"main": "Rain"}]}
            ]
        }))
        .unwrap();
        let output = serde_json::to_value(WeatherOutput::project(response, 5)).unwrap();
        assert_eq!(output["data"][0]["weather"], Value::Null);
        assert_eq!(output["data"][1]["weather"], "Rain");
        assert_eq!(output["data"][1]["temp"]["max"], 4.0);
        assert_eq!(output["city"], Value::Null);
    }
}
