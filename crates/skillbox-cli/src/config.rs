//! `skillbox.toml` loading.

use serde::Deserialize;
use skillbox_builtins::Endpoints;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Environment variable consulted when a weather configuration has no `api_key`.
pub const WEATHER_API_KEY_ENV: &str = "SKILLBOX_WEATHER_API_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct SkillboxConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Locale used when none is passed on the command line.
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_agify_url")]
    pub agify_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            agify_url: default_agify_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_weather_timeout_ms")]
    pub weather_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            weather_timeout_ms: default_weather_timeout_ms(),
        }
    }
}

fn default_weather_url() -> String {
    skillbox_builtins::weather::OPENWEATHER_FORECAST_URL.to_string()
}
fn default_agify_url() -> String {
    skillbox_builtins::age_estimate::AGIFY_URL.to_string()
}
fn default_weather_timeout_ms() -> u64 {
    skillbox_builtins::age_estimate::DEFAULT_TIMEOUT_MS
}

impl SkillboxConfig {
    /// Reads `path`. A missing file yields the defaults.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            weather_url: self.endpoints.weather_url.clone(),
            agify_url: self.endpoints.agify_url.clone(),
            weather_timeout: Duration::from_millis(self.http.weather_timeout_ms),
        }
    }
}

/// Fills a missing weather `api_key` from `env_key`. Other skills are untouched.
pub fn apply_env_api_key(
    skill: &str,
    mut configuration: serde_json::Value,
    env_key: Option<String>,
) -> serde_json::Value {
    if skill != "get_weather" {
        return configuration;
    }
    if let (Some(key), Some(obj)) = (env_key, configuration.as_object_mut()) {
        if !obj.contains_key("api_key") {
            obj.insert("api_key".to_string(), serde_json::Value::String(key));
        }
    }
    configuration
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SkillboxConfig::load(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(config.endpoints(), Endpoints::default());
        assert_eq!(config.locale, None);
    }

    #[tokio::test]
    async fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skillbox.toml");
        std::fs::write(
            &path,
            r#"locale = "en-GB"

[endpoints]
agify_url = "http://localhost:9000/"

[http]
weather_timeout_ms = 250
"#,
        )
        .unwrap();

        let config = SkillboxConfig::load(&path).await.unwrap();
        let endpoints = config.endpoints();
        assert_eq!(endpoints.agify_url, "http://localhost:9000/");
        assert_eq!(endpoints.weather_url, default_weather_url());
        assert_eq!(endpoints.weather_timeout, Duration::from_millis(250));
        assert_eq!(config.locale.as_deref(), Some("en-GB"));
    }

    #[tokio::test]
    async fn test_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skillbox.toml");
        std::fs::write(&path, "[endpoints\n").unwrap();
        assert!(SkillboxConfig::load(&path).await.is_err());
    }

    #[test]
    fn test_env_api_key() {
        let filled = apply_env_api_key("get_weather", json!({}), Some("k".into()));
        assert_eq!(filled, json!({"api_key": "k"}));

        let kept = apply_env_api_key("get_weather", json!({"api_key": "mine"}), Some("k".into()));
        assert_eq!(kept, json!({"api_key": "mine"}));

        let other = apply_env_api_key("age_estimate", json!({}), Some("k".into()));
        assert_eq!(other, json!({}));
    }
}
