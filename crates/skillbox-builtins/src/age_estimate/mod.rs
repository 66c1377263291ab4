//! First-name age estimate skill backed by agify.io.

/// Configuration and input parsing.
pub mod config;
/// Configuration form.
pub mod form;
/// JSON schemas and snippet.
pub mod schema;

pub use config::{AgeEstimateConfig, AgeEstimateInput, CountryRetrievalMethod, DEFAULT_TIMEOUT_MS};
pub use form::AgeFormData;

use crate::remote_host;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skillbox_core::{ExecutionContext, FormResponse, LocaleCatalog, SkillboxError, SkillboxResult};
use skillbox_skills::{RemoteClient, Skill, SkillDescriptor};
use std::sync::Arc;
use tracing::{error, info, Instrument};

/// Public agify.io endpoint.
pub const AGIFY_URL: &str = "https://api.agify.io/";

#[derive(Debug, Deserialize)]
struct AgifyResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    country_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AgeEstimateOutput {
    name: String,
    /// `null` when the name is unknown to the service.
    age: Option<u32>,
    count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_id: Option<String>,
}

/// Estimates the average age of people carrying a given first name,
/// optionally restricted to one country.
pub struct AgeEstimateSkill {
    descriptor: SkillDescriptor,
    client: RemoteClient,
    base_url: String,
    catalog: Arc<LocaleCatalog>,
}

impl AgeEstimateSkill {
    /// Creates the skill against the public agify endpoint.
    pub fn new(catalog: Arc<LocaleCatalog>) -> SkillboxResult<Self> {
        Ok(Self {
            descriptor: SkillDescriptor {
                name: "age_estimate".to_string(),
                description: "Estimate the age of a person from their first name.".to_string(),
                remote_host: remote_host(AGIFY_URL),
            },
            client: RemoteClient::new()?,
            base_url: AGIFY_URL.to_string(),
            catalog,
        })
    }

    /// Points the executor at another agify-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self.descriptor.remote_host = remote_host(&self.base_url);
        self
    }

    async fn estimate(&self, configuration: &Value, input: &Value) -> SkillboxResult<Value> {
        info!(input = %input, "Skill is called with input");
        info!(configuration = %configuration, "Skill is called with configuration");

        let config = AgeEstimateConfig::from_json(configuration);
        let input = AgeEstimateInput::from_json(input)?;
        let country_id = config::resolve_country(&config, &input)?;

        let mut query = Vec::with_capacity(2);
        if let Some(name) = &input.name {
            query.push(("name", name.clone()));
        }
        if let Some(country_id) = &country_id {
            query.push(("country_id", country_id.clone()));
        }

        let body = self
            .client
            .get_json(&self.base_url, &query, input.timeout())
            .await?;
        let estimate: AgifyResponse =
            serde_json::from_value(body).map_err(|e| SkillboxError::RemoteService {
                status: None,
                message: format!("Unexpected response body: {e}"),
            })?;

        let output = AgeEstimateOutput {
            name: estimate.name.or(input.name).unwrap_or_default(),
            age: estimate.age,
            count: estimate.count,
            country_id: country_id.map(|requested| estimate.country_id.unwrap_or(requested)),
        };
        info!(age = ?output.age, count = output.count, "Age estimated");
        Ok(serde_json::to_value(output)?)
    }
}

#[async_trait]
impl Skill for AgeEstimateSkill {
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
        self.estimate(configuration, input)
            .instrument(ctx.span())
            .await
    }

    fn form(
        &self,
        configuration: Option<&Value>,
        event: &str,
        locale: Option<&str>,
    ) -> SkillboxResult<FormResponse> {
        form::compute_form(self.catalog.resolve(locale), configuration, event)
    }

    fn input_schema(&self, configuration: &Value) -> Value {
        schema::input_schema(&AgeEstimateConfig::from_json(configuration))
    }

    fn output_schema(&self, configuration: &Value) -> Value {
        schema::output_schema(&AgeEstimateConfig::from_json(configuration))
    }

    fn snippet(&self, configuration: &Value) -> String {
        schema::snippet(&AgeEstimateConfig::from_json(configuration))
    }
}
