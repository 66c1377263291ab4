use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skillbox_core::{ExecutionContext, FormResponse, SkillboxResult};

/// Metadata describing a skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDescriptor {
    /// Registry key, e.g. `get_weather`.
    pub name: String,
    /// One-line summary.
    pub description: String,
    /// Host of the remote API the executor talks to.
    pub remote_host: String,
}

/// Contract every platform skill implements: executor, configuration form,
/// schema declarations and usage snippet.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Metadata of this skill.
    fn descriptor(&self) -> &SkillDescriptor;

    /// Runs the skill once. `input` is `None` when the host sent nothing.
    async fn execute(
        &self,
        configuration: &serde_json::Value,
        input: Option<&serde_json::Value>,
        ctx: &ExecutionContext,
    ) -> SkillboxResult<serde_json::Value>;

    /// Computes the configuration form for `event`. Pure: same arguments, same answer.
    fn form(
        &self,
        configuration: Option<&serde_json::Value>,
        event: &str,
        locale: Option<&str>,
    ) -> SkillboxResult<FormResponse>;

    /// JSON schema of the input accepted under `configuration`.
    fn input_schema(&self, configuration: &serde_json::Value) -> serde_json::Value;

    /// JSON schema of the output produced under `configuration`.
    fn output_schema(&self, configuration: &serde_json::Value) -> serde_json::Value;

    /// Usage snippet for the hosting platform.
    fn snippet(&self, configuration: &serde_json::Value) -> String;
}
