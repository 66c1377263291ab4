use crate::skill::{Skill, SkillDescriptor};
use skillbox_core::{ExecutionContext, FormResponse, SkillboxError, SkillboxResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Central registry for all available skills.
pub struct SkillRegistry {
    skills: HashMap<String, Arc<dyn Skill>>,
}

impl SkillRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            skills: HashMap::new(),
        }
    }

    /// Registers `skill` under its descriptor name, replacing any previous one.
    pub fn register(&mut self, skill: Arc<dyn Skill>) {
        let name = skill.descriptor().name.clone();
        info!(skill = %name, "Registered skill");
        self.skills.insert(name, skill);
    }

    /// Looks a skill up by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Skill>> {
        self.skills.get(name)
    }

    /// Looks a skill up, failing with [`SkillboxError::UnknownSkill`].
    pub fn require(&self, name: &str) -> SkillboxResult<&Arc<dyn Skill>> {
        self.skills.get(name).ok_or_else(|| {
            warn!(skill = %name, "Lookup of unregistered skill");
            SkillboxError::UnknownSkill(name.to_string())
        })
    }

    /// Descriptors sorted by skill name.
    pub fn list_descriptors(&self) -> Vec<&SkillDescriptor> {
        let mut descriptors: Vec<&SkillDescriptor> =
            self.skills.values().map(|s| s.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Execute a skill by name with a fresh [`ExecutionContext`].
    pub async fn execute(
        &self,
        name: &str,
        configuration: &serde_json::Value,
        input: Option<&serde_json::Value>,
    ) -> SkillboxResult<serde_json::Value> {
        let skill = self.require(name)?;
        let ctx = ExecutionContext::new(name);
        skill.execute(configuration, input, &ctx).await
    }

    /// Compute the configuration form of a skill by name.
    pub fn form(
        &self,
        name: &str,
        configuration: Option<&serde_json::Value>,
        event: &str,
        locale: Option<&str>,
    ) -> SkillboxResult<FormResponse> {
        self.require(name)?.form(configuration, event, locale)
    }

    /// Number of registered skills.
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}
