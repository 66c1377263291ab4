#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Registry dispatch tests using a minimal in-test skill.

use async_trait::async_trait;
use serde_json::{json, Value};
use skillbox_core::{ExecutionContext, FormResponse, SkillboxError, SkillboxResult};
use skillbox_skills::{Skill, SkillDescriptor, SkillRegistry};
use std::sync::Arc;

struct EchoSkill {
    descriptor: SkillDescriptor,
}

impl EchoSkill {
    fn new(name: &str) -> Self {
        Self {
            descriptor: SkillDescriptor {
                name: name.to_string(),
                description: "Echoes its input".to_string(),
                remote_host: "localhost".to_string(),
            },
        }
    }
}

#[async_trait]
impl Skill for EchoSkill {
    fn descriptor(&self) -> &SkillDescriptor {
        &self.descriptor
    }

    async fn execute(
        &self,
        _configuration: &Value,
        input: Option<&Value>,
        ctx: &ExecutionContext,
    ) -> SkillboxResult<Value> {
        let input = input.ok_or_else(|| SkillboxError::NoInput("no input".into()))?;
        Ok(json!({"skill": ctx.skill, "echo": input}))
    }

    fn form(
        &self,
        configuration: Option<&Value>,
        event: &str,
        _locale: Option<&str>,
    ) -> SkillboxResult<FormResponse> {
        Ok(FormResponse {
            schema: json!({"type": "object"}),
            ui_schema: json!({}),
            form_data: configuration.cloned().unwrap_or(Value::Null),
            is_form_submittable: event == "init",
        })
    }

    fn input_schema(&self, _configuration: &Value) -> Value {
        json!({"type": "object"})
    }

    fn output_schema(&self, _configuration: &Value) -> Value {
        json!({"type": "object"})
    }

    fn snippet(&self, _configuration: &Value) -> String {
        "echo".to_string()
    }
}

fn registry() -> SkillRegistry {
    let mut registry = SkillRegistry::new();
    registry.register(Arc::new(EchoSkill::new("zeta")));
    registry.register(Arc::new(EchoSkill::new("alpha")));
    registry
}

#[test]
fn descriptors_are_sorted_by_name() {
    let registry = registry();
    assert_eq!(registry.skill_count(), 2);
    let names: Vec<&str> = registry
        .list_descriptors()
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn registering_same_name_replaces() {
    let mut registry = registry();
    registry.register(Arc::new(EchoSkill::new("alpha")));
    assert_eq!(registry.skill_count(), 2);
}

#[tokio::test]
async fn execute_dispatches_by_name() {
    let registry = registry();
    let result = registry
        .execute("alpha", &json!({}), Some(&json!({"x": 1})))
        .await
        .unwrap();
    assert_eq!(result["skill"], "alpha");
    assert_eq!(result["echo"]["x"], 1);
}

#[tokio::test]
async fn execute_unknown_skill_fails() {
    let registry = registry();
    let err = registry.execute("missing", &json!({}), None).await.unwrap_err();
    assert_eq!(err.kind(), "UnknownSkillError");
    assert!(err.to_string().contains("missing"));
}

#[test]
fn form_dispatches_by_name() {
    let registry = registry();
    let form = registry
        .form("zeta", Some(&json!({"a": 1})), "init", None)
        .unwrap();
    assert!(form.is_form_submittable);
    assert_eq!(form.form_data, json!({"a": 1}));
    assert!(registry.form("nope", None, "init", None).is_err());
}
