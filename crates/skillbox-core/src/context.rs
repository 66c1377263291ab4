use tracing::Span;
use uuid::Uuid;

/// Per-invocation context handed to a skill executor.
///
/// Stands in for the host's logger object: every log line emitted inside
/// [`ExecutionContext::span`] carries the skill name and invocation id.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique identifier of this invocation.
    pub invocation_id: Uuid,
    /// Name of the skill being executed.
    pub skill: String,
}

impl ExecutionContext {
    /// Creates a context with a fresh invocation id.
    pub fn new(skill: impl Into<String>) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            skill: skill.into(),
        }
    }

    /// Tracing span scoping all log output of this invocation.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "skill_execution",
            skill = %self.skill,
            invocation = %self.invocation_id
        )
    }
}
