use thiserror::Error;

/// A convenience `Result` alias using [`SkillboxError`].
pub type SkillboxResult<T> = Result<T, SkillboxError>;

/// Message of [`SkillboxError::NoInput`], shared by every executor.
pub const NO_INPUT_MESSAGE: &str = "Skill is called without input.";

/// Top-level error type shared by every skill.
///
/// Each variant maps to a stable kind name (see [`SkillboxError::kind`]) that
/// the hosting platform uses to classify failures.
#[derive(Error, Debug)]
pub enum SkillboxError {
    /// The executor was invoked without any input.
    #[error("{0}")]
    NoInput(String),

    /// The stored configuration is inconsistent. Detected before any network call.
    #[error("{0}")]
    Configuration(String),

    /// The runtime input is present but malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// The remote API answered with an error, or could not be reached.
    #[error("{message}")]
    RemoteService {
        /// Upstream HTTP status, absent for transport failures and timeouts.
        status: Option<u16>,
        /// Human-readable failure description.
        message: String,
    },

    /// The configuration form was invoked with an event it does not handle.
    #[error("{event} {message}")]
    UnsupportedEvent {
        /// The offending event name.
        event: String,
        /// Localized explanation appended after the event name.
        message: String,
    },

    /// The configuration form was invoked without a configuration.
    #[error("{0}")]
    InvalidConfiguration(String),

    /// Any other failure raised while building a configuration form.
    #[error("{0}")]
    Unexpected(String),

    /// No skill is registered under the requested name.
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SkillboxError {
    /// Builds a [`SkillboxError::NoInput`] with the shared message.
    pub fn no_input() -> Self {
        Self::NoInput(NO_INPUT_MESSAGE.to_string())
    }

    /// Builds a [`SkillboxError::RemoteService`] for a non-success HTTP answer.
    pub fn remote_status(status: u16, detail: impl AsRef<str>) -> Self {
        Self::RemoteService {
            status: Some(status),
            message: format!(
                "Request failed with status code {status}: {}",
                detail.as_ref()
            ),
        }
    }

    /// Builds a [`SkillboxError::RemoteService`] for a request that never got an answer.
    pub fn remote_transport(reason: impl std::fmt::Display) -> Self {
        Self::RemoteService {
            status: None,
            message: format!("Request failed: {reason}"),
        }
    }

    /// Stable name of the error kind, as reported to the hosting platform.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoInput(_) => "NoInputError",
            Self::Configuration(_) => "ConfigurationError",
            Self::InvalidInput(_) => "InvalidInputError",
            Self::RemoteService { .. } => "RemoteServiceError",
            Self::UnsupportedEvent { .. } => "UnsupportedEventError",
            Self::InvalidConfiguration(_) => "InvalidConfigurationError",
            Self::Unexpected(_) => "UnexpectedError",
            Self::UnknownSkill(_) => "UnknownSkillError",
            Self::Json(_) => "JsonError",
        }
    }

    /// Upstream HTTP status carried by remote failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteService { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_status_message() {
        let err = SkillboxError::remote_status(422, "Missing 'name' parameter");
        assert_eq!(
            err.to_string(),
            "Request failed with status code 422: Missing 'name' parameter"
        );
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.kind(), "RemoteServiceError");
    }

    #[test]
    fn test_no_input() {
        let err = SkillboxError::no_input();
        assert_eq!(err.kind(), "NoInputError");
        assert_eq!(err.to_string(), "Skill is called without input.");
    }

    #[test]
    fn test_unsupported_event_display() {
        let err = SkillboxError::UnsupportedEvent {
            event: "dummy".to_string(),
            message: "is not a valid event in the configuration of this skill".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "dummy is not a valid event in the configuration of this skill"
        );
        assert_eq!(err.status(), None);
    }
}
