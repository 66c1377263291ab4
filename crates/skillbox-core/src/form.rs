use serde::{Deserialize, Serialize};

/// Output of a configuration form computation.
///
/// Field names follow the host's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    /// JSON Schema describing valid configuration.
    pub schema: serde_json::Value,
    /// Rendering hints for the host's form UI.
    pub ui_schema: serde_json::Value,
    /// Pre-filled form values.
    pub form_data: serde_json::Value,
    /// Whether the current form data may be saved.
    pub is_form_submittable: bool,
}

/// Why the configuration form is being (re)computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// First rendering of the form.
    Init,
    /// The skill is opened again for edition.
    Reopen,
    /// A field of the weather form changed.
    UpdateValues,
    /// A country-related field of the age estimate form changed.
    ChangeCountryOption,
}

impl FormEvent {
    /// Parses a host event name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "init" => Some(Self::Init),
            "reopen" => Some(Self::Reopen),
            "updateValues" => Some(Self::UpdateValues),
            "changeCountryOption" => Some(Self::ChangeCountryOption),
            _ => None,
        }
    }

    /// Wire name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Reopen => "reopen",
            Self::UpdateValues => "updateValues",
            Self::ChangeCountryOption => "changeCountryOption",
        }
    }
}
