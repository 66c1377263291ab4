//! Configuration, input and output schemas of the age estimate skill.
//!
//! The configuration schema uses draft-07 `dependencies` + `oneOf` to express
//! "field B only exists when field A has value X". [`Branch`] builds one arm of
//! such a `oneOf` and [`one_of_dependency`] wraps the arms under their
//! discriminant, so nested conditionals compose without hand-written nesting.

use super::config::{AgeEstimateConfig, CountryRetrievalMethod, DEFAULT_TIMEOUT_MS};
use serde_json::{json, Map, Value};
use skillbox_core::locale::AgeEstimateStrings;

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";
const AGIFY_DATA_URL: &str = "https://agify.io/our-data";

/// One arm of a `oneOf`, selected when `discriminant` equals `value`.
#[derive(Debug, Clone)]
pub struct Branch {
    properties: Map<String, Value>,
    required: Vec<String>,
    dependencies: Option<Value>,
}

impl Branch {
    /// Starts an arm whose discriminant is pinned to `value`.
    pub fn new(discriminant: &str, value: &str) -> Self {
        let mut properties = Map::new();
        properties.insert(discriminant.to_string(), json!({ "enum": [value] }));
        Self {
            properties,
            required: Vec::new(),
            dependencies: None,
        }
    }

    /// Adds a property that only exists on this arm.
    pub fn property(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    /// Marks `name` as required on this arm.
    pub fn required(mut self, name: &str) -> Self {
        self.required.push(name.to_string());
        self
    }

    /// Nests a further conditional, as produced by [`one_of_dependency`].
    pub fn dependencies(mut self, dependencies: Value) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    /// Renders the arm. Empty `required` and absent `dependencies` are omitted.
    pub fn into_value(self) -> Value {
        let mut arm = Map::new();
        arm.insert("properties".to_string(), Value::Object(self.properties));
        if !self.required.is_empty() {
            arm.insert("required".to_string(), json!(self.required));
        }
        if let Some(dependencies) = self.dependencies {
            arm.insert("dependencies".to_string(), dependencies);
        }
        Value::Object(arm)
    }
}

/// `{ "<discriminant>": { "oneOf": [arms...] } }`
pub fn one_of_dependency(discriminant: &str, branches: Vec<Branch>) -> Value {
    let arms: Vec<Value> = branches.into_iter().map(Branch::into_value).collect();
    let mut dependency = Map::new();
    dependency.insert(discriminant.to_string(), json!({ "oneOf": arms }));
    Value::Object(dependency)
}

/// Configuration form schema. `country_id_error` annotates the nested
/// `countryId` property when the configured code is rejected.
pub fn config_schema(strings: &AgeEstimateStrings, country_id_error: Option<&str>) -> Value {
    let set = CountryRetrievalMethod::SetInConfiguration.as_str();
    let provide = CountryRetrievalMethod::ProvidedAtRuntime.as_str();

    let mut country_id = json!({
        "title": strings.country_id.title,
        "type": "string"
    });
    if let (Some(error), Some(obj)) = (country_id_error, country_id.as_object_mut()) {
        obj.insert("error".to_string(), json!(error));
    }

    let retrieval = one_of_dependency(
        "countryRetrievalMethod",
        vec![
            Branch::new("countryRetrievalMethod", set)
                .property("countryId", country_id)
                .required("countryId"),
            Branch::new("countryRetrievalMethod", provide),
        ],
    );

    let use_country = one_of_dependency(
        "useCountry",
        vec![
            Branch::new("useCountry", "true")
                .property(
                    "countryRetrievalMethod",
                    json!({
                        "title": strings.country_retrieval_method.title,
                        "type": "string",
                        "enum": [set, provide],
                        "enumNames": [
                            strings.country_retrieval_method.set_in_configuration,
                            strings.country_retrieval_method.provided_at_runtime
                        ],
                        "default": set
                    }),
                )
                .required("countryRetrievalMethod")
                .dependencies(retrieval),
            Branch::new("useCountry", "false"),
        ],
    );

    json!({
        "type": "object",
        "description": strings.description,
        "properties": {
            "useCountry": {
                "type": "string",
                "enum": ["true", "false"],
                "enumNames": [strings.use_country.label, strings.use_country.label]
            },
            "link": {
                "type": "string",
                "title": strings.link.title,
                "description": strings.link.description,
                "url": AGIFY_DATA_URL
            }
        },
        "required": ["useCountry"],
        "dependencies": use_country
    })
}

fn country_id_property(description: &str) -> Value {
    json!({
        "description": description,
        "type": "string"
    })
}

fn push_required_country(schema: &mut Value, description: &str) {
    if let Some(properties) = schema["properties"].as_object_mut() {
        properties.insert("countryId".to_string(), country_id_property(description));
    }
    if let Some(required) = schema["required"].as_array_mut() {
        required.push(json!("countryId"));
    }
}

/// Input schema. `countryId` is required only when it is provided at runtime.
pub fn input_schema(config: &AgeEstimateConfig) -> Value {
    let mut schema = json!({
        "$schema": DRAFT_07,
        "title": "Input schema for skill: Age Estimate",
        "type": "object",
        "properties": {
            "name": {
                "description": "The first name to be used to estimate the age",
                "type": "string"
            },
            "timeout": {
                "description": format!("Timeout in milliseconds before canceling requests. This timeout is set by default to `{DEFAULT_TIMEOUT_MS}` ms."),
                "type": "integer",
                "default": DEFAULT_TIMEOUT_MS,
                "minimum": 0
            }
        },
        "required": ["name"]
    });
    if config.country_at_runtime() {
        push_required_country(
            &mut schema,
            "The ID of the country (in ISO 3166-1 alpha-2 format) to be used to estimate the age",
        );
    }
    schema
}

/// Output schema. `age` is null for names the service does not know.
pub fn output_schema(config: &AgeEstimateConfig) -> Value {
    let mut schema = json!({
        "$schema": DRAFT_07,
        "title": "Output schema for skill: Age Estimate",
        "type": "object",
        "properties": {
            "name": {
                "description": "The first name used to estimate the age",
                "type": "string"
            },
            "age": {
                "description": "The estimated age",
                "type": ["integer", "null"]
            },
            "count": {
                "description": "The number of persons with the given first name who are used to estimate the age",
                "type": "integer"
            }
        },
        "required": ["name", "age", "count"]
    });
    if config.country_at_runtime() {
        push_required_country(
            &mut schema,
            "The ID of the country (in ISO 3166-1 alpha-2 format) used to estimate the age",
        );
    }
    schema
}

/// Usage snippet with a sample input matching [`input_schema`].
pub fn snippet(config: &AgeEstimateConfig) -> String {
    let input = if config.country_at_runtime() {
        "const input = {\n\tname: \"Jane\",\n\tcountryId: \"US\"\n};\n"
    } else {
        "const input = {\n\tname: \"Jane\"\n};\n"
    };
    format!(
        "// Snippet code to get and execute a skill\n\
         const skill = task.getSkill(\"<SKILL_NAME>\");\n\
         {input}\
         const result = await skill.execute(input);\n\
         task.context.logger.info(result);\n\
         return result;"
    )
}
