//! Localized strings for configuration forms and error messages.
//!
//! Bundles are parsed once at startup into a [`LocaleCatalog`] that is then
//! shared read-only (behind an `Arc`) by every skill. Requested locales are
//! Accept-Language style strings; anything unsupported resolves to
//! [`DEFAULT_LOCALE`].

use crate::SkillboxResult;
use serde::Deserialize;
use std::collections::HashMap;

/// Locale used whenever the requested one is absent or unsupported.
pub const DEFAULT_LOCALE: &str = "en";

const EN_BUNDLE: &str = include_str!("../locales/en.json");

/// All localized strings for a single language.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleBundle {
    /// Form error messages.
    pub errors: ErrorStrings,
    /// Age estimate form strings.
    pub age_estimate: AgeEstimateStrings,
    /// Weather form strings.
    pub weather: WeatherStrings,
}

/// Messages of the form errors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorStrings {
    /// Reported when the form gets no usable configuration.
    pub configuration_is_not_valid: String,
    /// Appended after the offending event name.
    pub event_error: String,
}

/// Strings of the age estimate configuration form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeEstimateStrings {
    /// Form description.
    pub description: String,
    /// Country checkbox.
    pub use_country: LabelStrings,
    /// Link to the agify.io data page.
    pub link: TitledStrings,
    /// Retrieval method radio group.
    pub country_retrieval_method: RetrievalMethodStrings,
    /// Country code field.
    pub country_id: CountryIdStrings,
}

/// A field with a label only.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelStrings {
    /// Field label.
    pub label: String,
}

/// A field with a title and a description.
#[derive(Debug, Clone, Deserialize)]
pub struct TitledStrings {
    /// Field title.
    pub title: String,
    /// Field description.
    pub description: String,
}

/// Retrieval method radio group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalMethodStrings {
    /// Group title.
    pub title: String,
    /// Label of the `set` option.
    pub set_in_configuration: String,
    /// Label of the `provide` option.
    pub provided_at_runtime: String,
}

/// Country code field.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryIdStrings {
    /// Field title.
    pub title: String,
    /// Placeholder shown while empty.
    pub placeholder: String,
    /// Shown when the code is not ISO 3166-1 alpha-2.
    pub error: String,
}

/// Strings of the weather configuration form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherStrings {
    /// Form title.
    pub title: String,
    /// Form description.
    pub description: String,
    /// API key field.
    pub api_key: TitleOnly,
    /// Forecast horizon field.
    pub number_of_hours: TitleOnly,
}

/// A field with a title only.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleOnly {
    /// Field title.
    pub title: String,
}

/// Read-only set of locale bundles keyed by language tag.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    default: LocaleBundle,
    others: HashMap<String, LocaleBundle>,
}

impl LocaleCatalog {
    /// Creates a catalog whose default bundle is `default`.
    pub fn new(default: LocaleBundle) -> Self {
        Self {
            default,
            others: HashMap::new(),
        }
    }

    /// Parses the bundles shipped with the crate.
    pub fn builtin() -> SkillboxResult<Self> {
        let en: LocaleBundle = serde_json::from_str(EN_BUNDLE)?;
        Ok(Self::new(en))
    }

    /// Adds (or replaces) the bundle for `tag`. Tags are matched case-insensitively.
    pub fn with_bundle(mut self, tag: &str, bundle: LocaleBundle) -> Self {
        let tag = tag.to_ascii_lowercase();
        if tag == DEFAULT_LOCALE {
            self.default = bundle;
        } else {
            self.others.insert(tag, bundle);
        }
        self
    }

    /// Supported language tags, default first.
    pub fn supported(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.others.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags.insert(0, DEFAULT_LOCALE);
        tags
    }

    /// Resolves an Accept-Language style request (`"fr-CH, fr;q=0.9, en;q=0.8"`)
    /// to a bundle. Never fails.
    pub fn resolve(&self, requested: Option<&str>) -> &LocaleBundle {
        let Some(requested) = requested else {
            return &self.default;
        };

        for tag in preferred_tags(requested) {
            if tag == "*" || tag == DEFAULT_LOCALE {
                return &self.default;
            }
            if let Some(bundle) = self.others.get(&tag) {
                return bundle;
            }
            let primary = tag.split('-').next().unwrap_or_default();
            if primary == DEFAULT_LOCALE {
                return &self.default;
            }
            if let Some(bundle) = self.others.get(primary) {
                return bundle;
            }
        }

        &self.default
    }
}

/// Language tags ordered by descending quality value; ties keep request order.
fn preferred_tags(header: &str) -> Vec<String> {
    let mut weighted: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let tag = parts.next()?.trim().to_ascii_lowercase();
            if tag.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some((tag, quality))
        })
        .collect();
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
    weighted.into_iter().map(|(tag, _)| tag).collect()
}
