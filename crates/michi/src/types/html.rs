//! Built-in `html` step type.

use michi_core::{MapError, Step, StepName, StepType};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Options of an [`HtmlStepType`] step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HtmlStepOptions {
    /// Defaults to the step name.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_true")]
    pub display_title: bool,
    /// Accepts `"true"` and `"false"` as well, since option strings are
    /// rendered before the step is built.
    #[serde(default, deserialize_with = "bool_or_string")]
    pub is_first: bool,
    #[serde(default = "default_events")]
    pub events: Value,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default = "default_attr")]
    pub attr: Value,
}

fn default_true() -> bool {
    true
}

/// Deserialize a flag given either as a bool or as a rendered `"true"` /
/// `"false"` string.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolOrStringVisitor;

    impl<'de> serde::de::Visitor<'de> for BoolOrStringVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a bool or the string \"true\" or \"false\"")
        }

        fn visit_bool<E>(self, value: bool) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_str<E>(self, value: &str) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            match value.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(E::invalid_value(serde::de::Unexpected::Str(other), &self)),
            }
        }
    }

    deserializer.deserialize_any(BoolOrStringVisitor)
}

fn default_events() -> Value {
    Value::Object(Map::new())
}

fn default_attr() -> Value {
    json!({"class": "html_text"})
}

/// A step showing a block of HTML content.
///
/// ```
/// use michi::{HtmlStepType, StepName, StepType};
/// use serde_json::json;
///
/// let step = HtmlStepType
///     .build("html", &StepName::new("intro"), json!({"content": "<p>Hi</p>"}))
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(step.option("title"), Some(&json!("intro")));
/// assert_eq!(step.option("attr"), Some(&json!({"class": "html_text"})));
/// assert!(!step.is_first());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStepType;

impl HtmlStepType {
    pub const ALIAS: &'static str = "html";
}

impl StepType for HtmlStepType {
    fn build(
        &self,
        alias: &str,
        name: &StepName,
        options: Value,
    ) -> Result<Option<Step>, MapError> {
        let options = if options.is_null() {
            Value::Object(Map::new())
        } else {
            options
        };
        let mut resolved: HtmlStepOptions = serde_json::from_value(options)
            .map_err(|e| MapError::configuration(&format!("step '{}'", name), e))?;
        if resolved.title.is_none() {
            resolved.title = Some(name.to_string());
        }

        let is_first = resolved.is_first;
        let options = serde_json::to_value(resolved)
            .map_err(|e| MapError::configuration(&format!("step '{}'", name), e))?;
        Ok(Some(Step::new(name.clone(), alias, options).with_first(is_first)))
    }
}
