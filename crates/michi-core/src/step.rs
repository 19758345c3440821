//! Step types and the built step node.

use crate::error::MapError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Debug};

/// Type-safe step name wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepName(String);

impl StepName {
    /// Creates a new StepName.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the step name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StepName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for StepName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for StepName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for StepName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Assembled steps of a map, in insertion order.
pub type StepMap = IndexMap<StepName, Step>;

/// A named, typed node of a workflow map with context-resolved options.
///
/// Steps are produced by a [`StepType`] during assembly and are not mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    name: StepName,
    type_alias: String,
    options: Value,
    first: bool,
}

impl Step {
    /// Creates a step that does not claim to be the first one.
    pub fn new(name: impl Into<StepName>, type_alias: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            type_alias: type_alias.into(),
            options,
            first: false,
        }
    }

    /// Marks whether the step asks to be the map's entry point.
    pub fn with_first(mut self, first: bool) -> Self {
        self.first = first;
        self
    }

    pub fn name(&self) -> &StepName {
        &self.name
    }

    pub fn type_alias(&self) -> &str {
        &self.type_alias
    }

    /// Returns the resolved options.
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Returns a single resolved option, if present.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Returns `true` if the step asks to be the map's entry point.
    pub fn is_first(&self) -> bool {
        self.first
    }
}

/// Builds steps of one kind from merged options.
///
/// Implementations are registered under an alias in a
/// [`StepTypeRegistry`](crate::StepTypeRegistry).
///
/// # Examples
///
/// ```
/// use michi_core::{MapError, Step, StepName, StepType};
/// use serde_json::Value;
///
/// #[derive(Debug)]
/// struct HiddenUnlessEnabled;
///
/// impl StepType for HiddenUnlessEnabled {
///     fn build(&self, alias: &str, name: &StepName, options: Value) -> Result<Option<Step>, MapError> {
///         if options.get("enabled") != Some(&Value::Bool(true)) {
///             return Ok(None);
///         }
///         Ok(Some(Step::new(name.clone(), alias, options)))
///     }
/// }
///
/// let hidden = HiddenUnlessEnabled
///     .build("toggle", &StepName::new("intro"), serde_json::json!({}))
///     .unwrap();
/// assert!(hidden.is_none());
/// ```
pub trait StepType: Send + Sync + Debug {
    /// Builds the step declared as `name` from its merged options.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(step))` - The step is part of the map
    /// - `Ok(None)` - The step is left out for this request
    /// - `Err(error)` - The options are invalid
    fn build(&self, alias: &str, name: &StepName, options: Value)
        -> Result<Option<Step>, MapError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_name() {
        let name = StepName::new("test");
        assert_eq!(name.as_str(), "test");

        let name: StepName = "test".into();
        assert_eq!(name, "test");
    }

    #[test]
    fn test_step_accessors() {
        let step = Step::new("intro", "html", json!({"title": "Welcome"}));
        assert_eq!(step.name(), &StepName::new("intro"));
        assert_eq!(step.type_alias(), "html");
        assert_eq!(step.option("title"), Some(&json!("Welcome")));
        assert_eq!(step.option("missing"), None);
        assert!(!step.is_first());
        assert!(step.with_first(true).is_first());
    }

    #[test]
    fn test_step_map_lookup_by_str() {
        let mut steps = StepMap::new();
        steps.insert(StepName::new("a"), Step::new("a", "html", Value::Null));
        assert!(steps.contains_key("a"));
        assert!(steps.get("b").is_none());
    }
}
