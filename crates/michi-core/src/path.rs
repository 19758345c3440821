//! Path types and the built edge.

use crate::error::MapError;
use crate::step::{Step, StepMap, StepName};
use serde_json::Value;
use std::fmt::Debug;

/// A directed, typed edge leaving a source step.
///
/// The source is held by name and always names a step of the map the path
/// was assembled into.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    type_alias: String,
    options: Value,
    source: StepName,
}

impl Path {
    /// Creates a path leaving `source`.
    pub fn new(type_alias: impl Into<String>, options: Value, source: impl Into<StepName>) -> Self {
        Self {
            type_alias: type_alias.into(),
            options,
            source: source.into(),
        }
    }

    pub fn type_alias(&self) -> &str {
        &self.type_alias
    }

    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Returns a single option, if present.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Returns the name of the step this path leaves from.
    pub fn source(&self) -> &StepName {
        &self.source
    }
}

/// Builds paths of one kind against the already assembled steps.
///
/// Implementations resolve every step name they reference through
/// [`resolve_step`] so that a dangling name is reported as
/// [`MapError::Reference`].
pub trait PathType: Send + Sync + Debug {
    /// Builds a path from its declared options.
    ///
    /// Returning `Ok(None)` leaves the path out of the map.
    fn build(&self, alias: &str, options: &Value, steps: &StepMap)
        -> Result<Option<Path>, MapError>;
}

/// Looks up a referenced step among the assembled ones.
pub fn resolve_step<'a>(steps: &'a StepMap, name: &str) -> Result<&'a Step, MapError> {
    steps.get(name).ok_or_else(|| MapError::Reference {
        step: StepName::new(name),
    })
}
