//! Map building error types.

use crate::step::StepName;
use thiserror::Error;

/// The kind of type registry a lookup was made against.
///
/// Used in [`MapError::Registry`] to tell step and path aliases apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    /// The step type registry.
    Step,
    /// The path type registry.
    Path,
}

impl std::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryKind::Step => write!(f, "step"),
            RegistryKind::Path => write!(f, "path"),
        }
    }
}

/// A template could not be rendered.
///
/// Raised by a [`TemplateEngine`](crate::TemplateEngine) for a malformed
/// template or a reference the bindings cannot satisfy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to render template '{template}': {message}")]
pub struct RenderError {
    /// The template source that failed.
    pub template: String,
    /// Engine-specific failure description.
    pub message: String,
}

impl RenderError {
    /// Creates a new render error for the given template.
    pub fn new(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while building a map.
///
/// Every variant is fatal: a build either returns a complete map or one of
/// these, never a partial map.
///
/// ```
/// use michi_core::{MapError, RegistryKind};
///
/// fn describe(error: &MapError) -> String {
///     match error {
///         MapError::Registry { kind, alias } => format!("no {} type '{}'", kind, alias),
///         MapError::Reference { step } => format!("unknown step {}", step),
///         MapError::Render(e) => e.message.clone(),
///         MapError::Configuration(msg) => msg.clone(),
///         _ => error.to_string(),
///     }
/// }
///
/// let error = MapError::Registry {
///     kind: RegistryKind::Step,
///     alias: "bogus".to_string(),
/// };
/// assert_eq!(describe(&error), "no step type 'bogus'");
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MapError {
    /// Options are missing, mistyped or otherwise invalid.
    #[error("Invalid map configuration: {0}")]
    Configuration(String),

    /// A step name was referenced that is not part of the assembled map.
    #[error("Step not found: {step}")]
    Reference {
        /// The missing step name.
        step: StepName,
    },

    /// A template failed at the top level of a merge.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// No type is registered under the requested alias.
    #[error("No {kind} type registered under alias '{alias}'")]
    Registry {
        /// Which registry was consulted.
        kind: RegistryKind,
        /// The offending alias.
        alias: String,
    },
}

impl MapError {
    /// Wraps an option deserialization failure as a configuration error.
    pub fn configuration(context: &str, error: impl std::fmt::Display) -> Self {
        MapError::Configuration(format!("{}: {}", context, error))
    }
}
