//! Capabilities injected into the merge engine.

use crate::error::RenderError;
use serde_json::Value;

/// Renders a template string against a set of bindings.
///
/// The merge engine only depends on this trait, never on a specific
/// templating technology.
///
/// # Examples
///
/// ```
/// use michi_core::{RenderError, TemplateEngine};
/// use serde_json::{json, Value};
///
/// /// Replaces `$lang` with the session language.
/// struct Dollar;
///
/// impl TemplateEngine for Dollar {
///     fn render(&self, template: &str, bindings: &Value) -> Result<String, RenderError> {
///         let lang = bindings["session"]["lang"]
///             .as_str()
///             .ok_or_else(|| RenderError::new(template, "session.lang is not set"))?;
///         Ok(template.replace("$lang", lang))
///     }
/// }
///
/// let rendered = Dollar.render("/$lang/start", &json!({"session": {"lang": "fr"}}));
/// assert_eq!(rendered, Ok("/fr/start".to_string()));
/// ```
pub trait TemplateEngine: Send + Sync {
    /// Renders `template`.
    ///
    /// # Errors
    ///
    /// Fails with [`RenderError`] on a malformed template or a reference the
    /// bindings cannot satisfy.
    fn render(&self, template: &str, bindings: &Value) -> Result<String, RenderError>;
}

/// A typed value whose fields can be resolved by the merge engine.
///
/// Instead of walking arbitrary objects, a type lists its mergeable slots.
/// The engine always merges a clone, so the stored value is never touched.
///
/// ```
/// use michi_core::Mergeable;
/// use serde_json::Value;
///
/// #[derive(Clone)]
/// struct Banner {
///     text: Value,
///     link: Value,
///     priority: u8,
/// }
///
/// impl Mergeable for Banner {
///     fn for_each_slot(&mut self, visit: &mut dyn FnMut(&mut Value)) {
///         visit(&mut self.text);
///         visit(&mut self.link);
///     }
/// }
/// ```
pub trait Mergeable: Clone {
    /// Calls `visit` once for each field that should be resolved.
    fn for_each_slot(&mut self, visit: &mut dyn FnMut(&mut Value));
}

impl Mergeable for Value {
    fn for_each_slot(&mut self, visit: &mut dyn FnMut(&mut Value)) {
        visit(self);
    }
}

impl<T: Mergeable> Mergeable for Vec<T> {
    fn for_each_slot(&mut self, visit: &mut dyn FnMut(&mut Value)) {
        for item in self.iter_mut() {
            item.for_each_slot(visit);
        }
    }
}

impl<T: Mergeable> Mergeable for Option<T> {
    fn for_each_slot(&mut self, visit: &mut dyn FnMut(&mut Value)) {
        if let Some(inner) = self {
            inner.for_each_slot(visit);
        }
    }
}
