//! Handlebars-backed template engine.

use handlebars::Handlebars;
use michi_core::{RenderError, TemplateEngine};
use serde_json::Value;
use std::fmt;

/// Renders option templates with handlebars.
///
/// Strict mode is on, so a reference the bindings cannot satisfy fails
/// instead of rendering as an empty string. Output is not HTML escaped.
///
/// ```
/// use michi::{HandlebarsEngine, TemplateEngine};
/// use serde_json::json;
///
/// let engine = HandlebarsEngine::new();
/// let bindings = json!({"session": {"lang": "en"}, "user": null});
///
/// assert_eq!(engine.render("/{{session.lang}}/start", &bindings).ok(), Some("/en/start".to_string()));
/// assert!(engine.render("{{session.missing}}", &bindings).is_err());
/// ```
pub struct HandlebarsEngine {
    handlebars: Handlebars<'static>,
}

impl fmt::Debug for HandlebarsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlebarsEngine")
            .field("strict_mode", &self.handlebars.strict_mode())
            .finish()
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlebarsEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Wraps a preconfigured registry, e.g. one with custom helpers.
    pub fn with_registry(handlebars: Handlebars<'static>) -> Self {
        Self { handlebars }
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, template: &str, bindings: &Value) -> Result<String, RenderError> {
        self.handlebars
            .render_template(template, bindings)
            .map_err(|e| RenderError::new(template, e.to_string()))
    }
}
