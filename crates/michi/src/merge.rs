//! Recursive template merge of declarative option trees.
//!
//! Strings are rendered through the injected [`TemplateEngine`]; arrays and
//! objects are walked recursively. Two kinds of object keys are left alone:
//!
//! - keys ending in [`RAW_SUFFIX`] keep their value untouched under the key
//!   with the suffix stripped
//! - the [`EVENTS_KEY`] value is passed through for the event layer
//!
//! The source tree is only ever read; every merge returns a fresh value.

use michi_core::{MergeContext, Mergeable, RenderError, TemplateEngine};
use serde_json::{Map, Value};
use tracing::debug;

/// Key suffix that disables merging of the value underneath.
pub const RAW_SUFFIX: &str = "|raw";

/// Key whose value is never merged.
pub const EVENTS_KEY: &str = "events";

/// The template merge engine.
///
/// Holds nothing but a reference to the template engine, so a single merger
/// can serve any number of concurrent builds.
#[derive(Clone, Copy)]
pub struct Merger<'a> {
    engine: &'a dyn TemplateEngine,
}

impl<'a> Merger<'a> {
    pub fn new(engine: &'a dyn TemplateEngine) -> Self {
        Self { engine }
    }

    /// Resolves `value` against `ctx`.
    ///
    /// With `permissive` unset, a string that fails to render aborts the
    /// merge. With it set, the string is kept as declared. Values reached
    /// through arrays and objects inherit the flag.
    pub fn merge(
        &self,
        value: &Value,
        ctx: &MergeContext,
        permissive: bool,
    ) -> Result<Value, RenderError> {
        self.merge_value(value, &ctx.bindings(), permissive)
    }

    /// Resolves the slots of a typed value on a private copy.
    ///
    /// Slots are merged speculatively: a failing template keeps its
    /// declared text.
    pub fn merge_object<T: Mergeable>(&self, source: &T, ctx: &MergeContext) -> T {
        let bindings = ctx.bindings();
        let mut merged = source.clone();
        merged.for_each_slot(&mut |slot| {
            if let Ok(resolved) = self.merge_value(slot, &bindings, true) {
                *slot = resolved;
            }
        });
        merged
    }

    fn merge_value(
        &self,
        value: &Value,
        bindings: &Value,
        permissive: bool,
    ) -> Result<Value, RenderError> {
        match value {
            Value::String(template) => match self.engine.render(template, bindings) {
                Ok(rendered) => Ok(Value::String(rendered)),
                Err(e) if permissive => {
                    debug!("Keeping unresolved template '{}': {}", template, e.message);
                    Ok(value.clone())
                }
                Err(e) => Err(e),
            },
            Value::Array(items) => items
                .iter()
                .map(|item| self.merge_value(item, bindings, permissive))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(entries) => self
                .merge_entries(entries, bindings, permissive)
                .map(Value::Object),
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
        }
    }

    fn merge_entries(
        &self,
        entries: &Map<String, Value>,
        bindings: &Value,
        permissive: bool,
    ) -> Result<Map<String, Value>, RenderError> {
        let mut merged = Map::new();
        for (key, value) in entries {
            if let Some(stripped) = key.strip_suffix(RAW_SUFFIX) {
                merged.insert(stripped.to_string(), value.clone());
            } else if key == EVENTS_KEY {
                merged.insert(key.clone(), value.clone());
            } else {
                merged.insert(key.clone(), self.merge_value(value, bindings, permissive)?);
            }
        }
        Ok(merged)
    }
}
