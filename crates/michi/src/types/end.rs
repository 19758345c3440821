//! Built-in `end` terminal path type.

use michi_core::{resolve_step, MapError, Path, PathType, StepMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options of an [`EndPathType`] path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndPathOptions {
    pub source: String,
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(rename = "storageProvider")]
    pub storage_provider: String,
}

fn default_label() -> String {
    "end".to_string()
}

/// A terminal edge: leaving its source step ends the map.
///
/// ```
/// use michi::{EndPathType, PathType, Step, StepMap, StepName};
/// use serde_json::{json, Value};
///
/// let mut steps = StepMap::new();
/// steps.insert(StepName::new("confirm"), Step::new("confirm", "html", Value::Null));
///
/// let path = EndPathType
///     .build("end", &json!({"source": "confirm", "storageProvider": "memory"}), &steps)
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(path.source(), &StepName::new("confirm"));
/// assert_eq!(path.option("label"), Some(&json!("end")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EndPathType;

impl EndPathType {
    pub const ALIAS: &'static str = "end";
}

impl PathType for EndPathType {
    fn build(
        &self,
        alias: &str,
        options: &Value,
        steps: &StepMap,
    ) -> Result<Option<Path>, MapError> {
        let resolved: EndPathOptions = serde_json::from_value(options.clone())
            .map_err(|e| MapError::configuration("end path", e))?;
        let source = resolve_step(steps, &resolved.source)?.name().clone();
        let options =
            serde_json::to_value(resolved).map_err(|e| MapError::configuration("end path", e))?;
        Ok(Some(Path::new(alias, options, source)))
    }
}
