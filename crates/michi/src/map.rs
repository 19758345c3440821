//! The built map and its options.

use crate::footprint::Footprint;
use indexmap::IndexMap;
use michi_core::{MapError, MapIdentity, Path, Step, StepMap, StepName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How users may move between the steps of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browsing {
    /// Steps are visited in path order only.
    #[default]
    Linear,
    /// Any reached step may be revisited.
    Free,
}

impl fmt::Display for Browsing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Browsing::Linear => write!(f, "linear"),
            Browsing::Free => write!(f, "free"),
        }
    }
}

/// Map-level options.
///
/// # Examples
///
/// ```
/// use michi::{Browsing, MapOptions};
/// use serde_json::json;
///
/// let options = MapOptions::resolve(json!({"browsing": "free"})).unwrap();
/// assert_eq!(options.browsing, Browsing::Free);
/// assert!(!options.display_step_in_url);
///
/// assert!(MapOptions::resolve(json!({"browsing": "random"})).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapOptions {
    pub browsing: Browsing,
    pub first_step_name: Option<String>,
    pub final_destination: Option<String>,
    pub display_step_in_url: bool,
}

impl MapOptions {
    /// Validates raw options and fills in defaults.
    ///
    /// `null` resolves to all defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Configuration`] for unknown keys or ill-typed
    /// values.
    pub fn resolve(options: Value) -> Result<Self, MapError> {
        if options.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(options).map_err(|e| MapError::configuration("map options", e))
    }
}

/// One built instance of a workflow map.
///
/// Produced by [`MapBuilder::build`](crate::MapBuilder::build) and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct Map {
    name: String,
    footprint: Footprint,
    data: Value,
    options: MapOptions,
    steps: StepMap,
    paths: IndexMap<StepName, Vec<Path>>,
    first_step_name: Option<StepName>,
}

impl Map {
    pub(crate) fn new(name: String, footprint: Footprint, data: Value, options: MapOptions) -> Self {
        Self {
            name,
            footprint,
            data,
            options,
            steps: StepMap::new(),
            paths: IndexMap::new(),
            first_step_name: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Returns the key flow providers know this map by.
    pub fn identity(&self) -> MapIdentity<'_> {
        MapIdentity {
            name: &self.name,
            footprint: self.footprint.as_str(),
        }
    }

    /// Returns the resolved map data.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Returns all steps in the order they were built.
    pub fn steps(&self) -> &StepMap {
        &self.steps
    }

    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.get(name)
    }

    pub fn has_step(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Returns the paths grouped by source step name.
    pub fn paths(&self) -> &IndexMap<StepName, Vec<Path>> {
        &self.paths
    }

    /// Returns the paths leaving `source`, in declaration order.
    pub fn paths_from(&self, source: &str) -> &[Path] {
        self.paths.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the total number of paths.
    pub fn path_count(&self) -> usize {
        self.paths.values().map(Vec::len).sum()
    }

    pub fn first_step_name(&self) -> Option<&StepName> {
        self.first_step_name.as_ref()
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.first_step_name
            .as_ref()
            .and_then(|name| self.steps.get(name))
    }

    /// Returns the step a path leaves from.
    pub fn source_of(&self, path: &Path) -> Option<&Step> {
        self.steps.get(path.source())
    }

    pub(crate) fn add_step(&mut self, step: Step) {
        self.steps.insert(step.name().clone(), step);
    }

    pub(crate) fn set_first_step_name(&mut self, name: StepName) {
        self.first_step_name = Some(name);
    }

    pub(crate) fn add_path(&mut self, path: Path) {
        self.paths
            .entry(path.source().clone())
            .or_default()
            .push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::footprint;
    use serde_json::json;

    fn empty_map() -> Map {
        Map::new(
            "map".to_string(),
            footprint("map", &json!([]), &json!([])).expect("json values serialize"),
            Value::Null,
            MapOptions::default(),
        )
    }

    #[test]
    fn test_map_options_defaults() {
        let options = MapOptions::resolve(Value::Null).expect("defaults");
        assert_eq!(options.browsing, Browsing::Linear);
        assert_eq!(options.first_step_name, None);
        assert_eq!(options.final_destination, None);
        assert!(!options.display_step_in_url);

        assert_eq!(MapOptions::resolve(json!({})).ok(), Some(options));
    }

    #[test]
    fn test_map_options_validation() {
        assert!(matches!(
            MapOptions::resolve(json!({"display_step_in_url": "yes"})),
            Err(MapError::Configuration(_))
        ));
        assert!(matches!(
            MapOptions::resolve(json!({"unknown": 1})),
            Err(MapError::Configuration(_))
        ));

        let options = MapOptions::resolve(json!({
            "final_destination": "/thanks",
            "display_step_in_url": true
        }))
        .expect("valid options");
        assert_eq!(options.final_destination.as_deref(), Some("/thanks"));
        assert!(options.display_step_in_url);
    }

    #[test]
    fn test_paths_are_grouped_by_source() {
        let mut map = empty_map();
        map.add_step(Step::new("a", "html", Value::Null));
        map.add_step(Step::new("b", "html", Value::Null));
        map.add_path(Path::new("end", json!({"label": "first"}), "a"));
        map.add_path(Path::new("end", json!({"label": "second"}), "a"));
        map.add_path(Path::new("end", json!({"label": "third"}), "b"));

        let labels = map
            .paths_from("a")
            .iter()
            .filter_map(|p| p.option("label"))
            .collect::<Vec<_>>();
        assert_eq!(labels, vec![&json!("first"), &json!("second")]);
        assert_eq!(map.path_count(), 3);
        assert!(map.paths_from("missing").is_empty());

        let path = &map.paths_from("b")[0];
        assert_eq!(map.source_of(path).map(|s| s.name().as_str()), Some("b"));
    }

    #[test]
    fn test_first_step() {
        let mut map = empty_map();
        assert!(map.first_step().is_none());

        map.add_step(Step::new("a", "html", Value::Null));
        map.set_first_step_name(StepName::new("a"));
        assert_eq!(map.first_step().map(|s| s.name().as_str()), Some("a"));
        assert_eq!(map.identity().name, "map");
    }
}
