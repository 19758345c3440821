//! Map declarations and the builder that turns them into maps.

use crate::assembly::{assemble_paths, assemble_steps};
use crate::footprint::{footprint, Footprint};
use crate::map::{Map, MapOptions};
use crate::merge::Merger;
use crate::template::HandlebarsEngine;
use crate::types::{EndPathType, HtmlStepType};
use indexmap::IndexMap;
use michi_core::{
    FlowProvider, MapError, NoFlows, PathType, PathTypeRegistry, RequestContext, StepName,
    StepType, StepTypeRegistry, TemplateEngine,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A declared, unresolved step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDeclaration {
    pub name: StepName,
    #[serde(rename = "type")]
    pub type_alias: String,
    pub options: Value,
}

/// A declared, unresolved path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathDeclaration {
    #[serde(rename = "type")]
    pub type_alias: String,
    pub options: Value,
}

/// The collaborators shared by every builder of a process.
///
/// Holds the step and path type registries, the template engine and the
/// flow provider. Construct it once at startup and share it behind an
/// [`Arc`].
///
/// # Examples
///
/// ```
/// use michi::{HandlebarsEngine, MapServices};
///
/// let services = MapServices::new(HandlebarsEngine::new());
/// assert!(services.step_types().contains("html"));
/// assert!(services.path_types().contains("end"));
/// ```
pub struct MapServices {
    step_types: StepTypeRegistry,
    path_types: PathTypeRegistry,
    templates: Arc<dyn TemplateEngine>,
    flows: Arc<dyn FlowProvider>,
}

impl fmt::Debug for MapServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapServices")
            .field("step_types", &self.step_types)
            .field("path_types", &self.path_types)
            .finish_non_exhaustive()
    }
}

impl Default for MapServices {
    fn default() -> Self {
        Self::new(HandlebarsEngine::new())
    }
}

impl MapServices {
    /// Creates services with the built-in `html` step and `end` path types
    /// and no flows.
    pub fn new(templates: impl TemplateEngine + 'static) -> Self {
        let mut step_types = StepTypeRegistry::steps();
        step_types.register(HtmlStepType::ALIAS, HtmlStepType);
        let mut path_types = PathTypeRegistry::paths();
        path_types.register(EndPathType::ALIAS, EndPathType);

        Self {
            step_types,
            path_types,
            templates: Arc::new(templates),
            flows: Arc::new(NoFlows),
        }
    }

    /// Registers a step type, replacing any type under the same alias.
    pub fn with_step_type(
        mut self,
        alias: impl Into<String>,
        step_type: impl StepType + 'static,
    ) -> Self {
        self.step_types.register(alias, step_type);
        self
    }

    /// Registers a path type, replacing any type under the same alias.
    pub fn with_path_type(
        mut self,
        alias: impl Into<String>,
        path_type: impl PathType + 'static,
    ) -> Self {
        self.path_types.register(alias, path_type);
        self
    }

    pub fn with_flow_provider(mut self, flows: impl FlowProvider + 'static) -> Self {
        self.flows = Arc::new(flows);
        self
    }

    pub fn step_types(&self) -> &StepTypeRegistry {
        &self.step_types
    }

    pub fn path_types(&self) -> &PathTypeRegistry {
        &self.path_types
    }

    pub fn templates(&self) -> &dyn TemplateEngine {
        self.templates.as_ref()
    }
}

/// Collects step and path declarations and builds maps from them.
///
/// Declarations are stored unresolved. Every call to [`build`](Self::build)
/// resolves them against the given request, so one builder serves any
/// number of requests, concurrently if needed.
///
/// # Examples
///
/// ```
/// use michi::prelude::*;
/// use serde_json::{json, Map, Value};
/// use std::sync::Arc;
///
/// let services = Arc::new(MapServices::default());
/// let builder = MapBuilder::new("signup", Value::Null, Value::Null, services)?
///     .add_step("intro", "html", json!({"title": "Hello {{session.name}}"}))
///     .add_path("end", json!({"source": "intro", "storageProvider": "memory"}));
///
/// let mut session = Map::new();
/// session.insert("name".to_string(), json!("Ada"));
/// let user: Option<Value> = None;
///
/// let map = builder.build(&RequestContext::new(&session, &user))?;
/// assert_eq!(map.step("intro").and_then(|s| s.option("title")), Some(&json!("Hello Ada")));
/// assert_eq!(map.first_step_name().map(|n| n.as_str()), Some("intro"));
/// # Ok::<(), MapError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MapBuilder {
    name: String,
    data: Value,
    options: MapOptions,
    steps: IndexMap<StepName, StepDeclaration>,
    paths: Vec<PathDeclaration>,
    services: Arc<MapServices>,
}

impl MapBuilder {
    /// Creates a builder for the map `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Configuration`] if `options` are not valid
    /// [`MapOptions`].
    pub fn new(
        name: impl Into<String>,
        data: Value,
        options: Value,
        services: Arc<MapServices>,
    ) -> Result<Self, MapError> {
        Ok(Self {
            name: name.into(),
            data,
            options: MapOptions::resolve(options)?,
            steps: IndexMap::new(),
            paths: Vec::new(),
            services,
        })
    }

    /// Declares a step.
    ///
    /// Declaring a name twice replaces the earlier declaration in place.
    pub fn add_step(
        mut self,
        name: impl Into<StepName>,
        type_alias: impl Into<String>,
        options: Value,
    ) -> Self {
        let name = name.into();
        self.steps.insert(
            name.clone(),
            StepDeclaration {
                name,
                type_alias: type_alias.into(),
                options,
            },
        );
        self
    }

    /// Declares a path.
    pub fn add_path(mut self, type_alias: impl Into<String>, options: Value) -> Self {
        self.paths.push(PathDeclaration {
            type_alias: type_alias.into(),
            options,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Returns the step declarations in declaration order.
    pub fn step_declarations(&self) -> impl Iterator<Item = &StepDeclaration> {
        self.steps.values()
    }

    pub fn path_declarations(&self) -> &[PathDeclaration] {
        &self.paths
    }

    /// Returns the structural identity of the declared map.
    ///
    /// Computed from the unresolved declarations, so it is the same for
    /// every request.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Configuration`] if a declaration cannot be
    /// serialized.
    pub fn footprint(&self) -> Result<Footprint, MapError> {
        let steps = self.steps.values().collect::<Vec<_>>();
        footprint(&self.name, &steps, &self.paths)
    }

    /// Builds a map for one request.
    ///
    /// # Errors
    ///
    /// - [`MapError::Render`] if a template of the map data or of a step's
    ///   options cannot be rendered
    /// - [`MapError::Registry`] if a declared type alias is not registered
    /// - [`MapError::Reference`] if a path names a step that was not built
    /// - [`MapError::Configuration`] if a type rejects its options
    pub fn build(&self, request: &RequestContext<'_>) -> Result<Map, MapError> {
        let footprint = self.footprint()?;
        info!("Building map '{}' ({})", self.name, footprint);

        let merger = Merger::new(self.services.templates());
        let ctx = request.merge_context();
        let data = merger.merge(&self.data, &ctx, false)?;
        let mut map = Map::new(self.name.clone(), footprint, data, self.options.clone());

        let step_ctx = match self.services.flows.get_flow(map.identity(), request) {
            Some(flow) => ctx.with_flow_data(flow.data()),
            None => ctx,
        };

        // Paths resolve their steps against the assembled ones.
        assemble_steps(
            &mut map,
            self.steps.values(),
            self.services.step_types(),
            merger,
            &step_ctx,
        )?;
        assemble_paths(&mut map, &self.paths, self.services.path_types())?;

        info!(
            "Map '{}' built with {} steps and {} paths",
            map.name(),
            map.steps().len(),
            map.path_count()
        );
        Ok(map)
    }
}

/// Creates builders sharing one set of [`MapServices`].
#[derive(Debug, Clone)]
pub struct MapBuilderFactory {
    services: Arc<MapServices>,
}

impl MapBuilderFactory {
    /// Name given to builders created without one.
    pub const DEFAULT_NAME: &'static str = "map";

    pub fn new(services: Arc<MapServices>) -> Self {
        Self { services }
    }

    /// Creates a builder named [`DEFAULT_NAME`](Self::DEFAULT_NAME).
    pub fn create_builder(&self, data: Value, options: Value) -> Result<MapBuilder, MapError> {
        self.create_named_builder(Self::DEFAULT_NAME, data, options)
    }

    pub fn create_named_builder(
        &self,
        name: impl Into<String>,
        data: Value,
        options: Value,
    ) -> Result<MapBuilder, MapError> {
        MapBuilder::new(name, data, options, Arc::clone(&self.services))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Browsing;
    use michi_core::{DataFlow, Flow, MapIdentity};
    use serde_json::{json, Map as JsonMap};

    fn session(value: Value) -> JsonMap<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => JsonMap::new(),
        }
    }

    struct FixedFlow(DataFlow);

    impl FlowProvider for FixedFlow {
        fn get_flow(
            &self,
            map: MapIdentity<'_>,
            _request: &RequestContext<'_>,
        ) -> Option<Arc<dyn Flow>> {
            (map.name == "signup").then(|| Arc::new(self.0.clone()) as Arc<dyn Flow>)
        }
    }

    #[test]
    fn test_factory_names() {
        let factory = MapBuilderFactory::new(Arc::new(MapServices::default()));

        let builder = factory
            .create_builder(Value::Null, Value::Null)
            .expect("valid options");
        assert_eq!(builder.name(), "map");

        let builder = factory
            .create_named_builder("signup", Value::Null, json!({"browsing": "free"}))
            .expect("valid options");
        assert_eq!(builder.name(), "signup");
        assert_eq!(builder.options().browsing, Browsing::Free);

        assert!(factory
            .create_builder(Value::Null, json!({"browsing": "sideways"}))
            .is_err());
    }

    #[test]
    fn test_redeclared_step_replaces_in_place() {
        let builder = MapBuilder::new("m", Value::Null, Value::Null, Arc::default())
            .expect("valid options")
            .add_step("a", "html", json!({"content": "old"}))
            .add_step("b", "html", Value::Null)
            .add_step("a", "html", json!({"content": "new"}));

        let declared = builder
            .step_declarations()
            .map(|d| (d.name.as_str(), d.options.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            declared,
            vec![("a", json!({"content": "new"})), ("b", Value::Null)]
        );
    }

    #[test]
    fn test_data_is_merged_strictly() {
        let builder = MapBuilder::new(
            "m",
            json!({"greeting": "{{session.missing}}"}),
            Value::Null,
            Arc::default(),
        )
        .expect("valid options");

        let session = session(json!({}));
        let user: Option<Value> = None;
        let result = builder.build(&RequestContext::new(&session, &user));
        assert!(matches!(result, Err(MapError::Render(_))));
    }

    #[test]
    fn test_flow_data_reaches_step_options_only() {
        let mut flow = DataFlow::new();
        flow.set_step("intro", session(json!({"email": "ada@example.com"})));
        let services = MapServices::default().with_flow_provider(FixedFlow(flow));

        let builder = MapBuilder::new(
            "signup",
            json!({"raw|raw": "{{flow_data.intro.email}}"}),
            Value::Null,
            Arc::new(services),
        )
        .expect("valid options")
        .add_step("intro", "html", Value::Null)
        .add_step(
            "confirm",
            "html",
            json!({"content": "Sent to {{flow_data.intro.email}}"}),
        );

        let session = session(json!({}));
        let user: Option<Value> = None;
        let map = builder
            .build(&RequestContext::new(&session, &user))
            .expect("builds");

        assert_eq!(map.data(), &json!({"raw": "{{flow_data.intro.email}}"}));
        assert_eq!(
            map.step("confirm").and_then(|s| s.option("content")),
            Some(&json!("Sent to ada@example.com"))
        );
    }
}
