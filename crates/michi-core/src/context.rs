//! Request-scoped collaborators and the merge context built from them.

use crate::error::MapError;
use crate::step::StepName;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Snapshot source for the current session.
pub trait SessionStore: Send + Sync {
    /// Returns the session attributes as they are right now.
    fn snapshot(&self) -> Map<String, Value>;
}

impl SessionStore for Map<String, Value> {
    fn snapshot(&self) -> Map<String, Value> {
        self.clone()
    }
}

/// Source of the authenticated principal.
pub trait UserIdentityProvider: Send + Sync {
    /// Returns the current user, or `None` when nobody is authenticated.
    fn current_user(&self) -> Option<Value>;
}

impl UserIdentityProvider for Option<Value> {
    fn current_user(&self) -> Option<Value> {
        self.clone()
    }
}

/// Per-user, per-map data accumulated by previously completed steps.
pub trait Flow: Send + Sync {
    /// Returns the data as a `{step_name: data}` object.
    fn data(&self) -> Map<String, Value>;
}

/// The structural identity of a map, as seen by flow providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapIdentity<'a> {
    /// The map name.
    pub name: &'a str,
    /// The map footprint.
    pub footprint: &'a str,
}

/// Looks up the flow of a map for the current request.
pub trait FlowProvider: Send + Sync {
    fn get_flow(&self, map: MapIdentity<'_>, request: &RequestContext<'_>)
        -> Option<Arc<dyn Flow>>;
}

/// A [`FlowProvider`] that never has a flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlows;

impl FlowProvider for NoFlows {
    fn get_flow(
        &self,
        _map: MapIdentity<'_>,
        _request: &RequestContext<'_>,
    ) -> Option<Arc<dyn Flow>> {
        None
    }
}

/// The collaborators describing one incoming request.
#[derive(Clone, Copy)]
pub struct RequestContext<'a> {
    session: &'a dyn SessionStore,
    identity: &'a dyn UserIdentityProvider,
}

impl fmt::Debug for RequestContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext").finish_non_exhaustive()
    }
}

impl<'a> RequestContext<'a> {
    pub fn new(session: &'a dyn SessionStore, identity: &'a dyn UserIdentityProvider) -> Self {
        Self { session, identity }
    }

    pub fn session(&self) -> &'a dyn SessionStore {
        self.session
    }

    pub fn identity(&self) -> &'a dyn UserIdentityProvider {
        self.identity
    }

    /// Captures the session and user once for a whole build.
    pub fn merge_context(&self) -> MergeContext {
        MergeContext::new(self.session.snapshot(), self.identity.current_user())
    }
}

/// Bindings a template merge is rendered against.
///
/// Always exposes `session` and `user`; `flow_data` only when a flow exists.
///
/// # Examples
///
/// ```
/// use michi_core::MergeContext;
/// use serde_json::{json, Map};
///
/// let mut session = Map::new();
/// session.insert("lang".to_string(), json!("en"));
///
/// let ctx = MergeContext::new(session, None);
/// assert_eq!(ctx.bindings(), json!({"session": {"lang": "en"}, "user": null}));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeContext {
    session: Map<String, Value>,
    user: Option<Value>,
    flow_data: Option<Map<String, Value>>,
}

impl MergeContext {
    pub fn new(session: Map<String, Value>, user: Option<Value>) -> Self {
        Self {
            session,
            user,
            flow_data: None,
        }
    }

    /// Returns a copy of this context with `flow_data` bound.
    pub fn with_flow_data(&self, flow_data: Map<String, Value>) -> Self {
        Self {
            flow_data: Some(flow_data),
            ..self.clone()
        }
    }

    pub fn session(&self) -> &Map<String, Value> {
        &self.session
    }

    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    pub fn flow_data(&self) -> Option<&Map<String, Value>> {
        self.flow_data.as_ref()
    }

    /// Returns the template bindings as a JSON object.
    pub fn bindings(&self) -> Value {
        let mut bindings = Map::new();
        bindings.insert("session".to_string(), Value::Object(self.session.clone()));
        bindings.insert(
            "user".to_string(),
            self.user.clone().unwrap_or(Value::Null),
        );
        if let Some(flow_data) = &self.flow_data {
            bindings.insert("flow_data".to_string(), Value::Object(flow_data.clone()));
        }
        Value::Object(bindings)
    }
}

/// A [`Flow`] recording the submitted data of each completed step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFlow {
    steps: IndexMap<StepName, Map<String, Value>>,
}

impl DataFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if data was recorded for the step.
    pub fn has_step(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Returns the data recorded for the step.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Reference`] if nothing was recorded for it.
    pub fn step(&self, name: &str) -> Result<&Map<String, Value>, MapError> {
        self.steps.get(name).ok_or_else(|| MapError::Reference {
            step: StepName::new(name),
        })
    }

    /// Records the data of a step, replacing earlier data for it.
    pub fn set_step(&mut self, name: impl Into<StepName>, data: Map<String, Value>) {
        self.steps.insert(name.into(), data);
    }
}

impl Flow for DataFlow {
    fn data(&self) -> Map<String, Value> {
        self.steps
            .iter()
            .map(|(name, data)| (name.to_string(), Value::Object(data.clone())))
            .collect()
    }
}
