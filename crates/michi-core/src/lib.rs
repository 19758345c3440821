//! Core traits and types for the michi workflow map builder.
//!
//! This crate holds the vocabulary shared by the builder and by authors of
//! custom step and path types. It does no templating or hashing itself.
//!
//! # Core Types
//!
//! - [`Step`] / [`StepType`] - Workflow nodes and the types that build them
//! - [`Path`] / [`PathType`] - Edges between steps and the types that build them
//! - [`StepTypeRegistry`] / [`PathTypeRegistry`] - Alias-keyed registration tables
//! - [`MergeContext`] - Bindings templates are rendered against
//! - [`MapError`] - Error taxonomy for map building
//!
//! # Collaborators
//!
//! - [`SessionStore`], [`UserIdentityProvider`] - Bundled per request in a [`RequestContext`]
//! - [`FlowProvider`] / [`Flow`] - Data from previously completed steps
//! - [`TemplateEngine`] - Injected templating capability
//! - [`Mergeable`] - Typed values exposing their resolvable fields

mod context;
mod error;
mod path;
mod registry;
mod step;
mod traits;

pub use context::{
    DataFlow, Flow, FlowProvider, MapIdentity, MergeContext, NoFlows, RequestContext,
    SessionStore, UserIdentityProvider,
};
pub use error::{MapError, RegistryKind, RenderError};
pub use path::{resolve_step, Path, PathType};
pub use registry::{PathTypeRegistry, StepTypeRegistry, TypeRegistry};
pub use step::{Step, StepMap, StepName, StepType};
pub use traits::{Mergeable, TemplateEngine};
