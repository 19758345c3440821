//! # Michi (道)
//!
//! Declarative workflow maps, resolved per request.
//!
//! A map is declared once as named steps connected by typed paths. Each
//! request then builds its own [`Map`]: step options are rendered against
//! the session, the current user and the data of previously completed
//! steps, while the map's [`Footprint`] stays the same for every request.
//!
//! ## Example
//!
//! ```rust
//! use michi::prelude::*;
//! use serde_json::{json, Map, Value};
//! use std::sync::Arc;
//!
//! let services = Arc::new(MapServices::new(HandlebarsEngine::new()));
//! let builder = MapBuilder::new("survey", Value::Null, json!({"browsing": "free"}), services)?
//!     .add_step("welcome", "html", json!({"content": "Bienvenue"}))
//!     .add_step("thanks", "html", json!({"title": "{{session.lang}}", "is_first": true}))
//!     .add_path("end", json!({"source": "thanks", "label": "done", "storageProvider": "memory"}));
//!
//! let mut session = Map::new();
//! session.insert("lang".to_string(), json!("fr"));
//! let user: Option<Value> = None;
//!
//! let map = builder.build(&RequestContext::new(&session, &user))?;
//! assert_eq!(map.first_step_name().map(|n| n.as_str()), Some("thanks"));
//! assert_eq!(map.paths_from("thanks").len(), 1);
//! assert_eq!(map.footprint(), &builder.footprint()?);
//! # Ok::<(), MapError>(())
//! ```
//!
//! ## Template Merge
//!
//! Option strings are handlebars templates by default. Keys ending in
//! `|raw` and the `events` key are never rendered:
//!
//! ```rust
//! use michi::{HandlebarsEngine, MergeContext, Merger};
//! use serde_json::json;
//!
//! let engine = HandlebarsEngine::new();
//! let merged = Merger::new(&engine)
//!     .merge(&json!({"help|raw": "{{literally}}"}), &MergeContext::default(), false)
//!     .unwrap();
//! assert_eq!(merged, json!({"help": "{{literally}}"}));
//! ```

mod assembly;
mod builder;
mod footprint;
mod map;
mod merge;
mod template;
mod types;

// Re-export core types
pub use michi_core::*;

pub use builder::{MapBuilder, MapBuilderFactory, MapServices, PathDeclaration, StepDeclaration};
pub use footprint::{footprint, Footprint};
pub use map::{Browsing, Map, MapOptions};
pub use merge::{Merger, EVENTS_KEY, RAW_SUFFIX};
pub use template::HandlebarsEngine;
pub use types::{EndPathOptions, EndPathType, HtmlStepOptions, HtmlStepType};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Flow, FlowProvider, HandlebarsEngine, Map, MapBuilder, MapBuilderFactory, MapError,
        MapOptions, MapServices, MergeContext, Path, PathType, RequestContext, Step, StepName,
        StepType, TemplateEngine,
    };
}
