//! Alias-keyed registration tables for step and path types.

use crate::error::{MapError, RegistryKind};
use crate::path::PathType;
use crate::step::StepType;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps type aliases to their implementations.
///
/// Built once at startup and shared by reference; lookups never mutate it.
pub struct TypeRegistry<T: ?Sized> {
    kind: RegistryKind,
    types: HashMap<String, Arc<T>>,
}

/// Registry of [`StepType`] implementations.
pub type StepTypeRegistry = TypeRegistry<dyn StepType>;

/// Registry of [`PathType`] implementations.
pub type PathTypeRegistry = TypeRegistry<dyn PathType>;

impl<T: ?Sized> fmt::Debug for TypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut aliases = self.types.keys().collect::<Vec<_>>();
        aliases.sort();
        f.debug_struct("TypeRegistry")
            .field("kind", &self.kind)
            .field("aliases", &aliases)
            .finish()
    }
}

impl StepTypeRegistry {
    /// Creates an empty step type registry.
    pub fn steps() -> Self {
        Self::empty(RegistryKind::Step)
    }

    /// Registers a step type under `alias`, replacing any previous one.
    pub fn register(&mut self, alias: impl Into<String>, step_type: impl StepType + 'static) {
        self.types.insert(alias.into(), Arc::new(step_type));
    }
}

impl PathTypeRegistry {
    /// Creates an empty path type registry.
    pub fn paths() -> Self {
        Self::empty(RegistryKind::Path)
    }

    /// Registers a path type under `alias`, replacing any previous one.
    pub fn register(&mut self, alias: impl Into<String>, path_type: impl PathType + 'static) {
        self.types.insert(alias.into(), Arc::new(path_type));
    }
}

impl<T: ?Sized> TypeRegistry<T> {
    fn empty(kind: RegistryKind) -> Self {
        Self {
            kind,
            types: HashMap::new(),
        }
    }

    /// Returns the type registered under `alias`, if any.
    pub fn get(&self, alias: &str) -> Option<&Arc<T>> {
        self.types.get(alias)
    }

    /// Returns the type registered under `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Registry`] naming the alias when nothing is
    /// registered under it.
    pub fn resolve(&self, alias: &str) -> Result<&Arc<T>, MapError> {
        self.get(alias).ok_or_else(|| MapError::Registry {
            kind: self.kind,
            alias: alias.to_string(),
        })
    }

    /// Returns `true` if a type is registered under `alias`.
    pub fn contains(&self, alias: &str) -> bool {
        self.types.contains_key(alias)
    }

    /// Returns an iterator over all registered aliases.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;
    use crate::step::{Step, StepMap, StepName};
    use serde_json::Value;

    #[derive(Debug)]
    struct PlainStep;

    impl StepType for PlainStep {
        fn build(
            &self,
            alias: &str,
            name: &StepName,
            options: Value,
        ) -> Result<Option<Step>, MapError> {
            Ok(Some(Step::new(name.clone(), alias, options)))
        }
    }

    #[derive(Debug)]
    struct NoPath;

    impl PathType for NoPath {
        fn build(
            &self,
            _alias: &str,
            _options: &Value,
            _steps: &StepMap,
        ) -> Result<Option<Path>, MapError> {
            Ok(None)
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = StepTypeRegistry::steps();
        assert!(registry.is_empty());

        registry.register("plain", PlainStep);
        assert!(registry.contains("plain"));
        assert_eq!(registry.len(), 1);

        let step_type = registry.resolve("plain").expect("registered");
        let step = step_type
            .build("plain", &StepName::new("a"), Value::Null)
            .expect("builds");
        assert_eq!(step.map(|s| s.type_alias().to_string()), Some("plain".to_string()));
    }

    #[test]
    fn test_resolve_unknown_alias() {
        let mut registry = PathTypeRegistry::paths();
        registry.register("none", NoPath);

        match registry.resolve("bogus") {
            Err(MapError::Registry { kind, alias }) => {
                assert_eq!(kind, RegistryKind::Path);
                assert_eq!(alias, "bogus");
            }
            other => panic!("Unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
