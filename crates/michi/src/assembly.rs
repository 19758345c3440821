//! Graph assembly: steps first, then the paths between them.

use crate::builder::{PathDeclaration, StepDeclaration};
use crate::map::Map;
use crate::merge::Merger;
use michi_core::{MapError, MergeContext, PathTypeRegistry, StepTypeRegistry};
use tracing::debug;

/// Builds every declared step into `map` and picks the first step.
///
/// The first step built is the entry point unless a later step reports
/// [`is_first`](michi_core::Step::is_first); the last such step wins.
/// Steps their type declines to build are left out entirely.
pub(crate) fn assemble_steps<'d>(
    map: &mut Map,
    declarations: impl IntoIterator<Item = &'d StepDeclaration>,
    registry: &StepTypeRegistry,
    merger: Merger<'_>,
    ctx: &MergeContext,
) -> Result<(), MapError> {
    for declaration in declarations {
        let options = merger.merge(&declaration.options, ctx, false)?;
        let step_type = registry.resolve(&declaration.type_alias)?;

        let Some(step) = step_type.build(&declaration.type_alias, &declaration.name, options)?
        else {
            debug!("Step '{}' skipped for this request", declaration.name);
            continue;
        };

        let name = step.name().clone();
        let claims_first = step.is_first();
        map.add_step(step);
        debug!("Step '{}' built", name);

        if map.first_step_name().is_none() || claims_first {
            debug!("Step '{}' is now the first step", name);
            map.set_first_step_name(name);
        }
    }
    Ok(())
}

/// Builds every declared path against the steps already in `map`.
pub(crate) fn assemble_paths(
    map: &mut Map,
    declarations: &[PathDeclaration],
    registry: &PathTypeRegistry,
) -> Result<(), MapError> {
    for declaration in declarations {
        let path_type = registry.resolve(&declaration.type_alias)?;

        if let Some(path) =
            path_type.build(&declaration.type_alias, &declaration.options, map.steps())?
        {
            debug!(
                "Path '{}' indexed under step '{}'",
                path.type_alias(),
                path.source()
            );
            map.add_path(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::footprint;
    use crate::map::MapOptions;
    use crate::template::HandlebarsEngine;
    use crate::types::{EndPathType, HtmlStepType};
    use michi_core::{Path, PathType, RegistryKind, Step, StepMap, StepName, StepType};
    use serde_json::{json, Value};

    #[derive(Debug)]
    struct NeverBuilt;

    impl StepType for NeverBuilt {
        fn build(
            &self,
            _alias: &str,
            _name: &StepName,
            _options: Value,
        ) -> Result<Option<Step>, MapError> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct Loop;

    impl PathType for Loop {
        fn build(
            &self,
            alias: &str,
            options: &Value,
            steps: &StepMap,
        ) -> Result<Option<Path>, MapError> {
            let source = options["source"].as_str().unwrap_or_default();
            let step = michi_core::resolve_step(steps, source)?;
            Ok(Some(Path::new(alias, options.clone(), step.name().clone())))
        }
    }

    fn registries() -> (StepTypeRegistry, PathTypeRegistry) {
        let mut steps = StepTypeRegistry::steps();
        steps.register("html", HtmlStepType);
        steps.register("never", NeverBuilt);
        let mut paths = PathTypeRegistry::paths();
        paths.register("end", EndPathType);
        paths.register("loop", Loop);
        (steps, paths)
    }

    fn empty_map() -> Map {
        Map::new(
            "map".to_string(),
            footprint("map", &json!([]), &json!([])).expect("json values serialize"),
            Value::Null,
            MapOptions::default(),
        )
    }

    fn step(name: &str, type_alias: &str, options: Value) -> StepDeclaration {
        StepDeclaration {
            name: StepName::new(name),
            type_alias: type_alias.to_string(),
            options,
        }
    }

    fn path(type_alias: &str, options: Value) -> PathDeclaration {
        PathDeclaration {
            type_alias: type_alias.to_string(),
            options,
        }
    }

    fn assemble(declarations: &[StepDeclaration]) -> Result<Map, MapError> {
        let (steps, _) = registries();
        let engine = HandlebarsEngine::new();
        let mut map = empty_map();
        assemble_steps(
            &mut map,
            declarations,
            &steps,
            Merger::new(&engine),
            &MergeContext::default(),
        )?;
        Ok(map)
    }

    #[test]
    fn test_first_built_step_is_tentative_first() {
        let map = assemble(&[
            step("a", "html", Value::Null),
            step("b", "html", Value::Null),
        ])
        .expect("assembles");
        assert_eq!(map.first_step_name(), Some(&StepName::new("a")));
    }

    #[test]
    fn test_last_is_first_wins() {
        let map = assemble(&[
            step("a", "html", Value::Null),
            step("b", "html", json!({"is_first": true})),
            step("c", "html", json!({"is_first": true})),
            step("d", "html", Value::Null),
        ])
        .expect("assembles");
        assert_eq!(map.first_step_name(), Some(&StepName::new("c")));
    }

    #[test]
    fn test_skipped_step_is_never_first() {
        let map = assemble(&[
            step("hidden", "never", Value::Null),
            step("shown", "html", Value::Null),
        ])
        .expect("assembles");
        assert!(!map.has_step("hidden"));
        assert_eq!(map.steps().len(), 1);
        assert_eq!(map.first_step_name(), Some(&StepName::new("shown")));
    }

    #[test]
    fn test_no_steps_means_no_first_step() {
        let map = assemble(&[step("hidden", "never", Value::Null)]).expect("assembles");
        assert!(map.first_step_name().is_none());
    }

    #[test]
    fn test_unknown_step_alias() {
        match assemble(&[step("a", "bogus", Value::Null)]) {
            Err(MapError::Registry { kind, alias }) => {
                assert_eq!(kind, RegistryKind::Step);
                assert_eq!(alias, "bogus");
            }
            other => panic!("Unexpected result: {:?}", other.map(|m| m.name().to_string())),
        }
    }

    #[test]
    fn test_paths_keep_declaration_order_per_source() {
        let (_, paths) = registries();
        let mut map = assemble(&[
            step("a", "html", Value::Null),
            step("b", "html", Value::Null),
        ])
        .expect("assembles");

        assemble_paths(
            &mut map,
            &[
                path("loop", json!({"source": "a", "label": "retry"})),
                path("end", json!({"source": "b", "storageProvider": "memory"})),
                path("end", json!({"source": "a", "label": "quit", "storageProvider": "memory"})),
            ],
            &paths,
        )
        .expect("assembles");

        let from_a = map
            .paths_from("a")
            .iter()
            .map(|p| p.type_alias())
            .collect::<Vec<_>>();
        assert_eq!(from_a, vec!["loop", "end"]);
        assert_eq!(map.paths_from("b").len(), 1);
    }

    #[test]
    fn test_path_to_skipped_step_is_a_reference_error() {
        let (_, paths) = registries();
        let mut map = assemble(&[
            step("hidden", "never", Value::Null),
            step("shown", "html", Value::Null),
        ])
        .expect("assembles");

        let result = assemble_paths(
            &mut map,
            &[path("end", json!({"source": "hidden", "storageProvider": "memory"}))],
            &paths,
        );
        assert!(matches!(result, Err(MapError::Reference { step }) if step == "hidden"));
    }

    #[test]
    fn test_unknown_path_alias() {
        let (_, paths) = registries();
        let mut map = empty_map();
        let result = assemble_paths(&mut map, &[path("teleport", json!({}))], &paths);
        assert!(matches!(
            result,
            Err(MapError::Registry { kind: RegistryKind::Path, ref alias }) if alias == "teleport"
        ));
    }
}
