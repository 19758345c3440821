use michi::prelude::*;
use michi::DataFlow;
use serde_json::{json, Map as JsonMap, Value};
use std::sync::Arc;

/// Pretends the visitor already completed the `account` step.
struct RememberedAccount;

impl FlowProvider for RememberedAccount {
    fn get_flow(
        &self,
        _map: michi::MapIdentity<'_>,
        _request: &RequestContext<'_>,
    ) -> Option<Arc<dyn Flow>> {
        let mut flow = DataFlow::new();
        let mut account = JsonMap::new();
        account.insert("email".to_string(), json!("ada@example.com"));
        flow.set_step("account", account);
        Some(Arc::new(flow))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let services = MapServices::new(HandlebarsEngine::new()).with_flow_provider(RememberedAccount);
    let factory = MapBuilderFactory::new(Arc::new(services));

    let builder = factory
        .create_named_builder(
            "signup",
            json!({"brand": "{{session.brand}}"}),
            json!({"browsing": "linear", "final_destination": "/welcome"}),
        )?
        .add_step("account", "html", json!({"content": "Create your account"}))
        .add_step(
            "confirm",
            "html",
            json!({
                "title": "Hi {{user.name}}",
                "content": "We sent a link to {{flow_data.account.email}}",
                "attr|raw": {"data-template": "{{flow_data.account.email}}"}
            }),
        )
        .add_path(
            "end",
            json!({"source": "confirm", "label": "finish", "storageProvider": "session"}),
        );

    let mut session = JsonMap::new();
    session.insert("brand".to_string(), json!("Michi"));
    let user: Option<Value> = Some(json!({"name": "Ada"}));

    let map = builder.build(&RequestContext::new(&session, &user))?;

    println!("map '{}' footprint {}", map.name(), map.footprint());
    println!("data: {}", map.data());
    for (name, step) in map.steps() {
        println!("step '{}': {}", name, step.options());
    }
    for (source, paths) in map.paths() {
        for path in paths {
            println!("path '{}' from '{}'", path.type_alias(), source);
        }
    }
    if let Some(first) = map.first_step_name() {
        println!("starts at '{}'", first);
    }

    Ok(())
}
