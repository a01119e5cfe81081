//! Example consumer: boots an order service with generated CRUD routes and one custom handler.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Then: `curl -X OPTIONS http://127.0.0.1:3000/api/order`

mod memory;

use gota_boot::{
    init_tracing, AccessMode, App, AppConfig, Argument, BindingKind, Booter, HandlerMeta, Model, ModelBindings,
    ParameterMeta, PropertyDescriptor, ServiceMeta, ServiceRegistration, StaticRegistry, TypeDescriptor, TypeRegistry,
    Verb,
};
use memory::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;

struct Order;

impl Model for Order {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::structured(
            "Order",
            vec![
                PropertyDescriptor::new("id", "String").with_access(&[AccessMode::Read]),
                PropertyDescriptor::new("customer", "String"),
                PropertyDescriptor::new("total", "Number"),
                PropertyDescriptor::new("lines", "Array"),
            ],
        )
    }
}

fn registry() -> StaticRegistry {
    StaticRegistry::new()
        .with_service("OrderService", ServiceMeta::new("/api").with_models(&["Order"]))
        .with_handler(
            "OrderService",
            "health",
            HandlerMeta::new("/health").returns(TypeDescriptor::string),
        )
        .with_handler(
            "OrderService",
            "tag",
            HandlerMeta::new("/order/:id/tag").method(Verb::Put),
        )
        .with_parameters(
            "OrderService",
            "tag",
            vec![
                ParameterMeta::new(BindingKind::PathParam, "id", TypeDescriptor::string()),
                ParameterMeta::new(BindingKind::BodyParam, "tag", TypeDescriptor::string()),
                ParameterMeta::new(BindingKind::Response, "res", TypeDescriptor::object()),
            ],
        )
}

fn order_service() -> ServiceRegistration {
    ServiceRegistration::new("OrderService")
        .method("health", |_| async { Ok(json!("ok")) })
        .method("tag", |args: Vec<Argument>| async move {
            let id = args.first().and_then(Argument::as_str).unwrap_or_default().to_string();
            let tag = args.get(1).map(|a| a.clone().into_value()).unwrap_or(Value::Null);
            if let Some(Argument::Response(res)) = args.get(2) {
                res.insert_header("x-order-id", &id);
            }
            Ok(json!({ "id": id, "tag": tag }))
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("gota_boot=info,example_consumer=info");

    let config = AppConfig::from_env()?;
    let models = ModelBindings::new().bind::<Order>(Arc::new(MemoryStore::default()));
    let booter = Booter::new(Arc::new(registry()), models, TypeRegistry::new(), config);

    tracing::info!("Example consumer booting order service");
    App::new(booter).service(order_service()).run().await?;
    Ok(())
}
