#![allow(dead_code)]

use async_trait::async_trait;
use gota_boot::{
    AccessMode, AppError, Booter, DataAccess, Handler, HandlerMeta, Model, ModelBindings, ParameterMeta,
    PropertyDescriptor, RouteSink, SearchQuery, ServiceMeta, ServiceRegistration, StaticRegistry, TypeDescriptor,
    TypeRegistry, Verb,
};
use gota_boot::config::{AppConfig, BindingKind, ParameterSpec};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub struct Order;

impl Model for Order {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::structured(
            "Order",
            vec![
                PropertyDescriptor::new("id", "String").with_access(&[AccessMode::Read]),
                PropertyDescriptor::new("customer", "String"),
                PropertyDescriptor::new("secret", "String").with_access(&[AccessMode::Write]),
            ],
        )
    }
}

/// Records every call as (operation, arguments) and answers from a fixed document set.
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Mutex<Vec<(String, Value)>>,
    pub docs: Vec<Value>,
}

impl RecordingStore {
    pub fn with_docs(docs: Vec<Value>) -> Self {
        RecordingStore {
            calls: Mutex::new(Vec::new()),
            docs,
        }
    }

    fn record(&self, op: &str, args: Value) {
        self.calls.lock().unwrap().push((op.to_string(), args));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataAccess for RecordingStore {
    async fn search(&self, query: SearchQuery) -> Result<Vec<Value>, AppError> {
        let keys: Vec<&str> = query.filters.iter().map(|(k, _)| k.as_str()).collect();
        self.record("search", json!(keys));
        Ok(self.docs.iter().filter(|d| query.matches(d)).cloned().collect())
    }

    async fn read(&self, id: &str) -> Result<Value, AppError> {
        self.record("read", json!(id));
        if id == "missing" {
            return Err(AppError::NotFound(format!("order {}", id)));
        }
        Ok(json!({ "id": id, "customer": "Ann" }))
    }

    async fn create(&self, body: Value) -> Result<Value, AppError> {
        self.record("create", body);
        Ok(json!("new-id"))
    }

    async fn create_many(&self, bodies: Vec<Value>) -> Result<Value, AppError> {
        let n = bodies.len();
        self.record("create_many", Value::Array(bodies));
        Ok(json!(n))
    }

    async fn update(&self, id: &str, body: Value) -> Result<Value, AppError> {
        self.record("update", json!([id, body]));
        Ok(json!(1))
    }

    async fn update_many(&self, query: Value, body: Value) -> Result<Value, AppError> {
        self.record("update_many", json!([query, body]));
        Ok(json!(2))
    }

    async fn delete(&self, id: &str) -> Result<Value, AppError> {
        self.record("delete", json!(id));
        Ok(json!(true))
    }

    async fn create_child(&self, id: &str, relation: &str, body: Value) -> Result<Value, AppError> {
        self.record("create_child", json!([id, relation, body]));
        Ok(json!(1))
    }

    async fn update_child(&self, id: &str, relation: &str, query: Value, body: Value) -> Result<Value, AppError> {
        self.record("update_child", json!([id, relation, query, body]));
        Ok(json!(1))
    }
}

/// Sink that keeps every mapping in call order.
#[derive(Default)]
pub struct RecordingSink {
    pub mappings: Vec<(Verb, String, Vec<ParameterSpec>, Handler, Option<String>)>,
}

impl RecordingSink {
    pub fn keys(&self) -> Vec<(Verb, String)> {
        self.mappings.iter().map(|m| (m.0, m.1.clone())).collect()
    }

    pub fn handler(&self, verb: Verb, path: &str) -> Option<&Handler> {
        self.mappings
            .iter()
            .find(|m| m.0 == verb && m.1 == path)
            .map(|m| &m.3)
    }
}

impl RouteSink for RecordingSink {
    fn add_mapping(
        &mut self,
        path: &str,
        verb: Verb,
        parameters: Arc<[ParameterSpec]>,
        handler: Handler,
        owner: Option<&str>,
    ) {
        self.mappings
            .push((verb, path.to_string(), parameters.to_vec(), handler, owner.map(String::from)));
    }
}

pub fn order_registry() -> StaticRegistry {
    StaticRegistry::new()
        .with_service("OrderService", ServiceMeta::new("/api").with_models(&["Order"]))
        .with_handler("OrderService", "health", HandlerMeta::new("/health"))
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
                ParameterMeta::new(BindingKind::HeaderParam, "xTenant", TypeDescriptor::string()),
                ParameterMeta::new(BindingKind::Response, "res", TypeDescriptor::object()),
            ],
        )
}

pub fn order_service() -> ServiceRegistration {
    ServiceRegistration::new("OrderService")
        .method("health", |_| async { Ok(json!("ok")) })
        .method("tag", |args| async move {
            let values: Vec<Value> = args
                .iter()
                .filter_map(|a| a.as_value().cloned())
                .collect();
            if let Some(gota_boot::Argument::Response(res)) = args.last() {
                res.set_status(axum::http::StatusCode::ACCEPTED);
                res.insert_header("x-tagged", "yes");
            }
            Ok(json!(values))
        })
}

pub fn booter(store: Arc<RecordingStore>, registry: StaticRegistry, config: AppConfig) -> Booter {
    let models = ModelBindings::new().bind::<Order>(store);
    Booter::new(Arc::new(registry), models, TypeRegistry::new(), config)
}
