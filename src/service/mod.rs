//! Data-access capability consumed by the generated CRUD handlers, and the model bindings that pair models with it.

mod query;
pub mod search;

pub use query::{FilterValue, SearchQuery};
pub use search::{fold_pattern, fold_regex};

use crate::config::types::{Model, TypeDescriptor, TypeRegistry};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Persistence operations for one model. Errors are returned to the caller unchanged.
#[async_trait]
pub trait DataAccess: Send + Sync {
    async fn search(&self, query: SearchQuery) -> Result<Vec<Value>, AppError>;

    async fn read(&self, id: &str) -> Result<Value, AppError>;

    /// Returns the new id or the created document.
    async fn create(&self, body: Value) -> Result<Value, AppError>;

    async fn create_many(&self, bodies: Vec<Value>) -> Result<Value, AppError>;

    async fn update(&self, id: &str, body: Value) -> Result<Value, AppError>;

    async fn update_many(&self, query: Value, body: Value) -> Result<Value, AppError>;

    async fn delete(&self, id: &str) -> Result<Value, AppError>;

    async fn create_child(&self, id: &str, relation: &str, body: Value) -> Result<Value, AppError>;

    async fn update_child(&self, id: &str, relation: &str, query: Value, body: Value) -> Result<Value, AppError>;
}

/// Handler context for generated routes: the model and the data access bound to it.
pub struct ModelContext {
    pub model: TypeDescriptor,
    pub data_access: Arc<dyn DataAccess>,
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("model", &self.model.name)
            .finish_non_exhaustive()
    }
}

/// Model name -> bound context. Filled once at startup.
#[derive(Clone, Debug, Default)]
pub struct ModelBindings {
    by_name: HashMap<String, Arc<ModelContext>>,
}

impl ModelBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<M: Model>(self, data_access: Arc<dyn DataAccess>) -> Self {
        self.bind_descriptor(M::descriptor(), data_access)
    }

    pub fn bind_descriptor(mut self, model: TypeDescriptor, data_access: Arc<dyn DataAccess>) -> Self {
        self.by_name
            .insert(model.name.clone(), Arc::new(ModelContext { model, data_access }));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModelContext>> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Enter every bound model into a type registry.
    pub fn register_types(&self, types: &mut TypeRegistry) {
        for ctx in self.by_name.values() {
            types.register(ctx.model.clone());
        }
    }
}
