//! Resolved route records: metadata validated and flattened for registration.

use crate::config::settings::AppConfig;
use crate::config::types::{BindingKind, TypeDescriptor, TypeRef, Verb};
use crate::handlers::Handler;
use std::sync::Arc;

/// One bound handler argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSpec {
    pub binding: BindingKind,
    pub name: String,
    pub declared_type: TypeDescriptor,
}

impl ParameterSpec {
    pub fn new(binding: BindingKind, name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        ParameterSpec {
            binding,
            name: name.into(),
            declared_type,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HandlerSpec {
    /// Method name in the owning service.
    pub name: String,
    pub handler: Handler,
    pub verbs: Vec<Verb>,
    pub paths: Vec<String>,
    pub parameters: Arc<[ParameterSpec]>,
    pub return_type: Option<TypeDescriptor>,
    /// Reported in schema summaries only; may be a generic marker.
    pub awaited_type: Option<TypeRef>,
}

/// One boot pass over a single service.
#[derive(Clone, Debug)]
pub struct ServiceSpec {
    pub service: String,
    pub paths: Vec<String>,
    pub handlers: Vec<HandlerSpec>,
    pub models: Vec<String>,
    /// App config with the service override applied.
    pub config: AppConfig,
}

/// The flattened unit registered with the server.
#[derive(Clone, Debug)]
pub struct RouteEntry {
    pub verb: Verb,
    pub path: String,
    pub return_type: Option<TypeDescriptor>,
    pub awaited_type: Option<TypeRef>,
    pub parameters: Arc<[ParameterSpec]>,
    pub handler: Handler,
    /// None for synthesized model routes.
    pub owner: Option<String>,
}

impl RouteEntry {
    pub fn key(&self) -> (Verb, &str) {
        (self.verb, self.path.as_str())
    }

    /// `awaitedType ?? returnType ?? "String"`.
    pub fn response_type(&self) -> TypeRef {
        if let Some(awaited) = &self.awaited_type {
            return awaited.clone();
        }
        match &self.return_type {
            Some(t) => TypeRef::Concrete(t.clone()),
            None => TypeRef::Concrete(TypeDescriptor::string()),
        }
    }
}
