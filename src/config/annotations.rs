//! Declarative metadata attached to services, handler methods and parameters, and the read-only registry over it.

use crate::config::settings::ServiceConfig;
use crate::config::types::{BindingKind, OneOrMany, TypeDescriptor, TypeFactory, TypeRef, Verb};
use std::collections::HashMap;

/// Class-level metadata for a service.
#[derive(Clone, Debug, Default)]
pub struct ServiceMeta {
    pub path: Option<OneOrMany<String>>,
    /// Model names whose CRUD routes are generated under this service's paths.
    pub models: Vec<String>,
    pub config: Option<ServiceConfig>,
}

impl ServiceMeta {
    pub fn new(path: impl Into<OneOrMany<String>>) -> Self {
        ServiceMeta {
            path: Some(path.into()),
            models: Vec::new(),
            config: None,
        }
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Method-level route metadata. Presence marks the method as a route handler.
#[derive(Clone, Debug)]
pub struct HandlerMeta {
    pub request_method: Option<OneOrMany<Verb>>,
    pub path: OneOrMany<String>,
    pub return_type: Option<TypeFactory>,
    pub awaited_type: Option<TypeRef>,
}

impl HandlerMeta {
    pub fn new(path: impl Into<OneOrMany<String>>) -> Self {
        HandlerMeta {
            request_method: None,
            path: path.into(),
            return_type: None,
            awaited_type: None,
        }
    }

    pub fn method(mut self, verbs: impl Into<OneOrMany<Verb>>) -> Self {
        self.request_method = Some(verbs.into());
        self
    }

    pub fn returns(mut self, factory: TypeFactory) -> Self {
        self.return_type = Some(factory);
        self
    }

    pub fn awaits(mut self, awaited: impl Into<TypeRef>) -> Self {
        self.awaited_type = Some(awaited.into());
        self
    }
}

/// Parameter-level metadata, one entry per bound argument in declaration order.
#[derive(Clone, Debug)]
pub struct ParameterMeta {
    pub binding: BindingKind,
    pub name: String,
    pub type_: TypeDescriptor,
}

impl ParameterMeta {
    pub fn new(binding: BindingKind, name: impl Into<String>, type_: TypeDescriptor) -> Self {
        ParameterMeta {
            binding,
            name: name.into(),
            type_,
        }
    }
}

/// Read-only query interface over attached metadata.
pub trait AnnotationRegistry: Send + Sync {
    fn service(&self, service: &str) -> Option<&ServiceMeta>;

    fn handler(&self, service: &str, method: &str) -> Option<&HandlerMeta>;

    fn parameters(&self, service: &str, method: &str) -> Option<&[ParameterMeta]>;
}

/// In-memory registry filled by the application bootstrap.
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    services: HashMap<String, ServiceMeta>,
    handlers: HashMap<(String, String), HandlerMeta>,
    parameters: HashMap<(String, String), Vec<ParameterMeta>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, service: &str, meta: ServiceMeta) -> Self {
        self.services.insert(service.to_string(), meta);
        self
    }

    pub fn with_handler(mut self, service: &str, method: &str, meta: HandlerMeta) -> Self {
        self.handlers
            .insert((service.to_string(), method.to_string()), meta);
        self
    }

    pub fn with_parameters(mut self, service: &str, method: &str, params: Vec<ParameterMeta>) -> Self {
        self.parameters
            .insert((service.to_string(), method.to_string()), params);
        self
    }
}

impl AnnotationRegistry for StaticRegistry {
    fn service(&self, service: &str) -> Option<&ServiceMeta> {
        self.services.get(service)
    }

    fn handler(&self, service: &str, method: &str) -> Option<&HandlerMeta> {
        self.handlers.get(&(service.to_string(), method.to_string()))
    }

    fn parameters(&self, service: &str, method: &str) -> Option<&[ParameterMeta]> {
        self.parameters
            .get(&(service.to_string(), method.to_string()))
            .map(|v| v.as_slice())
    }
}
