//! Resolve registered services against their metadata into `ServiceSpec`s.

use crate::config::annotations::AnnotationRegistry;
use crate::config::resolved::{HandlerSpec, ParameterSpec, ServiceSpec};
use crate::config::settings::AppConfig;
use crate::config::types::Verb;
use crate::error::{AppError, BootError};
use crate::handlers::{service_fn, Argument, Handler, ServiceFn};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// A service as handed over by the application: its name and its methods in declaration order.
#[derive(Clone, Debug)]
pub struct ServiceRegistration {
    pub name: String,
    pub methods: Vec<MethodRegistration>,
}

#[derive(Clone)]
pub struct MethodRegistration {
    pub name: String,
    pub handler: ServiceFn,
}

impl std::fmt::Debug for MethodRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistration").field("name", &self.name).finish()
    }
}

impl ServiceRegistration {
    pub fn new(name: impl Into<String>) -> Self {
        ServiceRegistration {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method<F, Fut>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(Vec<Argument>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, AppError>> + Send + 'static,
    {
        self.methods.push(MethodRegistration {
            name: name.to_string(),
            handler: service_fn(f),
        });
        self
    }
}

/// Parameter metadata in declaration order; no metadata means no bound arguments.
pub fn resolve_parameters(registry: &dyn AnnotationRegistry, service: &str, method: &str) -> Vec<ParameterSpec> {
    registry
        .parameters(service, method)
        .map(|params| {
            params
                .iter()
                .map(|p| ParameterSpec::new(p.binding, p.name.clone(), p.type_.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// None when the method carries no route metadata (it is not a handler).
pub fn resolve_handler(
    registry: &dyn AnnotationRegistry,
    service: &str,
    method: &MethodRegistration,
) -> Option<HandlerSpec> {
    let meta = registry.handler(service, &method.name)?;
    let verbs = meta
        .request_method
        .as_ref()
        .map(|v| v.to_vec())
        .unwrap_or_else(|| vec![Verb::Get]);
    let parameters = resolve_parameters(registry, service, &method.name);
    tracing::debug!(
        service = %service,
        method = %method.name,
        verbs = ?verbs,
        params = parameters.len(),
        "resolved handler"
    );
    Some(HandlerSpec {
        name: method.name.clone(),
        handler: Handler::Service(Arc::clone(&method.handler)),
        verbs,
        paths: meta.path.to_vec(),
        parameters: parameters.into(),
        return_type: meta.return_type.map(|factory| factory()),
        awaited_type: meta.awaited_type.clone(),
    })
}

/// Class metadata plus every method that resolves as a handler.
pub fn resolve_service(
    registry: &dyn AnnotationRegistry,
    registration: &ServiceRegistration,
    app: &AppConfig,
) -> Result<ServiceSpec, BootError> {
    let service = registration.name.as_str();
    let meta = registry
        .service(service)
        .ok_or_else(|| BootError::MissingServiceMetadata {
            service: service.to_string(),
        })?;
    let paths = meta
        .path
        .as_ref()
        .filter(|p| !p.is_empty())
        .map(|p| p.to_vec())
        .ok_or_else(|| BootError::MissingServicePath {
            service: service.to_string(),
        })?;
    let handlers = registration
        .methods
        .iter()
        .filter_map(|m| resolve_handler(registry, service, m))
        .collect();
    Ok(ServiceSpec {
        service: service.to_string(),
        paths,
        handlers,
        models: meta.models.clone(),
        config: app.merged(meta.config.as_ref()),
    })
}
