//! Boot orchestration: resolve services, generate model routes, merge, register, and attach per-URL summaries.

use crate::config::annotations::AnnotationRegistry;
use crate::config::loader::{resolve_service, ServiceRegistration};
use crate::config::resolved::{ParameterSpec, RouteEntry};
use crate::config::settings::AppConfig;
use crate::config::types::{TypeRegistry, Verb};
use crate::config::validator::validate_models;
use crate::error::BootError;
use crate::handlers::Handler;
use crate::routes::{build_summaries, dedupe_routes, flatten_service, model_routes, summary_routes};
use crate::server::{serve, AxumSink};
use crate::service::ModelBindings;
use std::collections::HashSet;
use std::sync::Arc;

/// Receives one call per registered route.
pub trait RouteSink {
    fn add_mapping(
        &mut self,
        path: &str,
        verb: Verb,
        parameters: Arc<[ParameterSpec]>,
        handler: Handler,
        owner: Option<&str>,
    );
}

/// Output of one service's boot pass.
#[derive(Clone, Debug)]
pub struct CompiledService {
    pub service: String,
    /// App config with the service override applied.
    pub config: AppConfig,
    /// Declared and generated routes, one per (verb, path).
    pub routes: Vec<RouteEntry>,
    /// Synthetic OPTIONS routes, one per URL.
    pub options: Vec<RouteEntry>,
}

impl CompiledService {
    pub fn all_routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter().chain(self.options.iter())
    }
}

pub struct Booter {
    registry: Arc<dyn AnnotationRegistry>,
    models: ModelBindings,
    types: TypeRegistry,
    config: AppConfig,
}

impl Booter {
    /// Bound models are entered into the type registry.
    pub fn new(
        registry: Arc<dyn AnnotationRegistry>,
        models: ModelBindings,
        mut types: TypeRegistry,
        config: AppConfig,
    ) -> Self {
        models.register_types(&mut types);
        Booter {
            registry,
            models,
            types,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Build the route table for one service without registering it.
    pub fn compile_service(&self, registration: &ServiceRegistration) -> Result<CompiledService, BootError> {
        let spec = resolve_service(self.registry.as_ref(), registration, &self.config)?;
        validate_models(&spec, &self.models)?;

        let mut merged = Vec::new();
        for base in &spec.paths {
            for model in &spec.models {
                if let Some(ctx) = self.models.get(model) {
                    merged.extend(model_routes(base, ctx));
                }
            }
        }
        // Declared handlers come last so they override generated routes on the same (verb, path).
        merged.extend(flatten_service(&spec));
        let routes = dedupe_routes(merged);

        let explicit_options: HashSet<&str> = routes
            .iter()
            .filter(|r| r.verb == Verb::Options)
            .map(|r| r.path.as_str())
            .collect();
        let options: Vec<RouteEntry> = summary_routes(build_summaries(&routes, &self.types))
            .into_iter()
            .filter(|r| {
                let declared = explicit_options.contains(r.path.as_str());
                if declared {
                    tracing::warn!(path = %r.path, service = %spec.service, "OPTIONS declared by service, summary not registered");
                }
                !declared
            })
            .collect();

        tracing::debug!(
            service = %spec.service,
            routes = routes.len(),
            summaries = options.len(),
            "compiled service"
        );
        Ok(CompiledService {
            service: spec.service,
            config: spec.config,
            routes,
            options,
        })
    }

    /// Compile one service and register every route with the sink.
    pub fn boot_service<S: RouteSink + ?Sized>(
        &self,
        sink: &mut S,
        registration: &ServiceRegistration,
    ) -> Result<CompiledService, BootError> {
        let compiled = self.compile_service(registration)?;
        for route in compiled.all_routes() {
            if compiled.config.dev_mode {
                tracing::info!("apply method \"{}\" for url \"{}\"", route.verb, route.path);
            } else {
                tracing::debug!(verb = %route.verb, path = %route.path, owner = ?route.owner, "register route");
            }
            sink.add_mapping(
                &route.path,
                route.verb,
                Arc::clone(&route.parameters),
                route.handler.clone(),
                route.owner.as_deref(),
            );
        }
        Ok(compiled)
    }
}

/// An application: a booter plus the services it boots, in order.
pub struct App {
    booter: Booter,
    services: Vec<ServiceRegistration>,
}

impl App {
    pub fn new(booter: Booter) -> Self {
        App {
            booter,
            services: Vec::new(),
        }
    }

    pub fn service(mut self, registration: ServiceRegistration) -> Self {
        self.services.push(registration);
        self
    }

    pub fn boot_into<S: RouteSink + ?Sized>(&self, sink: &mut S) -> Result<Vec<CompiledService>, BootError> {
        if self.services.is_empty() {
            return Err(BootError::InvalidSetting(format!(
                "app '{}' registers no services",
                self.booter.config().name
            )));
        }
        self.services
            .iter()
            .map(|s| self.booter.boot_service(sink, s))
            .collect()
    }

    pub fn router(&self) -> Result<axum::Router, BootError> {
        let mut sink = AxumSink::new();
        self.boot_into(&mut sink)?;
        Ok(sink.into_router())
    }

    /// Boot every service and serve on the configured address until the listener fails.
    pub async fn run(self) -> Result<(), BootError> {
        let router = self.router()?;
        serve(router, self.booter.config()).await?;
        Ok(())
    }
}
