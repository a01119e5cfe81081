//! Gota boot: compiles annotated services and bound data models into an HTTP route table.

pub mod boot;
pub mod case;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;
pub mod service;

pub use boot::{App, Booter, CompiledService, RouteSink};
pub use config::{
    AccessMode, AnnotationRegistry, AppConfig, BindingKind, HandlerMeta, Model, OneOrMany, ParameterMeta,
    PropertyDescriptor, RouteEntry, ServiceConfig, ServiceMeta, ServiceRegistration, StaticRegistry, TypeDescriptor,
    TypeRef, TypeRegistry, Verb,
};
pub use error::{AppError, BootError};
pub use handlers::{Argument, CrudOp, Handler};
pub use logging::init_tracing;
pub use request::{InboundRequest, ResponseContext};
pub use response::wrap_result;
pub use routes::SchemaSummary;
pub use server::{serve, AxumSink};
pub use service::{DataAccess, FilterValue, ModelBindings, ModelContext, SearchQuery};
