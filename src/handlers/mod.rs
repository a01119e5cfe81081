//! Handler functions behind registered routes, and the positional arguments they receive.

pub mod arguments;
pub mod model;

pub use arguments::extract_arguments;
pub use model::CrudOp;

use crate::error::AppError;
use crate::request::{InboundRequest, ResponseContext};
use crate::routes::summary::SchemaSummary;
use crate::service::ModelContext;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// One positional handler argument.
#[derive(Clone, Debug)]
pub enum Argument {
    /// Null when the request carried nothing under that name.
    Value(Value),
    Request(Arc<InboundRequest>),
    Response(ResponseContext),
}

impl Argument {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Argument::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// Request/response handles become null.
    pub fn into_value(self) -> Value {
        match self {
            Argument::Value(v) => v,
            _ => Value::Null,
        }
    }
}

pub type HandlerFuture = BoxFuture<'static, Result<Value, AppError>>;

/// A service method registered for routing.
pub type ServiceFn = Arc<dyn Fn(Vec<Argument>) -> HandlerFuture + Send + Sync>;

/// Wrap an async closure as a `ServiceFn`.
pub fn service_fn<F, Fut>(f: F) -> ServiceFn
where
    F: Fn(Vec<Argument>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, AppError>> + Send + 'static,
{
    Arc::new(move |args| f(args).boxed())
}

#[derive(Clone)]
pub enum Handler {
    Service(ServiceFn),
    /// Generated model operation; the context is passed explicitly on every call.
    Crud { op: CrudOp, ctx: Arc<ModelContext> },
    /// Synthetic OPTIONS route returning a prebuilt summary.
    Summary(Arc<SchemaSummary>),
}

impl Handler {
    pub async fn invoke(&self, args: Vec<Argument>) -> Result<Value, AppError> {
        match self {
            Handler::Service(f) => f(args).await,
            Handler::Crud { op, ctx } => model::dispatch(*op, ctx, args).await,
            Handler::Summary(summary) => {
                serde_json::to_value(summary.as_ref()).map_err(|e| AppError::Internal(e.to_string()))
            }
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Service(_) => f.write_str("Handler::Service"),
            Handler::Crud { op, ctx } => write!(f, "Handler::Crud({} {})", op.name(), ctx.model.name),
            Handler::Summary(s) => write!(f, "Handler::Summary({})", s.url),
        }
    }
}
