//! axum adapter for the route sink, and the listener loop.

use crate::boot::RouteSink;
use crate::config::resolved::ParameterSpec;
use crate::config::settings::AppConfig;
use crate::config::types::Verb;
use crate::error::AppError;
use crate::handlers::{extract_arguments, Handler};
use crate::request::{InboundRequest, ResponseContext};
use axum::{
    body::Bytes,
    extract::{Path, RawQuery},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Json, Router,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::net::TcpListener;

struct RouteTarget {
    parameters: Arc<[ParameterSpec]>,
    handler: Handler,
}

/// Collects routes per path and builds an axum `Router`. A repeated (verb, path) replaces the earlier one.
#[derive(Default)]
pub struct AxumSink {
    routes: BTreeMap<String, BTreeMap<Verb, Arc<RouteTarget>>>,
}

impl AxumSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for (path, verbs) in self.routes {
            let mut method_router: MethodRouter = MethodRouter::new();
            for (verb, target) in verbs {
                method_router = method_router.on(
                    method_filter(verb),
                    move |params: Option<Path<HashMap<String, String>>>,
                          RawQuery(query): RawQuery,
                          headers: HeaderMap,
                          body: Bytes| {
                        let target = Arc::clone(&target);
                        async move {
                            let params = params.map(|Path(p)| p).unwrap_or_default();
                            invoke_route(&target, params, query, headers, body).await
                        }
                    },
                );
            }
            router = router.route(&path, method_router);
        }
        router
    }
}

impl RouteSink for AxumSink {
    fn add_mapping(
        &mut self,
        path: &str,
        verb: Verb,
        parameters: Arc<[ParameterSpec]>,
        handler: Handler,
        owner: Option<&str>,
    ) {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            tracing::warn!(path = %path, "route path has no leading slash, registering under /{}", path);
            format!("/{}", path)
        };
        let target = Arc::new(RouteTarget { parameters, handler });
        if self
            .routes
            .entry(path.clone())
            .or_default()
            .insert(verb, target)
            .is_some()
        {
            tracing::warn!(verb = %verb, path = %path, owner = ?owner, "route replaced an earlier registration");
        }
    }
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Options => MethodFilter::OPTIONS,
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Put => MethodFilter::PUT,
        Verb::Patch => MethodFilter::PATCH,
        Verb::Delete => MethodFilter::DELETE,
    }
}

async fn invoke_route(
    target: &RouteTarget,
    params: HashMap<String, String>,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = Arc::new(InboundRequest::from_parts(params, query.as_deref(), &headers, &body)?);
    let response = ResponseContext::new();
    let args = extract_arguments(&request, &response, &target.parameters);
    let value = target.handler.invoke(args).await?;

    let parts = response.snapshot();
    let mut res = Json(value).into_response();
    if let Some(status) = parts.status {
        *res.status_mut() = status;
    }
    for (name, value) in parts.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            (Ok(name), Ok(value)) => {
                res.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %name, "invalid response header dropped"),
        }
    }
    Ok(res)
}

pub async fn serve(router: Router, config: &AppConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(app = %config.name, ">> listening on {} <<", listener.local_addr()?);
    axum::serve(listener, router).await
}
