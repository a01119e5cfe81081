//! Map an inbound request through a handler's parameter specs into positional arguments.

use crate::config::resolved::ParameterSpec;
use crate::config::types::BindingKind;
use crate::handlers::Argument;
use crate::request::{InboundRequest, ResponseContext};
use serde_json::Value;
use std::sync::Arc;

/// One argument per parameter, in declaration order.
pub fn extract_arguments(
    request: &Arc<InboundRequest>,
    response: &ResponseContext,
    parameters: &[ParameterSpec],
) -> Vec<Argument> {
    parameters
        .iter()
        .map(|p| extract_one(request, response, p))
        .collect()
}

fn extract_one(request: &Arc<InboundRequest>, response: &ResponseContext, p: &ParameterSpec) -> Argument {
    let value = match p.binding {
        BindingKind::PathParam => request
            .params
            .get(&p.name)
            .map(|s| Value::String(s.clone()))
            .unwrap_or(Value::Null),
        BindingKind::Query => request.query_value(),
        BindingKind::QueryParam => request.query.get(&p.name).cloned().unwrap_or(Value::Null),
        BindingKind::Body => request.body.clone(),
        BindingKind::BodyParam => request.body_field(&p.name),
        BindingKind::Headers => request.headers_value(),
        BindingKind::HeaderParam => request
            .header(&p.name)
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null),
        BindingKind::Request => return Argument::Request(Arc::clone(request)),
        BindingKind::Response => return Argument::Response(response.clone()),
    };
    Argument::Value(value)
}
