//! CRUD routes generated for a bound model under a service base path.
//! Parameterized `:id` segments match the axum path syntax the server adapter registers with.

use crate::case::to_kebab_case;
use crate::config::resolved::{ParameterSpec, RouteEntry};
use crate::config::types::{BindingKind, TypeDescriptor, TypeRef, Verb};
use crate::handlers::{CrudOp, Handler};
use crate::routes::flatten::collapse;
use crate::service::ModelContext;
use std::sync::Arc;

/// URL segment for a model name: `OrderLine` -> `order-line`.
pub fn model_segment(model_name: &str) -> String {
    to_kebab_case(model_name)
}

/// The seven routes of a model. `update` supersedes `updateChild` on `PATCH /:id`.
pub fn model_routes(base: &str, ctx: &Arc<ModelContext>) -> Vec<RouteEntry> {
    collapse(candidate_routes(base, ctx), |_, _| {})
}

fn candidate_routes(base: &str, ctx: &Arc<ModelContext>) -> Vec<RouteEntry> {
    let model = &ctx.model;
    let collection = format!("{}/{}", base, model_segment(&model.name));
    let item = format!("{}/:id", collection);

    let id = ParameterSpec::new(BindingKind::PathParam, "id", TypeDescriptor::string());
    let query = ParameterSpec::new(BindingKind::Query, "query", model.clone());
    let body = ParameterSpec::new(BindingKind::Body, "body", model.clone());
    let many = TypeRef::array_of(&model.name);
    let one = TypeRef::Concrete(model.clone());

    let route = |op: CrudOp, verb: Verb, path: &str, params: Vec<ParameterSpec>, awaited: TypeRef| RouteEntry {
        verb,
        path: path.to_string(),
        return_type: None,
        awaited_type: Some(awaited),
        parameters: params.into(),
        handler: Handler::Crud {
            op,
            ctx: Arc::clone(ctx),
        },
        owner: None,
    };

    vec![
        route(CrudOp::Search, Verb::Get, &collection, vec![query.clone()], many.clone()),
        route(CrudOp::Create, Verb::Post, &collection, vec![body.clone()], one),
        route(
            CrudOp::UpdateMany,
            Verb::Patch,
            &collection,
            vec![query.clone(), body.clone()],
            many.clone(),
        ),
        route(CrudOp::Read, Verb::Get, &item, vec![id.clone()], many.clone()),
        route(
            CrudOp::CreateChild,
            Verb::Post,
            &item,
            vec![id.clone(), query.clone(), body.clone()],
            many.clone(),
        ),
        route(
            CrudOp::UpdateChild,
            Verb::Patch,
            &item,
            vec![id.clone(), query, body.clone()],
            many.clone(),
        ),
        route(CrudOp::Update, Verb::Patch, &item, vec![id.clone(), body], many.clone()),
        route(CrudOp::Delete, Verb::Delete, &item, vec![id], many),
    ]
}
