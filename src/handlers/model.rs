//! Generated model handlers: search, create, read, update, delete, bulk update and child relations.

use crate::error::AppError;
use crate::handlers::Argument;
use crate::response::{empty_result, wrap_result};
use crate::service::{ModelContext, SearchQuery};
use serde_json::{Map, Value};

/// Query value naming the child relation to operate on (`?lines=$`).
pub const CHILD_MARKER: &str = "$";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrudOp {
    Search,
    Create,
    UpdateMany,
    Read,
    CreateChild,
    UpdateChild,
    Update,
    Delete,
}

impl CrudOp {
    pub fn name(&self) -> &'static str {
        match self {
            CrudOp::Search => "search",
            CrudOp::Create => "create",
            CrudOp::UpdateMany => "updateMany",
            CrudOp::Read => "read",
            CrudOp::CreateChild => "createChild",
            CrudOp::UpdateChild => "updateChild",
            CrudOp::Update => "update",
            CrudOp::Delete => "delete",
        }
    }
}

/// Arguments arrive in the order the generated route declares its parameters.
pub async fn dispatch(op: CrudOp, ctx: &ModelContext, args: Vec<Argument>) -> Result<Value, AppError> {
    let mut args = args.into_iter().map(Argument::into_value);
    let mut next = move || args.next().unwrap_or(Value::Null);
    tracing::debug!(model = %ctx.model.name, op = op.name(), "crud");
    match op {
        CrudOp::Search => search(ctx, next()).await,
        CrudOp::Create => create(ctx, next()).await,
        CrudOp::UpdateMany => {
            let query = next();
            update_many(ctx, query, next()).await
        }
        CrudOp::Read => read(ctx, next()).await,
        CrudOp::CreateChild => {
            let id = next();
            let query = next();
            create_child(ctx, id, query, next()).await
        }
        CrudOp::UpdateChild => {
            let id = next();
            let query = next();
            update_child(ctx, id, query, next()).await
        }
        CrudOp::Update => {
            let id = next();
            update(ctx, id, next()).await
        }
        CrudOp::Delete => delete(ctx, next()).await,
    }
}

fn id_of(value: Value) -> Result<String, AppError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Err(AppError::BadRequest("missing id".into())),
        other => Ok(other.to_string()),
    }
}

/// The single query key whose value is the child marker, plus the query without it.
fn child_relation(query: Value) -> Option<(String, Value)> {
    let Value::Object(map) = query else {
        return None;
    };
    let mut marked = map.iter().filter(|(_, v)| v.as_str() == Some(CHILD_MARKER));
    let (relation, _) = marked.next()?;
    if marked.next().is_some() {
        return None;
    }
    let relation = relation.clone();
    let rest: Map<String, Value> = map.into_iter().filter(|(k, _)| *k != relation).collect();
    Some((relation, Value::Object(rest)))
}

/// Flattens nested keys and folds `$regex:` values before delegating.
pub async fn search(ctx: &ModelContext, query: Value) -> Result<Value, AppError> {
    let filter = SearchQuery::from_query(&query)?;
    let rows = ctx.data_access.search(filter).await?;
    Ok(Value::Array(rows))
}

/// Arrays go to bulk create; the data-access result is returned as-is.
pub async fn create(ctx: &ModelContext, body: Value) -> Result<Value, AppError> {
    match body {
        Value::Array(items) => ctx.data_access.create_many(items).await,
        other => ctx.data_access.create(other).await,
    }
}

pub async fn read(ctx: &ModelContext, id: Value) -> Result<Value, AppError> {
    let id = id_of(id)?;
    ctx.data_access.read(&id).await
}

pub async fn update(ctx: &ModelContext, id: Value, body: Value) -> Result<Value, AppError> {
    let id = id_of(id)?;
    ctx.data_access.update(&id, body).await.map(wrap_result)
}

pub async fn update_many(ctx: &ModelContext, query: Value, body: Value) -> Result<Value, AppError> {
    ctx.data_access.update_many(query, body).await.map(wrap_result)
}

pub async fn delete(ctx: &ModelContext, id: Value) -> Result<Value, AppError> {
    let id = id_of(id)?;
    ctx.data_access.delete(&id).await.map(wrap_result)
}

/// No-op `{result: null}` when the query does not name exactly one relation.
pub async fn create_child(ctx: &ModelContext, id: Value, query: Value, body: Value) -> Result<Value, AppError> {
    let Some((relation, _)) = child_relation(query) else {
        return Ok(empty_result());
    };
    let id = id_of(id)?;
    ctx.data_access
        .create_child(&id, &relation, body)
        .await
        .map(wrap_result)
}

pub async fn update_child(ctx: &ModelContext, id: Value, query: Value, body: Value) -> Result<Value, AppError> {
    let Some((relation, rest)) = child_relation(query) else {
        return Ok(empty_result());
    };
    let id = id_of(id)?;
    ctx.data_access
        .update_child(&id, &relation, rest, body)
        .await
        .map(wrap_result)
}
