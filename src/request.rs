//! Request/response boundary objects handed to handlers.

use crate::case::to_kebab_case;
use crate::error::AppError;
use axum::http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Inbound request data a handler can bind against.
#[derive(Clone, Debug, Default)]
pub struct InboundRequest {
    pub params: HashMap<String, String>,
    pub query: Map<String, Value>,
    pub body: Value,
    /// Keys are lower-cased on ingress.
    pub headers: HashMap<String, String>,
}

impl InboundRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// Non-object values leave the query empty.
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = match query {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    /// Build from the pieces an HTTP server hands over. Empty body binds as null.
    pub fn from_parts(
        params: HashMap<String, String>,
        raw_query: Option<&str>,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Self, AppError> {
        let query = raw_query.map(parse_query).unwrap_or_default();
        let headers = headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.as_str().to_lowercase(), s.to_string())))
            .collect();
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(body)
                .map_err(|e| AppError::BadRequest(format!("body must be JSON: {}", e)))?
        };
        Ok(InboundRequest {
            params,
            query,
            body,
            headers,
        })
    }

    /// Declared name first, then the kebab-cased fallback (`contentType` -> `content-type`).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| self.headers.get(&to_kebab_case(name)))
            .or_else(|| self.headers.get(&name.to_lowercase()))
            .map(String::as_str)
    }

    pub fn headers_value(&self) -> Value {
        Value::Object(
            self.headers
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    pub fn query_value(&self) -> Value {
        Value::Object(self.query.clone())
    }

    pub fn body_field(&self, name: &str) -> Value {
        self.body.get(name).cloned().unwrap_or(Value::Null)
    }
}

/// Parse a raw query string into a JSON object. `a[b]=c` nests, repeated keys and `a[]=x` collect into arrays.
pub fn parse_query(raw: &str) -> Map<String, Value> {
    let mut out = Map::new();
    for (k, v) in url::form_urlencoded::parse(raw.as_bytes()) {
        let segments = key_segments(&k);
        insert_segments(&mut out, &segments, Value::String(v.into_owned()));
    }
    out
}

fn key_segments(key: &str) -> Vec<String> {
    match key.find('[') {
        Some(i) if i > 0 && key.ends_with(']') => {
            let mut segments = vec![key[..i].to_string()];
            segments.extend(key[i + 1..key.len() - 1].split("][").map(String::from));
            segments
        }
        _ => vec![key.to_string()],
    }
}

fn push_value(slot: &mut Value, value: Value) {
    match slot {
        Value::Array(arr) => arr.push(value),
        other => {
            let prev = other.take();
            *other = Value::Array(vec![prev, value]);
        }
    }
}

fn insert_segments(map: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        match map.get_mut(head) {
            Some(slot) => push_value(slot, value),
            None => {
                map.insert(head.clone(), value);
            }
        }
        return;
    }
    if rest.len() == 1 && rest[0].is_empty() {
        let slot = map
            .entry(head.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        push_value(slot, value);
        return;
    }
    let slot = map
        .entry(head.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    match slot {
        Value::Object(inner) => insert_segments(inner, rest, value),
        // A plain value already holds the key: keep both, as repeated keys do.
        other => {
            let mut nested = Map::new();
            insert_segments(&mut nested, rest, value);
            push_value(other, Value::Object(nested));
        }
    }
}

/// Status and headers a handler wants applied to its response.
#[derive(Clone, Debug, Default)]
pub struct ResponseParts {
    pub status: Option<StatusCode>,
    pub headers: Vec<(String, String)>,
}

/// Shared handle bound for `Response` parameters.
#[derive(Clone, Debug, Default)]
pub struct ResponseContext {
    inner: Arc<Mutex<ResponseParts>>,
}

impl ResponseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, status: StatusCode) {
        self.lock().status = Some(status);
    }

    pub fn insert_header(&self, name: &str, value: &str) {
        self.lock().headers.push((name.to_string(), value.to_string()));
    }

    pub fn snapshot(&self) -> ResponseParts {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ResponseParts> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_nested_and_repeated_keys() {
        let q = parse_query("status=open&customer[name]=Al&tag=a&tag=b&ids[]=1&name=%24regex%3AAnh");
        assert_eq!(
            Value::Object(q),
            json!({
                "status": "open",
                "customer": {"name": "Al"},
                "tag": ["a", "b"],
                "ids": ["1"],
                "name": "$regex:Anh"
            })
        );
    }

    #[test]
    fn plain_and_nested_values_under_one_key_are_both_kept() {
        let q = parse_query("a=1&a[b]=2");
        assert_eq!(Value::Object(q), json!({"a": ["1", {"b": "2"}]}));
        let q = parse_query("a[b]=2&a=1");
        assert_eq!(Value::Object(q), json!({"a": [{"b": "2"}, "1"]}));
    }

    #[test]
    fn header_lookup_falls_back_to_kebab_case() {
        let req = InboundRequest::new().with_header("X-Tenant-Id", "t1");
        assert_eq!(req.header("xTenantId"), Some("t1"));
        assert_eq!(req.header("x-tenant-id"), Some("t1"));
        assert_eq!(req.header("missing"), None);
    }

    #[test]
    fn empty_body_binds_null() {
        let req = InboundRequest::from_parts(HashMap::new(), None, &HeaderMap::new(), b"").unwrap();
        assert_eq!(req.body, Value::Null);
        let err = InboundRequest::from_parts(HashMap::new(), None, &HeaderMap::new(), b"{oops").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn response_context_is_shared_between_clones() {
        let ctx = ResponseContext::new();
        let handle = ctx.clone();
        handle.set_status(StatusCode::CREATED);
        handle.insert_header("location", "/orders/1");
        let parts = ctx.snapshot();
        assert_eq!(parts.status, Some(StatusCode::CREATED));
        assert_eq!(parts.headers.len(), 1);
    }
}
