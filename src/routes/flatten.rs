//! Expand multi-valued service/handler paths and verbs into one `RouteEntry` per concrete route.

use crate::config::resolved::{RouteEntry, ServiceSpec};
use crate::config::types::Verb;
use std::collections::HashMap;

/// service path × handler × verb × handler path, in that nesting order.
/// Paths are concatenated as written; no separator is inserted.
pub fn flatten_service(spec: &ServiceSpec) -> Vec<RouteEntry> {
    let mut out = Vec::new();
    for service_path in &spec.paths {
        for handler in &spec.handlers {
            for verb in &handler.verbs {
                for handler_path in &handler.paths {
                    out.push(RouteEntry {
                        verb: *verb,
                        path: format!("{}{}", service_path, handler_path),
                        return_type: handler.return_type.clone(),
                        awaited_type: handler.awaited_type.clone(),
                        parameters: handler.parameters.clone(),
                        handler: handler.handler.clone(),
                        owner: Some(spec.service.clone()),
                    });
                }
            }
        }
    }
    out
}

/// Keep one entry per (verb, path). A later entry replaces an earlier one in the earlier one's slot.
pub fn dedupe_routes(entries: Vec<RouteEntry>) -> Vec<RouteEntry> {
    collapse(entries, |replaced, by| {
        tracing::warn!(
            verb = %by.verb,
            path = %by.path,
            replaced = ?replaced.handler,
            by = ?by.handler,
            "route overridden"
        );
    })
}

pub(crate) fn collapse<F>(entries: Vec<RouteEntry>, mut on_replace: F) -> Vec<RouteEntry>
where
    F: FnMut(&RouteEntry, &RouteEntry),
{
    let mut out: Vec<RouteEntry> = Vec::with_capacity(entries.len());
    let mut index: HashMap<(Verb, String), usize> = HashMap::new();
    for entry in entries {
        let key = (entry.verb, entry.path.clone());
        match index.get(&key) {
            Some(&i) => {
                on_replace(&out[i], &entry);
                out[i] = entry;
            }
            None => {
                index.insert(key, out.len());
                out.push(entry);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolved::HandlerSpec;
    use crate::config::settings::AppConfig;
    use crate::handlers::{service_fn, Handler};
    use serde_json::Value;

    fn handler(name: &str, verbs: Vec<Verb>, paths: Vec<&str>) -> HandlerSpec {
        HandlerSpec {
            name: name.to_string(),
            handler: Handler::Service(service_fn(|_| async { Ok(Value::Null) })),
            verbs,
            paths: paths.into_iter().map(String::from).collect(),
            parameters: Vec::new().into(),
            return_type: None,
            awaited_type: None,
        }
    }

    fn service(paths: Vec<&str>, handlers: Vec<HandlerSpec>) -> ServiceSpec {
        ServiceSpec {
            service: "S".into(),
            paths: paths.into_iter().map(String::from).collect(),
            handlers,
            models: Vec::new(),
            config: AppConfig::default(),
        }
    }

    fn keys(routes: &[RouteEntry]) -> Vec<(Verb, String)> {
        routes.iter().map(|r| (r.verb, r.path.clone())).collect()
    }

    #[test]
    fn cartesian_expansion_in_order() {
        let spec = service(vec!["/a", "/b"], vec![handler("x", vec![Verb::Get, Verb::Post], vec!["/x"])]);
        let routes = flatten_service(&spec);
        assert_eq!(
            keys(&routes),
            vec![
                (Verb::Get, "/a/x".to_string()),
                (Verb::Post, "/a/x".to_string()),
                (Verb::Get, "/b/x".to_string()),
                (Verb::Post, "/b/x".to_string()),
            ]
        );
        assert!(routes.iter().all(|r| r.owner.as_deref() == Some("S")));
    }

    #[test]
    fn entry_count_is_product_of_multiplicities() {
        let spec = service(
            vec!["/v1", "/v2", "/v3"],
            vec![
                handler("a", vec![Verb::Get], vec!["/a", "/aa"]),
                handler("b", vec![Verb::Put, Verb::Patch, Verb::Delete], vec!["/b"]),
            ],
        );
        assert_eq!(flatten_service(&spec).len(), 3 * (1 * 2 + 3 * 1));
    }

    #[test]
    fn paths_concatenate_without_separator() {
        let spec = service(vec!["/api"], vec![handler("x", vec![Verb::Get], vec!["items", ""])]);
        let paths: Vec<String> = flatten_service(&spec).into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/apiitems", "/api"]);
    }

    #[test]
    fn dedupe_keeps_last_in_first_slot() {
        let spec = service(
            vec!["/s"],
            vec![
                handler("first", vec![Verb::Get], vec!["/x"]),
                handler("other", vec![Verb::Post], vec!["/x"]),
                handler("second", vec![Verb::Get], vec!["/x"]),
            ],
        );
        let mut routes = flatten_service(&spec);
        routes[2].owner = Some("winner".into());
        let routes = dedupe_routes(routes);
        assert_eq!(keys(&routes), vec![(Verb::Get, "/s/x".to_string()), (Verb::Post, "/s/x".to_string())]);
        assert_eq!(routes[0].owner.as_deref(), Some("winner"));
    }
}
