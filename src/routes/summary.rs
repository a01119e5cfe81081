//! Per-URL schema summaries served from synthetic OPTIONS routes.
//!
//! Routes are grouped by exact URL; the last entry per verb wins. For each verb the summary lists the
//! request data by location (path, headers, query, body) and the response type name. Aggregate
//! parameters (whole query/body/headers) expand into their declared properties, filtered by the
//! property access modes for the verb. Every structured type seen contributes its fields to a single
//! `schema` list, de-duplicated by field name with the first occurrence kept. Two different types
//! that share a field name therefore contribute only one entry.

use crate::config::resolved::RouteEntry;
use crate::config::types::{AccessMode, BindingKind, TypeDescriptor, TypeRef, TypeRegistry, Verb};
use crate::handlers::Handler;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RequestData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<FieldSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<FieldSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Vec<FieldSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<FieldSchema>>,
}

impl RequestData {
    fn bucket(&mut self, binding: BindingKind) -> Option<&mut Option<Vec<FieldSchema>>> {
        match binding {
            BindingKind::PathParam => Some(&mut self.path),
            BindingKind::Headers | BindingKind::HeaderParam => Some(&mut self.headers),
            BindingKind::Query | BindingKind::QueryParam => Some(&mut self.query),
            BindingKind::Body | BindingKind::BodyParam => Some(&mut self.body),
            BindingKind::Request | BindingKind::Response => None,
        }
    }
}

/// Names already present in the bucket are skipped.
fn push_unique(bucket: &mut Option<Vec<FieldSchema>>, name: &str, type_name: &str) {
    let fields = bucket.get_or_insert_with(Vec::new);
    if fields.iter().any(|f| f.name == name) {
        return;
    }
    fields.push(FieldSchema {
        name: name.to_string(),
        type_name: type_name.to_string(),
    });
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerbSummary {
    #[serde(rename = "requestData")]
    pub request_data: RequestData,
    #[serde(rename = "responseType")]
    pub response_type: String,
}

/// One field of a structured type, with nested fields when its type is itself structured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "dynamicAccessMode", skip_serializing_if = "Option::is_none")]
    pub access: Option<Vec<AccessMode>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SchemaEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub url: String,
    #[serde(flatten)]
    pub per_verb: BTreeMap<Verb, VerbSummary>,
    pub schema: Vec<SchemaEntry>,
}

impl SchemaSummary {
    pub fn verb(&self, verb: Verb) -> Option<&VerbSummary> {
        self.per_verb.get(&verb)
    }

    pub fn schema_field(&self, name: &str) -> Option<&SchemaEntry> {
        self.schema.iter().find(|e| e.name == name)
    }
}

struct SchemaCollector<'a> {
    types: &'a TypeRegistry,
    seen: HashSet<String>,
    entries: Vec<SchemaEntry>,
}

impl<'a> SchemaCollector<'a> {
    fn new(types: &'a TypeRegistry) -> Self {
        SchemaCollector {
            types,
            seen: HashSet::new(),
            entries: Vec::new(),
        }
    }

    fn collect(&mut self, ty: &TypeDescriptor) {
        let mut visiting = HashSet::from([ty.name.clone()]);
        for prop in &ty.properties {
            if !self.seen.insert(prop.name.clone()) {
                continue;
            }
            let entry = SchemaEntry {
                name: prop.name.clone(),
                type_name: prop.type_name.clone(),
                access: prop.access.clone(),
                fields: self.nested(&prop.type_name, &mut visiting),
            };
            self.entries.push(entry);
        }
    }

    /// Fields of a structured property type. Cycles stop at the first repeat.
    fn nested(&self, type_name: &str, visiting: &mut HashSet<String>) -> Vec<SchemaEntry> {
        let Some(ty) = self.types.lookup(type_name) else {
            return Vec::new();
        };
        if !ty.is_structured() || !visiting.insert(ty.name.clone()) {
            return Vec::new();
        }
        let fields = ty
            .properties
            .iter()
            .map(|p| SchemaEntry {
                name: p.name.clone(),
                type_name: p.type_name.clone(),
                access: p.access.clone(),
                fields: self.nested(&p.type_name, visiting),
            })
            .collect();
        visiting.remove(&ty.name);
        fields
    }
}

/// Group by URL in first-seen order, keeping the last entry per verb.
fn group_by_url(routes: &[RouteEntry]) -> Vec<(&str, BTreeMap<Verb, &RouteEntry>)> {
    let mut groups: Vec<(&str, BTreeMap<Verb, &RouteEntry>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for route in routes {
        let i = *index.entry(route.path.as_str()).or_insert_with(|| {
            groups.push((route.path.as_str(), BTreeMap::new()));
            groups.len() - 1
        });
        groups[i].1.insert(route.verb, route);
    }
    groups
}

fn summarize_verb(verb: Verb, route: &RouteEntry, collector: &mut SchemaCollector<'_>) -> VerbSummary {
    let response = route.response_type();
    let types = collector.types;
    match types.resolve(&response) {
        Some(ty) => collector.collect(ty),
        None => {
            tracing::warn!(path = %route.path, verb = %verb, response = %response.name(), "response type not registered, schema omitted");
        }
    }

    let mut request_data = RequestData::default();
    for param in route.parameters.iter() {
        let Some(bucket) = request_data.bucket(param.binding) else {
            continue;
        };
        if param.binding.is_aggregate() {
            for prop in param.declared_type.properties.iter().filter(|p| p.visible_for(verb)) {
                push_unique(bucket, &prop.name, &prop.type_name);
            }
        } else {
            push_unique(bucket, &param.name, &param.declared_type.name);
        }
        collector.collect(&param.declared_type);
    }

    let response_type = match &response {
        TypeRef::Concrete(t) => t.name.clone(),
        TypeRef::Marker(m) => m.clone(),
    };
    VerbSummary {
        request_data,
        response_type,
    }
}

/// One summary per distinct URL, in first-seen order.
pub fn build_summaries(routes: &[RouteEntry], types: &TypeRegistry) -> Vec<SchemaSummary> {
    group_by_url(routes)
        .into_iter()
        .map(|(url, by_verb)| {
            let mut collector = SchemaCollector::new(types);
            let per_verb = by_verb
                .into_iter()
                .map(|(verb, route)| (verb, summarize_verb(verb, route, &mut collector)))
                .collect();
            SchemaSummary {
                url: url.to_string(),
                per_verb,
                schema: collector.entries,
            }
        })
        .collect()
}

/// Synthetic OPTIONS route per summary.
pub fn summary_routes(summaries: Vec<SchemaSummary>) -> Vec<RouteEntry> {
    summaries
        .into_iter()
        .map(|summary| RouteEntry {
            verb: Verb::Options,
            path: summary.url.clone(),
            return_type: None,
            awaited_type: None,
            parameters: Vec::new().into(),
            handler: Handler::Summary(Arc::new(summary)),
            owner: None,
        })
        .collect()
}
