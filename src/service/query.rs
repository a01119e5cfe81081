//! Search filters handed to data access: nested query keys flattened to dotted paths, `$regex:` values folded.

use crate::case::flatten_keys;
use crate::error::AppError;
use crate::service::search::{fold_regex, REGEX_PREFIX};
use regex::Regex;
use serde_json::Value;

#[derive(Clone, Debug)]
pub enum FilterValue {
    Exact(Value),
    Pattern(Regex),
}

/// Ordered list of (dotted key, filter).
#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    pub filters: Vec<(String, FilterValue)>,
}

impl SearchQuery {
    /// Non-object queries produce an empty filter set.
    pub fn from_query(query: &Value) -> Result<Self, AppError> {
        let Value::Object(map) = query else {
            return Ok(SearchQuery::default());
        };
        let mut filters = Vec::with_capacity(map.len());
        for (key, value) in flatten_keys(map) {
            let filter = match value.as_str().and_then(|s| s.strip_prefix(REGEX_PREFIX)) {
                Some(term) => FilterValue::Pattern(
                    fold_regex(term).map_err(|e| AppError::BadRequest(format!("search {}: {}", key, e)))?,
                ),
                None => FilterValue::Exact(value),
            };
            filters.push((key, filter));
        }
        Ok(SearchQuery { filters })
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.filters.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether a document satisfies every filter. Dotted keys walk nested objects.
    /// Exact filters compare scalars by their text form so "42" matches 42.
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|(key, filter)| {
            let Some(field) = lookup_dotted(doc, key) else {
                return false;
            };
            match filter {
                FilterValue::Exact(expected) => field == expected || scalar_text(field) == scalar_text(expected),
                FilterValue::Pattern(re) => scalar_text(field).map(|s| re.is_match(&s)).unwrap_or(false),
            }
        })
    }
}

fn lookup_dotted<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(doc, |cur, part| cur.get(part))
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
