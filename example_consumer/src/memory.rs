//! In-memory `DataAccess` keyed by a generated numeric id.

use async_trait::async_trait;
use gota_boot::{AppError, DataAccess, SearchQuery};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<u64, Value>>,
}

impl MemoryStore {
    fn insert(&self, mut body: Value) -> Result<String, AppError> {
        let mut docs = self.docs.write().map_err(|e| AppError::Internal(e.to_string()))?;
        let id = docs.keys().next_back().map(|k| k + 1).unwrap_or(1);
        if let Value::Object(map) = &mut body {
            map.insert("id".into(), json!(id.to_string()));
        }
        docs.insert(id, body);
        Ok(id.to_string())
    }

    fn key(id: &str) -> Result<u64, AppError> {
        id.parse().map_err(|_| AppError::BadRequest(format!("id '{}' is not numeric", id)))
    }
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Value::Object(t), Value::Object(p)) = (target, patch) {
        for (k, v) in p {
            t.insert(k.clone(), v.clone());
        }
    }
}

#[async_trait]
impl DataAccess for MemoryStore {
    async fn search(&self, query: SearchQuery) -> Result<Vec<Value>, AppError> {
        let docs = self.docs.read().map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(docs.values().filter(|d| query.matches(d)).cloned().collect())
    }

    async fn read(&self, id: &str) -> Result<Value, AppError> {
        let docs = self.docs.read().map_err(|e| AppError::Internal(e.to_string()))?;
        docs.get(&Self::key(id)?)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("order {}", id)))
    }

    async fn create(&self, body: Value) -> Result<Value, AppError> {
        Ok(Value::String(self.insert(body)?))
    }

    async fn create_many(&self, bodies: Vec<Value>) -> Result<Value, AppError> {
        let ids = bodies
            .into_iter()
            .map(|b| self.insert(b).map(Value::String))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(ids))
    }

    async fn update(&self, id: &str, body: Value) -> Result<Value, AppError> {
        let mut docs = self.docs.write().map_err(|e| AppError::Internal(e.to_string()))?;
        match docs.get_mut(&Self::key(id)?) {
            Some(doc) => {
                merge(doc, &body);
                Ok(json!(1))
            }
            None => Ok(json!(0)),
        }
    }

    async fn update_many(&self, query: Value, body: Value) -> Result<Value, AppError> {
        let filter = SearchQuery::from_query(&query)?;
        let mut docs = self.docs.write().map_err(|e| AppError::Internal(e.to_string()))?;
        let mut count = 0;
        for doc in docs.values_mut().filter(|d| filter.matches(d)) {
            merge(doc, &body);
            count += 1;
        }
        Ok(json!(count))
    }

    async fn delete(&self, id: &str) -> Result<Value, AppError> {
        let mut docs = self.docs.write().map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(json!(docs.remove(&Self::key(id)?).is_some()))
    }

    async fn create_child(&self, id: &str, relation: &str, body: Value) -> Result<Value, AppError> {
        let mut docs = self.docs.write().map_err(|e| AppError::Internal(e.to_string()))?;
        let doc = docs
            .get_mut(&Self::key(id)?)
            .ok_or_else(|| AppError::NotFound(format!("order {}", id)))?;
        let Value::Object(map) = doc else {
            return Err(AppError::Internal(format!("order {} is not an object", id)));
        };
        let children = map.entry(relation.to_string()).or_insert_with(|| json!([]));
        match children {
            Value::Array(items) => {
                items.push(body);
                Ok(json!(items.len()))
            }
            _ => Err(AppError::BadRequest(format!("'{}' is not a list", relation))),
        }
    }

    async fn update_child(&self, id: &str, relation: &str, query: Value, body: Value) -> Result<Value, AppError> {
        let filter = SearchQuery::from_query(&query)?;
        let mut docs = self.docs.write().map_err(|e| AppError::Internal(e.to_string()))?;
        let doc = docs
            .get_mut(&Self::key(id)?)
            .ok_or_else(|| AppError::NotFound(format!("order {}", id)))?;
        let mut count = 0;
        if let Some(Value::Array(items)) = doc.get_mut(relation) {
            for item in items.iter_mut().filter(|i| filter.matches(i)) {
                merge(item, &body);
                count += 1;
            }
        }
        Ok(json!(count))
    }
}
