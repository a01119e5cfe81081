//! Name conversion: model names -> URL segments, header names -> kebab fallbacks, nested query keys -> dotted paths.

use serde_json::{Map, Value};

/// Convert an identifier to kebab-case: a hyphen before every uppercase letter except the first, then lowercase.
/// e.g. "OrderLine" -> "order-line", "contentType" -> "content-type"
pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten nested object keys into dotted paths. Arrays and scalars are leaves.
/// e.g. {"customer": {"name": "Al"}} -> {"customer.name": "Al"}
pub fn flatten_keys(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(&mut out, None, obj);
    out
}

fn flatten_into(out: &mut Map<String, Value>, prefix: Option<&str>, obj: &Map<String, Value>) {
    for (k, v) in obj {
        let key = match prefix {
            Some(p) => format!("{}.{}", p, k),
            None => k.clone(),
        };
        match v {
            Value::Object(inner) if !inner.is_empty() => flatten_into(out, Some(&key), inner),
            _ => {
                out.insert(key, v.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kebab_case_model_names() {
        assert_eq!(to_kebab_case("OrderLine"), "order-line");
        assert_eq!(to_kebab_case("Id"), "id");
        assert_eq!(to_kebab_case("A"), "a");
        assert_eq!(to_kebab_case("order-line"), "order-line");
    }

    #[test]
    fn kebab_case_is_idempotent() {
        let once = to_kebab_case("PurchaseOrderLine");
        assert_eq!(to_kebab_case(&once), once);
    }

    #[test]
    fn flatten_nested_query() {
        let v = json!({"status": "open", "customer": {"name": "Al", "address": {"city": "Hue"}}, "tags": ["a"]});
        let Value::Object(map) = v else { unreachable!() };
        let flat = Value::Object(flatten_keys(&map));
        assert_eq!(
            flat,
            json!({"status": "open", "customer.name": "Al", "customer.address.city": "Hue", "tags": ["a"]})
        );
    }
}
