//! Flatten a nested locale document into dotted leaf keys.
//!
//! The walk is depth-first and follows document order, which `serde_json`
//! keeps because the workspace enables its `preserve_order` feature. Array
//! elements use their decimal index as the path segment. Containers never
//! produce entries of their own, so empty objects and arrays vanish.

use serde_json::Value;

/// One leaf of a flattened document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatEntry {
    pub full_key: String,
    /// Stringified leaf; `null` becomes the empty string
    pub value: String,
    /// Last segment of `full_key`
    pub label: String,
}

/// Flatten a document from the root.
///
/// A scalar at the root has no key and yields nothing.
pub fn flatten(payload: &Value) -> Vec<FlatEntry> {
    flatten_with_prefix(payload, "")
}

/// Flatten a document whose keys are nested under `prefix`.
pub fn flatten_with_prefix(payload: &Value, prefix: &str) -> Vec<FlatEntry> {
    let mut entries = Vec::new();
    walk(payload, prefix, &mut entries);
    entries
}

fn walk(node: &Value, prefix: &str, out: &mut Vec<FlatEntry>) {
    match node {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                walk(item, &join(prefix, &idx.to_string()), out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                walk(item, &join(prefix, key), out);
            }
        }
        leaf => {
            if prefix.is_empty() {
                return;
            }
            out.push(FlatEntry {
                full_key: prefix.to_string(),
                value: stringify(leaf),
                label: last_segment(prefix).to_string(),
            });
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn last_segment(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

fn stringify(leaf: &Value) -> String {
    match leaf {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(entries: &[FlatEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.full_key.as_str()).collect()
    }

    #[test]
    fn test_flatten_preserves_document_order() {
        let doc = json!({"b": {"y": "1", "x": "2"}, "a": "3"});
        let entries = flatten(&doc);
        assert_eq!(keys(&entries), vec!["b.y", "b.x", "a"]);
    }

    #[test]
    fn test_flatten_arrays_use_indices() {
        let doc = json!({"menu": [{"title": "Home"}, {"title": "About"}]});
        let entries = flatten(&doc);

        assert_eq!(keys(&entries), vec!["menu.0.title", "menu.1.title"]);
        assert_eq!(entries[1].value, "About");
        assert_eq!(entries[1].label, "title");
    }

    #[test]
    fn test_flatten_stringifies_scalars() {
        let doc = json!({"n": 42, "f": 1.5, "t": true, "z": null});
        let flat = flatten(&doc);
        let values: Vec<&str> = flat.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["42", "1.5", "true", ""]);
    }

    #[test]
    fn test_flatten_skips_empty_containers_and_root_scalar() {
        assert!(flatten(&json!({"a": {}, "b": []})).is_empty());
        assert!(flatten(&json!("bare")).is_empty());
        assert!(flatten(&json!(null)).is_empty());
    }

    #[test]
    fn test_flatten_with_prefix() {
        let entries = flatten_with_prefix(&json!("Welcome"), "home.title");
        assert_eq!(
            entries,
            vec![FlatEntry {
                full_key: "home.title".to_string(),
                value: "Welcome".to_string(),
                label: "title".to_string(),
            }]
        );

        let entries = flatten_with_prefix(&json!({"x": "1"}), "root");
        assert_eq!(keys(&entries), vec!["root.x"]);
    }

    #[test]
    fn test_label_of_dotted_object_key() {
        let entries = flatten(&json!({"a.b": "v"}));
        assert_eq!(entries[0].full_key, "a.b");
        assert_eq!(entries[0].label, "b");
    }

    #[test]
    fn test_array_index_label() {
        let entries = flatten(&json!({"tags": ["x"]}));
        assert_eq!(entries[0].label, "0");
    }
}
