//! Rebuild a nested document from dotted keys.
//!
//! Each key is split into [`Segment`]s once; a purely numeric segment addresses
//! an array slot, anything else an object member. Assignment walks the segments
//! by value: [`assign`] takes ownership of the current node and returns the
//! rebuilt node, so there is no shared mutable cursor.
//!
//! Conflicting shapes are resolved by replacement: an index segment applied to
//! a non-array turns it into a fresh array, a key segment applied to a
//! non-object turns it into a fresh object. Skipped array slots are filled with
//! `null`; arrays are never compacted.

use serde_json::{Map, Value};

/// Numeric segments above this are treated as object keys so that a single key
/// cannot force an arbitrarily large allocation.
pub const MAX_ARRAY_INDEX: usize = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    ArrayIndex(usize),
    ObjectKey(&'a str),
}

impl<'a> Segment<'a> {
    fn parse(raw: &'a str) -> Self {
        if raw.bytes().all(|b| b.is_ascii_digit())
            && let Ok(idx) = raw.parse::<usize>()
            && idx <= MAX_ARRAY_INDEX
        {
            return Segment::ArrayIndex(idx);
        }
        Segment::ObjectKey(raw)
    }
}

/// Split a dotted key into trimmed, non-empty segments.
pub fn parse_segments(full_key: &str) -> Vec<Segment<'_>> {
    full_key
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Segment::parse)
        .collect()
}

/// Write `value` at `segments` below `target` and return the updated node.
///
/// An empty segment list replaces `target` with `value`.
pub fn assign(target: Value, segments: &[Segment<'_>], value: Value) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };

    match *head {
        Segment::ArrayIndex(idx) => {
            let mut items = match target {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            if items.len() <= idx {
                items.resize(idx + 1, Value::Null);
            }
            let child = std::mem::take(&mut items[idx]);
            items[idx] = assign(child, rest, value);
            Value::Array(items)
        }
        Segment::ObjectKey(key) => {
            let mut map = match target {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let slot = map.entry(key.to_string()).or_insert(Value::Null);
            let child = std::mem::take(slot);
            *slot = assign(child, rest, value);
            Value::Object(map)
        }
    }
}

/// Assemble `(dotted key, value)` pairs into one document, starting from an
/// empty object. Later pairs overwrite earlier ones at the same path.
pub fn assemble<I, K, V>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .fold(Value::Object(Map::new()), |tree, (key, value)| {
            let segments = parse_segments(key.as_ref());
            assign(tree, &segments, value.into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_segments() {
        assert_eq!(
            parse_segments(" a . 0 ..b"),
            vec![
                Segment::ObjectKey("a"),
                Segment::ArrayIndex(0),
                Segment::ObjectKey("b")
            ]
        );
        assert!(parse_segments(" . . ").is_empty());
        assert_eq!(parse_segments("007"), vec![Segment::ArrayIndex(7)]);
        assert_eq!(parse_segments("-1"), vec![Segment::ObjectKey("-1")]);
        assert_eq!(
            parse_segments("99999999999"),
            vec![Segment::ObjectKey("99999999999")]
        );
    }

    #[test]
    fn test_assemble_index_segments_build_arrays() {
        let tree = assemble([("a.0", "x"), ("a.1", "y")]);
        assert_eq!(tree, json!({"a": ["x", "y"]}));
    }

    #[test]
    fn test_assemble_mixed_containers() {
        let tree = assemble([("a.b.0.c", "v")]);
        assert_eq!(tree, json!({"a": {"b": [{"c": "v"}]}}));
    }

    #[test]
    fn test_assemble_sparse_indices_fill_null() {
        let tree = assemble([("list.2", "c"), ("list.0", "a")]);
        assert_eq!(tree, json!({"list": ["a", null, "c"]}));
    }

    #[test]
    fn test_assemble_shape_conflicts_replace() {
        // scalar replaced by an object
        let tree = assemble([("a", "leaf"), ("a.b", "deep")]);
        assert_eq!(tree, json!({"a": {"b": "deep"}}));

        // object replaced by an array
        let tree = assemble([("a.k", "v"), ("a.0", "first")]);
        assert_eq!(tree, json!({"a": ["first"]}));
    }

    #[test]
    fn test_assemble_last_write_wins() {
        let tree = assemble([("a.b", "1"), ("a.b", "2")]);
        assert_eq!(tree, json!({"a": {"b": "2"}}));
    }

    #[test]
    fn test_assign_empty_segments_replaces_target() {
        let replaced = assign(json!({"old": true}), &[], json!("new"));
        assert_eq!(replaced, json!("new"));

        let tree = assemble([("a", json!("x")), (" . ", json!({"fresh": 1}))]);
        assert_eq!(tree, json!({"fresh": 1}));
    }

    #[test]
    fn test_assemble_keeps_first_seen_key_order() {
        let tree = assemble([("z", "1"), ("a", "2"), ("z", "3")]);
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    fn leaf() -> impl Strategy<Value = Value> {
        "[a-zA-Z0-9 ]{0,8}".prop_map(Value::String)
    }

    /// Documents that survive a flatten/assemble round trip: string leaves,
    /// non-empty containers and alphabetic object keys.
    fn document() -> impl Strategy<Value = Value> {
        let node = leaf().prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 1..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        });
        prop::collection::btree_map("[a-z]{1,6}", node, 1..4)
            .prop_map(|m| Value::Object(m.into_iter().collect()))
    }

    proptest! {
        #[test]
        fn flatten_then_assemble_round_trips(doc in document()) {
            let leaves = flatten(&doc);
            let rebuilt = assemble(leaves.iter().map(|l| (l.full_key.as_str(), l.value.as_str())));
            prop_assert_eq!(rebuilt, doc);
        }
    }
}
