//! Conversion between document trees and flat property maps
//!
//! [`flatten`] walks a parsed document depth-first and emits one entry per
//! leaf, keyed by the path of mapping names leading to it. [`rebuild`] is
//! the inverse: keys sharing a prefix are grouped back under one mapping,
//! in the order the prefixes were first seen.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::key::PropertyKey;
use crate::value::Value;

/// Flat, insertion-ordered mapping from property key to leaf value
pub type PropertyMap = IndexMap<PropertyKey, Value>;

/// Flatten a whole document
///
/// The root must be a mapping; an empty document flattens to nothing.
pub fn flatten(tree: Value) -> Result<PropertyMap> {
    let mut out = PropertyMap::new();
    match tree {
        Value::Null => {}
        Value::Mapping(_) => flatten_into(&PropertyKey::root(), tree, &mut out),
        other => {
            return Err(Error::parse(format!(
                "Document root must be a mapping, found a {}",
                other.type_name()
            )))
        }
    }
    Ok(out)
}

/// Flatten `value` beneath `prefix`, appending entries to `out`
///
/// Mappings recurse; an empty mapping emits nothing. Sequences are always
/// a single leaf, including sequences holding mappings or sequences,
/// which are kept whole.
pub fn flatten_into(prefix: &PropertyKey, value: Value, out: &mut PropertyMap) {
    match value {
        Value::Mapping(map) => {
            for (name, child) in map {
                flatten_into(&prefix.child(name), child, out);
            }
        }
        Value::Sequence(items) => {
            if !items.iter().all(Value::is_scalar) {
                log::trace!("Keeping structured sequence at '{}' as one leaf", prefix);
            }
            out.insert(prefix.clone(), Value::Sequence(items));
        }
        scalar => {
            out.insert(prefix.clone(), scalar);
        }
    }
}

/// Rebuild a document tree from flat entries
///
/// Fails when two entries cannot share one tree, e.g. `a` and `a.b` both
/// holding leaves, or when an entry sits at the root key.
pub fn rebuild<I>(entries: I) -> Result<Value>
where
    I: IntoIterator<Item = (PropertyKey, Value)>,
{
    let mut root = IndexMap::new();
    for (key, value) in entries {
        insert_leaf(&mut root, &key, value)?;
    }
    Ok(Value::Mapping(root))
}

fn insert_leaf(
    root: &mut IndexMap<String, Value>,
    key: &PropertyKey,
    value: Value,
) -> Result<()> {
    let Some((last, parents)) = key.segments().split_last() else {
        return Err(Error::write("Cannot place a value at the root key"));
    };

    let mut current = root;
    for segment in parents {
        let node = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Mapping(IndexMap::new()));
        current = match node {
            Value::Mapping(map) => map,
            _ => {
                return Err(Error::write(format!(
                    "'{}' holds a value and cannot also contain nested keys",
                    segment
                ))
                .with_path(key.to_string()))
            }
        };
    }

    if current.contains_key(last) {
        return Err(
            Error::write("Key collides with an existing entry").with_path(key.to_string())
        );
    }
    current.insert(last.clone(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(map: &PropertyMap) -> Vec<String> {
        map.keys().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_flatten_nested_mappings() {
        let tree = Value::from_yaml_str(
            r#"
key1: value1
key2:
  key3: value23
very:
  nested:
    properties: [nested1, nested2, nested3]
"#,
        )
        .unwrap();
        let map = flatten(tree).unwrap();

        assert_eq!(keys(&map), vec!["key1", "key2.key3", "very.nested.properties"]);
        assert_eq!(map[&PropertyKey::parse("key2.key3")].as_str(), Some("value23"));
    }

    #[test]
    fn test_flatten_scalar_sequence_is_one_leaf() {
        let tree = Value::from_yaml_str("key4:\n  key5:\n    - col1\n    - col2\n").unwrap();
        let map = flatten(tree).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(
            map[&PropertyKey::parse("key4.key5")],
            Value::from(vec!["col1", "col2"])
        );
    }

    #[test]
    fn test_flatten_structured_sequence_kept_whole() {
        let tree = Value::from_yaml_str(
            r#"
servers:
  - host: a
    port: 1
  - host: b
    port: 2
"#,
        )
        .unwrap();
        let map = flatten(tree).unwrap();

        assert_eq!(keys(&map), vec!["servers"]);
        let servers = map[&PropertyKey::parse("servers")].as_sequence().unwrap();
        assert_eq!(servers.len(), 2);
        assert!(servers[0].is_mapping());
    }

    #[test]
    fn test_flatten_empty_mapping_emits_nothing() {
        let tree = Value::from_yaml_str("empty: {}\nkept: 1\n").unwrap();
        let map = flatten(tree).unwrap();
        assert_eq!(keys(&map), vec!["kept"]);
    }

    #[test]
    fn test_flatten_empty_document() {
        assert!(flatten(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_rejects_non_mapping_root() {
        let err = flatten(Value::from(vec!["a", "b"])).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Parse);
    }

    #[test]
    fn test_flatten_dotted_yaml_key_is_one_segment() {
        let tree = Value::from_yaml_str("\"www.example.com\":\n  port: 80\n").unwrap();
        let map = flatten(tree).unwrap();

        let key = PropertyKey::from_segments(["www.example.com", "port"]);
        assert_eq!(map[&key], Value::Integer(80));
        assert_eq!(keys(&map), vec![r"www\.example\.com.port"]);
    }

    #[test]
    fn test_flatten_into_prefix() {
        let mut out = PropertyMap::new();
        let tree = Value::from_yaml_str("host: localhost\nport: 5432\n").unwrap();
        flatten_into(&PropertyKey::parse("database"), tree, &mut out);
        assert_eq!(keys(&out), vec!["database.host", "database.port"]);
    }

    #[test]
    fn test_rebuild_groups_shared_prefixes() {
        let entries = vec![
            (PropertyKey::parse("key1"), Value::from("value1")),
            (PropertyKey::parse("martin.name"), Value::from("Martin D'vloper")),
            (PropertyKey::parse("int1"), Value::Integer(37)),
            (PropertyKey::parse("martin.job"), Value::from("Developer")),
        ];
        let tree = rebuild(entries).unwrap();
        let root = tree.as_mapping().unwrap();

        let top: Vec<&str> = root.keys().map(String::as_str).collect();
        assert_eq!(top, vec!["key1", "martin", "int1"]);

        let martin = root["martin"].as_mapping().unwrap();
        assert_eq!(martin["name"].as_str(), Some("Martin D'vloper"));
        assert_eq!(martin["job"].as_str(), Some("Developer"));
    }

    #[test]
    fn test_rebuild_is_inverse_of_flatten() {
        let yaml = r#"
a:
  b: 1
  c:
    d: [x, y]
e: true
"#;
        let tree = Value::from_yaml_str(yaml).unwrap();
        let rebuilt = rebuild(flatten(tree.clone()).unwrap()).unwrap();
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn test_rebuild_conflicting_entries() {
        let entries = vec![
            (PropertyKey::parse("a"), Value::Integer(1)),
            (PropertyKey::parse("a.b"), Value::Integer(2)),
        ];
        let err = rebuild(entries).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Write);
        assert_eq!(err.path, Some("a.b".into()));
    }

    #[test]
    fn test_rebuild_root_key_rejected() {
        let err = rebuild(vec![(PropertyKey::root(), Value::Integer(1))]).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Write);
    }
}
