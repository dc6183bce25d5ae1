//! Configuration value types
//!
//! [`Value`] is the generic document tree produced by the YAML parser.
//! It can be a scalar (string, int, float, bool, null), a sequence or a
//! mapping. The property store only ever keeps leaves: scalars and
//! sequences.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A node of a parsed configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Sequence of values
    Sequence(Vec<Value>),
    /// Mapping of string keys to values
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// Parse a YAML document into a value tree
    ///
    /// Duplicate keys are rejected by the parser. An empty document
    /// yields `Value::Null`; more than one document is an error.
    pub fn from_yaml_str(yaml: &str) -> Result<Value> {
        let mut documents = serde_yaml::Deserializer::from_str(yaml);
        let Some(document) = documents.next() else {
            return Ok(Value::Null);
        };
        let raw =
            serde_yaml::Value::deserialize(document).map_err(|e| Error::parse(e.to_string()))?;
        if documents.next().is_some() {
            return Err(Error::parse("Multiple YAML documents are not supported")
                .with_help("Split the documents into separate files"));
        }
        Value::from_yaml(raw)
    }

    /// Convert a generic `serde_yaml::Value` into a value tree
    pub fn from_yaml(raw: serde_yaml::Value) -> Result<Value> {
        use serde_yaml::Value as Yaml;

        Ok(match raw {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if n.is_u64() {
                    return Err(Error::parse(format!("Integer out of range: {}", n))
                        .with_help("Integers must fit in i64; quote the value to keep it as text"));
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(Error::parse(format!("Unsupported number: {}", n)));
                }
            }
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(seq) => Value::Sequence(
                seq.into_iter()
                    .map(Value::from_yaml)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Yaml::Mapping(mapping) => {
                let mut map = IndexMap::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let key = mapping_key(k)?;
                    let value = Value::from_yaml(v)?;
                    if map.contains_key(&key) {
                        return Err(Error::parse(format!("Duplicate key: {}", key)));
                    }
                    map.insert(key, value);
                }
                Value::Mapping(map)
            }
            Yaml::Tagged(tagged) => Value::from_yaml(tagged.value)?,
        })
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if this value is an integer
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Check if this value is a float
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if this value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this value is a sequence
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Check if this value is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Check if this value is neither a sequence nor a mapping
    pub fn is_scalar(&self) -> bool {
        !self.is_sequence() && !self.is_mapping()
    }

    /// Get as boolean if this is a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float or Integer
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as slice if this is a Sequence
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get as mapping if this is a Mapping
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

/// Text of a scalar mapping key
///
/// An empty key has no dotted form distinct from the root key and is
/// rejected.
fn mapping_key(key: serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) if s.is_empty() => Err(Error::parse("Mapping keys must not be empty")),
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => mapping_key(tagged.value),
        Yaml::Sequence(_) | Yaml::Mapping(_) => Err(Error::parse(
            "Mapping keys must be scalars, found a sequence or mapping key",
        )),
    }
}

/// Canonical text form; floats always keep a fractional part or exponent
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(seq) => {
                write!(f, "[")?;
                for (i, v) in seq.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(m: IndexMap<String, Value>) -> Self {
        Value::Mapping(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_native_types() {
        let value = Value::from_yaml_str(
            r#"
int1: 37
ratio: 0.5
flag: true
name: value1
quoted: "37"
nothing: ~
"#,
        )
        .unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map["int1"], Value::Integer(37));
        assert_eq!(map["ratio"], Value::Float(0.5));
        assert_eq!(map["flag"], Value::Bool(true));
        assert_eq!(map["name"], Value::String("value1".into()));
        assert_eq!(map["quoted"], Value::String("37".into()));
        assert!(map["nothing"].is_null());
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let value = Value::from_yaml_str("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_empty_document_is_null() {
        assert!(Value::from_yaml_str("").unwrap().is_null());
    }

    #[test]
    fn test_parse_comment_only_document_is_null() {
        assert!(Value::from_yaml_str("# nothing here\n").unwrap().is_null());
    }

    #[test]
    fn test_parse_multiple_documents_rejected() {
        let err = Value::from_yaml_str("a: 1\n---\nb: 2\n").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Parse);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = Value::from_yaml_str("key: [unclosed").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Parse);
    }

    #[test]
    fn test_parse_duplicate_keys_rejected() {
        let err = Value::from_yaml_str("a: 1\na: 2\n").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Parse);
    }

    #[test]
    fn test_non_string_keys_use_text() {
        let value = Value::from_yaml_str("1: one\ntrue: yes-key\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map["1"].as_str(), Some("one"));
        assert_eq!(map["true"].as_str(), Some("yes-key"));
    }

    #[test]
    fn test_integer_beyond_i64_rejected() {
        let err = Value::from_yaml_str("big: 18446744073709551615\n").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Parse);

        let value =
            Value::from_yaml_str("max: 9223372036854775807\nmin: -9223372036854775808\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map["max"], Value::Integer(i64::MAX));
        assert_eq!(map["min"], Value::Integer(i64::MIN));
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = Value::from_yaml_str("\"\": x\n").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Parse);

        let err = Value::from_yaml_str("outer:\n  \"\": x\n").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Parse);
    }

    #[test]
    fn test_tagged_value_is_unwrapped() {
        let value = Value::from_yaml_str("items: !custom [a, b]\n").unwrap();
        assert_eq!(
            value.as_mapping().unwrap()["items"],
            Value::from(vec!["a", "b"])
        );
    }

    #[test]
    fn test_value_type_checks() {
        assert!(Value::Null.is_null());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Integer(42).is_integer());
        assert!(Value::Float(2.5).is_float());
        assert!(Value::String("hello".into()).is_string());
        assert!(Value::Sequence(vec![]).is_sequence());
        assert!(Value::Mapping(IndexMap::new()).is_mapping());
        assert!(Value::Integer(1).is_scalar());
        assert!(!Value::Sequence(vec![]).is_scalar());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(42).as_i64(), Some(42));
        assert_eq!(Value::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::Integer(42).as_f64(), Some(42.0));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
        assert_eq!(Value::from(vec!["a", "b"]).as_sequence().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_display_canonical_text() {
        assert_eq!(Value::Integer(37).to_string(), "37");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(vec!["col1", "col2"]).to_string(), "[col1, col2]");
    }
}
