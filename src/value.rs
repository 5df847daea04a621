//! JSON loading into structured values
//!
//! serde_json does the tokenizing; a custom visitor builds a `StructuredValue` tree
//! so the canonicalizers work on a closed set of shapes. Duplicate object keys
//! resolve last-write-wins.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

use crate::error::TransformError;
use crate::types::Limits;

/// A parsed JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Vec<StructuredValue>),
    Object(BTreeMap<String, StructuredValue>),
}

impl StructuredValue {
    /// JSON kind, used in shape errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            StructuredValue::Null => "null",
            StructuredValue::Boolean(_) => "boolean",
            StructuredValue::Number(_) => "number",
            StructuredValue::String(_) => "string",
            StructuredValue::Array(_) => "array",
            StructuredValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StructuredValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StructuredValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StructuredValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StructuredValue]> {
        match self {
            StructuredValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, StructuredValue>> {
        match self {
            StructuredValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Member of an object, `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Nesting depth; scalars are depth 0, `[]` and `{}` are depth 1.
    pub fn depth(&self) -> usize {
        match self {
            StructuredValue::Array(items) => {
                1 + items.iter().map(StructuredValue::depth).max().unwrap_or(0)
            }
            StructuredValue::Object(map) => {
                1 + map.values().map(StructuredValue::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

impl<'de> Deserialize<'de> for StructuredValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StructuredValueVisitor)
    }
}

struct StructuredValueVisitor;

impl<'de> Visitor<'de> for StructuredValueVisitor {
    type Value = StructuredValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(StructuredValue::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(StructuredValue::Null)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(StructuredValue::Boolean(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(StructuredValue::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(StructuredValue::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        // serde_json rejects out-of-range literals, so NaN and infinities never reach here
        Ok(Number::from_f64(v).map_or(StructuredValue::Null, StructuredValue::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(StructuredValue::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(StructuredValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(StructuredValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, StructuredValue>()? {
            map.insert(key, value);
        }
        Ok(StructuredValue::Object(map))
    }
}

/// Parse a JSON document, enforcing `limits`.
pub fn load(input: &[u8], limits: &Limits) -> Result<StructuredValue, TransformError> {
    if input.len() > limits.max_input_size {
        return Err(TransformError::ResourceLimit {
            what: "input size",
            actual: input.len(),
            limit: limits.max_input_size,
        });
    }

    let value: StructuredValue = serde_json::from_slice(input)?;

    let depth = value.depth();
    if depth > limits.max_nesting_depth {
        return Err(TransformError::ResourceLimit {
            what: "nesting depth",
            actual: depth,
            limit: limits.max_nesting_depth,
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load_str(json: &str) -> Result<StructuredValue, TransformError> {
        load(json.as_bytes(), &Limits::default())
    }

    #[test]
    fn test_load_all_kinds() {
        let value = load_str(
            r#"{ "s": "a\"bé", "i": -3, "u": 64, "f": 1.5, "t": true, "n": null, "a": [1, "x"] }"#,
        )
        .unwrap();

        assert_eq!(value.get("s").and_then(StructuredValue::as_str), Some("a\"bé"));
        assert_eq!(value.get("i"), Some(&StructuredValue::Number((-3i64).into())));
        assert_eq!(value.get("u").map(|v| v.type_name()), Some("number"));
        assert_eq!(value.get("f").map(|v| v.type_name()), Some("number"));
        assert_eq!(value.get("t").and_then(StructuredValue::as_bool), Some(true));
        assert!(value.get("n").is_some_and(StructuredValue::is_null));
        assert_eq!(value.get("a").and_then(StructuredValue::as_array).map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let value = load_str(r#"{"model": "first", "model": "second"}"#).unwrap();
        assert_eq!(value.get("model").and_then(StructuredValue::as_str), Some("second"));
    }

    #[test]
    fn test_empty_and_truncated_inputs_are_malformed() {
        for input in ["", "   ", "{", r#"{"brands": ["#, r#"{"a": tru"#, "[1,]"] {
            assert!(
                matches!(load_str(input), Err(TransformError::MalformedJson { .. })),
                "expected MalformedJson for {input:?}"
            );
        }
    }

    #[test]
    fn test_trailing_characters_are_malformed() {
        assert!(matches!(
            load_str(r#"{"a": 1} x"#),
            Err(TransformError::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes = b"{\"model\": \"\xff\xfe\"}";
        assert!(matches!(
            load(bytes, &Limits::default()),
            Err(TransformError::MalformedJson { .. })
        ));
    }

    #[test]
    fn test_input_size_limit() {
        let limits = Limits {
            max_input_size: 8,
            ..Limits::default()
        };
        let err = load(br#"{"model": "Pixel"}"#, &limits).unwrap_err();
        assert!(matches!(
            err,
            TransformError::ResourceLimit {
                what: "input size",
                limit: 8,
                ..
            }
        ));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let limits = Limits {
            max_nesting_depth: 2,
            ..Limits::default()
        };
        assert!(load(br#"{"a": [1]}"#, &limits).is_ok());
        let err = load(br#"{"a": [[1]]}"#, &limits).unwrap_err();
        assert!(matches!(
            err,
            TransformError::ResourceLimit {
                what: "nesting depth",
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_depth() {
        assert_eq!(load_str("1").unwrap().depth(), 0);
        assert_eq!(load_str("[]").unwrap().depth(), 1);
        assert_eq!(load_str(r#"{"a": [{"b": 1}]}"#).unwrap().depth(), 3);
    }
}
