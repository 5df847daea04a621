//! Client-Hint payload adapters
//!
//! This module provides adapters that walk a loaded GHEV or SUA document and write
//! the equivalent Client-Hint evidence. Both adapters share one evidence namespace
//! so downstream consumers cannot tell which format the hints arrived in.

mod ghev;
mod sua;

pub use ghev::GhevAdapter;
pub use sua::SuaAdapter;

use std::collections::BTreeMap;

use crate::encoder::is_sf_string;
use crate::error::TransformError;
use crate::evidence::EvidenceMap;
use crate::types::{BrandVersion, HintFormat};
use crate::value::StructuredValue;

/// Trait for Client-Hint payload adapters
pub trait ClientHintAdapter {
    /// Format this adapter understands
    fn format(&self) -> HintFormat;

    /// Write the evidence for `root` into `evidence`.
    ///
    /// On error `evidence` may hold a partial result; callers discard it.
    fn canonicalize(
        &self,
        root: &StructuredValue,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError>;
}

/// Path used in shape errors for the document root.
pub(crate) const ROOT_PATH: &str = "$";

pub(crate) fn expect_object<'a>(
    value: &'a StructuredValue,
    path: &str,
) -> Result<&'a BTreeMap<String, StructuredValue>, TransformError> {
    value
        .as_object()
        .ok_or_else(|| TransformError::shape(path, "object", value.type_name()))
}

pub(crate) fn expect_array<'a>(
    value: &'a StructuredValue,
    path: &str,
) -> Result<&'a [StructuredValue], TransformError> {
    value
        .as_array()
        .ok_or_else(|| TransformError::shape(path, "array", value.type_name()))
}

/// A recognized member, with `null` treated the same as absent.
pub(crate) fn member<'a>(
    object: &'a BTreeMap<String, StructuredValue>,
    key: &str,
) -> Option<&'a StructuredValue> {
    object.get(key).filter(|value| !value.is_null())
}

/// A JSON string that can be written as an sf-string without altering it.
pub(crate) fn header_text(value: &str, path: &str) -> Result<String, TransformError> {
    if is_sf_string(value) {
        Ok(value.to_string())
    } else {
        Err(TransformError::shape(path, "sf-string", "string"))
    }
}

/// Text of a string or number value.
pub(crate) fn text(value: &StructuredValue, path: &str) -> Result<String, TransformError> {
    match value {
        StructuredValue::String(s) => header_text(s, path),
        StructuredValue::Number(n) => Ok(n.to_string()),
        other => Err(TransformError::shape(path, "string", other.type_name())),
    }
}

pub(crate) fn string_list(
    value: &StructuredValue,
    path: &str,
) -> Result<Vec<String>, TransformError> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            StructuredValue::String(s) => header_text(s, &format!("{path}[{i}]")),
            other => Err(TransformError::shape(
                format!("{path}[{i}]"),
                "string",
                other.type_name(),
            )),
        })
        .collect()
}

/// Parse an array of `{brand, version}` objects. `parse_version` decodes the version
/// member, which differs between GHEV (a string) and SUA (a component array).
pub(crate) fn brand_list(
    value: &StructuredValue,
    path: &str,
    parse_version: fn(&StructuredValue, &str) -> Result<Option<String>, TransformError>,
) -> Result<Vec<BrandVersion>, TransformError> {
    expect_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let entry_path = format!("{path}[{i}]");
            brand_version(item, &entry_path, parse_version)
        })
        .collect()
}

pub(crate) fn brand_version(
    value: &StructuredValue,
    path: &str,
    parse_version: fn(&StructuredValue, &str) -> Result<Option<String>, TransformError>,
) -> Result<BrandVersion, TransformError> {
    let object = expect_object(value, path)?;

    let brand_path = format!("{path}.brand");
    let brand = match member(object, "brand") {
        Some(StructuredValue::String(s)) => header_text(s, &brand_path)?,
        Some(other) => return Err(TransformError::shape(brand_path, "string", other.type_name())),
        None => return Err(TransformError::shape(brand_path, "string", "nothing")),
    };

    let version = match member(object, "version") {
        Some(v) => parse_version(v, &format!("{path}.version"))?,
        None => None,
    };

    Ok(BrandVersion { brand, version })
}

/// Report members of `object` that no adapter table knows about.
pub(crate) fn trace_unknown(
    object: &BTreeMap<String, StructuredValue>,
    known: &[&str],
    format: HintFormat,
) {
    for key in object.keys().filter(|k| !known.contains(&k.as_str())) {
        tracing::trace!(format = format.as_str(), key = %key, "ignoring unrecognized hint");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Limits;
    use crate::value::load;

    fn parse(json: &str) -> StructuredValue {
        load(json.as_bytes(), &Limits::default()).unwrap()
    }

    fn plain_version(value: &StructuredValue, path: &str) -> Result<Option<String>, TransformError> {
        text(value, path).map(Some)
    }

    #[test]
    fn test_member_skips_null() {
        let value = parse(r#"{"model": null, "mobile": false}"#);
        let object = expect_object(&value, ROOT_PATH).unwrap();
        assert!(member(object, "model").is_none());
        assert!(member(object, "mobile").is_some());
    }

    #[test]
    fn test_text_accepts_numbers() {
        assert_eq!(text(&parse("64"), "bitness").unwrap(), "64");
        assert_eq!(text(&parse(r#""64""#), "bitness").unwrap(), "64");
        assert!(text(&parse("true"), "bitness").is_err());
    }

    #[test]
    fn test_text_rejects_non_header_characters() {
        for json in [r#""Pixel\r\nX-Injected: 1""#, r#""a\u0000b""#, r#""Caf\u00e9""#] {
            assert!(matches!(
                text(&parse(json), "model"),
                Err(TransformError::UnexpectedShape { expected: "sf-string", .. })
            ));
        }
        assert!(matches!(
            string_list(&parse(r#"["Desktop", "X\tR"]"#), "formFactors"),
            Err(TransformError::UnexpectedShape { ref key, expected: "sf-string", .. }) if key == "formFactors[1]"
        ));
        assert!(matches!(
            brand_list(&parse(r#"[{"brand": "A\nB"}]"#), "brands", plain_version),
            Err(TransformError::UnexpectedShape { ref key, .. }) if key == "brands[0].brand"
        ));
    }

    #[test]
    fn test_brand_list_error_paths() {
        let value = parse(r#"[{"brand": "A", "version": "1"}, {"brand": 7}]"#);
        match brand_list(&value, "brands", plain_version) {
            Err(TransformError::UnexpectedShape { key, expected, found }) => {
                assert_eq!(key, "brands[1].brand");
                assert_eq!(expected, "string");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let value = parse(r#"[{"version": "1"}]"#);
        assert!(matches!(
            brand_list(&value, "brands", plain_version),
            Err(TransformError::UnexpectedShape { found: "nothing", .. })
        ));
    }

    #[test]
    fn test_string_list_rejects_non_strings() {
        let value = parse(r#"["Desktop", 1]"#);
        assert!(matches!(
            string_list(&value, "formFactors"),
            Err(TransformError::UnexpectedShape { ref key, .. }) if key == "formFactors[1]"
        ));
    }
}
