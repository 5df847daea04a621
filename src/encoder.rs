//! Structured-field value encoding
//!
//! Client-Hint headers carry RFC 8941 structured-field values. Evidence values are
//! written exactly as a browser would send them on the wire:
//!
//! - strings: `"Pixel 7"` with `\` and `"` backslash-escaped
//! - booleans: `?1` / `?0`
//! - brand lists: `"Chromium";v="120", "Not;A=Brand";v="99"` in input order
//! - string lists: `"Desktop", "XR"`

use crate::types::BrandVersion;

const LIST_SEPARATOR: &str = ", ";

/// Whether `value` fits an sf-string: printable ASCII only (`%x20-7E`).
pub fn is_sf_string(value: &str) -> bool {
    value.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// Append `value` as a structured-field string. Callers check `is_sf_string` first.
pub fn write_sf_string(out: &mut String, value: &str) {
    out.reserve(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

pub fn sf_string(value: &str) -> String {
    let mut out = String::new();
    write_sf_string(&mut out, value);
    out
}

pub fn sf_boolean(value: bool) -> &'static str {
    if value {
        "?1"
    } else {
        "?0"
    }
}

/// Encode a brand list; an entry without a version carries no `v` parameter.
pub fn sf_brand_list(brands: &[BrandVersion]) -> String {
    let mut out = String::new();
    for (i, entry) in brands.iter().enumerate() {
        if i > 0 {
            out.push_str(LIST_SEPARATOR);
        }
        write_sf_string(&mut out, &entry.brand);
        if let Some(version) = &entry.version {
            out.push_str(";v=");
            write_sf_string(&mut out, version);
        }
    }
    out
}

pub fn sf_string_list<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(LIST_SEPARATOR);
        }
        write_sf_string(&mut out, item.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sf_string_escapes() {
        assert_eq!(sf_string("x86"), r#""x86""#);
        assert_eq!(sf_string(""), r#""""#);
        assert_eq!(sf_string(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_is_sf_string() {
        assert!(is_sf_string(""));
        assert!(is_sf_string(r#"Not;A=Brand "99" \ ~"#));
        assert!(!is_sf_string("Pixel\r\nX-Injected: 1"));
        assert!(!is_sf_string("tab\there"));
        assert!(!is_sf_string("\u{7f}"));
        assert!(!is_sf_string("Galaxy Tab S9 \u{2013} Wi-Fi"));
    }

    #[test]
    fn test_sf_boolean() {
        assert_eq!(sf_boolean(true), "?1");
        assert_eq!(sf_boolean(false), "?0");
    }

    #[test]
    fn test_brand_list_keeps_order_and_special_characters() {
        let brands = vec![
            BrandVersion::new("Chromium", "120"),
            BrandVersion::new("Not;A=Brand", "99"),
        ];
        assert_eq!(
            sf_brand_list(&brands),
            r#""Chromium";v="120", "Not;A=Brand";v="99""#
        );
    }

    #[test]
    fn test_brand_without_version() {
        let brands = vec![BrandVersion {
            brand: "Chromium".to_string(),
            version: None,
        }];
        assert_eq!(sf_brand_list(&brands), r#""Chromium""#);
        assert_eq!(sf_brand_list(&[]), "");
    }

    #[test]
    fn test_string_list() {
        assert_eq!(sf_string_list(&["Desktop", "XR"]), r#""Desktop", "XR""#);
        assert_eq!(sf_string_list::<&str>(&[]), "");
    }
}
