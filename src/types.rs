//! Core types for the Client-Hints transform
//!
//! This module defines the fixed Client-Hint header table that both canonicalizers
//! write into, the supported input formats, and the input limits.

use serde::Serialize;

use crate::evidence::EvidencePrefix;

/// User-Agent Client Hint headers understood by the device-detection engine.
///
/// The header names are the evidence contract: every canonicalizer emits keys of
/// the form `header.<header_name>` and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientHint {
    /// `Sec-CH-UA`: low-entropy brand list with significant versions
    Ua,
    /// `Sec-CH-UA-Full-Version-List`: brand list with full versions
    FullVersionList,
    /// `Sec-CH-UA-Full-Version` (deprecated by the full version list)
    FullVersion,
    Platform,
    PlatformVersion,
    Arch,
    Bitness,
    Model,
    Mobile,
    Wow64,
    FormFactors,
}

impl ClientHint {
    /// Every hint in evidence order.
    pub const ALL: [ClientHint; 11] = [
        ClientHint::Ua,
        ClientHint::FullVersionList,
        ClientHint::FullVersion,
        ClientHint::Platform,
        ClientHint::PlatformVersion,
        ClientHint::Arch,
        ClientHint::Bitness,
        ClientHint::Model,
        ClientHint::Mobile,
        ClientHint::Wow64,
        ClientHint::FormFactors,
    ];

    /// Evidence key consumed by the detection engine, e.g. `header.sec-ch-ua-model`.
    pub fn evidence_key(&self) -> &'static str {
        match self {
            ClientHint::Ua => "header.sec-ch-ua",
            ClientHint::FullVersionList => "header.sec-ch-ua-full-version-list",
            ClientHint::FullVersion => "header.sec-ch-ua-full-version",
            ClientHint::Platform => "header.sec-ch-ua-platform",
            ClientHint::PlatformVersion => "header.sec-ch-ua-platform-version",
            ClientHint::Arch => "header.sec-ch-ua-arch",
            ClientHint::Bitness => "header.sec-ch-ua-bitness",
            ClientHint::Model => "header.sec-ch-ua-model",
            ClientHint::Mobile => "header.sec-ch-ua-mobile",
            ClientHint::Wow64 => "header.sec-ch-ua-wow64",
            ClientHint::FormFactors => "header.sec-ch-ua-form-factors",
        }
    }

    /// Lowercase HTTP header name.
    pub fn header_name(&self) -> &'static str {
        &self.evidence_key()[EvidencePrefix::Header.as_str().len()..]
    }

    /// Look up a hint by header name, ignoring ASCII case.
    pub fn from_header_name(name: &str) -> Option<ClientHint> {
        ClientHint::ALL
            .into_iter()
            .find(|hint| hint.header_name().eq_ignore_ascii_case(name))
    }

    /// Look up a hint by evidence key (`header.` prefix required).
    pub fn from_evidence_key(key: &str) -> Option<ClientHint> {
        match EvidencePrefix::from_key(key) {
            Some(EvidencePrefix::Header) => {
                Self::from_header_name(&key[EvidencePrefix::Header.as_str().len()..])
            }
            _ => None,
        }
    }
}

/// One entry of a brand list: a brand name with an optional version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandVersion {
    pub brand: String,
    pub version: Option<String>,
}

impl BrandVersion {
    pub fn new(brand: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            version: Some(version.into()),
        }
    }
}

/// Input formats accepted by the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintFormat {
    /// GHEV as JSON text
    Ghev,
    /// GHEV as Base64-encoded JSON text
    GhevBase64,
    /// OpenRTB structured user agent as JSON text
    Sua,
}

impl HintFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            HintFormat::Ghev => "ghev",
            HintFormat::GhevBase64 => "ghev-base64",
            HintFormat::Sua => "sua",
        }
    }
}

/// Bounds applied to every input before and after JSON loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum raw input size in bytes (Base64 text counts before decoding)
    pub max_input_size: usize,
    /// Maximum nesting depth of arrays and objects
    pub max_nesting_depth: usize,
}

impl Limits {
    /// Real Client-Hint payloads are a few hundred bytes and three levels deep.
    pub const fn request_path() -> Self {
        Self {
            max_input_size: 64 * 1024,
            max_nesting_depth: 16,
        }
    }

    /// No limits beyond serde_json's own recursion cap.
    pub const fn unbounded() -> Self {
        Self {
            max_input_size: usize::MAX,
            max_nesting_depth: usize::MAX,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::request_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_keys_are_prefixed_header_names() {
        for hint in ClientHint::ALL {
            assert_eq!(
                EvidencePrefix::from_key(hint.evidence_key()),
                Some(EvidencePrefix::Header)
            );
            assert_eq!(
                hint.evidence_key(),
                format!("header.{}", hint.header_name())
            );
            assert!(hint.header_name().starts_with("sec-ch-ua"));
        }
        assert_eq!(ClientHint::Arch.header_name(), "sec-ch-ua-arch");
    }

    #[test]
    fn test_lookup_by_header_name() {
        assert_eq!(
            ClientHint::from_header_name("Sec-CH-UA-Platform"),
            Some(ClientHint::Platform)
        );
        assert_eq!(ClientHint::from_header_name("user-agent"), None);
    }

    #[test]
    fn test_lookup_by_evidence_key() {
        assert_eq!(
            ClientHint::from_evidence_key("header.sec-ch-ua-arch"),
            Some(ClientHint::Arch)
        );
        assert_eq!(ClientHint::from_evidence_key("query.sec-ch-ua-arch"), None);
        assert_eq!(ClientHint::from_evidence_key("sec-ch-ua-arch"), None);
    }

    #[test]
    fn test_hint_format_serde_names() {
        assert_eq!(
            serde_json::to_string(&HintFormat::GhevBase64).unwrap(),
            "\"ghev-base64\""
        );
        for format in [HintFormat::Ghev, HintFormat::GhevBase64, HintFormat::Sua] {
            assert_eq!(
                serde_json::to_string(&format).unwrap(),
                format!("\"{}\"", format.as_str())
            );
        }
    }

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_input_size, 65536);
        assert_eq!(limits.max_nesting_depth, 16);
    }
}
