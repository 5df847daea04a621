//! UACH Transform - User-Agent Client Hints to device-detection evidence
//!
//! Converts Client-Hint payloads into the flat evidence map a device-detection
//! engine consumes:
//!
//! - **GHEV**: the object returned by `getHighEntropyValues()`, as JSON or Base64
//! - **SUA**: the OpenRTB 2.6 structured user agent
//!
//! Both formats produce the same `header.sec-ch-ua-*` keys with structured-field
//! encoded values, so detection results do not depend on where the hints came from.

pub mod adapters;
pub mod base64;
pub mod encoder;
pub mod error;
pub mod evidence;
pub mod pipeline;
pub mod types;
pub mod value;

pub use error::TransformError;
pub use evidence::{EvidenceMap, EvidencePrefix};
pub use pipeline::{base64_ghev_to_evidence, json_ghev_to_evidence, sua_to_evidence, Transform};
pub use types::{ClientHint, HintFormat, Limits};
pub use value::StructuredValue;

/// Crate version reported by the CLI
pub const TRANSFORM_VERSION: &str = env!("CARGO_PKG_VERSION");
