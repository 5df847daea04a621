//! Pipeline orchestration
//!
//! This module provides the public API of the transform. Each call runs:
//! input limits → (Base64 decode) → JSON load → adapter → `EvidenceMap`.
//!
//! Calls are all-or-nothing: on any error no evidence is returned, and an arena
//! passed to the `*_into` variants is left empty.

use crate::adapters::{ClientHintAdapter, GhevAdapter, SuaAdapter};
use crate::base64;
use crate::error::TransformError;
use crate::evidence::EvidenceMap;
use crate::types::{HintFormat, Limits};
use crate::value;

/// Convert GHEV JSON into evidence using default settings.
///
/// # Example
/// ```ignore
/// let evidence = json_ghev_to_evidence(r#"{"platform": "Windows", "mobile": false}"#)?;
/// assert_eq!(evidence.get("header.sec-ch-ua-mobile"), Some("?0"));
/// ```
pub fn json_ghev_to_evidence(json: &str) -> Result<EvidenceMap, TransformError> {
    Transform::new().from_json_ghev(json)
}

/// Convert Base64-encoded GHEV JSON into evidence using default settings.
pub fn base64_ghev_to_evidence(base64: &str) -> Result<EvidenceMap, TransformError> {
    Transform::new().from_base64_ghev(base64)
}

/// Convert SUA JSON into evidence using default settings.
pub fn sua_to_evidence(json: &str) -> Result<EvidenceMap, TransformError> {
    Transform::new().from_sua(json)
}

/// Client-Hints transform.
///
/// Holds only configuration, so one instance can be shared across threads. To
/// reuse output storage between calls, keep one `EvidenceMap` per worker and pass
/// it to the `*_into` methods, which clear it first.
#[derive(Debug, Clone, Default)]
pub struct Transform {
    capacity: usize,
    limits: Limits,
}

#[allow(clippy::wrong_self_convention)]
impl Transform {
    /// Create a transform with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform whose result maps pre-allocate `capacity` entries
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity: capacity as usize,
            ..Self::default()
        }
    }

    /// Replace the input limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Transform GHEV JSON text.
    pub fn from_json_ghev(&self, json: &str) -> Result<EvidenceMap, TransformError> {
        let mut evidence = EvidenceMap::with_capacity(self.capacity);
        self.from_json_ghev_into(json, &mut evidence)?;
        Ok(evidence)
    }

    /// Transform Base64-encoded GHEV JSON text.
    pub fn from_base64_ghev(&self, base64: &str) -> Result<EvidenceMap, TransformError> {
        let mut evidence = EvidenceMap::with_capacity(self.capacity);
        self.from_base64_ghev_into(base64, &mut evidence)?;
        Ok(evidence)
    }

    /// Transform SUA JSON text.
    pub fn from_sua(&self, json: &str) -> Result<EvidenceMap, TransformError> {
        let mut evidence = EvidenceMap::with_capacity(self.capacity);
        self.from_sua_into(json, &mut evidence)?;
        Ok(evidence)
    }

    /// Transform input of the given format.
    pub fn transform(
        &self,
        format: HintFormat,
        input: &str,
    ) -> Result<EvidenceMap, TransformError> {
        let mut evidence = EvidenceMap::with_capacity(self.capacity);
        self.transform_into(format, input, &mut evidence)?;
        Ok(evidence)
    }

    pub fn from_json_ghev_into(
        &self,
        json: &str,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        self.transform_into(HintFormat::Ghev, json, evidence)
    }

    pub fn from_base64_ghev_into(
        &self,
        base64: &str,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        self.transform_into(HintFormat::GhevBase64, base64, evidence)
    }

    pub fn from_sua_into(
        &self,
        json: &str,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        self.transform_into(HintFormat::Sua, json, evidence)
    }

    /// Transform into a caller-owned map, clearing it first.
    pub fn transform_into(
        &self,
        format: HintFormat,
        input: &str,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        evidence.clear();

        match self.run(format, input, evidence) {
            Ok(()) => {
                tracing::debug!(
                    format = format.as_str(),
                    entries = evidence.len(),
                    "client hints transformed"
                );
                Ok(())
            }
            Err(e) => {
                evidence.clear();
                tracing::debug!(
                    format = format.as_str(),
                    code = e.code(),
                    error = %e,
                    "client hints rejected"
                );
                Err(e)
            }
        }
    }

    fn run(
        &self,
        format: HintFormat,
        input: &str,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        match format {
            HintFormat::Ghev => self.process_with_adapter(&GhevAdapter, input.as_bytes(), evidence),
            HintFormat::GhevBase64 => {
                self.check_input_size(input.len())?;
                let json = base64::decode(input.as_bytes())?;
                self.process_with_adapter(&GhevAdapter, &json, evidence)
            }
            HintFormat::Sua => self.process_with_adapter(&SuaAdapter, input.as_bytes(), evidence),
        }
    }

    fn process_with_adapter(
        &self,
        adapter: &dyn ClientHintAdapter,
        json: &[u8],
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        let root = value::load(json, &self.limits)?;
        adapter.canonicalize(&root, evidence)
    }

    fn check_input_size(&self, len: usize) -> Result<(), TransformError> {
        if len > self.limits.max_input_size {
            return Err(TransformError::ResourceLimit {
                what: "input size",
                actual: len,
                limit: self.limits.max_input_size,
            });
        }
        Ok(())
    }
}
