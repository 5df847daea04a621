//! Error types for the Client-Hints transform

use thiserror::Error;

use crate::base64::Base64Error;

/// Errors that can occur while transforming Client-Hint input into evidence
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Malformed JSON at line {line}, column {column}: {reason}")]
    MalformedJson {
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("Malformed Base64: {0}")]
    MalformedBase64(#[from] Base64Error),

    #[error("Unexpected shape for '{key}': expected {expected}, found {found}")]
    UnexpectedShape {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Resource limit exceeded: {what} is {actual}, limit is {limit}")]
    ResourceLimit {
        what: &'static str,
        actual: usize,
        limit: usize,
    },
}

impl TransformError {
    /// Stable identifier for embedding layers that map errors to their own codes.
    pub fn code(&self) -> &'static str {
        match self {
            TransformError::MalformedJson { .. } => "MALFORMED_JSON",
            TransformError::MalformedBase64(_) => "MALFORMED_BASE64",
            TransformError::UnexpectedShape { .. } => "UNEXPECTED_SHAPE",
            TransformError::ResourceLimit { .. } => "RESOURCE_LIMIT",
        }
    }

    pub(crate) fn shape(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        TransformError::UnexpectedShape {
            key: key.into(),
            expected,
            found,
        }
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(e: serde_json::Error) -> Self {
        TransformError::MalformedJson {
            line: e.line(),
            column: e.column(),
            reason: e.to_string(),
        }
    }
}
