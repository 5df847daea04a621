//! GHEV adapter
//!
//! Maps the object returned by `navigator.userAgentData.getHighEntropyValues()` to
//! Client-Hint evidence.

use crate::encoder::{sf_boolean, sf_brand_list, sf_string, sf_string_list};
use crate::error::TransformError;
use crate::evidence::EvidenceMap;
use crate::types::{ClientHint, HintFormat};
use crate::value::StructuredValue;

use super::{
    brand_list, expect_object, member, string_list, text, trace_unknown, ClientHintAdapter,
    ROOT_PATH,
};

/// GHEV payload adapter
pub struct GhevAdapter;

#[derive(Debug, Clone, Copy)]
enum GhevField {
    BrandList,
    String,
    Boolean,
    StringList,
}

/// GHEV member, target hint and value shape, in evidence order.
const GHEV_FIELDS: [(&str, ClientHint, GhevField); 11] = [
    ("brands", ClientHint::Ua, GhevField::BrandList),
    ("fullVersionList", ClientHint::FullVersionList, GhevField::BrandList),
    ("uaFullVersion", ClientHint::FullVersion, GhevField::String),
    ("platform", ClientHint::Platform, GhevField::String),
    ("platformVersion", ClientHint::PlatformVersion, GhevField::String),
    ("architecture", ClientHint::Arch, GhevField::String),
    ("bitness", ClientHint::Bitness, GhevField::String),
    ("model", ClientHint::Model, GhevField::String),
    ("mobile", ClientHint::Mobile, GhevField::Boolean),
    ("wow64", ClientHint::Wow64, GhevField::Boolean),
    ("formFactors", ClientHint::FormFactors, GhevField::StringList),
];

impl ClientHintAdapter for GhevAdapter {
    fn format(&self) -> HintFormat {
        HintFormat::Ghev
    }

    fn canonicalize(
        &self,
        root: &StructuredValue,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        let object = expect_object(root, ROOT_PATH)?;

        for (key, hint, field) in GHEV_FIELDS {
            let Some(value) = member(object, key) else {
                continue;
            };

            let encoded = match field {
                GhevField::BrandList => sf_brand_list(&brand_list(value, key, ghev_version)?),
                GhevField::String => sf_string(&text(value, key)?),
                GhevField::Boolean => match value {
                    StructuredValue::Boolean(b) => sf_boolean(*b).to_string(),
                    other => {
                        return Err(TransformError::shape(key, "boolean", other.type_name()))
                    }
                },
                GhevField::StringList => sf_string_list(&string_list(value, key)?),
            };

            evidence.insert(hint.evidence_key(), encoded);
        }

        let known: Vec<&str> = GHEV_FIELDS.iter().map(|(key, _, _)| *key).collect();
        trace_unknown(object, &known, self.format());

        Ok(())
    }
}

/// GHEV brand versions are plain strings (numbers tolerated).
fn ghev_version(value: &StructuredValue, path: &str) -> Result<Option<String>, TransformError> {
    text(value, path).map(Some)
}
