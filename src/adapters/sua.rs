//! SUA adapter
//!
//! Maps an OpenRTB 2.6 structured user agent (`device.sua`) to Client-Hint evidence.
//! SUA only carries full browser versions, so `browsers` feeds the full version
//! list rather than `Sec-CH-UA`. Platform arrives either as a `{brand, version}`
//! object or as a plain string with a separate `platformVersion`.

use crate::encoder::{sf_boolean, sf_brand_list, sf_string};
use crate::error::TransformError;
use crate::evidence::EvidenceMap;
use crate::types::{ClientHint, HintFormat};
use crate::value::StructuredValue;

use super::{
    brand_list, brand_version, expect_object, member, text, trace_unknown, ClientHintAdapter,
    ROOT_PATH,
};

/// SUA payload adapter
pub struct SuaAdapter;

const SUA_KEYS: [&str; 8] = [
    "browsers",
    "platform",
    "platformVersion",
    "architecture",
    "bitness",
    "model",
    "mobile",
    "source",
];

impl ClientHintAdapter for SuaAdapter {
    fn format(&self) -> HintFormat {
        HintFormat::Sua
    }

    fn canonicalize(
        &self,
        root: &StructuredValue,
        evidence: &mut EvidenceMap,
    ) -> Result<(), TransformError> {
        let object = expect_object(root, ROOT_PATH)?;

        if let Some(value) = member(object, "browsers") {
            let browsers = brand_list(value, "browsers", sua_version)?;
            evidence.insert(
                ClientHint::FullVersionList.evidence_key(),
                sf_brand_list(&browsers),
            );
        }

        if let Some(value) = member(object, "platform") {
            match value {
                StructuredValue::String(_) => {
                    evidence.insert(
                        ClientHint::Platform.evidence_key(),
                        sf_string(&text(value, "platform")?),
                    );
                }
                StructuredValue::Object(_) => {
                    let platform = brand_version(value, "platform", sua_version)?;
                    evidence.insert(
                        ClientHint::Platform.evidence_key(),
                        sf_string(&platform.brand),
                    );
                    if let Some(version) = platform.version {
                        evidence.insert(
                            ClientHint::PlatformVersion.evidence_key(),
                            sf_string(&version),
                        );
                    }
                }
                other => {
                    return Err(TransformError::shape(
                        "platform",
                        "object or string",
                        other.type_name(),
                    ))
                }
            }
        }

        // An explicit platformVersion wins over one nested in platform.
        if let Some(value) = member(object, "platformVersion") {
            if let Some(version) = sua_version(value, "platformVersion")? {
                evidence.insert(
                    ClientHint::PlatformVersion.evidence_key(),
                    sf_string(&version),
                );
            }
        }

        for (key, hint) in [
            ("architecture", ClientHint::Arch),
            ("bitness", ClientHint::Bitness),
            ("model", ClientHint::Model),
        ] {
            if let Some(value) = member(object, key) {
                evidence.insert(hint.evidence_key(), sf_string(&text(value, key)?));
            }
        }

        if let Some(value) = member(object, "mobile") {
            evidence.insert(
                ClientHint::Mobile.evidence_key(),
                sf_boolean(sua_mobile(value)?),
            );
        }

        trace_unknown(object, &SUA_KEYS, self.format());

        Ok(())
    }
}

/// SUA versions are arrays of components (`["120", "0", "6099", "71"]`) joined
/// with dots; a plain string or number is accepted as-is. An empty array means no
/// version.
fn sua_version(value: &StructuredValue, path: &str) -> Result<Option<String>, TransformError> {
    match value {
        StructuredValue::Array(components) => {
            let parts = components
                .iter()
                .enumerate()
                .map(|(i, component)| text(component, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((!parts.is_empty()).then(|| parts.join(".")))
        }
        StructuredValue::String(_) | StructuredValue::Number(_) => text(value, path).map(Some),
        other => Err(TransformError::shape(path, "array or string", other.type_name())),
    }
}

/// OpenRTB encodes mobile as an integer flag; JSON booleans are accepted too.
fn sua_mobile(value: &StructuredValue) -> Result<bool, TransformError> {
    match value {
        StructuredValue::Boolean(b) => Ok(*b),
        StructuredValue::Number(n) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(TransformError::shape("mobile", "0 or 1", "number")),
        },
        other => Err(TransformError::shape("mobile", "boolean", other.type_name())),
    }
}
