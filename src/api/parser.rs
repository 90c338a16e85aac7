//! Manifest parsing into resource stubs.
//!
//! Input is tried as a single JSON object first, then as a YAML stream of
//! `---` separated documents. Documents whose shape does not fit a resource
//! are skipped with a diagnostic; anything that is not YAML at all aborts.

use crate::api::types::{ManifestStub, ParseDiagnostic};
use crate::error::ParseError;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

/// Stubs found in one input, plus the documents that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedManifest {
    pub stubs: Vec<ManifestStub>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

// Every field is optional so that `null` and absent keys both decode.
// Identifying fields take any scalar, so `name: 404` still yields a stub.
#[derive(Debug, Default, Deserialize)]
struct RawStub {
    #[serde(default, deserialize_with = "scalar_text")]
    kind: Option<String>,
    #[serde(default, rename = "apiVersion", deserialize_with = "scalar_text")]
    api_version: Option<String>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
    #[serde(default)]
    items: Option<Vec<RawStub>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default, deserialize_with = "scalar_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    namespace: Option<String>,
}

/// Decode a string, number or bool as its text; null as `None`.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarText;

    impl<'de> Visitor<'de> for ScalarText {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(ScalarText)
}

impl From<RawStub> for ManifestStub {
    fn from(raw: RawStub) -> Self {
        let metadata = raw.metadata.unwrap_or_default();
        Self {
            kind: raw.kind.unwrap_or_default(),
            api_version: raw.api_version.unwrap_or_default(),
            name: metadata.name.unwrap_or_default(),
            namespace: metadata.namespace.unwrap_or_default(),
            items: raw
                .items
                .unwrap_or_default()
                .into_iter()
                .map(ManifestStub::from)
                .collect(),
        }
    }
}

/// Parse raw manifest bytes into stubs.
///
/// Empty (or whitespace-only) input yields no stubs and no error.
pub fn parse(data: &[u8]) -> Result<ParsedManifest, ParseError> {
    log::trace!("parsing manifest:\n{}", String::from_utf8_lossy(data));

    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(ParsedManifest::default());
    }

    match parse_json(data) {
        Ok(stub) => {
            let mut stubs = Vec::new();
            expand_list(&mut stubs, stub);
            return Ok(ParsedManifest {
                stubs,
                diagnostics: Vec::new(),
            });
        }
        Err(e) => log::debug!("invalid json: {}, trying yaml", e),
    }

    parse_yaml_documents(data)
}

fn parse_json(data: &[u8]) -> Result<ManifestStub, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(data)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom("expected a JSON object"));
    }
    Ok(serde_json::from_value::<RawStub>(value)?.into())
}

fn parse_yaml_documents(data: &[u8]) -> Result<ParsedManifest, ParseError> {
    let mut parsed = ParsedManifest::default();

    for (index, document) in serde_yaml::Deserializer::from_slice(data).enumerate() {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        if !value.is_mapping() {
            let message = format!(
                "invalid type: {}, expected a resource mapping",
                yaml_type_name(&value)
            );
            log::info!("skipping document {} with unexpected shape: {}", index, message);
            parsed.diagnostics.push(ParseDiagnostic::new(index, message));
            continue;
        }

        match serde_yaml::from_value::<RawStub>(value) {
            Ok(raw) => expand_list(&mut parsed.stubs, raw.into()),
            Err(e) => {
                log::info!("skipping document {} with unexpected shape: {}", index, e);
                parsed.diagnostics.push(ParseDiagnostic::new(index, e.to_string()));
            }
        }
    }

    if parsed.stubs.is_empty() && !parsed.diagnostics.is_empty() {
        return Err(ParseError::NoResources(parsed.diagnostics));
    }
    Ok(parsed)
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// Replace a list manifest by its items, recursively.
fn expand_list(stubs: &mut Vec<ManifestStub>, stub: ManifestStub) {
    if stub.is_list() {
        log::debug!(
            "found a list with {} items, attempting to expand",
            stub.items.len()
        );
        for item in stub.items {
            expand_list(stubs, item);
        }
    } else {
        stubs.push(stub);
    }
}
