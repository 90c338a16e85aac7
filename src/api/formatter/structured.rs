//! JSON and YAML report documents.

use crate::api::types::{DeprecationRule, Finding, TargetVersions};
use crate::error::{LambError, Result};
use serde::Serialize;

#[derive(Serialize)]
struct StructuredReport<'a> {
    items: Vec<StructuredItem<'a>>,
    #[serde(rename = "target-versions")]
    target_versions: &'a TargetVersions,
}

#[derive(Serialize)]
struct StructuredItem<'a> {
    name: &'a str,
    #[serde(rename = "filePath", skip_serializing_if = "Option::is_none")]
    file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
    api: &'a DeprecationRule,
    deprecated: bool,
    removed: bool,
    #[serde(rename = "replacementAvailable")]
    replacement_available: bool,
}

impl<'a> From<&'a Finding> for StructuredItem<'a> {
    fn from(f: &'a Finding) -> Self {
        Self {
            name: &f.name,
            file_path: f.source_path.as_ref().map(|p| p.display().to_string()),
            namespace: (!f.namespace.is_empty()).then_some(f.namespace.as_str()),
            api: &f.rule,
            deprecated: f.deprecated,
            removed: f.removed,
            replacement_available: f.replacement_available,
        }
    }
}

fn report<'a>(findings: &[&'a Finding], targets: &'a TargetVersions) -> StructuredReport<'a> {
    StructuredReport {
        items: findings.iter().map(|f| StructuredItem::from(*f)).collect(),
        target_versions: targets,
    }
}

/// Compact single-line JSON.
pub fn render_json(findings: &[&Finding], targets: &TargetVersions) -> Result<String> {
    let mut out = serde_json::to_string(&report(findings, targets))
        .map_err(|e| LambError::Serialize(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

pub fn render_yaml(findings: &[&Finding], targets: &TargetVersions) -> Result<String> {
    serde_yaml::to_string(&report(findings, targets))
        .map_err(|e| LambError::Serialize(e.to_string()))
}
