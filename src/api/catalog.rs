//! Rule catalog: loading, composition, matching and introspection.
//!
//! The catalog is an ordered list. Matching returns the first hit, so a
//! specific-kind rule only wins over a wildcard rule for the same apiVersion
//! when it comes first.

use crate::api::formatter::{OutputFormat, table};
use crate::api::types::{DeprecationRule, ManifestStub, TargetVersions};
use crate::error::{CatalogError, LambError, Result};
use serde::{Deserialize, Serialize};

/// The default catalog shipped with lamb.
pub const DEFAULT_VERSIONS_FILE: &str = include_str!("versions.yaml");

/// On-disk shape of a rule catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionsFile {
    #[serde(rename = "deprecated-rules", alias = "deprecated-versions", default)]
    pub deprecated_rules: Vec<DeprecationRule>,
    #[serde(
        rename = "target-versions",
        default,
        skip_serializing_if = "TargetVersions::is_empty"
    )]
    pub target_versions: TargetVersions,
}

impl VersionsFile {
    /// Read a catalog document. YAML and JSON are both accepted.
    pub fn parse(data: &str) -> Result<Self> {
        serde_yaml::from_str(data).map_err(|e| LambError::VersionsFile(e.to_string()))
    }

    /// The embedded default catalog.
    pub fn defaults() -> Result<Self> {
        Self::parse(DEFAULT_VERSIONS_FILE)
    }
}

/// An ordered, duplicate-free list of deprecation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCatalog {
    rules: Vec<DeprecationRule>,
}

impl RuleCatalog {
    /// Build a catalog, rejecting rules that share kind and apiVersion.
    pub fn new(rules: Vec<DeprecationRule>) -> std::result::Result<Self, CatalogError> {
        combine_rules(rules, Self::default())
    }

    pub fn rules(&self) -> &[DeprecationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn contains(&self, rule: &DeprecationRule) -> bool {
        self.rules.iter().any(|existing| existing.is_duplicate_of(rule))
    }

    /// Return the first rule that applies to `stub`.
    ///
    /// A wildcard rule is returned with its kind set to the stub's kind.
    pub fn find_match(&self, stub: &ManifestStub) -> Option<DeprecationRule> {
        let rule = self.rules.iter().find(|rule| {
            rule.api_version == stub.api_version && (rule.is_wildcard() || rule.kind == stub.kind)
        })?;

        let mut matched = rule.clone();
        if matched.is_wildcard() {
            matched.kind = stub.kind.clone();
        }
        Some(matched)
    }

    /// Dump the catalog and `targets` for inspection.
    ///
    /// Only `normal`, `wide`, `json` and `yaml` are meaningful here.
    pub fn render(
        &self,
        targets: &TargetVersions,
        format: OutputFormat,
        no_headers: bool,
    ) -> Result<String> {
        match format {
            OutputFormat::Normal | OutputFormat::Wide => {
                Ok(table::render_rules(&self.rules, no_headers))
            }
            OutputFormat::Json => {
                let mut out = serde_json::to_string(&self.to_versions_file(targets))
                    .map_err(|e| LambError::Serialize(e.to_string()))?;
                out.push('\n');
                Ok(out)
            }
            OutputFormat::Yaml => serde_yaml::to_string(&self.to_versions_file(targets))
                .map_err(|e| LambError::Serialize(e.to_string())),
            OutputFormat::Custom | OutputFormat::Markdown | OutputFormat::Csv => {
                Err(LambError::UnsupportedCatalogFormat(format))
            }
        }
    }

    pub fn to_versions_file(&self, targets: &TargetVersions) -> VersionsFile {
        VersionsFile {
            deprecated_rules: self.rules.clone(),
            target_versions: targets.clone(),
        }
    }
}

/// Append `additional` rules after `defaults`.
///
/// Fails on the first rule whose kind and apiVersion already appear in the
/// catalog being built; the partially combined catalog is dropped.
pub fn combine_rules(
    additional: Vec<DeprecationRule>,
    defaults: RuleCatalog,
) -> std::result::Result<RuleCatalog, CatalogError> {
    let mut combined = defaults;
    for rule in additional {
        log::debug!("attempting to combine into defaults: {:?}", rule);
        if combined.contains(&rule) {
            return Err(CatalogError::DuplicateRule {
                kind: rule.kind,
                name: rule.api_version,
            });
        }
        combined.rules.push(rule);
    }
    Ok(combined)
}

/// Merge `additional` target versions into `defaults`.
///
/// A component present in both is an error.
pub fn combine_target_versions(
    additional: TargetVersions,
    defaults: TargetVersions,
) -> std::result::Result<TargetVersions, CatalogError> {
    let mut combined = defaults;
    for (component, version) in additional.iter() {
        if combined.contains(component) {
            return Err(CatalogError::DuplicateTargetVersion {
                component: component.to_string(),
                version: version.to_string(),
            });
        }
        combined.insert_new(component.to_string(), version.to_string());
    }
    Ok(combined)
}

/// Build the active catalog from the embedded defaults plus an optional
/// user-supplied document.
pub fn load_catalog(additional: Option<VersionsFile>) -> Result<(RuleCatalog, TargetVersions)> {
    let defaults = VersionsFile::defaults()?;
    let rules = RuleCatalog::new(defaults.deprecated_rules)?;
    let Some(additional) = additional else {
        return Ok((rules, defaults.target_versions));
    };

    let rules = combine_rules(additional.deprecated_rules, rules)?;
    let targets = combine_target_versions(additional.target_versions, defaults.target_versions)?;
    Ok((rules, targets))
}
