//! Core types for the deprecation engine.
//!
//! - `DeprecationRule` - lifecycle record for one apiVersion/kind pair
//! - `TargetVersions` - component name to the version in use
//! - `ManifestStub` - the minimal shape of a parsed resource
//! - `Finding` - a stub matched to a rule and evaluated
//! - `Diagnostic` - non-fatal problems observed while scanning

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A lifecycle record for an apiVersion, optionally narrowed to one kind.
///
/// Empty version strings mean "not applicable". An empty `kind` matches every
/// kind served from `api_version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeprecationRule {
    /// The apiVersion this rule applies to (e.g. "extensions/v1beta1").
    #[serde(rename = "version")]
    pub api_version: String,
    /// The resource kind, empty for the whole apiVersion.
    #[serde(default)]
    pub kind: String,
    /// Version the apiVersion is deprecated in.
    #[serde(rename = "deprecated-in", default)]
    pub deprecated_in: String,
    /// Version the apiVersion is no longer served in.
    #[serde(rename = "removed-in", default)]
    pub removed_in: String,
    /// The apiVersion that replaces this one.
    #[serde(rename = "replacement-api", default)]
    pub replacement_api: String,
    /// Version the replacement becomes available in.
    #[serde(rename = "replacement-available-in", default)]
    pub replacement_available_in: String,
    /// Key into the target-version map.
    pub component: String,
}

impl DeprecationRule {
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            component: component.into(),
            ..Self::default()
        }
    }

    pub fn deprecated_in(mut self, version: impl Into<String>) -> Self {
        self.deprecated_in = version.into();
        self
    }

    pub fn removed_in(mut self, version: impl Into<String>) -> Self {
        self.removed_in = version.into();
        self
    }

    pub fn replaced_by(
        mut self,
        api_version: impl Into<String>,
        available_in: impl Into<String>,
    ) -> Self {
        self.replacement_api = api_version.into();
        self.replacement_available_in = available_in.into();
        self
    }

    /// True when this rule covers every kind of its apiVersion.
    pub fn is_wildcard(&self) -> bool {
        self.kind.is_empty()
    }

    /// Two rules collide when they share kind and apiVersion.
    pub fn is_duplicate_of(&self, other: &DeprecationRule) -> bool {
        self.kind == other.kind && self.api_version == other.api_version
    }
}

/// Component name to the version of that component in use.
///
/// Ordered so that rendered reports are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetVersions(BTreeMap<String, String>);

impl TargetVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, component: &str) -> Option<&str> {
        self.0.get(component).map(String::as_str)
    }

    pub fn contains(&self, component: &str) -> bool {
        self.0.contains_key(component)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace or add the version for one component.
    ///
    /// Used for explicit overrides; combining two maps goes through
    /// [`combine_target_versions`](crate::api::catalog::combine_target_versions).
    pub fn with_override(
        mut self,
        component: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.0.insert(component.into(), version.into());
        self
    }

    pub(crate) fn insert_new(&mut self, component: String, version: String) {
        self.0.insert(component, version);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TargetVersions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The minimal shape of a resource manifest needed for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestStub {
    pub kind: String,
    pub api_version: String,
    pub name: String,
    pub namespace: String,
    /// Nested resources of a list-typed manifest.
    pub items: Vec<ManifestStub>,
}

impl ManifestStub {
    pub fn new(kind: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            api_version: api_version.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn is_list(&self) -> bool {
        !self.items.is_empty()
    }
}

/// A resource that matched a rule, with the rule evaluated against the
/// target versions active when it was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub name: String,
    pub namespace: String,
    pub source_path: Option<PathBuf>,
    pub rule: DeprecationRule,
    pub deprecated: bool,
    pub removed: bool,
    pub replacement_available: bool,
}

impl Finding {
    /// A finding with all lifecycle flags unset.
    pub fn new(name: impl Into<String>, rule: DeprecationRule) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            source_path: None,
            rule,
            deprecated: false,
            removed: false,
            replacement_available: false,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_flags(
        mut self,
        deprecated: bool,
        removed: bool,
        replacement_available: bool,
    ) -> Self {
        self.deprecated = deprecated;
        self.removed = removed;
        self.replacement_available = replacement_available;
        self
    }
}

/// A YAML document that was skipped because its shape did not fit a stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Zero-based index of the document within its input.
    pub document: usize,
    pub message: String,
}

impl ParseDiagnostic {
    pub fn new(document: usize, message: impl Into<String>) -> Self {
        Self {
            document,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document {}: {}", self.document, self.message)
    }
}

/// A lifecycle flag that could not be evaluated and was left false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EvaluationDiagnostic {
    /// The rule's component has no entry in the target versions.
    MissingTargetVersion { component: String },
    /// A target version entry is not a valid semantic version.
    InvalidSemver { component: String, version: String },
}

impl fmt::Display for EvaluationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTargetVersion { component } => {
                write!(f, "missing target version for component {}", component)
            }
            Self::InvalidSemver { component, version } => write!(
                f,
                "invalid semantic version {} for component {}",
                version, component
            ),
        }
    }
}

/// Any non-fatal problem recorded by a scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Parse {
        source_path: Option<PathBuf>,
        diagnostic: ParseDiagnostic,
    },
    Evaluation(EvaluationDiagnostic),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse {
                source_path: Some(path),
                diagnostic,
            } => write!(f, "{}: skipped {}", path.display(), diagnostic),
            Self::Parse {
                source_path: None,
                diagnostic,
            } => write!(f, "skipped {}", diagnostic),
            Self::Evaluation(diagnostic) => write!(f, "{}", diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_yaml_field_names() {
        let yaml = r#"
version: extensions/v1beta1
kind: Deployment
deprecated-in: v1.9.0
removed-in: v1.16.0
replacement-api: apps/v1
replacement-available-in: v1.9.0
component: k8s
"#;
        let rule: DeprecationRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            rule,
            DeprecationRule::new("extensions/v1beta1", "Deployment", "k8s")
                .deprecated_in("v1.9.0")
                .removed_in("v1.16.0")
                .replaced_by("apps/v1", "v1.9.0")
        );
    }

    #[test]
    fn test_rule_missing_optional_fields_default_to_empty() {
        let rule: DeprecationRule =
            serde_yaml::from_str("version: cert-manager.k8s.io/v1alpha1\ncomponent: cert-manager")
                .unwrap();
        assert!(rule.is_wildcard());
        assert!(rule.deprecated_in.is_empty());
        assert!(rule.replacement_api.is_empty());
    }

    #[test]
    fn test_duplicate_requires_kind_and_version() {
        let a = DeprecationRule::new("apps/v1", "Deployment", "k8s");
        let b = DeprecationRule::new("apps/v1", "Deployment", "other");
        let c = DeprecationRule::new("extensions/v1beta1", "Deployment", "k8s");
        assert!(a.is_duplicate_of(&b));
        assert!(!a.is_duplicate_of(&c));
    }

    #[test]
    fn test_target_versions_are_ordered() {
        let targets: TargetVersions = [("k8s", "v1.22.0"), ("istio", "v1.6.0")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = targets.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["istio", "k8s"]);
        assert_eq!(targets.get("k8s"), Some("v1.22.0"));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::Evaluation(EvaluationDiagnostic::MissingTargetVersion {
            component: "istio".to_string(),
        });
        assert_eq!(d.to_string(), "missing target version for component istio");

        let d = Diagnostic::Parse {
            source_path: Some(PathBuf::from("a.yaml")),
            diagnostic: ParseDiagnostic::new(2, "invalid type"),
        };
        assert_eq!(d.to_string(), "a.yaml: skipped document 2: invalid type");
    }
}
