//! Semantic version policy and lifecycle evaluation.
//!
//! Versions use the Kubernetes convention: a mandatory leading `v`, with
//! `vMAJOR` and `vMAJOR.MINOR` accepted as shorthands for the zero-padded
//! form. Build metadata does not take part in ordering.

use crate::api::types::{DeprecationRule, EvaluationDiagnostic, TargetVersions};
use semver::{BuildMetadata, Version};
use std::cmp::Ordering;

/// Parse a `v`-prefixed semantic version.
pub fn parse(version: &str) -> Option<Version> {
    let rest = version.strip_prefix('v')?;
    if rest.is_empty() {
        return None;
    }

    // Shorthands carry neither pre-release nor build metadata.
    let core_end = rest.find(['-', '+']).unwrap_or(rest.len());
    let dots = rest[..core_end].matches('.').count();
    let padded = match dots {
        0 if core_end == rest.len() => format!("{}.0.0", rest),
        1 if core_end == rest.len() => format!("{}.0", rest),
        2 => rest.to_string(),
        _ => return None,
    };

    let mut parsed = Version::parse(&padded).ok()?;
    parsed.build = BuildMetadata::EMPTY;
    Some(parsed)
}

pub fn is_valid(version: &str) -> bool {
    parse(version).is_some()
}

/// Compare two version strings.
///
/// An invalid version sorts below every valid one; two invalid versions are
/// equal.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse(a), parse(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Lifecycle flags of one rule against a set of target versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub deprecated: bool,
    pub removed: bool,
    pub replacement_available: bool,
    pub diagnostics: Vec<EvaluationDiagnostic>,
}

/// Evaluate `rule` against `targets`.
///
/// Each flag is true when its threshold is set and the component's target
/// version is at or beyond it. A missing target for the rule's component, or
/// any malformed entry anywhere in `targets`, leaves every flag false and is
/// reported as a diagnostic.
pub fn evaluate(rule: &DeprecationRule, targets: &TargetVersions) -> Evaluation {
    let thresholds = [
        rule.deprecated_in.as_str(),
        rule.removed_in.as_str(),
        rule.replacement_available_in.as_str(),
    ];
    if thresholds.iter().all(|t| t.is_empty()) {
        return Evaluation::default();
    }

    let Some(target) = targets.get(&rule.component) else {
        log::info!("target version missing for component {}", rule.component);
        return Evaluation {
            diagnostics: vec![EvaluationDiagnostic::MissingTargetVersion {
                component: rule.component.clone(),
            }],
            ..Evaluation::default()
        };
    };

    // The whole map is validated, not just this rule's component.
    let invalid: Vec<EvaluationDiagnostic> = targets
        .iter()
        .filter(|(_, version)| !is_valid(version))
        .map(|(component, version)| {
            log::info!("target version {} for {} is not valid semver", version, component);
            EvaluationDiagnostic::InvalidSemver {
                component: component.to_string(),
                version: version.to_string(),
            }
        })
        .collect();
    if !invalid.is_empty() {
        return Evaluation {
            diagnostics: invalid,
            ..Evaluation::default()
        };
    }

    let reached = |threshold: &str| !threshold.is_empty() && compare(target, threshold).is_ge();
    Evaluation {
        deprecated: reached(&rule.deprecated_in),
        removed: reached(&rule.removed_in),
        replacement_available: reached(&rule.replacement_available_in),
        diagnostics: Vec::new(),
    }
}
