//! Scan sessions: parse, match and evaluate manifests into findings.

use crate::api::catalog::RuleCatalog;
use crate::api::formatter::{self, ExitSeverity, ReportOptions};
use crate::api::parser;
use crate::api::types::{Diagnostic, Finding, TargetVersions};
use crate::api::version;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// One run of the engine.
///
/// The catalog and target versions are shared read-only; several sessions
/// may scan in parallel and be merged with [`ScanSession::extend`] before a
/// single report is rendered.
#[derive(Debug, Clone)]
pub struct ScanSession {
    catalog: Arc<RuleCatalog>,
    targets: Arc<TargetVersions>,
    options: ReportOptions,
    findings: Vec<Finding>,
    diagnostics: Vec<Diagnostic>,
}

impl ScanSession {
    pub fn new(
        catalog: Arc<RuleCatalog>,
        targets: Arc<TargetVersions>,
        options: ReportOptions,
    ) -> Self {
        Self {
            catalog,
            targets,
            options,
            findings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Findings accumulated so far, in arrival order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Scan one manifest buffer and return the findings it added.
    ///
    /// Stubs that match no rule are dropped. A parse failure leaves the
    /// session unchanged.
    pub fn scan_document(&mut self, data: &[u8], source_path: Option<&Path>) -> Result<&[Finding]> {
        let parsed = parser::parse(data)?;
        let start = self.findings.len();

        for diagnostic in parsed.diagnostics {
            self.diagnostics.push(Diagnostic::Parse {
                source_path: source_path.map(Path::to_path_buf),
                diagnostic,
            });
        }

        for stub in parsed.stubs {
            let Some(rule) = self.catalog.find_match(&stub) else {
                log::trace!("no rule for {} {}", stub.kind, stub.api_version);
                continue;
            };
            log::debug!("{} {} matched {}", stub.kind, stub.name, rule.api_version);

            let evaluation = version::evaluate(&rule, &self.targets);
            for diagnostic in evaluation.diagnostics {
                let diagnostic = Diagnostic::Evaluation(diagnostic);
                if !self.diagnostics.contains(&diagnostic) {
                    self.diagnostics.push(diagnostic);
                }
            }

            let mut finding = Finding::new(stub.name, rule)
                .with_namespace(stub.namespace)
                .with_flags(
                    evaluation.deprecated,
                    evaluation.removed,
                    evaluation.replacement_available,
                );
            finding.source_path = source_path.map(Path::to_path_buf);
            self.findings.push(finding);
        }

        Ok(&self.findings[start..])
    }

    /// Append the findings and diagnostics of another session.
    pub fn extend(&mut self, other: ScanSession) {
        self.findings.extend(other.findings);
        for diagnostic in other.diagnostics {
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    /// Render the accumulated findings with the session's options.
    pub fn render(&self) -> Result<String> {
        formatter::render(&self.findings, &self.targets, &self.options)
    }

    /// Exit severity over the findings in the configured component scope.
    pub fn exit_severity(&self) -> ExitSeverity {
        formatter::exit_severity(
            self.findings.iter().filter(|f| self.options.in_scope(f)),
            self.options.ignore_deprecations,
            self.options.ignore_removals,
            self.options.ignore_unavailable_replacements,
        )
    }
}
