//! Deprecated Kubernetes apiVersion detection.
//!
//! Manifests are parsed into stubs, matched against an ordered rule catalog,
//! evaluated against per-component target versions and rendered as a report
//! with an exit severity.
//!
//! # Example
//!
//! ```rust,no_run
//! use lamb::api::{load_catalog, OutputFormat, ReportOptions, ScanSession};
//! use std::sync::Arc;
//!
//! # fn main() -> lamb::Result<()> {
//! let (catalog, targets) = load_catalog(None)?;
//! let mut session = ScanSession::new(
//!     Arc::new(catalog),
//!     Arc::new(targets),
//!     ReportOptions::new(OutputFormat::Wide),
//! );
//! let manifest = "apiVersion: extensions/v1beta1\nkind: Ingress\nmetadata:\n  name: web\n";
//! session.scan_document(manifest.as_bytes(), None)?;
//! print!("{}", session.render()?);
//! std::process::exit(session.exit_severity().code());
//! # }
//! ```
//!
//! # Components
//!
//! - [`parser`] - JSON or multi-document YAML into stubs
//! - [`catalog`] - rule catalog, composition and matching
//! - [`version`] - version policy and lifecycle evaluation
//! - [`scan`] - scan sessions
//! - [`formatter`] - report formats and exit severity

pub mod catalog;
pub mod formatter;
pub mod parser;
pub mod scan;
pub mod types;
pub mod version;

// Re-export main types and functions
pub use catalog::{
    DEFAULT_VERSIONS_FILE, RuleCatalog, VersionsFile, combine_rules, combine_target_versions,
    load_catalog,
};
pub use formatter::{Column, ExitSeverity, OutputFormat, ReportOptions, exit_severity, render};
pub use parser::{ParsedManifest, parse};
pub use scan::ScanSession;
pub use types::{
    DeprecationRule, Diagnostic, EvaluationDiagnostic, Finding, ManifestStub, ParseDiagnostic,
    TargetVersions,
};
pub use version::{Evaluation, evaluate};
