//! Error types for lamb.
//!
//! Every failure the engine can surface to a caller is a variant here.
//! Non-fatal problems (skipped documents, unusable target versions) are not
//! errors; they travel as [`Diagnostic`](crate::api::types::Diagnostic) values.

use crate::api::formatter::OutputFormat;
use crate::api::types::ParseDiagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the library and the `lamb` binary.
#[derive(Debug, Error)]
pub enum LambError {
    /// A manifest could not be turned into resource stubs.
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] ParseError),

    /// Combining rule catalogs or target versions hit a duplicate.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Unknown report format name.
    #[error("the output format must be one of (normal|wide|custom|markdown|csv|json|yaml), got {0:?}")]
    UnsupportedFormat(String),

    /// A valid report format that cannot list the rule catalog.
    #[error("the rule catalog can only be listed as normal, wide, json or yaml, got {0}")]
    UnsupportedCatalogFormat(OutputFormat),

    /// Unknown column name for custom, markdown or csv output.
    #[error("invalid custom column {0:?}, must be one of (NAME|FILEPATH|NAMESPACE|KIND|VERSION|REPLACEMENT|DEPRECATED|DEPRECATED IN|REMOVED|REMOVED IN|REPL AVAIL|REPL AVAIL IN|COMPONENT)")]
    InvalidColumn(String),

    /// The custom format was selected without any columns.
    #[error("the custom output format requires at least one column")]
    MissingColumns,

    /// The rule catalog document is malformed.
    #[error("could not unmarshal versions file: {0}")]
    VersionsFile(String),

    /// Configuration file problems.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading an input file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structured report output could not be produced.
    #[error("failed to serialize report: {0}")]
    Serialize(String),
}

/// Manifest parse failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input is neither JSON nor YAML.
    #[error("invalid yaml: {0}")]
    Syntax(#[from] serde_yaml::Error),

    /// Every YAML document had the wrong shape and nothing usable was found.
    #[error("one or more errors parsing yaml resulted in no resources found: {}", join_diagnostics(.0))]
    NoResources(Vec<ParseDiagnostic>),
}

impl ParseError {
    /// Diagnostics carried by an aggregate failure, empty for syntax errors.
    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        match self {
            Self::Syntax(_) => &[],
            Self::NoResources(diagnostics) => diagnostics,
        }
    }
}

fn join_diagnostics(diagnostics: &[ParseDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Catalog composition conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A rule with the same kind and apiVersion is already present.
    #[error("duplicate cannot be added to defaults: {kind} {name}")]
    DuplicateRule { kind: String, name: String },

    /// A target version for the same component is already present.
    #[error("duplicate cannot be added to defaults: {component} {version}")]
    DuplicateTargetVersion { component: String, version: String },
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    ParsingFailed { path: PathBuf, message: String },

    #[error("invalid target version override {0:?}, expected component=version")]
    InvalidTargetOverride(String),
}

pub type Result<T> = std::result::Result<T, LambError>;
