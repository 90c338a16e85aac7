use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub policy: PolicyConfig,
    pub versions: VersionsConfig,
}

/// Report output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub columns: Vec<String>,
    pub no_headers: bool,
    pub only_show_removed: bool,
}

/// Which findings fail the run, and which components are reported on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub ignore_deprecations: bool,
    pub ignore_removals: bool,
    pub ignore_unavailable_replacements: bool,
    pub components: Vec<String>,
}

/// Rule catalog configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionsConfig {
    /// Rules and target versions added to the defaults.
    pub additional_versions_file: Option<PathBuf>,
    /// Per-component overrides of the target versions.
    pub target_versions: BTreeMap<String, String>,
}
