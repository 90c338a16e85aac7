pub mod types;

use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".lamb.toml";

/// Get the global config file path (~/.lamb.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (dir/.lamb.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load configuration from an explicit file, or search for one.
///
/// An explicit path must exist. Otherwise the working directory is checked
/// first, then the home directory; no file at all yields defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let local = std::env::current_dir().ok().map(|dir| local_config_path(&dir));
    for candidate in local.into_iter().chain(global_config_path()) {
        if candidate.is_file() {
            log::debug!("using config file {}", candidate.display());
            return read_config(&candidate);
        }
    }

    Ok(types::Config::default())
}

/// Read and parse one config file.
pub fn read_config(path: &Path) -> Result<types::Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::ParsingFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Split a `component=version` override.
pub fn parse_target_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((component, version))
            if !component.trim().is_empty() && !version.trim().is_empty() =>
        {
            Ok((component.trim().to_string(), version.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidTargetOverride(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[output]
format = "wide"
columns = ["NAME", "KIND"]
only_show_removed = true

[policy]
ignore_deprecations = true
components = ["k8s"]

[versions]
additional_versions_file = "extra.yaml"

[versions.target_versions]
k8s = "v1.22.0"
"#
        )
        .unwrap();

        let config = read_config(file.path()).unwrap();
        assert_eq!(config.output.format.as_deref(), Some("wide"));
        assert_eq!(config.output.columns, vec!["NAME", "KIND"]);
        assert!(config.output.only_show_removed);
        assert!(!config.output.no_headers);
        assert!(config.policy.ignore_deprecations);
        assert_eq!(config.policy.components, vec!["k8s"]);
        assert_eq!(
            config.versions.additional_versions_file,
            Some(PathBuf::from("extra.yaml"))
        );
        assert_eq!(config.versions.target_versions["k8s"], "v1.22.0");
    }

    #[test]
    fn test_sections_are_optional() {
        let config: types::Config = toml::from_str("[policy]\nignore_removals = true\n").unwrap();
        assert!(config.policy.ignore_removals);
        assert_eq!(config.output, types::OutputConfig::default());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[output\nformat = ").unwrap();
        assert!(matches!(
            read_config(file.path()).unwrap_err(),
            ConfigError::ParsingFailed { .. }
        ));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_target_override() {
        assert_eq!(
            parse_target_override("k8s=v1.22.0").unwrap(),
            ("k8s".to_string(), "v1.22.0".to_string())
        );
        assert!(parse_target_override("k8s").is_err());
        assert!(parse_target_override("=v1.0.0").is_err());
        assert!(parse_target_override("k8s=").is_err());
    }
}
