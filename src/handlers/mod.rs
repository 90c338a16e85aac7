pub mod detect;
pub mod list;

pub use detect::{discover_files, handle_detect, handle_detect_files};
pub use list::handle_list_versions;

use crate::api::{Column, OutputFormat, ReportOptions, RuleCatalog, TargetVersions, VersionsFile};
use crate::cli::ReportArgs;
use crate::config::{parse_target_override, types::Config};
use crate::error::{LambError, Result};
use std::path::Path;
use std::sync::Arc;

/// Everything a command needs, resolved from flags over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog: Arc<RuleCatalog>,
    pub targets: Arc<TargetVersions>,
    pub options: ReportOptions,
}

impl Settings {
    /// Command-line flags win over the config file. Boolean flags can only
    /// switch a setting on.
    pub fn resolve(args: &ReportArgs, config: &Config) -> Result<Self> {
        let format = match args.output.as_deref().or(config.output.format.as_deref()) {
            Some(name) => name.parse()?,
            None => OutputFormat::default(),
        };
        let columns = if args.columns.is_empty() {
            Column::parse_list(&config.output.columns)?
        } else {
            Column::parse_list(&args.columns)?
        };
        let components = if args.components.is_empty() {
            config.policy.components.clone()
        } else {
            args.components.clone()
        };

        let options = ReportOptions {
            format,
            columns,
            no_headers: args.no_headers || config.output.no_headers,
            only_show_removed: args.only_show_removed || config.output.only_show_removed,
            ignore_deprecations: args.ignore_deprecations || config.policy.ignore_deprecations,
            ignore_removals: args.ignore_removals || config.policy.ignore_removals,
            ignore_unavailable_replacements: args.ignore_unavailable_replacements
                || config.policy.ignore_unavailable_replacements,
            components,
        };

        let additional = match args
            .additional_versions
            .as_deref()
            .or(config.versions.additional_versions_file.as_deref())
        {
            Some(path) => Some(read_versions_file(path)?),
            None => None,
        };
        let (catalog, mut targets) = crate::api::load_catalog(additional)?;

        for (component, version) in &config.versions.target_versions {
            targets = targets.with_override(component.as_str(), version.as_str());
        }
        for raw in &args.target_versions {
            let (component, version) = parse_target_override(raw)?;
            targets = targets.with_override(component, version);
        }
        log::debug!("target versions: {:?}", targets);

        Ok(Self {
            catalog: Arc::new(catalog),
            targets: Arc::new(targets),
            options,
        })
    }
}

fn read_versions_file(path: &Path) -> Result<VersionsFile> {
    let content = std::fs::read_to_string(path).map_err(|source| LambError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    VersionsFile::parse(&content)
}
