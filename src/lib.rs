//! # lamb
//!
//! Finds Kubernetes resources that use deprecated or removed apiVersions.
//!
//! Manifests (JSON or multi-document YAML, including `List` resources) are
//! matched against an ordered catalog of apiVersion lifecycle rules and
//! evaluated against the versions of Kubernetes and its add-ons you target.
//! Findings render as tables, markdown, csv, json or yaml, and the most
//! severe finding becomes the process exit code.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lamb::api::{load_catalog, ReportOptions, ScanSession};
//! use std::sync::Arc;
//!
//! # fn main() -> lamb::Result<()> {
//! let (catalog, targets) = load_catalog(None)?;
//! let mut session =
//!     ScanSession::new(Arc::new(catalog), Arc::new(targets), ReportOptions::default());
//! session.scan_document(&std::fs::read("deployment.yaml").unwrap_or_default(), None)?;
//! print!("{}", session.render()?);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

// Re-export commonly used types and functions
pub use api::{ExitSeverity, Finding, OutputFormat, ReportOptions, ScanSession};
pub use error::{LambError, Result};
use cli::{Cli, Commands};
use config::types::Config;
use handlers::Settings;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run one command and return the process exit code.
pub fn run_command(cli: Cli, config: Config) -> Result<i32> {
    let settings = Settings::resolve(&cli.report, &config)?;

    match cli.command {
        Commands::ListVersions => {
            handlers::handle_list_versions(
                &settings.catalog,
                &settings.targets,
                settings.options.format,
                settings.options.no_headers,
            )?;
            Ok(0)
        }
        Commands::DetectFiles { directories } => {
            let mut session =
                ScanSession::new(settings.catalog, settings.targets, settings.options);
            handlers::handle_detect_files(&mut session, &directories);
            finish(&session)
        }
        Commands::Detect { file } => {
            let mut session =
                ScanSession::new(settings.catalog, settings.targets, settings.options);
            handlers::handle_detect(&mut session, &file)?;
            finish(&session)
        }
    }
}

fn finish(session: &ScanSession) -> Result<i32> {
    for diagnostic in session.diagnostics() {
        log::warn!("{}", diagnostic);
    }
    print!("{}", session.render()?);
    Ok(session.exit_severity().code())
}
