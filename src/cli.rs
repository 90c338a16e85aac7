use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lamb")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find deprecated and removed Kubernetes apiVersions in your manifests")]
#[command(long_about = "Scans Kubernetes manifests for apiVersions that are deprecated or removed in the target versions of Kubernetes and its add-ons. The exit code reflects the most severe finding: 2 for deprecated, 3 for removed without an available replacement (with removals ignored), 4 for removed.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub report: ReportArgs,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Flags shared by every command that renders a report.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Output format (normal|wide|custom|markdown|csv|json|yaml)
    #[arg(short, long, global = true, value_name = "FORMAT")]
    pub output: Option<String>,

    /// Columns for custom, markdown and csv output, e.g. "NAME,KIND,REMOVED IN"
    #[arg(long, global = true, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Omit the header row
    #[arg(short = 'H', long, global = true)]
    pub no_headers: bool,

    /// Only report apiVersions that are removed in the target version
    #[arg(short = 'r', long, global = true)]
    pub only_show_removed: bool,

    /// Do not fail the run on deprecated apiVersions
    #[arg(long, global = true)]
    pub ignore_deprecations: bool,

    /// Do not fail the run on removed apiVersions
    #[arg(long, global = true)]
    pub ignore_removals: bool,

    /// Do not fail the run on removed apiVersions whose replacement is unavailable
    #[arg(long, global = true)]
    pub ignore_unavailable_replacements: bool,

    /// Override target versions, e.g. k8s=v1.22.0
    #[arg(short, long, global = true, value_delimiter = ',', value_name = "COMPONENT=VERSION")]
    pub target_versions: Vec<String>,

    /// Extra rules and target versions to add to the defaults
    #[arg(short = 'f', long, global = true, value_name = "FILE")]
    pub additional_versions: Option<PathBuf>,

    /// Only report on these components, e.g. k8s,istio
    #[arg(long, global = true, value_delimiter = ',')]
    pub components: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan directories for manifest files
    DetectFiles {
        /// Directories to scan
        #[arg(short, long = "directory", value_name = "DIR", default_value = ".")]
        directories: Vec<PathBuf>,
    },

    /// Scan a single manifest file, or `-` for stdin
    Detect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the active rules and target versions
    ListVersions,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
