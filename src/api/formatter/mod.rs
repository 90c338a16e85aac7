//! Report rendering and exit severity.

pub mod csv;
pub mod markdown;
pub mod structured;
pub mod table;

use crate::api::types::{Finding, TargetVersions};
use crate::error::{LambError, Result};
use std::fmt;
use std::str::FromStr;

/// Printed when no scanned resource matched any rule.
pub const NO_RESOURCES_MESSAGE: &str =
    "There were no resources found with known deprecated apiVersions.";

/// Printed when findings exist but all of them were filtered out.
pub const NO_OUTPUT_MESSAGE: &str = "No output to display";

/// Placeholder for unset rule fields in human-readable output.
pub const NOT_APPLICABLE: &str = "n/a";

/// Placeholder for an unset namespace or file path in human-readable output.
pub const UNKNOWN: &str = "<UNKNOWN>";

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Fixed column set, auto-sized.
    #[default]
    Normal,
    /// Normal plus namespace and version thresholds.
    Wide,
    /// Caller-selected columns.
    Custom,
    /// Pipe table.
    Markdown,
    /// Comma-separated values.
    Csv,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        Self::Normal,
        Self::Wide,
        Self::Custom,
        Self::Markdown,
        Self::Csv,
        Self::Json,
        Self::Yaml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Wide => "wide",
            Self::Custom => "custom",
            Self::Markdown => "markdown",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LambError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LambError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Report columns, addressable by their header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    FilePath,
    Namespace,
    Kind,
    Version,
    Replacement,
    Deprecated,
    DeprecatedIn,
    Removed,
    RemovedIn,
    ReplacementAvailable,
    ReplacementAvailableIn,
    Component,
}

/// How unset values are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Tables and markdown: placeholders for unset values.
    Human,
    /// CSV: unset values stay empty.
    Machine,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Self::Name,
        Self::FilePath,
        Self::Namespace,
        Self::Kind,
        Self::Version,
        Self::Replacement,
        Self::Deprecated,
        Self::DeprecatedIn,
        Self::Removed,
        Self::RemovedIn,
        Self::ReplacementAvailable,
        Self::ReplacementAvailableIn,
        Self::Component,
    ];

    pub const NORMAL: [Column; 7] = [
        Self::Name,
        Self::Kind,
        Self::Version,
        Self::Replacement,
        Self::Removed,
        Self::Deprecated,
        Self::ReplacementAvailable,
    ];

    pub const WIDE: [Column; 11] = [
        Self::Name,
        Self::Namespace,
        Self::Kind,
        Self::Version,
        Self::Replacement,
        Self::Deprecated,
        Self::DeprecatedIn,
        Self::Removed,
        Self::RemovedIn,
        Self::ReplacementAvailable,
        Self::ReplacementAvailableIn,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::FilePath => "FILEPATH",
            Self::Namespace => "NAMESPACE",
            Self::Kind => "KIND",
            Self::Version => "VERSION",
            Self::Replacement => "REPLACEMENT",
            Self::Deprecated => "DEPRECATED",
            Self::DeprecatedIn => "DEPRECATED IN",
            Self::Removed => "REMOVED",
            Self::RemovedIn => "REMOVED IN",
            Self::ReplacementAvailable => "REPL AVAIL",
            Self::ReplacementAvailableIn => "REPL AVAIL IN",
            Self::Component => "COMPONENT",
        }
    }

    /// Parse a list of column headers, e.g. `["NAME", "removed in"]`.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Column>> {
        names.iter().map(|name| name.as_ref().parse()).collect()
    }

    /// The cell text of this column for `finding`.
    pub fn value(&self, finding: &Finding, style: CellStyle) -> String {
        let or_placeholder = |value: &str, placeholder: &'static str| match style {
            CellStyle::Human if value.is_empty() => placeholder.to_string(),
            _ => value.to_string(),
        };
        let rule = &finding.rule;

        match self {
            Self::Name => finding.name.clone(),
            Self::FilePath => {
                let path = finding
                    .source_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                or_placeholder(&path, UNKNOWN)
            }
            Self::Namespace => or_placeholder(&finding.namespace, UNKNOWN),
            Self::Kind => rule.kind.clone(),
            Self::Version => rule.api_version.clone(),
            Self::Replacement => or_placeholder(&rule.replacement_api, NOT_APPLICABLE),
            Self::Deprecated => finding.deprecated.to_string(),
            Self::DeprecatedIn => or_placeholder(&rule.deprecated_in, NOT_APPLICABLE),
            Self::Removed => finding.removed.to_string(),
            Self::RemovedIn => or_placeholder(&rule.removed_in, NOT_APPLICABLE),
            Self::ReplacementAvailable => finding.replacement_available.to_string(),
            Self::ReplacementAvailableIn => {
                or_placeholder(&rule.replacement_available_in, NOT_APPLICABLE)
            }
            Self::Component => rule.component.clone(),
        }
    }
}

impl FromStr for Column {
    type Err = LambError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.header().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LambError::InvalidColumn(s.to_string()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// Options controlling one rendered report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: OutputFormat,
    /// Columns for `custom`; also used by `markdown` and `csv` when set.
    pub columns: Vec<Column>,
    pub no_headers: bool,
    /// Only report findings that are removed in the target version.
    pub only_show_removed: bool,
    pub ignore_deprecations: bool,
    pub ignore_removals: bool,
    pub ignore_unavailable_replacements: bool,
    /// Components to report on; empty means all.
    pub components: Vec<String>,
}

impl ReportOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn without_headers(mut self) -> Self {
        self.no_headers = true;
        self
    }

    pub fn only_removed(mut self) -> Self {
        self.only_show_removed = true;
        self
    }

    pub fn with_components(mut self, components: Vec<String>) -> Self {
        self.components = components;
        self
    }

    /// Whether `finding` belongs to a component being reported on.
    pub fn in_scope(&self, finding: &Finding) -> bool {
        self.components.is_empty() || self.components.contains(&finding.rule.component)
    }

    /// Whether `finding` is shown in the rendered report.
    pub fn is_visible(&self, finding: &Finding) -> bool {
        if !self.in_scope(finding) {
            return false;
        }
        if self.only_show_removed {
            finding.removed
        } else {
            finding.deprecated || finding.removed
        }
    }

    /// Columns used by the tabular formats.
    pub fn resolved_columns(&self) -> Result<Vec<Column>> {
        match self.format {
            OutputFormat::Normal => Ok(Column::NORMAL.to_vec()),
            OutputFormat::Wide => Ok(Column::WIDE.to_vec()),
            OutputFormat::Custom if self.columns.is_empty() => Err(LambError::MissingColumns),
            OutputFormat::Custom => Ok(self.columns.clone()),
            OutputFormat::Markdown
            | OutputFormat::Csv
            | OutputFormat::Json
            | OutputFormat::Yaml => {
                if self.columns.is_empty() {
                    Ok(Column::WIDE.to_vec())
                } else {
                    Ok(self.columns.clone())
                }
            }
        }
    }
}

/// Render `findings` according to `options`.
pub fn render(
    findings: &[Finding],
    targets: &TargetVersions,
    options: &ReportOptions,
) -> Result<String> {
    let visible: Vec<&Finding> = findings.iter().filter(|f| options.is_visible(f)).collect();

    match options.format {
        OutputFormat::Json => structured::render_json(&visible, targets),
        OutputFormat::Yaml => structured::render_yaml(&visible, targets),
        OutputFormat::Normal | OutputFormat::Wide | OutputFormat::Custom => {
            render_text(findings, &visible, options, |rows, columns| {
                table::render_findings(rows, columns, options.no_headers)
            })
        }
        OutputFormat::Markdown => render_text(findings, &visible, options, markdown::render),
        OutputFormat::Csv => render_text(findings, &visible, options, |rows, columns| {
            csv::render(rows, columns, options.no_headers)
        }),
    }
}

fn render_text(
    findings: &[Finding],
    visible: &[&Finding],
    options: &ReportOptions,
    draw: impl FnOnce(&[&Finding], &[Column]) -> String,
) -> Result<String> {
    let columns = options.resolved_columns()?;
    if findings.is_empty() {
        return Ok(format!("{}\n", NO_RESOURCES_MESSAGE));
    }
    if visible.is_empty() {
        return Ok(format!("{}\n", NO_OUTPUT_MESSAGE));
    }
    Ok(draw(visible, &columns))
}

/// Exit severity tiers, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ExitSeverity {
    #[default]
    Clean,
    Deprecated,
    RemovedWithoutReplacement,
    Removed,
}

impl ExitSeverity {
    /// The process exit code for this tier.
    pub fn code(&self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Deprecated => 2,
            Self::RemovedWithoutReplacement => 3,
            Self::Removed => 4,
        }
    }

    /// Severity of a single finding.
    pub fn of(
        finding: &Finding,
        ignore_deprecations: bool,
        ignore_removals: bool,
        ignore_replacement_unavailable: bool,
    ) -> Self {
        if finding.removed {
            if !ignore_removals {
                return Self::Removed;
            }
            if !finding.replacement_available && !ignore_replacement_unavailable {
                return Self::RemovedWithoutReplacement;
            }
            return Self::Clean;
        }
        if finding.deprecated && !ignore_deprecations {
            return Self::Deprecated;
        }
        Self::Clean
    }
}

/// The most severe tier across `findings`; `Clean` when empty.
pub fn exit_severity<'a>(
    findings: impl IntoIterator<Item = &'a Finding>,
    ignore_deprecations: bool,
    ignore_removals: bool,
    ignore_replacement_unavailable: bool,
) -> ExitSeverity {
    findings
        .into_iter()
        .map(|finding| {
            ExitSeverity::of(
                finding,
                ignore_deprecations,
                ignore_removals,
                ignore_replacement_unavailable,
            )
        })
        .max()
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::types::DeprecationRule;

    pub(crate) fn deployment_rule() -> DeprecationRule {
        DeprecationRule::new("extensions/v1beta1", "Deployment", "foo")
            .deprecated_in("v1.0.0")
            .removed_in("v1.0.0")
            .replaced_by("apps/v1", "v1.10.0")
    }

    pub(crate) fn finding_one() -> Finding {
        Finding::new("some-name-one", deployment_rule())
            .with_namespace("lamb-namespace")
            .with_source_path("path-to-file")
            .with_flags(true, true, true)
    }

    pub(crate) fn finding_two() -> Finding {
        Finding::new("some-name-two", deployment_rule()).with_flags(true, true, true)
    }

    pub(crate) fn deprecated_not_removed() -> Finding {
        let rule = DeprecationRule::new("apps/v1", "Deployment", "foo").deprecated_in("v1.0.0");
        Finding::new("deprecated-not-removed", DeprecationRule {
            replacement_api: "none".to_string(),
            ..rule
        })
        .with_flags(true, false, false)
    }

    pub(crate) fn not_deprecated() -> Finding {
        Finding::new(
            "not-a-deprecated-object",
            DeprecationRule::new("apps/v1", "Deployment", "foo"),
        )
    }

    pub(crate) fn targets() -> TargetVersions {
        [("foo", "v1.0.0")].into_iter().collect()
    }

    fn words(out: &str) -> Vec<Vec<String>> {
        out.lines()
            .map(|l| l.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("wide".parse::<OutputFormat>().unwrap(), OutputFormat::Wide);
        assert_eq!("Markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        let err = "html".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, LambError::UnsupportedFormat(ref f) if f == "html"));
    }

    #[test]
    fn test_column_parse() {
        assert_eq!(
            Column::parse_list(&["name", "REPL AVAIL IN", " filepath "]).unwrap(),
            vec![Column::Name, Column::ReplacementAvailableIn, Column::FilePath]
        );
        assert!(matches!(
            Column::parse_list(&["NAME", "BOGUS"]).unwrap_err(),
            LambError::InvalidColumn(ref c) if c == "BOGUS"
        ));
    }

    #[test]
    fn test_cell_placeholders() {
        let finding = deprecated_not_removed();
        assert_eq!(Column::RemovedIn.value(&finding, CellStyle::Human), "n/a");
        assert_eq!(Column::RemovedIn.value(&finding, CellStyle::Machine), "");
        assert_eq!(Column::Namespace.value(&finding, CellStyle::Human), "<UNKNOWN>");
        assert_eq!(Column::FilePath.value(&finding, CellStyle::Machine), "");
        assert_eq!(Column::FilePath.value(&finding_one(), CellStyle::Human), "path-to-file");
    }

    #[test]
    fn test_render_normal() {
        let findings = vec![finding_one(), finding_two(), deprecated_not_removed()];
        let out = render(&findings, &targets(), &ReportOptions::new(OutputFormat::Normal)).unwrap();
        assert_eq!(
            words(&out),
            vec![
                vec![
                    "NAME",
                    "KIND",
                    "VERSION",
                    "REPLACEMENT",
                    "REMOVED",
                    "DEPRECATED",
                    "REPL",
                    "AVAIL"
                ],
                vec![
                    "some-name-one",
                    "Deployment",
                    "extensions/v1beta1",
                    "apps/v1",
                    "true",
                    "true",
                    "true"
                ],
                vec![
                    "some-name-two",
                    "Deployment",
                    "extensions/v1beta1",
                    "apps/v1",
                    "true",
                    "true",
                    "true"
                ],
                vec![
                    "deprecated-not-removed",
                    "Deployment",
                    "apps/v1",
                    "none",
                    "false",
                    "true",
                    "false"
                ],
            ]
        );
    }

    #[test]
    fn test_render_only_show_removed() {
        let findings = vec![finding_one(), finding_two(), deprecated_not_removed()];
        let options = ReportOptions::new(OutputFormat::Normal).only_removed();
        let out = render(&findings, &targets(), &options).unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains("deprecated-not-removed"));
    }

    #[test]
    fn test_render_wide() {
        let findings = vec![finding_one(), finding_two()];
        let out = render(&findings, &targets(), &ReportOptions::new(OutputFormat::Wide)).unwrap();
        let rows = words(&out);
        assert_eq!(rows[0][0..3], ["NAME", "NAMESPACE", "KIND"]);
        assert_eq!(
            rows[1],
            vec![
                "some-name-one", "lamb-namespace", "Deployment", "extensions/v1beta1", "apps/v1",
                "true", "v1.0.0", "true", "v1.0.0", "true", "v1.10.0",
            ]
        );
        assert_eq!(rows[2][1], "<UNKNOWN>");
    }

    #[test]
    fn test_render_custom() {
        let columns = Column::parse_list(&["NAMESPACE", "NAME", "COMPONENT", "FILEPATH"]).unwrap();
        let options = ReportOptions::new(OutputFormat::Custom).with_columns(columns);
        let out = render(&[finding_one(), finding_two()], &targets(), &options).unwrap();
        assert_eq!(
            words(&out),
            vec![
                vec!["NAMESPACE", "NAME", "COMPONENT", "FILEPATH"],
                vec!["lamb-namespace", "some-name-one", "foo", "path-to-file"],
                vec!["<UNKNOWN>", "some-name-two", "foo", "<UNKNOWN>"],
            ]
        );
    }

    #[test]
    fn test_render_custom_requires_columns() {
        let err = render(&[finding_one()], &targets(), &ReportOptions::new(OutputFormat::Custom))
            .unwrap_err();
        assert!(matches!(err, LambError::MissingColumns));
    }

    #[test]
    fn test_render_no_headers() {
        let options = ReportOptions::new(OutputFormat::Normal).without_headers();
        let out = render(&[finding_one()], &targets(), &options).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("some-name-one"));
    }

    #[test]
    fn test_render_nothing_actionable() {
        let out = render(&[not_deprecated()], &targets(), &ReportOptions::default()).unwrap();
        assert_eq!(out, "No output to display\n");
    }

    #[test]
    fn test_render_zero_findings() {
        let out = render(&[], &targets(), &ReportOptions::default()).unwrap();
        assert_eq!(
            out,
            "There were no resources found with known deprecated apiVersions.\n"
        );
        let out = render(&[], &targets(), &ReportOptions::new(OutputFormat::Csv)).unwrap();
        assert_eq!(
            out,
            "There were no resources found with known deprecated apiVersions.\n"
        );
    }

    #[test]
    fn test_render_component_scope() {
        let mut other = finding_two();
        other.rule.component = "istio".to_string();
        let options =
            ReportOptions::new(OutputFormat::Normal).with_components(vec!["istio".to_string()]);
        let out = render(&[finding_one(), other], &targets(), &options).unwrap();
        assert!(out.contains("some-name-two"));
        assert!(!out.contains("some-name-one"));
    }

    #[test]
    fn test_exit_severity_table() {
        let removed_no_repl = Finding::new("a", deployment_rule()).with_flags(true, true, false);
        let removed_with_repl = Finding::new("a", deployment_rule()).with_flags(true, true, true);
        let deprecated = Finding::new("a", deployment_rule()).with_flags(true, false, false);
        let clean = Finding::new("a", deployment_rule());

        let cases = [
            ("removed", &removed_with_repl, (false, false, false), ExitSeverity::Removed),
            (
                "removed ignore deprecations",
                &removed_with_repl,
                (true, false, false),
                ExitSeverity::Removed,
            ),
            (
                "removed no replacement",
                &removed_no_repl,
                (false, false, false),
                ExitSeverity::Removed,
            ),
            (
                "removed ignored, no replacement",
                &removed_no_repl,
                (false, true, false),
                ExitSeverity::RemovedWithoutReplacement,
            ),
            (
                "removed ignored, no replacement ignored",
                &removed_no_repl,
                (false, true, true),
                ExitSeverity::Clean,
            ),
            (
                "removed ignored, replacement available",
                &removed_with_repl,
                (false, true, false),
                ExitSeverity::Clean,
            ),
            ("deprecated", &deprecated, (false, false, false), ExitSeverity::Deprecated),
            ("deprecated ignored", &deprecated, (true, false, false), ExitSeverity::Clean),
            ("clean", &clean, (false, false, false), ExitSeverity::Clean),
        ];
        for (name, finding, (dep, rem, repl), want) in cases {
            assert_eq!(ExitSeverity::of(finding, dep, rem, repl), want, "case failed: {}", name);
        }
    }

    #[test]
    fn test_exit_severity_is_max() {
        let deprecated = Finding::new("a", deployment_rule()).with_flags(true, false, false);
        let removed = Finding::new("b", deployment_rule()).with_flags(true, true, false);
        let severity = exit_severity([&deprecated, &removed], false, false, false);
        assert_eq!(severity, ExitSeverity::Removed);
        assert_eq!(severity.code(), 4);
        assert_eq!(exit_severity(std::iter::empty(), false, false, false).code(), 0);
        assert_eq!(ExitSeverity::Deprecated.code(), 2);
        assert_eq!(ExitSeverity::RemovedWithoutReplacement.code(), 3);
    }
}
