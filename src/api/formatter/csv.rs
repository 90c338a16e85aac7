//! Comma-separated output.

use crate::api::formatter::{CellStyle, Column};
use crate::api::types::Finding;

/// Render findings as CSV with an optional header row.
pub fn render(findings: &[&Finding], columns: &[Column], no_headers: bool) -> String {
    let mut out = String::new();

    if !no_headers {
        let headers: Vec<String> = columns.iter().map(|c| quote(c.header())).collect();
        out.push_str(&headers.join(","));
        out.push('\n');
    }

    for finding in findings {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| quote(&column.value(finding, CellStyle::Machine)))
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field per RFC 4180 when it needs it.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::formatter::tests::{deprecated_not_removed, finding_one, finding_two};

    #[test]
    fn test_csv_wide_columns() {
        let one = finding_one();
        let two = finding_two();
        let out = render(&[&one, &two], &Column::WIDE, false);
        assert_eq!(
            out,
            "\
NAME,NAMESPACE,KIND,VERSION,REPLACEMENT,DEPRECATED,DEPRECATED IN,REMOVED,REMOVED IN,REPL AVAIL,REPL AVAIL IN
some-name-one,lamb-namespace,Deployment,extensions/v1beta1,apps/v1,true,v1.0.0,true,v1.0.0,true,v1.10.0
some-name-two,,Deployment,extensions/v1beta1,apps/v1,true,v1.0.0,true,v1.0.0,true,v1.10.0
"
        );
    }

    #[test]
    fn test_csv_no_headers_and_empty_fields() {
        let finding = deprecated_not_removed();
        let out = render(&[&finding], &[Column::Name, Column::RemovedIn, Column::FilePath], true);
        assert_eq!(out, "deprecated-not-removed,,\n");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
