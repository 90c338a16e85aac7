//! Aligned plain-text tables for the normal, wide and custom formats.

use crate::api::formatter::{CellStyle, Column, NOT_APPLICABLE};
use crate::api::types::{DeprecationRule, Finding};
use prettytable::format::{FormatBuilder, TableFormat};
use prettytable::{Cell, Row, Table};

const RULE_HEADERS: [&str; 7] = [
    "KIND",
    "NAME",
    "DEPRECATED IN",
    "REMOVED IN",
    "REPLACEMENT",
    "REPL AVAIL IN",
    "COMPONENT",
];

// Borderless, left-aligned, two spaces between columns.
fn plain_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator(' ')
        .padding(0, 1)
        .build()
}

fn new_table(headers: &[&str], no_headers: bool) -> Table {
    let mut table = Table::new();
    table.set_format(plain_format());
    if !no_headers {
        table.set_titles(Row::new(headers.iter().map(|h| Cell::new(h)).collect()));
    }
    table
}

fn render(table: &Table) -> String {
    // Cells are padded on the right, which leaves trailing blanks.
    table
        .to_string()
        .lines()
        .map(|line| format!("{}\n", line.trim_end()))
        .collect()
}

/// Render findings with the given columns.
pub fn render_findings(findings: &[&Finding], columns: &[Column], no_headers: bool) -> String {
    let headers: Vec<&str> = columns.iter().map(Column::header).collect();
    let mut table = new_table(&headers, no_headers);

    for finding in findings {
        table.add_row(Row::new(
            columns
                .iter()
                .map(|column| Cell::new(&column.value(finding, CellStyle::Human)))
                .collect(),
        ));
    }

    render(&table)
}

/// Render the rule catalog itself.
pub fn render_rules(rules: &[DeprecationRule], no_headers: bool) -> String {
    let mut table = new_table(&RULE_HEADERS, no_headers);
    let or_na = |value: &str| {
        if value.is_empty() {
            NOT_APPLICABLE.to_string()
        } else {
            value.to_string()
        }
    };

    for rule in rules {
        table.add_row(Row::new(vec![
            Cell::new(&rule.kind),
            Cell::new(&rule.api_version),
            Cell::new(&or_na(&rule.deprecated_in)),
            Cell::new(&or_na(&rule.removed_in)),
            Cell::new(&or_na(&rule.replacement_api)),
            Cell::new(&or_na(&rule.replacement_available_in)),
            Cell::new(&rule.component),
        ]));
    }

    render(&table)
}
