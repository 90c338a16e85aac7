//! Markdown pipe tables.

use crate::api::formatter::{CellStyle, Column};
use crate::api::types::Finding;

/// Render findings as a markdown table. Markdown tables always carry a
/// header row.
pub fn render(findings: &[&Finding], columns: &[Column]) -> String {
    let rows: Vec<Vec<String>> = findings
        .iter()
        .map(|finding| {
            columns
                .iter()
                .map(|column| escape(&column.value(finding, CellStyle::Human)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.header().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let headers: Vec<String> = columns.iter().map(|c| c.header().to_string()).collect();
    push_row(&mut out, &headers, &widths);

    out.push('|');
    for width in &widths {
        out.push_str(&"-".repeat(width + 2));
        out.push('|');
    }
    out.push('\n');

    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(pad));
        out.push_str(" |");
    }
    out.push('\n');
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::formatter::tests::{finding_one, finding_two};

    #[test]
    fn test_markdown_table() {
        let one = finding_one();
        let two = finding_two();
        let out = render(&[&one, &two], &[Column::Name, Column::Namespace, Column::RemovedIn]);
        assert_eq!(
            out,
            "\
| NAME          | NAMESPACE      | REMOVED IN |
|---------------|----------------|------------|
| some-name-one | lamb-namespace | v1.0.0     |
| some-name-two | <UNKNOWN>      | v1.0.0     |
"
        );
    }

    #[test]
    fn test_pipes_are_escaped() {
        let mut one = finding_one();
        one.name = "a|b".to_string();
        let out = render(&[&one], &[Column::Name]);
        assert!(out.contains("| a\\|b |"));
    }
}
