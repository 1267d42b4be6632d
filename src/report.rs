use std::fmt::Write;

use crate::analysis::describe::{ColumnSummary, DescribeReport};

/// Statistic rows of the summary table, top to bottom.
const TABLE_ROWS: [(&str, fn(&ColumnSummary) -> f64); 8] = [
    ("count", |s| s.count as f64),
    ("mean", |s| s.mean),
    ("std", |s| s.std),
    ("min", |s| s.min),
    ("25%", |s| s.q25),
    ("50%", |s| s.median),
    ("75%", |s| s.q75),
    ("max", |s| s.max),
];

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Render the descriptive statistics as plain text: a summary table with one
/// column per dataset column, then the skewness and kurtosis series.
pub fn format_describe(report: &DescribeReport) -> String {
    let mut out = String::from("Data Description:\n");
    out.push_str(&summary_table(&report.columns));
    out.push_str("\nSkewness:\n");
    out.push_str(&series(&report.columns, |s| s.skewness));
    out.push_str("\nKurtosis:\n");
    out.push_str(&series(&report.columns, |s| s.kurtosis));
    out
}

fn summary_table(columns: &[ColumnSummary]) -> String {
    if columns.is_empty() {
        return "(no numeric columns)\n".to_string();
    }

    let cells: Vec<Vec<String>> = TABLE_ROWS
        .iter()
        .map(|(_, stat)| columns.iter().map(|c| format_value(stat(c))).collect())
        .collect();

    let label_width = TABLE_ROWS.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(j, c)| cells.iter().map(|row| row[j].len()).fold(c.column.len(), usize::max))
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:label_width$}", "");
    for (c, w) in columns.iter().zip(widths.iter().copied()) {
        let _ = write!(out, "  {:>w$}", c.column);
    }
    out.push('\n');

    for ((name, _), row) in TABLE_ROWS.iter().zip(&cells) {
        let _ = write!(out, "{name:<label_width$}");
        for (cell, w) in row.iter().zip(widths.iter().copied()) {
            let _ = write!(out, "  {cell:>w$}");
        }
        out.push('\n');
    }
    out
}

fn series(columns: &[ColumnSummary], stat: impl Fn(&ColumnSummary) -> f64) -> String {
    let width = columns.iter().map(|c| c.column.len()).max().unwrap_or(0);
    let mut out = String::new();
    for c in columns {
        let _ = writeln!(out, "{:<width$}    {}", c.column, format_value(stat(c)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> DescribeReport {
        DescribeReport {
            columns: vec![
                ColumnSummary::compute("age", &[20.0, 30.0, 40.0]),
                ColumnSummary::compute("income", &[]),
            ],
        }
    }

    #[test]
    fn table_has_header_and_eight_stat_rows() {
        let text = format_describe(&report());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Data Description:");
        assert!(lines[1].contains("age") && lines[1].contains("income"));
        for (k, (name, _)) in TABLE_ROWS.iter().enumerate() {
            assert!(lines[2 + k].starts_with(name), "row {k}: {}", lines[2 + k]);
        }
        assert!(lines[2].contains("3.000000"));
        assert!(lines[3].contains("30.000000"));
    }

    #[test]
    fn undefined_statistics_print_as_nan() {
        let text = format_describe(&report());
        let skew = text.split("Skewness:\n").nth(1).unwrap();
        let income_line = skew.lines().find(|l| l.starts_with("income")).unwrap();
        assert!(income_line.ends_with("NaN"));
        assert!(text.contains("Kurtosis:\n"));
    }

    #[test]
    fn empty_report_still_prints_sections() {
        let text = format_describe(&DescribeReport { columns: Vec::new() });
        assert!(text.contains("(no numeric columns)"));
        assert!(text.contains("Skewness:") && text.contains("Kurtosis:"));
    }
}
