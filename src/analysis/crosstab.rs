use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{CellValue, Dataset};
use crate::data::schema::categorical_column;
use crate::error::Result;

/// Dense two-way frequency table. Every (row, column) pair has a count,
/// zero included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub row_label: String,
    pub column_label: String,
    /// Distinct row-key values, ascending.
    pub rows: Vec<String>,
    /// Distinct column-key values, ascending.
    pub columns: Vec<String>,
    /// `counts[i][j]` = rows with key `rows[i]` and `columns[j]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn row_total(&self, i: usize) -> usize {
        self.counts[i].iter().sum()
    }
}

/// Count rows for every combination of `row_column` × `column_column`.
///
/// Rows where either key is missing are not counted.
pub fn cross_tabulate(
    dataset: &Dataset,
    row_column: &str,
    column_column: &str,
) -> Result<CrossTab> {
    let row_keys = categorical_column(dataset, row_column)?;
    let col_keys = categorical_column(dataset, column_column)?;

    let mut pairs: BTreeMap<(&CellValue, &CellValue), usize> = BTreeMap::new();
    for (r, c) in row_keys.iter().zip(&col_keys) {
        if let (Some(r), Some(c)) = (r, c) {
            *pairs.entry((*r, *c)).or_default() += 1;
        }
    }

    // Keys come from every observed pair so that rows and columns stay
    // consistent with the counted cells.
    let mut rows: Vec<&CellValue> = pairs.keys().map(|(r, _)| *r).collect();
    rows.dedup();
    let mut columns: Vec<&CellValue> = pairs.keys().map(|(_, c)| *c).collect();
    columns.sort();
    columns.dedup();

    let counts: Vec<Vec<usize>> = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| pairs.get(&(*r, *c)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    let table = CrossTab {
        row_label: row_column.to_string(),
        column_label: column_column.to_string(),
        rows: rows.iter().map(|v| v.to_string()).collect(),
        columns: columns.iter().map(|v| v.to_string()).collect(),
        counts,
    };
    log::debug!(
        "{row_column} x {column_column}: {} x {} cells over {} rows",
        table.rows.len(),
        table.columns.len(),
        table.total()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn count(tab: &CrossTab, row: &str, column: &str) -> Option<usize> {
        let i = tab.rows.iter().position(|r| r == row)?;
        let j = tab.columns.iter().position(|c| c == column)?;
        Some(tab.counts[i][j])
    }

    fn dataset(pairs: &[(&str, &str)]) -> Dataset {
        let rows = pairs
            .iter()
            .map(|(g, p)| vec![CellValue::String(g.to_string()), CellValue::String(p.to_string())])
            .collect();
        Dataset::from_rows(vec!["gender".into(), "platform".into()], rows)
    }

    #[test]
    fn dense_table_fills_missing_combinations_with_zero() {
        let ds = dataset(&[
            ("male", "Instagram"),
            ("female", "Facebook"),
            ("male", "Instagram"),
            ("non-binary", "YouTube"),
        ]);
        let tab = cross_tabulate(&ds, "gender", "platform").unwrap();
        assert_eq!(tab.rows, vec!["female", "male", "non-binary"]);
        assert_eq!(tab.columns, vec!["Facebook", "Instagram", "YouTube"]);
        assert_eq!(count(&tab, "male", "Instagram"), Some(2));
        assert_eq!(count(&tab, "male", "YouTube"), Some(0));
        assert_eq!(count(&tab, "female", "Facebook"), Some(1));
        assert_eq!(tab.row_total(1), 2);
    }

    #[test]
    fn counts_sum_to_row_count() {
        let ds = dataset(&[
            ("male", "Instagram"),
            ("female", "Facebook"),
            ("female", "YouTube"),
            ("male", "Facebook"),
            ("non-binary", "Instagram"),
        ]);
        let tab = cross_tabulate(&ds, "gender", "platform").unwrap();
        assert_eq!(tab.total(), ds.len());
    }

    #[test]
    fn empty_dataset_gives_empty_table() {
        let tab = cross_tabulate(&dataset(&[]), "gender", "platform").unwrap();
        assert!(tab.rows.is_empty());
        assert_eq!(tab.total(), 0);
    }

    #[test]
    fn missing_column_fails() {
        let err = cross_tabulate(&dataset(&[]), "gender", "device").unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { column } if column == "device"));
    }
}
