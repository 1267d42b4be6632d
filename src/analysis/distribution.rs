use serde::Serialize;

use super::describe::quantile_sorted;
use crate::data::model::Dataset;
use crate::data::partition::{partition_first_seen, partition_ordered};
use crate::data::schema::{categorical_column, numeric_column, numeric_values, NumericCast};
use crate::error::Result;

/// Whisker reach as a multiple of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

// ---------------------------------------------------------------------------
// BoxSummary
// ---------------------------------------------------------------------------

/// Box-plot summary of one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Most extreme observations inside the fences.
    pub whisker_low: f64,
    pub whisker_high: f64,
    /// Observations beyond `q1 - 1.5·IQR` or `q3 + 1.5·IQR`, ascending.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty sample.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - WHISKER_IQR * iqr, q3 + WHISKER_IQR * iqr);

        let inside = |v: &&f64| (low_fence..=high_fence).contains(*v);
        // Quartiles always lie inside the fences, so both whiskers exist.
        let whisker_low = sorted.iter().find(inside).copied().unwrap_or(q1);
        let whisker_high = sorted.iter().rev().find(inside).copied().unwrap_or(q3);

        Some(BoxSummary {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median: quantile_sorted(&sorted, 0.5),
            q3,
            max: sorted[sorted.len() - 1],
            whisker_low,
            whisker_high,
            outliers: sorted
                .iter()
                .copied()
                .filter(|v| *v < low_fence || *v > high_fence)
                .collect(),
        })
    }
}

/// Box summary of a single numeric column; `None` when it has no values.
pub fn column_distribution(dataset: &Dataset, column: &str) -> Result<Option<BoxSummary>> {
    Ok(BoxSummary::compute(&numeric_values(dataset, column)?))
}

// ---------------------------------------------------------------------------
// Grouped box summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBox {
    pub group: String,
    pub summary: BoxSummary,
}

/// Box summary of `value_column` for each distinct value of `group_column`.
///
/// Groups follow first-seen order, or `order` when given (unlisted groups
/// after the listed ones). Groups without any value are omitted.
pub fn grouped_distribution(
    dataset: &Dataset,
    group_column: &str,
    value_column: &str,
    order: Option<&[String]>,
) -> Result<Vec<GroupBox>> {
    let keys = categorical_column(dataset, group_column)?;
    let values = numeric_column(dataset, value_column, NumericCast::Native)?;

    let partitions = match order {
        Some(order) => partition_ordered(&keys, order),
        None => partition_first_seen(&keys),
    };

    Ok(partitions
        .into_iter()
        .filter_map(|p| {
            let sample: Vec<f64> = p.rows.iter().filter_map(|&row| values[row]).collect();
            BoxSummary::compute(&sample).map(|summary| GroupBox {
                group: p.key.to_string(),
                summary,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::error::AnalysisError;

    #[test]
    fn five_number_summary_and_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let b = BoxSummary::compute(&values).unwrap();
        assert_eq!(b.count, 9);
        assert_eq!(b.min, 1.0);
        assert_eq!(b.q1, 3.0);
        assert_eq!(b.median, 5.0);
        assert_eq!(b.q3, 7.0);
        assert_eq!(b.max, 100.0);
        assert_eq!(b.q3 - b.q1, 4.0);
        assert_eq!(b.whisker_low, 1.0);
        assert_eq!(b.whisker_high, 8.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn single_value_box() {
        let b = BoxSummary::compute(&[42.0]).unwrap();
        assert_eq!((b.min, b.q1, b.median, b.q3, b.max), (42.0, 42.0, 42.0, 42.0, 42.0));
        assert!(b.outliers.is_empty());
    }

    #[test]
    fn empty_sample_has_no_box() {
        assert!(BoxSummary::compute(&[]).is_none());
    }

    fn demo_dataset() -> Dataset {
        let rows = [
            ("Urban", Some(100)),
            ("Rural", Some(50)),
            ("Urban", Some(300)),
            ("Suburban", None),
            ("Rural", Some(70)),
        ]
        .iter()
        .map(|(group, income)| {
            vec![
                CellValue::String(group.to_string()),
                income.map(CellValue::Integer).unwrap_or(CellValue::Null),
            ]
        })
        .collect();
        Dataset::from_rows(vec!["demographics".into(), "income".into()], rows)
    }

    #[test]
    fn groups_in_first_seen_order_and_empty_groups_dropped() {
        let groups = grouped_distribution(&demo_dataset(), "demographics", "income", None).unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(names, vec!["Urban", "Rural"]);
        assert_eq!(groups[0].summary.median, 200.0);
        assert_eq!(groups[1].summary.count, 2);
    }

    #[test]
    fn supplied_group_order_is_respected() {
        let order = vec!["Rural".to_string(), "Urban".to_string()];
        let groups =
            grouped_distribution(&demo_dataset(), "demographics", "income", Some(order.as_slice()))
                .unwrap();
        assert_eq!(groups[0].group, "Rural");
        assert_eq!(groups[1].group, "Urban");
    }

    #[test]
    fn missing_value_column_fails() {
        let err = grouped_distribution(&demo_dataset(), "demographics", "salary", None).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { .. }));
    }
}
