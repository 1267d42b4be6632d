use serde::Serialize;

use crate::data::model::Dataset;
use crate::data::schema::numeric_values;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Per-column summary statistics
// ---------------------------------------------------------------------------

/// Summary of one numeric column. Undefined statistics are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl ColumnSummary {
    /// Compute every statistic from the non-missing values of a column.
    pub fn compute(column: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        ColumnSummary {
            column: column.to_string(),
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
            skewness: skewness(&sorted),
            kurtosis: excess_kurtosis(&sorted),
        }
    }
}

/// Descriptive statistics for every numeric column, in header order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeReport {
    pub columns: Vec<ColumnSummary>,
}

/// Summarise all integer and float columns. Boolean and categorical columns
/// are left out.
pub fn describe(dataset: &Dataset) -> Result<DescribeReport> {
    let columns = dataset
        .numeric_columns()
        .into_iter()
        .map(|name| Ok(ColumnSummary::compute(name, &numeric_values(dataset, name)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(DescribeReport { columns })
}

// ---------------------------------------------------------------------------
// Moment and order statistics
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with denominator n − 1.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Quantile of ascending-sorted values, interpolating linearly between the
/// two nearest order statistics.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// Sums of squared, cubed and fourth-power deviations from the mean.
fn central_sums(values: &[f64]) -> (f64, f64, f64) {
    let m = mean(values);
    values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), v| {
        let d = v - m;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    })
}

/// Adjusted Fisher-Pearson skewness. Needs at least 3 values; a constant
/// column has skewness 0.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 3 {
        return f64::NAN;
    }
    let (s2, s3, _) = central_sums(values);
    if s2 == 0.0 {
        return 0.0;
    }
    (n * (n - 1.0).sqrt() / (n - 2.0)) * (s3 / s2.powf(1.5))
}

/// Bias-corrected excess kurtosis (normal = 0). Needs at least 4 values; a
/// constant column has kurtosis 0.
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 4 {
        return f64::NAN;
    }
    let (s2, _, s4) = central_sums(values);
    if s2 == 0.0 {
        return 0.0;
    }
    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    let numerator = n * (n + 1.0) * (n - 1.0) * s4;
    let denominator = (n - 2.0) * (n - 3.0) * s2 * s2;
    numerator / denominator - adj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn summary_of_small_column() {
        let s = ColumnSummary::compute("x", &[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert!(close(s.mean, 2.5));
        assert!(close(s.std, (5.0f64 / 3.0).sqrt()));
        assert_eq!(s.min, 1.0);
        assert!(close(s.q25, 1.75));
        assert!(close(s.median, 2.5));
        assert!(close(s.q75, 3.25));
        assert_eq!(s.max, 4.0);
        assert!(close(s.skewness, 0.0));
        assert!(close(s.kurtosis, -1.2));
    }

    #[test]
    fn skewness_sign_follows_the_long_tail() {
        let right = [1.0, 1.0, 1.0, 2.0, 10.0];
        assert!(skewness(&right) > 0.0);
        let left: Vec<f64> = right.iter().map(|v| -v).collect();
        assert!(skewness(&left) < 0.0);
        // Reference value for [1, 1, 1, 2, 10].
        assert!((skewness(&right) - 2.171_292_5).abs() < 1e-6);
    }

    #[test]
    fn kurtosis_matches_reference_value() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert!((excess_kurtosis(&values) - 4.986_866).abs() < 1e-5);
    }

    #[test]
    fn too_few_values_are_undefined() {
        assert!(skewness(&[1.0, 2.0]).is_nan());
        assert!(excess_kurtosis(&[1.0, 2.0, 3.0]).is_nan());
        assert!(sample_std(&[5.0]).is_nan());
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn constant_column_has_zero_shape_statistics() {
        let values = [7.0; 6];
        assert_eq!(skewness(&values), 0.0);
        assert_eq!(excess_kurtosis(&values), 0.0);
        assert_eq!(sample_std(&values), 0.0);
    }

    #[test]
    fn quartiles_are_ordered() {
        let values: Vec<f64> = (0..97).map(|i| ((i * 37) % 101) as f64).collect();
        let s = ColumnSummary::compute("x", &values);
        assert!(s.std >= 0.0);
        assert!(s.min <= s.q25 && s.q25 <= s.median && s.median <= s.q75 && s.q75 <= s.max);
    }

    #[test]
    fn describe_skips_boolean_and_categorical_columns() {
        let ds = Dataset::from_rows(
            vec!["age".into(), "indebt".into(), "gender".into(), "income".into()],
            vec![
                vec![
                    CellValue::Integer(20),
                    CellValue::Bool(true),
                    CellValue::String("male".into()),
                    CellValue::Float(1.5),
                ],
                vec![
                    CellValue::Integer(30),
                    CellValue::Bool(false),
                    CellValue::String("female".into()),
                    CellValue::Null,
                ],
            ],
        );
        let report = describe(&ds).unwrap();
        let names: Vec<&str> = report.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["age", "income"]);
        assert_eq!(report.columns[1].count, 1);
    }

    #[test]
    fn empty_dataset_reports_zero_counts() {
        let ds = Dataset::from_rows(vec!["age".into(), "income".into()], Vec::new());
        let report = describe(&ds).unwrap();
        assert_eq!(report.columns.len(), 2);
        for column in &report.columns {
            assert_eq!(column.count, 0);
            assert!(column.mean.is_nan());
            assert!(column.skewness.is_nan());
            assert!(column.kurtosis.is_nan());
        }
    }
}
