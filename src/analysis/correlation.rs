use serde::Serialize;

use crate::data::model::Dataset;
use crate::data::schema::{
    numeric_column, NumericCast, AGE, INCOME, INDEBT, IS_HOME_OWNER, OWNS_CAR, TIME_SPENT,
};
use crate::error::Result;

/// Columns of the correlation heatmap, each with the cast that turns it into
/// numbers. Boolean flags count as 1.0 / 0.0.
pub const CORRELATION_COLUMNS: [(&str, NumericCast); 6] = [
    (AGE, NumericCast::Native),
    (TIME_SPENT, NumericCast::Native),
    (INCOME, NumericCast::Native),
    (INDEBT, NumericCast::BoolIndicator),
    (IS_HOME_OWNER, NumericCast::BoolIndicator),
    (OWNS_CAR, NumericCast::BoolIndicator),
];

/// Square, symmetric matrix of Pearson coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` is the coefficient of columns `i` and `j`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Correlation matrix over [`CORRELATION_COLUMNS`].
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
    correlate(dataset, &CORRELATION_COLUMNS)
}

/// Pairwise Pearson correlation over arbitrary columns.
///
/// Fails with `MissingColumn` before computing anything if a column is absent.
pub fn correlate(dataset: &Dataset, columns: &[(&str, NumericCast)]) -> Result<CorrelationMatrix> {
    let series = columns
        .iter()
        .map(|(name, cast)| numeric_column(dataset, name, *cast))
        .collect::<Result<Vec<_>>>()?;

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    })
}

/// Pearson coefficient over the rows where both values are present.
///
/// `NaN` when fewer than two such rows remain or either side is constant.
/// The result is clamped to [-1, 1] against rounding drift.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}
