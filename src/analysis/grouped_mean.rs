use serde::Serialize;

use crate::data::model::Dataset;
use crate::data::schema::{numeric_column, NumericCast};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: f64,
    pub mean: f64,
    pub count: usize,
}

/// Mean of `value_column` per distinct value of the numeric `key_column`,
/// ascending by key.
///
/// Only observed keys appear. Rows missing either value are skipped, so a
/// key whose rows all lack a value does not appear either: the result feeds a
/// line chart, which has no point to draw for an undefined mean.
pub fn grouped_mean(
    dataset: &Dataset,
    key_column: &str,
    value_column: &str,
) -> Result<Vec<GroupMean>> {
    let keys = numeric_column(dataset, key_column, NumericCast::Native)?;
    let values = numeric_column(dataset, value_column, NumericCast::Native)?;

    let mut pairs: Vec<(f64, f64)> = keys
        .iter()
        .zip(&values)
        .filter_map(|(k, v)| Some(((*k)?, (*v)?)))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(pairs
        .chunk_by(|a, b| a.0 == b.0)
        .map(|run| {
            let sum: f64 = run.iter().map(|(_, v)| v).sum();
            GroupMean {
                key: run[0].0,
                mean: sum / run.len() as f64,
                count: run.len(),
            }
        })
        .collect())
}
