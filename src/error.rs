use std::path::PathBuf;

use thiserror::Error;

use crate::charts::ChartError;

/// Errors raised while loading the dataset or running an analysis stage.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input file is missing, unreadable or not parsable as a table.
    #[error("data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A stage referenced a column absent from the loaded header.
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    /// The column exists but its inferred type cannot serve the request.
    #[error("column '{column}' is {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("chart rendering failed: {0}")]
    Chart(#[from] ChartError),

    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AnalysisError {
    pub fn missing_column(column: &str) -> Self {
        AnalysisError::MissingColumn {
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
