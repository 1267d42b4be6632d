use super::model::{CellValue, ColumnType, Dataset};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Expected columns
// ---------------------------------------------------------------------------

/// What a stage needs a column to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
}

impl ColumnKind {
    fn name(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Categorical => "categorical",
        }
    }

    fn accepts(self, ty: ColumnType) -> bool {
        match self {
            ColumnKind::Numeric => ty.is_numeric(),
            // A 0/1 integer column serves as a boolean indicator as well.
            ColumnKind::Boolean => ty == ColumnType::Bool || ty.is_numeric(),
            // Any column can be grouped by its distinct values.
            ColumnKind::Categorical => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExpectedColumn {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn expected(name: &'static str, kind: ColumnKind) -> ExpectedColumn {
    ExpectedColumn { name, kind }
}

pub const AGE: &str = "age";
pub const TIME_SPENT: &str = "time_spent";
pub const INCOME: &str = "income";
pub const INDEBT: &str = "indebt";
pub const IS_HOME_OWNER: &str = "isHomeOwner";
pub const OWNS_CAR: &str = "Owns_Car";
pub const DEMOGRAPHICS: &str = "demographics";
pub const GENDER: &str = "gender";
pub const PLATFORM: &str = "platform";

/// Columns the full set of stages relies on.
pub const EXPECTED_COLUMNS: [ExpectedColumn; 9] = [
    expected(AGE, ColumnKind::Numeric),
    expected(TIME_SPENT, ColumnKind::Numeric),
    expected(INCOME, ColumnKind::Numeric),
    expected(INDEBT, ColumnKind::Boolean),
    expected(IS_HOME_OWNER, ColumnKind::Boolean),
    expected(OWNS_CAR, ColumnKind::Boolean),
    expected(DEMOGRAPHICS, ColumnKind::Categorical),
    expected(GENDER, ColumnKind::Categorical),
    expected(PLATFORM, ColumnKind::Categorical),
];

// ---------------------------------------------------------------------------
// Schema check, performed once after load
// ---------------------------------------------------------------------------

/// Outcome of checking a dataset against [`EXPECTED_COLUMNS`].
#[derive(Debug, Default)]
pub struct SchemaReport {
    pub issues: Vec<AnalysisError>,
}

impl SchemaReport {
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check that every expected column is present with a usable type.
pub fn validate(dataset: &Dataset) -> SchemaReport {
    let issues = EXPECTED_COLUMNS
        .iter()
        .filter_map(|col| require(dataset, col.name, col.kind).err())
        .collect();
    SchemaReport { issues }
}

/// Fail with `MissingColumn` / `ColumnType` unless `column` can serve as `kind`.
pub fn require(dataset: &Dataset, column: &str, kind: ColumnKind) -> Result<ColumnType> {
    let ty = dataset
        .column_type(column)
        .ok_or_else(|| AnalysisError::missing_column(column))?;
    if !kind.accepts(ty) {
        return Err(AnalysisError::ColumnType {
            column: column.to_string(),
            expected: kind.name(),
            found: ty.name(),
        });
    }
    Ok(ty)
}

// ---------------------------------------------------------------------------
// Typed accessors
// ---------------------------------------------------------------------------

/// How a column is turned into `f64` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericCast {
    /// Integer or float column, values taken as-is.
    Native,
    /// Boolean column cast to 1.0 (true) / 0.0 (false).
    BoolIndicator,
}

impl NumericCast {
    fn kind(self) -> ColumnKind {
        match self {
            NumericCast::Native => ColumnKind::Numeric,
            NumericCast::BoolIndicator => ColumnKind::Boolean,
        }
    }

    fn apply(self, cell: &CellValue) -> Option<f64> {
        match (self, cell) {
            (NumericCast::BoolIndicator, CellValue::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            (_, cell) => cell.as_f64(),
        }
    }
}

/// One column as `f64` per row; `None` marks a missing cell.
pub fn numeric_column(
    dataset: &Dataset,
    column: &str,
    cast: NumericCast,
) -> Result<Vec<Option<f64>>> {
    require(dataset, column, cast.kind())?;
    Ok(dataset.cells(column).map(|c| cast.apply(c)).collect())
}

/// The non-missing values of a numeric column.
pub fn numeric_values(dataset: &Dataset, column: &str) -> Result<Vec<f64>> {
    Ok(numeric_column(dataset, column, NumericCast::Native)?
        .into_iter()
        .flatten()
        .collect())
}

/// One column as group keys per row; `None` marks a missing cell.
pub fn categorical_column<'a>(
    dataset: &'a Dataset,
    column: &str,
) -> Result<Vec<Option<&'a CellValue>>> {
    require(dataset, column, ColumnKind::Categorical)?;
    Ok(dataset
        .records
        .iter()
        .map(|r| Some(r.get(column)).filter(|c| !c.is_null()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_rows(
            vec!["age".into(), "indebt".into(), "gender".into()],
            vec![
                vec![CellValue::Integer(20), CellValue::Bool(true), CellValue::String("male".into())],
                vec![CellValue::Null, CellValue::Bool(false), CellValue::Null],
            ],
        )
    }

    #[test]
    fn validate_reports_every_absent_column() {
        let report = validate(&dataset());
        assert!(!report.is_complete());
        let missing: Vec<String> = report
            .issues
            .iter()
            .filter_map(|e| match e {
                AnalysisError::MissingColumn { column } => Some(column.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(missing.len(), 6);
        assert!(missing.contains(&INCOME.to_string()));
        assert!(!missing.contains(&AGE.to_string()));
    }

    #[test]
    fn bool_indicator_casts_to_zero_and_one() {
        let values = numeric_column(&dataset(), INDEBT, NumericCast::BoolIndicator).unwrap();
        assert_eq!(values, vec![Some(1.0), Some(0.0)]);
    }

    #[test]
    fn native_cast_rejects_boolean_column() {
        let err = numeric_column(&dataset(), INDEBT, NumericCast::Native).unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnType { .. }));
    }

    #[test]
    fn absent_column_is_missing_column() {
        let err = numeric_values(&dataset(), INCOME).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { column } if column == INCOME));
    }

    #[test]
    fn numeric_values_skip_missing_cells() {
        assert_eq!(numeric_values(&dataset(), AGE).unwrap(), vec![20.0]);
    }

    #[test]
    fn categorical_column_marks_missing_as_none() {
        let ds = dataset();
        let keys = categorical_column(&ds, GENDER).unwrap();
        assert_eq!(keys[0], Some(&CellValue::String("male".into())));
        assert_eq!(keys[1], None);
    }
}
