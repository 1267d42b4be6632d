use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a CSV column can take.
/// Grouping downstream keys `BTreeMap`s by cell, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so CellValue can key a BTreeMap --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the dtype inferred for a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Categorical,
}

impl ColumnType {
    /// Integer and float columns; booleans are not numeric even though they
    /// can be cast to 0/1.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Bool => "boolean",
            ColumnType::Categorical => "categorical",
        }
    }

    /// Infer a column's type from its cells.
    ///
    /// * all non-null integers          → `Integer`
    /// * integers and floats            → `Float`
    /// * all non-null booleans          → `Bool`
    /// * anything else                  → `Categorical`
    /// * no non-null values at all      → `Float`
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let (mut ints, mut floats, mut bools, mut strings) = (false, false, false, false);
        for cell in cells {
            match cell {
                CellValue::Integer(_) => ints = true,
                CellValue::Float(_) => floats = true,
                CellValue::Bool(_) => bools = true,
                CellValue::String(_) => strings = true,
                CellValue::Null => {}
            }
        }
        match (ints, floats, bools, strings) {
            (_, _, _, true) => ColumnType::Categorical,
            (_, true, false, false) => ColumnType::Float,
            (true, false, false, false) => ColumnType::Integer,
            (false, false, true, false) => ColumnType::Bool,
            (false, false, false, false) => ColumnType::Float,
            _ => ColumnType::Categorical,
        }
    }

    /// Bring a cell in line with the column type. Categorical columns keep
    /// every non-null cell as text so group keys compare consistently.
    fn coerce(self, cell: CellValue) -> CellValue {
        match (self, cell) {
            (_, CellValue::Null) => CellValue::Null,
            (ColumnType::Categorical, CellValue::String(s)) => CellValue::String(s),
            (ColumnType::Categorical, other) => CellValue::String(other.to_string()),
            (ColumnType::Float, CellValue::Integer(i)) => CellValue::Float(i as f64),
            (_, other) => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single row: column name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: BTreeMap<String, CellValue>,
}

impl Record {
    /// Value of `column`, or `Null` if the row has no such field.
    pub fn get(&self, column: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.fields.get(column).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with per-column types.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All rows.
    pub records: Vec<Record>,
    /// Column names in header order.
    pub column_names: Vec<String>,
    /// Inferred type per column.
    pub column_types: BTreeMap<String, ColumnType>,
}

impl Dataset {
    /// Build the dataset from a header and raw rows, inferring column types
    /// and coercing every cell to its column's type.
    ///
    /// `rows[i][j]` is the cell of row `i` under `header[j]`.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let column_types: BTreeMap<String, ColumnType> = header
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let ty = ColumnType::infer(rows.iter().filter_map(|row| row.get(j)));
                log::debug!("column '{name}' inferred as {}", ty.name());
                (name.clone(), ty)
            })
            .collect();

        let records = rows
            .into_iter()
            .map(|row| {
                let mut fields = BTreeMap::new();
                for (name, cell) in header.iter().zip(row) {
                    fields.insert(name.clone(), column_types[name].coerce(cell));
                }
                Record { fields }
            })
            .collect();

        Dataset {
            records,
            column_names: header,
            column_types,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_types.get(name).copied()
    }

    /// Numeric columns in header order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.column_names
            .iter()
            .filter(|name| self.column_types[name.as_str()].is_numeric())
            .map(String::as_str)
            .collect()
    }

    /// The raw cells of one column in row order.
    pub fn cells<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.records.iter().map(move |r| r.get(column))
    }
}
