use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset};
use crate::error::AnalysisError;

/// Cell texts read as missing, matching the usual dataframe defaults.
const NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-delimited with a header row (the default input)
/// * `.json`    – `[{ "age": 20, "gender": "male", ... }, ...]`
/// * `.parquet` – flat scalar columns
///
/// Every failure is reported as [`AnalysisError::DataUnavailable`].
pub fn load_file(path: &Path) -> Result<Dataset, AnalysisError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        _ => load_csv(path),
    };

    loaded.map_err(|e| AnalysisError::DataUnavailable {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row required; every row must have as many fields as the header.
fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(Dataset::from_rows(headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if NA_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "True" | "true" | "TRUE" => CellValue::Bool(true),
        "False" | "false" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 56, "gender": "male", "income": 19774, "indebt": true },
///   ...
/// ]
/// ```
///
/// Columns are ordered by first appearance across the records.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::from_rows(headers, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => guess_cell_type(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns (strings, ints, floats, bools).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns: Vec<&Arc<dyn Array>> = batch.columns().iter().collect();

        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .enumerate()
                .map(|(j, col)| {
                    extract_cell(col, row)
                        .with_context(|| format!("Row {row}: failed to read '{}'", headers[j]))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(Dataset::from_rows(headers, rows))
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => CellValue::Float(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => CellValue::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => CellValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnType;
    use arrow::array::{ArrayRef, Date32Array};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn guesses_cell_types() {
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("4.5"), CellValue::Float(4.5));
        assert_eq!(guess_cell_type("True"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("false"), CellValue::Bool(false));
        assert_eq!(guess_cell_type("NaN"), CellValue::Null);
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("Urban"), CellValue::String("Urban".into()));
    }

    #[test]
    fn loads_csv_with_typed_columns() {
        let file = write_temp(
            ".csv",
            "age,gender,income,indebt\n20,male,100,True\n30,female,250.5,False\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names, vec!["age", "gender", "income", "indebt"]);
        assert_eq!(ds.column_type("age"), Some(ColumnType::Integer));
        assert_eq!(ds.column_type("gender"), Some(ColumnType::Categorical));
        assert_eq!(ds.column_type("income"), Some(ColumnType::Float));
        assert_eq!(ds.column_type("indebt"), Some(ColumnType::Bool));
    }

    #[test]
    fn header_only_csv_loads_as_empty_dataset() {
        let file = write_temp(".csv", "age,income\n");
        let ds = load_file(file.path()).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.column_names.len(), 2);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let err = load_file(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
    }

    #[test]
    fn ragged_csv_is_data_unavailable() {
        let file = write_temp(".csv", "a,b\n1,2\n3\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
    }

    #[test]
    fn invalid_utf8_is_data_unavailable() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"a,b\n1,\xff\xfe\n").unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
    }

    #[test]
    fn loads_json_records() {
        let file = write_temp(
            ".json",
            r#"[{"age": 20, "platform": "Instagram"}, {"age": 31, "owns": true}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.column_names, vec!["age", "platform", "owns"]);
        assert!(ds.records[1].get("platform").is_null());
        assert_eq!(ds.column_type("owns"), Some(ColumnType::Bool));
    }

    fn write_parquet(columns: Vec<(&str, ArrayRef)>) -> tempfile::NamedTempFile {
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer =
            ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn loads_parquet_scalar_columns_with_nulls() {
        let file = write_parquet(vec![
            ("age", Arc::new(Int64Array::from(vec![Some(21), None])) as ArrayRef),
            ("platform", Arc::new(StringArray::from(vec![Some("YouTube"), None])) as ArrayRef),
            ("indebt", Arc::new(BooleanArray::from(vec![Some(true), Some(false)])) as ArrayRef),
        ]);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.column_names, vec!["age", "platform", "indebt"]);
        assert_eq!(ds.column_type("age"), Some(ColumnType::Integer));
        assert_eq!(ds.column_type("platform"), Some(ColumnType::Categorical));
        assert_eq!(ds.column_type("indebt"), Some(ColumnType::Bool));
        assert_eq!(ds.records[0].get("age"), &CellValue::Integer(21));
        assert!(ds.records[1].get("age").is_null());
        assert!(ds.records[1].get("platform").is_null());
        assert_eq!(ds.records[1].get("indebt"), &CellValue::Bool(false));
    }

    #[test]
    fn parquet_with_unsupported_column_is_data_unavailable() {
        let file = write_parquet(vec![(
            "signup",
            Arc::new(Date32Array::from(vec![19_000, 19_001])) as ArrayRef,
        )]);
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
    }

    #[test]
    fn json_that_is_not_an_array_is_rejected() {
        let file = write_temp(".json", r#"{"age": 20}"#);
        assert!(load_file(file.path()).is_err());
    }
}
