use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::temporal_conversions::date32_to_datetime;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{TrajectoryDataset, TrajectoryRecord};

/// Launch dates are written as `MM/DD/YYYY`; nothing else is accepted.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

pub const COL_DATE: &str = "Date";
pub const COL_TARGET: &str = "Target";
pub const COL_PATH: &str = "Path";
pub const COL_LC3: &str = "LC3";
pub const COL_AVINF: &str = "Avinf";
pub const COL_TOF: &str = "TOF";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a trajectory table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Date,Target,Path,LC3,Avinf,TOF` (canonical)
/// * `.json`    – `[{ "Date": "03/14/2031", "Target": "Uranus", ... }, ...]`
/// * `.parquet` – same column names; `Date` as text or as a Date32 column
pub fn load_file(path: &Path) -> Result<TrajectoryDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let dataset = TrajectoryDataset::from_records(records);
    log::info!(
        "Loaded {} trajectories from {} ({} targets, {} paths)",
        dataset.len(),
        path.display(),
        dataset.targets().len(),
        dataset.paths().len()
    );
    Ok(dataset)
}

/// Parse a launch date in the fixed `MM/DD/YYYY` layout.
///
/// Month and day may drop their leading zero; the year is always four digits
/// and no surrounding whitespace is allowed.
pub fn parse_launch_date(row: usize, value: &str) -> Result<NaiveDate, LoadError> {
    let invalid = || LoadError::InvalidDate {
        row,
        value: value.to_string(),
    };
    let year = value.rsplit('/').next().unwrap_or_default();
    if value.trim() != value || year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// NaN marks a missing cell; infinities are never valid measurements.
fn finite_value(row: usize, column: &str, value: f64) -> Result<f64, LoadError> {
    if value.is_nan() {
        Err(LoadError::MissingValue {
            row,
            column: column.to_string(),
        })
    } else if value.is_infinite() {
        Err(LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
    } else {
        Ok(value)
    }
}

fn parse_number(row: usize, column: &str, value: &str) -> Result<f64, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LoadError::MissingValue {
            row,
            column: column.to_string(),
        });
    }
    let parsed = trimmed.parse::<f64>().map_err(|_| LoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })?;
    finite_value(row, column, parsed)
}

fn require_text(row: usize, column: &str, value: &str) -> Result<String, LoadError> {
    if value.is_empty() {
        return Err(LoadError::MissingValue {
            row,
            column: column.to_string(),
        });
    }
    Ok(value.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<TrajectoryRecord>, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let date_idx = column(COL_DATE)?;
    let target_idx = column(COL_TARGET)?;
    let path_idx = column(COL_PATH)?;
    let c3_idx = column(COL_LC3)?;
    let vinf_idx = column(COL_AVINF)?;
    let tof_idx = column(COL_TOF)?;

    let mut records = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        records.push(TrajectoryRecord {
            date: parse_launch_date(row, field(date_idx))?,
            target: require_text(row, COL_TARGET, field(target_idx))?,
            path: require_text(row, COL_PATH, field(path_idx))?,
            launch_c3: parse_number(row, COL_LC3, field(c3_idx))?,
            arrival_vinf: parse_number(row, COL_AVINF, field(vinf_idx))?,
            time_of_flight: parse_number(row, COL_TOF, field(tof_idx))?,
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`
/// with dates already formatted):
///
/// ```json
/// [
///   { "Date": "03/14/2031", "Target": "Uranus", "Path": "EJU",
///     "LC3": 21.4, "Avinf": 11.2, "TOF": 9.5 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<TrajectoryRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = root.as_array().ok_or_else(|| LoadError::ColumnType {
        column: "<root>".to_string(),
        found: json_kind(&root).to_string(),
        expected: "array of records",
    })?;

    rows.iter()
        .enumerate()
        .map(|(row, value)| json_record(row, value))
        .collect()
}

fn json_record(row: usize, value: &JsonValue) -> Result<TrajectoryRecord, LoadError> {
    let obj = value.as_object().ok_or_else(|| LoadError::InvalidValue {
        row,
        column: "<record>".to_string(),
        value: value.to_string(),
    })?;

    let get = |column: &str| json_field(obj, row, column);
    let text = |column: &str| -> Result<String, LoadError> {
        match get(column)? {
            JsonValue::String(s) => require_text(row, column, s),
            other => Ok(other.to_string()),
        }
    };
    let number = |column: &str| -> Result<f64, LoadError> {
        match get(column)? {
            JsonValue::Number(n) => n.as_f64().ok_or_else(|| LoadError::InvalidValue {
                row,
                column: column.to_string(),
                value: n.to_string(),
            }),
            JsonValue::String(s) => parse_number(row, column, s),
            other => Err(LoadError::InvalidValue {
                row,
                column: column.to_string(),
                value: other.to_string(),
            }),
        }
    };

    let date = match get(COL_DATE)? {
        JsonValue::String(s) => parse_launch_date(row, s)?,
        other => {
            return Err(LoadError::InvalidDate {
                row,
                value: other.to_string(),
            })
        }
    };

    Ok(TrajectoryRecord {
        date,
        target: text(COL_TARGET)?,
        path: text(COL_PATH)?,
        launch_c3: number(COL_LC3)?,
        arrival_vinf: number(COL_AVINF)?,
        time_of_flight: number(COL_TOF)?,
    })
}

fn json_field<'a>(
    obj: &'a serde_json::Map<String, JsonValue>,
    row: usize,
    column: &str,
) -> Result<&'a JsonValue, LoadError> {
    match obj.get(column) {
        None => Err(LoadError::MissingColumn(column.to_string())),
        Some(JsonValue::Null) => Err(LoadError::MissingValue {
            row,
            column: column.to_string(),
        }),
        Some(v) => Ok(v),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the trajectory table.
///
/// Text columns may be Utf8 or LargeUtf8, numeric columns any of
/// Float64/Float32/Int64/Int32. Nulls in a required column fail the load.
fn load_parquet(path: &Path) -> Result<Vec<TrajectoryRecord>, LoadError> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let reader = builder.build().map_err(parquet_err)?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let offset = records.len();

        let column = |name: &str| -> Result<ArrayRef, LoadError> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
            Ok(batch.column(idx).clone())
        };

        let dates = date_column(&column(COL_DATE)?, offset)?;
        let targets = text_column(&column(COL_TARGET)?, COL_TARGET, offset)?;
        let paths = text_column(&column(COL_PATH)?, COL_PATH, offset)?;
        let c3 = number_column(&column(COL_LC3)?, COL_LC3, offset)?;
        let vinf = number_column(&column(COL_AVINF)?, COL_AVINF, offset)?;
        let tof = number_column(&column(COL_TOF)?, COL_TOF, offset)?;

        for i in 0..batch.num_rows() {
            records.push(TrajectoryRecord {
                date: dates[i],
                target: targets[i].clone(),
                path: paths[i].clone(),
                launch_c3: c3[i],
                arrival_vinf: vinf[i],
                time_of_flight: tof[i],
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn missing(col: &dyn Array, column: &str, offset: usize) -> Result<(), LoadError> {
    match (0..col.len()).find(|&i| col.is_null(i)) {
        Some(i) => Err(LoadError::MissingValue {
            row: offset + i,
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

fn wrong_type(column: &str, col: &dyn Array, expected: &'static str) -> LoadError {
    LoadError::ColumnType {
        column: column.to_string(),
        found: format!("{:?}", col.data_type()),
        expected,
    }
}

fn text_column(col: &ArrayRef, column: &str, offset: usize) -> Result<Vec<String>, LoadError> {
    missing(col.as_ref(), column, offset)?;
    let values: Vec<&str> = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().iter().flatten().collect(),
        DataType::LargeUtf8 => col.as_string::<i64>().iter().flatten().collect(),
        _ => return Err(wrong_type(column, col.as_ref(), "Utf8")),
    };
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| require_text(offset + i, column, v))
        .collect()
}

fn date_column(col: &ArrayRef, offset: usize) -> Result<Vec<NaiveDate>, LoadError> {
    if let DataType::Date32 = col.data_type() {
        missing(col.as_ref(), COL_DATE, offset)?;
        return col
            .as_primitive::<Date32Type>()
            .values()
            .iter()
            .enumerate()
            .map(|(i, &days)| {
                date32_to_datetime(days)
                    .map(|dt| dt.date())
                    .ok_or_else(|| LoadError::InvalidDate {
                        row: offset + i,
                        value: days.to_string(),
                    })
            })
            .collect();
    }

    let text = text_column(col, COL_DATE, offset)
        .map_err(|e| match e {
            LoadError::ColumnType { column, found, .. } => LoadError::ColumnType {
                column,
                found,
                expected: "Utf8 or Date32",
            },
            other => other,
        })?;
    text.iter()
        .enumerate()
        .map(|(i, v)| parse_launch_date(offset + i, v))
        .collect()
}

fn number_column(col: &ArrayRef, column: &str, offset: usize) -> Result<Vec<f64>, LoadError> {
    missing(col.as_ref(), column, offset)?;
    let values: Vec<f64> = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().values().to_vec(),
        DataType::Float32 => col
            .as_primitive::<Float32Type>()
            .values()
            .iter()
            .map(|&v| v as f64)
            .collect(),
        DataType::Int64 => col
            .as_primitive::<Int64Type>()
            .values()
            .iter()
            .map(|&v| v as f64)
            .collect(),
        DataType::Int32 => col
            .as_primitive::<Int32Type>()
            .values()
            .iter()
            .map(|&v| v as f64)
            .collect(),
        _ => return Err(wrong_type(column, col.as_ref(), "Float64, Float32, Int64 or Int32")),
    };
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| finite_value(offset + i, column, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Date,Target,Path,LC3,Avinf,TOF\n";

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn loads_csv_table() {
        let file = temp_file(
            ".csv",
            &format!(
                "{HEADER}03/14/2031,Uranus,EJU,21.5,11.2,9.5\n\
                 1/2/2030,Uranus,EEJU,30,12.0,10.25\n"
            ),
        );
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        let first = &ds.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2031, 3, 14).unwrap());
        assert_eq!(first.target, "Uranus");
        assert_eq!(first.path, "EJU");
        assert_eq!(first.launch_c3, 21.5);
        assert_eq!(first.arrival_vinf, 11.2);
        assert_eq!(first.time_of_flight, 9.5);
        assert_eq!(ds.records()[1].date, NaiveDate::from_ymd_opt(2030, 1, 2).unwrap());
    }

    #[test]
    fn extra_columns_and_order_are_ignored() {
        let file = temp_file(
            ".csv",
            "TOF,Note,Avinf,LC3,Path,Target,Date\n9.5,x,11.2,21.5,EJU,Uranus,03/14/2031\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records()[0].launch_c3, 21.5);
        assert_eq!(ds.records()[0].path, "EJU");
    }

    #[test]
    fn iso_date_is_a_fatal_error() {
        let file = temp_file(
            ".csv",
            &format!(
                "{HEADER}03/14/2031,Uranus,EJU,21.5,11.2,9.5\n\
                 2031-03-15,Uranus,EJU,21.5,11.2,9.5\n"
            ),
        );
        match load_file(file.path()) {
            Err(LoadError::InvalidDate { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "2031-03-15");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn short_year_and_padded_dates_are_fatal() {
        for bad in ["03/14/31", " 03/14/2031", "03/14/2031 ", "03/14/+2031"] {
            let file = temp_file(".csv", &format!("{HEADER}{bad},Uranus,EJU,21.5,11.2,9.5\n"));
            match load_file(file.path()) {
                Err(LoadError::InvalidDate { row, value }) => {
                    assert_eq!(row, 0);
                    assert_eq!(value, bad);
                }
                other => panic!("expected InvalidDate for {bad:?}, got {other:?}"),
            }
        }
        assert!(parse_launch_date(0, "1/2/2030").is_ok());
    }

    #[test]
    fn nan_cell_is_a_missing_value() {
        let file = temp_file(".csv", &format!("{HEADER}03/14/2031,Uranus,EJU,NaN,11.2,9.5\n"));
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingValue { row: 0, ref column }) if column == "LC3"
        ));

        let file = temp_file(".csv", &format!("{HEADER}03/14/2031,Uranus,EJU,21.5,inf,9.5\n"));
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidValue { row: 0, ref column, .. }) if column == "Avinf"
        ));
    }

    #[test]
    fn missing_column_is_reported() {
        let file = temp_file(".csv", "Date,Target,Path,LC3,Avinf\n03/14/2031,Uranus,EJU,1,2\n");
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingColumn(c)) if c == "TOF"
        ));
    }

    #[test]
    fn empty_numeric_field_is_rejected() {
        let file = temp_file(".csv", &format!("{HEADER}03/14/2031,Uranus,EJU,,11.2,9.5\n"));
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingValue { row: 0, ref column }) if column == "LC3"
        ));
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        let file = temp_file(".csv", &format!("{HEADER}03/14/2031,Uranus,EJU,fast,11.2,9.5\n"));
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_file(Path::new("/nonexistent/uranus-temp.csv"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn unsupported_extension() {
        let file = temp_file(".xlsx", "");
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_json_records() {
        let file = temp_file(
            ".json",
            r#"[{"Date": "03/14/2031", "Target": "Uranus", "Path": "EJU",
                 "LC3": 21.5, "Avinf": "11.2", "TOF": 9}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].arrival_vinf, 11.2);
        assert_eq!(ds.records()[0].time_of_flight, 9.0);
    }

    #[test]
    fn json_null_is_missing_value() {
        let file = temp_file(
            ".json",
            r#"[{"Date": "03/14/2031", "Target": null, "Path": "EJU",
                 "LC3": 21.5, "Avinf": 11.2, "TOF": 9}]"#,
        );
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingValue { row: 0, .. })
        ));
    }

    fn write_parquet(dates: ArrayRef) -> NamedTempFile {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", dates.data_type().clone(), true),
            Field::new("Target", DataType::Utf8, false),
            Field::new("Path", DataType::Utf8, false),
            Field::new("LC3", DataType::Float64, false),
            Field::new("Avinf", DataType::Float64, false),
            Field::new("TOF", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                dates,
                Arc::new(StringArray::from(vec!["Uranus", "Uranus"])),
                Arc::new(StringArray::from(vec!["EJU", "EEJU"])),
                Arc::new(Float64Array::from(vec![21.5, 30.0])),
                Arc::new(Float64Array::from(vec![11.2, 12.0])),
                Arc::new(Float64Array::from(vec![9.5, 10.0])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn loads_parquet_with_text_dates() {
        let file = write_parquet(Arc::new(StringArray::from(vec!["03/14/2031", "01/02/2030"])));
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.paths(), ["EJU", "EEJU"]);
        assert_eq!(ds.records()[1].date, NaiveDate::from_ymd_opt(2030, 1, 2).unwrap());
    }

    #[test]
    fn loads_parquet_with_date32() {
        // 2031-03-14 is day 22352 since the epoch.
        let file = write_parquet(Arc::new(Date32Array::from(vec![22352, 0])));
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records()[0].date, NaiveDate::from_ymd_opt(2031, 3, 14).unwrap());
        assert_eq!(ds.records()[1].date, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn parquet_text_dates_are_strict() {
        let file = write_parquet(Arc::new(StringArray::from(vec!["03/14/2031", "2030-01-02"])));
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::InvalidDate { row: 1, .. })
        ));
    }

    #[test]
    fn parquet_nan_is_missing_value() {
        let col: ArrayRef = Arc::new(Float64Array::from(vec![1.0, f64::NAN]));
        assert!(matches!(
            number_column(&col, "TOF", 10),
            Err(LoadError::MissingValue { row: 11, ref column }) if column == "TOF"
        ));
    }

    #[test]
    fn parquet_null_date_is_missing_value() {
        let file = write_parquet(Arc::new(StringArray::from(vec![Some("03/14/2031"), None])));
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::MissingValue { row: 1, .. })
        ));
    }
}
