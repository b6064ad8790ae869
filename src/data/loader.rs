use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::error::{DataError, Result};
use super::model::{normalize_name, Cell, Column, ColumnType, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – comma-delimited, header row (the survey export format)
/// * `.tsv` – tab-delimited, header row
/// * `.json` – records-oriented array, `df.to_json(orient='records')` shape
///
/// Headers are normalized on load (see [`normalize_name`]) and column types
/// are inferred: a column is numeric when every non-blank field parses as a
/// number and at least one does.
pub fn load_file(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(DataError::SourceNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_delimited(path, b','),
        "tsv" => load_delimited(path, b'\t'),
        "json" => load_json(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_name)
        .collect();

    // Row-major field grid; typing is decided once all rows are in.
    let mut grid: Vec<Vec<String>> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        if record.len() != headers.len() {
            return Err(DataError::MalformedRecord {
                record: i as u64 + 1,
                reason: format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    record.len()
                ),
            });
        }
        grid.push(record.iter().map(str::to_string).collect());
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| infer_column(name, grid.iter().map(|row| row[idx].as_str())))
        .collect();

    let table = Table::from_columns(columns)?;
    log::debug!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn csv_error(e: csv::Error) -> DataError {
    let record = e.position().map_or(0, |p| p.record());
    DataError::MalformedRecord {
        record,
        reason: e.to_string(),
    }
}

/// Decide a column's type from its raw fields and build its cells.
fn infer_column<'a>(name: String, fields: impl Iterator<Item = &'a str> + Clone) -> Column {
    let mut any_value = false;
    let mut all_numeric = true;
    for field in fields.clone() {
        if field.is_empty() {
            continue;
        }
        any_value = true;
        if field.parse::<f64>().is_err() {
            all_numeric = false;
            break;
        }
    }

    let numeric = any_value && all_numeric;
    let cells = fields
        .map(|field| {
            if field.is_empty() {
                Cell::Null
            } else if numeric {
                // parse cannot fail here, all fields were vetted above
                Cell::Number(field.parse().unwrap_or(f64::NAN))
            } else {
                Cell::Text(field.to_string())
            }
        })
        .collect();

    Column {
        name,
        ty: if numeric {
            ColumnType::Numeric
        } else {
            ColumnType::Text
        },
        cells,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Opening Hours": "8-12 hours", "Staff per Shift": 4, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::MalformedRecord {
        record: 0,
        reason: format!("reading {}: {e}", path.display()),
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| DataError::MalformedRecord {
        record: 0,
        reason: format!("parsing JSON: {e}"),
    })?;

    let records = root.as_array().ok_or_else(|| DataError::MalformedRecord {
        record: 0,
        reason: "expected top-level JSON array".to_string(),
    })?;

    // Union of keys across records; cells default to Null where absent.
    let mut names: Vec<String> = Vec::new();
    let mut cells_by_name: BTreeMap<String, Vec<Cell>> = BTreeMap::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataError::MalformedRecord {
            record: i as u64 + 1,
            reason: "row is not a JSON object".to_string(),
        })?;

        for (key, val) in obj {
            let name = normalize_name(key);
            if !cells_by_name.contains_key(&name) {
                names.push(name.clone());
                // back-fill rows seen before this key appeared
                cells_by_name.insert(name.clone(), vec![Cell::Null; i]);
            }
            let col = cells_by_name.get_mut(&name).unwrap();
            col.push(json_to_cell(val));
        }

        // pad columns absent from this record
        for cells in cells_by_name.values_mut() {
            if cells.len() == i {
                cells.push(Cell::Null);
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells = cells_by_name.remove(&name).unwrap_or_default();
            let numeric = cells.iter().any(|c| matches!(c, Cell::Number(_)))
                && cells.iter().all(|c| !matches!(c, Cell::Text(_)));
            Column {
                name,
                ty: if numeric {
                    ColumnType::Numeric
                } else {
                    ColumnType::Text
                },
                cells,
            }
        })
        .collect();

    Table::from_columns(columns)
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Null,
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        JsonValue::String(s) if s.trim().is_empty() => Cell::Null,
        JsonValue::String(s) => Cell::Text(s.trim().to_string()),
        JsonValue::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// TableCache – load-once snapshots, explicit invalidation
// ---------------------------------------------------------------------------

/// Caller-owned cache of loaded tables, keyed by canonical path.  Each
/// distinct path is read at most once; `reload` forces a fresh read after
/// the underlying file changed.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: BTreeMap<PathBuf, Arc<Table>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Table>> {
        let key = canonical_key(path);
        if let Some(table) = self.tables.get(&key) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(path)?);
        log::info!(
            "cached {} ({} rows, {} columns)",
            path.display(),
            table.len(),
            table.columns().len()
        );
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached snapshot for `path`, if any.
    pub fn invalidate(&mut self, path: &Path) {
        self.tables.remove(&canonical_key(path));
    }

    /// Re-read `path` from disk, replacing the cached snapshot.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<Table>> {
        self.invalidate(path);
        self.get_or_load(path)
    }
}

fn canonical_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_headers_are_normalized_and_types_inferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "survey.csv",
            "Staff per Shift,Opening Hours,Pre-Consumer Waste %\n\
             2,8-12 hours,3.5\n\
             4,12-16 hours,\n\
             6,8-12 hours,1.0\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["Staff_per_Shift", "Opening_Hours", "PreConsumer_Waste_"]
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("Staff_per_Shift").unwrap().ty, ColumnType::Numeric);
        assert_eq!(table.column("Opening_Hours").unwrap().ty, ColumnType::Text);

        let waste = table.column("PreConsumer_Waste_").unwrap();
        assert_eq!(waste.ty, ColumnType::Numeric);
        assert_eq!(waste.cells[1], Cell::Null);
        assert_eq!(waste.non_null_count(), 2);
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let err = load_file(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, DataError::SourceNotFound(_)));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "survey.xlsx", "not really");
        assert!(matches!(
            load_file(&path).unwrap_err(),
            DataError::UnsupportedFormat(ext) if ext == "xlsx"
        ));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "a,b\n1,2\n3\n");
        assert!(matches!(
            load_file(&path).unwrap_err(),
            DataError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn json_records_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "survey.json",
            r#"[
                {"Daily Customers": 120, "Sales Tracking": "POS system"},
                {"Daily Customers": 80, "Sales Tracking": ""},
                {"Daily Customers": null, "Sales Tracking": "Manual register"}
            ]"#,
        );
        let table = load_file(&path).unwrap();
        let customers = table.column("Daily_Customers").unwrap();
        assert_eq!(customers.ty, ColumnType::Numeric);
        assert_eq!(customers.numeric_values(), vec![120.0, 80.0]);
        let tracking = table.column("Sales_Tracking").unwrap();
        assert_eq!(tracking.cells[1], Cell::Null);
    }

    #[test]
    fn cache_returns_same_snapshot_without_rereading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "survey.csv", "a\n1\n");

        let mut cache = TableCache::new();
        let first = cache.get_or_load(&path).unwrap();

        // Overwrite the file; the cached snapshot must survive.
        write_file(&dir, "survey.csv", "a\n1\n2\n3\n");
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);

        // Reload observes the change.
        let third = cache.reload(&path).unwrap();
        assert_eq!(third.len(), 3);
    }
}
