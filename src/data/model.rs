use std::fmt;

use crate::data::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Cell – a single value in a survey column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. Survey columns are either numeric or free text;
/// blank fields load as `Null` and are excluded from every statistic.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

// -- Manual Eq/Ord so cells can key ordered collections --

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Cell::*;
        fn discriminant(v: &Cell) -> u8 {
            match v {
                Null => 0,
                Number(_) => 1,
                Text(_) => 2,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Number(n) => n.to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Null => {}
        }
    }
}

/// Canonical, locale-independent rendering. Integral numbers print without
/// a fractional part so that `4` and `4.0` count as the same frequency key.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Null => write!(f, "<null>"),
        }
    }
}

impl Cell {
    /// Interpret the cell as an `f64`, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

// ---------------------------------------------------------------------------
// Column – one named series of cells
// ---------------------------------------------------------------------------

/// Declared type of a column, inferred once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Every non-missing cell parses as a number (and at least one does).
    Numeric,
    Text,
}

#[derive(Debug, Clone)]
pub struct Column {
    /// Normalized name, unique within the table.
    pub name: String,
    pub ty: ColumnType,
    pub cells: Vec<Cell>,
}

impl Column {
    /// Non-missing numeric values in row order. NaN cells count as missing.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells
            .iter()
            .filter_map(Cell::as_f64)
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Number of non-missing cells.
    pub fn non_null_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_null()).count()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An immutable in-memory table: ordered named columns of equal length.
/// Derived structures (exploded tables, counts, summaries) are always fresh
/// allocations; a loaded table is never mutated in place.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Build a table, enforcing equal column lengths and unique names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.cells.len());
        for col in &columns {
            if col.cells.len() != rows {
                return Err(DataError::MalformedRecord {
                    record: 0,
                    reason: format!(
                        "column '{}' has {} cells, expected {rows}",
                        col.name,
                        col.cells.len()
                    ),
                });
            }
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(DataError::MalformedRecord {
                    record: 0,
                    reason: format!("duplicate column name '{}'", col.name),
                });
            }
        }
        Ok(Table { columns, rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by (normalized) name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))
    }

    /// Columns whose declared type is numeric, in table order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.ty == ColumnType::Numeric)
            .collect()
    }

    /// Cell at (row, column index). Used by the raw-table renderer.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.columns.get(col).and_then(|c| c.cells.get(row))
    }
}

// ---------------------------------------------------------------------------
// Column-name normalization
// ---------------------------------------------------------------------------

/// Normalize a raw header: trim, collapse each whitespace run to a single
/// underscore, strip everything outside `[0-9A-Za-z_]`. Idempotent.
///
/// `"Pre-Consumer Waste %"` becomes `"PreConsumer_Waste_"`.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = true;
            continue;
        }
        if pending_sep {
            out.push('_');
            pending_sep = false;
        }
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_and_collapses() {
        assert_eq!(normalize_name("  Staff per   Shift "), "Staff_per_Shift");
        assert_eq!(normalize_name("Pre-Consumer Waste %"), "PreConsumer_Waste_");
        assert_eq!(normalize_name("Daily Customers"), "Daily_Customers");
        assert_eq!(normalize_name("already_clean"), "already_clean");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "Staff per Shift",
            "Pre-Consumer Waste %",
            "a  - b",
            "% leading",
            "trailing %",
            "",
            "Ünïcode  name",
        ] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn cell_display_is_canonical() {
        assert_eq!(Cell::Number(4.0).to_string(), "4");
        assert_eq!(Cell::Number(-12.0).to_string(), "-12");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Text("Lunch".into()).to_string(), "Lunch");
    }

    #[test]
    fn table_rejects_unequal_columns() {
        let cols = vec![
            Column {
                name: "a".into(),
                ty: ColumnType::Numeric,
                cells: vec![Cell::Number(1.0)],
            },
            Column {
                name: "b".into(),
                ty: ColumnType::Numeric,
                cells: vec![Cell::Number(1.0), Cell::Number(2.0)],
            },
        ];
        assert!(matches!(
            Table::from_columns(cols),
            Err(DataError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let col = Column {
            name: "a".into(),
            ty: ColumnType::Text,
            cells: vec![Cell::Null],
        };
        assert!(matches!(
            Table::from_columns(vec![col.clone(), col]),
            Err(DataError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn unknown_column_lookup_fails() {
        let table = Table::from_columns(vec![]).unwrap();
        assert!(matches!(
            table.column("Missing"),
            Err(DataError::UnknownColumn(name)) if name == "Missing"
        ));
    }
}
