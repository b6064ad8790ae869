use std::collections::BTreeMap;

use serde::Serialize;

use super::error::{DataError, Result};
use super::model::{ColumnType, Table};

// ---------------------------------------------------------------------------
// Frequency counts
// ---------------------------------------------------------------------------

/// Counts per distinct value of a column.  Values are compared by exact
/// string equality of their canonical rendering; missing cells are excluded
/// entirely.  No presentation order is imposed here.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyResult {
    pub column: String,
    pub counts: BTreeMap<String, u64>,
}

impl FrequencyResult {
    /// Sum of all counts, equal to the number of non-missing input cells.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries sorted by descending count (ties alphabetically), the order
    /// the dashboard charts use.
    pub fn by_descending_count(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

/// Count occurrences of each distinct value in `column`.
pub fn frequency(table: &Table, column: &str) -> Result<FrequencyResult> {
    let col = table.column(column)?;
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for cell in &col.cells {
        if cell.is_null() {
            continue;
        }
        *counts.entry(cell.to_string()).or_insert(0) += 1;
    }
    Ok(FrequencyResult {
        column: column.to_string(),
        counts,
    })
}

// ---------------------------------------------------------------------------
// Five-number summary
// ---------------------------------------------------------------------------

/// Min, Q1, median, Q3, max of a numeric column, each rounded to two
/// decimal places (half-to-even).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryResult {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// The column's non-missing numeric values in row order.
///
/// Fails with `NonNumericColumn` for text columns; never fails for an
/// all-missing numeric column (the caller decides whether that matters).
pub fn numeric_series(table: &Table, column: &str) -> Result<Vec<f64>> {
    let col = table.column(column)?;
    if col.ty != ColumnType::Numeric {
        return Err(DataError::NonNumericColumn(column.to_string()));
    }
    Ok(col.numeric_values())
}

/// Five-number summary with linear quantile interpolation between closest
/// ranks: for rank `h = (n-1)*p`, interpolate between the order statistics
/// at `floor(h)` and `ceil(h)`.
pub fn five_number_summary(table: &Table, column: &str) -> Result<SummaryResult> {
    let mut values = numeric_series(table, column)?;
    if values.is_empty() {
        return Err(DataError::EmptySeries(column.to_string()));
    }
    values.sort_by(f64::total_cmp);

    Ok(SummaryResult {
        min: round2(values[0]),
        q1: round2(quantile_sorted(&values, 0.25)),
        median: round2(quantile_sorted(&values, 0.5)),
        q3: round2(quantile_sorted(&values, 0.75)),
        max: round2(values[values.len() - 1]),
    })
}

/// Arithmetic mean over the non-missing values, unrounded.
pub fn mean(table: &Table, column: &str) -> Result<f64> {
    let values = numeric_series(table, column)?;
    if values.is_empty() {
        return Err(DataError::EmptySeries(column.to_string()));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
}

/// Round to 2 decimal places, ties to even.
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation over the table's numeric columns.
/// Symmetric, unit diagonal; NaN where a participating column has zero
/// variance over the rows used for that pair.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// True when fewer than 2 numeric columns were available, a valid
    /// "nothing to show" result, distinct from any error.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }
}

/// Correlate every unordered pair of numeric columns using the rows where
/// both values are present (pairwise-complete, not shared-complete).
pub fn correlation(table: &Table) -> CorrelationMatrix {
    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return CorrelationMatrix {
            columns: Vec::new(),
            values: Vec::new(),
        };
    }

    let n = numeric.len();
    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (a, b) in numeric[i].cells.iter().zip(&numeric[j].cells) {
                if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                    if !x.is_nan() && !y.is_nan() {
                        xs.push(x);
                        ys.push(y);
                    }
                }
            }
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

/// Pearson product-moment correlation; NaN for empty input or zero variance.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() {
        return f64::NAN;
    }
    let n = x.len() as f64;
    let mean_x: f64 = x.iter().sum::<f64>() / n;
    let mean_y: f64 = y.iter().sum::<f64>() / n;
    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }
    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}
