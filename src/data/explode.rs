use super::error::Result;
use super::model::{Cell, Column, ColumnType, Table};

// ---------------------------------------------------------------------------
// Category explosion – one row per token of a list-valued column
// ---------------------------------------------------------------------------

/// Default separator for multi-valued survey answers ("Lunch, Dinner").
pub const DEFAULT_SEPARATOR: char = ',';

/// Expand a list-valued column into one row per token.
///
/// Each cell of `column` is rendered to text, split on `separator`, and each
/// token is trimmed.  A missing cell, or a cell yielding only empty tokens,
/// contributes zero rows.  Every other column's value is duplicated across
/// the rows produced by its source row, and source-row order is preserved.
/// The input table is left untouched.
pub fn explode(table: &Table, column: &str, separator: char) -> Result<Table> {
    let source = table.column(column)?;

    // Token lists per source row.
    let tokens_per_row: Vec<Vec<String>> = source
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Null => Vec::new(),
            other => other
                .to_string()
                .split(separator)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        })
        .collect();

    let out_rows: usize = tokens_per_row.iter().map(Vec::len).sum();

    let columns = table
        .columns()
        .iter()
        .map(|col| {
            let mut cells = Vec::with_capacity(out_rows);
            if col.name == column {
                for tokens in &tokens_per_row {
                    cells.extend(tokens.iter().cloned().map(Cell::Text));
                }
                Column {
                    name: col.name.clone(),
                    ty: ColumnType::Text,
                    cells,
                }
            } else {
                for (row, tokens) in tokens_per_row.iter().enumerate() {
                    for _ in 0..tokens.len() {
                        cells.push(col.cells[row].clone());
                    }
                }
                Column {
                    name: col.name.clone(),
                    ty: col.ty,
                    cells,
                }
            }
        })
        .collect();

    Table::from_columns(columns)
}

// ---------------------------------------------------------------------------
// Prefix extraction – keep only the text before the first separator
// ---------------------------------------------------------------------------

/// Replace each cell of `column` with the trimmed text before the first
/// `separator`, leaving the rest of the table untouched.
///
/// Used for "key=value" survey answers where only the key is of interest
/// ("Fridays=Spike in sales" counts as "Fridays").  A cell without the
/// separator keeps its whole trimmed text; a missing cell, or one whose
/// prefix is empty, stays missing.  Row count is unchanged.
pub fn keep_prefix(table: &Table, column: &str, separator: char) -> Result<Table> {
    let source = table.column(column)?;

    let columns = table
        .columns()
        .iter()
        .map(|col| {
            if col.name != column {
                return col.clone();
            }
            let cells = source
                .cells
                .iter()
                .map(|cell| match cell {
                    Cell::Null => Cell::Null,
                    other => {
                        let text = other.to_string();
                        let prefix = text
                            .split(separator)
                            .next()
                            .unwrap_or("")
                            .trim()
                            .to_string();
                        if prefix.is_empty() {
                            Cell::Null
                        } else {
                            Cell::Text(prefix)
                        }
                    }
                })
                .collect();
            Column {
                name: col.name.clone(),
                ty: ColumnType::Text,
                cells,
            }
        })
        .collect();

    Table::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::DataError;

    fn two_column_table() -> Table {
        Table::from_columns(vec![
            Column {
                name: "Peak_Hours".into(),
                ty: ColumnType::Text,
                cells: vec![Cell::Text("a, b".into()), Cell::Text("c".into())],
            },
            Column {
                name: "Staff_per_Shift".into(),
                ty: ColumnType::Numeric,
                cells: vec![Cell::Number(2.0), Cell::Number(4.0)],
            },
        ])
        .unwrap()
    }

    #[test]
    fn explode_splits_and_duplicates_neighbours() {
        let table = two_column_table();
        let exploded = explode(&table, "Peak_Hours", ',').unwrap();

        assert_eq!(exploded.len(), 3);
        let col = exploded.column("Peak_Hours").unwrap();
        assert_eq!(
            col.cells,
            vec![
                Cell::Text("a".into()),
                Cell::Text("b".into()),
                Cell::Text("c".into()),
            ]
        );
        let staff = exploded.column("Staff_per_Shift").unwrap();
        assert_eq!(
            staff.cells,
            vec![Cell::Number(2.0), Cell::Number(2.0), Cell::Number(4.0)]
        );

        // input is untouched
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn missing_and_empty_cells_drop_their_rows() {
        let table = Table::from_columns(vec![Column {
            name: "Items".into(),
            ty: ColumnType::Text,
            cells: vec![
                Cell::Null,
                Cell::Text(" ,  , ".into()),
                Cell::Text("Biryani".into()),
            ],
        }])
        .unwrap();

        let exploded = explode(&table, "Items", ',').unwrap();
        assert_eq!(exploded.len(), 1);
        assert_eq!(
            exploded.column("Items").unwrap().cells,
            vec![Cell::Text("Biryani".into())]
        );
    }

    #[test]
    fn alternate_separator_is_honoured() {
        let table = Table::from_columns(vec![Column {
            name: "Day_Influence".into(),
            ty: ColumnType::Text,
            cells: vec![Cell::Text("Weekends=Higher sales".into())],
        }])
        .unwrap();

        let exploded = explode(&table, "Day_Influence", '=').unwrap();
        assert_eq!(
            exploded.column("Day_Influence").unwrap().cells,
            vec![
                Cell::Text("Weekends".into()),
                Cell::Text("Higher sales".into()),
            ]
        );
    }

    #[test]
    fn keep_prefix_drops_the_answer_half() {
        let table = Table::from_columns(vec![
            Column {
                name: "Day_Influence".into(),
                ty: ColumnType::Text,
                cells: vec![
                    Cell::Text("Fridays=Spike in sales".into()),
                    Cell::Text("Weekdays".into()),
                    Cell::Null,
                    Cell::Text(" =orphan value".into()),
                ],
            },
            Column {
                name: "Staff_per_Shift".into(),
                ty: ColumnType::Numeric,
                cells: vec![
                    Cell::Number(2.0),
                    Cell::Number(4.0),
                    Cell::Number(6.0),
                    Cell::Number(8.0),
                ],
            },
        ])
        .unwrap();

        let trimmed = keep_prefix(&table, "Day_Influence", '=').unwrap();
        assert_eq!(trimmed.len(), 4);
        assert_eq!(
            trimmed.column("Day_Influence").unwrap().cells,
            vec![
                Cell::Text("Fridays".into()),
                Cell::Text("Weekdays".into()),
                Cell::Null,
                Cell::Null,
            ]
        );
        // the neighbouring column is untouched
        assert_eq!(
            trimmed.column("Staff_per_Shift").unwrap().cells,
            table.column("Staff_per_Shift").unwrap().cells
        );
    }

    #[test]
    fn unknown_column_fails() {
        let table = two_column_table();
        assert!(matches!(
            explode(&table, "Nope", ','),
            Err(DataError::UnknownColumn(_))
        ));
    }
}
