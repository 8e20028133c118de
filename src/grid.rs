//! In-memory worksheet grid and empty row/column pruning.
//!
//! A [`Grid`] is the rectangular block of [`CellValue`]s read from one sheet,
//! addressed with 1-based `(row, column)` coordinates the way spreadsheets
//! number them. Row 1 is always the header row.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Integer,
    Real,
    Text,
    Date,
    DateTime,
    Time,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl CellValue {
    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Empty => CellKind::Empty,
            CellValue::Integer(_) => CellKind::Integer,
            CellValue::Real(_) => CellKind::Real,
            CellValue::Text(_) => CellKind::Text,
            CellValue::Date(_) => CellKind::Date,
            CellValue::DateTime(_) => CellKind::DateTime,
            CellValue::Time(_) => CellKind::Time,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Renders the value the way it is stored as SQLite text.
    pub fn as_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Real(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            CellValue::Time(t) => t.format("%H:%M:%S%.f").to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, "None"),
            CellValue::Text(s) => write!(f, "{s:?}"),
            other => write!(f, "{}", other.as_display()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Real(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(value: NaiveTime) -> Self {
        CellValue::Time(value)
    }
}

/// Counts of what [`Grid::prune()`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneSummary {
    pub rows_removed: usize,
    pub columns_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    title: String,
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Builds a grid from row-major cells, padding short rows with
    /// [`CellValue::Empty`] so every row spans the widest one.
    pub fn new(title: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self {
            title: title.into(),
            rows,
            width,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    pub fn max_column(&self) -> usize {
        if self.rows.is_empty() { 0 } else { self.width }
    }

    /// Returns the cell at the 1-based position, or `None` outside the grid.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        if row == 0 || column == 0 {
            return None;
        }
        self.rows.get(row - 1)?.get(column - 1)
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        if row == 0 {
            return None;
        }
        self.rows.get(row - 1).map(Vec::as_slice)
    }

    pub fn header(&self) -> Option<&[CellValue]> {
        self.row(1)
    }

    /// Rows 2 through `max_row`, top to bottom.
    pub fn data_rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = &CellValue> {
        self.rows
            .iter()
            .filter_map(move |row| column.checked_sub(1).and_then(|idx| row.get(idx)))
    }

    /// Removes the 1-based row; later rows move up by one.
    pub fn delete_row(&mut self, row: usize) -> bool {
        if row == 0 || row > self.rows.len() {
            return false;
        }
        self.rows.remove(row - 1);
        true
    }

    /// Removes the 1-based column; later columns move left by one.
    pub fn delete_column(&mut self, column: usize) -> bool {
        if column == 0 || column > self.width {
            return false;
        }
        for row in &mut self.rows {
            row.remove(column - 1);
        }
        self.width -= 1;
        true
    }

    /// Drops data rows and then columns whose cells are all empty.
    ///
    /// The header row is never dropped, but header cells do count when
    /// deciding whether a column is empty. Columns are judged on the grid
    /// left after row pruning.
    pub fn prune(&mut self) -> PruneSummary {
        let before_rows = self.rows.len();
        let mut rows = std::mem::take(&mut self.rows).into_iter();
        let mut kept: Vec<Vec<CellValue>> = rows.next().into_iter().collect();
        kept.extend(rows.filter(|row| !row.iter().all(CellValue::is_empty)));
        let rows_removed = before_rows - kept.len();

        let keep_columns = (0..self.width)
            .filter(|&idx| !kept.iter().all(|row| row[idx].is_empty()))
            .collect::<Vec<_>>();
        let columns_removed = self.width - keep_columns.len();
        if columns_removed > 0 {
            kept = kept
                .into_iter()
                .map(|mut row| {
                    keep_columns
                        .iter()
                        .map(|&idx| std::mem::take(&mut row[idx]))
                        .collect()
                })
                .collect();
            self.width = keep_columns.len();
        }
        self.rows = kept;

        PruneSummary {
            rows_removed,
            columns_removed,
        }
    }
}

/// Converts a 1-based column index into its spreadsheet letter (`1` → `A`,
/// `27` → `AA`).
pub fn column_letter(column: usize) -> String {
    let mut remaining = column;
    let mut letters = Vec::new();
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}
