#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use rusqlite::Error as SqliteError;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use sheet_sqlite::error::SinkError;
use sheet_sqlite::grid::{CellValue, Grid};
use sheet_sqlite::sink::Sink;
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Writes a two-sheet workbook. `Orders` (the first sheet) starts at B1,
/// has a blank row 3 and date-formatted cells in column C; `Notes` holds
/// a single text column at A1.
pub fn write_orders_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let orders = workbook.add_worksheet();
    orders.set_name("Orders").expect("name orders sheet");
    orders.write_string(0, 1, "id").expect("B1");
    orders.write_string(0, 2, "placed").expect("C1");
    orders.write_string(0, 3, "note").expect("D1");
    orders.write_number(1, 1, 1.0).expect("B2");
    orders
        .write_datetime_with_format(
            1,
            2,
            &ExcelDateTime::from_ymd(2024, 5, 6).expect("valid date"),
            &date_format,
        )
        .expect("C2");
    orders.write_string(1, 3, "first").expect("D2");
    orders.write_number(3, 1, 2.0).expect("B4");
    orders
        .write_datetime_with_format(
            3,
            2,
            &ExcelDateTime::from_ymd(2024, 5, 7).expect("valid date"),
            &date_format,
        )
        .expect("C4");
    orders.write_string(3, 3, "second").expect("D4");

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").expect("name notes sheet");
    notes.write_string(0, 0, "memo").expect("A1");
    notes.write_string(1, 0, "hello").expect("A2");

    workbook.save(path).expect("save workbook");
}

pub fn text(value: &str) -> CellValue {
    CellValue::from(value)
}

pub fn grid(title: &str, rows: Vec<Vec<CellValue>>) -> Grid {
    Grid::new(title, rows)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Begin,
    Execute(String),
    Insert(String, Vec<CellValue>),
    Commit,
    Rollback,
}

/// Sink double that records every call and can reject a chosen insert.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<Recorded>,
    /// 1-based index of the insert to reject.
    pub fail_insert: Option<usize>,
    inserts: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(insert: usize) -> Self {
        Self {
            fail_insert: Some(insert),
            ..Self::default()
        }
    }

    pub fn statements(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Recorded::Execute(sql) => Some(sql.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn inserted_rows(&self) -> Vec<&[CellValue]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Recorded::Insert(_, values) => Some(values.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl Sink for RecordingSink {
    fn begin(&mut self) -> Result<(), SinkError> {
        self.calls.push(Recorded::Begin);
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<(), SinkError> {
        self.calls.push(Recorded::Execute(sql.to_string()));
        Ok(())
    }

    fn insert(&mut self, sql: &str, values: &[CellValue]) -> Result<(), SinkError> {
        self.inserts += 1;
        if self.fail_insert == Some(self.inserts) {
            return Err(SinkError::Statement {
                sql: sql.to_string(),
                source: SqliteError::InvalidQuery,
            });
        }
        self.calls
            .push(Recorded::Insert(sql.to_string(), values.to_vec()));
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        self.calls.push(Recorded::Commit);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SinkError> {
        self.calls.push(Recorded::Rollback);
        Ok(())
    }
}

/// Wraps a real sink and rejects the chosen insert, so rollback can be
/// observed against an actual database.
pub struct FailingSink<S> {
    pub inner: S,
    fail_insert: usize,
    inserts: usize,
}

impl<S: Sink> FailingSink<S> {
    pub fn new(inner: S, fail_insert: usize) -> Self {
        Self {
            inner,
            fail_insert,
            inserts: 0,
        }
    }
}

impl<S: Sink> Sink for FailingSink<S> {
    fn begin(&mut self) -> Result<(), SinkError> {
        self.inner.begin()
    }

    fn execute(&mut self, sql: &str) -> Result<(), SinkError> {
        self.inner.execute(sql)
    }

    fn insert(&mut self, sql: &str, values: &[CellValue]) -> Result<(), SinkError> {
        self.inserts += 1;
        if self.inserts == self.fail_insert {
            return Err(SinkError::Statement {
                sql: sql.to_string(),
                source: SqliteError::InvalidQuery,
            });
        }
        self.inner.insert(sql, values)
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        self.inner.commit()
    }

    fn rollback(&mut self) -> Result<(), SinkError> {
        self.inner.rollback()
    }
}
