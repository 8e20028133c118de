//! Relational sinks that receive the generated DDL and row inserts.
//!
//! The conversion engine only talks to the [`Sink`] trait. [`SqliteSink`]
//! is the production implementation backed by `rusqlite`; it runs the whole
//! conversion inside a single transaction so a failed run leaves the
//! database untouched.

use std::path::Path;

use log::debug;
use rusqlite::{
    Connection, params_from_iter,
    types::{ToSql, ToSqlOutput, Value, ValueRef},
};

use crate::{error::SinkError, grid::CellValue};

pub trait Sink {
    fn begin(&mut self) -> Result<(), SinkError>;
    fn execute(&mut self, sql: &str) -> Result<(), SinkError>;
    fn insert(&mut self, sql: &str, values: &[CellValue]) -> Result<(), SinkError>;
    fn commit(&mut self) -> Result<(), SinkError>;
    fn rollback(&mut self) -> Result<(), SinkError>;
}

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let output = match self {
            CellValue::Empty => ToSqlOutput::Owned(Value::Null),
            CellValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            CellValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            CellValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            other => ToSqlOutput::Owned(Value::Text(other.as_display())),
        };
        Ok(output)
    }
}

pub struct SqliteSink {
    conn: Connection,
    in_transaction: bool,
}

impl SqliteSink {
    /// Opens or creates the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let conn = Connection::open(path).map_err(|source| SinkError::Unavailable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory().map_err(|source| SinkError::Unavailable {
            path: ":memory:".to_string(),
            source,
        })?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            in_transaction: false,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn transaction_step(&mut self, action: &'static str) -> Result<(), SinkError> {
        debug!("{action}");
        self.conn
            .execute_batch(action)
            .map_err(|source| SinkError::Transaction { action, source })
    }
}

impl Sink for SqliteSink {
    fn begin(&mut self) -> Result<(), SinkError> {
        if !self.in_transaction {
            self.transaction_step("begin")?;
            self.in_transaction = true;
        }
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<(), SinkError> {
        debug!("{sql}");
        self.conn
            .execute(sql, [])
            .map(|_| ())
            .map_err(|source| SinkError::Statement {
                sql: sql.to_string(),
                source,
            })
    }

    fn insert(&mut self, sql: &str, values: &[CellValue]) -> Result<(), SinkError> {
        let statement_error = |source| SinkError::Statement {
            sql: sql.to_string(),
            source,
        };
        let mut statement = self.conn.prepare_cached(sql).map_err(statement_error)?;
        statement
            .execute(params_from_iter(values.iter()))
            .map(|_| ())
            .map_err(statement_error)
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        if self.in_transaction {
            self.transaction_step("commit")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SinkError> {
        if self.in_transaction {
            self.in_transaction = false;
            self.transaction_step("rollback")?;
        }
        Ok(())
    }
}
