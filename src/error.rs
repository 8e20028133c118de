use thiserror::Error;

/// Failures raised by a [`crate::sink::Sink`].
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Unable to open database {path}: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Statement failed: {sql}: {source}")]
    Statement {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Transaction {action} failed: {source}")]
    Transaction {
        action: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

/// Terminal failures of a sheet conversion run.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Column {column} ('{label}') has no value in the first data row to infer its type from")]
    UnresolvableSampleType { column: usize, label: String },

    #[error("Column name '{name}' of column '{label}' still collides after {attempts} rename attempt(s)")]
    UnresolvedNameCollision {
        name: String,
        label: String,
        attempts: usize,
    },

    #[error("Sheet '{title}' has no columns to convert")]
    EmptySheet { title: String },

    #[error("Sheet title '{title}' does not yield a usable table name")]
    EmptyTableName { title: String },

    #[error("Schema has {schema} column(s) but the grid has {grid}")]
    ColumnCountMismatch { schema: usize, grid: usize },

    #[error("Row {row} was rejected by the database: {reason}")]
    RowRejected {
        row: usize,
        values: Vec<String>,
        #[source]
        reason: SinkError,
    },

    #[error("Resolving a column name failed: {0}")]
    Resolver(#[source] anyhow::Error),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
