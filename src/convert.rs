//! The sheet-to-table conversion run.
//!
//! [`convert()`] prunes the grid, infers the schema, derives the table name,
//! then issues `drop table if exists`, `create table` and one insert per data
//! row against the sink before committing. Everything runs in one sink
//! transaction; any failure rolls it back and is returned to the caller.

use log::{debug, error, info};
use serde::Serialize;

use crate::{
    ddl::{create_table_sql, drop_table_sql, table_identifier},
    error::ConvertError,
    grid::{Grid, PruneSummary},
    loader::load_rows,
    resolver::NameResolver,
    schema::{InferOptions, Schema, infer_schema},
    sink::Sink,
};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Table name to use instead of the sheet title; still slugified.
    pub table_name: Option<String>,
    pub infer: InferOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub table: String,
    pub schema: Schema,
    pub rows_inserted: usize,
    pub prune: PruneSummary,
}

/// Everything up to the first SQL statement: pruning, inference and naming.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    pub table: String,
    pub schema: Schema,
    pub prune: PruneSummary,
}

impl ConversionPlan {
    pub fn drop_sql(&self) -> String {
        drop_table_sql(&self.table)
    }

    pub fn create_sql(&self) -> String {
        create_table_sql(&self.schema, &self.table)
    }
}

/// Prunes `grid` in place and infers its schema without touching a sink.
pub fn plan<R>(
    grid: &mut Grid,
    resolver: &mut R,
    options: &ConvertOptions,
) -> Result<ConversionPlan, ConvertError>
where
    R: NameResolver + ?Sized,
{
    let prune = grid.prune();
    debug!(
        "Pruned {} empty row(s) and {} empty column(s); {} row(s) x {} column(s) remain",
        prune.rows_removed,
        prune.columns_removed,
        grid.max_row(),
        grid.max_column()
    );
    if grid.max_column() == 0 {
        return Err(ConvertError::EmptySheet {
            title: grid.title().to_string(),
        });
    }
    let schema = infer_schema(grid, resolver, &options.infer)?;
    let title = options.table_name.as_deref().unwrap_or(grid.title());
    let table = table_identifier(title)?;
    Ok(ConversionPlan {
        table,
        schema,
        prune,
    })
}

pub fn convert<S, R>(
    mut grid: Grid,
    sink: &mut S,
    resolver: &mut R,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError>
where
    S: Sink + ?Sized,
    R: NameResolver + ?Sized,
{
    let plan = plan(&mut grid, resolver, options)?;

    sink.begin()?;
    match write_table(sink, &grid, &plan) {
        Ok(rows_inserted) => {
            sink.commit()?;
            info!(
                "Wrote {} row(s) across {} column(s) to table \"{}\"",
                rows_inserted,
                plan.schema.len(),
                plan.table
            );
            Ok(ConversionReport {
                table: plan.table,
                schema: plan.schema,
                rows_inserted,
                prune: plan.prune,
            })
        }
        Err(err) => {
            if let Err(rollback_err) = sink.rollback() {
                error!("Rolling back after failure also failed: {rollback_err}");
            }
            Err(err)
        }
    }
}

fn write_table<S>(sink: &mut S, grid: &Grid, plan: &ConversionPlan) -> Result<usize, ConvertError>
where
    S: Sink + ?Sized,
{
    sink.execute(&plan.drop_sql())?;
    sink.execute(&plan.create_sql())?;
    info!("Created table \"{}\"", plan.table);
    load_rows(sink, grid, &plan.table, plan.schema.len())
}
