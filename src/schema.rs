//! Column schema inference for a pruned worksheet grid.
//!
//! [`infer_schema()`] walks the header row left to right, turns each header
//! into a sanitized column name, asks a [`NameResolver`] to settle
//! duplicates, and types each column from its cell in the first data row.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::ConvertError,
    grid::{CellValue, Grid, column_letter},
    resolver::NameResolver,
    slug::slugify,
    types::SqlType,
};

pub const DEFAULT_MAX_RENAME_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: SqlType,
}

/// Ordered column definitions; order matches the sheet's columns.
///
/// Only [`infer_schema()`] builds one, so keys are always unique and
/// sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub(crate) columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating schema file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing schema JSON")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InferOptions {
    /// Resolver calls allowed per column before giving up; 0 means no limit.
    pub max_rename_attempts: usize,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            max_rename_attempts: DEFAULT_MAX_RENAME_ATTEMPTS,
        }
    }
}

pub fn infer_schema<R>(
    grid: &Grid,
    resolver: &mut R,
    options: &InferOptions,
) -> Result<Schema, ConvertError>
where
    R: NameResolver + ?Sized,
{
    let mut schema = Schema::default();
    for column in 1..=grid.max_column() {
        let label = column_letter(column);
        let sql_type = sample_type(grid, column).ok_or_else(|| {
            ConvertError::UnresolvableSampleType {
                column,
                label: label.clone(),
            }
        })?;
        let proposed = slugify(&header_name(grid.cell(1, column), column));
        let name = resolve_collision(&schema, proposed, &label, resolver, options)?;
        debug!("Column {label} -> \"{name}\" {sql_type}");
        schema.columns.push(ColumnDef { name, sql_type });
    }
    Ok(schema)
}

/// Type of the column's cell in row 2, the first data row.
pub fn sample_type(grid: &Grid, column: usize) -> Option<SqlType> {
    grid.cell(2, column).and_then(SqlType::for_value)
}

fn header_name(cell: Option<&CellValue>, column: usize) -> String {
    match cell {
        None | Some(CellValue::Empty) => format!("column{column}"),
        Some(CellValue::Text(text)) if text.is_empty() => format!("column{column}"),
        Some(CellValue::Text(text)) => text.clone(),
        Some(other) => other.as_display(),
    }
}

fn resolve_collision<R>(
    schema: &Schema,
    mut name: String,
    label: &str,
    resolver: &mut R,
    options: &InferOptions,
) -> Result<String, ConvertError>
where
    R: NameResolver + ?Sized,
{
    let mut attempts = 0usize;
    // Answers are sanitized like headers before they are checked again.
    while name.is_empty() || schema.contains(&name) {
        if options.max_rename_attempts > 0 && attempts >= options.max_rename_attempts {
            return Err(ConvertError::UnresolvedNameCollision {
                name,
                label: label.to_string(),
                attempts,
            });
        }
        warn!("Column name '{name}' of column {label} already exists");
        let answer = resolver
            .resolve(&name, label)
            .map_err(ConvertError::Resolver)?;
        name = slugify(&answer);
        attempts += 1;
        debug!("Resolver proposed '{name}' for column {label}");
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{FailResolver, SuffixResolver};
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn blank_headers_get_placeholder_names() {
        let grid = Grid::new(
            "s",
            vec![
                vec![CellValue::Empty, text(""), text("Total Amount")],
                vec![CellValue::Integer(1), text("x"), CellValue::Real(2.5)],
            ],
        );
        let schema = infer_schema(&grid, &mut FailResolver, &InferOptions::default()).unwrap();
        let names = schema.columns().iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["column1", "column2", "Total_Amount"]);
        let types = schema.columns().iter().map(|c| c.sql_type).collect::<Vec<_>>();
        assert_eq!(types, vec![SqlType::Int, SqlType::Text, SqlType::Real]);
    }

    #[test]
    fn non_text_headers_use_display_form() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let grid = Grid::new(
            "s",
            vec![
                vec![CellValue::Integer(2024), CellValue::Date(date)],
                vec![CellValue::Integer(1), CellValue::Integer(2)],
            ],
        );
        let schema = infer_schema(&grid, &mut FailResolver, &InferOptions::default()).unwrap();
        assert_eq!(schema.columns()[0].name, "2024");
        assert_eq!(schema.columns()[1].name, "2024-01-31");
    }

    #[test]
    fn duplicate_names_go_through_the_resolver() {
        let grid = Grid::new(
            "s",
            vec![
                vec![text("id"), text("id"), text("id")],
                vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)],
            ],
        );
        let schema =
            infer_schema(&grid, &mut SuffixResolver::new(), &InferOptions::default()).unwrap();
        let names = schema.columns().iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["id", "id_2", "id_3"]);
    }

    #[test]
    fn resolver_is_asked_again_until_unique() {
        let grid = Grid::new(
            "s",
            vec![
                vec![text("a"), text("b"), text("a")],
                vec![text("1"), text("2"), text("3")],
            ],
        );
        let mut answers = vec!["c", "", "b"].into_iter();
        let mut calls = Vec::new();
        let mut resolver = |proposed: &str, label: &str| {
            calls.push((proposed.to_string(), label.to_string()));
            answers.next().unwrap_or("c").to_string()
        };
        let schema = infer_schema(&grid, &mut resolver, &InferOptions::default()).unwrap();
        assert_eq!(schema.columns()[2].name, "c");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("a".to_string(), "C".to_string()));
    }

    #[test]
    fn empty_and_colliding_answers_are_retried() {
        let grid = Grid::new(
            "s",
            vec![
                vec![text("a"), text("b"), text("a")],
                vec![text("1"), text("2"), text("3")],
            ],
        );
        let mut answers = vec!["", "b", "a", "d"].into_iter();
        let mut resolver = |_: &str, _: &str| answers.next().unwrap_or_default().to_string();
        let schema = infer_schema(&grid, &mut resolver, &InferOptions::default()).unwrap();
        assert_eq!(schema.columns()[2].name, "d");
    }

    #[test]
    fn resolver_answers_are_sanitized() {
        let grid = Grid::new(
            "s",
            vec![vec![text("a"), text("a")], vec![text("1"), text("2")]],
        );
        let mut resolver = |_: &str, _: &str| "my col!#".to_string();
        let schema = infer_schema(&grid, &mut resolver, &InferOptions::default()).unwrap();
        assert_eq!(schema.columns()[1].name, "my_col");
    }

    #[test]
    fn answer_that_sanitizes_to_nothing_is_asked_again() {
        let grid = Grid::new(
            "s",
            vec![vec![text("a"), text("a")], vec![text("1"), text("2")]],
        );
        let mut answers = vec!["#!?", " a ", "b c"].into_iter();
        let mut calls = 0;
        let mut resolver = |_: &str, _: &str| {
            calls += 1;
            answers.next().unwrap_or("z").to_string()
        };
        let schema = infer_schema(&grid, &mut resolver, &InferOptions::default()).unwrap();
        assert_eq!(schema.columns()[1].name, "b_c");
        assert_eq!(calls, 3);
    }

    #[test]
    fn bounded_retries_surface_unresolved_collision() {
        let grid = Grid::new(
            "s",
            vec![vec![text("a"), text("a")], vec![text("1"), text("2")]],
        );
        let mut stubborn = |proposed: &str, _: &str| proposed.to_string();
        let options = InferOptions {
            max_rename_attempts: 3,
        };
        let err = infer_schema(&grid, &mut stubborn, &options).unwrap_err();
        match err {
            ConvertError::UnresolvedNameCollision {
                name,
                label,
                attempts,
            } => {
                assert_eq!(name, "a");
                assert_eq!(label, "B");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_sample_is_fatal() {
        let grid = Grid::new(
            "s",
            vec![
                vec![text("a"), text("b")],
                vec![CellValue::Integer(1), CellValue::Empty],
                vec![CellValue::Integer(2), CellValue::Integer(5)],
            ],
        );
        let err = infer_schema(&grid, &mut FailResolver, &InferOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnresolvableSampleType { column: 2, .. }
        ));
    }

    #[test]
    fn header_only_grid_cannot_be_typed() {
        let grid = Grid::new("s", vec![vec![text("a")]]);
        let err = infer_schema(&grid, &mut FailResolver, &InferOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnresolvableSampleType { .. }));
    }

    #[test]
    fn schema_saves_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        let schema = Schema {
            columns: vec![ColumnDef {
                name: "when".to_string(),
                sql_type: SqlType::DateTime,
            }],
        };
        schema.save(&path).unwrap();
        let saved: Schema =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, schema);
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"datetime\""));
    }
}
