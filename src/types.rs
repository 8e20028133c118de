use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::grid::{CellKind, CellValue};

/// Column type keywords written into `create table` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Date,
    DateTime,
    Time,
    Real,
    Int,
    Text,
}

impl SqlType {
    pub const ALL: [SqlType; 6] = [
        SqlType::Date,
        SqlType::DateTime,
        SqlType::Time,
        SqlType::Real,
        SqlType::Int,
        SqlType::Text,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SqlType::Date => "date",
            SqlType::DateTime => "datetime",
            SqlType::Time => "time",
            SqlType::Real => "real",
            SqlType::Int => "int",
            SqlType::Text => "text",
        }
    }

    /// Exact-kind lookup. Each cell kind maps to its own keyword, so a
    /// datetime is never reported as a plain date. Empty cells have no type.
    pub const fn for_kind(kind: CellKind) -> Option<SqlType> {
        match kind {
            CellKind::Empty => None,
            CellKind::Integer => Some(SqlType::Int),
            CellKind::Real => Some(SqlType::Real),
            CellKind::Text => Some(SqlType::Text),
            CellKind::Date => Some(SqlType::Date),
            CellKind::DateTime => Some(SqlType::DateTime),
            CellKind::Time => Some(SqlType::Time),
        }
    }

    pub fn for_value(value: &CellValue) -> Option<SqlType> {
        Self::for_kind(value.kind())
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        SqlType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == lowered)
            .ok_or_else(|| anyhow!("Unknown column type '{value}'"))
    }
}
