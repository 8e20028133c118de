use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::schema::DEFAULT_MAX_RENAME_ATTEMPTS;

#[derive(Debug, Parser)]
#[command(author, version, about = "Load a spreadsheet worksheet into a SQLite table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a table from a worksheet and insert all of its rows
    Load(LoadArgs),
    /// Infer the table schema and print the DDL without touching a database
    Probe(ProbeArgs),
    /// Show the first rows of a worksheet after empty rows/columns are removed
    Preview(PreviewArgs),
}

/// How to settle two columns whose names sanitize to the same identifier.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Ask for a new name on the terminal
    Prompt,
    /// Append _2, _3, ... to the duplicate name
    Suffix,
    /// Abort the run
    Fail,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Spreadsheet to read (.xlsx, .xlsm, .xlsb, .xls, .ods, .csv, .tsv; '-' for CSV on stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Worksheet name (defaults to the first sheet)
    #[arg(short = 's', long = "sheet")]
    pub sheet: Option<String>,
    /// Delimiter for CSV/TSV input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV/TSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct NamingArgs {
    /// Replacement name for a duplicate column, as COLUMN=NAME (e.g. B=name_2)
    #[arg(long = "rename", action = clap::ArgAction::Append)]
    pub renames: Vec<String>,
    /// Maximum rename attempts per column before giving up (0 = unlimited)
    #[arg(long = "max-rename-attempts", default_value_t = DEFAULT_MAX_RENAME_ATTEMPTS)]
    pub max_rename_attempts: usize,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// SQLite database file to write (created if missing)
    #[arg(short = 'd', long = "database")]
    pub database: PathBuf,
    /// Table name to use instead of the sheet title
    #[arg(short = 't', long = "table")]
    pub table: Option<String>,
    /// Resolution for duplicate column names
    #[arg(long = "on-conflict", value_enum, default_value = "prompt")]
    pub on_conflict: ConflictPolicy,
    #[command(flatten)]
    pub naming: NamingArgs,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Table name to use instead of the sheet title
    #[arg(short = 't', long = "table")]
    pub table: Option<String>,
    /// Write the inferred schema as JSON to this file
    #[arg(short, long)]
    pub meta: Option<PathBuf>,
    /// Resolution for duplicate column names
    #[arg(long = "on-conflict", value_enum, default_value = "suffix")]
    pub on_conflict: ConflictPolicy,
    #[command(flatten)]
    pub naming: NamingArgs,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Number of data rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
