//! Spreadsheet sources that produce a [`Grid`].
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) are read through
//! calamine; delimited text (`.csv`, `.tsv`, or `-` for stdin) through the
//! csv crate with per-field type detection.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    data::{parse_cell, parse_naive_date, parse_naive_datetime, parse_naive_time},
    grid::{CellValue, Grid},
    io_utils,
};

#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// Worksheet to read; the first one when absent.
    pub sheet: Option<String>,
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
}

/// Loads one sheet from `path`, choosing the reader from the extension.
pub fn load_grid(path: &Path, options: &SourceOptions) -> Result<Grid> {
    if io_utils::is_dash(path) || io_utils::has_extension(path, &["csv", "tsv", "txt"]) {
        let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
        let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
        load_csv(path, delimiter, encoding)
    } else {
        load_workbook_sheet(path, options.sheet.as_deref())
    }
}

pub fn load_workbook_sheet(path: &Path, sheet: Option<&str>) -> Result<Grid> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let names = workbook.sheet_names();
    let name = match sheet {
        Some(requested) => names
            .iter()
            .find(|name| name.as_str() == requested)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "Sheet '{requested}' not found in {path:?}; available: {}",
                    names.join(", ")
                )
            })?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Workbook {path:?} has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("Reading sheet '{name}' from {path:?}"))?;

    // Ranges start at the first used cell; keep absolute positions so the
    // header stays in row 1 and column letters match the workbook.
    let rows = match range.end() {
        Some((last_row, last_col)) => (0..=last_row)
            .map(|row| {
                (0..=last_col)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map(workbook_cell)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect(),
        None => Vec::new(),
    };
    let grid = Grid::new(name, rows);
    info!(
        "Loaded sheet '{}' from {:?}: {} row(s) x {} column(s)",
        grid.title(),
        path,
        grid.max_row(),
        grid.max_column()
    );
    Ok(grid)
}

/// Maps a calamine cell to a [`CellValue`].
pub fn workbook_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(value) => CellValue::Integer(*value),
        Data::Float(value) => float_cell(*value),
        Data::String(value) if value.is_empty() => CellValue::Empty,
        Data::String(value) => CellValue::Text(value.clone()),
        Data::Bool(value) => CellValue::Integer(i64::from(*value)),
        Data::DateTime(value) => {
            let serial = value.as_f64();
            match value.as_datetime() {
                // Only a bare fraction of a day is a time; any serial of one
                // day or more is a datetime, even at midnight.
                Some(datetime) if serial < 1.0 => CellValue::Time(datetime.time()),
                Some(datetime) => CellValue::DateTime(datetime),
                None => float_cell(serial),
            }
        }
        Data::DateTimeIso(value) => iso_cell(value),
        Data::DurationIso(value) => CellValue::Text(value.clone()),
        Data::Error(err) => CellValue::Text(err.to_string()),
    }
}

/// Workbooks store whole numbers as floats; report them as integers.
fn float_cell(value: f64) -> CellValue {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        CellValue::Integer(value as i64)
    } else {
        CellValue::Real(value)
    }
}

fn iso_cell(value: &str) -> CellValue {
    if let Ok(datetime) = parse_naive_datetime(value) {
        CellValue::DateTime(datetime)
    } else if let Ok(date) = parse_naive_date(value) {
        CellValue::Date(date)
    } else if let Ok(time) = parse_naive_time(value) {
        CellValue::Time(time)
    } else {
        CellValue::Text(value.to_string())
    }
}

/// Reads a delimited text file as a sheet titled after the file stem.
pub fn load_csv(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Grid> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 1))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", idx + 1))?;
        rows.push(decoded.iter().map(|field| parse_cell(field)).collect());
    }
    let title = if io_utils::is_dash(path) {
        "stdin".to_string()
    } else {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Cannot derive a sheet title from {path:?}"))?
    };
    if rows.is_empty() {
        bail!("Input {path:?} contains no rows");
    }
    debug!("Read {} row(s) from {:?}", rows.len(), path);
    Ok(Grid::new(title, rows))
}
