//! Typed cell values for delimited-text sheets.
//!
//! Workbook cells arrive already typed, but a CSV/TSV field is only text.
//! [`parse_cell()`] gives each field the most specific [`CellValue`] it
//! parses as: integer, then real, then date, datetime and time, falling
//! back to text.

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::grid::CellValue;

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

pub fn parse_naive_time(value: &str) -> Result<NaiveTime> {
    const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];
    for fmt in TIME_FORMATS {
        if let Ok(parsed) = NaiveTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as time"))
}

pub fn parse_cell(raw: &str) -> CellValue {
    let value = raw.trim();
    if value.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(parsed) = value.parse::<i64>() {
        return CellValue::Integer(parsed);
    }
    if let Ok(parsed) = value.parse::<f64>() {
        // "nan" and "inf" parse as floats but are words in a sheet.
        if parsed.is_finite() {
            return CellValue::Real(parsed);
        }
    }
    if let Ok(parsed) = parse_naive_date(value) {
        return CellValue::Date(parsed);
    }
    if let Ok(parsed) = parse_naive_datetime(value) {
        return CellValue::DateTime(parsed);
    }
    if let Ok(parsed) = parse_naive_time(value) {
        return CellValue::Time(parsed);
    }
    CellValue::Text(raw.to_string())
}
