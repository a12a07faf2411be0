//! CSV statement loader
//!
//! Reads a statement with a header row. Column names are matched
//! case-insensitively; `date`, `description` and `amount` are required and
//! every other column is carried through untouched. Any missing column or
//! unparseable value fails the whole load with `Error::Schema`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionTable};

pub const DATE_COLUMN: &str = "date";
pub const DESCRIPTION_COLUMN: &str = "description";
pub const AMOUNT_COLUMN: &str = "amount";

/// Lowercased, trimmed header names
fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    headers.iter().map(|h| h.trim().to_lowercase()).collect()
}

fn require_column(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::schema(name, "required column is missing"))
}

/// Position of an optional column
pub fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Read a CSV reader with a header row into (normalized headers, records)
pub fn read_records<R: Read>(reader: R) -> Result<(Vec<String>, Vec<StringRecord>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = normalize_headers(rdr.headers()?);
    let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((headers, records))
}

/// Parse a statement into a validated transaction table
pub fn parse_csv<R: Read>(reader: R) -> Result<TransactionTable> {
    let (headers, records) = read_records(reader)?;

    let date_col = require_column(&headers, DATE_COLUMN)?;
    let desc_col = require_column(&headers, DESCRIPTION_COLUMN)?;
    let amount_col = require_column(&headers, AMOUNT_COLUMN)?;

    let extra_cols: Vec<usize> = (0..headers.len())
        .filter(|i| ![date_col, desc_col, amount_col].contains(i))
        .collect();
    let extra_columns = extra_cols.iter().map(|&i| headers[i].clone()).collect();

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        // 1-based data row, not counting the header
        let row = index + 1;

        let date_str = record.get(date_col).unwrap_or("");
        let date = parse_date(date_str).map_err(|_| {
            Error::schema(DATE_COLUMN, format!("row {}: unable to parse date '{}'", row, date_str))
        })?;

        let description = record.get(desc_col).unwrap_or("").to_string();

        let amount_str = record.get(amount_col).unwrap_or("");
        let amount = parse_amount(amount_str).map_err(|_| {
            Error::schema(
                AMOUNT_COLUMN,
                format!("row {}: unable to parse amount '{}'", row, amount_str),
            )
        })?;

        let extra = extra_cols
            .iter()
            .map(|&i| record.get(i).unwrap_or("").to_string())
            .collect();

        rows.push(Transaction {
            date,
            description,
            amount,
            extra,
        });
    }

    debug!("Parsed {} transactions", rows.len());
    Ok(TransactionTable {
        extra_columns,
        rows,
    })
}

/// Load a statement file
pub fn load_csv(path: &Path) -> Result<TransactionTable> {
    let file = File::open(path)?;
    let table = parse_csv(file)?;
    info!("Loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

/// Parse a date string in various common formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%Y/%m/%d", // 2024/01/15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%d-%m-%Y", // 15-01-2024
        "%d/%m/%Y", // 15/01/2024 (European)
        "%d %b %Y", // 15 Jan 2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(Error::InvalidData(format!("Unable to parse date: {}", s)))
}

/// Parse a signed decimal amount
pub fn parse_amount(s: &str) -> Result<f64> {
    let amount = s
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidData(format!("Unable to parse amount: {}", s)))?;
    if !amount.is_finite() {
        return Err(Error::InvalidData(format!("Amount is not finite: {}", s)));
    }
    Ok(amount)
}
