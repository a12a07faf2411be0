//! Export of categorized transactions
//!
//! Writes the input columns plus `clean_description` and `category`, one row
//! per surviving expense, in pipeline order.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::CategorizedTransaction;

/// Default file name for exported results
pub const DEFAULT_EXPORT_FILE: &str = "categorized_expenses.csv";

/// Header row for an export with the given extra columns
pub fn export_header(extra_columns: &[String]) -> Vec<String> {
    let mut header: Vec<String> = ["date", "description", "amount"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(extra_columns.iter().cloned());
    header.push("clean_description".to_string());
    header.push("category".to_string());
    header
}

/// Write categorized transactions as CSV with a header row
pub fn write_csv<W: Write>(
    writer: W,
    extra_columns: &[String],
    records: &[CategorizedTransaction],
) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(export_header(extra_columns))?;

    for record in records {
        let tx = &record.cleaned.transaction;
        if tx.extra.len() != extra_columns.len() {
            return Err(Error::InvalidData(format!(
                "Row dated {} has {} extra values for {} extra columns",
                tx.date,
                tx.extra.len(),
                extra_columns.len()
            )));
        }

        let mut row = vec![
            tx.date.format("%Y-%m-%d").to_string(),
            tx.description.clone(),
            format!("{:.2}", tx.amount),
        ];
        row.extend(tx.extra.iter().cloned());
        row.push(record.cleaned.clean_description.clone());
        row.push(record.category.clone());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export to an in-memory CSV string
pub fn export_csv_string(
    extra_columns: &[String],
    records: &[CategorizedTransaction],
) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, extra_columns, records)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(format!("Export is not UTF-8: {}", e)))
}

/// Export to a file
pub fn export_csv_file(
    path: &Path,
    extra_columns: &[String],
    records: &[CategorizedTransaction],
) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, extra_columns, records)?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategorySource, CleanedTransaction, Transaction};
    use chrono::NaiveDate;

    fn record(description: &str, clean: &str, amount: f64, category: &str) -> CategorizedTransaction {
        CategorizedTransaction {
            cleaned: CleanedTransaction {
                transaction: Transaction::new(
                    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                    description,
                    amount,
                ),
                clean_description: clean.to_string(),
            },
            category: category.to_string(),
            source: Some(CategorySource::Rule),
        }
    }

    #[test]
    fn test_export_empty() {
        let csv = export_csv_string(&[], &[]).unwrap();
        assert_eq!(csv, "date,description,amount,clean_description,category\n");
    }

    #[test]
    fn test_export_rows() {
        let records = vec![
            record("Zomato Order #123", "zomato order", 450.0, "Food"),
            record("Shop, \"Big\" Sale", "shop big sale", 12.5, "Others"),
        ];
        let csv = export_csv_string(&[], &records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-01-05,Zomato Order #123,450.00,zomato order,Food");
        assert_eq!(
            lines[2],
            "2024-01-05,\"Shop, \"\"Big\"\" Sale\",12.50,shop big sale,Others"
        );
    }

    #[test]
    fn test_export_extra_columns() {
        let mut rec = record("Uber", "uber", 99.0, "Transport");
        rec.cleaned.transaction.extra = vec!["REF1".to_string()];
        let csv = export_csv_string(&["ref".to_string()], &[rec]).unwrap();
        assert!(csv.starts_with("date,description,amount,ref,clean_description,category\n"));
        assert!(csv.contains("2024-01-05,Uber,99.00,REF1,uber,Transport"));
    }

    #[test]
    fn test_export_misaligned_extra_values() {
        let rec = record("Uber", "uber", 99.0, "Transport");
        assert!(export_csv_string(&["ref".to_string()], &[rec]).is_err());
    }
}
