//! Description normalization and the debit (expense) filter

use std::fmt::Display;

use tracing::debug;

use crate::models::{CleanedTransaction, Transaction};

/// Normalize a free-text description into lowercase letters and spaces.
///
/// Lowercases, drops digits and every character that is not `a-z` or
/// whitespace, then trims the ends. Interior whitespace is left as-is, so
/// `"Zomato Order #123"` becomes `"zomato order "` before trimming and
/// `"zomato order"` after.
pub fn clean_description(raw: &str) -> String {
    let kept: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    kept.trim().to_string()
}

/// Clean any displayable value (numeric description fields and the like)
pub fn clean_value<T: Display + ?Sized>(value: &T) -> String {
    clean_description(&value.to_string())
}

/// Keep only expense rows (`amount < 0`) and turn their amounts into magnitudes.
///
/// Credits, refunds and zero-amount rows are dropped.
pub fn debit_filter(rows: Vec<Transaction>) -> Vec<Transaction> {
    let total = rows.len();
    let debits: Vec<Transaction> = rows
        .into_iter()
        .filter(|tx| tx.amount < 0.0)
        .map(|mut tx| {
            tx.amount = tx.amount.abs();
            tx
        })
        .collect();

    debug!(
        "Debit filter kept {} of {} rows ({} dropped)",
        debits.len(),
        total,
        total - debits.len()
    );
    debits
}

/// Debit-filter the rows and attach a cleaned description to each survivor
pub fn clean_transactions(rows: Vec<Transaction>) -> Vec<CleanedTransaction> {
    debit_filter(rows)
        .into_iter()
        .map(|transaction| {
            let clean_description = clean_description(&transaction.description);
            CleanedTransaction {
                transaction,
                clean_description,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(description: &str, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description,
            amount,
        )
    }

    fn is_clean(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_lowercase() || c.is_whitespace())
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description("Zomato Order #123"), "zomato order");
        assert_eq!(clean_description("UPI-AMAZON-98765-PAY"), "upiamazonpay");
        assert_eq!(clean_description("  Uber   Trip 42  "), "uber   trip");
        assert_eq!(clean_description("12345"), "");
        assert_eq!(clean_description(""), "");
    }

    #[test]
    fn test_clean_keeps_interior_whitespace() {
        assert_eq!(clean_description("cafe\tcoffee day"), "cafe\tcoffee day");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let inputs = [
            "Zomato Order #123",
            "NEFT/HDFC-0012/Electricity BILL",
            "   ",
            "Café Déjà vu 99",
            "ÀMAZON",
            "\u{130}stanbul",
            "already clean text",
        ];
        for input in inputs {
            let once = clean_description(input);
            assert_eq!(clean_description(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_clean_output_alphabet() {
        let inputs = [
            "POS 4411 SWIGGY*BANGALORE",
            "Ref#: 00-11-22 / metro card",
            "ß ø ñ 😀 tab\there",
            "MiXeD CaSe 123 !!!",
        ];
        for input in inputs {
            let cleaned = clean_description(input);
            assert!(is_clean(&cleaned), "{:?} -> {:?}", input, cleaned);
            assert!(!cleaned.chars().any(|c| c.is_ascii_digit()));
            assert_eq!(cleaned, cleaned.trim());
        }
    }

    #[test]
    fn test_clean_value_stringifies() {
        assert_eq!(clean_value(&12345), "");
        assert_eq!(clean_value(&3.5f64), "");
        assert_eq!(clean_value("Fuel 20L"), "fuel l");
    }

    #[test]
    fn test_debit_filter() {
        let rows = vec![
            tx("Zomato", -450.0),
            tx("Salary", 50000.0),
            tx("Zero", 0.0),
            tx("Amazon", -1200.5),
        ];
        let debits = debit_filter(rows);
        assert_eq!(debits.len(), 2);
        assert_eq!(debits[0].description, "Zomato");
        assert_eq!(debits[0].amount, 450.0);
        assert_eq!(debits[1].amount, 1200.5);
        assert!(debits.iter().all(|t| t.amount >= 0.0));
    }

    #[test]
    fn test_debit_filter_all_credits() {
        let debits = debit_filter(vec![tx("Refund", 10.0), tx("Salary", 100.0)]);
        assert!(debits.is_empty());
    }

    #[test]
    fn test_clean_transactions_preserves_order() {
        let cleaned = clean_transactions(vec![
            tx("B Shop 1", -1.0),
            tx("credit", 1.0),
            tx("A Cafe 2", -2.0),
        ]);
        let descs: Vec<&str> = cleaned.iter().map(|c| c.clean_description.as_str()).collect();
        assert_eq!(descs, vec!["b shop", "a cafe"]);
    }
}
