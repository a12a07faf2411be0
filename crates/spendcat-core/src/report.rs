//! Spending aggregation over categorized transactions

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::CategorizedTransaction;

/// Spend for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
    /// Share of total spend, 0-100
    pub percentage: f64,
    pub transaction_count: usize,
}

/// Headline metrics plus the per-category breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub total_spend: f64,
    pub category_count: usize,
    pub transaction_count: usize,
    pub categories: Vec<CategorySpending>,
}

/// Month key (`YYYY-MM`) for a date
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Sorted, distinct month keys present in the records
pub fn months(records: &[CategorizedTransaction]) -> Vec<String> {
    records
        .iter()
        .map(|r| month_key(r.date()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Month selection for reports
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    /// A `YYYY-MM` key
    Month(String),
}

impl MonthFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Month(key) => month_key(date) == *key,
        }
    }
}

impl std::str::FromStr for MonthFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        // Round-trip through a date to reject things like 2024-13 or 2024-1
        let valid = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map(|d| month_key(d) == s)
            .unwrap_or(false);
        if valid {
            Ok(Self::Month(s.to_string()))
        } else {
            Err(Error::InvalidData(format!(
                "Invalid month '{}'; use YYYY-MM or 'all'",
                s
            )))
        }
    }
}

impl std::fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Month(key) => write!(f, "{}", key),
        }
    }
}

/// Records falling in the selected month, in original order
pub fn filter_month<'a>(
    records: &'a [CategorizedTransaction],
    filter: &MonthFilter,
) -> Vec<&'a CategorizedTransaction> {
    records.iter().filter(|r| filter.matches(r.date())).collect()
}

pub fn total_spend<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a CategorizedTransaction>,
{
    records.into_iter().map(|r| r.amount()).sum()
}

/// Spend per category, ordered by amount (largest first), then name
pub fn spend_by_category<'a, I>(records: I) -> Vec<CategorySpending>
where
    I: IntoIterator<Item = &'a CategorizedTransaction>,
{
    let mut by_category: HashMap<&str, (f64, usize)> = HashMap::new();
    let mut total = 0.0;
    for record in records {
        let entry = by_category.entry(record.category.as_str()).or_insert((0.0, 0));
        entry.0 += record.amount();
        entry.1 += 1;
        total += record.amount();
    }

    let mut categories: Vec<CategorySpending> = by_category
        .into_iter()
        .map(|(category, (amount, transaction_count))| CategorySpending {
            category: category.to_string(),
            amount,
            percentage: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
            transaction_count,
        })
        .collect();
    categories.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    categories
}

/// Headline metrics and the per-category breakdown
pub fn summarize<'a, I>(records: I) -> SpendingSummary
where
    I: IntoIterator<Item = &'a CategorizedTransaction>,
{
    let records: Vec<&CategorizedTransaction> = records.into_iter().collect();
    let categories = spend_by_category(records.iter().copied());

    SpendingSummary {
        total_spend: total_spend(records.iter().copied()),
        category_count: categories.len(),
        transaction_count: records.len(),
        categories,
    }
}
