//! Domain models for spendcat

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel category assigned when no rule matches
pub const OTHERS: &str = "Others";

/// One row of a bank statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount; negative means money left the account
    pub amount: f64,
    /// Values of the table's extra columns, in `TransactionTable::extra_columns` order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            extra: Vec::new(),
        }
    }
}

/// A loaded statement: validated rows plus the names of any columns beyond
/// `date`, `description` and `amount`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    pub extra_columns: Vec<String>,
    pub rows: Vec<Transaction>,
}

impl TransactionTable {
    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        Self {
            extra_columns: Vec::new(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An expense row after the debit filter, with its normalized description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub clean_description: String,
}

/// Which strategy produced a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    /// Keyword rule matched
    Rule,
    /// Statistical classifier prediction
    Model,
    /// Nothing matched; sentinel "Others"
    Default,
}

impl CategorySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Model => "model",
            Self::Default => "default",
        }
    }
}

impl std::str::FromStr for CategorySource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rule" => Ok(Self::Rule),
            "model" => Ok(Self::Model),
            "default" => Ok(Self::Default),
            _ => Err(format!("Unknown category source: {}", s)),
        }
    }
}

impl std::fmt::Display for CategorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cleaned expense with its assigned category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub cleaned: CleanedTransaction,
    pub category: String,
    #[serde(skip)]
    pub source: Option<CategorySource>,
}

impl CategorizedTransaction {
    pub fn date(&self) -> NaiveDate {
        self.cleaned.transaction.date
    }

    pub fn description(&self) -> &str {
        &self.cleaned.transaction.description
    }

    pub fn clean_description(&self) -> &str {
        &self.cleaned.clean_description
    }

    pub fn amount(&self) -> f64 {
        self.cleaned.transaction.amount
    }

    pub fn is_unmatched(&self) -> bool {
        self.category == OTHERS
    }
}

/// Counts collected during one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub rows_read: usize,
    pub credits_dropped: usize,
    pub categorized: usize,
    pub by_rule: usize,
    pub by_model: usize,
    pub fallback_to_others: usize,
}
