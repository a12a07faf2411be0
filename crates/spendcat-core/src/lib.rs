//! spendcat Core Library
//!
//! Categorizes bank-statement expenses from their free-text descriptions:
//! - CSV statement loading with a validated input contract
//! - Description cleaning and the debit (expense) filter
//! - First-match keyword rules with an "Others" fallback
//! - TF-IDF + multinomial naive Bayes classifier with saved artifacts
//! - A pipeline composing rule-based and statistical strategies
//! - Spending summaries, month filters and CSV export

pub mod classifier;
pub mod clean;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod suggest;

pub use classifier::TextClassifier;
pub use clean::{clean_description, clean_transactions, debit_filter};
pub use error::{Error, Result};
pub use models::{
    CategorizedTransaction, CategorySource, CleanedTransaction, RunStats, Transaction,
    TransactionTable, OTHERS,
};
pub use pipeline::{Categorizer, Pipeline, PipelineOutput};
pub use report::{MonthFilter, SpendingSummary};
pub use rules::{CategoryRule, RuleSet};
