//! Categorization pipeline
//!
//! A `Pipeline` owns a primary `Categorizer` and an optional fallback. A run
//! debit-filters and cleans the table, asks the primary strategy for every
//! row, and hands rows the primary left as "Others" to the fallback.
//! Pipelines are plain values, so differently configured ones (per-tenant
//! rule sets, A/B strategies) can live side by side.

use tracing::debug;

use crate::classifier::TextClassifier;
use crate::clean::clean_transactions;
use crate::error::{Error, Result};
use crate::models::{
    CategorizedTransaction, CategorySource, RunStats, TransactionTable, OTHERS,
};
use crate::rules::RuleSet;

/// A strategy that maps a cleaned description to a category
#[derive(Debug, Clone)]
pub enum Categorizer {
    /// First-match keyword rules
    RuleBased(RuleSet),
    /// Fitted TF-IDF + naive Bayes classifier
    Statistical(TextClassifier),
}

impl Categorizer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RuleBased(_) => "rules",
            Self::Statistical(_) => "model",
        }
    }

    fn source(&self) -> CategorySource {
        match self {
            Self::RuleBased(_) => CategorySource::Rule,
            Self::Statistical(_) => CategorySource::Model,
        }
    }

    /// A statistical strategy must be fitted before it can answer
    pub fn ensure_ready(&self) -> Result<()> {
        match self {
            Self::Statistical(model) if !model.is_fitted() => Err(Error::ModelNotFit),
            _ => Ok(()),
        }
    }

    /// Category for one cleaned description
    pub fn categorize(&self, clean_description: &str) -> Result<String> {
        match self {
            Self::RuleBased(rules) => Ok(rules.categorize(clean_description).to_string()),
            Self::Statistical(model) => model.predict_one(clean_description),
        }
    }

    /// Categories for many cleaned descriptions, in input order
    pub fn categorize_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        match self {
            Self::RuleBased(rules) => Ok(texts
                .iter()
                .map(|t| rules.categorize(t.as_ref()).to_string())
                .collect()),
            Self::Statistical(model) => model.predict(texts),
        }
    }
}

impl From<RuleSet> for Categorizer {
    fn from(rules: RuleSet) -> Self {
        Self::RuleBased(rules)
    }
}

impl From<TextClassifier> for Categorizer {
    fn from(model: TextClassifier) -> Self {
        Self::Statistical(model)
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub records: Vec<CategorizedTransaction>,
    pub stats: RunStats,
}

/// An owned, configured categorization pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    primary: Categorizer,
    fallback: Option<Categorizer>,
}

impl Pipeline {
    pub fn new(primary: impl Into<Categorizer>) -> Self {
        Self {
            primary: primary.into(),
            fallback: None,
        }
    }

    /// Consult `fallback` for rows the primary strategy leaves as "Others"
    pub fn with_fallback(mut self, fallback: impl Into<Categorizer>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn primary(&self) -> &Categorizer {
        &self.primary
    }

    pub fn fallback(&self) -> Option<&Categorizer> {
        self.fallback.as_ref()
    }

    /// Clean, debit-filter and categorize a table
    pub fn run(&self, table: TransactionTable) -> Result<PipelineOutput> {
        self.primary.ensure_ready()?;
        if let Some(fallback) = &self.fallback {
            fallback.ensure_ready()?;
        }

        let rows_read = table.rows.len();
        let cleaned = clean_transactions(table.rows);

        let texts: Vec<&str> = cleaned.iter().map(|c| c.clean_description.as_str()).collect();
        let mut categories = self.primary.categorize_batch(&texts)?;
        let mut sources = vec![self.primary.source(); categories.len()];

        if let Some(fallback) = &self.fallback {
            let unmatched: Vec<usize> = categories
                .iter()
                .enumerate()
                .filter(|(_, c)| c.as_str() == OTHERS)
                .map(|(i, _)| i)
                .collect();
            if !unmatched.is_empty() {
                let fallback_texts: Vec<&str> = unmatched.iter().map(|&i| texts[i]).collect();
                let fallback_categories = fallback.categorize_batch(&fallback_texts)?;
                for (&i, category) in unmatched.iter().zip(fallback_categories) {
                    if category != OTHERS {
                        categories[i] = category;
                        sources[i] = fallback.source();
                    }
                }
            }
        }

        let mut stats = RunStats {
            rows_read,
            credits_dropped: rows_read - cleaned.len(),
            categorized: cleaned.len(),
            ..Default::default()
        };

        let records: Vec<CategorizedTransaction> = cleaned
            .into_iter()
            .zip(categories.into_iter().zip(sources))
            .map(|(cleaned, (category, source))| {
                let source = if category == OTHERS {
                    CategorySource::Default
                } else {
                    source
                };
                match source {
                    CategorySource::Rule => stats.by_rule += 1,
                    CategorySource::Model => stats.by_model += 1,
                    CategorySource::Default => stats.fallback_to_others += 1,
                }
                CategorizedTransaction {
                    cleaned,
                    category,
                    source: Some(source),
                }
            })
            .collect();

        debug!(
            "Pipeline ({}{}) categorized {} of {} rows: {} by rule, {} by model, {} others",
            self.primary.name(),
            self.fallback
                .as_ref()
                .map(|f| format!(" -> {}", f.name()))
                .unwrap_or_default(),
            stats.categorized,
            stats.rows_read,
            stats.by_rule,
            stats.by_model,
            stats.fallback_to_others
        );

        Ok(PipelineOutput { records, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier;
    use crate::models::Transaction;
    use crate::rules::CategoryRule;
    use chrono::NaiveDate;

    fn rules() -> RuleSet {
        RuleSet::new(vec![
            CategoryRule::new("Food", ["zomato"]),
            CategoryRule::new("Shopping", ["amazon"]),
        ])
        .unwrap()
    }

    fn tx(date: &str, description: &str, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description,
            amount,
        )
    }

    fn scenario() -> TransactionTable {
        TransactionTable::from_rows(vec![
            tx("2024-01-05", "Zomato Order #123", -450.0),
            tx("2024-01-10", "Salary Credit", 50000.0),
            tx("2024-02-01", "Amazon Purchase", -1200.0),
        ])
    }

    #[test]
    fn test_rule_pipeline_scenario() {
        let output = Pipeline::new(rules()).run(scenario()).unwrap();
        let categories: Vec<&str> = output.records.iter().map(|r| r.category.as_str()).collect();
        let amounts: Vec<f64> = output.records.iter().map(|r| r.amount()).collect();
        assert_eq!(categories, vec!["Food", "Shopping"]);
        assert_eq!(amounts, vec![450.0, 1200.0]);
        assert_eq!(output.stats.rows_read, 3);
        assert_eq!(output.stats.credits_dropped, 1);
        assert_eq!(output.stats.by_rule, 2);
    }

    #[test]
    fn test_unmatched_rows_default_to_others() {
        let table = TransactionTable::from_rows(vec![tx("2024-01-01", "XYZ Unknown", -5.0)]);
        let output = Pipeline::new(rules()).run(table).unwrap();
        assert_eq!(output.records[0].category, OTHERS);
        assert_eq!(output.records[0].source, Some(CategorySource::Default));
        assert_eq!(output.stats.fallback_to_others, 1);
    }

    #[test]
    fn test_empty_after_filter() {
        let table = TransactionTable::from_rows(vec![tx("2024-01-01", "Refund", 10.0)]);
        let output = Pipeline::new(rules()).run(table).unwrap();
        assert!(output.records.is_empty());
        assert_eq!(output.stats.categorized, 0);
    }

    #[test]
    fn test_model_fallback_only_for_others() {
        let model = classifier::fit(&["uber ride", "zomato order"], &["Transport", "Food"]).unwrap();
        let pipeline = Pipeline::new(rules()).with_fallback(model);

        let table = TransactionTable::from_rows(vec![
            tx("2024-01-01", "Uber Ride 77", -300.0),
            tx("2024-01-02", "Amazon", -10.0),
        ]);
        let output = pipeline.run(table).unwrap();
        assert_eq!(output.records[0].category, "Transport");
        assert_eq!(output.records[0].source, Some(CategorySource::Model));
        assert_eq!(output.records[1].category, "Shopping");
        assert_eq!(output.records[1].source, Some(CategorySource::Rule));
        assert_eq!(output.stats.by_model, 1);
        assert_eq!(output.stats.by_rule, 1);
    }

    #[test]
    fn test_statistical_primary() {
        let model = classifier::fit(&["zomato order", "amazon buy"], &["Food", "Shopping"]).unwrap();
        let output = Pipeline::new(model).run(scenario()).unwrap();
        let categories: Vec<&str> = output.records.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["Food", "Shopping"]);
        assert_eq!(output.stats.by_model, 2);
    }

    #[test]
    fn test_unfit_model_fails_run() {
        let pipeline = Pipeline::new(TextClassifier::new());
        assert!(matches!(pipeline.run(scenario()), Err(Error::ModelNotFit)));
    }

    #[test]
    fn test_unfit_primary_fails_without_debits() {
        let table = TransactionTable::from_rows(vec![tx("2024-01-01", "Refund", 10.0)]);
        let pipeline = Pipeline::new(TextClassifier::new());
        assert!(matches!(pipeline.run(table), Err(Error::ModelNotFit)));
    }

    #[test]
    fn test_unfit_fallback_fails_when_rules_match_all() {
        let table = TransactionTable::from_rows(vec![tx("2024-01-01", "Zomato", -10.0)]);
        let pipeline = Pipeline::new(rules()).with_fallback(TextClassifier::new());
        assert!(matches!(pipeline.run(table), Err(Error::ModelNotFit)));
    }

    #[test]
    fn test_independent_pipelines() {
        let a = Pipeline::new(rules());
        let b = Pipeline::new(
            RuleSet::new(vec![CategoryRule::new("Delivery", ["zomato"])]).unwrap(),
        );
        let ra = a.run(scenario()).unwrap();
        let rb = b.run(scenario()).unwrap();
        assert_eq!(ra.records[0].category, "Food");
        assert_eq!(rb.records[0].category, "Delivery");
        assert_eq!(rb.records[1].category, OTHERS);
    }

    #[test]
    fn test_categorizer_capability() {
        let rules = Categorizer::from(rules());
        assert_eq!(rules.categorize("amazon cafe").unwrap(), "Shopping");
        assert_eq!(rules.name(), "rules");
        assert!(rules.ensure_ready().is_ok());
        assert!(matches!(
            Categorizer::from(TextClassifier::new()).ensure_ready(),
            Err(Error::ModelNotFit)
        ));
    }
}
