//! Suggestions for transactions no rule matched
//!
//! Display-only: suggestions are never written back to the rule set and never
//! used to retrain the model.

use crate::classifier::TextClassifier;
use crate::error::Result;
use crate::models::CategorizedTransaction;

/// A category proposed for an unmatched transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'a> {
    pub record: &'a CategorizedTransaction,
    pub suggested: String,
}

/// Records that ended up in "Others", in original order
pub fn unmatched<'a, I>(records: I) -> Vec<&'a CategorizedTransaction>
where
    I: IntoIterator<Item = &'a CategorizedTransaction>,
{
    records.into_iter().filter(|r| r.is_unmatched()).collect()
}

/// Pair each unmatched record with the classifier's prediction
pub fn suggest<'a, I>(records: I, model: &TextClassifier) -> Result<Vec<Suggestion<'a>>>
where
    I: IntoIterator<Item = &'a CategorizedTransaction>,
{
    unmatched(records)
        .into_iter()
        .map(|record| {
            Ok(Suggestion {
                record,
                suggested: model.predict_one(record.clean_description())?,
            })
        })
        .collect()
}
