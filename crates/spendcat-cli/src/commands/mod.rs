//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `categorize` - Categorize/export and unmatched listing
//! - `model` - Classifier training and prediction
//! - `reports` - Spending report
//! - `rules` - Rule listing and testing

pub mod categorize;
pub mod model;
pub mod reports;
pub mod rules;

// Re-export command functions for main.rs
pub use categorize::*;
pub use model::*;
pub use reports::*;
pub use rules::*;

use std::path::Path;

use anyhow::{Context, Result};
use spendcat_core::{import, Pipeline, PipelineOutput, RuleSet, TextClassifier};
use tracing::debug;

/// Resolve the rule set from `--rules`, the data dir override, or the built-ins
pub fn load_rules(rules: Option<&Path>) -> Result<RuleSet> {
    RuleSet::resolve(rules).context("Failed to load category rules")
}

pub fn load_model(path: &Path) -> Result<TextClassifier> {
    TextClassifier::load(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))
}

/// Rules first, with the model (if any) for rows no rule matches
pub fn build_pipeline(rules: Option<&Path>, model: Option<&Path>) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new(load_rules(rules)?);
    if let Some(path) = model {
        debug!("Using model {} for unmatched rows", path.display());
        pipeline = pipeline.with_fallback(load_model(path)?);
    }
    Ok(pipeline)
}

/// Load a statement and run it through the pipeline
pub fn run_statement(
    file: &Path,
    rules: Option<&Path>,
    model: Option<&Path>,
) -> Result<(Vec<String>, PipelineOutput)> {
    let pipeline = build_pipeline(rules, model)?;
    let table = import::load_csv(file)
        .with_context(|| format!("Failed to read statement {}", file.display()))?;
    let extra_columns = table.extra_columns.clone();
    let output = pipeline.run(table)?;
    Ok((extra_columns, output))
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
