//! Categorize and unmatched command implementations

use std::path::Path;

use anyhow::{Context, Result};
use spendcat_core::{export, suggest};

use super::{load_model, run_statement, truncate};

pub fn cmd_categorize(
    file: &Path,
    output: &Path,
    rules: Option<&Path>,
    model: Option<&Path>,
) -> Result<()> {
    let (extra_columns, result) = run_statement(file, rules, model)?;

    export::export_csv_file(output, &extra_columns, &result.records)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let stats = &result.stats;
    println!();
    println!("✅ Categorized {} expenses", stats.categorized);
    println!("   Rows read:        {}", stats.rows_read);
    println!("   Credits dropped:  {}", stats.credits_dropped);
    println!("   Matched by rule:  {}", stats.by_rule);
    if model.is_some() {
        println!("   Matched by model: {}", stats.by_model);
    }
    println!("   Others:           {}", stats.fallback_to_others);
    println!();
    println!("   Saved to {}", output.display());

    Ok(())
}

pub fn cmd_unmatched(file: &Path, rules: Option<&Path>, model: Option<&Path>) -> Result<()> {
    // The model only suggests here, so the pipeline runs on rules alone
    let (_, result) = run_statement(file, rules, None)?;
    let unmatched = suggest::unmatched(&result.records);

    if unmatched.is_empty() {
        println!("Every expense matched a rule.");
        return Ok(());
    }

    println!();
    println!("🔍 {} expenses matched no rule", unmatched.len());
    println!("   ─────────────────────────────────────────────────────────────");

    match model {
        Some(path) => {
            let model = load_model(path)?;
            let suggestions = suggest::suggest(unmatched, &model)?;
            println!(
                "   {:10} │ {:35} │ {:>10} │ Suggested",
                "Date", "Description", "Amount"
            );
            for s in suggestions {
                println!(
                    "   {:10} │ {:35} │ {:>10.2} │ {}",
                    s.record.date(),
                    truncate(s.record.description(), 35),
                    s.record.amount(),
                    s.suggested
                );
            }
        }
        None => {
            println!("   {:10} │ {:35} │ {:>10}", "Date", "Description", "Amount");
            for record in unmatched {
                println!(
                    "   {:10} │ {:35} │ {:>10.2}",
                    record.date(),
                    truncate(record.description(), 35),
                    record.amount()
                );
            }
        }
    }

    Ok(())
}
