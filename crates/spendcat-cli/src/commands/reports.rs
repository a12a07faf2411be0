//! Report command implementations

use std::path::Path;

use anyhow::{Context, Result};
use spendcat_core::report::{self, MonthFilter};

use super::{run_statement, truncate};

pub fn cmd_report(
    file: &Path,
    month: &str,
    rules: Option<&Path>,
    model: Option<&Path>,
) -> Result<()> {
    let filter: MonthFilter = month
        .parse()
        .with_context(|| format!("Invalid --month value: {}", month))?;

    let (_, result) = run_statement(file, rules, model)?;
    let selected = report::filter_month(&result.records, &filter);
    let summary = report::summarize(selected.iter().copied());

    println!();
    println!("📊 Spending Summary");
    println!("   Month: {}", filter);
    let available = report::months(&result.records);
    if !available.is_empty() {
        println!("   Available: {}", available.join(", "));
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.transaction_count == 0 {
        println!("   No spending found for this month.");
        return Ok(());
    }

    println!("   Total spend:  {:.2}", summary.total_spend);
    println!("   Categories:   {}", summary.category_count);
    println!("   Transactions: {}", summary.transaction_count);
    println!();
    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────");

    for cat in &summary.categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&cat.category, 25),
            cat.amount,
            cat.percentage,
            cat.transaction_count
        );
    }

    Ok(())
}
