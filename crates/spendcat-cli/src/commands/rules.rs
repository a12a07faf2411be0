//! Rule command implementations

use std::path::Path;

use anyhow::Result;
use spendcat_core::{clean_description, OTHERS};

use super::load_rules;

pub fn cmd_rules_list(rules: Option<&Path>) -> Result<()> {
    let rules = load_rules(rules)?;

    println!();
    println!("📋 Category rules (checked in order)");
    println!("   ─────────────────────────────────────────────────────────────");
    for (i, rule) in rules.rules().iter().enumerate() {
        println!("   {}. {:15} {}", i + 1, rule.name, rule.keywords.join(", "));
    }

    Ok(())
}

pub fn cmd_rules_test(rules: Option<&Path>, description: &str) -> Result<()> {
    let rules = load_rules(rules)?;
    let cleaned = clean_description(description);

    match rules.match_rule(&cleaned) {
        Some(m) => println!(
            "\"{}\" -> {} (keyword \"{}\")",
            cleaned, m.category, m.keyword
        ),
        None => println!("No rules match \"{}\" -> {}", cleaned, OTHERS),
    }

    Ok(())
}
