//! spendcat CLI - Bank-statement expense categorizer
//!
//! Usage:
//!   spendcat categorize --file CSV      Categorize and export to CSV
//!   spendcat report --file CSV          Spending per category
//!   spendcat unmatched --file CSV       Rows left as "Others"
//!   spendcat rules test "DESCRIPTION"   Show the matching rule
//!   spendcat model train --file CSV     Fit a classifier

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let rules = cli.rules.as_deref();

    match cli.command {
        Commands::Categorize {
            file,
            output,
            model,
        } => commands::cmd_categorize(&file, &output, rules, model.as_deref()),
        Commands::Report { file, month, model } => {
            commands::cmd_report(&file, &month, rules, model.as_deref())
        }
        Commands::Unmatched { file, model } => {
            commands::cmd_unmatched(&file, rules, model.as_deref())
        }
        Commands::Rules { action } => match action {
            None | Some(RulesAction::List) => commands::cmd_rules_list(rules),
            Some(RulesAction::Test { description }) => {
                commands::cmd_rules_test(rules, &description)
            }
        },
        Commands::Model { action } => match action {
            ModelAction::Train { file, output } => commands::cmd_model_train(&file, &output),
            ModelAction::Predict {
                model,
                descriptions,
            } => commands::cmd_model_predict(&model, &descriptions),
        },
    }
}
