//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// spendcat - Categorize bank-statement expenses
#[derive(Parser)]
#[command(name = "spendcat")]
#[command(about = "Keyword and model based expense categorizer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Category rules file (JSON or TOML)
    ///
    /// When omitted, `<data dir>/spendcat/config/categories.toml` is used if it
    /// exists, otherwise the built-in rules.
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize a statement and export the result as CSV
    Categorize {
        /// Statement CSV with date, description and amount columns
        #[arg(short, long)]
        file: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "categorized_expenses.csv")]
        output: PathBuf,

        /// Trained model used for rows no rule matches
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Show spending per category
    Report {
        /// Statement CSV with date, description and amount columns
        #[arg(short, long)]
        file: PathBuf,

        /// Month to report on (YYYY-MM) or "all"
        #[arg(long, default_value = "all")]
        month: String,

        /// Trained model used for rows no rule matches
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// List transactions no rule matched
    Unmatched {
        /// Statement CSV with date, description and amount columns
        #[arg(short, long)]
        file: PathBuf,

        /// Trained model used to suggest a category for each row
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Inspect category rules
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,
    },

    /// Train and query the text classifier
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List categories and their keywords
    List,
    /// Show which rule matches a description
    Test {
        /// Raw description, cleaned before matching
        description: String,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// Fit a classifier on a labelled CSV
    Train {
        /// CSV with description and category columns (an export works as-is)
        #[arg(short, long)]
        file: PathBuf,

        /// Where to write the model
        #[arg(short, long, default_value = "spendcat-model.json")]
        output: PathBuf,
    },
    /// Predict categories for descriptions
    Predict {
        /// Trained model file
        #[arg(short, long)]
        model: PathBuf,

        /// Raw descriptions, cleaned before prediction
        #[arg(required = true)]
        descriptions: Vec<String>,
    },
}
